//! Shared fixtures: a migrated in-memory SQLite database behind the real
//! service container, plus builders for a bookable salon.

#![allow(dead_code)]

use chrono::NaiveDate;
use sea_orm::{ConnectOptions, Database as SeaDatabase, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use salon_booking::config::Config;
use salon_booking::domain::{
    Actor, BusinessDetails, Counter, NewSalon, NewSalonService, NewStaff, Role, Salon,
    SalonService, SalonStatus, ServiceCategory, Staff, User,
};
use salon_booking::infra::Migrator;
use salon_booking::services::{BookingRequest, Registration, ServiceContainer, Services};

pub const ADMIN_EMAIL: &str = "admin@salon.test";
pub const ADMIN_PASSWORD: &str = "admin-password";
pub const PASSWORD: &str = "password123";

/// One in-memory database. A single pooled connection keeps every query on
/// the same SQLite database.
pub async fn connect() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = SeaDatabase::connect(options)
        .await
        .expect("open sqlite database");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

pub struct World {
    pub db: DatabaseConnection,
    pub services: Services,
    pub admin: Actor,
}

impl World {
    pub async fn new() -> Self {
        let db = connect().await;
        let services = Services::from_connection(db.clone(), Config::default());
        let admin = services
            .users()
            .seed_admin(ADMIN_EMAIL, ADMIN_PASSWORD)
            .await
            .expect("seed admin");
        Self {
            db,
            services,
            admin: Actor::new(admin.id, Role::Admin),
        }
    }

    pub async fn register(&self, name: &str) -> User {
        self.services
            .auth()
            .register(Registration {
                name: name.to_string(),
                email: format!("{}@salon.test", name.to_lowercase()),
                password: PASSWORD.to_string(),
                phone: None,
            })
            .await
            .expect("register user")
    }

    pub async fn customer(&self, name: &str) -> Actor {
        let user = self.register(name).await;
        Actor::new(user.id, Role::Customer)
    }

    /// Apply, get approved and come back as a salon owner.
    pub async fn owner(&self, name: &str) -> Actor {
        let user = self.register(name).await;
        let applicant = Actor::new(user.id, Role::Customer);
        let application = self
            .services
            .applications()
            .apply(
                applicant,
                BusinessDetails {
                    business_name: Some(format!("{name} Studio")),
                    ..Default::default()
                },
            )
            .await
            .expect("apply");
        self.services
            .applications()
            .approve(self.admin, application.id)
            .await
            .expect("approve");
        Actor::new(user.id, Role::SalonOwner)
    }

    /// An ACTIVE salon with one service, `staff` staff members and
    /// `counters` counters.
    pub async fn salon(&self, owner: Actor, name: &str, staff: usize, counters: usize) -> SalonSetup {
        let salon = self
            .services
            .salons()
            .create(owner, new_salon(name))
            .await
            .expect("create salon");
        let salon = self
            .services
            .salons()
            .set_status(self.admin, salon.id, SalonStatus::Active)
            .await
            .expect("activate salon");

        let service = self
            .services
            .catalog()
            .create(
                owner,
                NewSalonService {
                    salon_id: salon.id,
                    name: "Haircut".into(),
                    description: None,
                    category: ServiceCategory::Haircut,
                    price: 25.0,
                    duration: 30,
                    images: Vec::new(),
                },
            )
            .await
            .expect("create service");

        let mut members = Vec::new();
        for i in 0..staff {
            let user = self.register(&format!("{name}Stylist{i}")).await;
            let member = self
                .services
                .staff()
                .add(
                    owner,
                    NewStaff {
                        user_id: user.id,
                        salon_id: salon.id,
                        speciality: Some("Cuts".into()),
                        experience: Some(3),
                        bio: None,
                    },
                    vec![service.id],
                )
                .await
                .expect("add staff");
            members.push((Actor::new(user.id, Role::Staff), member));
        }

        let mut stations = Vec::new();
        for i in 0..counters {
            let counter = self
                .services
                .counters()
                .create(owner, salon.id, format!("Chair {}", i + 1), Some(format!("C{}", i + 1)))
                .await
                .expect("create counter");
            stations.push(counter);
        }

        SalonSetup {
            owner,
            salon,
            service,
            staff: members,
            counters: stations,
        }
    }
}

pub struct SalonSetup {
    pub owner: Actor,
    pub salon: Salon,
    pub service: SalonService,
    pub staff: Vec<(Actor, Staff)>,
    pub counters: Vec<Counter>,
}

impl SalonSetup {
    pub fn booking(&self, staff: usize, counter: usize, start_time: &str) -> BookingRequest {
        BookingRequest {
            salon_id: self.salon.id,
            service_id: self.service.id,
            staff_id: self.staff[staff].1.id,
            counter_id: self.counters[counter].id,
            appointment_date: day(),
            start_time: start_time.to_string(),
            notes: None,
        }
    }
}

pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 3, 14).expect("valid date")
}

pub fn new_salon(name: &str) -> NewSalon {
    NewSalon {
        owner_id: uuid::Uuid::nil(),
        name: name.to_string(),
        description: None,
        address: "12 Market Street".into(),
        city: "Dhaka".into(),
        state: None,
        zip_code: None,
        phone: "+8801712345678".into(),
        email: None,
        images: Vec::new(),
        operating_hours: None,
    }
}
