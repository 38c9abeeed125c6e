//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_table;
mod m20240102_000001_create_salons_table;
mod m20240103_000001_create_staff_table;
mod m20240104_000001_create_appointments_table;
mod m20240105_000001_create_payments_and_reviews;
mod m20240106_000001_add_soft_delete_indexes;

pub use m20240104_000001_create_appointments_table::{COUNTER_SLOT_INDEX, STAFF_SLOT_INDEX};

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240102_000001_create_salons_table::Migration),
            Box::new(m20240103_000001_create_staff_table::Migration),
            Box::new(m20240104_000001_create_appointments_table::Migration),
            Box::new(m20240105_000001_create_payments_and_reviews::Migration),
            Box::new(m20240106_000001_add_soft_delete_indexes::Migration),
        ]
    }
}
