//! Salon repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::{images_to_json, parse_column, salon};
use super::fetch_page;
use crate::domain::{NewSalon, RatingSummary, Salon, SalonChanges, SalonStatus};
use crate::errors::{AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, Clone, Default)]
pub struct SalonFilter {
    /// Matched against name, description and city
    pub search: Option<String>,
    pub city: Option<String>,
    pub status: Option<SalonStatus>,
    pub owner_id: Option<Uuid>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SalonRepository: Send + Sync {
    /// New salons start out PENDING_APPROVAL.
    async fn create(&self, salon: NewSalon) -> AppResult<Salon>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Salon>>;

    async fn list(&self, filter: SalonFilter, page: PaginationParams)
        -> AppResult<(Vec<Salon>, u64)>;

    /// Ids of the live salons held by one owner profile.
    async fn ids_owned_by(&self, owner_id: Uuid) -> AppResult<Vec<Uuid>>;

    async fn update(&self, id: Uuid, changes: SalonChanges) -> AppResult<Salon>;

    async fn set_status(&self, id: Uuid, status: SalonStatus) -> AppResult<Salon>;

    async fn set_rating(&self, id: Uuid, rating: RatingSummary) -> AppResult<()>;

    async fn soft_delete(&self, id: Uuid) -> AppResult<()>;

    async fn count(&self) -> AppResult<u64>;

    async fn count_by_status(&self) -> AppResult<Vec<(SalonStatus, u64)>>;
}

pub struct SalonQueries<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> SalonQueries<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    async fn find_model(&self, id: Uuid) -> AppResult<salon::Model> {
        salon::Entity::find_by_id(id)
            .filter(salon::Column::DeletedAt.is_null())
            .one(self.conn)
            .await?
            .ok_or_not_found("Salon")
    }

    pub async fn create(&self, new_salon: NewSalon) -> AppResult<Salon> {
        let now = Utc::now();
        let model = salon::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(new_salon.owner_id),
            name: Set(new_salon.name),
            description: Set(new_salon.description),
            address: Set(new_salon.address),
            city: Set(new_salon.city),
            state: Set(new_salon.state),
            zip_code: Set(new_salon.zip_code),
            phone: Set(new_salon.phone),
            email: Set(new_salon.email),
            images: Set(images_to_json(&new_salon.images)),
            operating_hours: Set(new_salon.operating_hours),
            status: Set(SalonStatus::PendingApproval.to_string()),
            rating: Set(0.0),
            total_reviews: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(self.conn)
        .await?;

        Salon::try_from(model)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Salon>> {
        salon::Entity::find_by_id(id)
            .filter(salon::Column::DeletedAt.is_null())
            .one(self.conn)
            .await?
            .map(Salon::try_from)
            .transpose()
    }

    pub async fn list(
        &self,
        filter: SalonFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<Salon>, u64)> {
        let mut query = salon::Entity::find().filter(salon::Column::DeletedAt.is_null());

        if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(salon::Column::Name.contains(term))
                    .add(salon::Column::Description.contains(term))
                    .add(salon::Column::City.contains(term)),
            );
        }
        if let Some(city) = filter.city {
            query = query.filter(salon::Column::City.eq(city));
        }
        if let Some(status) = filter.status {
            query = query.filter(salon::Column::Status.eq(status.as_str()));
        }
        if let Some(owner_id) = filter.owner_id {
            query = query.filter(salon::Column::OwnerId.eq(owner_id));
        }

        let query = query.order_by_desc(salon::Column::CreatedAt);
        let (models, total) = fetch_page(self.conn, query, page).await?;
        let salons = models
            .into_iter()
            .map(Salon::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((salons, total))
    }

    pub async fn ids_owned_by(&self, owner_id: Uuid) -> AppResult<Vec<Uuid>> {
        Ok(salon::Entity::find()
            .select_only()
            .column(salon::Column::Id)
            .filter(salon::Column::OwnerId.eq(owner_id))
            .filter(salon::Column::DeletedAt.is_null())
            .into_tuple::<Uuid>()
            .all(self.conn)
            .await?)
    }

    pub async fn update(&self, id: Uuid, changes: SalonChanges) -> AppResult<Salon> {
        let mut active: salon::ActiveModel = self.find_model(id).await?.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        if let Some(address) = changes.address {
            active.address = Set(address);
        }
        if let Some(city) = changes.city {
            active.city = Set(city);
        }
        if let Some(state) = changes.state {
            active.state = Set(Some(state));
        }
        if let Some(zip_code) = changes.zip_code {
            active.zip_code = Set(Some(zip_code));
        }
        if let Some(phone) = changes.phone {
            active.phone = Set(phone);
        }
        if let Some(email) = changes.email {
            active.email = Set(Some(email));
        }
        if let Some(images) = changes.images {
            active.images = Set(images_to_json(&images));
        }
        if let Some(hours) = changes.operating_hours {
            active.operating_hours = Set(Some(hours));
        }
        active.updated_at = Set(Utc::now());

        Salon::try_from(active.update(self.conn).await?)
    }

    pub async fn set_status(&self, id: Uuid, status: SalonStatus) -> AppResult<Salon> {
        let mut active: salon::ActiveModel = self.find_model(id).await?.into();
        active.status = Set(status.to_string());
        active.updated_at = Set(Utc::now());
        Salon::try_from(active.update(self.conn).await?)
    }

    pub async fn set_rating(&self, id: Uuid, rating: RatingSummary) -> AppResult<()> {
        let mut active: salon::ActiveModel = self.find_model(id).await?.into();
        active.rating = Set(rating.average);
        active.total_reviews = Set(rating.count);
        active.updated_at = Set(Utc::now());
        active.update(self.conn).await?;
        Ok(())
    }

    pub async fn soft_delete(&self, id: Uuid) -> AppResult<()> {
        let mut active: salon::ActiveModel = self.find_model(id).await?.into();
        let now = Utc::now();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(self.conn).await?;
        Ok(())
    }

    pub async fn count(&self) -> AppResult<u64> {
        Ok(salon::Entity::find()
            .filter(salon::Column::DeletedAt.is_null())
            .count(self.conn)
            .await?)
    }

    pub async fn count_by_status(&self) -> AppResult<Vec<(SalonStatus, u64)>> {
        let rows = salon::Entity::find()
            .select_only()
            .column(salon::Column::Status)
            .column_as(salon::Column::Id.count(), "count")
            .filter(salon::Column::DeletedAt.is_null())
            .group_by(salon::Column::Status)
            .into_tuple::<(String, i64)>()
            .all(self.conn)
            .await?;

        rows.into_iter()
            .map(|(status, count)| {
                Ok((parse_column(&status, "salons.status")?, count.max(0) as u64))
            })
            .collect()
    }
}

pub struct SalonStore {
    db: DatabaseConnection,
}

impl SalonStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn queries(&self) -> SalonQueries<'_, DatabaseConnection> {
        SalonQueries::new(&self.db)
    }
}

#[async_trait]
impl SalonRepository for SalonStore {
    async fn create(&self, salon: NewSalon) -> AppResult<Salon> {
        self.queries().create(salon).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Salon>> {
        self.queries().find_by_id(id).await
    }

    async fn list(
        &self,
        filter: SalonFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<Salon>, u64)> {
        self.queries().list(filter, page).await
    }

    async fn ids_owned_by(&self, owner_id: Uuid) -> AppResult<Vec<Uuid>> {
        self.queries().ids_owned_by(owner_id).await
    }

    async fn update(&self, id: Uuid, changes: SalonChanges) -> AppResult<Salon> {
        self.queries().update(id, changes).await
    }

    async fn set_status(&self, id: Uuid, status: SalonStatus) -> AppResult<Salon> {
        self.queries().set_status(id, status).await
    }

    async fn set_rating(&self, id: Uuid, rating: RatingSummary) -> AppResult<()> {
        self.queries().set_rating(id, rating).await
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<()> {
        self.queries().soft_delete(id).await
    }

    async fn count(&self) -> AppResult<u64> {
        self.queries().count().await
    }

    async fn count_by_status(&self) -> AppResult<Vec<(SalonStatus, u64)>> {
        self.queries().count_by_status().await
    }
}
