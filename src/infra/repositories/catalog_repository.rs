//! Salon service catalog repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::{images_to_json, service};
use super::fetch_page;
use crate::domain::{NewSalonService, SalonService, SalonServiceChanges, ServiceCategory};
use crate::errors::{AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, Clone, Default)]
pub struct ServiceFilter {
    /// Matched against name and description
    pub search: Option<String>,
    pub salon_id: Option<Uuid>,
    pub category: Option<ServiceCategory>,
    pub include_inactive: bool,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn create(&self, service: NewSalonService) -> AppResult<SalonService>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SalonService>>;

    async fn list(
        &self,
        filter: ServiceFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<SalonService>, u64)>;

    async fn update(&self, id: Uuid, changes: SalonServiceChanges) -> AppResult<SalonService>;

    async fn soft_delete(&self, id: Uuid) -> AppResult<()>;

    /// Which of `ids` are live services of `salon_id`.
    async fn ids_in_salon(&self, salon_id: Uuid, ids: Vec<Uuid>) -> AppResult<Vec<Uuid>>;

    async fn count_in_salons(&self, salon_ids: Vec<Uuid>) -> AppResult<u64>;
}

pub struct CatalogQueries<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> CatalogQueries<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    async fn find_model(&self, id: Uuid) -> AppResult<service::Model> {
        service::Entity::find_by_id(id)
            .filter(service::Column::DeletedAt.is_null())
            .one(self.conn)
            .await?
            .ok_or_not_found("Service")
    }

    pub async fn create(&self, new_service: NewSalonService) -> AppResult<SalonService> {
        let now = Utc::now();
        let model = service::ActiveModel {
            id: Set(Uuid::new_v4()),
            salon_id: Set(new_service.salon_id),
            name: Set(new_service.name),
            description: Set(new_service.description),
            category: Set(new_service.category.to_string()),
            price: Set(new_service.price),
            duration: Set(new_service.duration),
            images: Set(images_to_json(&new_service.images)),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(self.conn)
        .await?;

        SalonService::try_from(model)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SalonService>> {
        service::Entity::find_by_id(id)
            .filter(service::Column::DeletedAt.is_null())
            .one(self.conn)
            .await?
            .map(SalonService::try_from)
            .transpose()
    }

    pub async fn list(
        &self,
        filter: ServiceFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<SalonService>, u64)> {
        let mut query = service::Entity::find().filter(service::Column::DeletedAt.is_null());

        if !filter.include_inactive {
            query = query.filter(service::Column::IsActive.eq(true));
        }
        if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(service::Column::Name.contains(term))
                    .add(service::Column::Description.contains(term)),
            );
        }
        if let Some(salon_id) = filter.salon_id {
            query = query.filter(service::Column::SalonId.eq(salon_id));
        }
        if let Some(category) = filter.category {
            query = query.filter(service::Column::Category.eq(category.as_str()));
        }

        let query = query.order_by_desc(service::Column::CreatedAt);
        let (models, total) = fetch_page(self.conn, query, page).await?;
        let services = models
            .into_iter()
            .map(SalonService::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((services, total))
    }

    pub async fn update(&self, id: Uuid, changes: SalonServiceChanges) -> AppResult<SalonService> {
        let mut active: service::ActiveModel = self.find_model(id).await?.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        if let Some(category) = changes.category {
            active.category = Set(category.to_string());
        }
        if let Some(price) = changes.price {
            active.price = Set(price);
        }
        if let Some(duration) = changes.duration {
            active.duration = Set(duration);
        }
        if let Some(images) = changes.images {
            active.images = Set(images_to_json(&images));
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());

        SalonService::try_from(active.update(self.conn).await?)
    }

    pub async fn soft_delete(&self, id: Uuid) -> AppResult<()> {
        let mut active: service::ActiveModel = self.find_model(id).await?.into();
        let now = Utc::now();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(self.conn).await?;
        Ok(())
    }

    pub async fn ids_in_salon(&self, salon_id: Uuid, ids: Vec<Uuid>) -> AppResult<Vec<Uuid>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(service::Entity::find()
            .select_only()
            .column(service::Column::Id)
            .filter(service::Column::SalonId.eq(salon_id))
            .filter(service::Column::Id.is_in(ids))
            .filter(service::Column::DeletedAt.is_null())
            .into_tuple::<Uuid>()
            .all(self.conn)
            .await?)
    }

    pub async fn count_in_salons(&self, salon_ids: Vec<Uuid>) -> AppResult<u64> {
        if salon_ids.is_empty() {
            return Ok(0);
        }
        Ok(service::Entity::find()
            .filter(service::Column::SalonId.is_in(salon_ids))
            .filter(service::Column::DeletedAt.is_null())
            .count(self.conn)
            .await?)
    }
}

pub struct CatalogStore {
    db: DatabaseConnection,
}

impl CatalogStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn queries(&self) -> CatalogQueries<'_, DatabaseConnection> {
        CatalogQueries::new(&self.db)
    }
}

#[async_trait]
impl CatalogRepository for CatalogStore {
    async fn create(&self, service: NewSalonService) -> AppResult<SalonService> {
        self.queries().create(service).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SalonService>> {
        self.queries().find_by_id(id).await
    }

    async fn list(
        &self,
        filter: ServiceFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<SalonService>, u64)> {
        self.queries().list(filter, page).await
    }

    async fn update(&self, id: Uuid, changes: SalonServiceChanges) -> AppResult<SalonService> {
        self.queries().update(id, changes).await
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<()> {
        self.queries().soft_delete(id).await
    }

    async fn ids_in_salon(&self, salon_id: Uuid, ids: Vec<Uuid>) -> AppResult<Vec<Uuid>> {
        self.queries().ids_in_salon(salon_id, ids).await
    }

    async fn count_in_salons(&self, salon_ids: Vec<Uuid>) -> AppResult<u64> {
        self.queries().count_in_salons(salon_ids).await
    }
}
