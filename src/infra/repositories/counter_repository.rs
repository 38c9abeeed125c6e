//! Counter repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::counter;
use crate::domain::Counter;
use crate::errors::{AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CounterRepository: Send + Sync {
    async fn create(&self, salon_id: Uuid, name: String, code: Option<String>)
        -> AppResult<Counter>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Counter>>;

    async fn list_by_salon(&self, salon_id: Uuid) -> AppResult<Vec<Counter>>;

    /// Whether a live counter of the salon already uses `code`.
    async fn code_taken(&self, salon_id: Uuid, code: String) -> AppResult<bool>;

    async fn soft_delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct CounterQueries<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> CounterQueries<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn create(
        &self,
        salon_id: Uuid,
        name: String,
        code: Option<String>,
    ) -> AppResult<Counter> {
        let now = Utc::now();
        let model = counter::ActiveModel {
            id: Set(Uuid::new_v4()),
            salon_id: Set(salon_id),
            name: Set(name),
            code: Set(code),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(self.conn)
        .await?;

        Ok(Counter::from(model))
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Counter>> {
        Ok(counter::Entity::find_by_id(id)
            .filter(counter::Column::DeletedAt.is_null())
            .one(self.conn)
            .await?
            .map(Counter::from))
    }

    pub async fn list_by_salon(&self, salon_id: Uuid) -> AppResult<Vec<Counter>> {
        Ok(counter::Entity::find()
            .filter(counter::Column::SalonId.eq(salon_id))
            .filter(counter::Column::DeletedAt.is_null())
            .order_by_asc(counter::Column::Name)
            .all(self.conn)
            .await?
            .into_iter()
            .map(Counter::from)
            .collect())
    }

    pub async fn code_taken(&self, salon_id: Uuid, code: String) -> AppResult<bool> {
        let matches = counter::Entity::find()
            .filter(counter::Column::SalonId.eq(salon_id))
            .filter(counter::Column::Code.eq(code))
            .filter(counter::Column::DeletedAt.is_null())
            .count(self.conn)
            .await?;
        Ok(matches > 0)
    }

    pub async fn soft_delete(&self, id: Uuid) -> AppResult<()> {
        let model = counter::Entity::find_by_id(id)
            .filter(counter::Column::DeletedAt.is_null())
            .one(self.conn)
            .await?
            .ok_or_not_found("Counter")?;

        let mut active: counter::ActiveModel = model.into();
        let now = Utc::now();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(self.conn).await?;
        Ok(())
    }
}

pub struct CounterStore {
    db: DatabaseConnection,
}

impl CounterStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn queries(&self) -> CounterQueries<'_, DatabaseConnection> {
        CounterQueries::new(&self.db)
    }
}

#[async_trait]
impl CounterRepository for CounterStore {
    async fn create(
        &self,
        salon_id: Uuid,
        name: String,
        code: Option<String>,
    ) -> AppResult<Counter> {
        self.queries().create(salon_id, name, code).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Counter>> {
        self.queries().find_by_id(id).await
    }

    async fn list_by_salon(&self, salon_id: Uuid) -> AppResult<Vec<Counter>> {
        self.queries().list_by_salon(salon_id).await
    }

    async fn code_taken(&self, salon_id: Uuid, code: String) -> AppResult<bool> {
        self.queries().code_taken(salon_id, code).await
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<()> {
        self.queries().soft_delete(id).await
    }
}
