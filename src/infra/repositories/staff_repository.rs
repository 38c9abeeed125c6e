//! Staff repository. A staff row is loaded together with its service links.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::{staff, staff_service};
use super::fetch_page;
use crate::domain::{NewStaff, RatingSummary, Staff, StaffChanges, StaffStatus};
use crate::errors::{AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, Clone, Default)]
pub struct StaffFilter {
    pub salon_id: Option<Uuid>,
    pub status: Option<StaffStatus>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StaffRepository: Send + Sync {
    async fn create(&self, staff: NewStaff, service_ids: Vec<Uuid>) -> AppResult<Staff>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Staff>>;

    /// The live staff profile of a user, if any.
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<Staff>>;

    async fn list(&self, filter: StaffFilter, page: PaginationParams)
        -> AppResult<(Vec<Staff>, u64)>;

    /// `service_ids`, when given, replaces every existing link.
    async fn update(
        &self,
        id: Uuid,
        changes: StaffChanges,
        service_ids: Option<Vec<Uuid>>,
    ) -> AppResult<Staff>;

    async fn set_rating(&self, id: Uuid, rating: RatingSummary) -> AppResult<()>;

    async fn soft_delete(&self, id: Uuid) -> AppResult<()>;

    async fn count_in_salons(&self, salon_ids: Vec<Uuid>) -> AppResult<u64>;
}

pub struct StaffQueries<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> StaffQueries<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    async fn find_model(&self, id: Uuid) -> AppResult<staff::Model> {
        staff::Entity::find_by_id(id)
            .filter(staff::Column::DeletedAt.is_null())
            .one(self.conn)
            .await?
            .ok_or_not_found("Staff")
    }

    async fn service_links(&self, staff_ids: Vec<Uuid>) -> AppResult<HashMap<Uuid, Vec<Uuid>>> {
        let mut links: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        if staff_ids.is_empty() {
            return Ok(links);
        }

        let rows = staff_service::Entity::find()
            .filter(staff_service::Column::StaffId.is_in(staff_ids))
            .all(self.conn)
            .await?;
        for row in rows {
            links.entry(row.staff_id).or_default().push(row.service_id);
        }
        Ok(links)
    }

    async fn with_links(&self, model: staff::Model) -> AppResult<Staff> {
        let mut links = self.service_links(vec![model.id]).await?;
        let service_ids = links.remove(&model.id).unwrap_or_default();
        model.into_domain(service_ids)
    }

    async fn replace_links(&self, staff_id: Uuid, service_ids: Vec<Uuid>) -> AppResult<()> {
        staff_service::Entity::delete_many()
            .filter(staff_service::Column::StaffId.eq(staff_id))
            .exec(self.conn)
            .await?;

        if service_ids.is_empty() {
            return Ok(());
        }

        let rows = service_ids
            .into_iter()
            .map(|service_id| staff_service::ActiveModel {
                staff_id: Set(staff_id),
                service_id: Set(service_id),
            });
        staff_service::Entity::insert_many(rows)
            .exec_without_returning(self.conn)
            .await?;
        Ok(())
    }

    pub async fn create(&self, new_staff: NewStaff, service_ids: Vec<Uuid>) -> AppResult<Staff> {
        let now = Utc::now();
        let model = staff::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(new_staff.user_id),
            salon_id: Set(new_staff.salon_id),
            speciality: Set(new_staff.speciality),
            experience: Set(new_staff.experience),
            bio: Set(new_staff.bio),
            status: Set(StaffStatus::Available.to_string()),
            rating: Set(0.0),
            total_reviews: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(self.conn)
        .await?;

        self.replace_links(model.id, service_ids.clone()).await?;
        model.into_domain(service_ids)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Staff>> {
        let model = staff::Entity::find_by_id(id)
            .filter(staff::Column::DeletedAt.is_null())
            .one(self.conn)
            .await?;

        match model {
            Some(model) => self.with_links(model).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<Staff>> {
        let model = staff::Entity::find()
            .filter(staff::Column::UserId.eq(user_id))
            .filter(staff::Column::DeletedAt.is_null())
            .one(self.conn)
            .await?;

        match model {
            Some(model) => self.with_links(model).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn list(
        &self,
        filter: StaffFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<Staff>, u64)> {
        let mut query = staff::Entity::find().filter(staff::Column::DeletedAt.is_null());

        if let Some(salon_id) = filter.salon_id {
            query = query.filter(staff::Column::SalonId.eq(salon_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(staff::Column::Status.eq(status.as_str()));
        }

        let query = query.order_by_desc(staff::Column::CreatedAt);
        let (models, total) = fetch_page(self.conn, query, page).await?;

        let mut links = self
            .service_links(models.iter().map(|m| m.id).collect())
            .await?;
        let members = models
            .into_iter()
            .map(|model| {
                let service_ids = links.remove(&model.id).unwrap_or_default();
                model.into_domain(service_ids)
            })
            .collect::<AppResult<Vec<_>>>()?;
        Ok((members, total))
    }

    pub async fn update(
        &self,
        id: Uuid,
        changes: StaffChanges,
        service_ids: Option<Vec<Uuid>>,
    ) -> AppResult<Staff> {
        let mut active: staff::ActiveModel = self.find_model(id).await?.into();

        if let Some(speciality) = changes.speciality {
            active.speciality = Set(Some(speciality));
        }
        if let Some(experience) = changes.experience {
            active.experience = Set(Some(experience));
        }
        if let Some(bio) = changes.bio {
            active.bio = Set(Some(bio));
        }
        if let Some(status) = changes.status {
            active.status = Set(status.to_string());
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(self.conn).await?;
        if let Some(service_ids) = service_ids {
            self.replace_links(id, service_ids).await?;
        }
        self.with_links(model).await
    }

    pub async fn set_rating(&self, id: Uuid, rating: RatingSummary) -> AppResult<()> {
        let mut active: staff::ActiveModel = self.find_model(id).await?.into();
        active.rating = Set(rating.average);
        active.total_reviews = Set(rating.count);
        active.updated_at = Set(Utc::now());
        active.update(self.conn).await?;
        Ok(())
    }

    pub async fn soft_delete(&self, id: Uuid) -> AppResult<()> {
        let mut active: staff::ActiveModel = self.find_model(id).await?.into();
        let now = Utc::now();
        active.status = Set(StaffStatus::Inactive.to_string());
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(self.conn).await?;
        Ok(())
    }

    pub async fn count_in_salons(&self, salon_ids: Vec<Uuid>) -> AppResult<u64> {
        if salon_ids.is_empty() {
            return Ok(0);
        }
        Ok(staff::Entity::find()
            .filter(staff::Column::SalonId.is_in(salon_ids))
            .filter(staff::Column::DeletedAt.is_null())
            .count(self.conn)
            .await?)
    }
}

pub struct StaffStore {
    db: DatabaseConnection,
}

impl StaffStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn queries(&self) -> StaffQueries<'_, DatabaseConnection> {
        StaffQueries::new(&self.db)
    }
}

#[async_trait]
impl StaffRepository for StaffStore {
    async fn create(&self, staff: NewStaff, service_ids: Vec<Uuid>) -> AppResult<Staff> {
        self.queries().create(staff, service_ids).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Staff>> {
        self.queries().find_by_id(id).await
    }

    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<Staff>> {
        self.queries().find_by_user(user_id).await
    }

    async fn list(
        &self,
        filter: StaffFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<Staff>, u64)> {
        self.queries().list(filter, page).await
    }

    async fn update(
        &self,
        id: Uuid,
        changes: StaffChanges,
        service_ids: Option<Vec<Uuid>>,
    ) -> AppResult<Staff> {
        self.queries().update(id, changes, service_ids).await
    }

    async fn set_rating(&self, id: Uuid, rating: RatingSummary) -> AppResult<()> {
        self.queries().set_rating(id, rating).await
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<()> {
        self.queries().soft_delete(id).await
    }

    async fn count_in_salons(&self, salon_ids: Vec<Uuid>) -> AppResult<u64> {
        self.queries().count_in_salons(salon_ids).await
    }
}
