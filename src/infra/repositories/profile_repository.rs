//! Role profiles: salon owner applications and administrator records.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::{admin, salon_owner};
use super::fetch_page;
use crate::domain::{AdminProfile, ApplicationStatus, BusinessDetails, SalonOwner};
use crate::errors::{AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, Clone, Default)]
pub struct ApplicationFilter {
    pub status: Option<ApplicationStatus>,
    /// Matched against business name and business email
    pub search: Option<String>,
}

/// Outcome recorded on an application.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationDecision {
    pub status: ApplicationStatus,
    pub verified: bool,
    pub rejection_reason: Option<String>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_owner(&self, id: Uuid) -> AppResult<Option<SalonOwner>>;

    async fn find_owner_by_user(&self, user_id: Uuid) -> AppResult<Option<SalonOwner>>;

    async fn list_applications(
        &self,
        filter: ApplicationFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<SalonOwner>, u64)>;

    /// Insert a PENDING application, or overwrite the user's existing one
    /// back to PENDING with the new details.
    async fn submit_application(
        &self,
        user_id: Uuid,
        details: BusinessDetails,
    ) -> AppResult<SalonOwner>;

    async fn decide_application(
        &self,
        id: Uuid,
        decision: ApplicationDecision,
    ) -> AppResult<SalonOwner>;

    /// Owner profile for a role granted directly by an admin.
    async fn create_verified_owner(&self, user_id: Uuid) -> AppResult<SalonOwner>;

    async fn find_admin_by_user(&self, user_id: Uuid) -> AppResult<Option<AdminProfile>>;

    async fn create_admin(&self, user_id: Uuid) -> AppResult<AdminProfile>;
}

pub struct ProfileQueries<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> ProfileQueries<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn find_owner(&self, id: Uuid) -> AppResult<Option<SalonOwner>> {
        salon_owner::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .map(SalonOwner::try_from)
            .transpose()
    }

    pub async fn find_owner_by_user(&self, user_id: Uuid) -> AppResult<Option<SalonOwner>> {
        salon_owner::Entity::find()
            .filter(salon_owner::Column::UserId.eq(user_id))
            .one(self.conn)
            .await?
            .map(SalonOwner::try_from)
            .transpose()
    }

    pub async fn list_applications(
        &self,
        filter: ApplicationFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<SalonOwner>, u64)> {
        let mut query = salon_owner::Entity::find();

        if let Some(status) = filter.status {
            query = query.filter(salon_owner::Column::ApplicationStatus.eq(status.as_str()));
        }
        if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(salon_owner::Column::BusinessName.contains(term))
                    .add(salon_owner::Column::BusinessEmail.contains(term)),
            );
        }

        let query = query.order_by_desc(salon_owner::Column::CreatedAt);
        let (models, total) = fetch_page(self.conn, query, page).await?;
        let owners = models
            .into_iter()
            .map(SalonOwner::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((owners, total))
    }

    pub async fn submit_application(
        &self,
        user_id: Uuid,
        details: BusinessDetails,
    ) -> AppResult<SalonOwner> {
        let now = Utc::now();
        let existing = salon_owner::Entity::find()
            .filter(salon_owner::Column::UserId.eq(user_id))
            .one(self.conn)
            .await?;

        let is_new = existing.is_none();
        let mut active: salon_owner::ActiveModel = match existing {
            Some(model) => model.into(),
            None => salon_owner::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(user_id),
                created_at: Set(now),
                ..Default::default()
            },
        };

        active.business_name = Set(details.business_name);
        active.business_address = Set(details.business_address);
        active.business_phone = Set(details.business_phone);
        active.business_email = Set(details.business_email);
        active.document_url = Set(details.document_url);
        active.application_status = Set(ApplicationStatus::Pending.to_string());
        active.verification_status = Set(false);
        active.rejection_reason = Set(None);
        active.updated_at = Set(now);

        let model = if is_new {
            active.insert(self.conn).await?
        } else {
            active.update(self.conn).await?
        };
        SalonOwner::try_from(model)
    }

    pub async fn decide_application(
        &self,
        id: Uuid,
        decision: ApplicationDecision,
    ) -> AppResult<SalonOwner> {
        let model = salon_owner::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_not_found("Application")?;

        let mut active: salon_owner::ActiveModel = model.into();
        active.application_status = Set(decision.status.to_string());
        active.verification_status = Set(decision.verified);
        active.rejection_reason = Set(decision.rejection_reason);
        active.updated_at = Set(Utc::now());

        SalonOwner::try_from(active.update(self.conn).await?)
    }

    pub async fn create_verified_owner(&self, user_id: Uuid) -> AppResult<SalonOwner> {
        let now = Utc::now();
        let model = salon_owner::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            business_name: Set(None),
            business_address: Set(None),
            business_phone: Set(None),
            business_email: Set(None),
            document_url: Set(None),
            application_status: Set(ApplicationStatus::Approved.to_string()),
            verification_status: Set(true),
            rejection_reason: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.conn)
        .await?;

        SalonOwner::try_from(model)
    }

    pub async fn find_admin_by_user(&self, user_id: Uuid) -> AppResult<Option<AdminProfile>> {
        Ok(admin::Entity::find()
            .filter(admin::Column::UserId.eq(user_id))
            .one(self.conn)
            .await?
            .map(AdminProfile::from))
    }

    pub async fn create_admin(&self, user_id: Uuid) -> AppResult<AdminProfile> {
        let model = admin::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            created_at: Set(Utc::now()),
        }
        .insert(self.conn)
        .await?;

        Ok(AdminProfile::from(model))
    }
}

pub struct ProfileStore {
    db: DatabaseConnection,
}

impl ProfileStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn queries(&self) -> ProfileQueries<'_, DatabaseConnection> {
        ProfileQueries::new(&self.db)
    }
}

#[async_trait]
impl ProfileRepository for ProfileStore {
    async fn find_owner(&self, id: Uuid) -> AppResult<Option<SalonOwner>> {
        self.queries().find_owner(id).await
    }

    async fn find_owner_by_user(&self, user_id: Uuid) -> AppResult<Option<SalonOwner>> {
        self.queries().find_owner_by_user(user_id).await
    }

    async fn list_applications(
        &self,
        filter: ApplicationFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<SalonOwner>, u64)> {
        self.queries().list_applications(filter, page).await
    }

    async fn submit_application(
        &self,
        user_id: Uuid,
        details: BusinessDetails,
    ) -> AppResult<SalonOwner> {
        self.queries().submit_application(user_id, details).await
    }

    async fn decide_application(
        &self,
        id: Uuid,
        decision: ApplicationDecision,
    ) -> AppResult<SalonOwner> {
        self.queries().decide_application(id, decision).await
    }

    async fn create_verified_owner(&self, user_id: Uuid) -> AppResult<SalonOwner> {
        self.queries().create_verified_owner(user_id).await
    }

    async fn find_admin_by_user(&self, user_id: Uuid) -> AppResult<Option<AdminProfile>> {
        self.queries().find_admin_by_user(user_id).await
    }

    async fn create_admin(&self, user_id: Uuid) -> AppResult<AdminProfile> {
        self.queries().create_admin(user_id).await
    }
}
