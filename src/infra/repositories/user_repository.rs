//! User repository with soft delete support.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::fetch_page;
use crate::domain::{NewUser, ProfileChanges, Role, User, UserStatus};
use crate::errors::{AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Filters for the admin user listing.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Matched against name, email and phone
    pub search: Option<String>,
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
}

/// User repository trait for dependency injection.
///
/// All queries exclude soft-deleted users unless the name says otherwise.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Includes soft-deleted accounts; an address is never reused.
    async fn find_by_email_with_deleted(&self, email: &str) -> AppResult<Option<User>>;

    async fn create(&self, user: NewUser) -> AppResult<User>;

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> AppResult<User>;

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<()>;

    async fn set_status(&self, id: Uuid, status: UserStatus) -> AppResult<User>;

    async fn set_role(&self, id: Uuid, role: Role) -> AppResult<User>;

    /// Sets `deleted_at` and moves the account to DELETED.
    async fn soft_delete(&self, id: Uuid) -> AppResult<()>;

    async fn list(&self, filter: UserFilter, page: PaginationParams)
        -> AppResult<(Vec<User>, u64)>;

    async fn count(&self) -> AppResult<u64>;
}

/// User queries over any connection, pooled or transactional.
pub struct UserQueries<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> UserQueries<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    async fn find_model(&self, id: Uuid) -> AppResult<user::Model> {
        UserEntity::find_by_id(id)
            .filter(user::Column::DeletedAt.is_null())
            .one(self.conn)
            .await?
            .ok_or_not_found("User")
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        UserEntity::find_by_id(id)
            .filter(user::Column::DeletedAt.is_null())
            .one(self.conn)
            .await?
            .map(User::try_from)
            .transpose()
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .filter(user::Column::DeletedAt.is_null())
            .one(self.conn)
            .await?
            .map(User::try_from)
            .transpose()
    }

    pub async fn find_by_email_with_deleted(&self, email: &str) -> AppResult<Option<User>> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.conn)
            .await?
            .map(User::try_from)
            .transpose()
    }

    pub async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            name: Set(new_user.name),
            phone: Set(new_user.phone),
            gender: Set(None),
            date_of_birth: Set(None),
            address: Set(None),
            profile_photo: Set(None),
            role: Set(new_user.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(self.conn)
        .await?;

        User::try_from(model)
    }

    pub async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> AppResult<User> {
        let mut active: ActiveModel = self.find_model(id).await?.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(phone) = changes.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(gender) = changes.gender {
            active.gender = Set(Some(gender.to_string()));
        }
        if let Some(date_of_birth) = changes.date_of_birth {
            active.date_of_birth = Set(Some(date_of_birth));
        }
        if let Some(address) = changes.address {
            active.address = Set(Some(address));
        }
        if let Some(photo) = changes.profile_photo {
            active.profile_photo = Set(Some(photo));
        }
        active.updated_at = Set(Utc::now());

        User::try_from(active.update(self.conn).await?)
    }

    pub async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<()> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(Utc::now());
        active.update(self.conn).await?;
        Ok(())
    }

    pub async fn set_status(&self, id: Uuid, status: UserStatus) -> AppResult<User> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.status = Set(status.to_string());
        active.updated_at = Set(Utc::now());
        User::try_from(active.update(self.conn).await?)
    }

    pub async fn set_role(&self, id: Uuid, role: Role) -> AppResult<User> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.role = Set(role.to_string());
        active.updated_at = Set(Utc::now());
        User::try_from(active.update(self.conn).await?)
    }

    pub async fn soft_delete(&self, id: Uuid) -> AppResult<()> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        let now = Utc::now();
        active.status = Set(UserStatus::Deleted.to_string());
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(self.conn).await?;
        Ok(())
    }

    pub async fn list(
        &self,
        filter: UserFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<User>, u64)> {
        let mut query = UserEntity::find().filter(user::Column::DeletedAt.is_null());

        if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(user::Column::Name.contains(term))
                    .add(user::Column::Email.contains(term))
                    .add(user::Column::Phone.contains(term)),
            );
        }
        if let Some(role) = filter.role {
            query = query.filter(user::Column::Role.eq(role.as_str()));
        }
        if let Some(status) = filter.status {
            query = query.filter(user::Column::Status.eq(status.as_str()));
        }

        let (models, total) =
            fetch_page(self.conn, query.order_by_desc(user::Column::CreatedAt), page).await?;
        let users = models
            .into_iter()
            .map(User::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((users, total))
    }

    pub async fn count(&self) -> AppResult<u64> {
        Ok(UserEntity::find()
            .filter(user::Column::DeletedAt.is_null())
            .count(self.conn)
            .await?)
    }
}

/// Pooled implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn queries(&self) -> UserQueries<'_, DatabaseConnection> {
        UserQueries::new(&self.db)
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        self.queries().find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.queries().find_by_email(email).await
    }

    async fn find_by_email_with_deleted(&self, email: &str) -> AppResult<Option<User>> {
        self.queries().find_by_email_with_deleted(email).await
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        self.queries().create(user).await
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> AppResult<User> {
        self.queries().update_profile(id, changes).await
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<()> {
        self.queries().update_password(id, password_hash).await
    }

    async fn set_status(&self, id: Uuid, status: UserStatus) -> AppResult<User> {
        self.queries().set_status(id, status).await
    }

    async fn set_role(&self, id: Uuid, role: Role) -> AppResult<User> {
        self.queries().set_role(id, role).await
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<()> {
        self.queries().soft_delete(id).await
    }

    async fn list(
        &self,
        filter: UserFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<User>, u64)> {
        self.queries().list(filter, page).await
    }

    async fn count(&self) -> AppResult<u64> {
        self.queries().count().await
    }
}
