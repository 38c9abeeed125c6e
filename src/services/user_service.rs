//! User service - account administration and self-service profiles.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    Action, Actor, NewUser, Password, ProfileChanges, Role, User, UserResponse, UserStatus,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::repositories::UserFilter;
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait UserService: Send + Sync {
    /// List users (admin only)
    async fn list(
        &self,
        actor: Actor,
        filter: UserFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<UserResponse>>;

    /// Get a user. Callers may read themselves; admins read anyone.
    async fn get(&self, actor: Actor, id: Uuid) -> AppResult<UserResponse>;

    async fn update_profile(
        &self,
        actor: Actor,
        id: Uuid,
        changes: ProfileChanges,
    ) -> AppResult<UserResponse>;

    async fn set_status(&self, actor: Actor, id: Uuid, status: UserStatus)
        -> AppResult<UserResponse>;

    /// Change a user's role, creating the matching profile when missing.
    async fn set_role(&self, actor: Actor, id: Uuid, role: Role) -> AppResult<UserResponse>;

    /// Soft delete a user (admin only)
    async fn delete(&self, actor: Actor, id: Uuid) -> AppResult<()>;

    /// Make sure the configured administrator account exists.
    async fn seed_admin(&self, email: &str, password: &str) -> AppResult<User>;
}

pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn existing(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_not_found("User")
    }
}

fn ensure_self_or_admin(actor: &Actor, id: Uuid) -> AppResult<()> {
    if actor.id == id || actor.is_admin() {
        Ok(())
    } else {
        Err(AppError::forbidden("You can only access your own account"))
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn list(
        &self,
        actor: Actor,
        filter: UserFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<UserResponse>> {
        actor.require(Action::ManageUsers)?;
        let (users, total) = self.uow.users().list(filter, page).await?;
        Ok(Paginated::new(users, page, total).map(UserResponse::from))
    }

    async fn get(&self, actor: Actor, id: Uuid) -> AppResult<UserResponse> {
        ensure_self_or_admin(&actor, id)?;
        Ok(self.existing(id).await?.into())
    }

    async fn update_profile(
        &self,
        actor: Actor,
        id: Uuid,
        changes: ProfileChanges,
    ) -> AppResult<UserResponse> {
        ensure_self_or_admin(&actor, id)?;
        self.existing(id).await?;
        Ok(self.uow.users().update_profile(id, changes).await?.into())
    }

    async fn set_status(
        &self,
        actor: Actor,
        id: Uuid,
        status: UserStatus,
    ) -> AppResult<UserResponse> {
        actor.require(Action::ManageUsers)?;
        if status == UserStatus::Deleted {
            return Err(AppError::validation("Use the delete endpoint to remove a user"));
        }
        self.existing(id).await?;

        let user = self.uow.users().set_status(id, status).await?;
        tracing::info!(user_id = %id, status = %status, admin_id = %actor.id, "User status changed");
        Ok(user.into())
    }

    async fn set_role(&self, actor: Actor, id: Uuid, role: Role) -> AppResult<UserResponse> {
        actor.require(Action::ManageUsers)?;
        self.existing(id).await?;

        let user = self
            .uow
            .transaction(move |tx| {
                Box::pin(async move {
                    match role {
                        Role::SalonOwner => {
                            if tx.profiles().find_owner_by_user(id).await?.is_none() {
                                tx.profiles().create_verified_owner(id).await?;
                            }
                        }
                        Role::Admin => {
                            if tx.profiles().find_admin_by_user(id).await?.is_none() {
                                tx.profiles().create_admin(id).await?;
                            }
                        }
                        Role::Customer | Role::Staff => {}
                    }
                    tx.users().set_role(id, role).await
                })
            })
            .await?;

        tracing::info!(user_id = %id, role = %role, admin_id = %actor.id, "User role changed");
        Ok(user.into())
    }

    async fn delete(&self, actor: Actor, id: Uuid) -> AppResult<()> {
        actor.require(Action::ManageUsers)?;
        if actor.id == id {
            return Err(AppError::validation("You cannot delete your own account"));
        }
        self.existing(id).await?;
        self.uow.users().soft_delete(id).await?;
        tracing::info!(user_id = %id, admin_id = %actor.id, "User deleted");
        Ok(())
    }

    async fn seed_admin(&self, email: &str, password: &str) -> AppResult<User> {
        let email = email.trim().to_lowercase();
        if let Some(existing) = self.uow.users().find_by_email_with_deleted(&email).await? {
            tracing::debug!(user_id = %existing.id, "Admin account already present");
            return Ok(existing);
        }

        let password_hash = Password::new(password)?.into_string();
        let user = self
            .uow
            .transaction(move |tx| {
                Box::pin(async move {
                    let user = tx
                        .users()
                        .create(NewUser {
                            email,
                            password_hash,
                            name: "Administrator".to_string(),
                            phone: None,
                            role: Role::Admin,
                        })
                        .await?;
                    tx.profiles().create_admin(user.id).await?;
                    Ok(user)
                })
            })
            .await?;

        tracing::info!(user_id = %user.id, "Admin account created");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_access_is_allowed() {
        let me = Uuid::new_v4();
        assert!(ensure_self_or_admin(&Actor::new(me, Role::Customer), me).is_ok());
    }

    #[test]
    fn admin_reads_anyone() {
        let admin = Actor::new(Uuid::new_v4(), Role::Admin);
        assert!(ensure_self_or_admin(&admin, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn others_are_forbidden() {
        let owner = Actor::new(Uuid::new_v4(), Role::SalonOwner);
        assert!(matches!(
            ensure_self_or_admin(&owner, Uuid::new_v4()),
            Err(AppError::Forbidden(_))
        ));
    }
}
