//! Salon owner applications: customers apply, admins decide.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::MIN_REJECTION_REASON_LENGTH;
use crate::domain::{Action, Actor, ApplicationStatus, BusinessDetails, Role, SalonOwner};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::repositories::{ApplicationDecision, ApplicationFilter};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait ApplicationService: Send + Sync {
    /// Submit an application, or resubmit after a rejection.
    async fn apply(&self, actor: Actor, details: BusinessDetails) -> AppResult<SalonOwner>;

    async fn mine(&self, actor: Actor) -> AppResult<SalonOwner>;

    async fn list(
        &self,
        actor: Actor,
        filter: ApplicationFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<SalonOwner>>;

    async fn get(&self, actor: Actor, id: Uuid) -> AppResult<SalonOwner>;

    /// Approve a pending application and promote its user to SALON_OWNER.
    async fn approve(&self, actor: Actor, id: Uuid) -> AppResult<SalonOwner>;

    async fn reject(&self, actor: Actor, id: Uuid, reason: String) -> AppResult<SalonOwner>;
}

pub struct ApplicationManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ApplicationManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn pending(&self, id: Uuid) -> AppResult<SalonOwner> {
        let application = self
            .uow
            .profiles()
            .find_owner(id)
            .await?
            .ok_or_not_found("Application")?;
        application.ensure_pending()?;
        Ok(application)
    }
}

#[async_trait]
impl<U: UnitOfWork> ApplicationService for ApplicationManager<U> {
    async fn apply(&self, actor: Actor, details: BusinessDetails) -> AppResult<SalonOwner> {
        if actor.role != Role::Customer {
            return Err(AppError::forbidden("Only customers can apply to become salon owners"));
        }
        actor.require(Action::ApplyForOwnership)?;

        if let Some(existing) = self.uow.profiles().find_owner_by_user(actor.id).await? {
            existing.ensure_can_reapply()?;
        }

        let application = self
            .uow
            .profiles()
            .submit_application(actor.id, details)
            .await
            .map_err(|e| {
                if e.is_unique_violation() {
                    AppError::conflict("You already have a pending application")
                } else {
                    e
                }
            })?;

        tracing::info!(user_id = %actor.id, application_id = %application.id, "Owner application submitted");
        Ok(application)
    }

    async fn mine(&self, actor: Actor) -> AppResult<SalonOwner> {
        actor.require(Action::ViewOwnApplication)?;
        self.uow
            .profiles()
            .find_owner_by_user(actor.id)
            .await?
            .ok_or_not_found("Application")
    }

    async fn list(
        &self,
        actor: Actor,
        filter: ApplicationFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<SalonOwner>> {
        actor.require(Action::ReviewApplications)?;
        let (applications, total) = self.uow.profiles().list_applications(filter, page).await?;
        Ok(Paginated::new(applications, page, total))
    }

    async fn get(&self, actor: Actor, id: Uuid) -> AppResult<SalonOwner> {
        actor.require(Action::ReviewApplications)?;
        self.uow
            .profiles()
            .find_owner(id)
            .await?
            .ok_or_not_found("Application")
    }

    async fn approve(&self, actor: Actor, id: Uuid) -> AppResult<SalonOwner> {
        actor.require(Action::ReviewApplications)?;
        let application = self.pending(id).await?;
        let user_id = application.user_id;

        let approved = self
            .uow
            .transaction(move |tx| {
                Box::pin(async move {
                    let approved = tx
                        .profiles()
                        .decide_application(
                            id,
                            ApplicationDecision {
                                status: ApplicationStatus::Approved,
                                verified: true,
                                rejection_reason: None,
                            },
                        )
                        .await?;
                    tx.users().set_role(user_id, Role::SalonOwner).await?;
                    Ok(approved)
                })
            })
            .await?;

        tracing::info!(application_id = %id, user_id = %user_id, admin_id = %actor.id, "Owner application approved");
        Ok(approved)
    }

    async fn reject(&self, actor: Actor, id: Uuid, reason: String) -> AppResult<SalonOwner> {
        actor.require(Action::ReviewApplications)?;
        let reason = reason.trim().to_string();
        if (reason.chars().count() as u64) < MIN_REJECTION_REASON_LENGTH {
            return Err(AppError::validation(format!(
                "Rejection reason must be at least {} characters",
                MIN_REJECTION_REASON_LENGTH
            )));
        }
        self.pending(id).await?;

        let rejected = self
            .uow
            .profiles()
            .decide_application(
                id,
                ApplicationDecision {
                    status: ApplicationStatus::Rejected,
                    verified: false,
                    rejection_reason: Some(reason),
                },
            )
            .await?;

        tracing::info!(application_id = %id, admin_id = %actor.id, "Owner application rejected");
        Ok(rejected)
    }
}
