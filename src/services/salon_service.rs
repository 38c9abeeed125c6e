//! Salon directory: public browsing, owner management and admin moderation.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::access::{owned_salon, owner_profile};
use crate::domain::{Action, Actor, NewSalon, Salon, SalonChanges, SalonStatus};
use crate::errors::{AppResult, OptionExt};
use crate::infra::repositories::SalonFilter;
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait SalonDirectory: Send + Sync {
    /// Register a salon for the caller. `owner_id` is taken from the
    /// caller's owner profile; new salons await approval.
    async fn create(&self, actor: Actor, salon: NewSalon) -> AppResult<Salon>;

    /// Public listing. Without a status filter only ACTIVE salons show.
    async fn list(&self, filter: SalonFilter, page: PaginationParams)
        -> AppResult<Paginated<Salon>>;

    async fn get(&self, id: Uuid) -> AppResult<Salon>;

    async fn my_salons(&self, actor: Actor, page: PaginationParams)
        -> AppResult<Paginated<Salon>>;

    async fn update(&self, actor: Actor, id: Uuid, changes: SalonChanges) -> AppResult<Salon>;

    async fn set_status(&self, actor: Actor, id: Uuid, status: SalonStatus) -> AppResult<Salon>;

    /// Soft delete. Owners remove their own salons, admins any salon.
    async fn delete(&self, actor: Actor, id: Uuid) -> AppResult<()>;
}

pub struct SalonManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> SalonManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> SalonDirectory for SalonManager<U> {
    async fn create(&self, actor: Actor, mut salon: NewSalon) -> AppResult<Salon> {
        let owner = owner_profile(self.uow.as_ref(), &actor).await?;
        salon.owner_id = owner.id;

        let salon = self.uow.salons().create(salon).await?;
        tracing::info!(salon_id = %salon.id, owner_id = %owner.id, "Salon created");
        Ok(salon)
    }

    async fn list(
        &self,
        mut filter: SalonFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<Salon>> {
        filter.status.get_or_insert(SalonStatus::Active);
        let (salons, total) = self.uow.salons().list(filter, page).await?;
        Ok(Paginated::new(salons, page, total))
    }

    async fn get(&self, id: Uuid) -> AppResult<Salon> {
        self.uow
            .salons()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Salon")
    }

    async fn my_salons(
        &self,
        actor: Actor,
        page: PaginationParams,
    ) -> AppResult<Paginated<Salon>> {
        let owner = owner_profile(self.uow.as_ref(), &actor).await?;
        let filter = SalonFilter {
            owner_id: Some(owner.id),
            ..Default::default()
        };
        let (salons, total) = self.uow.salons().list(filter, page).await?;
        Ok(Paginated::new(salons, page, total))
    }

    async fn update(&self, actor: Actor, id: Uuid, changes: SalonChanges) -> AppResult<Salon> {
        owned_salon(self.uow.as_ref(), &actor, id).await?;
        self.uow.salons().update(id, changes).await
    }

    async fn set_status(&self, actor: Actor, id: Uuid, status: SalonStatus) -> AppResult<Salon> {
        actor.require(Action::ModerateSalons)?;
        self.get(id).await?;

        let salon = self.uow.salons().set_status(id, status).await?;
        tracing::info!(salon_id = %id, status = %status, admin_id = %actor.id, "Salon status changed");
        Ok(salon)
    }

    async fn delete(&self, actor: Actor, id: Uuid) -> AppResult<()> {
        actor.require(Action::DeleteSalons)?;
        if actor.is_admin() {
            self.get(id).await?;
        } else {
            owned_salon(self.uow.as_ref(), &actor, id).await?;
        }

        self.uow.salons().soft_delete(id).await?;
        tracing::info!(salon_id = %id, actor_id = %actor.id, "Salon deleted");
        Ok(())
    }
}
