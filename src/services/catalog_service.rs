//! Services a salon offers.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::access::owned_salon;
use crate::domain::{Actor, NewSalonService, SalonService, SalonServiceChanges};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::repositories::ServiceFilter;
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn create(&self, actor: Actor, service: NewSalonService) -> AppResult<SalonService>;

    async fn list(
        &self,
        filter: ServiceFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<SalonService>>;

    async fn get(&self, id: Uuid) -> AppResult<SalonService>;

    async fn update(
        &self,
        actor: Actor,
        id: Uuid,
        changes: SalonServiceChanges,
    ) -> AppResult<SalonService>;

    async fn delete(&self, actor: Actor, id: Uuid) -> AppResult<()>;
}

fn check_pricing(price: Option<f64>, duration: Option<i32>) -> AppResult<()> {
    if price.is_some_and(|p| !(p.is_finite() && p > 0.0)) {
        return Err(AppError::validation("Price must be greater than zero"));
    }
    if duration.is_some_and(|d| d <= 0) {
        return Err(AppError::validation("Duration must be greater than zero"));
    }
    Ok(())
}

pub struct CatalogManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CatalogManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn owned_service(&self, actor: &Actor, id: Uuid) -> AppResult<SalonService> {
        let service = self.get(id).await?;
        owned_salon(self.uow.as_ref(), actor, service.salon_id).await?;
        Ok(service)
    }
}

#[async_trait]
impl<U: UnitOfWork> CatalogService for CatalogManager<U> {
    async fn create(&self, actor: Actor, service: NewSalonService) -> AppResult<SalonService> {
        check_pricing(Some(service.price), Some(service.duration))?;
        owned_salon(self.uow.as_ref(), &actor, service.salon_id).await?;

        let service = self.uow.catalog().create(service).await?;
        tracing::info!(service_id = %service.id, salon_id = %service.salon_id, "Service created");
        Ok(service)
    }

    async fn list(
        &self,
        filter: ServiceFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<SalonService>> {
        let (services, total) = self.uow.catalog().list(filter, page).await?;
        Ok(Paginated::new(services, page, total))
    }

    async fn get(&self, id: Uuid) -> AppResult<SalonService> {
        self.uow
            .catalog()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Service")
    }

    async fn update(
        &self,
        actor: Actor,
        id: Uuid,
        changes: SalonServiceChanges,
    ) -> AppResult<SalonService> {
        check_pricing(changes.price, changes.duration)?;
        self.owned_service(&actor, id).await?;
        self.uow.catalog().update(id, changes).await
    }

    async fn delete(&self, actor: Actor, id: Uuid) -> AppResult<()> {
        self.owned_service(&actor, id).await?;
        self.uow.catalog().soft_delete(id).await?;
        tracing::info!(service_id = %id, "Service deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_and_duration_must_be_positive() {
        assert!(check_pricing(Some(25.0), Some(30)).is_ok());
        assert!(check_pricing(None, None).is_ok());
        assert!(check_pricing(Some(0.0), None).is_err());
        assert!(check_pricing(Some(f64::NAN), None).is_err());
        assert!(check_pricing(None, Some(0)).is_err());
    }
}
