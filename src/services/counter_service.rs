//! Service counters (chairs, stations) inside a salon.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::access::owned_salon;
use crate::domain::{Actor, Counter};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait CounterService: Send + Sync {
    async fn create(
        &self,
        actor: Actor,
        salon_id: Uuid,
        name: String,
        code: Option<String>,
    ) -> AppResult<Counter>;

    async fn list(&self, salon_id: Uuid) -> AppResult<Vec<Counter>>;

    async fn delete(&self, actor: Actor, id: Uuid) -> AppResult<()>;
}

pub struct CounterManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CounterManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

fn duplicate_code(code: &str) -> AppError {
    AppError::conflict(format!("Counter code '{}' is already used in this salon", code))
}

#[async_trait]
impl<U: UnitOfWork> CounterService for CounterManager<U> {
    async fn create(
        &self,
        actor: Actor,
        salon_id: Uuid,
        name: String,
        code: Option<String>,
    ) -> AppResult<Counter> {
        owned_salon(self.uow.as_ref(), &actor, salon_id).await?;

        let code = code
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        if let Some(code) = &code {
            if self.uow.counters().code_taken(salon_id, code.clone()).await? {
                return Err(duplicate_code(code));
            }
        }

        let counter = self
            .uow
            .counters()
            .create(salon_id, name, code.clone())
            .await
            .map_err(|e| match (&code, e.is_unique_violation()) {
                (Some(code), true) => duplicate_code(code),
                _ => e,
            })?;

        tracing::info!(counter_id = %counter.id, salon_id = %salon_id, "Counter created");
        Ok(counter)
    }

    async fn list(&self, salon_id: Uuid) -> AppResult<Vec<Counter>> {
        self.uow
            .salons()
            .find_by_id(salon_id)
            .await?
            .ok_or_not_found("Salon")?;
        self.uow.counters().list_by_salon(salon_id).await
    }

    async fn delete(&self, actor: Actor, id: Uuid) -> AppResult<()> {
        let counter = self
            .uow
            .counters()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Counter")?;
        owned_salon(self.uow.as_ref(), &actor, counter.salon_id).await?;

        self.uow.counters().soft_delete(id).await?;
        tracing::info!(counter_id = %id, "Counter deleted");
        Ok(())
    }
}
