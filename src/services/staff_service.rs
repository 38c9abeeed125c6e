//! Staff membership: owners promote customers into their salons.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use uuid::Uuid;

use super::access::owned_salon;
use crate::domain::{Actor, NewStaff, Role, Staff, StaffChanges};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::repositories::StaffFilter;
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait StaffService: Send + Sync {
    /// Attach an existing customer account to one of the caller's salons.
    async fn add(&self, actor: Actor, staff: NewStaff, service_ids: Vec<Uuid>) -> AppResult<Staff>;

    async fn list(&self, filter: StaffFilter, page: PaginationParams)
        -> AppResult<Paginated<Staff>>;

    async fn get(&self, id: Uuid) -> AppResult<Staff>;

    /// Update a staff profile. `Some(service_ids)` replaces the linked services.
    async fn update(
        &self,
        actor: Actor,
        id: Uuid,
        changes: StaffChanges,
        service_ids: Option<Vec<Uuid>>,
    ) -> AppResult<Staff>;

    /// Soft delete a staff profile and demote its user back to CUSTOMER.
    async fn remove(&self, actor: Actor, id: Uuid) -> AppResult<()>;
}

fn distinct(ids: Vec<Uuid>) -> Vec<Uuid> {
    ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}

fn ensure_all_found(requested: &[Uuid], found: &[Uuid]) -> AppResult<()> {
    if requested.iter().all(|id| found.contains(id)) {
        Ok(())
    } else {
        Err(AppError::validation(
            "All services must belong to the staff member's salon",
        ))
    }
}

pub struct StaffManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> StaffManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn managed(&self, actor: &Actor, id: Uuid) -> AppResult<Staff> {
        let staff = self.get(id).await?;
        owned_salon(self.uow.as_ref(), actor, staff.salon_id).await?;
        Ok(staff)
    }
}

#[async_trait]
impl<U: UnitOfWork> StaffService for StaffManager<U> {
    async fn add(&self, actor: Actor, staff: NewStaff, service_ids: Vec<Uuid>) -> AppResult<Staff> {
        owned_salon(self.uow.as_ref(), &actor, staff.salon_id).await?;
        let service_ids = distinct(service_ids);

        let created = self
            .uow
            .transaction(move |tx| {
                Box::pin(async move {
                    let user = tx
                        .users()
                        .find_by_id(staff.user_id)
                        .await?
                        .ok_or_not_found("User")?;
                    if !user.can_authenticate() {
                        return Err(AppError::validation("User account is not active"));
                    }
                    if user.role != Role::Customer {
                        return Err(AppError::conflict(format!(
                            "User already has the {} role",
                            user.role
                        )));
                    }
                    if tx.staff().find_by_user(user.id).await?.is_some() {
                        return Err(AppError::conflict("User is already a staff member"));
                    }

                    let found = tx
                        .catalog()
                        .ids_in_salon(staff.salon_id, service_ids.clone())
                        .await?;
                    ensure_all_found(&service_ids, &found)?;

                    tx.users().set_role(user.id, Role::Staff).await?;
                    tx.staff().create(staff, service_ids).await
                })
            })
            .await
            .map_err(|e| {
                if e.is_unique_violation() {
                    AppError::conflict("User is already a staff member")
                } else {
                    e
                }
            })?;

        tracing::info!(staff_id = %created.id, salon_id = %created.salon_id, "Staff member added");
        Ok(created)
    }

    async fn list(
        &self,
        filter: StaffFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<Staff>> {
        let (staff, total) = self.uow.staff().list(filter, page).await?;
        Ok(Paginated::new(staff, page, total))
    }

    async fn get(&self, id: Uuid) -> AppResult<Staff> {
        self.uow
            .staff()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Staff")
    }

    async fn update(
        &self,
        actor: Actor,
        id: Uuid,
        changes: StaffChanges,
        service_ids: Option<Vec<Uuid>>,
    ) -> AppResult<Staff> {
        let staff = self.managed(&actor, id).await?;

        let service_ids = match service_ids {
            Some(ids) => {
                let ids = distinct(ids);
                let found = self
                    .uow
                    .catalog()
                    .ids_in_salon(staff.salon_id, ids.clone())
                    .await?;
                ensure_all_found(&ids, &found)?;
                Some(ids)
            }
            None => None,
        };

        self.uow.staff().update(id, changes, service_ids).await
    }

    async fn remove(&self, actor: Actor, id: Uuid) -> AppResult<()> {
        let staff = self.managed(&actor, id).await?;
        let user_id = staff.user_id;

        self.uow
            .transaction(move |tx| {
                Box::pin(async move {
                    tx.staff().soft_delete(id).await?;
                    tx.users().set_role(user_id, Role::Customer).await?;
                    Ok(())
                })
            })
            .await?;

        tracing::info!(staff_id = %id, user_id = %user_id, "Staff member removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_service_ids_collapse() {
        let id = Uuid::new_v4();
        assert_eq!(distinct(vec![id, id]), vec![id]);
    }

    #[test]
    fn foreign_services_are_rejected() {
        let (mine, foreign) = (Uuid::new_v4(), Uuid::new_v4());
        assert!(ensure_all_found(&[mine], &[mine]).is_ok());
        assert!(ensure_all_found(&[mine, foreign], &[mine]).is_err());
        assert!(ensure_all_found(&[], &[]).is_ok());
    }
}
