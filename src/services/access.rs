//! Caller resolution shared by the services: record scopes and salon
//! ownership.

use crate::domain::{Actor, Action, RecordScope, Salon, SalonOwner, Visibility};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Resolve which appointment-like records `actor` may read.
///
/// A staff member without a live staff profile, or an owner without a
/// profile or salons, resolves to `RecordScope::Nothing` rather than an
/// error.
pub(crate) async fn resolve_scope<U: UnitOfWork>(uow: &U, actor: &Actor) -> AppResult<RecordScope> {
    Ok(match actor.role.capability().visibility {
        Visibility::Everything => RecordScope::Unrestricted,
        Visibility::OwnRecords => RecordScope::Customer(actor.id),
        Visibility::AssignedRecords => match uow.staff().find_by_user(actor.id).await? {
            Some(staff) => RecordScope::Staff(staff.id),
            None => RecordScope::Nothing,
        },
        Visibility::OwnedSalons => match uow.profiles().find_owner_by_user(actor.id).await? {
            Some(owner) => RecordScope::salons(uow.salons().ids_owned_by(owner.id).await?),
            None => RecordScope::Nothing,
        },
    })
}

/// The caller's salon owner profile.
pub(crate) async fn owner_profile<U: UnitOfWork>(uow: &U, actor: &Actor) -> AppResult<SalonOwner> {
    actor.require(Action::ManageSalons)?;
    uow.profiles()
        .find_owner_by_user(actor.id)
        .await?
        .ok_or_else(|| AppError::forbidden("Salon owner profile not found"))
}

/// Load a live salon and check the caller owns it.
pub(crate) async fn owned_salon<U: UnitOfWork>(
    uow: &U,
    actor: &Actor,
    salon_id: uuid::Uuid,
) -> AppResult<Salon> {
    let owner = owner_profile(uow, actor).await?;
    let salon = uow
        .salons()
        .find_by_id(salon_id)
        .await?
        .ok_or_not_found("Salon")?;

    if salon.owner_id != owner.id {
        return Err(AppError::forbidden("You can only manage your own salons"));
    }
    Ok(salon)
}
