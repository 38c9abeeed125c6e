//! Booking and the appointment lifecycle.
//!
//! Booking checks the counter slot and then the staff slot inside the same
//! transaction as the insert. The partial unique indexes on active
//! appointments stay the final word: a concurrent booking that slips past
//! the pre-check fails the insert and is reported as the same conflict.
//!
//! Status changes read, authorize and write in one transaction, and the write
//! only applies while the appointment still holds the status that was read.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

use super::access::resolve_scope;
use crate::domain::{
    Action, Actor, Appointment, AppointmentStatus, NewAppointment, RecordFilter, Role, StartTime,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::db::COUNTER_SLOT_INDEX;
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

pub const COUNTER_TAKEN: &str = "This counter is already booked for the selected date and time";
pub const STAFF_TAKEN: &str = "This staff member is already booked for the selected date and time";
pub const STATUS_CHANGED: &str = "Appointment status was changed by another request";

/// A customer's booking request.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub salon_id: Uuid,
    pub service_id: Uuid,
    pub staff_id: Uuid,
    pub counter_id: Uuid,
    pub appointment_date: NaiveDate,
    pub start_time: String,
    pub notes: Option<String>,
}

#[async_trait]
pub trait AppointmentService: Send + Sync {
    async fn book(&self, actor: Actor, request: BookingRequest) -> AppResult<Appointment>;

    /// Appointments visible to the caller, narrowed by the caller's filters.
    async fn list(
        &self,
        actor: Actor,
        filter: RecordFilter<AppointmentStatus>,
        page: PaginationParams,
    ) -> AppResult<Paginated<Appointment>>;

    async fn my_appointments(
        &self,
        actor: Actor,
        status: Option<AppointmentStatus>,
        page: PaginationParams,
    ) -> AppResult<Paginated<Appointment>>;

    /// Out-of-scope appointments read as not found.
    async fn get(&self, actor: Actor, id: Uuid) -> AppResult<Appointment>;

    async fn update_status(
        &self,
        actor: Actor,
        id: Uuid,
        status: AppointmentStatus,
        cancellation_reason: Option<String>,
    ) -> AppResult<Appointment>;

    /// Customer cancellation of their own appointment.
    async fn cancel(&self, actor: Actor, id: Uuid, reason: Option<String>)
        -> AppResult<Appointment>;
}

/// Map an insert failure on one of the slot indexes to the matching conflict.
pub fn slot_conflict(err: AppError) -> AppError {
    if !err.is_unique_violation() {
        return err;
    }
    // Postgres names the index, SQLite lists the indexed columns.
    let counter_slot = match &err {
        AppError::Database(db) => {
            let message = db.to_string();
            message.contains(COUNTER_SLOT_INDEX) || message.contains("counter_id")
        }
        _ => false,
    };
    AppError::conflict(if counter_slot { COUNTER_TAKEN } else { STAFF_TAKEN })
}

pub struct BookingManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> BookingManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> AppointmentService for BookingManager<U> {
    async fn book(&self, actor: Actor, request: BookingRequest) -> AppResult<Appointment> {
        actor.require(Action::BookAppointment)?;
        let start_time = StartTime::parse(&request.start_time)?;
        let customer_id = actor.id;

        let appointment = self
            .uow
            .transaction(move |tx| {
                Box::pin(async move {
                    let salon = tx
                        .salons()
                        .find_by_id(request.salon_id)
                        .await?
                        .filter(|salon| salon.is_bookable())
                        .ok_or_not_found("Salon")?;

                    let service = tx
                        .catalog()
                        .find_by_id(request.service_id)
                        .await?
                        .filter(|service| service.is_bookable())
                        .ok_or_not_found("Service")?;
                    if service.salon_id != salon.id {
                        return Err(AppError::validation(
                            "Service does not belong to the selected salon",
                        ));
                    }

                    let staff = tx
                        .staff()
                        .find_by_id(request.staff_id)
                        .await?
                        .ok_or_not_found("Staff")?;
                    if staff.salon_id != salon.id {
                        return Err(AppError::validation(
                            "Staff does not belong to the selected salon",
                        ));
                    }

                    let counter = tx
                        .counters()
                        .find_by_id(request.counter_id)
                        .await?
                        .ok_or_not_found("Counter")?;
                    if counter.salon_id != salon.id {
                        return Err(AppError::validation(
                            "Counter does not belong to the selected salon",
                        ));
                    }

                    let date = request.appointment_date;
                    if tx
                        .appointments()
                        .counter_slot_taken(salon.id, counter.id, date, start_time.as_str())
                        .await?
                    {
                        return Err(AppError::conflict(COUNTER_TAKEN));
                    }
                    if tx
                        .appointments()
                        .staff_slot_taken(staff.id, date, start_time.as_str())
                        .await?
                    {
                        return Err(AppError::conflict(STAFF_TAKEN));
                    }

                    tx.appointments()
                        .create(NewAppointment {
                            customer_id,
                            salon_id: salon.id,
                            service_id: service.id,
                            staff_id: staff.id,
                            counter_id: counter.id,
                            appointment_date: date,
                            start_time,
                            notes: request.notes,
                        })
                        .await
                })
            })
            .await
            .map_err(slot_conflict)?;

        tracing::info!(
            appointment_id = %appointment.id,
            salon_id = %appointment.salon_id,
            staff_id = %appointment.staff_id,
            counter_id = %appointment.counter_id,
            date = %appointment.appointment_date,
            start_time = %appointment.start_time,
            "Appointment booked"
        );
        Ok(appointment)
    }

    async fn list(
        &self,
        actor: Actor,
        filter: RecordFilter<AppointmentStatus>,
        page: PaginationParams,
    ) -> AppResult<Paginated<Appointment>> {
        actor.require(Action::ViewAppointments)?;
        let scoped = resolve_scope(self.uow.as_ref(), &actor).await?.apply(filter);
        if scoped.matches_nothing() {
            return Ok(Paginated::empty(page));
        }

        let (appointments, total) = self.uow.appointments().list(scoped, page).await?;
        Ok(Paginated::new(appointments, page, total))
    }

    async fn my_appointments(
        &self,
        actor: Actor,
        status: Option<AppointmentStatus>,
        page: PaginationParams,
    ) -> AppResult<Paginated<Appointment>> {
        actor.require(Action::ListOwnAppointments)?;
        self.list(
            actor,
            RecordFilter {
                status,
                salon_id: None,
            },
            page,
        )
        .await
    }

    async fn get(&self, actor: Actor, id: Uuid) -> AppResult<Appointment> {
        actor.require(Action::ViewAppointments)?;
        let appointment = self
            .uow
            .appointments()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Appointment")?;

        let scope = resolve_scope(self.uow.as_ref(), &actor).await?;
        if !scope.covers(
            appointment.customer_id,
            appointment.staff_id,
            appointment.salon_id,
        ) {
            return Err(AppError::not_found("Appointment"));
        }
        Ok(appointment)
    }

    async fn update_status(
        &self,
        actor: Actor,
        id: Uuid,
        status: AppointmentStatus,
        cancellation_reason: Option<String>,
    ) -> AppResult<Appointment> {
        actor.require(Action::ChangeAppointmentStatus)?;
        let scope = resolve_scope(self.uow.as_ref(), &actor).await?;
        let role = actor.role;
        let reason = match status {
            AppointmentStatus::Cancelled => cancellation_reason,
            _ => None,
        };

        let (from, updated) = self
            .uow
            .transaction(move |tx| {
                Box::pin(async move {
                    let appointment = tx
                        .appointments()
                        .find_by_id(id)
                        .await?
                        .ok_or_not_found("Appointment")?;
                    appointment.authorize_transition(role, &scope, status)?;

                    let updated = tx
                        .appointments()
                        .update_status(id, appointment.status, status, reason)
                        .await?
                        .ok_or_else(|| AppError::conflict(STATUS_CHANGED))?;
                    Ok((appointment.status, updated))
                })
            })
            .await?;

        tracing::info!(
            appointment_id = %id,
            from = %from,
            to = %status,
            actor_id = %actor.id,
            "Appointment status changed"
        );
        Ok(updated)
    }

    async fn cancel(
        &self,
        actor: Actor,
        id: Uuid,
        reason: Option<String>,
    ) -> AppResult<Appointment> {
        actor.require(Action::CancelOwnAppointment)?;
        if actor.role != Role::Customer {
            return Err(AppError::forbidden("Only customers can cancel their bookings"));
        }
        self.update_status(actor, id, AppointmentStatus::Cancelled, reason)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_unique_errors_pass_through() {
        let err = slot_conflict(AppError::not_found("Salon"));
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
