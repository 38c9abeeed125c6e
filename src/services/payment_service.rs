//! Payments recorded against appointments, visible through the caller's scope.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::access::resolve_scope;
use crate::domain::{
    Action, Actor, Appointment, NewPayment, Payment, PaymentMethod, PaymentStatus, RecordFilter,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub appointment_id: Uuid,
    /// Defaults to the booked service's price.
    pub amount: Option<f64>,
    pub payment_method: PaymentMethod,
    pub status: Option<PaymentStatus>,
    pub transaction_id: Option<String>,
}

#[async_trait]
pub trait PaymentService: Send + Sync {
    async fn create(&self, actor: Actor, request: PaymentRequest) -> AppResult<Payment>;

    async fn list(
        &self,
        actor: Actor,
        filter: RecordFilter<PaymentStatus>,
        page: PaginationParams,
    ) -> AppResult<Paginated<Payment>>;

    async fn get(&self, actor: Actor, id: Uuid) -> AppResult<Payment>;
}

const DUPLICATE_PAYMENT: &str = "Payment already exists for this appointment";

pub struct PaymentManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> PaymentManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Load an appointment the caller may see, hiding the rest as not found.
    async fn visible_appointment(&self, actor: &Actor, id: Uuid) -> AppResult<Appointment> {
        let appointment = self
            .uow
            .appointments()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Appointment")?;

        let scope = resolve_scope(self.uow.as_ref(), actor).await?;
        if scope.covers(
            appointment.customer_id,
            appointment.staff_id,
            appointment.salon_id,
        ) {
            Ok(appointment)
        } else {
            Err(AppError::not_found("Appointment"))
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> PaymentService for PaymentManager<U> {
    async fn create(&self, actor: Actor, request: PaymentRequest) -> AppResult<Payment> {
        actor.require(Action::RecordPayment)?;
        let appointment = self
            .visible_appointment(&actor, request.appointment_id)
            .await?;

        if self
            .uow
            .payments()
            .find_by_appointment(appointment.id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(DUPLICATE_PAYMENT));
        }

        let amount = match request.amount {
            Some(amount) => amount,
            None => {
                self.uow
                    .catalog()
                    .find_by_id(appointment.service_id)
                    .await?
                    .ok_or_not_found("Service")?
                    .price
            }
        };
        if !(amount.is_finite() && amount > 0.0) {
            return Err(AppError::validation("Amount must be greater than zero"));
        }

        let status = request.status.unwrap_or(PaymentStatus::Pending);
        let payment = self
            .uow
            .payments()
            .create(NewPayment {
                appointment_id: appointment.id,
                amount,
                payment_method: request.payment_method,
                status,
                transaction_id: request.transaction_id,
                payment_date: (status == PaymentStatus::Completed).then(Utc::now),
            })
            .await
            .map_err(|e| {
                if e.is_unique_violation() {
                    AppError::conflict(DUPLICATE_PAYMENT)
                } else {
                    e
                }
            })?;

        tracing::info!(payment_id = %payment.id, appointment_id = %appointment.id, status = %status, "Payment recorded");
        Ok(payment)
    }

    async fn list(
        &self,
        actor: Actor,
        filter: RecordFilter<PaymentStatus>,
        page: PaginationParams,
    ) -> AppResult<Paginated<Payment>> {
        actor.require(Action::ViewPayments)?;
        let scoped = resolve_scope(self.uow.as_ref(), &actor).await?.apply(filter);
        if scoped.matches_nothing() {
            return Ok(Paginated::empty(page));
        }

        let (payments, total) = self.uow.payments().list(scoped, page).await?;
        Ok(Paginated::new(payments, page, total))
    }

    async fn get(&self, actor: Actor, id: Uuid) -> AppResult<Payment> {
        actor.require(Action::ViewPayments)?;
        let payment = self
            .uow
            .payments()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Payment")?;

        self.visible_appointment(&actor, payment.appointment_id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => AppError::not_found("Payment"),
                other => other,
            })?;
        Ok(payment)
    }
}
