//! Payment repository. Payments are scoped through their appointment.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, QueryTrait, Select, Set,
};
use uuid::Uuid;

use super::appointment_repository::scope_condition;
use super::entities::{appointment, payment};
use super::fetch_page;
use crate::domain::{NewPayment, Payment, PaymentStatus, RecordScope, ScopedFilter};
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Payments whose appointment lies inside the scope.
fn scoped(scope: &RecordScope, salon_id: Option<Uuid>) -> Select<payment::Entity> {
    let query = payment::Entity::find();
    if matches!(scope, RecordScope::Unrestricted) && salon_id.is_none() {
        return query;
    }

    let appointment_ids = appointment::Entity::find()
        .select_only()
        .column(appointment::Column::Id)
        .filter(scope_condition(scope, salon_id))
        .into_query();
    query.filter(payment::Column::AppointmentId.in_subquery(appointment_ids))
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// A second payment for one appointment surfaces as a unique violation.
    async fn create(&self, payment: NewPayment) -> AppResult<Payment>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Payment>>;

    async fn find_by_appointment(&self, appointment_id: Uuid) -> AppResult<Option<Payment>>;

    async fn list(
        &self,
        filter: ScopedFilter<PaymentStatus>,
        page: PaginationParams,
    ) -> AppResult<(Vec<Payment>, u64)>;

    /// Sum of COMPLETED payments inside a scope.
    async fn revenue(&self, scope: RecordScope) -> AppResult<f64>;
}

pub struct PaymentQueries<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> PaymentQueries<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn create(&self, new_payment: NewPayment) -> AppResult<Payment> {
        let now = Utc::now();
        let model = payment::ActiveModel {
            id: Set(Uuid::new_v4()),
            appointment_id: Set(new_payment.appointment_id),
            amount: Set(new_payment.amount),
            payment_method: Set(new_payment.payment_method.to_string()),
            status: Set(new_payment.status.to_string()),
            transaction_id: Set(new_payment.transaction_id),
            payment_date: Set(new_payment.payment_date),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.conn)
        .await?;

        Payment::try_from(model)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Payment>> {
        payment::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .map(Payment::try_from)
            .transpose()
    }

    pub async fn find_by_appointment(&self, appointment_id: Uuid) -> AppResult<Option<Payment>> {
        payment::Entity::find()
            .filter(payment::Column::AppointmentId.eq(appointment_id))
            .one(self.conn)
            .await?
            .map(Payment::try_from)
            .transpose()
    }

    pub async fn list(
        &self,
        filter: ScopedFilter<PaymentStatus>,
        page: PaginationParams,
    ) -> AppResult<(Vec<Payment>, u64)> {
        let mut query = scoped(&filter.scope, filter.salon_id);
        if let Some(status) = filter.status {
            query = query.filter(payment::Column::Status.eq(status.as_str()));
        }

        let query = query.order_by_desc(payment::Column::CreatedAt);
        let (models, total) = fetch_page(self.conn, query, page).await?;
        let payments = models
            .into_iter()
            .map(Payment::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((payments, total))
    }

    pub async fn revenue(&self, scope: RecordScope) -> AppResult<f64> {
        let total = scoped(&scope, None)
            .select_only()
            .column_as(payment::Column::Amount.sum(), "total")
            .filter(payment::Column::Status.eq(PaymentStatus::Completed.as_str()))
            .into_tuple::<Option<f64>>()
            .one(self.conn)
            .await?;
        Ok(total.flatten().unwrap_or(0.0))
    }
}

pub struct PaymentStore {
    db: DatabaseConnection,
}

impl PaymentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn queries(&self) -> PaymentQueries<'_, DatabaseConnection> {
        PaymentQueries::new(&self.db)
    }
}

#[async_trait]
impl PaymentRepository for PaymentStore {
    async fn create(&self, payment: NewPayment) -> AppResult<Payment> {
        self.queries().create(payment).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Payment>> {
        self.queries().find_by_id(id).await
    }

    async fn find_by_appointment(&self, appointment_id: Uuid) -> AppResult<Option<Payment>> {
        self.queries().find_by_appointment(appointment_id).await
    }

    async fn list(
        &self,
        filter: ScopedFilter<PaymentStatus>,
        page: PaginationParams,
    ) -> AppResult<(Vec<Payment>, u64)> {
        self.queries().list(filter, page).await
    }

    async fn revenue(&self, scope: RecordScope) -> AppResult<f64> {
        self.queries().revenue(scope).await
    }
}
