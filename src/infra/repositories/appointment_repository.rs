//! Appointment repository: slot checks and role-scoped queries.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::{appointment, parse_column};
use super::fetch_page;
use crate::domain::{Appointment, AppointmentStatus, NewAppointment, RecordScope, ScopedFilter};
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Appointment predicate for a scope, optionally narrowed to one salon.
pub(crate) fn scope_condition(scope: &RecordScope, salon_id: Option<Uuid>) -> Condition {
    let condition = match scope {
        RecordScope::Unrestricted => Condition::all(),
        RecordScope::Customer(id) => {
            Condition::all().add(appointment::Column::CustomerId.eq(*id))
        }
        RecordScope::Staff(id) => Condition::all().add(appointment::Column::StaffId.eq(*id)),
        RecordScope::Salons(ids) => {
            Condition::all().add(appointment::Column::SalonId.is_in(ids.clone()))
        }
        // ids are never null
        RecordScope::Nothing => Condition::all().add(appointment::Column::Id.is_null()),
    };

    match salon_id {
        Some(salon_id) => condition.add(appointment::Column::SalonId.eq(salon_id)),
        None => condition,
    }
}

fn active_statuses() -> Vec<&'static str> {
    AppointmentStatus::OCCUPYING
        .iter()
        .map(AppointmentStatus::as_str)
        .collect()
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Inserts as PENDING. A taken slot surfaces as a unique violation.
    async fn create(&self, appointment: NewAppointment) -> AppResult<Appointment>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Appointment>>;

    /// Whether an active appointment holds this counter slot.
    async fn counter_slot_taken(
        &self,
        salon_id: Uuid,
        counter_id: Uuid,
        date: NaiveDate,
        start_time: &str,
    ) -> AppResult<bool>;

    /// Whether an active appointment holds this staff slot.
    async fn staff_slot_taken(
        &self,
        staff_id: Uuid,
        date: NaiveDate,
        start_time: &str,
    ) -> AppResult<bool>;

    async fn list(
        &self,
        filter: ScopedFilter<AppointmentStatus>,
        page: PaginationParams,
    ) -> AppResult<(Vec<Appointment>, u64)>;

    /// Move an appointment from `from` to `to`. `None` when it is no longer in `from`.
    async fn update_status(
        &self,
        id: Uuid,
        from: AppointmentStatus,
        to: AppointmentStatus,
        cancellation_reason: Option<String>,
    ) -> AppResult<Option<Appointment>>;

    /// Newest appointments inside a scope.
    async fn recent(&self, scope: RecordScope, limit: u64) -> AppResult<Vec<Appointment>>;

    async fn count(&self, scope: RecordScope, status: Option<AppointmentStatus>)
        -> AppResult<u64>;

    /// Active appointments dated `from` or later.
    async fn count_upcoming(&self, scope: RecordScope, from: NaiveDate) -> AppResult<u64>;

    async fn count_by_status(&self, scope: RecordScope)
        -> AppResult<Vec<(AppointmentStatus, u64)>>;
}

pub struct AppointmentQueries<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> AppointmentQueries<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn create(&self, new_appointment: NewAppointment) -> AppResult<Appointment> {
        let now = Utc::now();
        let model = appointment::ActiveModel {
            id: Set(Uuid::new_v4()),
            customer_id: Set(new_appointment.customer_id),
            salon_id: Set(new_appointment.salon_id),
            service_id: Set(new_appointment.service_id),
            staff_id: Set(new_appointment.staff_id),
            counter_id: Set(new_appointment.counter_id),
            appointment_date: Set(new_appointment.appointment_date),
            start_time: Set(new_appointment.start_time.as_str().to_string()),
            status: Set(AppointmentStatus::Pending.to_string()),
            notes: Set(new_appointment.notes),
            cancellation_reason: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.conn)
        .await?;

        Appointment::try_from(model)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Appointment>> {
        appointment::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .map(Appointment::try_from)
            .transpose()
    }

    pub async fn counter_slot_taken(
        &self,
        salon_id: Uuid,
        counter_id: Uuid,
        date: NaiveDate,
        start_time: &str,
    ) -> AppResult<bool> {
        let holders = appointment::Entity::find()
            .filter(appointment::Column::SalonId.eq(salon_id))
            .filter(appointment::Column::CounterId.eq(counter_id))
            .filter(appointment::Column::AppointmentDate.eq(date))
            .filter(appointment::Column::StartTime.eq(start_time))
            .filter(appointment::Column::Status.is_in(active_statuses()))
            .count(self.conn)
            .await?;
        Ok(holders > 0)
    }

    pub async fn staff_slot_taken(
        &self,
        staff_id: Uuid,
        date: NaiveDate,
        start_time: &str,
    ) -> AppResult<bool> {
        let holders = appointment::Entity::find()
            .filter(appointment::Column::StaffId.eq(staff_id))
            .filter(appointment::Column::AppointmentDate.eq(date))
            .filter(appointment::Column::StartTime.eq(start_time))
            .filter(appointment::Column::Status.is_in(active_statuses()))
            .count(self.conn)
            .await?;
        Ok(holders > 0)
    }

    pub async fn list(
        &self,
        filter: ScopedFilter<AppointmentStatus>,
        page: PaginationParams,
    ) -> AppResult<(Vec<Appointment>, u64)> {
        let mut query = appointment::Entity::find()
            .filter(scope_condition(&filter.scope, filter.salon_id));
        if let Some(status) = filter.status {
            query = query.filter(appointment::Column::Status.eq(status.as_str()));
        }

        let query = query.order_by_desc(appointment::Column::CreatedAt);
        let (models, total) = fetch_page(self.conn, query, page).await?;
        let appointments = models
            .into_iter()
            .map(Appointment::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((appointments, total))
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        from: AppointmentStatus,
        to: AppointmentStatus,
        cancellation_reason: Option<String>,
    ) -> AppResult<Option<Appointment>> {
        let mut update = appointment::Entity::update_many()
            .col_expr(appointment::Column::Status, Expr::value(to.as_str()))
            .col_expr(appointment::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(appointment::Column::Id.eq(id))
            .filter(appointment::Column::Status.eq(from.as_str()));
        if let Some(reason) = cancellation_reason {
            update = update.col_expr(appointment::Column::CancellationReason, Expr::value(reason));
        }

        if update.exec(self.conn).await?.rows_affected == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    pub async fn recent(&self, scope: RecordScope, limit: u64) -> AppResult<Vec<Appointment>> {
        appointment::Entity::find()
            .filter(scope_condition(&scope, None))
            .order_by_desc(appointment::Column::CreatedAt)
            .limit(limit)
            .all(self.conn)
            .await?
            .into_iter()
            .map(Appointment::try_from)
            .collect()
    }

    pub async fn count(
        &self,
        scope: RecordScope,
        status: Option<AppointmentStatus>,
    ) -> AppResult<u64> {
        let mut query = appointment::Entity::find().filter(scope_condition(&scope, None));
        if let Some(status) = status {
            query = query.filter(appointment::Column::Status.eq(status.as_str()));
        }
        Ok(query.count(self.conn).await?)
    }

    pub async fn count_upcoming(&self, scope: RecordScope, from: NaiveDate) -> AppResult<u64> {
        Ok(appointment::Entity::find()
            .filter(scope_condition(&scope, None))
            .filter(appointment::Column::AppointmentDate.gte(from))
            .filter(appointment::Column::Status.is_in(active_statuses()))
            .count(self.conn)
            .await?)
    }

    pub async fn count_by_status(
        &self,
        scope: RecordScope,
    ) -> AppResult<Vec<(AppointmentStatus, u64)>> {
        let rows = appointment::Entity::find()
            .select_only()
            .column(appointment::Column::Status)
            .column_as(appointment::Column::Id.count(), "count")
            .filter(scope_condition(&scope, None))
            .group_by(appointment::Column::Status)
            .into_tuple::<(String, i64)>()
            .all(self.conn)
            .await?;

        rows.into_iter()
            .map(|(status, count)| {
                Ok((
                    parse_column(&status, "appointments.status")?,
                    count.max(0) as u64,
                ))
            })
            .collect()
    }
}

pub struct AppointmentStore {
    db: DatabaseConnection,
}

impl AppointmentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn queries(&self) -> AppointmentQueries<'_, DatabaseConnection> {
        AppointmentQueries::new(&self.db)
    }
}

#[async_trait]
impl AppointmentRepository for AppointmentStore {
    async fn create(&self, appointment: NewAppointment) -> AppResult<Appointment> {
        self.queries().create(appointment).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Appointment>> {
        self.queries().find_by_id(id).await
    }

    async fn counter_slot_taken(
        &self,
        salon_id: Uuid,
        counter_id: Uuid,
        date: NaiveDate,
        start_time: &str,
    ) -> AppResult<bool> {
        self.queries()
            .counter_slot_taken(salon_id, counter_id, date, start_time)
            .await
    }

    async fn staff_slot_taken(
        &self,
        staff_id: Uuid,
        date: NaiveDate,
        start_time: &str,
    ) -> AppResult<bool> {
        self.queries()
            .staff_slot_taken(staff_id, date, start_time)
            .await
    }

    async fn list(
        &self,
        filter: ScopedFilter<AppointmentStatus>,
        page: PaginationParams,
    ) -> AppResult<(Vec<Appointment>, u64)> {
        self.queries().list(filter, page).await
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: AppointmentStatus,
        to: AppointmentStatus,
        cancellation_reason: Option<String>,
    ) -> AppResult<Option<Appointment>> {
        self.queries()
            .update_status(id, from, to, cancellation_reason)
            .await
    }

    async fn recent(&self, scope: RecordScope, limit: u64) -> AppResult<Vec<Appointment>> {
        self.queries().recent(scope, limit).await
    }

    async fn count(
        &self,
        scope: RecordScope,
        status: Option<AppointmentStatus>,
    ) -> AppResult<u64> {
        self.queries().count(scope, status).await
    }

    async fn count_upcoming(&self, scope: RecordScope, from: NaiveDate) -> AppResult<u64> {
        self.queries().count_upcoming(scope, from).await
    }

    async fn count_by_status(
        &self,
        scope: RecordScope,
    ) -> AppResult<Vec<(AppointmentStatus, u64)>> {
        self.queries().count_by_status(scope).await
    }
}
