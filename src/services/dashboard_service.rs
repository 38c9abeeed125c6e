//! Role dashboards. Each one is a set of independent aggregates, run
//! concurrently.

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tokio::try_join;
use utoipa::ToSchema;

use super::access::owner_profile;
use crate::config::{CUSTOMER_RECENT_LIMIT, DASHBOARD_RECENT_LIMIT};
use crate::domain::{Action, Actor, Appointment, AppointmentStatus, RecordScope};
use crate::errors::AppResult;
use crate::infra::UnitOfWork;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
}

impl StatusCount {
    fn collect<S: std::fmt::Display>(rows: Vec<(S, u64)>) -> Vec<Self> {
        rows.into_iter()
            .map(|(status, count)| Self {
                status: status.to_string(),
                count,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: u64,
    pub total_salons: u64,
    pub total_appointments: u64,
    /// Sum of completed payments
    pub total_revenue: f64,
    pub recent_appointments: Vec<Appointment>,
    pub salons_by_status: Vec<StatusCount>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerStats {
    pub total_salons: u64,
    pub total_services: u64,
    pub total_staff: u64,
    pub total_appointments: u64,
    pub total_revenue: f64,
    pub recent_appointments: Vec<Appointment>,
    pub appointments_by_status: Vec<StatusCount>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerStats {
    pub total_appointments: u64,
    pub completed_appointments: u64,
    /// Active appointments from today on
    pub upcoming_appointments: u64,
    pub total_spent: f64,
    pub recent_appointments: Vec<Appointment>,
}

#[async_trait]
pub trait DashboardService: Send + Sync {
    async fn admin(&self, actor: Actor) -> AppResult<AdminStats>;

    async fn salon_owner(&self, actor: Actor) -> AppResult<OwnerStats>;

    async fn customer(&self, actor: Actor) -> AppResult<CustomerStats>;
}

pub struct DashboardManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> DashboardManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> DashboardService for DashboardManager<U> {
    async fn admin(&self, actor: Actor) -> AppResult<AdminStats> {
        actor.require(Action::ViewAdminDashboard)?;
        let (users, salons, appointments, payments) = (
            self.uow.users(),
            self.uow.salons(),
            self.uow.appointments(),
            self.uow.payments(),
        );

        let (
            total_users,
            total_salons,
            total_appointments,
            total_revenue,
            recent_appointments,
            salons_by_status,
        ) = try_join!(
            users.count(),
            salons.count(),
            appointments.count(RecordScope::Unrestricted, None),
            payments.revenue(RecordScope::Unrestricted),
            appointments.recent(RecordScope::Unrestricted, DASHBOARD_RECENT_LIMIT),
            salons.count_by_status(),
        )?;

        Ok(AdminStats {
            total_users,
            total_salons,
            total_appointments,
            total_revenue,
            recent_appointments,
            salons_by_status: StatusCount::collect(salons_by_status),
        })
    }

    async fn salon_owner(&self, actor: Actor) -> AppResult<OwnerStats> {
        actor.require(Action::ViewOwnerDashboard)?;
        let owner = owner_profile(self.uow.as_ref(), &actor).await?;
        let salon_ids = self.uow.salons().ids_owned_by(owner.id).await?;
        let scope = RecordScope::salons(salon_ids.clone());

        let (catalog, staff, appointments, payments) = (
            self.uow.catalog(),
            self.uow.staff(),
            self.uow.appointments(),
            self.uow.payments(),
        );

        let (
            total_services,
            total_staff,
            total_appointments,
            total_revenue,
            recent_appointments,
            appointments_by_status,
        ) = try_join!(
            catalog.count_in_salons(salon_ids.clone()),
            staff.count_in_salons(salon_ids.clone()),
            appointments.count(scope.clone(), None),
            payments.revenue(scope.clone()),
            appointments.recent(scope.clone(), DASHBOARD_RECENT_LIMIT),
            appointments.count_by_status(scope.clone()),
        )?;

        Ok(OwnerStats {
            total_salons: salon_ids.len() as u64,
            total_services,
            total_staff,
            total_appointments,
            total_revenue,
            recent_appointments,
            appointments_by_status: StatusCount::collect(appointments_by_status),
        })
    }

    async fn customer(&self, actor: Actor) -> AppResult<CustomerStats> {
        actor.require(Action::ViewCustomerDashboard)?;
        let scope = RecordScope::Customer(actor.id);
        let today = Utc::now().date_naive();
        let (appointments, payments) = (self.uow.appointments(), self.uow.payments());

        let (
            total_appointments,
            completed_appointments,
            upcoming_appointments,
            total_spent,
            recent_appointments,
        ) = try_join!(
            appointments.count(scope.clone(), None),
            appointments.count(scope.clone(), Some(AppointmentStatus::Completed)),
            appointments.count_upcoming(scope.clone(), today),
            payments.revenue(scope.clone()),
            appointments.recent(scope.clone(), CUSTOMER_RECENT_LIMIT),
        )?;

        Ok(CustomerStats {
            total_appointments,
            completed_appointments,
            upcoming_appointments,
            total_spent,
            recent_appointments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_counts_use_wire_names() {
        let rows = StatusCount::collect(vec![(AppointmentStatus::NoShow, 2)]);
        assert_eq!(rows[0].status, "NO_SHOW");
        assert_eq!(rows[0].count, 2);
    }
}
