//! Appointments, their status machine and who may move them along it.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{RecordScope, Role};
use crate::errors::{AppError, AppResult};

/// 24-hour `HH:MM`
pub static START_TIME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("valid start time regex"));

string_enum! {
    pub enum AppointmentStatus {
        Pending => "PENDING",
        Confirmed => "CONFIRMED",
        InProgress => "IN_PROGRESS",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
        NoShow => "NO_SHOW",
    }
}

impl AppointmentStatus {
    /// Statuses that occupy a staff member and a counter for their slot.
    pub const OCCUPYING: [AppointmentStatus; 2] =
        [AppointmentStatus::Pending, AppointmentStatus::Confirmed];

    pub fn occupies_slot(self) -> bool {
        Self::OCCUPYING.contains(&self)
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled | AppointmentStatus::NoShow
        )
    }

    pub fn can_transition_to(self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, InProgress)
                | (Confirmed, NoShow)
                | (Confirmed, Cancelled)
                | (InProgress, Completed)
        )
    }
}

/// Validated appointment start time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTime(String);

impl StartTime {
    pub fn parse(value: &str) -> AppResult<Self> {
        if START_TIME_PATTERN.is_match(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(AppError::validation("Start time must be in HH:MM format"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub salon_id: Uuid,
    pub service_id: Uuid,
    pub staff_id: Uuid,
    pub counter_id: Uuid,
    pub appointment_date: NaiveDate,
    #[schema(example = "10:00")]
    pub start_time: String,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Check that a caller of `role`, resolved to `scope`, may move this
    /// appointment to `next`.
    pub fn authorize_transition(
        &self,
        role: Role,
        scope: &RecordScope,
        next: AppointmentStatus,
    ) -> AppResult<()> {
        if !scope.covers(self.customer_id, self.staff_id, self.salon_id) {
            return Err(AppError::forbidden(match role {
                Role::Customer => "You can only update your own appointments",
                Role::Staff => "You can only update appointments assigned to you",
                _ => "You can only update appointments for your own salons",
            }));
        }

        if role == Role::Customer && next != AppointmentStatus::Cancelled {
            return Err(AppError::forbidden("Customers can only cancel appointments"));
        }

        if !self.status.can_transition_to(next) {
            return Err(AppError::forbidden(if next == AppointmentStatus::Cancelled {
                format!("Cannot cancel {} appointment", self.status)
            } else {
                format!("Cannot change appointment status from {} to {}", self.status, next)
            }));
        }

        Ok(())
    }
}

/// A booking request that passed input validation.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub customer_id: Uuid,
    pub salon_id: Uuid,
    pub service_id: Uuid,
    pub staff_id: Uuid,
    pub counter_id: Uuid,
    pub appointment_date: NaiveDate,
    pub start_time: StartTime,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use AppointmentStatus::*;

    fn appointment(status: AppointmentStatus) -> Appointment {
        let now = Utc::now();
        Appointment {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            salon_id: Uuid::new_v4(),
            service_id: Uuid::new_v4(),
            staff_id: Uuid::new_v4(),
            counter_id: Uuid::new_v4(),
            appointment_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            start_time: "10:00".into(),
            status,
            notes: None,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn terminal_statuses_have_no_exits() {
        for from in AppointmentStatus::ALL.iter().filter(|s| s.is_terminal()) {
            assert!(AppointmentStatus::ALL
                .iter()
                .all(|to| !from.can_transition_to(*to)));
        }
    }

    #[test]
    fn happy_path_is_allowed() {
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!InProgress.can_transition_to(Cancelled));
    }

    #[test]
    fn only_pending_and_confirmed_occupy_slots() {
        let occupying: Vec<_> = AppointmentStatus::ALL
            .iter()
            .filter(|s| s.occupies_slot())
            .collect();
        assert_eq!(occupying, vec![&Pending, &Confirmed]);
    }

    #[test]
    fn customer_cancels_own_pending_or_confirmed() {
        for status in [Pending, Confirmed] {
            let appt = appointment(status);
            let scope = RecordScope::Customer(appt.customer_id);
            assert!(appt
                .authorize_transition(Role::Customer, &scope, Cancelled)
                .is_ok());
        }
    }

    #[test]
    fn customer_cannot_cancel_finished_appointment() {
        for status in [Completed, Cancelled] {
            let appt = appointment(status);
            let scope = RecordScope::Customer(appt.customer_id);
            let err = appt
                .authorize_transition(Role::Customer, &scope, Cancelled)
                .unwrap_err();
            assert!(matches!(err, AppError::Forbidden(_)));
        }
    }

    #[test]
    fn customer_cannot_confirm() {
        let appt = appointment(Pending);
        let scope = RecordScope::Customer(appt.customer_id);
        assert!(appt
            .authorize_transition(Role::Customer, &scope, Confirmed)
            .is_err());
    }

    #[test]
    fn customer_cannot_touch_someone_elses_appointment() {
        let appt = appointment(Pending);
        let scope = RecordScope::Customer(Uuid::new_v4());
        assert!(appt
            .authorize_transition(Role::Customer, &scope, Cancelled)
            .is_err());
    }

    #[test]
    fn staff_and_owner_are_limited_to_their_records() {
        let appt = appointment(Pending);
        let assigned = RecordScope::Staff(appt.staff_id);
        assert!(appt
            .authorize_transition(Role::Staff, &assigned, Confirmed)
            .is_ok());

        let other_salons = RecordScope::Salons(vec![Uuid::new_v4()]);
        assert!(appt
            .authorize_transition(Role::SalonOwner, &other_salons, Confirmed)
            .is_err());

        let owned = RecordScope::Salons(vec![appt.salon_id]);
        assert!(appt
            .authorize_transition(Role::SalonOwner, &owned, Confirmed)
            .is_ok());
    }

    #[test]
    fn admin_still_follows_the_status_machine() {
        let appt = appointment(Completed);
        assert!(appt
            .authorize_transition(Role::Admin, &RecordScope::Unrestricted, Pending)
            .is_err());
    }

    #[test]
    fn start_time_format() {
        assert!(StartTime::parse("09:30").is_ok());
        assert!(StartTime::parse("23:59").is_ok());
        assert!(StartTime::parse("24:00").is_err());
        assert!(StartTime::parse("9:30").is_err());
        assert!(StartTime::parse("10:00 ").is_err());
    }
}
