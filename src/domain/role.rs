//! Roles and the capabilities they resolve to.
//!
//! `Role::capability` is the only place that decides what a role may do and
//! which records it may read. The HTTP gate and the scope resolver both ask it.

use uuid::Uuid;

use crate::errors::{AppError, AppResult};

string_enum! {
    /// Account role
    pub enum Role {
        Customer => "CUSTOMER",
        Staff => "STAFF",
        SalonOwner => "SALON_OWNER",
        Admin => "ADMIN",
    }
}

/// Which appointment-like records a role may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Records booked by the caller
    OwnRecords,
    /// Records assigned to the caller's staff profile
    AssignedRecords,
    /// Records of salons owned by the caller's owner profile
    OwnedSalons,
    Everything,
}

/// Operations gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    BookAppointment,
    ListOwnAppointments,
    ViewAppointments,
    ChangeAppointmentStatus,
    CancelOwnAppointment,
    ManageSalons,
    ModerateSalons,
    DeleteSalons,
    ManageUsers,
    ApplyForOwnership,
    ViewOwnApplication,
    ReviewApplications,
    WriteReview,
    RecordPayment,
    ViewPayments,
    ViewAdminDashboard,
    ViewOwnerDashboard,
    ViewCustomerDashboard,
}

/// What a role may do, resolved once per request.
#[derive(Debug, Clone, Copy)]
pub struct Capability {
    pub visibility: Visibility,
    actions: &'static [Action],
}

impl Capability {
    pub fn allows(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }
}

const CUSTOMER_ACTIONS: &[Action] = &[
    Action::BookAppointment,
    Action::ListOwnAppointments,
    Action::ViewAppointments,
    Action::ChangeAppointmentStatus,
    Action::CancelOwnAppointment,
    Action::ApplyForOwnership,
    Action::ViewOwnApplication,
    Action::WriteReview,
    Action::RecordPayment,
    Action::ViewPayments,
    Action::ViewCustomerDashboard,
];

const STAFF_ACTIONS: &[Action] = &[Action::ViewAppointments, Action::ChangeAppointmentStatus];

const OWNER_ACTIONS: &[Action] = &[
    Action::ViewAppointments,
    Action::ChangeAppointmentStatus,
    Action::ManageSalons,
    Action::DeleteSalons,
    Action::ViewOwnApplication,
    Action::RecordPayment,
    Action::ViewPayments,
    Action::ViewOwnerDashboard,
];

const ADMIN_ACTIONS: &[Action] = &[
    Action::ViewAppointments,
    Action::ChangeAppointmentStatus,
    Action::ModerateSalons,
    Action::DeleteSalons,
    Action::ManageUsers,
    Action::ReviewApplications,
    Action::RecordPayment,
    Action::ViewPayments,
    Action::ViewAdminDashboard,
];

impl Role {
    pub fn capability(self) -> Capability {
        match self {
            Role::Customer => Capability {
                visibility: Visibility::OwnRecords,
                actions: CUSTOMER_ACTIONS,
            },
            Role::Staff => Capability {
                visibility: Visibility::AssignedRecords,
                actions: STAFF_ACTIONS,
            },
            Role::SalonOwner => Capability {
                visibility: Visibility::OwnedSalons,
                actions: OWNER_ACTIONS,
            },
            Role::Admin => Capability {
                visibility: Visibility::Everything,
                actions: ADMIN_ACTIONS,
            },
        }
    }

    pub fn can(self, action: Action) -> bool {
        self.capability().allows(action)
    }
}

/// The authenticated caller as seen by services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    /// Fail with an authorization error unless the role allows `action`.
    pub fn require(&self, action: Action) -> AppResult<()> {
        if self.role.can(action) {
            Ok(())
        } else {
            Err(AppError::forbidden("Forbidden!"))
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_follows_role() {
        assert_eq!(Role::Customer.capability().visibility, Visibility::OwnRecords);
        assert_eq!(Role::Staff.capability().visibility, Visibility::AssignedRecords);
        assert_eq!(Role::SalonOwner.capability().visibility, Visibility::OwnedSalons);
        assert_eq!(Role::Admin.capability().visibility, Visibility::Everything);
    }

    #[test]
    fn only_customers_book_and_review() {
        for role in Role::ALL {
            let expected = *role == Role::Customer;
            assert_eq!(role.can(Action::BookAppointment), expected, "{role}");
            assert_eq!(role.can(Action::WriteReview), expected, "{role}");
        }
    }

    #[test]
    fn every_role_may_view_scoped_appointments() {
        assert!(Role::ALL.iter().all(|r| r.can(Action::ViewAppointments)));
    }

    #[test]
    fn staff_cannot_touch_payments() {
        assert!(!Role::Staff.can(Action::RecordPayment));
        assert!(!Role::Staff.can(Action::ViewPayments));
    }

    #[test]
    fn require_returns_forbidden() {
        let actor = Actor::new(Uuid::new_v4(), Role::Customer);
        assert!(actor.require(Action::BookAppointment).is_ok());
        let err = actor.require(Action::ManageUsers).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn role_round_trips_through_text() {
        assert_eq!("SALON_OWNER".parse::<Role>().unwrap(), Role::SalonOwner);
        assert_eq!(Role::SalonOwner.to_string(), "SALON_OWNER");
        assert!("owner".parse::<Role>().is_err());
    }
}
