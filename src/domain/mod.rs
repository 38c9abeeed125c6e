//! Domain layer - Core business entities and logic
//!
//! Entities, value objects and the rules that do not need the store:
//! role capabilities, record scopes, the appointment status machine and
//! rating aggregation.

/// Declares a closed enum stored and transmitted as SCREAMING_SNAKE_CASE text.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize, utoipa::ToSchema,
        )]
        $vis enum $name {
            $($(#[$vmeta])* #[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::errors::AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(crate::errors::AppError::validation(format!(
                        "Invalid {} '{}'",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }
    };
}

pub mod appointment;
pub mod catalog;
pub mod counter;
pub mod lifecycle;
pub mod owner;
pub mod password;
pub mod payment;
pub mod review;
pub mod role;
pub mod salon;
pub mod scope;
pub mod staff;
pub mod user;

pub use appointment::{
    Appointment, AppointmentStatus, NewAppointment, StartTime, START_TIME_PATTERN,
};
pub use catalog::{NewSalonService, SalonService, SalonServiceChanges, ServiceCategory};
pub use counter::Counter;
pub use lifecycle::Lifecycle;
pub use owner::{AdminProfile, ApplicationStatus, BusinessDetails, SalonOwner};
pub use password::Password;
pub use payment::{NewPayment, Payment, PaymentMethod, PaymentStatus};
pub use review::{NewReview, RatingSummary, Review};
pub use role::{Action, Actor, Capability, Role, Visibility};
pub use salon::{NewSalon, Salon, SalonChanges, SalonStatus};
pub use scope::{RecordFilter, RecordScope, ScopedFilter};
pub use staff::{NewStaff, Staff, StaffChanges, StaffStatus};
pub use user::{
    Gender, NewUser, ProfileChanges, User, UserResponse, UserStatus, PHONE_PATTERN,
};
