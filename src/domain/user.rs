//! User domain entity and related types.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Lifecycle, Role};

/// Digits with an optional leading `+`, separators allowed.
pub static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 \-]{6,18}[0-9]$").expect("valid phone regex"));

string_enum! {
    /// Account status; only ACTIVE accounts may authenticate
    pub enum UserStatus {
        Active => "ACTIVE",
        Inactive => "INACTIVE",
        Suspended => "SUSPENDED",
        Blocked => "BLOCKED",
        Deleted => "DELETED",
    }
}

string_enum! {
    pub enum Gender {
        Male => "MALE",
        Female => "FEMALE",
        Other => "OTHER",
    }
}

/// User domain entity
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub profile_photo: Option<String>,
    pub role: Role,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub lifecycle: Lifecycle,
}

impl User {
    /// Whether the account may sign in and call authenticated endpoints
    pub fn can_authenticate(&self) -> bool {
        self.lifecycle.is_active() && self.status == UserStatus::Active
    }
}

/// Account about to be inserted. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: Role,
}

/// Profile fields a user (or an admin) may change.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub profile_photo: Option<String>,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "user@example.com")]
    pub email: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub profile_photo: Option<String>,
    pub role: Role,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            phone: user.phone,
            gender: user.gender,
            date_of_birth: user.date_of_birth,
            address: user.address,
            profile_photo: user.profile_photo,
            role: user.role,
            status: user.status,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(status: UserStatus, lifecycle: Lifecycle) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: "jane@example.com".into(),
            password_hash: "hash".into(),
            name: "Jane".into(),
            phone: None,
            gender: None,
            date_of_birth: None,
            address: None,
            profile_photo: None,
            role: Role::Customer,
            status,
            created_at: now,
            updated_at: now,
            lifecycle,
        }
    }

    #[test]
    fn only_active_accounts_authenticate() {
        assert!(user(UserStatus::Active, Lifecycle::Active).can_authenticate());
        assert!(!user(UserStatus::Blocked, Lifecycle::Active).can_authenticate());
        let deleted = Lifecycle::Deleted { at: Utc::now() };
        assert!(!user(UserStatus::Active, deleted).can_authenticate());
    }

    #[test]
    fn phone_numbers() {
        assert!(PHONE_PATTERN.is_match("+880 1712-345678"));
        assert!(PHONE_PATTERN.is_match("01712345678"));
        assert!(!PHONE_PATTERN.is_match("call me"));
        assert!(!PHONE_PATTERN.is_match("12"));
    }

    #[test]
    fn response_hides_password_hash() {
        let json = serde_json::to_string(&UserResponse::from(user(
            UserStatus::Active,
            Lifecycle::Active,
        )))
        .unwrap();
        assert!(!json.contains("hash"));
        assert!(json.contains("\"role\":\"CUSTOMER\""));
    }
}
