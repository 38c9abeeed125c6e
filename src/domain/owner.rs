//! Role profiles that extend a user: salon owners (with their application
//! state) and administrators.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

string_enum! {
    pub enum ApplicationStatus {
        Pending => "PENDING",
        Approved => "APPROVED",
        Rejected => "REJECTED",
    }
}

/// Salon owner profile. Doubles as the application to become an owner.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalonOwner {
    pub id: Uuid,
    pub user_id: Uuid,
    pub business_name: Option<String>,
    pub business_address: Option<String>,
    pub business_phone: Option<String>,
    pub business_email: Option<String>,
    pub document_url: Option<String>,
    pub application_status: ApplicationStatus,
    pub verification_status: bool,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SalonOwner {
    /// Whether the user may submit a new application over this one.
    ///
    /// Pending and approved applications block; a rejected one is replaced.
    pub fn ensure_can_reapply(&self) -> AppResult<()> {
        match self.application_status {
            ApplicationStatus::Pending => Err(AppError::conflict(
                "You already have a pending application",
            )),
            ApplicationStatus::Approved => Err(AppError::conflict(
                "Your application has already been approved",
            )),
            ApplicationStatus::Rejected => Ok(()),
        }
    }

    pub fn ensure_pending(&self) -> AppResult<()> {
        if self.application_status == ApplicationStatus::Pending {
            Ok(())
        } else {
            Err(AppError::validation(format!(
                "Application is already {}",
                self.application_status
            )))
        }
    }
}

/// Business details submitted with an application.
#[derive(Debug, Clone, Default)]
pub struct BusinessDetails {
    pub business_name: Option<String>,
    pub business_address: Option<String>,
    pub business_phone: Option<String>,
    pub business_email: Option<String>,
    pub document_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn application(status: ApplicationStatus) -> SalonOwner {
        let now = Utc::now();
        SalonOwner {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            business_name: Some("Shear Bliss".into()),
            business_address: None,
            business_phone: None,
            business_email: None,
            document_url: None,
            application_status: status,
            verification_status: false,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn reapplying_is_only_allowed_after_rejection() {
        assert!(application(ApplicationStatus::Rejected)
            .ensure_can_reapply()
            .is_ok());
        assert!(matches!(
            application(ApplicationStatus::Pending).ensure_can_reapply(),
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            application(ApplicationStatus::Approved).ensure_can_reapply(),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn decisions_need_a_pending_application() {
        assert!(application(ApplicationStatus::Pending).ensure_pending().is_ok());
        assert!(application(ApplicationStatus::Approved).ensure_pending().is_err());
    }
}
