//! Salon owner profile / application entity.

use sea_orm::entity::prelude::*;

use super::parse_column;
use crate::domain::SalonOwner;
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "salon_owners")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub business_name: Option<String>,
    pub business_address: Option<String>,
    pub business_phone: Option<String>,
    pub business_email: Option<String>,
    pub document_url: Option<String>,
    pub application_status: String,
    pub verification_status: bool,
    pub rejection_reason: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for SalonOwner {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(SalonOwner {
            id: model.id,
            user_id: model.user_id,
            business_name: model.business_name,
            business_address: model.business_address,
            business_phone: model.business_phone,
            business_email: model.business_email,
            document_url: model.document_url,
            application_status: parse_column(
                &model.application_status,
                "salon_owners.application_status",
            )?,
            verification_status: model.verification_status,
            rejection_reason: model.rejection_reason,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
