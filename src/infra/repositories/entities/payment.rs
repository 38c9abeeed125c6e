//! Payment entity.

use sea_orm::entity::prelude::*;

use super::parse_column;
use crate::domain::Payment;
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub appointment_id: Uuid,
    pub amount: f64,
    pub payment_method: String,
    pub status: String,
    pub transaction_id: Option<String>,
    pub payment_date: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Payment {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(Payment {
            id: model.id,
            appointment_id: model.appointment_id,
            amount: model.amount,
            payment_method: parse_column(&model.payment_method, "payments.payment_method")?,
            status: parse_column(&model.status, "payments.status")?,
            transaction_id: model.transaction_id,
            payment_date: model.payment_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
