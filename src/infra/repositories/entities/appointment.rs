//! Appointment entity.

use sea_orm::entity::prelude::*;

use super::parse_column;
use crate::domain::Appointment;
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "appointments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub salon_id: Uuid,
    pub service_id: Uuid,
    pub staff_id: Uuid,
    pub counter_id: Uuid,
    pub appointment_date: Date,
    pub start_time: String,
    pub status: String,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Appointment {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(Appointment {
            id: model.id,
            customer_id: model.customer_id,
            salon_id: model.salon_id,
            service_id: model.service_id,
            staff_id: model.staff_id,
            counter_id: model.counter_id,
            appointment_date: model.appointment_date,
            start_time: model.start_time,
            status: parse_column(&model.status, "appointments.status")?,
            notes: model.notes,
            cancellation_reason: model.cancellation_reason,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
