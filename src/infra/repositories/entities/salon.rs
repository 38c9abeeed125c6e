//! Salon entity.

use sea_orm::entity::prelude::*;

use super::{images_from_json, parse_column};
use crate::domain::{Lifecycle, Salon};
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "salons")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub images: Json,
    pub operating_hours: Option<Json>,
    pub status: String,
    pub rating: f64,
    pub total_reviews: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Salon {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(Salon {
            id: model.id,
            owner_id: model.owner_id,
            name: model.name,
            description: model.description,
            address: model.address,
            city: model.city,
            state: model.state,
            zip_code: model.zip_code,
            phone: model.phone,
            email: model.email,
            images: images_from_json(model.images),
            operating_hours: model.operating_hours,
            status: parse_column(&model.status, "salons.status")?,
            rating: model.rating,
            total_reviews: model.total_reviews,
            created_at: model.created_at,
            updated_at: model.updated_at,
            lifecycle: Lifecycle::from_deleted_at(model.deleted_at),
        })
    }
}
