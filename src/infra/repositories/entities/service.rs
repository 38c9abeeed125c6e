//! Salon service (catalog item) entity.

use sea_orm::entity::prelude::*;

use super::{images_from_json, parse_column};
use crate::domain::{Lifecycle, SalonService};
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub salon_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: f64,
    pub duration: i32,
    pub images: Json,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for SalonService {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(SalonService {
            id: model.id,
            salon_id: model.salon_id,
            name: model.name,
            description: model.description,
            category: parse_column(&model.category, "services.category")?,
            price: model.price,
            duration: model.duration,
            images: images_from_json(model.images),
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
            lifecycle: Lifecycle::from_deleted_at(model.deleted_at),
        })
    }
}
