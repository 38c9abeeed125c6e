//! Counter entity.

use sea_orm::entity::prelude::*;

use crate::domain::{Counter, Lifecycle};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "counters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub salon_id: Uuid,
    pub name: String,
    pub code: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Counter {
    fn from(model: Model) -> Self {
        Counter {
            id: model.id,
            salon_id: model.salon_id,
            name: model.name,
            code: model.code,
            created_at: model.created_at,
            updated_at: model.updated_at,
            lifecycle: Lifecycle::from_deleted_at(model.deleted_at),
        }
    }
}
