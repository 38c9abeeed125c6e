//! Administrator profile entity.

use sea_orm::entity::prelude::*;

use crate::domain::AdminProfile;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "admins")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for AdminProfile {
    fn from(model: Model) -> Self {
        AdminProfile {
            id: model.id,
            user_id: model.user_id,
            created_at: model.created_at,
        }
    }
}
