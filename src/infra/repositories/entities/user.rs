//! User database entity.

use sea_orm::entity::prelude::*;

use super::parse_column;
use crate::domain::{Lifecycle, User};
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<Date>,
    pub address: Option<String>,
    pub profile_photo: Option<String>,
    pub role: String,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    /// Soft delete timestamp (NULL = active, set = deleted)
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for User {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(User {
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            name: model.name,
            phone: model.phone,
            gender: model
                .gender
                .as_deref()
                .map(|g| parse_column(g, "users.gender"))
                .transpose()?,
            date_of_birth: model.date_of_birth,
            address: model.address,
            profile_photo: model.profile_photo,
            role: parse_column(&model.role, "users.role")?,
            status: parse_column(&model.status, "users.status")?,
            created_at: model.created_at,
            updated_at: model.updated_at,
            lifecycle: Lifecycle::from_deleted_at(model.deleted_at),
        })
    }
}
