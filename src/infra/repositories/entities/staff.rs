//! Staff profile entity. Service links live in `staff_services`.

use sea_orm::entity::prelude::*;

use super::parse_column;
use crate::domain::{Lifecycle, Staff};
use crate::errors::AppResult;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "staff")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub salon_id: Uuid,
    pub speciality: Option<String>,
    pub experience: Option<i32>,
    pub bio: Option<String>,
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

impl Model {
    pub fn into_domain(self, service_ids: Vec<Uuid>) -> AppResult<Staff> {
        Ok(Staff {
            id: self.id,
            user_id: self.user_id,
            salon_id: self.salon_id,
            speciality: self.speciality,
            experience: self.experience,
            bio: self.bio,
            status: parse_column(&self.status, "staff.status")?,
            rating: self.rating,
            total_reviews: self.total_reviews,
            service_ids,
            created_at: self.created_at,
            updated_at: self.updated_at,
            lifecycle: Lifecycle::from_deleted_at(self.deleted_at),
        })
    }
}
