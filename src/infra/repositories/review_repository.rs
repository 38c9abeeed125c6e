//! Review repository and rating totals.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::review;
use super::fetch_page;
use crate::domain::{NewReview, RatingSummary, Review};
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, Clone, Default)]
pub struct ReviewFilter {
    pub salon_id: Option<Uuid>,
    pub staff_id: Option<Uuid>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// A second review for one appointment surfaces as a unique violation.
    async fn create(&self, review: NewReview) -> AppResult<Review>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Review>>;

    async fn find_by_appointment(&self, appointment_id: Uuid) -> AppResult<Option<Review>>;

    async fn list(&self, filter: ReviewFilter, page: PaginationParams)
        -> AppResult<(Vec<Review>, u64)>;

    /// Rating sum and count computed by the store.
    async fn salon_rating(&self, salon_id: Uuid) -> AppResult<RatingSummary>;

    async fn staff_rating(&self, staff_id: Uuid) -> AppResult<RatingSummary>;
}

pub struct ReviewQueries<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> ReviewQueries<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    async fn rating_where(&self, column: review::Column, id: Uuid) -> AppResult<RatingSummary> {
        let totals = review::Entity::find()
            .select_only()
            .column_as(review::Column::Rating.sum(), "sum")
            .column_as(review::Column::Id.count(), "count")
            .filter(column.eq(id))
            .into_tuple::<(Option<i64>, i64)>()
            .one(self.conn)
            .await?;

        Ok(match totals {
            Some((sum, count)) => RatingSummary::from_totals(sum.unwrap_or(0), count),
            None => RatingSummary::from_totals(0, 0),
        })
    }

    pub async fn create(&self, new_review: NewReview) -> AppResult<Review> {
        let model = review::ActiveModel {
            id: Set(Uuid::new_v4()),
            appointment_id: Set(new_review.appointment_id),
            customer_id: Set(new_review.customer_id),
            salon_id: Set(new_review.salon_id),
            staff_id: Set(new_review.staff_id),
            rating: Set(new_review.rating),
            comment: Set(new_review.comment),
            created_at: Set(Utc::now()),
        }
        .insert(self.conn)
        .await?;

        Ok(Review::from(model))
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Review>> {
        Ok(review::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .map(Review::from))
    }

    pub async fn find_by_appointment(&self, appointment_id: Uuid) -> AppResult<Option<Review>> {
        Ok(review::Entity::find()
            .filter(review::Column::AppointmentId.eq(appointment_id))
            .one(self.conn)
            .await?
            .map(Review::from))
    }

    pub async fn list(
        &self,
        filter: ReviewFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<Review>, u64)> {
        let mut query = review::Entity::find();
        if let Some(salon_id) = filter.salon_id {
            query = query.filter(review::Column::SalonId.eq(salon_id));
        }
        if let Some(staff_id) = filter.staff_id {
            query = query.filter(review::Column::StaffId.eq(staff_id));
        }

        let query = query.order_by_desc(review::Column::CreatedAt);
        let (models, total) = fetch_page(self.conn, query, page).await?;
        Ok((models.into_iter().map(Review::from).collect(), total))
    }

    pub async fn salon_rating(&self, salon_id: Uuid) -> AppResult<RatingSummary> {
        self.rating_where(review::Column::SalonId, salon_id).await
    }

    pub async fn staff_rating(&self, staff_id: Uuid) -> AppResult<RatingSummary> {
        self.rating_where(review::Column::StaffId, staff_id).await
    }
}

pub struct ReviewStore {
    db: DatabaseConnection,
}

impl ReviewStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn queries(&self) -> ReviewQueries<'_, DatabaseConnection> {
        ReviewQueries::new(&self.db)
    }
}

#[async_trait]
impl ReviewRepository for ReviewStore {
    async fn create(&self, review: NewReview) -> AppResult<Review> {
        self.queries().create(review).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Review>> {
        self.queries().find_by_id(id).await
    }

    async fn find_by_appointment(&self, appointment_id: Uuid) -> AppResult<Option<Review>> {
        self.queries().find_by_appointment(appointment_id).await
    }

    async fn list(
        &self,
        filter: ReviewFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<Review>, u64)> {
        self.queries().list(filter, page).await
    }

    async fn salon_rating(&self, salon_id: Uuid) -> AppResult<RatingSummary> {
        self.queries().salon_rating(salon_id).await
    }

    async fn staff_rating(&self, staff_id: Uuid) -> AppResult<RatingSummary> {
        self.queries().staff_rating(staff_id).await
    }
}
