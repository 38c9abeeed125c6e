//! Reviews of completed appointments and the ratings they feed.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{MAX_RATING, MIN_RATING};
use crate::domain::{Action, Actor, AppointmentStatus, NewReview, Review};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::repositories::ReviewFilter;
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[derive(Debug, Clone)]
pub struct ReviewRequest {
    pub appointment_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
}

#[async_trait]
pub trait ReviewService: Send + Sync {
    /// Review a completed appointment and refresh the salon and staff ratings.
    async fn create(&self, actor: Actor, request: ReviewRequest) -> AppResult<Review>;

    async fn list(&self, filter: ReviewFilter, page: PaginationParams)
        -> AppResult<Paginated<Review>>;

    async fn get(&self, id: Uuid) -> AppResult<Review>;
}

const DUPLICATE_REVIEW: &str = "Review already exists for this appointment";

pub struct ReviewManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ReviewManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> ReviewService for ReviewManager<U> {
    async fn create(&self, actor: Actor, request: ReviewRequest) -> AppResult<Review> {
        actor.require(Action::WriteReview)?;
        if !(MIN_RATING..=MAX_RATING).contains(&request.rating) {
            return Err(AppError::validation(format!(
                "Rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            )));
        }
        let customer_id = actor.id;

        let review = self
            .uow
            .transaction(move |tx| {
                Box::pin(async move {
                    let appointment = tx
                        .appointments()
                        .find_by_id(request.appointment_id)
                        .await?
                        .ok_or_not_found("Appointment")?;
                    if appointment.customer_id != customer_id {
                        return Err(AppError::forbidden(
                            "You can only review your own appointments",
                        ));
                    }
                    if appointment.status != AppointmentStatus::Completed {
                        return Err(AppError::validation(
                            "You can only review completed appointments",
                        ));
                    }
                    if tx
                        .reviews()
                        .find_by_appointment(appointment.id)
                        .await?
                        .is_some()
                    {
                        return Err(AppError::conflict(DUPLICATE_REVIEW));
                    }

                    let review = tx
                        .reviews()
                        .create(NewReview {
                            appointment_id: appointment.id,
                            customer_id,
                            salon_id: appointment.salon_id,
                            staff_id: Some(appointment.staff_id),
                            rating: request.rating,
                            comment: request.comment,
                        })
                        .await?;

                    let salon_rating = tx.reviews().salon_rating(review.salon_id).await?;
                    tx.salons().set_rating(review.salon_id, salon_rating).await?;

                    if let Some(staff_id) = review.staff_id {
                        let staff_rating = tx.reviews().staff_rating(staff_id).await?;
                        tx.staff().set_rating(staff_id, staff_rating).await?;
                    }

                    tracing::info!(
                        review_id = %review.id,
                        salon_id = %review.salon_id,
                        salon_rating = salon_rating.average,
                        salon_reviews = salon_rating.count,
                        "Review aggregated"
                    );
                    Ok(review)
                })
            })
            .await
            .map_err(|e| {
                if e.is_unique_violation() {
                    AppError::conflict(DUPLICATE_REVIEW)
                } else {
                    e
                }
            })?;

        Ok(review)
    }

    async fn list(
        &self,
        filter: ReviewFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<Review>> {
        let (reviews, total) = self.uow.reviews().list(filter, page).await?;
        Ok(Paginated::new(reviews, page, total))
    }

    async fn get(&self, id: Uuid) -> AppResult<Review> {
        self.uow
            .reviews()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Review")
    }
}
