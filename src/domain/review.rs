use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Review of one completed appointment.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub customer_id: Uuid,
    pub salon_id: Uuid,
    pub staff_id: Option<Uuid>,
    #[schema(minimum = 1, maximum = 5)]
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub appointment_id: Uuid,
    pub customer_id: Uuid,
    pub salon_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub rating: i32,
    pub comment: Option<String>,
}

/// Aggregate rating of a salon or staff member.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    pub average: f64,
    pub count: i32,
}

impl RatingSummary {
    /// Build from a store-computed rating sum and review count.
    pub fn from_totals(sum: i64, count: i64) -> Self {
        if count <= 0 {
            return Self {
                average: 0.0,
                count: 0,
            };
        }
        Self {
            average: sum as f64 / count as f64,
            count: i32::try_from(count).unwrap_or(i32::MAX),
        }
    }

    pub fn from_ratings(ratings: &[i32]) -> Self {
        let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
        Self::from_totals(sum, ratings.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_reviews_means_zero() {
        assert_eq!(
            RatingSummary::from_totals(0, 0),
            RatingSummary {
                average: 0.0,
                count: 0
            }
        );
    }

    #[test]
    fn average_is_the_mean() {
        let summary = RatingSummary::from_ratings(&[5, 4, 3]);
        assert_eq!(summary.count, 3);
        assert!((summary.average - 4.0).abs() < f64::EPSILON);

        let summary = RatingSummary::from_ratings(&[5, 4]);
        assert!((summary.average - 4.5).abs() < f64::EPSILON);
    }
}
