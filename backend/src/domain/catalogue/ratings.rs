//! Rating aggregation.
//!
//! A place's summary is always derived from its embedded reviews: the mean
//! rating rounded to one decimal place (halves to even) and the number of
//! reviews, both zero when there are none. Every review mutation recomputes
//! the summary in the same document write.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::review::Review;

/// Derived summary plus the reviews it is computed from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Ratings {
    /// Mean rating rounded to one decimal place.
    #[serde(default)]
    pub average_rating: f64,
    /// Number of reviews.
    #[serde(default)]
    pub review_count: u64,
    /// Embedded reviews.
    #[serde(default)]
    pub recent_reviews: Vec<Review>,
}

/// The derived part of [`Ratings`], returned by review mutations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RatingSummary {
    /// Mean rating rounded to one decimal place.
    pub average_rating: f64,
    /// Number of reviews.
    pub review_count: u64,
}

/// Compute the summary for a sequence of review ratings.
///
/// # Examples
/// ```
/// use food_places::domain::catalogue::summarise;
///
/// let summary = summarise([4.0, 5.0, 3.0]);
/// assert_eq!(summary.average_rating, 4.0);
/// assert_eq!(summary.review_count, 3);
/// assert_eq!(summarise([]).average_rating, 0.0);
/// ```
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "averaging review ratings is inherently floating point"
)]
pub fn summarise(ratings: impl IntoIterator<Item = f64>) -> RatingSummary {
    let (sum, count) = ratings
        .into_iter()
        .fold((0.0_f64, 0_u64), |(sum, count), rating| (sum + rating, count + 1));
    if count == 0 {
        return RatingSummary::default();
    }
    let mean = sum / count as f64;
    RatingSummary {
        average_rating: (mean * 10.0).round_ties_even() / 10.0,
        review_count: count,
    }
}

impl Ratings {
    /// Build a consistent summary around `reviews`.
    #[must_use]
    pub fn from_reviews(reviews: Vec<Review>) -> Self {
        let mut ratings = Self {
            recent_reviews: reviews,
            ..Self::default()
        };
        ratings.recompute();
        ratings
    }

    /// Re-derive the average and count from the embedded reviews.
    pub fn recompute(&mut self) -> RatingSummary {
        let summary = summarise(self.recent_reviews.iter().map(|review| review.rating));
        self.average_rating = summary.average_rating;
        self.review_count = summary.review_count;
        summary
    }

    /// Current summary without recomputation.
    #[must_use]
    pub const fn summary(&self) -> RatingSummary {
        RatingSummary {
            average_rating: self.average_rating,
            review_count: self.review_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalogue::NewReview;
    use chrono::Utc;
    use rstest::rstest;

    fn review(rating: f64) -> Review {
        Review::create(
            NewReview {
                rating,
                author_name: "Sam".to_owned(),
                content: "ok".to_owned(),
                language: None,
            },
            Utc::now(),
        )
    }

    #[rstest]
    #[case(&[], 0.0, 0)]
    #[case(&[3.0], 3.0, 1)]
    #[case(&[4.0, 5.0, 3.0], 4.0, 3)]
    #[case(&[4.0, 5.0], 4.5, 2)]
    #[case(&[1.0, 2.0, 2.0], 1.7, 3)]
    #[case(&[5.0, 4.0, 4.0], 4.3, 3)]
    #[case(&[4.0, 4.0, 4.0, 5.0], 4.2, 4)]
    #[case(&[3.0, 3.0, 3.0, 4.0], 3.2, 4)]
    #[case(&[1.0, 1.0, 1.0, 2.0], 1.2, 4)]
    fn summary_is_rounded_mean(#[case] input: &[f64], #[case] average: f64, #[case] count: u64) {
        let summary = summarise(input.iter().copied());
        assert_eq!(summary.average_rating, average);
        assert_eq!(summary.review_count, count);
    }

    #[rstest]
    fn removing_the_last_review_zeroes_the_summary() {
        let mut ratings = Ratings::from_reviews(vec![review(4.0)]);
        assert_eq!(ratings.summary().review_count, 1);
        ratings.recent_reviews.clear();
        let summary = ratings.recompute();
        assert_eq!(summary, RatingSummary::default());
        assert_eq!(ratings.average_rating, 0.0);
    }

    #[rstest]
    fn from_reviews_overrides_supplied_totals() {
        let ratings = Ratings::from_reviews(vec![review(2.0), review(5.0)]);
        assert_eq!(ratings.average_rating, 3.5);
        assert_eq!(ratings.review_count, 2);
    }
}
