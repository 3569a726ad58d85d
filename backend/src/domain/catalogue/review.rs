//! Reviews embedded in a place.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DocumentId, Error};

/// Lowest accepted review rating.
pub const MIN_REVIEW_RATING: f64 = 1.0;
/// Highest accepted review rating.
pub const MAX_REVIEW_RATING: f64 = 5.0;

fn default_language() -> String {
    "en".to_owned()
}

/// A rating plus comment left on a place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Review {
    /// Generated document identifier.
    #[schema(value_type = String, example = "65a1f0c2b3d4e5f60718293a")]
    pub id: DocumentId,
    /// Short display code, `rev_` plus six hex digits.
    #[schema(example = "rev_18293a")]
    pub review_id: String,
    /// Rating in `[1, 5]`.
    pub rating: f64,
    /// Display name of the reviewer.
    pub author_name: String,
    /// Review text.
    pub content: String,
    /// When the review was posted or last edited.
    pub date_posted: DateTime<Utc>,
    /// ISO 639-1 language code.
    #[serde(default = "default_language")]
    pub language: String,
}

/// Validate a review rating.
///
/// # Errors
/// Returns an `invalid_parameter` error for values outside `[1, 5]` or
/// non-finite values.
///
/// # Examples
/// ```
/// use food_places::domain::catalogue::validate_rating;
///
/// assert!(validate_rating(4.5).is_ok());
/// assert!(validate_rating(0.5).is_err());
/// ```
pub fn validate_rating(rating: f64) -> Result<f64, Error> {
    if rating.is_finite() && (MIN_REVIEW_RATING..=MAX_REVIEW_RATING).contains(&rating) {
        Ok(rating)
    } else {
        Err(Error::invalid_parameter(
            "rating",
            &rating.to_string(),
            "rating must be between 1 and 5",
        ))
    }
}

/// Validated input for a new review.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    /// Rating in `[1, 5]`.
    pub rating: f64,
    /// Display name of the reviewer.
    pub author_name: String,
    /// Review text.
    pub content: String,
    /// Language code; defaults to `en`.
    pub language: Option<String>,
}

/// Field mask for review edits. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewPatch {
    /// Replacement rating.
    pub rating: Option<f64>,
    /// Replacement text.
    pub content: Option<String>,
    /// Replacement author.
    pub author_name: Option<String>,
}

impl ReviewPatch {
    /// Whether the patch sets nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rating.is_none() && self.content.is_none() && self.author_name.is_none()
    }
}

impl Review {
    /// Create a review stamped with `now`.
    #[must_use]
    pub fn create(new: NewReview, now: DateTime<Utc>) -> Self {
        let id = DocumentId::generate();
        let review_id = DocumentId::generate().short_code("rev");
        Self {
            id,
            review_id,
            rating: new.rating,
            author_name: new.author_name,
            content: new.content,
            date_posted: now,
            language: new.language.unwrap_or_else(default_language),
        }
    }

    /// Apply a field mask and refresh the posting time.
    pub fn apply(&mut self, patch: ReviewPatch, now: DateTime<Utc>) {
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(author_name) = patch.author_name {
            self.author_name = author_name;
        }
        self.date_posted = now;
    }

    /// Posting time as an RFC 3339 string, used for date-range filters.
    #[must_use]
    pub fn date_posted_text(&self) -> String {
        self.date_posted.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}
