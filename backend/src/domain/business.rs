//! Legacy business catalogue documents.
//!
//! Businesses are flat documents with an embedded list of reviews. Input
//! arrives as form fields, so the constructors here take raw strings and
//! report the field that failed.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{DocumentId, Error};

/// Lowest accepted number of stars on a business review.
pub const MIN_STARS: u8 = 1;
/// Highest accepted number of stars on a business review.
pub const MAX_STARS: u8 = 5;

/// A listed business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Business {
    /// Generated document identifier.
    #[schema(value_type = String, example = "65a1f0c2b3d4e5f60718293a")]
    pub id: DocumentId,
    /// Trading name.
    pub name: String,
    /// Town the business trades in.
    pub town: String,
    /// Headline rating.
    pub rating: f64,
    /// Embedded reviews.
    #[serde(default)]
    pub reviews: Vec<BusinessReview>,
    /// Compare-and-swap counter; never exposed.
    #[serde(skip)]
    pub revision: u32,
}

/// A review embedded in a business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BusinessReview {
    /// Generated document identifier.
    #[schema(value_type = String)]
    pub id: DocumentId,
    /// Reviewer.
    pub username: String,
    /// Review text.
    pub comment: String,
    /// Star rating in `1..=5`.
    pub stars: u8,
}

/// Validated business fields, used for creation and full replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessDraft {
    name: String,
    town: String,
    rating: f64,
}

/// Validated review fields, used for creation and full replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessReviewDraft {
    username: String,
    comment: String,
    stars: u8,
}

fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, Error> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| Error::missing_field(field))
}

impl BusinessDraft {
    /// Validate raw form values.
    ///
    /// # Errors
    /// `missing_field` when a value is absent or blank; `invalid_parameter`
    /// when the rating is not a number between 0 and 5.
    ///
    /// # Examples
    /// ```
    /// use food_places::domain::BusinessDraft;
    ///
    /// assert!(BusinessDraft::parse(Some("Pie Shop"), Some("Leeds"), Some("4.5")).is_ok());
    /// assert!(BusinessDraft::parse(Some("Pie Shop"), None, Some("4.5")).is_err());
    /// ```
    pub fn parse(
        name: Option<&str>,
        town: Option<&str>,
        rating: Option<&str>,
    ) -> Result<Self, Error> {
        let name = required("name", name)?;
        let town = required("town", town)?;
        let raw_rating = required("rating", rating)?;
        let rating = raw_rating
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && (0.0..=5.0).contains(value))
            .ok_or_else(|| {
                Error::invalid_parameter("rating", raw_rating, "rating must be between 0 and 5")
            })?;
        Ok(Self {
            name: name.to_owned(),
            town: town.to_owned(),
            rating,
        })
    }
}

impl BusinessReviewDraft {
    /// Validate raw form values.
    ///
    /// # Errors
    /// `missing_field` when a value is absent or blank; `invalid_parameter`
    /// when `stars` is not a whole number between 1 and 5.
    pub fn parse(
        username: Option<&str>,
        comment: Option<&str>,
        stars: Option<&str>,
    ) -> Result<Self, Error> {
        let username = required("username", username)?;
        let comment = required("comment", comment)?;
        let raw_stars = required("stars", stars)?;
        let stars = raw_stars
            .parse::<u8>()
            .ok()
            .filter(|value| (MIN_STARS..=MAX_STARS).contains(value))
            .ok_or_else(|| {
                Error::invalid_parameter("stars", raw_stars, "stars must be between 1 and 5")
            })?;
        Ok(Self {
            username: username.to_owned(),
            comment: comment.to_owned(),
            stars,
        })
    }
}

impl Business {
    /// Create a business with no reviews.
    #[must_use]
    pub fn create(draft: BusinessDraft) -> Self {
        Self {
            id: DocumentId::generate(),
            name: draft.name,
            town: draft.town,
            rating: draft.rating,
            reviews: Vec::new(),
            revision: 1,
        }
    }

    /// Replace the descriptive fields, keeping reviews.
    pub fn replace_details(&mut self, draft: BusinessDraft) {
        self.name = draft.name;
        self.town = draft.town;
        self.rating = draft.rating;
    }

    /// Append a review and return its identifier.
    pub fn add_review(&mut self, draft: BusinessReviewDraft) -> DocumentId {
        let id = DocumentId::generate();
        self.reviews.push(BusinessReview {
            id: id.clone(),
            username: draft.username,
            comment: draft.comment,
            stars: draft.stars,
        });
        id
    }

    /// Locate a review.
    #[must_use]
    pub fn review(&self, id: &DocumentId) -> Option<&BusinessReview> {
        self.reviews.iter().find(|review| &review.id == id)
    }

    /// Replace a review's fields.
    ///
    /// # Errors
    /// `not_found` when the business has no such review.
    pub fn replace_review(
        &mut self,
        id: &DocumentId,
        draft: BusinessReviewDraft,
    ) -> Result<(), Error> {
        let review = self
            .reviews
            .iter_mut()
            .find(|review| &review.id == id)
            .ok_or_else(|| Error::not_found("review not found"))?;
        review.username = draft.username;
        review.comment = draft.comment;
        review.stars = draft.stars;
        Ok(())
    }

    /// Remove a review.
    ///
    /// # Errors
    /// `not_found` when the business has no such review.
    pub fn remove_review(&mut self, id: &DocumentId) -> Result<(), Error> {
        let before = self.reviews.len();
        self.reviews.retain(|review| &review.id != id);
        if self.reviews.len() == before {
            return Err(Error::not_found("review not found"));
        }
        Ok(())
    }
}
