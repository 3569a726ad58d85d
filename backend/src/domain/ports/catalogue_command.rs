//! Driving port for catalogue mutations.
//!
//! Every operation rewrites one city document. Implementations retry on
//! revision conflicts and report persistent conflicts as
//! [`crate::domain::ErrorCode::Conflict`].

use async_trait::async_trait;

use crate::domain::{
    CityPatch, DocumentId, Error, NewCity, NewPlace, NewReview, PlacePatch, PlaceStatus,
    RatingSummary, Review, ReviewPatch,
};

/// Outcome of adding a review.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewAdded {
    /// The stored review.
    pub review: Review,
    /// The place's summary after the review was counted.
    pub ratings: RatingSummary,
}

/// Write use-cases over the catalogue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueCommand: Send + Sync {
    /// Store a new city and return its identifier.
    async fn create_city(&self, city: NewCity) -> Result<DocumentId, Error>;

    /// Apply a partial update; returns the updated field names.
    async fn update_city(&self, city_id: &DocumentId, patch: CityPatch)
    -> Result<Vec<String>, Error>;

    /// Delete a city with everything it embeds.
    async fn delete_city(&self, city_id: &DocumentId) -> Result<(), Error>;

    /// Append a place and return its identifier.
    async fn add_place(&self, city_id: &DocumentId, place: NewPlace)
    -> Result<DocumentId, Error>;

    /// Apply a field mask to a place; returns the updated field paths.
    async fn update_place(
        &self,
        city_id: &DocumentId,
        place_id: &DocumentId,
        patch: PlacePatch,
    ) -> Result<Vec<String>, Error>;

    /// Remove a place and its reviews.
    async fn delete_place(&self, city_id: &DocumentId, place_id: &DocumentId)
    -> Result<(), Error>;

    /// Move a place to a different status. Setting the current status is a
    /// conflict.
    async fn set_place_status(
        &self,
        city_id: &DocumentId,
        place_id: &DocumentId,
        status: PlaceStatus,
    ) -> Result<PlaceStatus, Error>;

    /// Append a review and recompute the summary in the same write.
    async fn add_review(
        &self,
        city_id: &DocumentId,
        place_id: &DocumentId,
        review: NewReview,
    ) -> Result<ReviewAdded, Error>;

    /// Apply a field mask to a review and recompute the summary.
    async fn update_review(
        &self,
        city_id: &DocumentId,
        place_id: &DocumentId,
        review_id: &DocumentId,
        patch: ReviewPatch,
    ) -> Result<RatingSummary, Error>;

    /// Remove a review and recompute the summary.
    async fn delete_review(
        &self,
        city_id: &DocumentId,
        place_id: &DocumentId,
        review_id: &DocumentId,
    ) -> Result<RatingSummary, Error>;

    /// Recompute and persist a place's summary.
    async fn refresh_rating(
        &self,
        city_id: &DocumentId,
        place_id: &DocumentId,
    ) -> Result<RatingSummary, Error>;
}
