//! Driving port for the legacy business catalogue.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{
    Business, BusinessDraft, BusinessReview, BusinessReviewDraft, DocumentId, Error,
};

/// Business catalogue use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BusinessCatalogue: Send + Sync {
    /// One page of businesses. An empty page is `not_found`.
    async fn list(&self, page: PageRequest) -> Result<Vec<Business>, Error>;

    /// Fetch a business.
    async fn get(&self, id: &DocumentId) -> Result<Business, Error>;

    /// Store a business and return its identifier.
    async fn create(&self, draft: BusinessDraft) -> Result<DocumentId, Error>;

    /// Replace a business's details, keeping its reviews.
    async fn replace(&self, id: &DocumentId, draft: BusinessDraft) -> Result<(), Error>;

    /// Delete a business.
    async fn delete(&self, id: &DocumentId) -> Result<(), Error>;

    /// Reviews of a business.
    async fn list_reviews(&self, id: &DocumentId) -> Result<Vec<BusinessReview>, Error>;

    /// One review of a business.
    async fn get_review(
        &self,
        id: &DocumentId,
        review_id: &DocumentId,
    ) -> Result<BusinessReview, Error>;

    /// Append a review and return its identifier.
    async fn add_review(
        &self,
        id: &DocumentId,
        draft: BusinessReviewDraft,
    ) -> Result<DocumentId, Error>;

    /// Replace a review.
    async fn replace_review(
        &self,
        id: &DocumentId,
        review_id: &DocumentId,
        draft: BusinessReviewDraft,
    ) -> Result<(), Error>;

    /// Delete a review.
    async fn delete_review(&self, id: &DocumentId, review_id: &DocumentId) -> Result<(), Error>;
}
