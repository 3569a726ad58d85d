//! Port for the legacy business catalogue.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Business, DocumentId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by business repository adapters.
    pub enum BusinessRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "business repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "business repository query failed: {message}",
        /// Another writer replaced the document first.
        RevisionMismatch { expected: u32, actual: u32 } =>
            "revision mismatch: expected {expected}, found {actual}",
        /// The document disappeared between read and write.
        Missing { id: String } =>
            "business {id} does not exist",
    }
}

/// One page of businesses plus the total count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BusinessPage {
    pub businesses: Vec<Business>,
    pub total: u64,
}

/// Port for business storage; same revision contract as
/// [`super::CityRepository`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BusinessRepository: Send + Sync {
    /// Page through businesses in insertion order.
    async fn list(&self, page: &PageRequest) -> Result<BusinessPage, BusinessRepositoryError>;

    /// Fetch one business with its reviews.
    async fn find(&self, id: &DocumentId) -> Result<Option<Business>, BusinessRepositoryError>;

    /// Store a new business.
    async fn insert(&self, business: &Business) -> Result<(), BusinessRepositoryError>;

    /// Replace a business under a revision check.
    async fn replace(
        &self,
        business: &Business,
        expected_revision: u32,
    ) -> Result<(), BusinessRepositoryError>;

    /// Remove a business. Returns whether a row was deleted.
    async fn delete(&self, id: &DocumentId) -> Result<bool, BusinessRepositoryError>;
}
