//! Port for city document persistence.
//!
//! A city is stored whole: places and reviews live inside the document, so
//! every nested mutation is a read-modify-write of one city. Writers guard
//! the write with the revision they read.

use async_trait::async_trait;

use crate::domain::{City, CityListQuery, CitySummary, DocumentId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by city repository adapters.
    pub enum CityRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "city repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "city repository query failed: {message}",
        /// Another writer replaced the document first.
        RevisionMismatch { expected: u32, actual: u32 } =>
            "revision mismatch: expected {expected}, found {actual}",
        /// The document disappeared between read and write.
        Missing { id: String } =>
            "city {id} does not exist",
    }
}

/// One page of the city list plus the number of matches across all pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityPage {
    pub cities: Vec<CitySummary>,
    pub total: u64,
}

/// Port for city storage.
///
/// # Revision Semantics
///
/// - New cities start at revision 1.
/// - [`CityRepository::replace`] succeeds only when the stored revision
///   equals `expected_revision`, and stores `city.revision` as the new one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CityRepository: Send + Sync {
    /// Filter, sort and page the city list.
    async fn list(&self, query: &CityListQuery) -> Result<CityPage, CityRepositoryError>;

    /// Fetch one city with its places.
    async fn find(&self, id: &DocumentId) -> Result<Option<City>, CityRepositoryError>;

    /// Store a new city.
    async fn insert(&self, city: &City) -> Result<(), CityRepositoryError>;

    /// Replace a city under a revision check.
    async fn replace(&self, city: &City, expected_revision: u32)
    -> Result<(), CityRepositoryError>;

    /// Remove a city and everything embedded in it. Returns whether a row
    /// was deleted.
    async fn delete(&self, id: &DocumentId) -> Result<bool, CityRepositoryError>;
}
