//! Driving port for catalogue reads.
//!
//! Inbound adapters call this port to browse cities, places and reviews
//! without knowing how documents are stored. List operations return a
//! [`Listing`] that already carries the pagination block and the record of
//! applied filters.

use async_trait::async_trait;
use pagination::PageInfo;

use crate::domain::{
    CityListQuery, CitySummary, DocumentId, Error, FiltersApplied, Place, PlaceFilter,
    PlaceListQuery, Review, ReviewListQuery,
};

/// One page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Page position and totals.
    pub page: PageInfo,
    /// Filters that shaped the result, plus the effective sort.
    pub filters_applied: FiltersApplied,
}

/// A single city, optionally with its filtered places.
#[derive(Debug, Clone, PartialEq)]
pub struct CityDetail {
    /// Identifier and names.
    pub city: CitySummary,
    /// Places, present only when requested.
    pub places: Option<Vec<Place>>,
    /// Place filters applied when places were requested.
    pub filters_applied: FiltersApplied,
}

/// Read use-cases over the catalogue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueQuery: Send + Sync {
    /// Filter, sort and page the city list. An empty result is an empty
    /// page, not an error.
    async fn list_cities(&self, query: CityListQuery) -> Result<Listing<CitySummary>, Error>;

    /// Fetch one city; `places` selects and filters the embedded places.
    async fn get_city(
        &self,
        city_id: &DocumentId,
        places: Option<PlaceFilter>,
    ) -> Result<CityDetail, Error>;

    /// Filter, sort and page a city's places.
    async fn list_places(
        &self,
        city_id: &DocumentId,
        query: PlaceListQuery,
    ) -> Result<Listing<Place>, Error>;

    /// Fetch one place.
    async fn get_place(&self, city_id: &DocumentId, place_id: &DocumentId)
    -> Result<Place, Error>;

    /// Filter, sort and page a place's reviews.
    async fn list_reviews(
        &self,
        city_id: &DocumentId,
        place_id: &DocumentId,
        query: ReviewListQuery,
    ) -> Result<Listing<Review>, Error>;

    /// Fetch one review.
    async fn get_review(
        &self,
        city_id: &DocumentId,
        place_id: &DocumentId,
        review_id: &DocumentId,
    ) -> Result<Review, Error>;
}
