//! Domain primitives, aggregates and services.
//!
//! Purpose: define the catalogue documents (cities, places, reviews), the
//! legacy business catalogue, account primitives and the services that
//! implement the driving ports. Types here are transport agnostic; HTTP
//! and persistence adapters depend on them, never the reverse.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - DocumentId: validated 24-digit hexadecimal identifier.
//! - catalogue: city, place and review documents plus list queries.

mod account_service;
pub mod auth;
pub mod business;
mod business_service;
pub mod catalogue;
mod catalogue_service;
pub mod error;
pub mod ids;
pub mod ports;
mod revision;
pub mod trace_id;

pub use self::account_service::{AccountPolicy, AccountPorts, AccountService, INVALID_CREDENTIALS};
pub use self::auth::{
    Account, Claims, IssuedToken, LoginCredentials, LoginValidationError, Principal,
    Registration, RegistrationInput, password_weakness,
};
pub use self::business::{Business, BusinessDraft, BusinessReview, BusinessReviewDraft};
pub use self::business_service::BusinessService;
pub use self::catalogue::{
    City, CityFilter, CityListQuery, CityPatch, CitySortField, CitySummary, FiltersApplied,
    NewCity, NewPlace, NewReview, OpeningHours, OptionFlag, Place, PlaceFilter, PlaceListQuery,
    PlacePatch, PlaceSortField, PlaceStatus, RatingRange, RatingSummary, Review, ReviewFilter,
    ReviewListQuery, ReviewPatch, ReviewSortField, Sort, SortOrder, Weekday, validate_rating,
};
pub use self::catalogue::{Address, Coordinates, Location, Media, PlaceInfo};
pub use self::catalogue_service::CatalogueService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, FailureKind};
pub use self::ids::{DocumentId, InvalidDocumentId, is_valid_document_id};
pub use self::revision::{MAX_WRITE_ATTEMPTS, Revisioned};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use food_places::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
