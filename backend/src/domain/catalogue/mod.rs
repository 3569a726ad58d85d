//! Food places catalogue: cities embedding places embedding reviews.
//!
//! A city is stored as one document. Places and reviews have their own
//! identifiers but no independent storage; every mutation of a nested element
//! rewrites the owning city.

mod city;
mod filters;
mod options;
mod patch;
mod place;
mod ratings;
mod review;

pub use city::{City, CityPatch, CitySummary, NewCity};
pub use filters::{
    AppliedSort, CityFilter, CityListQuery, CitySortField, FiltersApplied, PlaceFilter,
    PlaceListQuery, PlaceSortField, RATING_CEILING, RATING_FLOOR, RatingRange, ReviewFilter,
    ReviewListQuery, ReviewSortField, Sort, SortField, SortOrder, parse_flag,
};
pub use options::{
    Accessibility, Amenities, Dining, DrinksMenu, Facilities, FoodMenu, Meals, MenuOptions,
    OptionFlag, ServiceOptions,
};
pub use patch::PlacePatch;
pub use place::{
    Address, Coordinates, Location, Media, NewPlace, OpeningHours, Place, PlaceInfo, PlaceStatus,
    Weekday,
};
pub use ratings::{RatingSummary, Ratings, summarise};
pub use review::{
    MAX_REVIEW_RATING, MIN_REVIEW_RATING, NewReview, Review, ReviewPatch, validate_rating,
};
