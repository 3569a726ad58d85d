//! Places embedded in a city document.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use super::options::{Amenities, MenuOptions, ServiceOptions};
use super::ratings::Ratings;
use super::review::Review;
use crate::domain::{DocumentId, Error};

/// Operating status of a place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlaceStatus {
    /// Open for business.
    #[default]
    Operational,
    /// Permanently closed.
    Closed,
    /// Closed for a limited period.
    TemporaryClosed,
}

impl PlaceStatus {
    /// Every accepted status, in wire form.
    pub const ALL: [Self; 3] = [Self::Operational, Self::Closed, Self::TemporaryClosed];

    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Operational => "operational",
            Self::Closed => "closed",
            Self::TemporaryClosed => "temporary_closed",
        }
    }

    /// Parse a caller-supplied status, reporting the accepted values on
    /// failure.
    ///
    /// # Errors
    /// Returns an `invalid_parameter` error listing the valid statuses.
    pub fn parse_field(field: &str, value: &str) -> Result<Self, Error> {
        value.parse().map_err(|()| {
            let valid: Vec<&str> = Self::ALL.iter().map(|status| status.as_str()).collect();
            Error::invalid_parameter(field, value, "invalid status").with_details(json!({
                "field": field,
                "value": value,
                "code": "invalid_parameter",
                "valid_statuses": valid,
            }))
        })
    }
}

impl FromStr for PlaceStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for PlaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive information about a place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PlaceInfo {
    /// Display name.
    pub name: String,
    /// Free-form type tags such as `cafe` or `restaurant`.
    #[serde(rename = "type", default)]
    pub place_type: Vec<String>,
    /// Operating status.
    #[serde(default)]
    pub status: PlaceStatus,
}

/// Postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Address {
    /// Street line.
    #[serde(default)]
    pub street: String,
    /// Town or city.
    #[serde(default)]
    pub city: String,
    /// Postal code.
    #[serde(default)]
    pub postcode: String,
    /// Optional preformatted single-line address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_address: Option<String>,
}

/// WGS84 coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

/// Where a place is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    /// Postal address.
    #[serde(default)]
    pub address: Address,
    /// Map position.
    #[serde(default)]
    pub coordinates: Coordinates,
}

/// Day of the week used as a `business_hours` key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    /// Monday.
    Monday,
    /// Tuesday.
    Tuesday,
    /// Wednesday.
    Wednesday,
    /// Thursday.
    Thursday,
    /// Friday.
    Friday,
    /// Saturday.
    Saturday,
    /// Sunday.
    Sunday,
}

impl Weekday {
    /// Every day, Monday first.
    pub const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// Lowercase English day name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }

    /// Look a day up by its lowercase name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|day| day.as_str() == name)
    }
}

/// Opening and closing time for one day, kept as supplied (e.g. `08:00`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OpeningHours {
    /// Opening time.
    pub open: String,
    /// Closing time.
    pub close: String,
}

/// Photo references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Media {
    /// Photo URLs or storage keys.
    #[serde(default)]
    pub photos: Vec<String>,
}

/// A food venue embedded in a city.
///
/// ## Invariants
/// - `id` is unique within the owning city.
/// - `ratings` agrees with `ratings.recent_reviews` (see [`Ratings`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Place {
    /// Generated document identifier.
    #[schema(value_type = String, example = "65a1f0c2b3d4e5f60718293a")]
    pub id: DocumentId,
    /// Caller-supplied external identifier.
    pub place_id: String,
    /// Name, type tags and status.
    pub info: PlaceInfo,
    /// Address and coordinates.
    pub location: Location,
    /// Opening hours keyed by weekday.
    #[serde(default)]
    pub business_hours: BTreeMap<Weekday, OpeningHours>,
    /// Dining and meal service flags.
    #[serde(default)]
    pub service_options: ServiceOptions,
    /// Menu flags.
    #[serde(default)]
    pub menu_options: MenuOptions,
    /// Facility and accessibility flags.
    #[serde(default)]
    pub amenities: Amenities,
    /// Derived rating summary and the reviews it is computed from.
    #[serde(default)]
    pub ratings: Ratings,
    /// Photos.
    #[serde(default)]
    pub media: Media,
}

/// Validated input for a new place.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlace {
    /// Caller-supplied external identifier.
    pub place_id: String,
    /// Name, type tags and status.
    pub info: PlaceInfo,
    /// Address and coordinates.
    pub location: Location,
    /// Opening hours keyed by weekday.
    pub business_hours: BTreeMap<Weekday, OpeningHours>,
    /// Dining and meal service flags.
    pub service_options: ServiceOptions,
    /// Menu flags.
    pub menu_options: MenuOptions,
    /// Facility and accessibility flags.
    pub amenities: Amenities,
    /// Photos.
    pub media: Media,
    /// Reviews supplied alongside the place; the summary is recomputed.
    pub reviews: Vec<Review>,
}

impl NewPlace {
    /// Minimal place with default option skeletons.
    #[must_use]
    pub fn new(place_id: impl Into<String>, info: PlaceInfo, location: Location) -> Self {
        Self {
            place_id: place_id.into(),
            info,
            location,
            business_hours: BTreeMap::new(),
            service_options: ServiceOptions::default(),
            menu_options: MenuOptions::default(),
            amenities: Amenities::default(),
            media: Media::default(),
            reviews: Vec::new(),
        }
    }
}

impl Place {
    /// Materialise a new place under a freshly generated identifier.
    #[must_use]
    pub fn create(new: NewPlace) -> Self {
        let NewPlace {
            place_id,
            info,
            location,
            business_hours,
            service_options,
            menu_options,
            amenities,
            media,
            reviews,
        } = new;
        Self {
            id: DocumentId::generate(),
            place_id,
            info,
            location,
            business_hours,
            service_options,
            menu_options,
            amenities,
            ratings: Ratings::from_reviews(reviews),
            media,
        }
    }

    /// Case-insensitive membership test against the type tags.
    #[must_use]
    pub fn has_type(&self, wanted: &str) -> bool {
        self.info
            .place_type
            .iter()
            .any(|tag| tag.eq_ignore_ascii_case(wanted))
    }

    /// Locate an embedded review by identifier.
    #[must_use]
    pub fn review(&self, id: &DocumentId) -> Option<&Review> {
        self.ratings.recent_reviews.iter().find(|review| &review.id == id)
    }
}
