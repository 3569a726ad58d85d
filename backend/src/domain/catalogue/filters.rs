//! List filters, sort orders and the `filters_applied` record.
//!
//! Query parameters arrive as optional raw strings. The parsers here turn
//! them into predicates over cities, places and reviews; every predicate is
//! conjunctive and only the filters a caller actually supplied are echoed
//! back in [`FiltersApplied`].

use std::cmp::Ordering;
use std::collections::BTreeMap;

use pagination::PageRequest;
use serde::Serialize;
use utoipa::ToSchema;

use super::city::City;
use super::options::OptionFlag;
use super::place::Place;
use super::review::Review;
use crate::domain::Error;

/// Lower bound applied when only `max_rating` is given.
pub const RATING_FLOOR: f64 = 0.0;
/// Upper bound applied when only `min_rating` is given.
pub const RATING_CEILING: f64 = 5.0;

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

/// Ascending or descending order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl SortOrder {
    /// `desc` (any case) selects descending order; any other supplied value
    /// selects ascending order; absence selects `default`.
    ///
    /// # Examples
    /// ```
    /// use food_places::domain::catalogue::SortOrder;
    ///
    /// assert_eq!(SortOrder::parse(Some("DESC"), SortOrder::Asc), SortOrder::Desc);
    /// assert_eq!(SortOrder::parse(Some("sideways"), SortOrder::Desc), SortOrder::Asc);
    /// assert_eq!(SortOrder::parse(None, SortOrder::Desc), SortOrder::Desc);
    /// ```
    #[must_use]
    pub fn parse(raw: Option<&str>, default: Self) -> Self {
        match present(raw) {
            Some(value) if value.eq_ignore_ascii_case("desc") => Self::Desc,
            Some(_) => Self::Asc,
            None => default,
        }
    }

    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// A sortable field of some listing.
pub trait SortField: Copy + Default + 'static {
    /// Every accepted field.
    const ALL: &'static [Self];

    /// Query-string name of the field.
    fn as_str(self) -> &'static str;

    /// Resolve a requested field, falling back to the default for unknown
    /// or absent values.
    #[must_use]
    fn parse(raw: Option<&str>) -> Self {
        present(raw)
            .and_then(|value| Self::ALL.iter().copied().find(|field| field.as_str() == value))
            .unwrap_or_default()
    }
}

/// City list sort fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CitySortField {
    /// Alphabetical by name.
    #[default]
    CityName,
}

impl SortField for CitySortField {
    const ALL: &'static [Self] = &[Self::CityName];

    fn as_str(self) -> &'static str {
        "city_name"
    }
}

/// Place list sort fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaceSortField {
    /// Alphabetical by place name.
    #[default]
    Name,
    /// By average rating.
    Rating,
    /// By number of reviews.
    ReviewCount,
}

impl SortField for PlaceSortField {
    const ALL: &'static [Self] = &[Self::Name, Self::Rating, Self::ReviewCount];

    fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Rating => "rating",
            Self::ReviewCount => "review_count",
        }
    }
}

/// Review list sort fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReviewSortField {
    /// By posting time.
    #[default]
    DatePosted,
    /// By rating.
    Rating,
}

impl SortField for ReviewSortField {
    const ALL: &'static [Self] = &[Self::DatePosted, Self::Rating];

    fn as_str(self) -> &'static str {
        match self {
            Self::DatePosted => "date_posted",
            Self::Rating => "rating",
        }
    }
}

/// Effective sort of a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sort<F> {
    /// Field to sort by.
    pub field: F,
    /// Direction.
    pub order: SortOrder,
}

impl<F: SortField> Sort<F> {
    /// Parse `sort_by` and `sort_order`.
    #[must_use]
    pub fn parse(sort_by: Option<&str>, sort_order: Option<&str>, default_order: SortOrder) -> Self {
        Self {
            field: F::parse(sort_by),
            order: SortOrder::parse(sort_order, default_order),
        }
    }

    fn describe(&self) -> AppliedSort {
        AppliedSort {
            field: self.field.as_str().to_owned(),
            direction: self.order.as_str().to_owned(),
        }
    }
}

/// Inclusive rating bounds; absent bounds default to `[0, 5]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RatingRange {
    min: Option<f64>,
    max: Option<f64>,
}

fn parse_bound(field: &str, raw: Option<&str>) -> Result<Option<f64>, Error> {
    let Some(value) = present(raw) else {
        return Ok(None);
    };
    match value.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() && (RATING_FLOOR..=RATING_CEILING).contains(&parsed) => {
            Ok(Some(parsed))
        }
        Ok(_) => Err(Error::invalid_parameter(
            field,
            value,
            format!("{field} must be between 0 and 5"),
        )),
        Err(_) => Err(Error::invalid_parameter(
            field,
            value,
            format!("{field} must be a number"),
        )),
    }
}

impl RatingRange {
    /// Parse `min_rating` and `max_rating`.
    ///
    /// # Errors
    /// Returns `invalid_parameter` for non-numeric values, values outside
    /// `[0, 5]`, or a minimum above the maximum.
    ///
    /// # Examples
    /// ```
    /// use food_places::domain::catalogue::RatingRange;
    ///
    /// let range = RatingRange::parse(Some("4"), Some("5")).expect("valid range");
    /// assert!(range.contains(4.5));
    /// assert!(!range.contains(3.9));
    /// assert!(RatingRange::parse(Some("abc"), None).is_err());
    /// ```
    pub fn parse(min: Option<&str>, max: Option<&str>) -> Result<Self, Error> {
        let range = Self {
            min: parse_bound("min_rating", min)?,
            max: parse_bound("max_rating", max)?,
        };
        if let (Some(low), Some(high)) = (range.min, range.max) {
            if low > high {
                return Err(Error::invalid_parameter(
                    "min_rating",
                    &low.to_string(),
                    "min_rating must not exceed max_rating",
                ));
            }
        }
        Ok(range)
    }

    /// Whether `rating` lies inside the bounds.
    #[must_use]
    pub fn contains(&self, rating: f64) -> bool {
        rating >= self.min.unwrap_or(RATING_FLOOR) && rating <= self.max.unwrap_or(RATING_CEILING)
    }

    fn describe(&self, applied: &mut FiltersApplied) {
        applied.min_rating = self.min;
        applied.max_rating = self.max;
    }
}

/// Read a literal `true`/`false` flag; anything else is ignored.
///
/// # Examples
/// ```
/// use food_places::domain::catalogue::parse_flag;
///
/// assert_eq!(parse_flag(Some("TRUE")), Some(true));
/// assert_eq!(parse_flag(Some("yes")), None);
/// ```
#[must_use]
pub fn parse_flag(raw: Option<&str>) -> Option<bool> {
    match present(raw) {
        Some(value) if value.eq_ignore_ascii_case("true") => Some(true),
        Some(value) if value.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// City list predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityFilter {
    /// Case-insensitive substring of the city name.
    pub name: Option<String>,
}

impl CityFilter {
    /// Whether `city` satisfies the filter.
    #[must_use]
    pub fn matches(&self, city: &City) -> bool {
        self.name
            .as_deref()
            .is_none_or(|name| contains_ignore_case(&city.city_name, name))
    }
}

/// Place predicate shared by the place list and the city detail view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceFilter {
    /// Case-insensitive substring of the place name.
    pub name: Option<String>,
    /// Average rating bounds.
    pub rating: RatingRange,
    /// Case-insensitive type tag.
    pub place_type: Option<String>,
    /// Exact option flag values.
    pub flags: BTreeMap<OptionFlag, bool>,
}

impl PlaceFilter {
    /// Whether `place` satisfies every supplied predicate.
    #[must_use]
    pub fn matches(&self, place: &Place) -> bool {
        self.name
            .as_deref()
            .is_none_or(|name| contains_ignore_case(&place.info.name, name))
            && self.rating.contains(place.ratings.average_rating)
            && self
                .place_type
                .as_deref()
                .is_none_or(|wanted| place.has_type(wanted))
            && self
                .flags
                .iter()
                .all(|(flag, value)| flag.get(place) == *value)
    }

    /// Record the supplied predicates.
    #[must_use]
    pub fn describe(&self) -> FiltersApplied {
        let mut applied = FiltersApplied {
            name: self.name.clone(),
            place_type: self.place_type.clone(),
            ..FiltersApplied::default()
        };
        self.rating.describe(&mut applied);
        for (flag, value) in &self.flags {
            applied
                .service_options
                .entry(flag.category().to_owned())
                .or_default()
                .insert(flag.name().to_owned(), *value);
        }
        applied
    }
}

/// Review predicate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewFilter {
    /// Rating bounds.
    pub rating: RatingRange,
    /// Inclusive lower bound on `date_posted`, compared as text.
    pub start_date: Option<String>,
    /// Inclusive upper bound on `date_posted`, compared as text.
    pub end_date: Option<String>,
}

impl ReviewFilter {
    /// Whether `review` satisfies every supplied predicate.
    #[must_use]
    pub fn matches(&self, review: &Review) -> bool {
        let posted = review.date_posted_text();
        self.rating.contains(review.rating)
            && self
                .start_date
                .as_deref()
                .is_none_or(|start| posted.as_str() >= start)
            && self
                .end_date
                .as_deref()
                .is_none_or(|end| posted.as_str() <= end)
    }

    fn describe(&self) -> FiltersApplied {
        let mut applied = FiltersApplied {
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            ..FiltersApplied::default()
        };
        self.rating.describe(&mut applied);
        applied
    }
}

/// Parameters of the city list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityListQuery {
    /// Predicate.
    pub filter: CityFilter,
    /// Ordering.
    pub sort: Sort<CitySortField>,
    /// Page.
    pub page: PageRequest,
}

impl CityListQuery {
    /// Record of the supplied filters and the effective sort.
    #[must_use]
    pub fn filters_applied(&self) -> FiltersApplied {
        FiltersApplied {
            name: self.filter.name.clone(),
            sort: Some(self.sort.describe()),
            ..FiltersApplied::default()
        }
    }

    /// Order cities in place.
    pub fn sort(&self, cities: &mut [City]) {
        let order = self.sort.order;
        cities.sort_by(|a, b| {
            order.apply(a.city_name.cmp(&b.city_name).then_with(|| a.id.cmp(&b.id)))
        });
    }
}

/// Parameters of the place list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceListQuery {
    /// Predicate.
    pub filter: PlaceFilter,
    /// Ordering.
    pub sort: Sort<PlaceSortField>,
    /// Page.
    pub page: PageRequest,
}

impl PlaceListQuery {
    /// Record of the supplied filters and the effective sort.
    #[must_use]
    pub fn filters_applied(&self) -> FiltersApplied {
        FiltersApplied {
            sort: Some(self.sort.describe()),
            ..self.filter.describe()
        }
    }

    /// Order places in place.
    pub fn sort(&self, places: &mut [Place]) {
        let Sort { field, order } = self.sort;
        places.sort_by(|a, b| {
            let ordering = match field {
                PlaceSortField::Name => a.info.name.cmp(&b.info.name),
                PlaceSortField::Rating => a
                    .ratings
                    .average_rating
                    .total_cmp(&b.ratings.average_rating),
                PlaceSortField::ReviewCount => a.ratings.review_count.cmp(&b.ratings.review_count),
            };
            order.apply(ordering)
        });
    }
}

/// Parameters of the review list.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewListQuery {
    /// Predicate.
    pub filter: ReviewFilter,
    /// Ordering; newest first unless overridden.
    pub sort: Sort<ReviewSortField>,
    /// Page.
    pub page: PageRequest,
}

impl Default for ReviewListQuery {
    fn default() -> Self {
        Self {
            filter: ReviewFilter::default(),
            sort: Sort {
                field: ReviewSortField::DatePosted,
                order: SortOrder::Desc,
            },
            page: PageRequest::default(),
        }
    }
}

impl ReviewListQuery {
    /// Record of the supplied filters and the effective sort.
    #[must_use]
    pub fn filters_applied(&self) -> FiltersApplied {
        FiltersApplied {
            sort: Some(self.sort.describe()),
            ..self.filter.describe()
        }
    }

    /// Order reviews in place.
    pub fn sort(&self, reviews: &mut [Review]) {
        let Sort { field, order } = self.sort;
        reviews.sort_by(|a, b| {
            let ordering = match field {
                ReviewSortField::DatePosted => a.date_posted.cmp(&b.date_posted),
                ReviewSortField::Rating => a.rating.total_cmp(&b.rating),
            };
            order.apply(ordering)
        });
    }
}

/// Sort echoed back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AppliedSort {
    /// Effective sort field.
    pub field: String,
    /// `asc` or `desc`.
    pub direction: String,
}

/// Filters a caller supplied, echoed back in list envelopes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct FiltersApplied {
    /// Name substring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Lower rating bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    /// Upper rating bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rating: Option<f64>,
    /// Type tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_type: Option<String>,
    /// Service flags grouped by category.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub service_options: BTreeMap<String, BTreeMap<String, bool>>,
    /// Earliest posting date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Latest posting date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Effective sort.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<AppliedSort>,
}
