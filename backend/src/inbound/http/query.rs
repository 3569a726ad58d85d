//! Query-string parameters for the catalogue list endpoints.
//!
//! Parameters arrive as raw strings so that every parse failure, including
//! non-numeric page numbers, is reported through the domain error payload
//! rather than the extractor's generic rejection.

use std::collections::BTreeMap;

use pagination::{PageRequest, PaginationError};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::catalogue::{SortField, parse_flag};
use crate::domain::{
    CityFilter, CityListQuery, Error, OptionFlag, PlaceFilter, PlaceListQuery, RatingRange,
    ReviewFilter, ReviewListQuery, Sort, SortOrder,
};

fn map_page_error(error: &PaginationError) -> Error {
    Error::invalid_parameter(
        error.parameter().query_name(),
        &error.value(),
        error.to_string(),
    )
}

fn page(pn: Option<&str>, ps: Option<&str>) -> Result<PageRequest, Error> {
    PageRequest::parse(pn, ps).map_err(|err| map_page_error(&err))
}

fn text(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// Page selection shared by every list endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// One-based page number, default 1.
    pub pn: Option<String>,
    /// Page size, default 10, at most 100.
    pub ps: Option<String>,
}

impl PageParams {
    /// Normalise into a validated page request.
    pub fn to_request(&self) -> Result<PageRequest, Error> {
        page(self.pn.as_deref(), self.ps.as_deref())
    }
}

/// `GET /api/cities` parameters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CityListParams {
    /// Case-insensitive substring of the city name.
    pub name: Option<String>,
    /// Sort field; only `city_name` is recognised.
    pub sort_by: Option<String>,
    /// `asc` (default) or `desc`.
    pub sort_order: Option<String>,
    /// One-based page number.
    pub pn: Option<String>,
    /// Page size.
    pub ps: Option<String>,
}

impl TryFrom<CityListParams> for CityListQuery {
    type Error = Error;

    fn try_from(params: CityListParams) -> Result<Self, Self::Error> {
        Ok(Self {
            page: page(params.pn.as_deref(), params.ps.as_deref())?,
            sort: Sort::parse(
                params.sort_by.as_deref(),
                params.sort_order.as_deref(),
                SortOrder::Asc,
            ),
            filter: CityFilter {
                name: text(params.name),
            },
        })
    }
}

/// Place predicates shared by the place list and the city detail view.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PlaceFilterParams {
    /// Case-insensitive substring of the place name.
    pub name: Option<String>,
    /// Inclusive lower bound on the average rating.
    pub min_rating: Option<String>,
    /// Inclusive upper bound on the average rating.
    pub max_rating: Option<String>,
    /// Place type tag.
    pub place_type: Option<String>,
    /// Alias of `place_type`.
    #[serde(rename = "type")]
    pub type_alias: Option<String>,
    pub dine_in: Option<String>,
    pub takeaway: Option<String>,
    pub reservations: Option<String>,
    pub outdoor_seating: Option<String>,
    pub group_bookings: Option<String>,
    pub breakfast: Option<String>,
    pub lunch: Option<String>,
    pub dinner: Option<String>,
    pub brunch: Option<String>,
}

impl PlaceFilterParams {
    fn flag(&self, flag: OptionFlag) -> Option<&str> {
        let raw = match flag {
            OptionFlag::DineIn => &self.dine_in,
            OptionFlag::Takeaway => &self.takeaway,
            OptionFlag::Reservations => &self.reservations,
            OptionFlag::OutdoorSeating => &self.outdoor_seating,
            OptionFlag::GroupBookings => &self.group_bookings,
            OptionFlag::Breakfast => &self.breakfast,
            OptionFlag::Lunch => &self.lunch,
            OptionFlag::Dinner => &self.dinner,
            OptionFlag::Brunch => &self.brunch,
            _ => return None,
        };
        raw.as_deref()
    }

    /// Build the conjunctive place predicate.
    pub fn to_filter(&self) -> Result<PlaceFilter, Error> {
        let flags: BTreeMap<OptionFlag, bool> = OptionFlag::SERVICE
            .into_iter()
            .filter_map(|flag| parse_flag(self.flag(flag)).map(|value| (flag, value)))
            .collect();
        Ok(PlaceFilter {
            name: text(self.name.clone()),
            rating: RatingRange::parse(self.min_rating.as_deref(), self.max_rating.as_deref())?,
            place_type: text(self.place_type.clone()).or_else(|| text(self.type_alias.clone())),
            flags,
        })
    }
}

/// `GET /api/cities/{city_id}` parameters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CityDetailParams {
    /// `true` embeds the city's places in the response.
    pub include_places: Option<String>,
    /// Inclusive lower bound on the embedded places' average rating.
    pub min_rating: Option<String>,
    /// Inclusive upper bound on the embedded places' average rating.
    pub max_rating: Option<String>,
    /// Place type tag the embedded places must carry.
    pub place_type: Option<String>,
}

impl CityDetailParams {
    /// The place predicate when places were requested, `None` otherwise.
    pub fn places(&self) -> Result<Option<PlaceFilter>, Error> {
        if parse_flag(self.include_places.as_deref()) != Some(true) {
            return Ok(None);
        }
        Ok(Some(PlaceFilter {
            rating: RatingRange::parse(self.min_rating.as_deref(), self.max_rating.as_deref())?,
            place_type: text(self.place_type.clone()),
            ..PlaceFilter::default()
        }))
    }
}

/// Sort and page parameters common to nested lists.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SortParams {
    /// Sort field; unknown values fall back to the default.
    pub sort_by: Option<String>,
    /// `asc` or `desc`.
    pub sort_order: Option<String>,
}

impl SortParams {
    fn to_sort<F: SortField>(&self, default_order: SortOrder) -> Sort<F> {
        Sort::parse(
            self.sort_by.as_deref(),
            self.sort_order.as_deref(),
            default_order,
        )
    }
}

/// Assemble the place list query from its three parameter groups.
pub fn place_list_query(
    filter: &PlaceFilterParams,
    sort: &SortParams,
    page: &PageParams,
) -> Result<PlaceListQuery, Error> {
    Ok(PlaceListQuery {
        filter: filter.to_filter()?,
        sort: sort.to_sort(SortOrder::Asc),
        page: page.to_request()?,
    })
}

/// Review predicates.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReviewFilterParams {
    /// Inclusive lower bound on the review rating.
    pub min_rating: Option<String>,
    /// Inclusive upper bound on the review rating.
    pub max_rating: Option<String>,
    /// Inclusive lower bound on `date_posted`, ISO-8601.
    pub start_date: Option<String>,
    /// Inclusive upper bound on `date_posted`, ISO-8601.
    pub end_date: Option<String>,
}

/// Assemble the review list query; reviews default to newest first.
pub fn review_list_query(
    filter: &ReviewFilterParams,
    sort: &SortParams,
    page: &PageParams,
) -> Result<ReviewListQuery, Error> {
    Ok(ReviewListQuery {
        filter: ReviewFilter {
            rating: RatingRange::parse(filter.min_rating.as_deref(), filter.max_rating.as_deref())?,
            start_date: text(filter.start_date.clone()),
            end_date: text(filter.end_date.clone()),
        },
        sort: sort.to_sort(SortOrder::Desc),
        page: page.to_request()?,
    })
}
