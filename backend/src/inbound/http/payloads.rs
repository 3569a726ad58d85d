//! JSON request bodies for catalogue and account endpoints.
//!
//! Every field is optional at the serde layer; conversion into the domain
//! inputs decides what is required so that clients receive `missing_field`
//! and `invalid_parameter` details instead of opaque deserialisation errors.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::catalogue::{Amenities, MenuOptions, ServiceOptions};
use crate::domain::{
    Address, CityPatch, Coordinates, Error, Location, Media, NewCity, NewPlace, NewReview,
    OpeningHours, OptionFlag, PlaceInfo, PlacePatch, PlaceStatus, Review, ReviewPatch, Weekday,
    validate_rating,
};

fn required(field: &str, value: Option<String>) -> Result<String, Error> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| Error::missing_field(field))
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

/// A number supplied either as JSON number or as numeric text.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    fn parse(self, field: &str) -> Result<f64, Error> {
        match self {
            Self::Number(value) if value.is_finite() => Ok(value),
            Self::Number(value) => Err(Error::invalid_parameter(
                field,
                &value.to_string(),
                format!("{field} must be a finite number"),
            )),
            Self::Text(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| {
                    Error::invalid_parameter(field, &raw, format!("{field} must be a number"))
                }),
        }
    }
}

/// Type tags given as one string or a list.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum TypeTags {
    One(String),
    Many(Vec<String>),
}

impl TypeTags {
    fn into_tags(self) -> Vec<String> {
        let tags = match self {
            Self::One(tag) => vec![tag],
            Self::Many(tags) => tags,
        };
        tags.into_iter()
            .map(|tag| tag.trim().to_owned())
            .filter(|tag| !tag.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct InfoBody {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub place_type: Option<TypeTags>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AddressBody {
    pub street: Option<String>,
    pub city: Option<String>,
    pub postcode: Option<String>,
    pub full_address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CoordinatesBody {
    pub latitude: Option<Numeric>,
    pub longitude: Option<Numeric>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LocationBody {
    pub address: Option<AddressBody>,
    pub coordinates: Option<CoordinatesBody>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct HoursBody {
    pub open: Option<String>,
    pub close: Option<String>,
}

/// A review supplied inside a place at creation time.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct EmbeddedReviewBody {
    pub rating: Option<Numeric>,
    pub author_name: Option<String>,
    pub content: Option<String>,
    /// Defaults to the time of the request.
    pub date_posted: Option<DateTime<Utc>>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct EmbeddedRatingsBody {
    #[serde(default)]
    pub recent_reviews: Vec<EmbeddedReviewBody>,
}

/// Body of `POST /api/cities/{city_id}/places`, also used for places
/// embedded in city bodies.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PlaceBody {
    pub place_id: Option<String>,
    pub info: Option<InfoBody>,
    pub location: Option<LocationBody>,
    pub business_hours: Option<BTreeMap<String, HoursBody>>,
    pub service_options: Option<ServiceOptions>,
    pub menu_options: Option<MenuOptions>,
    pub amenities: Option<Amenities>,
    pub media: Option<Media>,
    pub ratings: Option<EmbeddedRatingsBody>,
}

fn parse_day(raw: &str) -> Result<Weekday, Error> {
    Weekday::from_name(&raw.trim().to_lowercase()).ok_or_else(|| {
        Error::invalid_parameter(
            "business_hours",
            raw,
            format!("{raw} is not a day of the week"),
        )
    })
}

fn parse_hours(day: &str, hours: HoursBody) -> Result<OpeningHours, Error> {
    let field = format!("business_hours.{day}");
    match (optional_text(hours.open), optional_text(hours.close)) {
        (Some(open), Some(close)) => Ok(OpeningHours { open, close }),
        _ => Err(Error::invalid_parameter(
            &field,
            day,
            "business hours need both open and close",
        )),
    }
}

fn business_hours(
    raw: BTreeMap<String, HoursBody>,
) -> Result<BTreeMap<Weekday, OpeningHours>, Error> {
    raw.into_iter()
        .map(|(day, hours)| Ok((parse_day(&day)?, parse_hours(&day, hours)?)))
        .collect()
}

fn status(field: &str, raw: Option<String>) -> Result<Option<PlaceStatus>, Error> {
    optional_text(raw)
        .map(|value| PlaceStatus::parse_field(field, &value))
        .transpose()
}

impl EmbeddedReviewBody {
    fn into_review(self, now: DateTime<Utc>) -> Result<Review, Error> {
        let new = NewReview {
            rating: review_rating(self.rating)?,
            author_name: required("author_name", self.author_name)?,
            content: required("content", self.content)?,
            language: optional_text(self.language),
        };
        Ok(Review::create(new, self.date_posted.unwrap_or(now)))
    }
}

fn review_rating(raw: Option<Numeric>) -> Result<f64, Error> {
    let value = raw
        .ok_or_else(|| Error::missing_field("rating"))?
        .parse("rating")?;
    validate_rating(value)
}

impl PlaceBody {
    /// Validate into a new place. Reviews without a `date_posted` are
    /// stamped with `now`.
    pub fn into_new_place(self, now: DateTime<Utc>) -> Result<NewPlace, Error> {
        let place_id = required("place_id", self.place_id)?;
        let info = self.info.ok_or_else(|| Error::missing_field("info"))?;
        let info = PlaceInfo {
            name: required("info.name", info.name)?,
            place_type: info
                .place_type
                .map(TypeTags::into_tags)
                .filter(|tags| !tags.is_empty())
                .ok_or_else(|| Error::missing_field("info.type"))?,
            status: status("info.status", info.status)?.unwrap_or_default(),
        };
        let location = self
            .location
            .ok_or_else(|| Error::missing_field("location"))?;
        let address = location
            .address
            .ok_or_else(|| Error::missing_field("location.address"))?;
        let coordinates = location
            .coordinates
            .ok_or_else(|| Error::missing_field("location.coordinates"))?;
        let location = Location {
            address: Address {
                street: required("location.address.street", address.street)?,
                city: required("location.address.city", address.city)?,
                postcode: required("location.address.postcode", address.postcode)?,
                full_address: optional_text(address.full_address),
            },
            coordinates: Coordinates {
                latitude: coordinates
                    .latitude
                    .ok_or_else(|| Error::missing_field("location.coordinates.latitude"))?
                    .parse("location.coordinates.latitude")?,
                longitude: coordinates
                    .longitude
                    .ok_or_else(|| Error::missing_field("location.coordinates.longitude"))?
                    .parse("location.coordinates.longitude")?,
            },
        };

        let mut place = NewPlace::new(place_id, info, location);
        place.business_hours = business_hours(self.business_hours.unwrap_or_default())?;
        place.service_options = self.service_options.unwrap_or_default();
        place.menu_options = self.menu_options.unwrap_or_default();
        place.amenities = self.amenities.unwrap_or_default();
        place.media = self.media.unwrap_or_default();
        place.reviews = self
            .ratings
            .map(|ratings| ratings.recent_reviews)
            .unwrap_or_default()
            .into_iter()
            .map(|review| review.into_review(now))
            .collect::<Result<_, _>>()?;
        Ok(place)
    }
}

fn places(raw: Vec<PlaceBody>, now: DateTime<Utc>) -> Result<Vec<NewPlace>, Error> {
    raw.into_iter()
        .map(|place| place.into_new_place(now))
        .collect()
}

/// Body of `POST /api/cities`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateCityBody {
    pub city_id: Option<String>,
    pub city_name: Option<String>,
    pub places: Option<Vec<PlaceBody>>,
}

impl CreateCityBody {
    /// Validate into a new city.
    pub fn into_new_city(self, now: DateTime<Utc>) -> Result<NewCity, Error> {
        Ok(NewCity {
            city_id: required("city_id", self.city_id)?,
            city_name: required("city_name", self.city_name)?,
            places: places(self.places.unwrap_or_default(), now)?,
        })
    }
}

/// Body of `PUT /api/cities/{city_id}`. `places` replaces the whole
/// sequence.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateCityBody {
    pub city_name: Option<String>,
    pub places: Option<Vec<PlaceBody>>,
}

impl UpdateCityBody {
    /// Validate into a city patch. Blank names are ignored.
    pub fn into_patch(self, now: DateTime<Utc>) -> Result<CityPatch, Error> {
        Ok(CityPatch {
            city_name: optional_text(self.city_name),
            places: self.places.map(|raw| places(raw, now)).transpose()?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct InfoPatchBody {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub place_type: Option<TypeTags>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LocationPatchBody {
    pub address: Option<AddressBody>,
    pub coordinates: Option<CoordinatesBody>,
}

/// `{category: {flag: bool}}` for one option group.
pub type FlagGroupBody = BTreeMap<String, BTreeMap<String, bool>>;

/// Body of `PUT /api/cities/{city_id}/places/{place_id}`. Only the fields
/// present are written; unknown option names are ignored.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdatePlaceBody {
    pub info: Option<InfoPatchBody>,
    pub location: Option<LocationPatchBody>,
    pub business_hours: Option<BTreeMap<String, HoursBody>>,
    pub service_options: Option<FlagGroupBody>,
    pub menu_options: Option<FlagGroupBody>,
    pub amenities: Option<FlagGroupBody>,
}

fn collect_flags(
    group: &str,
    raw: Option<FlagGroupBody>,
    flags: &mut BTreeMap<OptionFlag, bool>,
) {
    for (category, values) in raw.unwrap_or_default() {
        for (name, value) in values {
            if let Some(flag) = OptionFlag::lookup(group, &category, &name) {
                flags.insert(flag, value);
            }
        }
    }
}

impl UpdatePlaceBody {
    /// Validate into a field-masked place patch.
    pub fn into_patch(self) -> Result<PlacePatch, Error> {
        let mut patch = PlacePatch::default();
        if let Some(info) = self.info {
            patch.name = optional_text(info.name);
            patch.place_type = info.place_type.map(TypeTags::into_tags);
            patch.status = status("info.status", info.status)?;
        }
        if let Some(location) = self.location {
            if let Some(address) = location.address {
                patch.street = optional_text(address.street);
                patch.city = optional_text(address.city);
                patch.postcode = optional_text(address.postcode);
                patch.full_address = optional_text(address.full_address);
            }
            if let Some(coordinates) = location.coordinates {
                patch.latitude = coordinates
                    .latitude
                    .map(|value| value.parse("location.coordinates.latitude"))
                    .transpose()?;
                patch.longitude = coordinates
                    .longitude
                    .map(|value| value.parse("location.coordinates.longitude"))
                    .transpose()?;
            }
        }
        patch.business_hours = business_hours(self.business_hours.unwrap_or_default())?;
        collect_flags("service_options", self.service_options, &mut patch.flags);
        collect_flags("menu_options", self.menu_options, &mut patch.flags);
        collect_flags("amenities", self.amenities, &mut patch.flags);
        Ok(patch)
    }
}

/// Body of `PATCH .../places/{place_id}/status`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct StatusBody {
    #[schema(example = "temporary_closed")]
    pub status: Option<String>,
}

impl StatusBody {
    /// The requested status.
    pub fn into_status(self) -> Result<PlaceStatus, Error> {
        let raw = required("status", self.status)?;
        PlaceStatus::parse_field("status", &raw)
    }
}

/// Body of `POST .../places/{place_id}/reviews`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AddReviewBody {
    #[schema(value_type = f64, example = 4.5)]
    pub rating: Option<Numeric>,
    pub author_name: Option<String>,
    pub content: Option<String>,
    #[schema(example = "en")]
    pub language: Option<String>,
}

impl TryFrom<AddReviewBody> for NewReview {
    type Error = Error;

    fn try_from(body: AddReviewBody) -> Result<Self, Self::Error> {
        Ok(Self {
            rating: review_rating(body.rating)?,
            author_name: required("author_name", body.author_name)?,
            content: required("content", body.content)?,
            language: optional_text(body.language),
        })
    }
}

/// Body of `PUT .../reviews/{review_id}`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateReviewBody {
    #[schema(value_type = Option<f64>)]
    pub rating: Option<Numeric>,
    pub content: Option<String>,
    pub author_name: Option<String>,
}

impl TryFrom<UpdateReviewBody> for ReviewPatch {
    type Error = Error;

    fn try_from(body: UpdateReviewBody) -> Result<Self, Self::Error> {
        Ok(Self {
            rating: body
                .rating
                .map(|raw| raw.parse("rating").and_then(validate_rating))
                .transpose()?,
            content: optional_text(body.content),
            author_name: optional_text(body.author_name),
        })
    }
}

/// Body of `POST /api/register`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RegisterBody {
    #[schema(example = "ada")]
    pub username: Option<String>,
    #[schema(example = "Str0ng!pass")]
    pub password: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
    /// Honoured only when admin self-registration is enabled.
    #[serde(default)]
    pub admin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    #[fixture]
    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_736_164_800, 0).expect("valid timestamp")
    }

    fn place_json() -> Value {
        json!({
            "place_id": "pl-001",
            "info": {"name": "Kiln", "type": ["cafe"]},
            "location": {
                "address": {"street": "1 Main St", "city": "Leeds", "postcode": "LS1"},
                "coordinates": {"latitude": "53.8", "longitude": -1.55}
            }
        })
    }

    fn body<T: serde::de::DeserializeOwned>(value: Value) -> T {
        serde_json::from_value(value).expect("body deserialises")
    }

    #[rstest]
    fn place_coordinates_accept_numeric_text(now: DateTime<Utc>) {
        let place = body::<PlaceBody>(place_json())
            .into_new_place(now)
            .expect("valid place");
        assert_eq!(place.location.coordinates.latitude, 53.8);
        assert_eq!(place.location.coordinates.longitude, -1.55);
        assert_eq!(place.info.status, PlaceStatus::Operational);
    }

    #[rstest]
    fn non_numeric_coordinates_are_invalid(now: DateTime<Utc>) {
        let mut raw = place_json();
        raw["location"]["coordinates"]["latitude"] = json!("north");
        let err = body::<PlaceBody>(raw)
            .into_new_place(now)
            .expect_err("invalid latitude");
        assert_eq!(err.detail_code(), Some("invalid_parameter"));
    }

    #[rstest]
    #[case("place_id", "place_id")]
    #[case("info", "info")]
    #[case("location", "location")]
    fn missing_place_fields_are_named(
        now: DateTime<Utc>,
        #[case] removed: &str,
        #[case] field: &str,
    ) {
        let mut raw = place_json();
        raw.as_object_mut().expect("object").remove(removed);
        let err = body::<PlaceBody>(raw)
            .into_new_place(now)
            .expect_err("missing field");
        assert_eq!(err.detail_code(), Some("missing_field"));
        assert_eq!(
            err.details().and_then(|details| details.get("field")),
            Some(&json!(field))
        );
    }

    #[rstest]
    fn embedded_reviews_are_kept_and_stamped(now: DateTime<Utc>) {
        let mut raw = place_json();
        raw["ratings"] = json!({"recent_reviews": [
            {"rating": 4, "author_name": "Ann", "content": "Good"},
            {"rating": "5", "author_name": "Bo", "content": "Great",
             "date_posted": "2024-05-01T10:00:00Z"}
        ]});
        let place = body::<PlaceBody>(raw).into_new_place(now).expect("valid");
        assert_eq!(place.reviews.len(), 2);
        assert_eq!(place.reviews[0].date_posted, now);
        assert_eq!(place.reviews[1].rating, 5.0);
        assert_ne!(place.reviews[1].date_posted, now);
    }

    #[rstest]
    fn city_requires_id_and_name(now: DateTime<Utc>) {
        let err = body::<CreateCityBody>(json!({"city_id": "c1", "city_name": "  "}))
            .into_new_city(now)
            .expect_err("blank name");
        assert_eq!(err.detail_code(), Some("missing_field"));

        let city = body::<CreateCityBody>(json!({"city_id": "c1", "city_name": "Leeds"}))
            .into_new_city(now)
            .expect("valid city");
        assert!(city.places.is_empty());
    }

    #[rstest]
    fn place_update_collects_known_flags_only() {
        let patch = body::<UpdatePlaceBody>(json!({
            "info": {"status": "closed"},
            "service_options": {"dining": {"takeaway": true, "teleport": true}},
            "amenities": {"facilities": {"wifi": false}},
            "business_hours": {"Monday": {"open": "08:00", "close": "17:00"}}
        }))
        .into_patch()
        .expect("valid patch");
        assert_eq!(patch.status, Some(PlaceStatus::Closed));
        assert_eq!(patch.flags.len(), 2);
        assert_eq!(patch.flags.get(&OptionFlag::Takeaway), Some(&true));
        assert_eq!(patch.flags.get(&OptionFlag::Wifi), Some(&false));
        assert!(patch.business_hours.contains_key(&Weekday::Monday));
    }

    #[rstest]
    #[case(json!({"business_hours": {"funday": {"open": "08:00", "close": "17:00"}}}))]
    #[case(json!({"business_hours": {"monday": {"open": "08:00"}}}))]
    #[case(json!({"info": {"status": "demolished"}}))]
    #[case(json!({"location": {"coordinates": {"latitude": "x"}}}))]
    fn place_update_rejects_bad_values(#[case] raw: Value) {
        let err = body::<UpdatePlaceBody>(raw)
            .into_patch()
            .expect_err("invalid patch");
        assert_eq!(err.detail_code(), Some("invalid_parameter"));
    }

    #[rstest]
    fn empty_place_update_names_no_fields() {
        let patch = body::<UpdatePlaceBody>(json!({"unknown": 1}))
            .into_patch()
            .expect("patch");
        assert!(patch.field_names().is_empty());
    }

    #[rstest]
    #[case(json!({"author_name": "Ann", "content": "Good"}), "missing_field")]
    #[case(json!({"rating": 6, "author_name": "Ann", "content": "Good"}), "invalid_parameter")]
    #[case(json!({"rating": 4, "content": "Good"}), "missing_field")]
    fn review_bodies_are_validated(#[case] raw: Value, #[case] code: &str) {
        let err = NewReview::try_from(body::<AddReviewBody>(raw)).expect_err("invalid review");
        assert_eq!(err.detail_code(), Some(code));
    }

    #[rstest]
    fn status_body_requires_status() {
        let err = StatusBody::default().into_status().expect_err("missing");
        assert_eq!(err.detail_code(), Some("missing_field"));
        let status = StatusBody {
            status: Some("temporary_closed".to_owned()),
        }
        .into_status()
        .expect("valid status");
        assert_eq!(status, PlaceStatus::TemporaryClosed);
    }
}
