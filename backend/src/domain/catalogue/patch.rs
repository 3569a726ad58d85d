//! Field-masked place updates.
//!
//! A [`PlacePatch`] names individual leaves of a place document. Applying it
//! writes exactly those leaves and reports their dotted paths; every other
//! field, including sibling flags in the same option category, is left as
//! it was.

use std::collections::BTreeMap;

use super::options::OptionFlag;
use super::place::{OpeningHours, Place, PlaceStatus, Weekday};
use crate::domain::Error;

/// Sparse update of a place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacePatch {
    /// `info.name`
    pub name: Option<String>,
    /// `info.type`
    pub place_type: Option<Vec<String>>,
    /// `info.status`
    pub status: Option<PlaceStatus>,
    /// `location.address.street`
    pub street: Option<String>,
    /// `location.address.city`
    pub city: Option<String>,
    /// `location.address.postcode`
    pub postcode: Option<String>,
    /// `location.address.full_address`
    pub full_address: Option<String>,
    /// `location.coordinates.latitude`
    pub latitude: Option<f64>,
    /// `location.coordinates.longitude`
    pub longitude: Option<f64>,
    /// `business_hours.<day>`
    pub business_hours: BTreeMap<Weekday, OpeningHours>,
    /// Option flags keyed by leaf.
    pub flags: BTreeMap<OptionFlag, bool>,
}

impl PlacePatch {
    /// Dotted paths of every field this patch writes.
    #[must_use]
    pub fn field_names(&self) -> Vec<String> {
        let scalar = [
            ("info.name", self.name.is_some()),
            ("info.type", self.place_type.is_some()),
            ("info.status", self.status.is_some()),
            ("location.address.street", self.street.is_some()),
            ("location.address.city", self.city.is_some()),
            ("location.address.postcode", self.postcode.is_some()),
            ("location.address.full_address", self.full_address.is_some()),
            ("location.coordinates.latitude", self.latitude.is_some()),
            ("location.coordinates.longitude", self.longitude.is_some()),
        ];
        let mut fields: Vec<String> = scalar
            .into_iter()
            .filter(|(_, present)| *present)
            .map(|(path, _)| path.to_owned())
            .collect();
        fields.extend(
            self.business_hours
                .keys()
                .map(|day| format!("business_hours.{}", day.as_str())),
        );
        fields.extend(self.flags.keys().map(|flag| flag.path()));
        fields
    }

    /// Write the patch into `place`, returning the updated paths.
    ///
    /// # Errors
    /// Returns `no_valid_fields` when the patch names no field.
    pub fn apply_to(self, place: &mut Place) -> Result<Vec<String>, Error> {
        let fields = self.field_names();
        if fields.is_empty() {
            return Err(Error::no_valid_fields());
        }
        let info = &mut place.info;
        if let Some(name) = self.name {
            info.name = name;
        }
        if let Some(place_type) = self.place_type {
            info.place_type = place_type;
        }
        if let Some(status) = self.status {
            info.status = status;
        }
        let address = &mut place.location.address;
        if let Some(street) = self.street {
            address.street = street;
        }
        if let Some(city) = self.city {
            address.city = city;
        }
        if let Some(postcode) = self.postcode {
            address.postcode = postcode;
        }
        if let Some(full_address) = self.full_address {
            address.full_address = Some(full_address);
        }
        let coordinates = &mut place.location.coordinates;
        if let Some(latitude) = self.latitude {
            coordinates.latitude = latitude;
        }
        if let Some(longitude) = self.longitude {
            coordinates.longitude = longitude;
        }
        place.business_hours.extend(self.business_hours);
        for (flag, value) in self.flags {
            flag.set(place, value);
        }
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalogue::{Location, NewPlace, PlaceInfo};
    use rstest::{fixture, rstest};

    #[fixture]
    fn place() -> Place {
        let mut new = NewPlace::new(
            "p-1",
            PlaceInfo {
                name: "Corner Deli".to_owned(),
                place_type: vec!["deli".to_owned()],
                status: PlaceStatus::Operational,
            },
            Location::default(),
        );
        new.service_options.dining.takeaway = true;
        new.business_hours.insert(
            Weekday::Monday,
            OpeningHours {
                open: "09:00".to_owned(),
                close: "17:00".to_owned(),
            },
        );
        Place::create(new)
    }

    #[rstest]
    fn empty_patch_has_no_valid_fields(mut place: Place) {
        let err = PlacePatch::default()
            .apply_to(&mut place)
            .expect_err("empty patch");
        assert_eq!(err.detail_code(), Some("no_valid_fields"));
    }

    #[rstest]
    fn writes_only_named_leaves(mut place: Place) {
        let before = place.clone();
        let patch = PlacePatch {
            name: Some("Corner Deli & Bar".to_owned()),
            latitude: Some(51.5),
            flags: BTreeMap::from([(OptionFlag::DineIn, true)]),
            business_hours: BTreeMap::from([(
                Weekday::Sunday,
                OpeningHours {
                    open: "10:00".to_owned(),
                    close: "14:00".to_owned(),
                },
            )]),
            ..PlacePatch::default()
        };
        let fields = patch.apply_to(&mut place).expect("valid patch");

        assert_eq!(
            fields,
            vec![
                "info.name",
                "location.coordinates.latitude",
                "business_hours.sunday",
                "service_options.dining.dine_in",
            ]
        );
        assert_eq!(place.info.name, "Corner Deli & Bar");
        assert_eq!(place.info.place_type, before.info.place_type);
        assert_eq!(place.location.coordinates.longitude, 0.0);
        assert!(place.service_options.dining.takeaway);
        assert!(place.service_options.dining.dine_in);
        assert!(place.business_hours.contains_key(&Weekday::Monday));
        assert_eq!(place.ratings, before.ratings);
    }
}
