//! City documents: the unit of storage and of concurrency control.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::place::{NewPlace, Place};
use crate::domain::{DocumentId, Error};

/// Top-level catalogue entry owning an ordered sequence of places.
///
/// ## Invariants
/// - Places have distinct identifiers.
/// - `revision` increases by one on every successful write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct City {
    /// Generated document identifier.
    #[schema(value_type = String, example = "65a1f0c2b3d4e5f60718293a")]
    pub id: DocumentId,
    /// Caller-supplied external identifier.
    pub city_id: String,
    /// Display name.
    pub city_name: String,
    /// Embedded places.
    #[serde(default)]
    pub places: Vec<Place>,
    /// Compare-and-swap counter; never exposed.
    #[serde(skip)]
    pub revision: u32,
}

/// City fields returned when places are not requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CitySummary {
    /// Generated document identifier.
    #[schema(value_type = String)]
    pub id: DocumentId,
    /// Caller-supplied external identifier.
    pub city_id: String,
    /// Display name.
    pub city_name: String,
}

/// Validated input for a new city.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCity {
    /// Caller-supplied external identifier.
    pub city_id: String,
    /// Display name.
    pub city_name: String,
    /// Initial places.
    pub places: Vec<NewPlace>,
}

/// Partial city update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityPatch {
    /// Replacement name.
    pub city_name: Option<String>,
    /// Full replacement of the embedded places.
    pub places: Option<Vec<NewPlace>>,
}

impl CityPatch {
    /// Names of the fields this patch sets.
    #[must_use]
    pub fn field_names(&self) -> Vec<String> {
        let mut fields = Vec::new();
        if self.city_name.is_some() {
            fields.push("city_name".to_owned());
        }
        if self.places.is_some() {
            fields.push("places".to_owned());
        }
        fields
    }
}

impl City {
    /// Materialise a new city with generated identifiers throughout.
    #[must_use]
    pub fn create(new: NewCity) -> Self {
        Self {
            id: DocumentId::generate(),
            city_id: new.city_id,
            city_name: new.city_name,
            places: new.places.into_iter().map(Place::create).collect(),
            revision: 1,
        }
    }

    /// Identifier and names only.
    #[must_use]
    pub fn summary(&self) -> CitySummary {
        CitySummary {
            id: self.id.clone(),
            city_id: self.city_id.clone(),
            city_name: self.city_name.clone(),
        }
    }

    /// Locate a place by identifier.
    #[must_use]
    pub fn place(&self, id: &DocumentId) -> Option<&Place> {
        self.places.iter().find(|place| &place.id == id)
    }

    /// Locate a place by identifier for mutation.
    ///
    /// # Errors
    /// Returns `not_found` when the city has no such place.
    pub fn place_mut(&mut self, id: &DocumentId) -> Result<&mut Place, Error> {
        self.places
            .iter_mut()
            .find(|place| &place.id == id)
            .ok_or_else(|| Error::not_found("place not found"))
    }

    /// Apply a partial update and return the names of the updated fields.
    ///
    /// # Errors
    /// Returns `no_valid_fields` when the patch sets nothing.
    pub fn apply(&mut self, patch: CityPatch) -> Result<Vec<String>, Error> {
        let fields = patch.field_names();
        if fields.is_empty() {
            return Err(Error::no_valid_fields());
        }
        if let Some(city_name) = patch.city_name {
            self.city_name = city_name;
        }
        if let Some(places) = patch.places {
            self.places = places.into_iter().map(Place::create).collect();
        }
        Ok(fields)
    }
}
