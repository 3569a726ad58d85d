//! Catalogue domain service.
//!
//! Implements the catalogue driving ports over a [`CityRepository`]. Reads
//! load the city document and filter, sort and page its embedded places or
//! reviews in memory. Writes load the document, apply the change, and store
//! it back under the revision that was read; a lost race is retried a bounded
//! number of times before surfacing as a conflict.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{PageInfo, PageRequest};

use crate::domain::ports::{
    CatalogueCommand, CatalogueQuery, CityDetail, CityRepository, CityRepositoryError, Listing,
    ReviewAdded,
};
use crate::domain::revision::{Replaced, write_with_retries};
use crate::domain::{
    City, CityListQuery, CityPatch, CitySummary, DocumentId, Error, FiltersApplied, NewCity,
    NewPlace, NewReview, Place, PlaceFilter, PlaceListQuery, PlacePatch, PlaceStatus,
    RatingSummary, Review, ReviewListQuery, ReviewPatch, validate_rating,
};

/// Catalogue service implementing [`CatalogueQuery`] and
/// [`CatalogueCommand`].
#[derive(Clone)]
pub struct CatalogueService<R: ?Sized> {
    cities: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: ?Sized> CatalogueService<R> {
    /// Create a service over a city repository.
    pub fn new(cities: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { cities, clock }
    }
}

fn map_repository_error(error: CityRepositoryError) -> Error {
    match error {
        CityRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("city repository unavailable: {message}"))
        }
        CityRepositoryError::Query { message } => {
            Error::internal(format!("city repository error: {message}"))
        }
        CityRepositoryError::RevisionMismatch { expected, actual } => {
            Error::revision_conflict(expected, actual)
        }
        CityRepositoryError::Missing { .. } => city_not_found(),
    }
}

fn city_not_found() -> Error {
    Error::not_found("city not found")
}

fn review_not_found() -> Error {
    Error::not_found("review not found")
}

fn find_place<'a>(city: &'a City, place_id: &DocumentId) -> Result<&'a Place, Error> {
    city.place(place_id)
        .ok_or_else(|| Error::not_found("place not found"))
}

fn paginate<T>(items: Vec<T>, page: PageRequest, filters_applied: FiltersApplied) -> Listing<T> {
    let total = u64::try_from(items.len()).unwrap_or(u64::MAX);
    Listing {
        items: page.slice(items).collect(),
        page: PageInfo::new(page, total),
        filters_applied,
    }
}

impl<R: ?Sized> CatalogueService<R>
where
    R: CityRepository,
{
    async fn load(&self, city_id: &DocumentId) -> Result<City, Error> {
        self.cities
            .find(city_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(city_not_found)
    }

    /// Read-modify-write one city under a revision check.
    ///
    /// `mutation` runs once per attempt against a freshly loaded document, so
    /// it must not consume its captures.
    async fn mutate_city<T, F>(&self, city_id: &DocumentId, mutation: F) -> Result<T, Error>
    where
        T: Send,
        F: FnMut(&mut City) -> Result<T, Error> + Send,
    {
        write_with_retries(
            city_id,
            move || self.load(city_id),
            mutation,
            move |city: City, expected| async move {
                match self.cities.replace(&city, expected).await {
                    Ok(()) => Ok(Replaced::Stored),
                    Err(CityRepositoryError::RevisionMismatch { expected, actual }) => {
                        Ok(Replaced::Stale { expected, actual })
                    }
                    Err(other) => Err(map_repository_error(other)),
                }
            },
        )
        .await
    }
}

#[async_trait]
impl<R: ?Sized> CatalogueQuery for CatalogueService<R>
where
    R: CityRepository,
{
    async fn list_cities(&self, query: CityListQuery) -> Result<Listing<CitySummary>, Error> {
        let page = self
            .cities
            .list(&query)
            .await
            .map_err(map_repository_error)?;
        Ok(Listing {
            items: page.cities,
            page: PageInfo::new(query.page, page.total),
            filters_applied: query.filters_applied(),
        })
    }

    async fn get_city(
        &self,
        city_id: &DocumentId,
        places: Option<PlaceFilter>,
    ) -> Result<CityDetail, Error> {
        let city = self.load(city_id).await?;
        let summary = city.summary();
        let Some(filter) = places else {
            return Ok(CityDetail {
                city: summary,
                places: None,
                filters_applied: FiltersApplied::default(),
            });
        };
        let matching = city
            .places
            .into_iter()
            .filter(|place| filter.matches(place))
            .collect();
        Ok(CityDetail {
            city: summary,
            places: Some(matching),
            filters_applied: filter.describe(),
        })
    }

    async fn list_places(
        &self,
        city_id: &DocumentId,
        query: PlaceListQuery,
    ) -> Result<Listing<Place>, Error> {
        let city = self.load(city_id).await?;
        let mut places: Vec<Place> = city
            .places
            .into_iter()
            .filter(|place| query.filter.matches(place))
            .collect();
        query.sort(&mut places);
        Ok(paginate(places, query.page, query.filters_applied()))
    }

    async fn get_place(
        &self,
        city_id: &DocumentId,
        place_id: &DocumentId,
    ) -> Result<Place, Error> {
        let city = self.load(city_id).await?;
        find_place(&city, place_id).cloned()
    }

    async fn list_reviews(
        &self,
        city_id: &DocumentId,
        place_id: &DocumentId,
        query: ReviewListQuery,
    ) -> Result<Listing<Review>, Error> {
        let city = self.load(city_id).await?;
        let place = find_place(&city, place_id)?;
        let mut reviews: Vec<Review> = place
            .ratings
            .recent_reviews
            .iter()
            .filter(|review| query.filter.matches(review))
            .cloned()
            .collect();
        query.sort(&mut reviews);
        Ok(paginate(reviews, query.page, query.filters_applied()))
    }

    async fn get_review(
        &self,
        city_id: &DocumentId,
        place_id: &DocumentId,
        review_id: &DocumentId,
    ) -> Result<Review, Error> {
        let city = self.load(city_id).await?;
        find_place(&city, place_id)?
            .review(review_id)
            .cloned()
            .ok_or_else(review_not_found)
    }
}

#[async_trait]
impl<R: ?Sized> CatalogueCommand for CatalogueService<R>
where
    R: CityRepository,
{
    async fn create_city(&self, city: NewCity) -> Result<DocumentId, Error> {
        let city = City::create(city);
        self.cities
            .insert(&city)
            .await
            .map_err(map_repository_error)?;
        Ok(city.id)
    }

    async fn update_city(
        &self,
        city_id: &DocumentId,
        patch: CityPatch,
    ) -> Result<Vec<String>, Error> {
        if patch.field_names().is_empty() {
            return Err(Error::no_valid_fields());
        }
        self.mutate_city(city_id, |city| city.apply(patch.clone()))
            .await
    }

    async fn delete_city(&self, city_id: &DocumentId) -> Result<(), Error> {
        let deleted = self
            .cities
            .delete(city_id)
            .await
            .map_err(map_repository_error)?;
        if deleted {
            Ok(())
        } else {
            Err(city_not_found())
        }
    }

    async fn add_place(&self, city_id: &DocumentId, place: NewPlace) -> Result<DocumentId, Error> {
        self.mutate_city(city_id, |city| {
            let created = Place::create(place.clone());
            let id = created.id.clone();
            city.places.push(created);
            Ok(id)
        })
        .await
    }

    async fn update_place(
        &self,
        city_id: &DocumentId,
        place_id: &DocumentId,
        patch: PlacePatch,
    ) -> Result<Vec<String>, Error> {
        if patch.field_names().is_empty() {
            return Err(Error::no_valid_fields());
        }
        self.mutate_city(city_id, |city| {
            patch.clone().apply_to(city.place_mut(place_id)?)
        })
        .await
    }

    async fn delete_place(
        &self,
        city_id: &DocumentId,
        place_id: &DocumentId,
    ) -> Result<(), Error> {
        self.mutate_city(city_id, |city| {
            let before = city.places.len();
            city.places.retain(|place| &place.id != place_id);
            if city.places.len() == before {
                return Err(Error::not_found("place not found"));
            }
            Ok(())
        })
        .await
    }

    async fn set_place_status(
        &self,
        city_id: &DocumentId,
        place_id: &DocumentId,
        status: PlaceStatus,
    ) -> Result<PlaceStatus, Error> {
        self.mutate_city(city_id, |city| {
            let place = city.place_mut(place_id)?;
            if place.info.status == status {
                return Err(Error::status_unchanged(status.as_str()));
            }
            place.info.status = status;
            Ok(status)
        })
        .await
    }

    async fn add_review(
        &self,
        city_id: &DocumentId,
        place_id: &DocumentId,
        review: NewReview,
    ) -> Result<ReviewAdded, Error> {
        validate_rating(review.rating)?;
        let now = self.clock.utc();
        self.mutate_city(city_id, |city| {
            let place = city.place_mut(place_id)?;
            let created = Review::create(review.clone(), now);
            place.ratings.recent_reviews.push(created.clone());
            let ratings = place.ratings.recompute();
            Ok(ReviewAdded {
                review: created,
                ratings,
            })
        })
        .await
    }

    async fn update_review(
        &self,
        city_id: &DocumentId,
        place_id: &DocumentId,
        review_id: &DocumentId,
        patch: ReviewPatch,
    ) -> Result<RatingSummary, Error> {
        if patch.is_empty() {
            return Err(Error::no_valid_fields());
        }
        if let Some(rating) = patch.rating {
            validate_rating(rating)?;
        }
        let now = self.clock.utc();
        self.mutate_city(city_id, |city| {
            let place = city.place_mut(place_id)?;
            let review = place
                .ratings
                .recent_reviews
                .iter_mut()
                .find(|review| &review.id == review_id)
                .ok_or_else(review_not_found)?;
            review.apply(patch.clone(), now);
            Ok(place.ratings.recompute())
        })
        .await
    }

    async fn delete_review(
        &self,
        city_id: &DocumentId,
        place_id: &DocumentId,
        review_id: &DocumentId,
    ) -> Result<RatingSummary, Error> {
        self.mutate_city(city_id, |city| {
            let place = city.place_mut(place_id)?;
            let reviews = &mut place.ratings.recent_reviews;
            let before = reviews.len();
            reviews.retain(|review| &review.id != review_id);
            if reviews.len() == before {
                return Err(review_not_found());
            }
            Ok(place.ratings.recompute())
        })
        .await
    }

    async fn refresh_rating(
        &self,
        city_id: &DocumentId,
        place_id: &DocumentId,
    ) -> Result<RatingSummary, Error> {
        self.mutate_city(city_id, |city| Ok(city.place_mut(place_id)?.ratings.recompute()))
            .await
    }
}

#[cfg(test)]
#[path = "catalogue_service_tests.rs"]
mod tests;
