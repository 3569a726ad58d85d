//! In-memory `CityRepository`.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{CityPage, CityRepository, CityRepositoryError};
use crate::domain::{City, CityListQuery, DocumentId};

use super::check_revision;

/// City documents held in insertion order.
#[derive(Debug, Default)]
pub struct MemoryCityRepository {
    cities: RwLock<Vec<City>>,
}

impl MemoryCityRepository {
    /// Start empty.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CityRepository for MemoryCityRepository {
    async fn list(&self, query: &CityListQuery) -> Result<CityPage, CityRepositoryError> {
        let guard = self.cities.read().await;
        let mut matching: Vec<City> = guard
            .iter()
            .filter(|city| query.filter.matches(city))
            .cloned()
            .collect();
        drop(guard);

        query.sort(&mut matching);
        let total = matching.len() as u64;
        let cities = query.page.slice(matching.iter()).map(City::summary).collect();
        Ok(CityPage { cities, total })
    }

    async fn find(&self, id: &DocumentId) -> Result<Option<City>, CityRepositoryError> {
        let guard = self.cities.read().await;
        Ok(guard.iter().find(|city| &city.id == id).cloned())
    }

    async fn insert(&self, city: &City) -> Result<(), CityRepositoryError> {
        let mut guard = self.cities.write().await;
        if guard.iter().any(|stored| stored.id == city.id) {
            return Err(CityRepositoryError::query(format!(
                "city {} already exists",
                city.id
            )));
        }
        guard.push(city.clone());
        Ok(())
    }

    async fn replace(
        &self,
        city: &City,
        expected_revision: u32,
    ) -> Result<(), CityRepositoryError> {
        let mut guard = self.cities.write().await;
        let stored = guard
            .iter_mut()
            .find(|stored| stored.id == city.id)
            .ok_or_else(|| CityRepositoryError::missing(city.id.as_str()))?;
        check_revision(stored.revision, expected_revision).map_err(|(expected, actual)| {
            CityRepositoryError::revision_mismatch(expected, actual)
        })?;
        *stored = city.clone();
        Ok(())
    }

    async fn delete(&self, id: &DocumentId) -> Result<bool, CityRepositoryError> {
        let mut guard = self.cities.write().await;
        let before = guard.len();
        guard.retain(|city| &city.id != id);
        Ok(guard.len() < before)
    }
}
