//! In-memory `BusinessRepository`.

use async_trait::async_trait;
use pagination::PageRequest;
use tokio::sync::RwLock;

use crate::domain::ports::{BusinessPage, BusinessRepository, BusinessRepositoryError};
use crate::domain::{Business, DocumentId};

use super::check_revision;

/// Businesses held in insertion order, which is also list order.
#[derive(Debug, Default)]
pub struct MemoryBusinessRepository {
    businesses: RwLock<Vec<Business>>,
}

impl MemoryBusinessRepository {
    /// Start empty.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BusinessRepository for MemoryBusinessRepository {
    async fn list(&self, page: &PageRequest) -> Result<BusinessPage, BusinessRepositoryError> {
        let guard = self.businesses.read().await;
        Ok(BusinessPage {
            businesses: page.slice(guard.iter()).cloned().collect(),
            total: guard.len() as u64,
        })
    }

    async fn find(&self, id: &DocumentId) -> Result<Option<Business>, BusinessRepositoryError> {
        let guard = self.businesses.read().await;
        Ok(guard.iter().find(|business| &business.id == id).cloned())
    }

    async fn insert(&self, business: &Business) -> Result<(), BusinessRepositoryError> {
        let mut guard = self.businesses.write().await;
        if guard.iter().any(|stored| stored.id == business.id) {
            return Err(BusinessRepositoryError::query(format!(
                "business {} already exists",
                business.id
            )));
        }
        guard.push(business.clone());
        Ok(())
    }

    async fn replace(
        &self,
        business: &Business,
        expected_revision: u32,
    ) -> Result<(), BusinessRepositoryError> {
        let mut guard = self.businesses.write().await;
        let stored = guard
            .iter_mut()
            .find(|stored| stored.id == business.id)
            .ok_or_else(|| BusinessRepositoryError::missing(business.id.as_str()))?;
        check_revision(stored.revision, expected_revision).map_err(|(expected, actual)| {
            BusinessRepositoryError::revision_mismatch(expected, actual)
        })?;
        *stored = business.clone();
        Ok(())
    }

    async fn delete(&self, id: &DocumentId) -> Result<bool, BusinessRepositoryError> {
        let mut guard = self.businesses.write().await;
        let before = guard.len();
        guard.retain(|business| &business.id != id);
        Ok(guard.len() < before)
    }
}
