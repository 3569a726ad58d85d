//! Legacy business catalogue service.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::ports::{BusinessCatalogue, BusinessRepository, BusinessRepositoryError};
use crate::domain::{
    Business, BusinessDraft, BusinessReview, BusinessReviewDraft, DocumentId, Error,
};

use super::revision::{Replaced, write_with_retries};

/// Business catalogue service implementing [`BusinessCatalogue`].
#[derive(Clone)]
pub struct BusinessService<R: ?Sized> {
    businesses: Arc<R>,
}

impl<R: ?Sized> BusinessService<R> {
    /// Create a service over a business repository.
    pub fn new(businesses: Arc<R>) -> Self {
        Self { businesses }
    }
}

fn map_repository_error(error: BusinessRepositoryError) -> Error {
    match error {
        BusinessRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("business repository unavailable: {message}"))
        }
        BusinessRepositoryError::Query { message } => {
            Error::internal(format!("business repository error: {message}"))
        }
        BusinessRepositoryError::RevisionMismatch { expected, actual } => {
            Error::revision_conflict(expected, actual)
        }
        BusinessRepositoryError::Missing { .. } => business_not_found(),
    }
}

fn business_not_found() -> Error {
    Error::not_found("business not found")
}

impl<R: ?Sized> BusinessService<R>
where
    R: BusinessRepository,
{
    async fn load(&self, id: &DocumentId) -> Result<Business, Error> {
        self.businesses
            .find(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(business_not_found)
    }

    async fn mutate_business<T, F>(&self, id: &DocumentId, mutation: F) -> Result<T, Error>
    where
        T: Send,
        F: FnMut(&mut Business) -> Result<T, Error> + Send,
    {
        write_with_retries(
            id,
            move || self.load(id),
            mutation,
            move |business: Business, expected| async move {
                match self.businesses.replace(&business, expected).await {
                    Ok(()) => Ok(Replaced::Stored),
                    Err(BusinessRepositoryError::RevisionMismatch { expected, actual }) => {
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
impl<R: ?Sized> BusinessCatalogue for BusinessService<R>
where
    R: BusinessRepository,
{
    async fn list(&self, page: PageRequest) -> Result<Vec<Business>, Error> {
        let found = self
            .businesses
            .list(&page)
            .await
            .map_err(map_repository_error)?;
        if found.businesses.is_empty() {
            return Err(Error::not_found("no businesses on this page"));
        }
        Ok(found.businesses)
    }

    async fn get(&self, id: &DocumentId) -> Result<Business, Error> {
        self.load(id).await
    }

    async fn create(&self, draft: BusinessDraft) -> Result<DocumentId, Error> {
        let business = Business::create(draft);
        self.businesses
            .insert(&business)
            .await
            .map_err(map_repository_error)?;
        Ok(business.id)
    }

    async fn replace(&self, id: &DocumentId, draft: BusinessDraft) -> Result<(), Error> {
        self.mutate_business(id, |business| {
            business.replace_details(draft.clone());
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: &DocumentId) -> Result<(), Error> {
        let deleted = self
            .businesses
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        if deleted {
            Ok(())
        } else {
            Err(business_not_found())
        }
    }

    async fn list_reviews(&self, id: &DocumentId) -> Result<Vec<BusinessReview>, Error> {
        Ok(self.load(id).await?.reviews)
    }

    async fn get_review(
        &self,
        id: &DocumentId,
        review_id: &DocumentId,
    ) -> Result<BusinessReview, Error> {
        self.load(id)
            .await?
            .review(review_id)
            .cloned()
            .ok_or_else(|| Error::not_found("review not found"))
    }

    async fn add_review(
        &self,
        id: &DocumentId,
        draft: BusinessReviewDraft,
    ) -> Result<DocumentId, Error> {
        self.mutate_business(id, |business| Ok(business.add_review(draft.clone())))
            .await
    }

    async fn replace_review(
        &self,
        id: &DocumentId,
        review_id: &DocumentId,
        draft: BusinessReviewDraft,
    ) -> Result<(), Error> {
        self.mutate_business(id, |business| business.replace_review(review_id, draft.clone()))
            .await
    }

    async fn delete_review(&self, id: &DocumentId, review_id: &DocumentId) -> Result<(), Error> {
        self.mutate_business(id, |business| business.remove_review(review_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    //! Error mapping and empty-page coverage.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{BusinessPage, MockBusinessRepository};
    use rstest::rstest;

    fn business() -> Business {
        Business::create(
            BusinessDraft::parse(Some("Pie Shop"), Some("Leeds"), Some("4")).expect("draft"),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn empty_pages_are_not_found() {
        let mut repo = MockBusinessRepository::new();
        repo.expect_list()
            .return_once(|_| Ok(BusinessPage::default()));

        let err = BusinessService::new(Arc::new(repo))
            .list(PageRequest::default())
            .await
            .expect_err("empty page");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn reviews_are_looked_up_under_the_path_business() {
        let mut stored = business();
        let review_id = stored.add_review(
            BusinessReviewDraft::parse(Some("kim"), Some("great"), Some("5")).expect("draft"),
        );
        let business_id = stored.id.clone();
        let expected_id = business_id.clone();
        let mut repo = MockBusinessRepository::new();
        repo.expect_find()
            .withf(move |id| id == &expected_id)
            .times(1)
            .return_once(move |_| Ok(Some(stored)));

        let review = BusinessService::new(Arc::new(repo))
            .get_review(&business_id, &review_id)
            .await
            .expect("review found");
        assert_eq!(review.stars, 5);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_reviews_are_not_found() {
        let stored = business();
        let business_id = stored.id.clone();
        let mut repo = MockBusinessRepository::new();
        repo.expect_find()
            .return_once(move |_| Ok(Some(stored)));

        let err = BusinessService::new(Arc::new(repo))
            .get_review(&business_id, &DocumentId::generate())
            .await
            .expect_err("missing review");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn adding_a_review_bumps_the_revision() {
        let stored = business();
        let id = stored.id.clone();
        let mut repo = MockBusinessRepository::new();
        repo.expect_find()
            .return_once(move |_| Ok(Some(stored)));
        repo.expect_replace()
            .withf(|business, expected| {
                *expected == 1 && business.revision == 2 && business.reviews.len() == 1
            })
            .times(1)
            .return_once(|_, _| Ok(()));

        BusinessService::new(Arc::new(repo))
            .add_review(
                &id,
                BusinessReviewDraft::parse(Some("kim"), Some("great"), Some("5")).expect("draft"),
            )
            .await
            .expect("review added");
    }

    #[rstest]
    #[tokio::test]
    async fn connection_failures_are_unavailable() {
        let mut repo = MockBusinessRepository::new();
        repo.expect_delete()
            .return_once(|_| Err(BusinessRepositoryError::connection("refused")));

        let err = BusinessService::new(Arc::new(repo))
            .delete(&DocumentId::generate())
            .await
            .expect_err("connection failure");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
