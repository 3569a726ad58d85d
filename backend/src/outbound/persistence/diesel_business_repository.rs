//! PostgreSQL-backed `BusinessRepository` using Diesel ORM.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;

use crate::domain::ports::{BusinessPage, BusinessRepository, BusinessRepositoryError};
use crate::domain::{Business, BusinessReview, DocumentId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{BusinessRow, BusinessUpdate, NewBusinessRow};
use super::pool::{DbPool, PoolError};
use super::revision::{revision_from_db, revision_to_db, row_count};
use super::schema::businesses;

/// Diesel-backed implementation of the `BusinessRepository` port.
///
/// Businesses are listed in insertion order.
#[derive(Clone)]
pub struct DieselBusinessRepository {
    pool: DbPool,
}

impl DieselBusinessRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BusinessRepositoryError {
    map_basic_pool_error(error, BusinessRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> BusinessRepositoryError {
    map_basic_diesel_error(
        error,
        BusinessRepositoryError::query,
        BusinessRepositoryError::connection,
    )
}

fn map_json_error(error: &serde_json::Error) -> BusinessRepositoryError {
    BusinessRepositoryError::query(format!("malformed reviews document: {error}"))
}

fn row_to_business(row: BusinessRow) -> Result<Business, BusinessRepositoryError> {
    let id = DocumentId::parse(&row.id)
        .map_err(|err| BusinessRepositoryError::query(format!("stored business id: {err}")))?;
    let reviews: Vec<BusinessReview> =
        serde_json::from_value(row.reviews).map_err(|err| map_json_error(&err))?;
    Ok(Business {
        id,
        name: row.name,
        town: row.town,
        rating: row.rating,
        reviews,
        revision: revision_from_db(row.revision),
    })
}

async fn handle_replace_failure<C>(
    conn: &mut C,
    id: &DocumentId,
    expected_revision: u32,
) -> BusinessRepositoryError
where
    C: diesel_async::AsyncConnection<Backend = Pg> + Send,
{
    let current = businesses::table
        .filter(businesses::id.eq(id.as_str()))
        .select(businesses::revision)
        .first::<i32>(conn)
        .await
        .optional()
        .map_err(map_diesel_error);

    match current {
        Ok(Some(revision)) => BusinessRepositoryError::revision_mismatch(
            expected_revision,
            revision_from_db(revision),
        ),
        Ok(None) => BusinessRepositoryError::missing(id.as_str()),
        Err(err) => err,
    }
}

#[async_trait]
impl BusinessRepository for DieselBusinessRepository {
    async fn list(&self, page: &PageRequest) -> Result<BusinessPage, BusinessRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = businesses::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let rows: Vec<BusinessRow> = businesses::table
            .order((businesses::created_at.asc(), businesses::id.asc()))
            .offset(row_count(page.skip()))
            .limit(row_count(page.limit()))
            .select(BusinessRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let businesses = rows
            .into_iter()
            .map(row_to_business)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(BusinessPage {
            businesses,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn find(&self, id: &DocumentId) -> Result<Option<Business>, BusinessRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<BusinessRow> = businesses::table
            .filter(businesses::id.eq(id.as_str()))
            .select(BusinessRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_business).transpose()
    }

    async fn insert(&self, business: &Business) -> Result<(), BusinessRepositoryError> {
        let reviews =
            serde_json::to_value(&business.reviews).map_err(|err| map_json_error(&err))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewBusinessRow {
            id: business.id.as_str(),
            name: &business.name,
            town: &business.town,
            rating: business.rating,
            reviews,
            revision: revision_to_db(business.revision),
        };
        diesel::insert_into(businesses::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn replace(
        &self,
        business: &Business,
        expected_revision: u32,
    ) -> Result<(), BusinessRepositoryError> {
        let reviews =
            serde_json::to_value(&business.reviews).map_err(|err| map_json_error(&err))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let update = BusinessUpdate {
            name: &business.name,
            town: &business.town,
            rating: business.rating,
            reviews,
            revision: revision_to_db(business.revision),
        };
        let updated_rows = diesel::update(businesses::table)
            .filter(
                businesses::id
                    .eq(business.id.as_str())
                    .and(businesses::revision.eq(revision_to_db(expected_revision))),
            )
            .set(&update)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if updated_rows == 0 {
            return Err(handle_replace_failure(&mut conn, &business.id, expected_revision).await);
        }
        Ok(())
    }

    async fn delete(&self, id: &DocumentId) -> Result<bool, BusinessRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(businesses::table.filter(businesses::id.eq(id.as_str())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
