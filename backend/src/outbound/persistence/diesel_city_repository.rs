//! PostgreSQL-backed `CityRepository` using Diesel ORM.
//!
//! Cities are stored one row per document with places embedded as JSONB.
//! Replacement is a compare-and-swap on the `revision` column.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CityPage, CityRepository, CityRepositoryError};
use crate::domain::{City, CityFilter, CityListQuery, CitySummary, DocumentId, Place, SortOrder};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{CityRow, CitySummaryRow, CityUpdate, NewCityRow};
use super::pool::{DbPool, PoolError};
use super::revision::{revision_from_db, revision_to_db, row_count};
use super::schema::cities;

/// Diesel-backed implementation of the `CityRepository` port.
#[derive(Clone)]
pub struct DieselCityRepository {
    pool: DbPool,
}

impl DieselCityRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CityRepositoryError {
    map_basic_pool_error(error, CityRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CityRepositoryError {
    map_basic_diesel_error(
        error,
        CityRepositoryError::query,
        CityRepositoryError::connection,
    )
}

fn map_json_error(error: &serde_json::Error) -> CityRepositoryError {
    CityRepositoryError::query(format!("malformed places document: {error}"))
}

/// Escape `LIKE` metacharacters so user input matches literally.
pub(super) fn like_pattern(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len() + 2);
    escaped.push('%');
    for ch in fragment.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn filtered(filter: &CityFilter) -> cities::BoxedQuery<'static, Pg> {
    let mut query = cities::table.into_boxed();
    if let Some(name) = filter.name.as_deref() {
        query = query.filter(cities::city_name.ilike(like_pattern(name)));
    }
    query
}

fn row_to_summary(row: CitySummaryRow) -> Result<CitySummary, CityRepositoryError> {
    let id = DocumentId::parse(&row.id)
        .map_err(|err| CityRepositoryError::query(format!("stored city id: {err}")))?;
    Ok(CitySummary {
        id,
        city_id: row.city_id,
        city_name: row.city_name,
    })
}

fn row_to_city(row: CityRow) -> Result<City, CityRepositoryError> {
    let id = DocumentId::parse(&row.id)
        .map_err(|err| CityRepositoryError::query(format!("stored city id: {err}")))?;
    let places: Vec<Place> =
        serde_json::from_value(row.places).map_err(|err| map_json_error(&err))?;
    Ok(City {
        id,
        city_id: row.city_id,
        city_name: row.city_name,
        places,
        revision: revision_from_db(row.revision),
    })
}

async fn handle_replace_failure<C>(
    conn: &mut C,
    id: &DocumentId,
    expected_revision: u32,
) -> CityRepositoryError
where
    C: diesel_async::AsyncConnection<Backend = Pg> + Send,
{
    let current = cities::table
        .filter(cities::id.eq(id.as_str()))
        .select(cities::revision)
        .first::<i32>(conn)
        .await
        .optional()
        .map_err(map_diesel_error);

    match current {
        Ok(Some(revision)) => {
            CityRepositoryError::revision_mismatch(expected_revision, revision_from_db(revision))
        }
        Ok(None) => CityRepositoryError::missing(id.as_str()),
        Err(err) => err,
    }
}

#[async_trait]
impl CityRepository for DieselCityRepository {
    async fn list(&self, query: &CityListQuery) -> Result<CityPage, CityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = filtered(&query.filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let ordered = match query.sort.order {
            SortOrder::Asc => filtered(&query.filter).order((cities::city_name.asc(), cities::id.asc())),
            SortOrder::Desc => {
                filtered(&query.filter).order((cities::city_name.desc(), cities::id.desc()))
            }
        };
        let rows: Vec<CitySummaryRow> = ordered
            .offset(row_count(query.page.skip()))
            .limit(row_count(query.page.limit()))
            .select(CitySummaryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let cities = rows
            .into_iter()
            .map(row_to_summary)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CityPage {
            cities,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn find(&self, id: &DocumentId) -> Result<Option<City>, CityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<CityRow> = cities::table
            .filter(cities::id.eq(id.as_str()))
            .select(CityRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_city).transpose()
    }

    async fn insert(&self, city: &City) -> Result<(), CityRepositoryError> {
        let places = serde_json::to_value(&city.places).map_err(|err| map_json_error(&err))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewCityRow {
            id: city.id.as_str(),
            city_id: &city.city_id,
            city_name: &city.city_name,
            places,
            revision: revision_to_db(city.revision),
        };
        diesel::insert_into(cities::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn replace(
        &self,
        city: &City,
        expected_revision: u32,
    ) -> Result<(), CityRepositoryError> {
        let places = serde_json::to_value(&city.places).map_err(|err| map_json_error(&err))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let update = CityUpdate {
            city_id: &city.city_id,
            city_name: &city.city_name,
            places,
            revision: revision_to_db(city.revision),
        };
        let updated_rows = diesel::update(cities::table)
            .filter(
                cities::id
                    .eq(city.id.as_str())
                    .and(cities::revision.eq(revision_to_db(expected_revision))),
            )
            .set(&update)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if updated_rows == 0 {
            return Err(handle_replace_failure(&mut conn, &city.id, expected_revision).await);
        }
        Ok(())
    }

    async fn delete(&self, id: &DocumentId) -> Result<bool, CityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(cities::table.filter(cities::id.eq(id.as_str())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
