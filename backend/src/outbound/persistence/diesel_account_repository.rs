//! PostgreSQL-backed `AccountRepository` using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::Account;
use crate::domain::ports::{AccountRepository, AccountRepositoryError};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, unique_violation,
};
use super::models::{AccountRow, NewAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::accounts;

/// Unique constraint on `accounts.email`.
const EMAIL_CONSTRAINT: &str = "accounts_email_key";

/// Diesel-backed implementation of the `AccountRepository` port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AccountRepositoryError {
    map_basic_pool_error(error, AccountRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AccountRepositoryError {
    if let Some(constraint) = unique_violation(&error) {
        let field = if constraint == EMAIL_CONSTRAINT {
            "email"
        } else {
            "username"
        };
        return AccountRepositoryError::duplicate(field);
    }
    map_basic_diesel_error(
        error,
        AccountRepositoryError::query,
        AccountRepositoryError::connection,
    )
}

fn row_to_account(row: AccountRow) -> Account {
    Account {
        username: row.username,
        email: row.email,
        name: row.name,
        password_hash: row.password_hash,
        is_admin: row.is_admin,
        created_at: row.created_at,
    }
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<AccountRow> = accounts::table
            .filter(accounts::username.eq(username))
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_account))
    }

    async fn insert(&self, account: &Account) -> Result<(), AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewAccountRow {
            username: &account.username,
            email: &account.email,
            name: &account.name,
            password_hash: &account.password_hash,
            is_admin: account.is_admin,
            created_at: account.created_at,
        };
        diesel::insert_into(accounts::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    struct Violation(Option<&'static str>);

    impl DatabaseErrorInformation for Violation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            Some("accounts")
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.0
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    #[rstest]
    #[case(Some("accounts_email_key"), "email")]
    #[case(Some("accounts_pkey"), "username")]
    #[case(None, "username")]
    fn unique_violations_name_the_duplicate_field(
        #[case] constraint: Option<&'static str>,
        #[case] field: &str,
    ) {
        let err = map_diesel_error(DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new(Violation(constraint)),
        ));

        assert_eq!(err, AccountRepositoryError::duplicate(field));
    }

    #[rstest]
    fn other_failures_are_query_errors() {
        let err = map_diesel_error(DieselError::NotFound);
        assert!(matches!(err, AccountRepositoryError::Query { .. }));
    }
}
