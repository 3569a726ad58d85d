//! Port abstraction for account persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::Account;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
        /// A unique column (`username` or `email`) is already taken.
        Duplicate { field: String } => "an account with this {field} already exists",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Fetch an account by its login name.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Account>, AccountRepositoryError>;

    /// Store a new account, rejecting duplicate usernames and emails.
    async fn insert(&self, account: &Account) -> Result<(), AccountRepositoryError>;
}
