//! In-memory `AccountRepository`.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::Account;
use crate::domain::ports::{AccountRepository, AccountRepositoryError};

/// Accounts keyed by username; email uniqueness is checked on insert.
#[derive(Debug, Default)]
pub struct MemoryAccountRepository {
    accounts: RwLock<HashMap<String, Account>>,
}

impl MemoryAccountRepository {
    /// Start empty.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        Ok(self.accounts.read().await.get(username).cloned())
    }

    async fn insert(&self, account: &Account) -> Result<(), AccountRepositoryError> {
        let mut guard = self.accounts.write().await;
        if guard.contains_key(&account.username) {
            return Err(AccountRepositoryError::duplicate("username"));
        }
        if guard.values().any(|stored| stored.email == account.email) {
            return Err(AccountRepositoryError::duplicate("email"));
        }
        guard.insert(account.username.clone(), account.clone());
        Ok(())
    }
}
