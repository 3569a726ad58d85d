//! In-memory `TokenBlacklist`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};
use tokio::sync::RwLock;

use crate::domain::ports::{TokenBlacklist, TokenBlacklistError};

/// Revoked tokens with their expiry. Expired entries are pruned on revoke.
pub struct MemoryTokenBlacklist {
    revoked: RwLock<HashMap<String, DateTime<Utc>>>,
    clock: Arc<dyn Clock>,
}

impl Default for MemoryTokenBlacklist {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl MemoryTokenBlacklist {
    /// Start empty, reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            revoked: RwLock::new(HashMap::new()),
            clock,
        }
    }
}

#[async_trait]
impl TokenBlacklist for MemoryTokenBlacklist {
    async fn revoke(
        &self,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), TokenBlacklistError> {
        let now = self.clock.utc();
        let mut guard = self.revoked.write().await;
        guard.retain(|_, expiry| *expiry > now);
        guard.insert(token.to_owned(), expires_at);
        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> Result<bool, TokenBlacklistError> {
        let now = self.clock.utc();
        let guard = self.revoked.read().await;
        Ok(guard.get(token).is_some_and(|expiry| *expiry > now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeDelta, TimeZone};
    use rstest::rstest;

    struct FixtureClock(DateTime<Utc>);

    impl Clock for FixtureClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 6, hour, 0, 0)
            .single()
            .expect("valid time")
    }

    #[rstest]
    #[tokio::test]
    async fn revoked_tokens_are_reported_until_expiry() {
        let blacklist = MemoryTokenBlacklist::new(Arc::new(FixtureClock(at(12))));
        blacklist
            .revoke("live", at(12) + TimeDelta::minutes(30))
            .await
            .expect("revoke");
        blacklist.revoke("stale", at(11)).await.expect("revoke");

        assert!(blacklist.is_revoked("live").await.expect("lookup"));
        assert!(!blacklist.is_revoked("stale").await.expect("lookup"));
        assert!(!blacklist.is_revoked("unknown").await.expect("lookup"));
    }
}
