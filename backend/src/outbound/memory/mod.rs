//! Process-local stores implementing the storage ports.
//!
//! Used when no database URL is configured and by the HTTP integration
//! tests. Each store holds its documents behind a `tokio` read/write lock
//! and applies the same revision rules as the PostgreSQL adapters, so the
//! services behave identically on either backend.

mod accounts;
mod businesses;
mod cities;
mod tokens;

pub use accounts::MemoryAccountRepository;
pub use businesses::MemoryBusinessRepository;
pub use cities::MemoryCityRepository;
pub use tokens::MemoryTokenBlacklist;

/// Resolve a revision-checked write against the stored revision.
fn check_revision(stored: u32, expected: u32) -> Result<(), (u32, u32)> {
    if stored == expected {
        Ok(())
    } else {
        Err((expected, stored))
    }
}
