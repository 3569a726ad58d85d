//! Integer conversions between domain counters and PostgreSQL columns.

/// Cast a stored revision (`INT4`) to the domain counter.
#[expect(
    clippy::cast_sign_loss,
    reason = "revision is always non-negative in database"
)]
pub(super) fn revision_from_db(revision: i32) -> u32 {
    revision as u32
}

/// Cast a domain revision to the stored `INT4`.
#[expect(
    clippy::cast_possible_wrap,
    reason = "revision values are always small positive integers"
)]
pub(super) fn revision_to_db(revision: u32) -> i32 {
    revision as i32
}

/// Clamp a page offset or limit to the `BIGINT` range.
pub(super) fn row_count(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
