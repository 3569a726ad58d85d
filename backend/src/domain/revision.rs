//! Optimistic writes for revisioned documents.
//!
//! Cities and legacy businesses are stored whole and replaced only when the
//! stored revision still equals the one that was read. Both services run
//! their read-modify-write cycles through [`write_with_retries`].

use std::future::Future;

use tracing::debug;

use crate::domain::{Business, City, DocumentId, Error};

/// How many times a write is attempted before a revision conflict is
/// reported to the caller.
pub const MAX_WRITE_ATTEMPTS: u32 = 3;

/// A document stored under a monotonically increasing revision.
pub trait Revisioned {
    /// Revision the document was read at.
    fn revision(&self) -> u32;

    /// Set the revision the next write stores.
    fn set_revision(&mut self, revision: u32);
}

impl Revisioned for City {
    fn revision(&self) -> u32 {
        self.revision
    }

    fn set_revision(&mut self, revision: u32) {
        self.revision = revision;
    }
}

impl Revisioned for Business {
    fn revision(&self) -> u32 {
        self.revision
    }

    fn set_revision(&mut self, revision: u32) {
        self.revision = revision;
    }
}

/// Outcome of one conditional replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Replaced {
    Stored,
    Stale { expected: u32, actual: u32 },
}

/// Load, mutate and conditionally replace a document, retrying lost races.
///
/// `mutation` runs once per attempt against a freshly loaded document, so it
/// must not consume its captures. Errors from `load`, `mutation` or
/// `replace` end the cycle immediately; only [`Replaced::Stale`] retries.
pub(crate) async fn write_with_retries<D, T, L, LF, M, S, SF>(
    document_id: &DocumentId,
    mut load: L,
    mut mutation: M,
    mut replace: S,
) -> Result<T, Error>
where
    D: Revisioned,
    L: FnMut() -> LF,
    LF: Future<Output = Result<D, Error>>,
    M: FnMut(&mut D) -> Result<T, Error>,
    S: FnMut(D, u32) -> SF,
    SF: Future<Output = Result<Replaced, Error>>,
{
    let mut last_conflict = (0, 0);
    for attempt in 1..=MAX_WRITE_ATTEMPTS {
        let mut document = load().await?;
        let expected = document.revision();
        let outcome = mutation(&mut document)?;
        document.set_revision(expected.saturating_add(1));
        match replace(document, expected).await? {
            Replaced::Stored => return Ok(outcome),
            Replaced::Stale { expected, actual } => {
                debug!(
                    document_id = %document_id,
                    attempt,
                    expected,
                    actual,
                    "write lost a revision race"
                );
                last_conflict = (expected, actual);
            }
        }
    }
    Err(Error::revision_conflict(last_conflict.0, last_conflict.1))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use rstest::rstest;

    use super::*;
    use crate::domain::{BusinessDraft, ErrorCode};

    fn business() -> Business {
        let draft = BusinessDraft::parse(Some("Kiln"), Some("Leeds"), Some("4"))
            .expect("draft parses");
        Business::create(draft)
    }

    #[rstest]
    #[case(0, Some(2))]
    #[case(2, Some(4))]
    #[case(3, None)]
    #[tokio::test]
    async fn stale_writes_retry_until_the_limit(
        #[case] stale_replies: u32,
        #[case] stored_revision: Option<u32>,
    ) {
        let id = DocumentId::generate();
        let loads = Cell::new(0_u32);
        let stored = Cell::new(None);

        let result = write_with_retries(
            &id,
            || {
                loads.set(loads.get() + 1);
                let mut document = business();
                document.revision = loads.get();
                async move { Ok(document) }
            },
            |document: &mut Business| {
                document.name = "Kiln Bakery".to_owned();
                Ok(document.revision)
            },
            |document: Business, expected| {
                let reply = if loads.get() <= stale_replies {
                    Replaced::Stale {
                        expected,
                        actual: expected + 1,
                    }
                } else {
                    stored.set(Some(document.revision));
                    Replaced::Stored
                };
                async move { Ok(reply) }
            },
        )
        .await;

        assert_eq!(stored.get(), stored_revision);
        match stored_revision {
            Some(revision) => assert_eq!(result.expect("write succeeds"), revision - 1),
            None => {
                let error = result.expect_err("retries exhausted");
                assert_eq!(error.code(), ErrorCode::Conflict);
                assert_eq!(loads.get(), MAX_WRITE_ATTEMPTS);
            }
        }
    }

    #[tokio::test]
    async fn mutation_errors_are_not_retried() {
        let id = DocumentId::generate();
        let loads = Cell::new(0_u32);

        let result: Result<(), Error> = write_with_retries(
            &id,
            || {
                loads.set(loads.get() + 1);
                let document = business();
                async move { Ok(document) }
            },
            |_: &mut Business| Err(Error::not_found("review not found")),
            |_: Business, _| async { Ok(Replaced::Stored) },
        )
        .await;

        assert_eq!(result.expect_err("mutation fails").code(), ErrorCode::NotFound);
        assert_eq!(loads.get(), 1);
    }
}
