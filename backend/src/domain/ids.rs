//! Document identifiers.
//!
//! Every stored document and every embedded element (place, review) carries a
//! 24-digit hexadecimal identifier. Identifiers arrive as path segments, so
//! they are validated before any lookup: a malformed identifier is a bad
//! request, never a missing resource.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Error;

const DOCUMENT_ID_LEN: usize = 24;
const REVIEW_CODE_SUFFIX_LEN: usize = 6;

/// Returns `true` when `candidate` is exactly 24 hexadecimal digits.
///
/// # Examples
/// ```
/// use food_places::domain::is_valid_document_id;
///
/// assert!(is_valid_document_id("65a1f0c2b3d4e5f60718293a"));
/// assert!(!is_valid_document_id("65a1f0c2b3d4e5f60718293"));
/// assert!(!is_valid_document_id("65a1f0c2b3d4e5f60718293z"));
/// ```
#[must_use]
pub fn is_valid_document_id(candidate: &str) -> bool {
    candidate.len() == DOCUMENT_ID_LEN && candidate.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Validated 24-digit hexadecimal identifier, stored in lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

/// Raised when a string is not a well-formed document identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{value:?} is not a 24 character hexadecimal identifier")]
pub struct InvalidDocumentId {
    value: String,
}

impl DocumentId {
    /// Parse an identifier, normalising hexadecimal digits to lowercase.
    ///
    /// # Errors
    /// Returns [`InvalidDocumentId`] when the input is not 24 hex digits.
    pub fn parse(value: &str) -> Result<Self, InvalidDocumentId> {
        if is_valid_document_id(value) {
            Ok(Self(value.to_ascii_lowercase()))
        } else {
            Err(InvalidDocumentId {
                value: value.to_owned(),
            })
        }
    }

    /// Parse a path or form value, mapping failure to an `invalid_identifier`
    /// request error naming `field`.
    ///
    /// # Errors
    /// Returns [`Error`] with code `invalid_request` for malformed input.
    pub fn parse_field(field: &str, value: &str) -> Result<Self, Error> {
        Self::parse(value).map_err(|_| Error::invalid_identifier(field, value))
    }

    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(hex::encode(rand::random::<[u8; 12]>()))
    }

    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Short display code derived from the identifier, e.g. `rev_5e9a0c`.
    ///
    /// # Examples
    /// ```
    /// use food_places::domain::DocumentId;
    ///
    /// let id = DocumentId::parse("65a1f0c2b3d4e5f60718293a").expect("valid id");
    /// assert_eq!(id.short_code("rev"), "rev_18293a");
    /// ```
    #[must_use]
    pub fn short_code(&self, prefix: &str) -> String {
        let suffix = self
            .0
            .get(DOCUMENT_ID_LEN - REVIEW_CODE_SUFFIX_LEN..)
            .unwrap_or_default();
        format!("{prefix}_{suffix}")
    }
}

impl TryFrom<String> for DocumentId {
    type Error = InvalidDocumentId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DocumentId> for String {
    fn from(value: DocumentId) -> Self {
        value.0
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("000000000000000000000000")]
    #[case("abcdefABCDEF0123456789ab")]
    #[case("65a1f0c2b3d4e5f60718293a")]
    fn accepts_24_hex_digits(#[case] candidate: &str) {
        assert!(is_valid_document_id(candidate));
    }

    #[rstest]
    #[case("")]
    #[case("65a1f0c2b3d4e5f60718293")]
    #[case("65a1f0c2b3d4e5f60718293a0")]
    #[case("65a1f0c2b3d4e5f60718293g")]
    #[case("65a1f0c2-3d4e5f60718293a")]
    #[case("65a1f0c2b3d4e5f60718293é")]
    fn rejects_everything_else(#[case] candidate: &str) {
        assert!(!is_valid_document_id(candidate));
    }

    #[rstest]
    fn parse_normalises_to_lowercase() {
        let id = DocumentId::parse("ABCDEF0123456789ABCDEF01").expect("valid id");
        assert_eq!(id.as_str(), "abcdef0123456789abcdef01");
    }

    #[rstest]
    fn generated_identifiers_are_valid_and_distinct() {
        let first = DocumentId::generate();
        let second = DocumentId::generate();
        assert!(is_valid_document_id(first.as_str()));
        assert_ne!(first, second);
    }

    #[rstest]
    fn parse_field_reports_invalid_identifier() {
        let err = DocumentId::parse_field("place_id", "nope").expect_err("malformed id");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.detail_code(), Some("invalid_identifier"));
    }

    #[rstest]
    fn deserialising_rejects_malformed_identifiers() {
        let result = serde_json::from_str::<DocumentId>("\"xyz\"");
        assert!(result.is_err());
    }
}
