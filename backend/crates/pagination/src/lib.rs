//! Page-number pagination for list endpoints.
//!
//! Query strings carry an optional page number (`pn`) and page size (`ps`).
//! [`PageRequest::parse`] normalizes them into a validated request that
//! yields the `skip`/`limit` pair used by repositories, and [`PageInfo`]
//! describes the resulting page in response envelopes.
//!
//! # Examples
//! ```
//! use pagination::{PageInfo, PageRequest};
//!
//! let request = PageRequest::parse(Some("3"), Some("20")).expect("valid page");
//! assert_eq!(request.skip(), 40);
//! assert_eq!(request.limit(), 20);
//!
//! let info = PageInfo::new(request, 45);
//! assert_eq!(info.total_pages, 3);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Page number used when the caller omits `pn`.
pub const DEFAULT_PAGE_NUMBER: u64 = 1;
/// Page size used when the caller omits `ps`.
pub const DEFAULT_PAGE_SIZE: u64 = 10;
/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Which pagination parameter failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageParameter {
    /// The page number (`pn`).
    PageNumber,
    /// The page size (`ps`).
    PageSize,
}

impl PageParameter {
    /// Query-string name of the parameter.
    #[must_use]
    pub const fn query_name(self) -> &'static str {
        match self {
            Self::PageNumber => "pn",
            Self::PageSize => "ps",
        }
    }
}

/// Errors raised while normalizing pagination parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// The value is not a positive integer.
    #[error("{name} must be a positive integer, got {value:?}", name = .parameter.query_name())]
    NotPositiveInteger {
        /// Offending parameter.
        parameter: PageParameter,
        /// Raw value supplied by the caller.
        value: String,
    },
    /// The page size exceeds [`MAX_PAGE_SIZE`].
    #[error("ps must not exceed {max}, got {value}")]
    PageSizeTooLarge {
        /// Requested page size.
        value: u64,
        /// Configured upper bound.
        max: u64,
    },
}

impl PaginationError {
    /// Parameter the error refers to.
    #[must_use]
    pub const fn parameter(&self) -> PageParameter {
        match self {
            Self::NotPositiveInteger { parameter, .. } => *parameter,
            Self::PageSizeTooLarge { .. } => PageParameter::PageSize,
        }
    }

    /// Raw value that failed validation, rendered as text.
    #[must_use]
    pub fn value(&self) -> String {
        match self {
            Self::NotPositiveInteger { value, .. } => value.clone(),
            Self::PageSizeTooLarge { value, .. } => value.to_string(),
        }
    }
}

/// Validated page request.
///
/// ## Invariants
/// - `page_number >= 1`
/// - `1 <= page_size <= MAX_PAGE_SIZE`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page_number: u64,
    page_size: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_number: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build a request from already-parsed values.
    ///
    /// # Errors
    /// Returns [`PaginationError`] when either value is zero or the page size
    /// exceeds [`MAX_PAGE_SIZE`].
    pub fn new(page_number: u64, page_size: u64) -> Result<Self, PaginationError> {
        if page_number == 0 {
            return Err(PaginationError::NotPositiveInteger {
                parameter: PageParameter::PageNumber,
                value: page_number.to_string(),
            });
        }
        if page_size == 0 {
            return Err(PaginationError::NotPositiveInteger {
                parameter: PageParameter::PageSize,
                value: page_size.to_string(),
            });
        }
        if page_size > MAX_PAGE_SIZE {
            return Err(PaginationError::PageSizeTooLarge {
                value: page_size,
                max: MAX_PAGE_SIZE,
            });
        }
        Ok(Self {
            page_number,
            page_size,
        })
    }

    /// Parse optional raw query values, applying defaults for absent or
    /// blank parameters.
    ///
    /// # Errors
    /// Returns [`PaginationError::NotPositiveInteger`] for non-numeric, zero
    /// or negative input and [`PaginationError::PageSizeTooLarge`] when the
    /// page size exceeds [`MAX_PAGE_SIZE`].
    pub fn parse(
        page_number: Option<&str>,
        page_size: Option<&str>,
    ) -> Result<Self, PaginationError> {
        let number = parse_component(page_number, PageParameter::PageNumber)?
            .unwrap_or(DEFAULT_PAGE_NUMBER);
        let size =
            parse_component(page_size, PageParameter::PageSize)?.unwrap_or(DEFAULT_PAGE_SIZE);
        Self::new(number, size)
    }

    /// One-based page number.
    #[must_use]
    pub const fn page_number(&self) -> u64 {
        self.page_number
    }

    /// Number of items per page.
    #[must_use]
    pub const fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Number of items to skip before the page starts.
    #[must_use]
    pub const fn skip(&self) -> u64 {
        self.page_size.saturating_mul(self.page_number - 1)
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.page_size
    }

    /// Slice an in-memory sequence down to this page.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageRequest;
    ///
    /// let request = PageRequest::new(2, 2).expect("valid page");
    /// let items: Vec<u8> = request.slice(vec![1, 2, 3, 4, 5]).collect();
    /// assert_eq!(items, vec![3, 4]);
    /// ```
    pub fn slice<I>(&self, items: I) -> impl Iterator<Item = I::Item>
    where
        I: IntoIterator,
    {
        let skip = usize::try_from(self.skip()).unwrap_or(usize::MAX);
        let take = usize::try_from(self.limit()).unwrap_or(usize::MAX);
        items.into_iter().skip(skip).take(take)
    }
}

fn parse_component(
    raw: Option<&str>,
    parameter: PageParameter,
) -> Result<Option<u64>, PaginationError> {
    let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    match value.parse::<u64>() {
        Ok(parsed) if parsed > 0 => Ok(Some(parsed)),
        _ => Err(PaginationError::NotPositiveInteger {
            parameter,
            value: value.to_owned(),
        }),
    }
}

/// Pagination block returned in list envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageInfo {
    /// One-based page number that was served.
    pub current_page: u64,
    /// Number of pages needed to cover `total_items`.
    pub total_pages: u64,
    /// Requested page size.
    pub page_size: u64,
    /// Number of items matching the filters across all pages.
    pub total_items: u64,
}

impl PageInfo {
    /// Describe the page served for `request` out of `total_items` matches.
    #[must_use]
    pub const fn new(request: PageRequest, total_items: u64) -> Self {
        Self {
            current_page: request.page_number,
            total_pages: total_items.div_ceil(request.page_size),
            page_size: request.page_size,
            total_items,
        }
    }
}
