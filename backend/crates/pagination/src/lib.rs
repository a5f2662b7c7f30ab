//! Page request validation and pagination metadata primitives.
//!
//! Listing endpoints accept a one-based [`PageRequest`] and answer with a
//! [`PaginationMetadata`] descriptor computed from the total record count.
//! Storage adapters compute offsets with [`PageRequest::offset`]; the domain
//! layer treats both values as opaque and passes them through unchanged.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page size applied when a caller does not supply one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Validation failures raised while constructing a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Pages are numbered from one.
    #[error("page must be at least 1")]
    ZeroPage,
    /// The requested page size falls outside the accepted window.
    #[error("page size must be between {min} and {max}, got {actual}")]
    PageSizeOutOfRange {
        /// Smallest accepted page size.
        min: u32,
        /// Largest accepted page size.
        max: u32,
        /// Page size supplied by the caller.
        actual: u32,
    },
}

/// One-based page selector with a bounded page size.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let page = PageRequest::new(3, 10).expect("valid page");
/// assert_eq!(page.offset(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPageRequest", into = "RawPageRequest")]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Validate and construct a page request.
    ///
    /// # Errors
    /// Returns [`PageRequestError::ZeroPage`] when `page` is zero and
    /// [`PageRequestError::PageSizeOutOfRange`] when `page_size` is zero or
    /// larger than [`MAX_PAGE_SIZE`].
    pub const fn new(page: u32, page_size: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::ZeroPage);
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(PageRequestError::PageSizeOutOfRange {
                min: 1,
                max: MAX_PAGE_SIZE,
                actual: page_size,
            });
        }
        Ok(Self { page, page_size })
    }

    /// Build a request from optional query values, applying defaults.
    ///
    /// # Errors
    /// Propagates the validation failures of [`PageRequest::new`].
    pub fn from_parts(page: Option<u32>, page_size: Option<u32>) -> Result<Self, PageRequestError> {
        Self::new(page.unwrap_or(1), page_size.unwrap_or(DEFAULT_PAGE_SIZE))
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Number of records per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Zero-based index of the first record on this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1).saturating_mul(self.page_size as u64)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawPageRequest {
    page: u32,
    page_size: u32,
}

impl TryFrom<RawPageRequest> for PageRequest {
    type Error = PageRequestError;

    fn try_from(value: RawPageRequest) -> Result<Self, Self::Error> {
        Self::new(value.page, value.page_size)
    }
}

impl From<PageRequest> for RawPageRequest {
    fn from(value: PageRequest) -> Self {
        Self {
            page: value.page,
            page_size: value.page_size,
        }
    }
}

/// Page descriptor returned alongside a listing.
///
/// All fields are zero when the listing is empty; otherwise pages run from
/// `first_page` (always 1) to `last_page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaginationMetadata {
    /// Page that was requested.
    pub current_page: u32,
    /// Records per page.
    pub page_size: u32,
    /// First available page.
    pub first_page: u32,
    /// Last available page.
    pub last_page: u32,
    /// Total number of records across all pages.
    pub total_records: u64,
}

impl PaginationMetadata {
    /// Compute the descriptor for `total_records` split by `request`.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageRequest, PaginationMetadata};
    ///
    /// let request = PageRequest::new(2, 20).expect("valid page");
    /// let metadata = PaginationMetadata::calculate(45, &request);
    /// assert_eq!(metadata.last_page, 3);
    /// ```
    #[must_use]
    pub fn calculate(total_records: u64, request: &PageRequest) -> Self {
        if total_records == 0 {
            return Self::default();
        }
        let last_page = total_records.div_ceil(u64::from(request.page_size()));
        Self {
            current_page: request.page(),
            page_size: request.page_size(),
            first_page: 1,
            last_page: u32::try_from(last_page).unwrap_or(u32::MAX),
            total_records,
        }
    }
}
