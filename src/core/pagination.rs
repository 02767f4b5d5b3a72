//! Pagination requests and page metadata

use serde::{Deserialize, Serialize};

/// Default page size when a request paginates without an explicit `size`
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// A pagination request captured from the `page` and `size` query parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageRequest {
    /// Page number (starts at 1)
    pub page: u64,

    /// Number of records per page
    pub size: u64,
}

impl PageRequest {
    /// Create a page request, clamping page and size to at least 1
    pub fn new(page: u64, size: u64) -> Self {
        Self {
            page: page.max(1),
            size: size.max(1),
        }
    }

    /// Build from raw request parameters
    ///
    /// Returns `None` when no `page` parameter was sent, in which case the
    /// listing is not paginated. A missing `size` falls back to
    /// `default_size`.
    pub fn from_params(page: Option<&str>, size: Option<&str>, default_size: u64) -> Option<Self> {
        let page = page?.parse().ok()?;
        let size = size
            .and_then(|s| s.parse().ok())
            .unwrap_or(default_size.max(1));

        Some(Self::new(page, size))
    }
}

/// Pagination metadata attached to paginated envelopes
///
/// The `last_page` field is a **boolean** answering "is the current page the
/// last one", not a page number. API consumers depend on this shape, so the
/// name is kept as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Current page number (starts at 1)
    pub current_page: u64,

    /// Number of records per page
    pub page_size: u64,

    /// Whether the current page is the last page
    pub last_page: bool,

    /// Total number of records across all pages
    pub total: u64,
}

impl PageMeta {
    /// Compute metadata for a page position within a total record count
    pub fn new(current_page: u64, page_size: u64, total: u64) -> Self {
        let page_size = page_size.max(1);
        let last_page_number = total.div_ceil(page_size).max(1);

        Self {
            current_page,
            page_size,
            last_page: current_page >= last_page_number,
            total,
        }
    }
}

/// One page of records plus its metadata
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}
