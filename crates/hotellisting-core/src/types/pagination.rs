//! Pagination engine.
//!
//! A [`PageRequest`] is what the caller asks for. Resolving it against the
//! configured maximum yields a validated [`PageWindow`], and a window plus the
//! total item count yields a [`Page`]. The window can be applied either to an
//! in-memory sequence ([`paginate`]) or pushed down to storage as
//! `LIMIT`/`OFFSET` and wrapped with [`Page::from_window`]; both paths share
//! the same metadata computation.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Default page size.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Maximum page size.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// Page number (1-based).
    #[serde(default = "default_page_number", alias = "PageNumber")]
    pub page_number: i64,
    /// Number of items per page, before clamping.
    #[serde(default = "default_page_size", alias = "PageSize")]
    pub page_size: i64,
}

impl PageRequest {
    /// Create a new page request. Nothing is validated until [`Self::resolve`].
    pub fn new(page_number: i64, page_size: i64) -> Self {
        Self {
            page_number,
            page_size,
        }
    }

    /// Validate the request and clamp the page size to `max_page_size`.
    ///
    /// Page numbers and page sizes below 1 are rejected with
    /// `InvalidArgument`.
    pub fn resolve(&self, max_page_size: u32) -> AppResult<PageWindow> {
        if self.page_number < 1 {
            return Err(AppError::invalid_argument(format!(
                "Page number must be at least 1, got {}",
                self.page_number
            )));
        }
        if self.page_size < 1 {
            return Err(AppError::invalid_argument(format!(
                "Page size must be at least 1, got {}",
                self.page_size
            )));
        }

        let max = u64::from(max_page_size.max(1));
        Ok(PageWindow {
            page_number: self.page_number.unsigned_abs(),
            page_size: self.page_size.unsigned_abs().min(max),
        })
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_number: default_page_number(),
            page_size: default_page_size(),
        }
    }
}

/// A validated page position: page number and page size are both at least 1
/// and the size is already clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    page_number: u64,
    page_size: u64,
}

impl PageWindow {
    /// 1-based page number.
    pub fn page_number(&self) -> u64 {
        self.page_number
    }

    /// Effective page size.
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Calculate the SQL `OFFSET` value.
    pub fn offset(&self) -> u64 {
        (self.page_number - 1).saturating_mul(self.page_size)
    }

    /// Return the SQL `LIMIT` value.
    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

/// One page of an ordered collection plus navigation metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Current page number (1-based).
    pub page_number: u64,
    /// Effective number of items per page.
    pub page_size: u64,
    /// Total number of items across all pages.
    pub total_items: u64,
    /// Total number of pages (`0` for an empty collection).
    pub total_pages: u64,
    /// Whether there is a previous page.
    pub has_previous: bool,
    /// Whether there is a next page.
    pub has_next: bool,
}

impl<T> Page<T> {
    /// Wrap a window of items that storage already sliced.
    pub fn from_window(items: Vec<T>, window: PageWindow, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(window.page_size);
        Self {
            items,
            page_number: window.page_number,
            page_size: window.page_size,
            total_items,
            total_pages,
            has_previous: window.page_number > 1,
            has_next: window.page_number < total_pages,
        }
    }

    /// Transform every item, keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
            has_previous: self.has_previous,
            has_next: self.has_next,
        }
    }

    /// Number of items on this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this page holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Slice an in-memory ordered sequence into the page described by `window`.
///
/// A page past the end yields an empty slice, not an error.
pub fn paginate<T>(items: Vec<T>, window: PageWindow) -> Page<T> {
    let total_items = items.len() as u64;
    let offset = usize::try_from(window.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(window.limit()).unwrap_or(usize::MAX);

    let slice = items.into_iter().skip(offset).take(limit).collect();
    Page::from_window(slice, window, total_items)
}

fn default_page_number() -> i64 {
    1
}

fn default_page_size() -> i64 {
    i64::from(DEFAULT_PAGE_SIZE)
}
