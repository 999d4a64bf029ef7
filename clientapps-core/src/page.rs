//! Pagination parameters and the skip/limit window they translate to.

use serde::{Deserialize, Serialize};

/// A skip/limit window over the documents of a collection.
///
/// A `limit` of zero selects no documents.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FindWindow {
    /// Number of documents to skip.
    pub skip: u64,
    /// Maximum number of documents to return.
    pub limit: u64,
}

impl FindWindow {
    pub fn new(skip: u64, limit: u64) -> Self {
        Self { skip, limit }
    }

    /// Returns true if this window can never select a document.
    pub fn is_empty(&self) -> bool {
        self.limit == 0
    }
}

/// Parameters for paging through a collection.
///
/// Pages are 1-indexed. Values come straight from callers and are not
/// validated; [`PageRequest::window`] clamps them instead.
///
/// # Example
///
/// ```ignore
/// use clientapps_core::page::PageRequest;
///
/// let window = PageRequest::new(3, 20).window();
/// assert_eq!(window.skip, 40);
/// assert_eq!(window.limit, 20);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// The page number (1-indexed).
    pub page: i32,
    /// Number of items per page.
    pub page_size: i32,
}

impl PageRequest {
    pub fn new(page: i32, page_size: i32) -> Self {
        Self { page, page_size }
    }

    /// Calculates the window for this page.
    ///
    /// `skip` is `(page - 1) * page_size` clamped to zero, so a page of zero or
    /// below reads from the start. A negative `page_size` is treated as zero.
    pub fn window(&self) -> FindWindow {
        let limit = i64::from(self.page_size.max(0));
        let skip = (i64::from(self.page) - 1).saturating_mul(limit).max(0);

        FindWindow::new(skip as u64, limit as u64)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, page_size: 10 }
    }
}
