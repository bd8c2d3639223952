//! Pagination envelope used by every list endpoint.

use serde::{Deserialize, Serialize};

/// Default page size used by list endpoints and list pages.
pub const DEFAULT_LIMIT: usize = 25;

/// One page of a server-side collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: usize,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    pub items: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            count: 0,
            total: 0,
            offset: 0,
            limit: 0,
            items: Vec::new(),
        }
    }
}

impl<T> Page<T> {
    pub fn map<B, F>(self, f: F) -> Page<B>
    where
        F: FnMut(T) -> B,
    {
        Page {
            count: self.count,
            total: self.total,
            offset: self.offset,
            limit: self.limit,
            items: self.items.into_iter().map(f).collect(),
        }
    }

    pub fn is_first(&self) -> bool {
        self.offset == 0
    }

    pub fn is_last(&self) -> bool {
        self.offset + self.count >= self.total
    }
}

/// `limit`/`offset` query parameters of a list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    pub limit: usize,
    pub offset: usize,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl PageParams {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }

    /// Render as query pairs in a stable order.
    pub fn to_query(&self) -> Vec<(String, String)> {
        vec![
            ("limit".to_string(), self.limit.to_string()),
            ("offset".to_string(), self.offset.to_string()),
        ]
    }
}

/// Convert a 1-based page number into an offset. Page 0 is treated as page 1.
pub fn page_to_offset(page: usize, limit: usize) -> usize {
    page.saturating_sub(1) * limit
}
