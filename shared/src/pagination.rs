//! Pagination convention: `page` (1-based) and `limit` query parameters;
//! responses carry the current page, total pages, total items and page size.

use serde::{Deserialize, Serialize};

const DEFAULT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 100;

/// Query-string parameters accepted by every paginated list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl PageQuery {
    /// Normalized 1-based page number
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    /// Normalized page size, clamped to the server maximum
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Offset into the result set for the current page
    pub fn offset(&self) -> usize {
        (self.page() - 1) * self.limit()
    }
}

/// Paginated response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub limit: usize,
}

impl<T> Paginated<T> {
    /// Build a page envelope from an already-sliced item list
    pub fn new(items: Vec<T>, query: &PageQuery, total_items: usize) -> Self {
        let limit = query.limit();
        Self {
            items,
            page: query.page(),
            total_pages: total_items.div_ceil(limit),
            total_items,
            limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let q = PageQuery {
            page: None,
            limit: None,
        };
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), 20);
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn test_limit_clamped() {
        let q = PageQuery {
            page: Some(0),
            limit: Some(5000),
        };
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), 100);
    }

    #[test]
    fn test_total_pages() {
        let q = PageQuery {
            page: Some(2),
            limit: Some(10),
        };
        let page = Paginated::new(vec![1, 2, 3], &q, 23);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 23);
        assert_eq!(page.page, 2);
        assert_eq!(q.offset(), 10);
    }
}
