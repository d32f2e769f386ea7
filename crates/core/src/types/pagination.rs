//! Pagination envelope shared by every list endpoint.

use serde::{Deserialize, Serialize};

/// Pagination metadata returned alongside list items.
///
/// `total` always reflects the filtered set, independent of `page`/`limit`.
///
/// ## Invariants
///
/// - `total_pages = ceil(total / limit)`
/// - `has_next_page = page < total_pages`
/// - `has_prev_page = page > 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Number of items in the filtered set.
    pub total: u64,
    /// Current page (1-based).
    pub page: u32,
    /// Page size used for the query.
    pub limit: u32,
    /// Total number of pages for the filtered set.
    pub total_pages: u32,
    /// Whether a later page exists.
    pub has_next_page: bool,
    /// Whether an earlier page exists.
    pub has_prev_page: bool,
}

impl Pagination {
    /// Build pagination metadata for a filtered set of `total` items.
    ///
    /// `page` and `limit` are clamped to at least 1, so callers can pass
    /// raw query-string values.
    #[must_use]
    pub fn new(total: u64, page: u32, limit: u32) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total_pages = u32::try_from(total.div_ceil(u64::from(limit))).unwrap_or(u32::MAX);

        Self {
            total,
            page,
            limit,
            total_pages,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        }
    }

    /// Row offset for a SQL `OFFSET` clause.
    #[must_use]
    pub const fn offset(self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }
}

/// Resolve a client-supplied page size against a default and a hard cap.
///
/// An absent value becomes `default`; anything else is clamped to
/// `1..=max`, so a huge `?limit=` cannot pull the whole table.
#[must_use]
pub fn clamp_limit(requested: Option<u32>, default: u32, max: u32) -> u32 {
    requested.unwrap_or(default).clamp(1, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_is_ceiling() {
        assert_eq!(Pagination::new(0, 1, 10).total_pages, 0);
        assert_eq!(Pagination::new(1, 1, 10).total_pages, 1);
        assert_eq!(Pagination::new(10, 1, 10).total_pages, 1);
        assert_eq!(Pagination::new(11, 1, 10).total_pages, 2);
        assert_eq!(Pagination::new(95, 1, 10).total_pages, 10);
    }

    #[test]
    fn test_next_and_prev_flags() {
        let first = Pagination::new(25, 1, 10);
        assert!(first.has_next_page);
        assert!(!first.has_prev_page);

        let middle = Pagination::new(25, 2, 10);
        assert!(middle.has_next_page);
        assert!(middle.has_prev_page);

        let last = Pagination::new(25, 3, 10);
        assert!(!last.has_next_page);
        assert!(last.has_prev_page);
    }

    #[test]
    fn test_page_past_end_has_no_next() {
        let past = Pagination::new(5, 9, 10);
        assert!(!past.has_next_page);
        assert!(past.has_prev_page);
    }

    #[test]
    fn test_zero_inputs_clamped() {
        let p = Pagination::new(10, 0, 0);
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 1);
        assert_eq!(p.total_pages, 10);
    }

    #[test]
    fn test_offset() {
        assert_eq!(Pagination::new(100, 1, 20).offset(), 0);
        assert_eq!(Pagination::new(100, 3, 20).offset(), 40);
    }

    #[test]
    fn test_limit_clamped_to_cap() {
        assert_eq!(clamp_limit(None, 20, 100), 20);
        assert_eq!(clamp_limit(Some(50), 20, 100), 50);
        assert_eq!(clamp_limit(Some(1_000_000), 20, 100), 100);
        assert_eq!(clamp_limit(Some(0), 20, 100), 1);
    }
}
