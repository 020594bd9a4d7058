//! Offset/limit pagination as seen by a numeric pager

use crate::qs::{FilterState, LIMIT, OFFSET};

/// Page sizes offered by the pager
pub const PER_PAGE_OPTIONS: [i64; 5] = [5, 10, 15, 20, 25];

/// 1-based page number of `offset` for pages of `limit` items
///
/// A non-positive `limit` always yields page 1.
#[must_use]
#[allow(clippy::integer_division)]
pub fn current_page(offset: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 1;
    }
    offset.max(0) / limit + 1
}

/// Offset of the first item of 1-based `page`
///
/// Saturates at `i64::MAX` for page numbers beyond any real result set.
#[must_use]
pub fn offset_for_page(page: i64, limit: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(limit)
}

/// Pagination change to hand to [`QueryParams::set_from_pagination`](crate::QueryParams::set_from_pagination)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageChange {
    /// New offset
    pub offset: i64,
    /// New page size, if it changed
    pub limit: Option<i64>,
}

/// What the pager displays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// 1-based current page
    pub page: i64,
    /// Items per page
    pub per_page: i64,
    /// Total number of items
    pub item_count: i64,
    /// Number of pages, at least 1
    pub page_count: i64,
}

impl PageInfo {
    /// Pager state for an offset/limit pair and a total count
    #[must_use]
    #[allow(clippy::integer_division)]
    pub fn new(offset: i64, limit: i64, item_count: i64) -> Self {
        let page_count = if limit > 0 && item_count > 0 {
            item_count.saturating_add(limit - 1) / limit
        } else {
            1
        };
        Self {
            page: current_page(offset, limit),
            per_page: limit,
            item_count: item_count.max(0),
            page_count,
        }
    }

    /// Pager state read from a view's filter state; missing keys count as 0
    #[must_use]
    pub fn from_params(params: &FilterState, item_count: i64) -> Self {
        let read = |key: &str| params.get(key).and_then(|v| v.as_int()).unwrap_or(0);
        Self::new(read(OFFSET), read(LIMIT), item_count)
    }

    /// Jump to `page` keeping the page size
    ///
    /// `page` is clamped to the last page.
    #[must_use]
    pub fn set_page(&self, page: i64) -> PageChange {
        PageChange {
            offset: offset_for_page(page.min(self.page_count), self.per_page),
            limit: None,
        }
    }

    /// Switch to `per_page` items per page, landing on `page`
    ///
    /// `page` is clamped to the last page under the new page size.
    #[must_use]
    pub fn set_per_page(&self, per_page: i64, page: i64) -> PageChange {
        let last_page = Self::new(0, per_page, self.item_count).page_count;
        PageChange {
            offset: offset_for_page(page.min(last_page), per_page),
            limit: Some(per_page),
        }
    }

    /// There is a page after the current one
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.page_count
    }

    /// There is a page before the current one
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }
}
