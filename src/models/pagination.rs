//! Pagination input normalisation and page math.

use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

/// Page used when none is requested.
pub const DEFAULT_PAGE: u64 = 1;

/// Page size used when none, or a non-positive one, is requested.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Largest page size served; larger requests are clamped to it.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Raw list query as sent by clients
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Page number, starting at 1
    pub page: Option<i64>,
    /// Items per page (1-100)
    pub page_size: Option<i64>,
    /// Case-insensitive substring matched against name and email
    pub search: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: u64,
    pub page_size: u64,
}

impl PageParams {
    /// Normalise client input; out-of-range values never fail the request.
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p >= 1 => p as u64,
            _ => DEFAULT_PAGE,
        };

        let page_size = match page_size {
            Some(s) if s > MAX_PAGE_SIZE as i64 => MAX_PAGE_SIZE,
            Some(s) if s >= 1 => s as u64,
            _ => DEFAULT_PAGE_SIZE,
        };

        Self { page, page_size }
    }

    /// Rows to skip; capped so the offset still fits a signed 64-bit bind.
    pub fn skip(&self) -> u64 {
        (self.page - 1)
            .saturating_mul(self.page_size)
            .min(i64::MAX as u64)
    }

    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl From<&ListQuery> for PageParams {
    fn from(query: &ListQuery) -> Self {
        Self::new(query.page, query.page_size)
    }
}

pub fn total_pages(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// One page of a listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, params: PageParams) -> Self {
        Self {
            items,
            total,
            page: params.page,
            page_size: params.page_size,
            total_pages: total_pages(total, params.page_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_missing() {
        let params = PageParams::new(None, None);
        assert_eq!(params.page, 1);
        assert_eq!(params.page_size, 10);
        assert_eq!(params.skip(), 0);
    }

    #[test]
    fn page_clamped_to_one() {
        assert_eq!(PageParams::new(Some(0), None).page, 1);
        assert_eq!(PageParams::new(Some(-4), None).page, 1);
    }

    #[test]
    fn page_size_bounds() {
        assert_eq!(PageParams::new(None, Some(500)).page_size, 100);
        assert_eq!(PageParams::new(None, Some(100)).page_size, 100);
        assert_eq!(PageParams::new(None, Some(0)).page_size, 10);
        assert_eq!(PageParams::new(None, Some(-3)).page_size, 10);
        assert_eq!(PageParams::new(None, Some(25)).page_size, 25);
    }

    #[test]
    fn skip_and_limit() {
        let params = PageParams::new(Some(3), Some(10));
        assert_eq!(params.skip(), 20);
        assert_eq!(params.limit(), 10);

        let huge = PageParams::new(Some(i64::MAX), Some(100));
        assert_eq!(huge.skip(), i64::MAX as u64);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(25, 10), 3);
    }

    #[test]
    fn page_carries_params() {
        let page = Page::new(vec![21, 22, 23, 24, 25], 25, PageParams::new(Some(3), Some(10)));
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.page, 3);
        assert_eq!(page.page_size, 10);
        assert_eq!(page.total_pages, 3);
    }
}
