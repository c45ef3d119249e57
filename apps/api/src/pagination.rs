use serde::{Deserialize, Serialize};

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

/// Query parameters for paginated listings. Absent or out-of-range values
/// are clamped rather than rejected.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageParams {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }
}

/// Pagination metadata returned alongside every page.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl PageMeta {
    pub fn new(params: &PageParams, total_items: i64) -> Self {
        let limit = params.limit();
        Self {
            page: params.page(),
            limit,
            total_items,
            total_pages: (total_items + limit - 1) / limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = PageParams::default();
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), DEFAULT_LIMIT);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let p = PageParams {
            page: Some(0),
            limit: Some(10_000),
        };
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), MAX_LIMIT);

        let p = PageParams {
            page: Some(-3),
            limit: Some(0),
        };
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), 1);
    }

    #[test]
    fn test_offset_derivation() {
        let p = PageParams {
            page: Some(3),
            limit: Some(25),
        };
        assert_eq!(p.offset(), 50);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let p = PageParams {
            page: Some(1),
            limit: Some(10),
        };
        assert_eq!(PageMeta::new(&p, 0).total_pages, 0);
        assert_eq!(PageMeta::new(&p, 10).total_pages, 1);
        assert_eq!(PageMeta::new(&p, 11).total_pages, 2);
        assert_eq!(PageMeta::new(&p, 99).total_pages, 10);
    }
}
