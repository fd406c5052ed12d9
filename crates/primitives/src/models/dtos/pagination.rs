use serde::Deserialize;
use utoipa::IntoParams;

pub const DEFAULT_PER_PAGE: i64 = 50;
pub const MAX_PER_PAGE: i64 = 200;

#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
pub struct PageQuery {
    /// 1-based page number
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }

    pub fn limit_offset(&self) -> (i64, i64) {
        let per_page = self.per_page();
        (per_page, (self.page() - 1).saturating_mul(per_page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_paging() {
        let q = PageQuery {
            page: Some(0),
            per_page: Some(10_000),
        };
        assert_eq!(q.limit_offset(), (MAX_PER_PAGE, 0));

        let q = PageQuery {
            page: Some(3),
            per_page: Some(20),
        };
        assert_eq!(q.limit_offset(), (20, 40));

        assert_eq!(PageQuery::default().limit_offset(), (DEFAULT_PER_PAGE, 0));

        let q = PageQuery {
            page: Some(i64::MAX),
            per_page: Some(MAX_PER_PAGE),
        };
        assert_eq!(q.limit_offset(), (MAX_PER_PAGE, i64::MAX));

        let q = PageQuery {
            page: Some(i64::MIN),
            per_page: None,
        };
        assert_eq!(q.limit_offset(), (DEFAULT_PER_PAGE, 0));
    }
}
