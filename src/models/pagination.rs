//! Pagination primitives shared across list endpoints.

use serde::{Deserialize, Serialize};

/// Pagination query parameters (`?page=&limit=`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Pagination {
    /// Maximum items per page.
    const MAX_LIMIT: i64 = 100;

    /// Default items per page.
    const DEFAULT_LIMIT: i64 = 10;

    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        (self.current_page() - 1).saturating_mul(self.limit())
    }

    pub fn current_page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }
}

/// Paged result envelope returned by list endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T: Serialize> {
    pub data: Vec<T>,
    /// Count of every row matching the filters, independent of `limit`.
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl<T: Serialize> PagedResult<T> {
    pub fn new(data: Vec<T>, total: i64, pagination: &Pagination) -> Self {
        let limit = pagination.limit();
        let total_pages = (total + limit - 1) / limit;
        Self {
            data,
            total,
            page: pagination.current_page(),
            limit,
            total_pages,
        }
    }
}
