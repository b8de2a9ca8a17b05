//! Pagination DTOs shared by all list endpoints.
//!
//! Missing or non-positive `page`/`limit` query values fall back to page 1
//! and limit 10; limit is capped at 100.

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::PageResult;

/// One page of a listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    #[schema(example = 1)]
    pub page: i64,
    #[schema(example = 10)]
    pub limit: i64,
    /// Matching rows across all pages
    #[schema(example = 42)]
    pub total: i64,
    #[schema(example = 5)]
    pub total_pages: i64,
}

impl<T> ListResponse<T> {
    pub fn from_page<M>(page: PageResult<M>) -> Self
    where
        T: From<M>,
    {
        let total_pages = page.total_pages();
        let page = page.map(T::from);
        Self {
            items: page.items,
            page: page.page,
            limit: page.limit,
            total: page.total,
            total_pages,
        }
    }
}
