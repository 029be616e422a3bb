pub mod comments;
pub mod reviews;
pub mod terms;
pub mod titles;
pub mod users;

use serde::Deserialize;

use critica_core::api_types::PageParams;

/// Shared list query: optional search plus paging.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListQuery {
    pub fn page(&self) -> PageParams {
        PageParams {
            limit: self.limit,
            offset: self.offset,
        }
    }
}
