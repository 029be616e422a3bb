//! Common types used across API boundaries.

use serde::{Deserialize, Serialize};

/// Standard response envelope returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success".to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn error(error: String) -> Self {
        Self {
            status: "error".to_string(),
            data: None,
            error: Some(error),
        }
    }
}

/// Limit/offset paging parameters shared by the list endpoints.
///
/// `limit` is clamped to [1, 100]; both fields default when absent.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PageParams {
    pub const DEFAULT_LIMIT: i64 = 20;
    pub const MAX_LIMIT: i64 = 100;

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT).clamp(1, Self::MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            limit: None,
            offset: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_params_clamp() {
        let p = PageParams {
            limit: Some(1000),
            offset: Some(-5),
        };
        assert_eq!(p.limit(), PageParams::MAX_LIMIT);
        assert_eq!(p.offset(), 0);

        let p = PageParams::default();
        assert_eq!(p.limit(), PageParams::DEFAULT_LIMIT);
        assert_eq!(p.offset(), 0);
    }
}
