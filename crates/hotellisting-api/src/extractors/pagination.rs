//! Pagination query parameter extractor.

use serde::{Deserialize, Serialize};

use hotellisting_core::config::PaginationConfig;
use hotellisting_core::types::pagination::PageRequest;

/// Query parameters for paginated endpoints (`?pageNumber=2&pageSize=10`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    /// Page number (1-based, default 1).
    #[serde(alias = "PageNumber")]
    pub page_number: Option<i64>,
    /// Items per page (default from configuration).
    #[serde(alias = "PageSize")]
    pub page_size: Option<i64>,
}

impl PaginationParams {
    /// Fill in defaults. Range checks and clamping happen when the request
    /// is resolved by the repository.
    pub fn into_page_request(self, config: &PaginationConfig) -> PageRequest {
        PageRequest::new(
            self.page_number.unwrap_or(1),
            self.page_size
                .unwrap_or_else(|| i64::from(config.default_page_size)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_come_from_config() {
        let config = PaginationConfig {
            default_page_size: 20,
            max_page_size: 50,
        };
        let request = PaginationParams::default().into_page_request(&config);
        assert_eq!(request, PageRequest::new(1, 20));
    }

    #[test]
    fn test_accepts_pascal_case_names() {
        let params: PaginationParams =
            serde_json::from_str(r#"{"PageNumber":3,"PageSize":5}"#).unwrap();
        assert_eq!(params.page_number, Some(3));
        assert_eq!(params.page_size, Some(5));
    }
}
