//! Pagination limits.

use serde::{Deserialize, Serialize};

use crate::types::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Page-size defaults applied to list endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size used when the caller does not specify one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    /// Upper bound every requested page size is clamped to.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_max_page_size() -> u32 {
    MAX_PAGE_SIZE
}
