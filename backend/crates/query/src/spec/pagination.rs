//! Page window

use serde::Serialize;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationSpec {
    pub skip: u64,
    pub limit: u64,
}

impl Default for PaginationSpec {
    fn default() -> Self {
        Self::from_page(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

impl PaginationSpec {
    /// Window for a 1-based page of `limit` items
    pub fn from_page(page: u64, limit: u64) -> Self {
        Self {
            skip: page.saturating_sub(1).saturating_mul(limit),
            limit,
        }
    }

    /// Values that are missing, non-numeric or not positive fall back to
    /// the defaults
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Self {
        Self::from_page(
            positive(page).unwrap_or(DEFAULT_PAGE),
            positive(limit).unwrap_or(DEFAULT_LIMIT),
        )
    }
}

fn positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
}
