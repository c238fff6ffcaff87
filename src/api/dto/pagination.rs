//! Pagination query parameters.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

/// Pagination query parameters.
///
/// Uses `serde_with` to parse numbers from query strings, which keeps them
/// working under `#[serde(flatten)]`.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<usize>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<usize>,
}

impl PaginationParams {
    /// Validates the parameters and returns `(page, limit)`.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `limit`: 20
    ///
    /// # Validation
    ///
    /// - Page must be > 0
    /// - Limit must be between 1 and `MAX_PAGE_SIZE`
    pub fn validate(&self) -> Result<(usize, usize), String> {
        let page = self.page.unwrap_or(1);
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE);

        if page == 0 {
            return Err("La página debe ser mayor que 0".to_string());
        }

        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(format!("El límite debe estar entre 1 y {MAX_PAGE_SIZE}"));
        }

        Ok((page, limit))
    }
}
