//! Shared DTO types used across multiple endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Address, PoolId};
use crate::error::LedgerError;

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items.
    pub total: u32,
    /// Total number of pages.
    pub total_pages: u32,
}

impl PaginationMeta {
    /// Slices `items` to the requested page and returns it with metadata.
    ///
    /// `page` and `per_page` are clamped to `>= 1` and `1..=100`.
    #[must_use]
    pub fn paginate<T>(items: Vec<T>, page: u32, per_page: u32) -> (Vec<T>, Self) {
        let page = page.max(1);
        let per_page = per_page.clamp(1, 100);
        let total = u32::try_from(items.len()).unwrap_or(u32::MAX);
        let total_pages = total.div_ceil(per_page);

        let start = (page - 1).saturating_mul(per_page) as usize;
        let data = items
            .into_iter()
            .skip(start)
            .take(per_page as usize)
            .collect();

        (
            data,
            Self {
                page,
                per_page,
                total,
                total_pages,
            },
        )
    }
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

/// Query parameters for `GET /pools`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PoolListParams {
    /// Only pools owned by this address.
    #[serde(default)]
    pub owner: Option<String>,
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (max 100). Defaults to 20.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl PoolListParams {
    /// Parses the owner filter.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidRequest`] on a malformed address.
    pub fn owner(&self) -> Result<Option<Address>, LedgerError> {
        self.owner.as_deref().map(str::parse::<Address>).transpose()
    }
}

/// Query parameters for `GET /escrows`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EscrowListParams {
    /// Only escrows owned by this address.
    #[serde(default)]
    pub owner: Option<String>,
    /// Only escrows opened under this pool.
    #[serde(default)]
    pub pool_id: Option<String>,
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (max 100). Defaults to 20.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl EscrowListParams {
    /// Parses the owner and pool filters.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidRequest`] on a malformed address or
    /// key.
    pub fn filters(&self) -> Result<(Option<Address>, Option<PoolId>), LedgerError> {
        let owner = self.owner.as_deref().map(str::parse::<Address>).transpose()?;
        let pool_id = self.pool_id.as_deref().map(str::parse::<PoolId>).transpose()?;
        Ok((owner, pool_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_slices_and_counts() {
        let items: Vec<u32> = (0..45).collect();
        let (page, meta) = PaginationMeta::paginate(items, 3, 20);
        assert_eq!(page, (40..45).collect::<Vec<_>>());
        assert_eq!(meta.total, 45);
        assert_eq!(meta.total_pages, 3);
    }

    #[test]
    fn paginate_clamps_inputs() {
        let items: Vec<u32> = (0..5).collect();
        let (page, meta) = PaginationMeta::paginate(items, 0, 0);
        assert_eq!(page, vec![0]);
        assert_eq!(meta.page, 1);
        assert_eq!(meta.per_page, 1);
    }

    #[test]
    fn empty_list_has_no_pages() {
        let (page, meta) = PaginationMeta::paginate(Vec::<u8>::new(), 1, 20);
        assert!(page.is_empty());
        assert_eq!(meta.total_pages, 0);
    }

    #[test]
    fn escrow_filters_reject_bad_key() {
        let params = EscrowListParams {
            owner: None,
            pool_id: Some("0xnothex".to_string()),
            page: 1,
            per_page: 20,
        };
        assert!(matches!(
            params.filters(),
            Err(LedgerError::InvalidRequest(_))
        ));
    }
}
