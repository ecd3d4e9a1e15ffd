//! Administrative wiring DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Address, Amount};

/// Request body for `POST /admin/bind-registry`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BindRegistryRequest {
    /// Address of the pool registry to bind.
    #[schema(value_type = String)]
    pub registry: Address,
}

/// Current wiring of the escrow ledger, for `GET /admin/registry`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegistryBindingResponse {
    /// Registry the ledger is bound to, if any.
    #[schema(value_type = Option<String>)]
    pub bound_registry: Option<Address>,
    /// Address of the registry hosted by this gateway.
    #[schema(value_type = String)]
    pub hosted_registry: Address,
    /// Administrator allowed to bind.
    #[schema(value_type = String)]
    pub admin: Address,
    /// Total value held across all escrows (string-encoded).
    #[schema(value_type = String)]
    pub custody: Amount,
}
