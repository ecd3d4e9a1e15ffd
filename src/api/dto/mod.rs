//! Data Transfer Objects for REST request/response serialization.
//!
//! All amounts are serialized as JSON strings to prevent precision loss
//! on u128 values; identifiers and addresses as `0x`-prefixed hex.

pub mod admin_dto;
pub mod common_dto;
pub mod escrow_dto;
pub mod pool_dto;

pub use admin_dto::*;
pub use common_dto::*;
pub use escrow_dto::*;
pub use pool_dto::*;
