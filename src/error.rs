//! Ledger error types with HTTP status code mapping.
//!
//! [`LedgerError`] is the single error type for the registry, the ledger
//! and the HTTP layer. Every variant aborts its operation with no state
//! change and maps to a numeric code and HTTP status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Address, Amount, Key};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 4002,
///     "message": "insufficient balance: requested 11, available 10",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Error kind name, e.g. `"KeyNotFound"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Every way an operation can be rejected.
///
/// # Error Code Ranges
///
/// | Range     | Category                 | HTTP Status            |
/// |-----------|--------------------------|------------------------|
/// | 1000–1999 | Validation               | 400 Bad Request        |
/// | 2000–2099 | Not Found                | 404 Not Found          |
/// | 2100–2199 | Authorization            | 403 Forbidden          |
/// | 2200–2299 | Wiring                   | 409 Conflict           |
/// | 3000–3999 | Server / Transfer        | 500 / 502              |
/// | 4000–4999 | Value rules              | 422 Unprocessable      |
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// A required name was empty.
    #[error("name must not be empty")]
    EmptyString,

    /// The referenced pool or escrow does not exist.
    #[error("key not found: {0}")]
    KeyNotFound(Key),

    /// Caller does not own the pool or escrow.
    #[error("address {caller} is not the owner")]
    AddressUnauthorised {
        /// Rejected caller.
        caller: Address,
    },

    /// Caller is not the ledger administrator.
    #[error("address {caller} is not the administrator")]
    UnauthorisedAddress {
        /// Rejected caller.
        caller: Address,
    },

    /// The escrow ledger has not been bound to a registry yet.
    #[error("escrow ledger is not bound to a pool registry")]
    RegistryNotBound,

    /// The registry consulted is not the one the ledger is bound to.
    #[error("escrow ledger is bound to {bound}, not {presented}")]
    RegistryMismatch {
        /// Registry the ledger is bound to.
        bound: Address,
        /// Registry that was presented.
        presented: Address,
    },

    /// Offered stake is below the pool minimum.
    #[error("insufficient stake: offered {offered}, required {required}")]
    InsufficientStake {
        /// Value attached to the call.
        offered: Amount,
        /// Pool minimum.
        required: Amount,
    },

    /// Withdrawal exceeds the escrow balance.
    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        /// Requested amount.
        requested: Amount,
        /// Current balance.
        available: Amount,
    },

    /// A balance would exceed the representable range.
    #[error("balance overflow")]
    BalanceOverflow,

    /// The payout could not be delivered.
    #[error("transfer failed: {0}")]
    TransferFailed(String),

    /// Request validation failed before reaching the ledger.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::EmptyString => 1001,
            Self::InvalidRequest(_) => 1002,
            Self::KeyNotFound(_) => 2001,
            Self::AddressUnauthorised { .. } => 2101,
            Self::UnauthorisedAddress { .. } => 2102,
            Self::RegistryNotBound => 2201,
            Self::RegistryMismatch { .. } => 2202,
            Self::Internal(_) => 3000,
            Self::TransferFailed(_) => 3002,
            Self::InsufficientStake { .. } => 4001,
            Self::InsufficientBalance { .. } => 4002,
            Self::BalanceOverflow => 4003,
        }
    }

    /// Returns the error kind name as surfaced to callers.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::EmptyString => "EmptyString",
            Self::InvalidRequest(_) => "InvalidRequest",
            Self::KeyNotFound(_) => "KeyNotFound",
            Self::AddressUnauthorised { .. } => "AddressUnauthorised",
            Self::UnauthorisedAddress { .. } => "UnauthorisedAddress",
            Self::RegistryNotBound => "RegistryNotBound",
            Self::RegistryMismatch { .. } => "RegistryMismatch",
            Self::Internal(_) => "Internal",
            Self::TransferFailed(_) => "TransferFailed",
            Self::InsufficientStake { .. } => "InsufficientStake",
            Self::InsufficientBalance { .. } => "InsufficientBalance",
            Self::BalanceOverflow => "BalanceOverflow",
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::EmptyString | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::KeyNotFound(_) => StatusCode::NOT_FOUND,
            Self::AddressUnauthorised { .. } | Self::UnauthorisedAddress { .. } => {
                StatusCode::FORBIDDEN
            }
            Self::RegistryNotBound | Self::RegistryMismatch { .. } => StatusCode::CONFLICT,
            Self::InsufficientStake { .. }
            | Self::InsufficientBalance { .. }
            | Self::BalanceOverflow => StatusCode::UNPROCESSABLE_ENTITY,
            Self::TransferFailed(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: Some(self.kind().to_string()),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
