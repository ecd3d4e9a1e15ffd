//! Caller identity extractor.
//!
//! Every mutating endpoint acts on behalf of the account named in the
//! [`CALLER_HEADER`] header. Authentication of that identity is left to
//! whatever fronts the gateway.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::Address;
use crate::error::LedgerError;

/// Header carrying the hex address of the calling account.
pub const CALLER_HEADER: &str = "x-caller-address";

/// Address of the account issuing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub Address);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = LedgerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts.headers.get(CALLER_HEADER).ok_or_else(|| {
            LedgerError::InvalidRequest(format!("missing {CALLER_HEADER} header"))
        })?;
        let text = raw.to_str().map_err(|_| {
            LedgerError::InvalidRequest(format!("{CALLER_HEADER} header is not ASCII"))
        })?;
        let address: Address = text.trim().parse()?;
        if address.is_zero() {
            return Err(LedgerError::InvalidRequest(
                "the zero address cannot issue calls".to_string(),
            ));
        }
        Ok(Self(address))
    }
}
