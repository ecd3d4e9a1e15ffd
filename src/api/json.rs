//! JSON body extractor that rejects with [`LedgerError`].
//!
//! Wraps [`axum::Json`] so malformed bodies come back in the same
//! structured error shape as every other failure.

use axum::Json;
use axum::extract::{FromRequest, Request};
use axum::extract::rejection::JsonRejection;

use crate::error::LedgerError;

/// Deserialized JSON request body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = LedgerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| LedgerError::InvalidRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}
