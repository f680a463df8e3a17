//! Request extractors.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::ApiError;

/// A JSON body that falls back to `T::default()` when the body is empty or
/// not valid JSON for `T`.
///
/// Handlers then report the missing field instead of a parse error.
#[derive(Debug, Clone, Default)]
pub struct LenientJson<T>(pub T);

impl<S, T> FromRequest<S> for LenientJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::new(rejection.status(), rejection.body_text()))?;

        let value = match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                if !bytes.is_empty() {
                    debug!(error = %e, "ignoring unparsable request body");
                }
                T::default()
            }
        };
        Ok(Self(value))
    }
}
