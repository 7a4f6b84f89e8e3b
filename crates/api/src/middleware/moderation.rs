//! Gate for the moderation-decision source.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use crackmes_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the moderation token.
pub const MODERATION_TOKEN_HEADER: &str = "x-moderation-token";

/// Proof that the caller presented the configured moderation token.
///
/// Rejects with 403 when moderation is disabled (no token configured) or
/// the token is wrong, and with 401 when the header is missing.
pub struct Moderator;

impl FromRequestParts<AppState> for Moderator {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config.moderation_token.as_deref() else {
            return Err(AppError::Core(CoreError::Forbidden(
                "Moderation is disabled".into(),
            )));
        };

        let presented = parts
            .headers
            .get(MODERATION_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(format!(
                    "Missing {MODERATION_TOKEN_HEADER} header"
                )))
            })?;

        if !tokens_match(presented.as_bytes(), expected.as_bytes()) {
            tracing::warn!("Rejected moderation request with an invalid token");
            return Err(AppError::Core(CoreError::Forbidden(
                "Invalid moderation token".into(),
            )));
        }
        Ok(Moderator)
    }
}

/// Compare without short-circuiting on the first differing byte.
fn tokens_match(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
