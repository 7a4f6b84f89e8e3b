//! Identity supplied by the upstream authentication proxy.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use crackmes_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the authenticated user name.
pub const AUTH_USER_HEADER: &str = "x-auth-user";

/// Name of the authenticated caller, taken verbatim from [`AUTH_USER_HEADER`].
///
/// The name is not resolved here; content operations look it up with an
/// exact, case-sensitive match and reject unknown users themselves.
///
/// ```ignore
/// async fn my_handler(ActingUser(name): ActingUser) -> AppResult<Json<()>> {
///     tracing::info!(user = %name, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ActingUser(pub String);

impl FromRequestParts<AppState> for ActingUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let name = parts
            .headers
            .get(AUTH_USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(format!(
                    "Missing {AUTH_USER_HEADER} header"
                )))
            })?;

        Ok(ActingUser(name.to_string()))
    }
}
