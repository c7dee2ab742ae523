//! Identity Extractor
//!
//! Lets handlers take `user: CurrentUser` as an argument. The middleware
//! normally puts the user into request extensions; the extractor falls back
//! to reading the headers directly so handlers also work on routes mounted
//! without the middleware (tests, internal routers).

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{CurrentUser, TENANT_HEADER, USER_HEADER, USER_NAME_HEADER};
use crate::core::ServerState;
use crate::utils::AppError;

fn header_value(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Already extracted by the middleware
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let tenant_id = header_value(parts, TENANT_HEADER);
        let user_id = header_value(parts, USER_HEADER);

        match (tenant_id, user_id) {
            (Some(tenant_id), Some(user_id)) => {
                let user = CurrentUser {
                    tenant_id,
                    user_id,
                    display_name: header_value(parts, USER_NAME_HEADER),
                };
                parts.extensions.insert(user.clone());
                Ok(user)
            }
            _ => {
                tracing::warn!(target: "identity", uri = %parts.uri, "missing identity headers");
                Err(AppError::Unauthorized)
            }
        }
    }
}
