//! Identity middleware
//!
//! Requires the identity headers on every `/api/` route and injects
//! [`CurrentUser`] into request extensions.
//!
//! # Paths skipped
//!
//! - `OPTIONS *` (CORS preflight)
//! - non-`/api/` paths
//! - `/api/health`

use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, TENANT_HEADER, USER_HEADER, USER_NAME_HEADER};
use crate::utils::AppError;

fn header_value(req: &Request, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub async fn require_identity(mut req: Request, next: Next) -> Result<Response, AppError> {
    let path = req.uri().path();

    // CORS preflight passes through
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // Non-API routes fall through to their own 404
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if path == "/api/health" {
        return Ok(next.run(req).await);
    }

    let tenant_id = header_value(&req, TENANT_HEADER);
    let user_id = header_value(&req, USER_HEADER);

    match (tenant_id, user_id) {
        (Some(tenant_id), Some(user_id)) => {
            let user = CurrentUser {
                tenant_id,
                user_id,
                display_name: header_value(&req, USER_NAME_HEADER),
            };
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        _ => {
            tracing::warn!(target: "identity", uri = %req.uri(), "missing identity headers");
            Err(AppError::Unauthorized)
        }
    }
}
