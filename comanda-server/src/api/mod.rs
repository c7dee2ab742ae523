//! API route modules
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`tables`] - dining table management, checkout and settlement
//! - [`order_items`] - order item status advancement
//! - [`registers`] - cash register sessions and the movement ledger

use axum::Router;
use axum::middleware as axum_middleware;
use http::HeaderValue;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth;
use crate::core::ServerState;

pub mod health;
pub mod order_items;
pub mod registers;
pub mod tables;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build the application router with middleware and state applied.
pub fn build_router(state: ServerState) -> Router {
    let x_request_id = http::HeaderName::from_static("x-request-id");

    Router::new()
        .merge(health::router())
        .merge(tables::router())
        .merge(order_items::router())
        .merge(registers::router())
        .layer(
            // Outermost first: request id, trace, CORS, then identity
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), XRequestId))
                .layer(PropagateRequestIdLayer::new(x_request_id))
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(axum_middleware::from_fn(auth::require_identity)),
        )
        .with_state(state)
}
