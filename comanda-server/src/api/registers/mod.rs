//! Cash Register API

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/registers", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::open))
        .route("/current", get(handler::current))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/close", post(handler::close))
        .route(
            "/{id}/movements",
            get(handler::list_movements).post(handler::record_movement),
        )
        .route("/{id}/balance", get(handler::balance))
}
