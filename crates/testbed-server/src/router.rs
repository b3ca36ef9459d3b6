use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::app_state::AppState;
use crate::handlers;

/// Base path of the entity API.
pub const API_BASE: &str = "/api/test";

/// Create the main application router with all routes.
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health))
        .route("/create", post(handlers::create))
        .route("/all", get(handlers::list))
        .route("/search", get(handlers::search))
        .route(
            "/{id}",
            get(handlers::get)
                .put(handlers::update)
                .delete(handlers::delete),
        );

    Router::new()
        .nest(API_BASE, api)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        // CORS: allow any origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}
