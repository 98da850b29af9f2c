//! Router configuration for the HTTP API.
//!
//! Sets up all routes and middleware (CORS, compression, tracing).

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Browsers call this from the dApp origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        .route("/eligibility", post(handlers::evaluate_eligibility))
        .route("/courses", get(handlers::list_courses))
        .route("/courses/{course_id}/tracker", get(handlers::get_tracker))
        .route(
            "/courses/{course_id}/milestones/{index}/check",
            post(handlers::check_milestone),
        )
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/dashboard/events", get(handlers::stream_dashboard_events))
        .route("/certificates/decode", post(handlers::decode_certificate))
        .route("/countdown", get(handlers::stream_countdown));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .fallback(handlers::not_found)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
