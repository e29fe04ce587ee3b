//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
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
    // Permissive CORS; the frontend is served from a different origin in development.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Settings
        .route(
            "/settings",
            get(handlers::get_settings).put(handlers::update_settings),
        )
        .route("/settings/reset", post(handlers::reset_settings))
        .route("/settings/slots", get(handlers::get_slots))
        // Generation
        .route("/ai/generate", post(handlers::generate))
        .route("/generations", get(handlers::list_generations))
        .route(
            "/generations/{request_id}",
            get(handlers::get_generation).delete(handlers::cancel_generation),
        )
        // Active schedule
        .route("/timetable", get(handlers::get_active_timetable))
        // Saved timetables
        .route("/timetables", get(handlers::list_timetables))
        .route("/timetables/save", post(handlers::save_timetable))
        .route(
            "/timetables/{id}",
            get(handlers::get_timetable).delete(handlers::delete_timetable),
        )
        .route("/timetables/{id}/entries", put(handlers::replace_entries))
        .route("/timetables/{id}/grid", get(handlers::get_timetable_grid))
        // Directory
        .route("/faculty", get(handlers::list_faculty))
        .route("/rooms", get(handlers::list_rooms));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
