//! # Tunebox Server
//!
//! HTTP surface for the Tunebox audio catalog: uploads, downloads, track
//! and album management, and random playlists.

pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub fn create_app(state: AppState) -> Router {
    let api = routes::create_api_router(&state);

    // Permissive in dev, allow-list otherwise
    let cors_layer = if state.config().dev_mode {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config()
            .cors
            .allowed_origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE])
    };

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}
