use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};

use crate::{
    handlers::{albums, tracks},
    infra::app_state::AppState,
};

/// Track and album routes. Paths keep their trailing slashes.
pub fn create_api_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/upload/", post(tracks::upload_track))
        .route("/download/{id}", get(tracks::download_track))
        .route("/music_names/", get(tracks::list_tracks))
        .route(
            "/music/{id}",
            get(tracks::get_track)
                .put(tracks::update_track)
                .delete(tracks::delete_track),
        )
        .route("/music/", delete(tracks::delete_all_tracks))
        .route("/playlist/{count}", get(tracks::create_playlist))
        .route(
            "/albums/",
            post(albums::create_album)
                .get(albums::list_albums)
                .delete(albums::delete_all_albums),
        )
        .route(
            "/albums/{id}",
            get(albums::get_album)
                .put(albums::update_album)
                .delete(albums::delete_album),
        )
        .layer(DefaultBodyLimit::max(state.config().storage.max_upload_bytes))
}
