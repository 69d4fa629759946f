use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tunebox_core::domain::{Album, AlbumDraft, AlbumId, AlbumView};

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

/// Album fields for a replace, accepted from the query string or a JSON body.
#[derive(Debug, Default, Deserialize)]
pub struct AlbumFields {
    pub name: Option<String>,
    pub artist: Option<String>,
}

impl AlbumFields {
    /// Body values win over query values.
    fn merge(self, query: AlbumFields) -> AlbumDraft {
        AlbumDraft::new(
            self.name.or(query.name).unwrap_or_default(),
            self.artist.or(query.artist).unwrap_or_default(),
        )
    }
}

/// POST /albums/
pub async fn create_album(
    State(state): State<AppState>,
    Json(draft): Json<AlbumDraft>,
) -> AppResult<Json<Album>> {
    Ok(Json(state.albums.create_album(draft).await?))
}

/// GET /albums/
pub async fn list_albums(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<AlbumView>>> {
    Ok(Json(state.albums.list_albums().await?))
}

/// GET /albums/{id}
pub async fn get_album(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AlbumView>> {
    Ok(Json(state.albums.get_album(AlbumId(id)).await?))
}

/// PUT /albums/{id}
pub async fn update_album(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<AlbumFields>,
    body: Bytes,
) -> AppResult<Json<Value>> {
    let fields = if body.iter().all(u8::is_ascii_whitespace) {
        AlbumFields::default()
    } else {
        serde_json::from_slice::<AlbumFields>(&body).map_err(|err| {
            AppError::bad_request(format!("invalid album body: {err}"))
        })?
    };

    state
        .albums
        .update_album(AlbumId(id), fields.merge(query))
        .await?;
    Ok(Json(json!({ "message": "Album updated" })))
}

/// DELETE /albums/{id} - Removes the album together with its tracks.
pub async fn delete_album(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Value>> {
    state.albums.delete_album(AlbumId(id)).await?;
    Ok(Json(json!({ "message": "Album deleted" })))
}

/// DELETE /albums/
pub async fn delete_all_albums(
    State(state): State<AppState>,
) -> AppResult<Json<Value>> {
    state.albums.delete_all_albums().await?;
    Ok(Json(json!({ "message": "All albums deleted" })))
}
