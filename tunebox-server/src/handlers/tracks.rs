use axum::{
    Json,
    extract::{FromRequest, Multipart, Path, Query, Request, State},
    http::{HeaderMap, HeaderValue, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;
use tunebox_core::domain::{
    AlbumId, AudioFormat, AudioPayload, TrackCreated, TrackId, TrackMetadata,
    TrackView,
};

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

/// Track fields passed as query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct TrackQuery {
    pub name: Option<String>,
    pub author: Option<String>,
    pub size: Option<f64>,
    #[serde(alias = "albumId")]
    pub album_id: Option<i32>,
}

/// Everything collected from a multipart track form.
#[derive(Debug, Default)]
struct TrackForm {
    name: Option<String>,
    author: Option<String>,
    size: Option<f64>,
    album_id: Option<i32>,
    file: Option<UploadedFile>,
}

#[derive(Debug)]
struct UploadedFile {
    file_name: Option<String>,
    bytes: Vec<u8>,
}

impl TrackForm {
    async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(field_name) = field.name().map(str::to_owned) else {
                continue;
            };

            match field_name.as_str() {
                "file" => {
                    let file_name = field.file_name().map(str::to_owned);
                    let bytes = field.bytes().await?.to_vec();
                    form.file = Some(UploadedFile { file_name, bytes });
                }
                "name" => form.name = Some(field.text().await?),
                "author" => form.author = Some(field.text().await?),
                "size" => {
                    let raw = field.text().await?;
                    form.size = Some(raw.trim().parse().map_err(|_| {
                        AppError::bad_request(format!(
                            "size must be a number, got '{raw}'"
                        ))
                    })?);
                }
                "album_id" | "albumId" => {
                    let raw = field.text().await?;
                    let trimmed = raw.trim();
                    if !trimmed.is_empty() {
                        form.album_id = Some(trimmed.parse().map_err(|_| {
                            AppError::bad_request(format!(
                                "album_id must be an integer, got '{raw}'"
                            ))
                        })?);
                    }
                }
                other => debug!(field = other, "ignoring unknown form field"),
            }
        }

        Ok(form)
    }

    /// Form fields take precedence over query parameters. Missing values
    /// fall through to validation.
    fn metadata(&self, query: &TrackQuery) -> TrackMetadata {
        TrackMetadata::new(
            self.name.clone().or_else(|| query.name.clone()).unwrap_or_default(),
            self.author
                .clone()
                .or_else(|| query.author.clone())
                .unwrap_or_default(),
            self.size.or(query.size).unwrap_or(0.0),
        )
    }

    fn album_id(&self, query: &TrackQuery) -> Option<AlbumId> {
        self.album_id.or(query.album_id).map(AlbumId)
    }

    fn take_payload(&mut self) -> AppResult<Option<AudioPayload>> {
        let Some(file) = self.file.take() else {
            return Ok(None);
        };
        let file_name = file
            .file_name
            .ok_or_else(|| AppError::bad_request("file part has no file name"))?;
        let format = AudioFormat::from_file_name(&file_name)?;
        Ok(Some(AudioPayload::new(format, file.bytes)))
    }
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"))
}

/// `attachment; filename="..."` with characters that cannot appear in a
/// quoted header parameter replaced.
fn content_disposition(name: &str, format: AudioFormat) -> AppResult<HeaderValue> {
    let safe: String = name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();
    HeaderValue::from_str(&format!(
        "attachment; filename=\"{safe}.{}\"",
        format.extension()
    ))
    .map_err(|err| AppError::internal(err.to_string()))
}

/// POST /upload/ - Store a new track from a multipart form.
pub async fn upload_track(
    State(state): State<AppState>,
    Query(query): Query<TrackQuery>,
    multipart: Multipart,
) -> AppResult<Json<TrackCreated>> {
    let mut form = TrackForm::read(multipart).await?;
    let payload = form
        .take_payload()?
        .ok_or_else(|| AppError::bad_request("missing 'file' part"))?;

    let track = state
        .tracks
        .create_track(form.metadata(&query), payload, form.album_id(&query))
        .await?;

    Ok(Json(track.created()))
}

/// GET /download/{id} - Raw audio bytes as an attachment.
pub async fn download_track(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    let payload = state.tracks.read_payload(TrackId(id)).await?;
    let disposition = content_disposition(&payload.track.name, payload.format)?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static(payload.format.content_type()),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        payload.bytes,
    )
        .into_response())
}

/// GET /music_names/
pub async fn list_tracks(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<TrackView>>> {
    Ok(Json(state.tracks.list_tracks().await?))
}

/// GET /music/{id}
pub async fn get_track(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<TrackView>> {
    let track = state.tracks.get_track(TrackId(id)).await?;
    Ok(Json(track.view()))
}

/// GET /playlist/{count} - Distinct tracks drawn at random.
pub async fn create_playlist(
    State(state): State<AppState>,
    Path(count): Path<usize>,
) -> AppResult<Json<Vec<TrackView>>> {
    Ok(Json(state.tracks.create_playlist(count).await?))
}

/// PUT /music/{id} - Full replace; a `file` part is optional.
pub async fn update_track(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<TrackQuery>,
    request: Request,
) -> AppResult<Json<Value>> {
    let mut form = if is_multipart(request.headers()) {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|rejection| {
                AppError::new(rejection.status(), rejection.body_text())
            })?;
        TrackForm::read(multipart).await?
    } else {
        TrackForm::default()
    };

    let payload = form.take_payload()?;
    state
        .tracks
        .update_track(
            TrackId(id),
            form.metadata(&query),
            payload,
            form.album_id(&query),
        )
        .await?;

    Ok(Json(json!({ "message": "Track updated" })))
}

/// DELETE /music/{id}
pub async fn delete_track(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Value>> {
    state.tracks.delete_track(TrackId(id)).await?;
    Ok(Json(json!({ "message": "Track deleted" })))
}

/// DELETE /music/ - Remove every track and restart track ids at 1.
pub async fn delete_all_tracks(
    State(state): State<AppState>,
) -> AppResult<Json<Value>> {
    state.tracks.delete_all_tracks().await?;
    Ok(Json(json!({ "message": "All tracks deleted" })))
}
