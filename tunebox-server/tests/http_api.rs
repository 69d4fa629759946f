use anyhow::Result;
use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use serde_json::{Value, json};

mod support;
use support::{TestApp, build_test_app, build_test_app_with_limit};

const MP3_BYTES: &[u8] = b"ID3\x04\x00\x00fake mpeg frames";

fn mp3_part(file_name: &str, bytes: &[u8]) -> Part {
    Part::bytes(bytes.to_vec())
        .file_name(file_name)
        .mime_type("audio/mpeg")
}

async fn upload(app: &TestApp, name: &str, album_id: Option<i64>) -> Value {
    let mut request = app
        .server
        .post("/upload/")
        .add_query_param("name", name)
        .add_query_param("author", "Artist X")
        .add_query_param("size", 4.2);
    if let Some(album_id) = album_id {
        request = request.add_query_param("album_id", album_id);
    }

    let response = request
        .multipart(MultipartForm::new().add_part("file", mp3_part("song.mp3", MP3_BYTES)))
        .await;
    response.assert_status_ok();
    response.json()
}

async fn create_album(app: &TestApp, name: &str) -> Value {
    let response = app
        .server
        .post("/albums/")
        .json(&json!({ "name": name, "artist": "Artist X" }))
        .await;
    response.assert_status_ok();
    response.json()
}

#[tokio::test]
async fn album_cascade_scenario() -> Result<()> {
    let app = build_test_app()?;

    let album = create_album(&app, "Greatest Hits").await;
    assert_eq!(album, json!({ "id": 1, "name": "Greatest Hits", "artist": "Artist X" }));

    let track = upload(&app, "Song A", Some(1)).await;
    assert_eq!(track["id"], 1);
    assert_eq!(track["size"], 4.2);
    assert_eq!(track["album_id"], 1);

    let view: Value = app.server.get("/albums/1").await.json();
    assert_eq!(
        view["tracks"],
        json!([{ "id": 1, "name": "Song A", "author": "Artist X", "size": "4.2 MB" }])
    );

    let deleted = app.server.delete("/albums/1").await;
    deleted.assert_status_ok();
    assert!(deleted.json::<Value>()["message"].is_string());

    app.server.get("/music/1").await.assert_status(StatusCode::NOT_FOUND);
    app.server.get("/albums/1").await.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(app.stored_files(), 0);
    Ok(())
}

#[tokio::test]
async fn download_returns_the_uploaded_bytes() -> Result<()> {
    let app = build_test_app()?;
    upload(&app, "Song A", None).await;

    let response = app.server.get("/download/1").await;
    response.assert_status_ok();
    assert_eq!(response.as_bytes().as_ref(), MP3_BYTES);
    assert_eq!(response.header("content-type"), "audio/mpeg");
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=\"Song A.mp3\""
    );

    app.server.get("/download/2").await.assert_status(StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn form_fields_are_accepted_instead_of_query_parameters() -> Result<()> {
    let app = build_test_app()?;

    let form = MultipartForm::new()
        .add_text("name", "Song B")
        .add_text("author", "Artist Y")
        .add_text("size", "5")
        .add_part("file", Part::bytes(b"fLaC".to_vec()).file_name("b.flac"));
    let response = app.server.post("/upload/").multipart(form).await;
    response.assert_status_ok();

    let view: Value = app.server.get("/music/1").await.json();
    assert_eq!(
        view,
        json!({ "id": 1, "name": "Song B", "author": "Artist Y", "size": "5.0 MB" })
    );

    let download = app.server.get("/download/1").await;
    assert_eq!(download.header("content-type"), "audio/flac");
    Ok(())
}

#[tokio::test]
async fn upload_rejects_non_audio_files() -> Result<()> {
    let app = build_test_app()?;

    let response = app
        .server
        .post("/upload/")
        .add_query_param("name", "Notes")
        .add_query_param("author", "Artist X")
        .add_query_param("size", 1.0)
        .multipart(MultipartForm::new().add_part(
            "file",
            Part::bytes(b"plain text".to_vec()).file_name("notes.txt"),
        ))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["status"], 400);
    assert_eq!(app.stored_files(), 0);

    let tracks: Value = app.server.get("/music_names/").await.json();
    assert_eq!(tracks, json!([]));
    Ok(())
}

#[tokio::test]
async fn upload_validates_metadata() -> Result<()> {
    let app = build_test_app()?;

    let response = app
        .server
        .post("/upload/")
        .add_query_param("name", "x".repeat(31))
        .add_query_param("author", "Artist X")
        .add_query_param("size", 4.2)
        .multipart(MultipartForm::new().add_part("file", mp3_part("a.mp3", MP3_BYTES)))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let missing_file = app
        .server
        .post("/upload/")
        .multipart(MultipartForm::new().add_text("name", "Song A"))
        .await;
    missing_file.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(app.stored_files(), 0);
    Ok(())
}

#[tokio::test]
async fn upload_to_unknown_album_is_not_found() -> Result<()> {
    let app = build_test_app()?;

    let response = app
        .server
        .post("/upload/")
        .add_query_param("name", "Song A")
        .add_query_param("author", "Artist X")
        .add_query_param("size", 4.2)
        .add_query_param("album_id", 5)
        .multipart(MultipartForm::new().add_part("file", mp3_part("a.mp3", MP3_BYTES)))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(app.stored_files(), 0);
    Ok(())
}

#[tokio::test]
async fn oversized_upload_is_rejected() -> Result<()> {
    let app = build_test_app_with_limit(64)?;

    let response = app
        .server
        .post("/upload/")
        .add_query_param("name", "Song A")
        .add_query_param("author", "Artist X")
        .add_query_param("size", 4.2)
        .multipart(MultipartForm::new().add_part("file", mp3_part("a.mp3", &[0u8; 4096])))
        .await;

    assert!(response.status_code().is_client_error());
    assert_eq!(app.stored_files(), 0);
    Ok(())
}

#[tokio::test]
async fn playlist_respects_catalog_size() -> Result<()> {
    let app = build_test_app()?;
    for name in ["A", "B", "C"] {
        upload(&app, name, None).await;
    }

    let playlist: Vec<Value> = app.server.get("/playlist/2").await.json();
    assert_eq!(playlist.len(), 2);
    assert_ne!(playlist[0]["id"], playlist[1]["id"]);

    let everything: Vec<Value> = app.server.get("/playlist/3").await.json();
    assert_eq!(everything.len(), 3);

    let empty: Vec<Value> = app.server.get("/playlist/0").await.json();
    assert!(empty.is_empty());

    app.server.get("/playlist/4").await.assert_status(StatusCode::BAD_REQUEST);
    assert!(app.server.get("/playlist/-1").await.status_code().is_client_error());
    Ok(())
}

#[tokio::test]
async fn bulk_track_delete_restarts_ids() -> Result<()> {
    let app = build_test_app()?;
    upload(&app, "A", None).await;
    upload(&app, "B", None).await;

    app.server.delete("/music/").await.assert_status_ok();
    assert_eq!(app.server.get("/music_names/").await.json::<Value>(), json!([]));
    assert_eq!(app.stored_files(), 0);

    let track = upload(&app, "C", None).await;
    assert_eq!(track["id"], 1);
    Ok(())
}

#[tokio::test]
async fn track_update_without_file_keeps_payload() -> Result<()> {
    let app = build_test_app()?;
    upload(&app, "Song A", None).await;
    create_album(&app, "Greatest Hits").await;

    let response = app
        .server
        .put("/music/1")
        .add_query_param("name", "Song B")
        .add_query_param("author", "Artist Y")
        .add_query_param("size", 2.5)
        .add_query_param("albumId", 1)
        .await;
    response.assert_status_ok();

    let view: Value = app.server.get("/music/1").await.json();
    assert_eq!(view["name"], "Song B");
    assert_eq!(view["size"], "2.5 MB");

    let album: Value = app.server.get("/albums/1").await.json();
    assert_eq!(album["tracks"][0]["id"], 1);

    let download = app.server.get("/download/1").await;
    assert_eq!(download.as_bytes().as_ref(), MP3_BYTES);
    assert_eq!(app.stored_files(), 1);
    Ok(())
}

#[tokio::test]
async fn track_update_with_file_replaces_payload() -> Result<()> {
    let app = build_test_app()?;
    upload(&app, "Song A", None).await;

    let form = MultipartForm::new()
        .add_text("name", "Song A")
        .add_text("author", "Artist X")
        .add_text("size", "3.1")
        .add_part("file", mp3_part("new.mp3", b"new payload"));
    app.server.put("/music/1").multipart(form).await.assert_status_ok();

    let download = app.server.get("/download/1").await;
    assert_eq!(download.as_bytes().as_ref(), b"new payload");
    assert_eq!(app.stored_files(), 1);

    app.server
        .put("/music/9")
        .add_query_param("name", "X")
        .add_query_param("author", "Y")
        .add_query_param("size", 1.0)
        .await
        .assert_status(StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn track_delete_removes_row_and_payload() -> Result<()> {
    let app = build_test_app()?;
    upload(&app, "Song A", None).await;

    app.server.delete("/music/1").await.assert_status_ok();
    app.server.get("/music/1").await.assert_status(StatusCode::NOT_FOUND);
    app.server.delete("/music/1").await.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(app.stored_files(), 0);
    Ok(())
}

#[tokio::test]
async fn album_update_accepts_query_or_json() -> Result<()> {
    let app = build_test_app()?;
    create_album(&app, "Greatest Hits").await;

    app.server
        .put("/albums/1")
        .add_query_param("name", "B-Sides")
        .add_query_param("artist", "Artist Y")
        .await
        .assert_status_ok();
    let album: Value = app.server.get("/albums/1").await.json();
    assert_eq!(album["name"], "B-Sides");
    assert_eq!(album["artist"], "Artist Y");

    app.server
        .put("/albums/1")
        .json(&json!({ "name": "Live", "artist": "Artist Z" }))
        .await
        .assert_status_ok();
    let album: Value = app.server.get("/albums/1").await.json();
    assert_eq!(album["name"], "Live");

    app.server
        .put("/albums/1")
        .add_query_param("name", "")
        .add_query_param("artist", "Artist Z")
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    app.server
        .put("/albums/7")
        .add_query_param("name", "Live")
        .add_query_param("artist", "Artist Z")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn bulk_album_delete_keeps_loose_tracks() -> Result<()> {
    let app = build_test_app()?;
    create_album(&app, "One").await;
    create_album(&app, "Two").await;
    upload(&app, "In One", Some(1)).await;
    upload(&app, "Loose", None).await;

    app.server.delete("/albums/").await.assert_status_ok();
    assert_eq!(app.server.get("/albums/").await.json::<Value>(), json!([]));

    let remaining: Vec<Value> = app.server.get("/music_names/").await.json();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["name"], "Loose");
    assert_eq!(app.stored_files(), 1);

    let album = create_album(&app, "Fresh").await;
    assert_eq!(album["id"], 1);
    Ok(())
}

#[tokio::test]
async fn health_reports_store_status() -> Result<()> {
    let app = build_test_app()?;

    let response = app.server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], true);
    Ok(())
}
