// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    extract::{Form, Path, Query},
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use tunedeck::config::Config;
use tunedeck::routes::create_router;
use tunedeck::AppState;

/// Authorization code the fake accounts service accepts.
#[allow(dead_code)]
pub const GOOD_CODE: &str = "good-code";
/// Access token the fake Web API accepts.
#[allow(dead_code)]
pub const GOOD_TOKEN: &str = "test-access-token";

/// Router plus state, with data and music directories in a temp dir.
pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    _dir: TempDir,
}

#[allow(dead_code)]
impl TestApp {
    /// Send one request through a clone of the router.
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn send_json(&self, method: &str, uri: &str, body: Value) -> Response {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

/// Create a test app with Spotify pointed at `spotify_base` (or at an
/// unreachable address when `None`).
#[allow(dead_code)]
pub fn create_test_app_with(
    spotify_base: Option<&str>,
    configure: impl FnOnce(&mut Config),
) -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");

    let mut config = Config::test_default();
    config.data_dir = dir.path().join("data");
    config.music_dir = dir.path().join("music");
    if let Some(base) = spotify_base {
        config.spotify_accounts_url = base.to_string();
        config.spotify_api_url = format!("{}/v1", base);
    }
    configure(&mut config);

    let state = Arc::new(AppState::new(config));
    TestApp {
        router: create_router(state.clone()),
        state,
        _dir: dir,
    }
}

#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    create_test_app_with(None, |_| {})
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

/// Build a multipart/form-data body with one file part.
#[allow(dead_code)]
pub fn multipart_request(field: &str, filename: &str, contents: &[u8]) -> Request<Body> {
    let disposition = format!(
        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
         Content-Type: application/octet-stream\r\n",
        field, filename
    );
    multipart_upload(&disposition, contents)
}

/// Build a multipart/form-data body with one plain (non-file) form value.
#[allow(dead_code)]
pub fn multipart_value_request(field: &str, value: &str) -> Request<Body> {
    let disposition = format!("Content-Disposition: form-data; name=\"{}\"\r\n", field);
    multipart_upload(&disposition, value.as_bytes())
}

#[allow(dead_code)]
fn multipart_upload(part_headers: &str, contents: &[u8]) -> Request<Body> {
    let boundary = "tunedeck-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(part_headers.as_bytes());
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

// ─── Fake Spotify ────────────────────────────────────────────

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(format!("Bearer {}", GOOD_TOKEN).as_str())
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": {"status": 401, "message": "The access token expired"}})),
    )
        .into_response()
}

async fn token(Form(form): Form<HashMap<String, String>>) -> Response {
    let valid = form.get("grant_type").map(String::as_str) == Some("authorization_code")
        && form.get("code").map(String::as_str) == Some(GOOD_CODE)
        && form.get("client_id").map(String::as_str) == Some("test_client_id")
        && form.get("client_secret").map(String::as_str) == Some("test_secret");

    if !valid {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid_grant", "error_description": "Invalid authorization code"})),
        )
            .into_response();
    }

    Json(json!({
        "access_token": GOOD_TOKEN,
        "token_type": "Bearer",
        "refresh_token": "test-refresh-token",
        "expires_in": 3600
    }))
    .into_response()
}

fn track(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "artists": [{"name": "Artist A"}, {"name": "Artist B"}],
        "album": {"name": "Album", "images": [{"url": "https://img/cover.jpg"}]},
        "duration_ms": 183_500,
        "preview_url": "https://preview/1.mp3",
        "uri": format!("spotify:track:{}", id)
    })
}

async fn my_playlists(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "items": [
            {
                "id": "pl1",
                "name": "Morning",
                "description": "Wake up",
                "images": [{"url": "https://img/pl1.jpg"}],
                "tracks": {"total": 2},
                "owner": {"display_name": "Sam"}
            },
            {
                "id": "pl2",
                "name": "Empty",
                "description": null,
                "images": [],
                "tracks": {"total": 0},
                "owner": {"display_name": null}
            }
        ]
    }))
    .into_response()
}

async fn playlist(headers: HeaderMap, Path(id): Path<String>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if id != "pl1" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": {"status": 404, "message": "Invalid playlist Id"}})),
        )
            .into_response();
    }
    Json(json!({
        "id": "pl1",
        "name": "Morning",
        "description": "Wake up",
        "images": [{"url": "https://img/pl1.jpg"}]
    }))
    .into_response()
}

async fn playlist_tracks(headers: HeaderMap, Path(_id): Path<String>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "items": [
            {"track": track("t1", "First")},
            {"track": null},
            {"track": track("t2", "Second")}
        ]
    }))
    .into_response()
}

async fn search(headers: HeaderMap, Query(params): Query<HashMap<String, String>>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    assert_eq!(params.get("type").map(String::as_str), Some("track"));
    assert_eq!(params.get("limit").map(String::as_str), Some("20"));
    let q = params.get("q").cloned().unwrap_or_default();
    Json(json!({
        "tracks": {"items": [track("s1", &format!("Result for {}", q))]}
    }))
    .into_response()
}

/// Start a fake Spotify (accounts + Web API) on an ephemeral port.
/// Returns its base URL.
#[allow(dead_code)]
pub async fn spawn_fake_spotify() -> String {
    let app = Router::new()
        .route("/api/token", post(token))
        .route("/v1/me/playlists", get(my_playlists))
        .route("/v1/playlists/{id}", get(playlist))
        .route("/v1/playlists/{id}/tracks", get(playlist_tracks))
        .route("/v1/search", get(search));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Pull the `state` query parameter out of an authorize URL.
#[allow(dead_code)]
pub fn state_param(auth_url: &str) -> String {
    let query = auth_url.split_once('?').map(|(_, q)| q).unwrap_or("");
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("state="))
        .map(|s| urlencoding::decode(s).unwrap().into_owned())
        .expect("state parameter")
}
