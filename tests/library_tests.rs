// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Upload, file serving and local search tests.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};

mod common;

use common::{
    body_bytes, body_json, create_test_app, create_test_app_with, multipart_request,
    multipart_value_request,
};

#[tokio::test]
async fn test_upload_then_download_identical_bytes() {
    let app = create_test_app();
    let contents: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();

    let response = app
        .send(multipart_request("file", "song.mp3", &contents))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["filename"], "song.mp3");
    assert_eq!(body["url"], "/api/music/song.mp3");

    let response = app.get("/api/music/song.mp3").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, contents);
}

#[tokio::test]
async fn test_upload_overwrites_same_name() {
    let app = create_test_app();

    app.send(multipart_request("file", "dup.wav", b"first"))
        .await;
    app.send(multipart_request("file", "dup.wav", b"second"))
        .await;

    let response = app.get("/api/music/dup.wav").await;
    assert_eq!(body_bytes(response).await, b"second");
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let app = create_test_app();

    let response = app
        .send(multipart_request("attachment", "song.mp3", b"data"))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "No file provided");
}

#[tokio::test]
async fn test_upload_field_without_filename_is_not_a_file() {
    let app = create_test_app();

    let response = app.send(multipart_value_request("file", "song.mp3")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "No file provided");
}

#[tokio::test]
async fn test_upload_over_limit_is_payload_too_large() {
    let app = create_test_app_with(None, |config| config.max_upload_bytes = 64);
    let contents = vec![7u8; 4096];

    let response = app
        .send(multipart_request("file", "big.mp3", &contents))
        .await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body_json(response).await["error"], "File too large");

    assert!(!app.state.config.music_dir.join("big.mp3").exists());
}

#[tokio::test]
async fn test_upload_with_empty_filename() {
    let app = create_test_app();

    let response = app.send(multipart_request("file", "", b"data")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "No file selected");
}

#[tokio::test]
async fn test_upload_rejects_path_traversal() {
    let app = create_test_app();

    let response = app
        .send(multipart_request("file", "../outside.mp3", b"data"))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!app
        .state
        .config
        .music_dir
        .parent()
        .unwrap()
        .join("outside.mp3")
        .exists());
}

#[tokio::test]
async fn test_upload_requires_multipart() {
    let app = create_test_app();

    let response = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/api/upload")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await;
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_missing_music_file_is_not_found() {
    let app = create_test_app();

    let response = app.get("/api/music/nothing.mp3").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_local_search_is_case_insensitive_substring() {
    let app = create_test_app();
    for name in ["ABCtrack.mp3", "xabcy.wav", "xyz.mp3"] {
        let response = app.send(multipart_request("file", name, b"x")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let body = body_json(app.get("/api/search?q=abc").await).await;
    let names: Vec<&str> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["filename"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["ABCtrack.mp3", "xabcy.wav"]);
    assert_eq!(body["results"][0]["url"], "/api/music/ABCtrack.mp3");
}

#[tokio::test]
async fn test_local_search_empty_query_lists_everything() {
    let app = create_test_app();
    for name in ["b.mp3", "a.mp3"] {
        app.send(multipart_request("file", name, b"x")).await;
    }

    let body = body_json(app.get("/api/search").await).await;
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
    assert_eq!(body["results"][0]["filename"], "a.mp3");
}

#[tokio::test]
async fn test_local_search_without_music_dir() {
    let app = create_test_app();

    let response = app.get("/api/search?q=anything").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["results"]
        .as_array()
        .unwrap()
        .is_empty());
}
