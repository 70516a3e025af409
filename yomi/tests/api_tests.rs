//! Router-level tests exercising the full request path with a stub
//! recognizer: multipart parsing, validation, pipeline orchestration,
//! artifact cleanup and response shapes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use image::{DynamicImage, ImageFormat};
use tower::util::ServiceExt;

use yomi::api::{create_router, AppState};
use yomi::artifacts::ArtifactStore;
use yomi::config::Config;
use yomi::error::{Result, YomiError};
use yomi::language::LanguageCode;
use yomi::ocr::{RecognizeOptions, TextRecognizer};
use yomi::pipeline::Pipeline;

const BOUNDARY: &str = "yomi-test-boundary";

struct StubRecognizer {
    fail: bool,
}

#[async_trait]
impl TextRecognizer for StubRecognizer {
    async fn recognize(
        &self,
        image: &[u8],
        language: LanguageCode,
        options: &RecognizeOptions,
    ) -> Result<String> {
        if self.fail {
            return Err(YomiError::Recognition("stub engine failure".to_string()));
        }
        Ok(match options.page_seg_mode {
            Some(mode) => format!("alt[psm={mode}] {language}"),
            None => format!("primary {language} {} bytes", image.len()),
        })
    }
}

struct TestApp {
    app: Router,
    upload_dir: PathBuf,
    // Held so the temp dir lives for the duration of the test.
    _dir: tempfile::TempDir,
}

fn test_app(fail: bool) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let upload_dir = dir.path().to_path_buf();

    let mut config = Config::default();
    config.storage.upload_dir = upload_dir.clone();

    let store = ArtifactStore::new(upload_dir.clone()).unwrap();
    let pipeline = Pipeline::new(store, Arc::new(StubRecognizer { fail }));
    let app = create_router(AppState::new(config, pipeline));

    TestApp {
        app,
        upload_dir,
        _dir: dir,
    }
}

enum Part<'a> {
    File {
        name: &'a str,
        filename: &'a str,
        bytes: &'a [u8],
    },
    Text {
        name: &'a str,
        value: &'a str,
    },
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::File {
                name,
                filename,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn post_multipart(app: &Router, uri: &str, parts: &[Part<'_>]) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

fn sample_png() -> Vec<u8> {
    let mut out = Vec::new();
    DynamicImage::new_luma8(32, 32)
        .write_to(&mut std::io::Cursor::new(&mut out), ImageFormat::Png)
        .unwrap();
    out
}

fn dir_is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}

#[tokio::test]
async fn english_single_request_extracts_text_without_alternate() {
    let test = test_app(false);
    let png = sample_png();

    let (status, json) = post_multipart(
        &test.app,
        "/api/image-to-text",
        &[
            Part::File {
                name: "image",
                filename: "scan.png",
                bytes: &png,
            },
            Part::Text {
                name: "language",
                value: "eng",
            },
            Part::Text {
                name: "preprocess",
                value: "true",
            },
        ],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(!json["extracted_text"].as_str().unwrap().is_empty());
    assert_eq!(json["language"], "eng");
    assert_eq!(json["language_name"], "English");
    assert!(json.get("alternative_text").is_none());
    assert!(dir_is_empty(&test.upload_dir));
}

#[tokio::test]
async fn language_defaults_to_english_when_omitted() {
    let test = test_app(false);
    let png = sample_png();

    let (status, json) = post_multipart(
        &test.app,
        "/api/image-to-text",
        &[Part::File {
            name: "image",
            filename: "scan.png",
            bytes: &png,
        }],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["language"], "eng");
}

#[tokio::test]
async fn chinese_request_returns_alternative_text() {
    let test = test_app(false);
    let png = sample_png();

    let (status, json) = post_multipart(
        &test.app,
        "/api/image-to-text",
        &[
            Part::File {
                name: "image",
                filename: "scan.png",
                bytes: &png,
            },
            Part::Text {
                name: "language",
                value: "chi_sim",
            },
        ],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(!json["extracted_text"].as_str().unwrap().is_empty());
    assert_eq!(json["alternative_text"], "alt[psm=6] chi_sim");
    assert_eq!(json["language_name"], "Chinese Simplified");
    assert!(dir_is_empty(&test.upload_dir));
}

#[tokio::test]
async fn unknown_language_is_rejected_with_full_code_list() {
    let test = test_app(false);
    let png = sample_png();

    let (status, json) = post_multipart(
        &test.app,
        "/api/image-to-text",
        &[
            Part::File {
                name: "image",
                filename: "scan.png",
                bytes: &png,
            },
            Part::Text {
                name: "language",
                value: "xx",
            },
        ],
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("xx"));
    for lang in LanguageCode::ALL {
        assert!(message.contains(lang.as_str()), "missing {}", lang.as_str());
    }
}

#[tokio::test]
async fn missing_image_field_is_a_400() {
    let test = test_app(false);

    let (status, json) = post_multipart(
        &test.app,
        "/api/image-to-text",
        &[Part::Text {
            name: "language",
            value: "eng",
        }],
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No image file provided");
}

#[tokio::test]
async fn invalid_preprocess_flag_is_a_400() {
    let test = test_app(false);
    let png = sample_png();

    let (status, json) = post_multipart(
        &test.app,
        "/api/image-to-text",
        &[
            Part::File {
                name: "image",
                filename: "scan.png",
                bytes: &png,
            },
            Part::Text {
                name: "preprocess",
                value: "banana",
            },
        ],
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("preprocess"));
}

#[tokio::test]
async fn preprocess_opt_out_sends_original_bytes_to_the_engine() {
    let test = test_app(false);
    let png = sample_png();

    let (status, json) = post_multipart(
        &test.app,
        "/api/image-to-text",
        &[
            Part::File {
                name: "image",
                filename: "scan.png",
                bytes: &png,
            },
            Part::Text {
                name: "preprocess",
                value: "false",
            },
        ],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["extracted_text"],
        format!("primary eng {} bytes", png.len())
    );
    assert!(dir_is_empty(&test.upload_dir));
}

#[tokio::test]
async fn recognition_failure_surfaces_as_500_and_cleans_up() {
    let test = test_app(true);
    let png = sample_png();

    let (status, json) = post_multipart(
        &test.app,
        "/api/image-to-text",
        &[Part::File {
            name: "image",
            filename: "scan.png",
            bytes: &png,
        }],
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].as_str().unwrap().contains("stub engine failure"));
    assert!(dir_is_empty(&test.upload_dir));
}

#[tokio::test]
async fn corrupt_image_surfaces_as_500_decode_error() {
    let test = test_app(false);

    let (status, json) = post_multipart(
        &test.app,
        "/api/image-to-text",
        &[Part::File {
            name: "image",
            filename: "junk.bin",
            bytes: b"not an image at all",
        }],
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].as_str().unwrap().contains("decode"));
    assert!(dir_is_empty(&test.upload_dir));
}

#[tokio::test]
async fn batch_returns_ordered_outcomes_with_isolated_failure() {
    let test = test_app(false);
    let png = sample_png();

    let (status, json) = post_multipart(
        &test.app,
        "/api/batch-process",
        &[
            Part::File {
                name: "images",
                filename: "first.png",
                bytes: &png,
            },
            Part::File {
                name: "images",
                filename: "broken.bin",
                bytes: b"corrupt",
            },
            Part::File {
                name: "images",
                filename: "third.png",
                bytes: &png,
            },
            Part::Text {
                name: "language",
                value: "jpn",
            },
        ],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["language"], "jpn");
    assert_eq!(json["language_name"], "Japanese");

    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);

    assert_eq!(results[0]["filename"], "first.png");
    assert!(results[0].get("extracted_text").is_some());
    assert!(results[0].get("error").is_none());

    assert_eq!(results[1]["filename"], "broken.bin");
    assert!(results[1].get("error").is_some());
    assert!(results[1].get("extracted_text").is_none());

    assert_eq!(results[2]["filename"], "third.png");
    assert!(results[2].get("extracted_text").is_some());

    assert!(dir_is_empty(&test.upload_dir));
}

#[tokio::test]
async fn batch_without_images_is_a_400() {
    let test = test_app(false);

    let (status, json) = post_multipart(
        &test.app,
        "/api/batch-process",
        &[Part::Text {
            name: "language",
            value: "eng",
        }],
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No images provided");
}

#[tokio::test]
async fn batch_rejects_unknown_language_before_processing() {
    let test = test_app(false);
    let png = sample_png();

    let (status, json) = post_multipart(
        &test.app,
        "/api/batch-process",
        &[
            Part::File {
                name: "images",
                filename: "a.png",
                bytes: &png,
            },
            Part::Text {
                name: "language",
                value: "elvish",
            },
        ],
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("elvish"));
    assert!(dir_is_empty(&test.upload_dir));
}

#[tokio::test]
async fn supported_languages_lists_the_full_registry() {
    let test = test_app(false);

    let (status, json) = get_json(&test.app, "/api/supported-languages").await;

    assert_eq!(status, StatusCode::OK);
    let map = json.as_object().unwrap();
    assert_eq!(map.len(), 13);
    assert_eq!(map["eng"], "English");
    assert_eq!(map["chi_tra"], "Chinese Traditional");
    assert_eq!(map["vie"], "Vietnamese");
}

#[tokio::test]
async fn health_reports_service_and_engine_status() {
    let test = test_app(false);

    let (status, json) = get_json(&test.app, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["ocr"]["status"], "available");
    assert!(!json["version"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn openapi_document_is_served() {
    let test = test_app(false);

    let (status, json) = get_json(&test.app, "/api/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["paths"].get("/api/image-to-text").is_some());
    assert!(json["paths"].get("/api/batch-process").is_some());
}
