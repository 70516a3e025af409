use std::collections::BTreeMap;

use axum::extract::{Multipart, State};
use axum::Json;

use crate::error::{Result, YomiError};
use crate::language::LanguageCode;
use crate::pipeline::UploadedImage;

use super::dto::{BatchResponse, HealthData, ImageToTextResponse, OcrStatus};
use super::state::AppState;

/// `POST /api/image-to-text`
///
/// Multipart form: `image` (file, required), `language` (code, default
/// `eng`), `preprocess` (bool, default true), `config` (raw engine
/// configuration, default empty).
#[utoipa::path(
    post,
    path = "/api/image-to-text",
    tag = "recognition",
    request_body(content_type = "multipart/form-data", content = String, description = "Image file with optional language/preprocess/config fields"),
    responses(
        (status = 200, description = "Extracted text", body = ImageToTextResponse),
        (status = 400, description = "Missing image or unsupported language", body = super::dto::ErrorResponse),
        (status = 500, description = "Decode or recognition failure", body = super::dto::ErrorResponse),
    )
)]
pub async fn image_to_text(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImageToTextResponse>> {
    let mut image: Option<UploadedImage> = None;
    let mut language_raw: Option<String> = None;
    let mut preprocess = true;
    let mut engine_config = String::new();

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "image" => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    YomiError::Validation(format!("Failed to read image field: {e}"))
                })?;
                image = Some(UploadedImage {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            "language" => {
                language_raw = Some(read_text_field(field, "language").await?);
            }
            "preprocess" => {
                let raw = read_text_field(field, "preprocess").await?;
                preprocess = parse_form_bool(&raw).ok_or_else(|| {
                    YomiError::Validation(
                        "preprocess must be one of true/false/1/0/yes/no".to_string(),
                    )
                })?;
            }
            "config" => {
                engine_config = read_text_field(field, "config").await?;
            }
            _ => {}
        }
    }

    let image = image
        .ok_or_else(|| YomiError::MissingInput("No image file provided".to_string()))?;
    let language = resolve_language(language_raw.as_deref())?;

    let result = state
        .pipeline
        .process_single(image, language, preprocess, &engine_config)
        .await?;

    Ok(Json(result.into()))
}

/// `POST /api/batch-process`
///
/// Multipart form: repeated `images` files (at least one required) and a
/// single `language` code shared by every item. One item's failure is
/// recorded in its result entry and never aborts the rest.
#[utoipa::path(
    post,
    path = "/api/batch-process",
    tag = "recognition",
    request_body(content_type = "multipart/form-data", content = String, description = "Repeated images fields with a shared language"),
    responses(
        (status = 200, description = "Ordered per-item outcomes", body = BatchResponse),
        (status = 400, description = "No images or unsupported language", body = super::dto::ErrorResponse),
    )
)]
pub async fn batch_process(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<BatchResponse>> {
    let mut uploads: Vec<UploadedImage> = Vec::new();
    let mut language_raw: Option<String> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "images" => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    YomiError::Validation(format!("Failed to read images field: {e}"))
                })?;
                uploads.push(UploadedImage {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            "language" => {
                language_raw = Some(read_text_field(field, "language").await?);
            }
            _ => {}
        }
    }

    if uploads.is_empty() {
        return Err(YomiError::MissingInput("No images provided".to_string()));
    }
    let language = resolve_language(language_raw.as_deref())?;

    let outcomes = state.pipeline.process_batch(uploads, language).await?;

    Ok(Json(BatchResponse {
        results: outcomes.into_iter().map(Into::into).collect(),
        language,
        language_name: language.display_name().to_string(),
    }))
}

/// `GET /api/supported-languages`
///
/// The full code → display-name mapping.
#[utoipa::path(
    get,
    path = "/api/supported-languages",
    tag = "languages",
    responses(
        (status = 200, description = "Supported language codes", body = BTreeMap<String, String>),
    )
)]
pub async fn supported_languages() -> Json<BTreeMap<&'static str, &'static str>> {
    let languages = LanguageCode::ALL
        .iter()
        .map(|l| (l.as_str(), l.display_name()))
        .collect();
    Json(languages)
}

/// `GET /api/health`
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthData),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthData> {
    let ocr = if state.pipeline.recognizer().is_available() {
        OcrStatus {
            status: "available".to_string(),
        }
    } else {
        OcrStatus {
            status: "unavailable".to_string(),
        }
    };

    Json(HealthData {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ocr,
    })
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>, name: &str) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| YomiError::Validation(format!("Invalid {name} field: {e}")))
}

fn resolve_language(raw: Option<&str>) -> Result<LanguageCode> {
    match raw {
        None => Ok(LanguageCode::DEFAULT),
        Some(code) => code
            .parse()
            .map_err(|_| YomiError::UnsupportedLanguage {
                code: code.to_string(),
                supported: LanguageCode::supported_codes(),
            }),
    }
}

fn parse_form_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
