use axum::Json;
use utoipa::OpenApi;

use super::dto;
use super::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Yomi",
        description = "OCR text-extraction service with language-aware image preprocessing",
    ),
    paths(
        handlers::image_to_text,
        handlers::batch_process,
        handlers::supported_languages,
        handlers::health_check,
    ),
    components(schemas(
        dto::ImageToTextResponse,
        dto::BatchResponse,
        dto::BatchEntry,
        dto::ErrorResponse,
        dto::HealthData,
        dto::OcrStatus,
        crate::language::LanguageCode,
    )),
    tags(
        (name = "recognition", description = "Image to text extraction"),
        (name = "languages", description = "Supported language registry"),
        (name = "health", description = "Service status"),
    )
)]
pub struct ApiDoc;

/// `GET /api/openapi.json`
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
