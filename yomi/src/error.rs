use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum YomiError {
    #[error("{0}")]
    MissingInput(String),

    #[error("Unsupported language code: {code}. Supported languages: {supported}")]
    UnsupportedLanguage { code: String, supported: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("OCR error: {0}")]
    Recognition(String),

    #[error("OCR unavailable: {0}")]
    EngineUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for YomiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            YomiError::MissingInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            YomiError::UnsupportedLanguage { .. } => (StatusCode::BAD_REQUEST, self.to_string()),
            YomiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            YomiError::Decode(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            YomiError::Recognition(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            YomiError::EngineUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            YomiError::Io(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            YomiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, YomiError>;
