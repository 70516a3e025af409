use serde::Serialize;

use crate::language::LanguageCode;
use crate::pipeline::{BatchItemOutcome, RecognitionResult};

/// Response for `POST /api/image-to-text`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ImageToTextResponse {
    pub extracted_text: String,
    pub language: LanguageCode,
    pub language_name: String,
    /// Single-block segmentation output. Only present for East-Asian codes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_text: Option<String>,
}

impl From<RecognitionResult> for ImageToTextResponse {
    fn from(result: RecognitionResult) -> Self {
        Self {
            extracted_text: result.text,
            language: result.language,
            language_name: result.language.display_name().to_string(),
            alternative_text: result.alternative_text,
        }
    }
}

/// One entry of a batch response: either extracted text or the error that
/// sank this item, always tagged with the (sanitized) source filename.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum BatchEntry {
    Success {
        filename: String,
        extracted_text: String,
    },
    Failure {
        filename: String,
        error: String,
    },
}

impl From<BatchItemOutcome> for BatchEntry {
    fn from(outcome: BatchItemOutcome) -> Self {
        match outcome {
            BatchItemOutcome::Success { filename, text } => BatchEntry::Success {
                filename,
                extracted_text: text,
            },
            BatchItemOutcome::Failure { filename, error } => {
                BatchEntry::Failure { filename, error }
            }
        }
    }
}

/// Response for `POST /api/batch-process`. `results` preserves submission
/// order.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct BatchResponse {
    pub results: Vec<BatchEntry>,
    pub language: LanguageCode,
    pub language_name: String,
}

/// Error body shared by every failing endpoint.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health data for `GET /api/health`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub ocr: OcrStatus,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct OcrStatus {
    pub status: String,
}
