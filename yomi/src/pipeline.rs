//! Request orchestration: drives artifact lifecycle, preprocessing and
//! recognition for single and batch submissions.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::artifacts::{sanitize_filename, ArtifactStore};
use crate::error::{Result, YomiError};
use crate::language::LanguageCode;
use crate::ocr::{RecognizeOptions, TextRecognizer, PSM_SINGLE_BLOCK};
use crate::preprocess::preprocess;

/// One uploaded image as received from the transport layer.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Outcome of a successful recognition run. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct RecognitionResult {
    pub text: String,
    pub language: LanguageCode,
    /// Single-block segmentation output, present only for East-Asian codes.
    pub alternative_text: Option<String>,
}

/// Per-item result of a batch run, in submission order.
#[derive(Debug, Clone)]
pub enum BatchItemOutcome {
    Success { filename: String, text: String },
    Failure { filename: String, error: String },
}

#[derive(Clone)]
pub struct Pipeline {
    store: ArtifactStore,
    recognizer: Arc<dyn TextRecognizer>,
}

impl Pipeline {
    pub fn new(store: ArtifactStore, recognizer: Arc<dyn TextRecognizer>) -> Self {
        Self { store, recognizer }
    }

    pub fn recognizer(&self) -> &dyn TextRecognizer {
        self.recognizer.as_ref()
    }

    /// Handle one image: acquire → optional preprocess → recognize (plus the
    /// alternate pass for East-Asian codes) → release. The artifact guard
    /// guarantees release on every exit path.
    pub async fn process_single(
        &self,
        upload: UploadedImage,
        language: LanguageCode,
        preprocess_enabled: bool,
        engine_config: &str,
    ) -> Result<RecognitionResult> {
        let options = RecognizeOptions::parse(engine_config);
        self.run_item(
            &upload,
            language,
            preprocess_enabled,
            options,
            language.wants_alternate_pass(),
        )
        .await
    }

    /// Handle a batch sequentially, in submission order. Preprocessing always
    /// runs in batch mode (the single-item opt-out deliberately does not
    /// exist here) and one item's failure never aborts its siblings.
    pub async fn process_batch(
        &self,
        uploads: Vec<UploadedImage>,
        language: LanguageCode,
    ) -> Result<Vec<BatchItemOutcome>> {
        if uploads.is_empty() {
            return Err(YomiError::MissingInput("No images provided".to_string()));
        }

        let mut outcomes = Vec::with_capacity(uploads.len());
        for upload in uploads {
            let filename = sanitize_filename(&upload.filename);
            let outcome = match self
                .run_item(&upload, language, true, RecognizeOptions::default(), false)
                .await
            {
                Ok(result) => BatchItemOutcome::Success {
                    filename,
                    text: result.text,
                },
                Err(e) => {
                    warn!(filename = %upload.filename, error = %e, "batch item failed");
                    BatchItemOutcome::Failure {
                        filename,
                        error: e.to_string(),
                    }
                }
            };
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    async fn run_item(
        &self,
        upload: &UploadedImage,
        language: LanguageCode,
        preprocess_enabled: bool,
        options: RecognizeOptions,
        with_alternate: bool,
    ) -> Result<RecognitionResult> {
        let mut artifact = self.store.acquire(&upload.bytes, &upload.filename).await?;

        let input = if preprocess_enabled {
            let strategy = language.strategy();
            debug!(language = %language, ?strategy, "preprocessing image");
            let processed = preprocess(&upload.bytes, strategy)?;
            tokio::fs::write(artifact.processed_path(), &processed).await?;
            artifact.mark_processed();
            processed
        } else {
            upload.bytes.clone()
        };

        let text = self.recognizer.recognize(&input, language, &options).await?;

        let alternative_text = if with_alternate {
            let alt_options = RecognizeOptions::with_page_seg_mode(PSM_SINGLE_BLOCK);
            Some(
                self.recognizer
                    .recognize(&input, language, &alt_options)
                    .await?,
            )
        } else {
            None
        };

        Ok(RecognitionResult {
            text,
            language,
            alternative_text,
        })
    }
}
