use std::time::Duration;

use async_trait::async_trait;
use leptess::{LepTess, Variable};
use tracing::{info, warn};

use crate::config::OcrConfig;
use crate::error::{Result, YomiError};
use crate::language::LanguageCode;

use super::{RecognizeOptions, TextRecognizer};

enum Backend {
    Ready { data_path: Option<String> },
    Unavailable { reason: String },
}

/// Local Tesseract backend.
///
/// A fresh `LepTess` is created per call on the blocking pool, since the
/// engine is initialized for a single language and requests pick theirs
/// per call. Availability is probed once at construction so a missing
/// installation is reported once instead of on every request.
pub struct TesseractEngine {
    backend: Backend,
    timeout: Duration,
}

impl TesseractEngine {
    pub fn new(config: &OcrConfig) -> Self {
        let data_path = config.data_path.clone();
        let backend = match LepTess::new(data_path.as_deref(), LanguageCode::DEFAULT.as_str()) {
            Ok(_) => {
                info!(
                    data_path = data_path.as_deref().unwrap_or("<system default>"),
                    "Tesseract OCR initialized"
                );
                Backend::Ready { data_path }
            }
            Err(e) => {
                let reason = format!("Tesseract not available: {e}");
                warn!("{}", reason);
                Backend::Unavailable { reason }
            }
        };

        Self {
            backend,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    fn recognize_blocking(
        data_path: Option<&str>,
        image: &[u8],
        language: LanguageCode,
        options: &RecognizeOptions,
    ) -> Result<String> {
        let mut lt = LepTess::new(data_path, language.as_str()).map_err(|e| {
            YomiError::Recognition(format!(
                "failed to initialize engine for '{language}': {e}"
            ))
        })?;

        if let Some(mode) = options.page_seg_mode {
            lt.set_variable(Variable::TesseditPagesegMode, &mode.to_string())
                .map_err(|e| YomiError::Recognition(format!("failed to set psm {mode}: {e}")))?;
        }

        for (name, value) in &options.variables {
            let Some(var) = known_variable(name) else {
                warn!(name, "skipping unknown engine variable");
                continue;
            };
            lt.set_variable(var, value).map_err(|e| {
                YomiError::Recognition(format!("failed to set {name}={value}: {e}"))
            })?;
        }

        lt.set_image_from_mem(image)
            .map_err(|e| YomiError::Recognition(format!("failed to load image: {e}")))?;
        let text = lt
            .get_utf8_text()
            .map_err(|e| YomiError::Recognition(format!("failed to extract text: {e}")))?;

        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl TextRecognizer for TesseractEngine {
    async fn recognize(
        &self,
        image: &[u8],
        language: LanguageCode,
        options: &RecognizeOptions,
    ) -> Result<String> {
        let data_path = match &self.backend {
            Backend::Ready { data_path } => data_path.clone(),
            Backend::Unavailable { reason } => {
                return Err(YomiError::EngineUnavailable(reason.clone()));
            }
        };

        let bytes = image.to_vec();
        let options = options.clone();
        let task = tokio::task::spawn_blocking(move || {
            Self::recognize_blocking(data_path.as_deref(), &bytes, language, &options)
        });

        match tokio::time::timeout(self.timeout, task).await {
            Ok(joined) => {
                joined.map_err(|e| YomiError::Recognition(format!("OCR task panicked: {e}")))?
            }
            Err(_) => Err(YomiError::Recognition(format!(
                "OCR timed out after {} seconds",
                self.timeout.as_secs()
            ))),
        }
    }

    fn is_available(&self) -> bool {
        !matches!(self.backend, Backend::Unavailable { .. })
    }
}

/// Engine variables accepted from the raw config string. The surface is
/// deliberately small; anything else is skipped with a warning.
fn known_variable(name: &str) -> Option<Variable> {
    match name {
        "tessedit_char_whitelist" => Some(Variable::TesseditCharWhitelist),
        "tessedit_char_blacklist" => Some(Variable::TesseditCharBlacklist),
        "tessedit_pageseg_mode" => Some(Variable::TesseditPagesegMode),
        "preserve_interword_spaces" => Some(Variable::PreserveInterwordSpaces),
        "user_defined_dpi" => Some(Variable::UserDefinedDpi),
        _ => None,
    }
}
