//! Recognition invoker wrapping the Tesseract OCR engine.
//!
//! The pipeline depends on the [`TextRecognizer`] trait rather than the
//! concrete engine, which keeps recognition swappable and lets tests run the
//! full orchestration with a stub. [`TesseractEngine`] is the production
//! implementation: per-call `LepTess` instances on the blocking pool, probed
//! once at startup so a missing installation degrades to an explicit
//! unavailable state instead of failing every request opaquely.

mod engine;
mod options;

pub use engine::TesseractEngine;
pub use options::RecognizeOptions;

use async_trait::async_trait;

use crate::error::Result;
use crate::language::LanguageCode;

/// Page segmentation mode treating the page as a single uniform block of
/// text, used for the alternate East-Asian pass.
pub const PSM_SINGLE_BLOCK: u32 = 6;

/// The opaque OCR capability: image bytes in, recognized text out.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(
        &self,
        image: &[u8],
        language: LanguageCode,
        options: &RecognizeOptions,
    ) -> Result<String>;

    fn is_available(&self) -> bool {
        true
    }
}
