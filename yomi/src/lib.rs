//! Yomi: a self-hostable OCR text-extraction service.
//!
//! Uploaded images are persisted as transient artifacts, normalized with a
//! preprocessing strategy picked from the declared language family, handed
//! to Tesseract (optionally twice, with an alternate segmentation mode for
//! East-Asian scripts) and returned as structured JSON.

pub mod api;
pub mod artifacts;
pub mod config;
pub mod error;
pub mod language;
pub mod ocr;
pub mod pipeline;
pub mod preprocess;
