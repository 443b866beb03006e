//! Core library for receipt line item extraction.
//!
//! This crate turns noisy OCR text of a retail receipt into purchased item
//! records. It provides:
//! - Line normalization and structural noise classification
//! - Price and item name extraction
//! - Subtotal/total detection against the running total and nearby lines
//! - Duplicate filtering and record assembly
//!
//! Parsing never fails; malformed lines simply yield no item.

pub mod error;
pub mod models;
pub mod receipt;

pub use error::{ItemizeError, Result, RuleError};
pub use models::config::{
    ClassifierThresholds, DedupStrategy, ExtractionConfig, ItemizeConfig, OutputConfig, Strictness,
};
pub use models::receipt::{LineOutcome, LineTrace, NoiseCategory, ReceiptItem, SubtotalReason};
pub use receipt::{LineItemParser, ParseReport, ReceiptParser};

/// Parse receipt text with the default rules and thresholds.
pub fn parse(text: &str) -> Vec<ReceiptItem> {
    LineItemParser::new().parse(text)
}
