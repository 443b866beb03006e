//! Data models shared across the extraction pipeline.

pub mod config;
pub mod receipt;

pub use config::{
    ClassifierThresholds, DedupStrategy, ExtractionConfig, ItemizeConfig, OutputConfig, Strictness,
};
pub use receipt::{
    CandidateItem, LineOutcome, LineTrace, NoiseCategory, PriceMatch, RawLine, ReceiptItem,
    SubtotalReason,
};
