//! Receipt line data models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One normalized line of input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// 0-based position of the line in the input text.
    pub index: usize,

    /// Normalized line text.
    pub text: String,
}

impl RawLine {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }
}

/// A monetary amount found in a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceMatch {
    /// Parsed amount, always within the accepted price range.
    pub value: Decimal,

    /// Numeric text the amount was parsed from.
    pub matched_span: String,

    /// Byte offset where the whole pattern match starts.
    pub start: usize,

    /// Byte offset where the whole pattern match ends.
    pub end: usize,
}

/// A line that passed noise filtering and yielded a price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateItem {
    /// Line the candidate came from.
    pub source_line: RawLine,

    /// Cleaned item name.
    pub raw_name: String,

    /// Extracted amount.
    pub price: Decimal,
}

/// A purchased item recovered from a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptItem {
    /// Item name.
    pub item: String,

    /// Line total.
    pub amount: Decimal,

    /// Source text the item was read from.
    pub source_line: String,

    /// When the item was captured.
    pub processed_at: DateTime<Utc>,
}

/// Category of a structural noise rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseCategory {
    /// Store names, store/operator/terminal numbers, staff titles.
    StoreMetadata,
    /// Date and time literals.
    DateTime,
    /// Phone numbers, postal codes, street addresses.
    Contact,
    /// Payment and tender lines.
    Payment,
    /// Surveys, slogans, footers.
    Marketing,
    /// Barcodes, UPCs and other bare numbers.
    NumericCode,
    /// Total, subtotal, tax, balance and discount lines.
    Summary,
    /// Vendor-specific patterns supplied through configuration.
    Custom,
}

impl NoiseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StoreMetadata => "store_metadata",
            Self::DateTime => "date_time",
            Self::Contact => "contact",
            Self::Payment => "payment",
            Self::Marketing => "marketing",
            Self::NumericCode => "numeric_code",
            Self::Summary => "summary",
            Self::Custom => "custom",
        }
    }
}

impl std::fmt::Display for NoiseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a candidate was taken for a summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtotalReason {
    /// Price matches the sum of the items accepted so far.
    RunningTotal,
    /// Neighbouring lines carry total/tax vocabulary.
    ContextVocabulary,
}

/// Terminal state of a visited line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LineOutcome {
    /// Structural noise.
    Skipped { category: NoiseCategory },
    /// No usable amount on the line.
    NoPrice,
    /// Became a receipt item.
    Accepted,
    /// Looked like a subtotal or total.
    RejectedAsSubtotal { reason: SubtotalReason },
    /// Same line already produced an item.
    RejectedAsDuplicate,
    /// Price found but the remaining text is not an item name.
    RejectedAsBadName,
}

impl LineOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Short label used in explain output.
    pub fn label(&self) -> String {
        match self {
            Self::Skipped { category } => format!("skipped ({})", category),
            Self::NoPrice => "no price".to_string(),
            Self::Accepted => "accepted".to_string(),
            Self::RejectedAsSubtotal { reason: SubtotalReason::RunningTotal } => {
                "subtotal (running total)".to_string()
            }
            Self::RejectedAsSubtotal { reason: SubtotalReason::ContextVocabulary } => {
                "subtotal (context)".to_string()
            }
            Self::RejectedAsDuplicate => "duplicate".to_string(),
            Self::RejectedAsBadName => "bad name".to_string(),
        }
    }
}

/// Outcome of one line, kept for traceability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineTrace {
    /// 0-based input line index.
    pub index: usize,

    /// Normalized line text.
    pub text: String,

    /// What happened to the line.
    pub outcome: LineOutcome,
}
