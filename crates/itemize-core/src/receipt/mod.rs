//! Receipt line item extraction module.

pub mod assembler;
mod parser;
pub mod rules;

pub use assembler::{Assembler, ParserState};
pub use parser::LineItemParser;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::receipt::{LineOutcome, LineTrace, ReceiptItem};

/// Result of a traced parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseReport {
    /// Accepted items, in line order.
    pub items: Vec<ReceiptItem>,
    /// Outcome of every normalized line.
    pub trace: Vec<LineTrace>,
    /// Sum of the accepted amounts.
    pub running_total: Decimal,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ParseReport {
    /// Number of traced lines whose outcome satisfies `predicate`.
    pub fn count(&self, predicate: impl Fn(&LineOutcome) -> bool) -> usize {
        self.trace.iter().filter(|t| predicate(&t.outcome)).count()
    }

    /// Traced lines that did not become items.
    pub fn rejected(&self) -> impl Iterator<Item = &LineTrace> {
        self.trace.iter().filter(|t| !t.outcome.is_accepted())
    }
}

/// Trait for receipt parsers.
pub trait ReceiptParser {
    /// Extract the purchased items from receipt text.
    fn parse(&self, text: &str) -> Vec<ReceiptItem>;

    /// Extract items and keep the outcome of every line.
    fn parse_with_report(&self, text: &str) -> ParseReport;
}
