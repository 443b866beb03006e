//! Subtotal and total detection.
//!
//! Totals print exactly like items (text followed by an amount). What gives
//! them away is context: the amount equals the sum of what came before, or
//! the line sits inside a block of total/tax vocabulary.

use rust_decimal::Decimal;

use crate::models::config::ClassifierThresholds;
use crate::models::receipt::{CandidateItem, RawLine, SubtotalReason};
use crate::receipt::assembler::ParserState;

use super::patterns::TOTAL_VOCABULARY;

/// Contextual check run on candidates that passed noise, price and name
/// extraction.
#[derive(Debug, Clone)]
pub struct SubtotalDetector {
    epsilon: Decimal,
    subtotal_name_length: usize,
    context_name_length: usize,
    min_items_for_total: usize,
}

impl SubtotalDetector {
    pub fn new(thresholds: &ClassifierThresholds) -> Self {
        Self {
            epsilon: thresholds.subtotal_epsilon,
            subtotal_name_length: thresholds.subtotal_name_length,
            context_name_length: thresholds.context_name_length,
            min_items_for_total: thresholds.min_items_for_total,
        }
    }

    /// Reason the candidate looks like a summary line, if it does.
    ///
    /// `context` holds the neighbouring lines, without the candidate itself.
    pub fn check(
        &self,
        candidate: &CandidateItem,
        state: &ParserState,
        context: &[&RawLine],
    ) -> Option<SubtotalReason> {
        let name_len = candidate.raw_name.chars().count();

        if state.accepted() >= self.min_items_for_total
            && (candidate.price - state.running_total()).abs() < self.epsilon
            && name_len < self.subtotal_name_length
        {
            return Some(SubtotalReason::RunningTotal);
        }

        if name_len < self.context_name_length
            && context.iter().any(|line| TOTAL_VOCABULARY.is_match(&line.text))
        {
            return Some(SubtotalReason::ContextVocabulary);
        }

        None
    }

    pub fn is_likely_subtotal(
        &self,
        candidate: &CandidateItem,
        state: &ParserState,
        context: &[&RawLine],
    ) -> bool {
        self.check(candidate, state, context).is_some()
    }
}

impl Default for SubtotalDetector {
    fn default() -> Self {
        Self::new(&ClassifierThresholds::default())
    }
}

/// Lines within `radius` positions of `pos`, excluding `pos` itself.
pub fn context_window(lines: &[RawLine], pos: usize, radius: usize) -> Vec<&RawLine> {
    let start = pos.saturating_sub(radius);
    let end = (pos + radius + 1).min(lines.len());

    (start..end)
        .filter(|&i| i != pos)
        .map(|i| &lines[i])
        .collect()
}
