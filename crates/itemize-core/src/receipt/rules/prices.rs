//! Price extraction for receipt lines.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::receipt::PriceMatch;

use super::LineExtractor;
use super::patterns::{
    PRICE_AT_END, PRICE_COMMA_DECIMAL, PRICE_PLAIN, PRICE_THOUSANDS, PRICE_WITH_CURRENCY,
    PRICE_WITH_QUANTITY,
};

lazy_static! {
    /// Smallest amount accepted as an item price.
    pub static ref MIN_PRICE: Decimal = Decimal::new(1, 2);

    /// Largest amount accepted as an item price.
    pub static ref MAX_PRICE: Decimal = Decimal::new(99999, 2);
}

/// Price patterns, most specific first.
fn price_patterns() -> [&'static Regex; 6] {
    [
        &*PRICE_WITH_QUANTITY,
        &*PRICE_AT_END,
        &*PRICE_WITH_CURRENCY,
        &*PRICE_THOUSANDS,
        &*PRICE_PLAIN,
        &*PRICE_COMMA_DECIMAL,
    ]
}

/// Whether an amount lies in the accepted item price range.
pub fn in_price_range(value: Decimal) -> bool {
    value >= *MIN_PRICE && value <= *MAX_PRICE
}

/// Price field extractor.
///
/// Patterns are tried in order of specificity. Within a pattern the last
/// match on the line wins, since receipts print the line total after any
/// per-unit price.
#[derive(Debug, Clone, Copy)]
pub struct PriceExtractor;

impl PriceExtractor {
    pub fn new() -> Self {
        Self
    }

    /// All non-negative matches of one pattern, in line order.
    fn matches_for(pattern: &Regex, line: &str) -> Vec<PriceMatch> {
        let mut results = Vec::new();

        for caps in pattern.captures_iter(line) {
            let (Some(full), Some(amount)) = (caps.get(0), caps.get(1)) else {
                continue;
            };

            // Skip the guard character some patterns consume before the amount
            let mut start = full.start();
            if let Some(c) = full.as_str().chars().next() {
                if !c.is_ascii_digit() && !matches!(c, '$' | '€' | '£') {
                    start += c.len_utf8();
                }
            }

            if is_negative(line, start, amount.end()) {
                continue;
            }

            if let Some(value) = parse_amount(amount.as_str()) {
                results.push(PriceMatch {
                    value,
                    matched_span: amount.as_str().to_string(),
                    start,
                    end: full.end(),
                });
            }
        }

        results
    }
}

impl Default for PriceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LineExtractor for PriceExtractor {
    type Output = PriceMatch;

    fn extract(&self, line: &str) -> Option<Self::Output> {
        for pattern in price_patterns() {
            if let Some(last) = Self::matches_for(pattern, line).pop() {
                if in_price_range(last.value) {
                    return Some(last);
                }
            }
        }

        None
    }

    fn extract_all(&self, line: &str) -> Vec<Self::Output> {
        let mut results: Vec<PriceMatch> = price_patterns()
            .into_iter()
            .flat_map(|pattern| Self::matches_for(pattern, line))
            .filter(|m| in_price_range(m.value))
            .collect();

        results.sort_by_key(|m| m.start);
        results.dedup_by(|a, b| a.start < b.end && b.start < a.end);
        results
    }
}

/// A leading or trailing minus marks voids, refunds and coupons.
fn is_negative(line: &str, start: usize, amount_end: usize) -> bool {
    line[..start].ends_with('-') || line[amount_end..].starts_with('-')
}

/// Parse a receipt amount ("1,234.56", "12.50" or "12,50").
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        // "12,50" - comma is the decimal separator
        (Some(c), None) if cleaned.len() - c == 3 => cleaned.replace(',', "."),
        // "1.234,56"
        (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
        // "1,234.56" or "1,234"
        (Some(_), _) => cleaned.replace(',', ""),
        _ => cleaned,
    };

    Decimal::from_str(&normalized).ok()
}
