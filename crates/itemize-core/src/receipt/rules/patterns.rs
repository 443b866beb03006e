//! Common regex patterns for receipt line extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Price patterns, most specific first
    pub static ref PRICE_WITH_QUANTITY: Regex = Regex::new(
        r"\b(\d{1,3}(?:,\d{3})*\.\d{2})\s*[xX](?:\s|$)"
    ).unwrap();

    pub static ref PRICE_AT_END: Regex = Regex::new(
        r"\b(\d{1,3}(?:,\d{3})*\.\d{2})\s*$"
    ).unwrap();

    pub static ref PRICE_WITH_CURRENCY: Regex = Regex::new(
        r"[$€£]\s*(\d{1,3}(?:,\d{3})*\.\d{2}|\d+\.\d{2})\b"
    ).unwrap();

    pub static ref PRICE_THOUSANDS: Regex = Regex::new(
        r"\b(\d{1,3}(?:,\d{3})+\.\d{2})\b"
    ).unwrap();

    // Leading guard keeps "1,299.00" from yielding "299.00"
    pub static ref PRICE_PLAIN: Regex = Regex::new(
        r"(?:^|[^\d,.])(\d+\.\d{2})\b"
    ).unwrap();

    pub static ref PRICE_COMMA_DECIMAL: Regex = Regex::new(
        r"(?:^|[^\d,.])(\d+,\d{2})\b"
    ).unwrap();

    // Item name cleanup
    pub static ref QUANTITY_PRICE_EXPR: Regex = Regex::new(
        r"\b\d+\s*[xX@]\s*[$€£]?\d+[.,]\d{2}\b|@\s*[$€£]?\d+[.,]\d{2}\b"
    ).unwrap();

    pub static ref PRICE_LITERAL: Regex = Regex::new(
        r"[$€£]?\s*\b\d{1,3}(?:,\d{3})+\.\d{2}\b|[$€£]?\s*\b\d+[.,]\d{2}\b"
    ).unwrap();

    pub static ref SIMPLE_PRICE: Regex = Regex::new(
        r"\$?\d+\.\d{2}"
    ).unwrap();

    pub static ref LEADING_QUANTITY: Regex = Regex::new(
        r"^\s*\d{1,3}\s*[xX@](?:\s+|$)"
    ).unwrap();

    pub static ref TRAILING_QUANTITY: Regex = Regex::new(
        r"(?:^|\s)(?:\d{1,3}\s*)?[xX@]\s*$"
    ).unwrap();

    pub static ref LONG_DIGIT_RUN: Regex = Regex::new(
        r"\b\d{10,}\b"
    ).unwrap();

    pub static ref OCR_ARTIFACTS: Regex = Regex::new(
        r"[|\\]"
    ).unwrap();

    pub static ref NON_NAME_CHARS: Regex = Regex::new(
        r"[^\p{L}\p{M}\p{N}\s\-.&]"
    ).unwrap();

    pub static ref WHITESPACE_RUN: Regex = Regex::new(
        r"\s+"
    ).unwrap();

    // Normalizer repairs
    pub static ref DECIMAL_SPACING: Regex = Regex::new(
        r"(\d)[ \t]*\.[ \t]*(\d{2})\b"
    ).unwrap();

    // Vocabulary that marks neighbouring lines as part of a totals block
    pub static ref TOTAL_VOCABULARY: Regex = Regex::new(
        r"(?i)\b(?:sub\s*-?\s*total|total|ttl|tax\d*|balance|amount\s+due)\b"
    ).unwrap();
}
