//! Item name extraction.

use crate::models::config::ClassifierThresholds;
use crate::models::receipt::PriceMatch;

use super::patterns::{
    LEADING_QUANTITY, LONG_DIGIT_RUN, NON_NAME_CHARS, OCR_ARTIFACTS, PRICE_LITERAL,
    QUANTITY_PRICE_EXPR, SIMPLE_PRICE, TRAILING_QUANTITY, WHITESPACE_RUN,
};

/// Item names at or below this length skip the digit ratio check.
const RATIO_CHECK_MIN_LEN: usize = 3;

/// Recovers a clean item name from a priced line.
#[derive(Debug, Clone)]
pub struct NameExtractor {
    min_name_length: usize,
    max_digit_ratio: f64,
}

impl NameExtractor {
    pub fn new(thresholds: &ClassifierThresholds) -> Self {
        Self {
            min_name_length: thresholds.min_name_length,
            max_digit_ratio: thresholds.max_digit_ratio,
        }
    }

    /// Cleaned, validated item name, or `None` when what is left of the line
    /// does not look like a name.
    pub fn extract(&self, line: &str, price: Option<&PriceMatch>) -> Option<String> {
        let name = self.clean(line, price);
        self.is_valid(&name).then_some(name)
    }

    /// Strip the price, quantity markers, product codes and stray
    /// punctuation from a line.
    ///
    /// When `price` does not point at a separable span of `line`, every
    /// simple price literal is removed instead.
    pub fn clean(&self, line: &str, price: Option<&PriceMatch>) -> String {
        let stripped = match price.filter(|m| is_span_of(m, line)) {
            Some(m) => {
                let head = &line[..m.start];
                let tail = line[m.end..].trim();
                // A lone letter after the amount is a tax flag
                let tail = if tail.chars().count() == 1 && tail.chars().all(|c| c.is_ascii_alphabetic()) {
                    ""
                } else {
                    tail
                };
                format!("{} {}", head, tail)
            }
            None => SIMPLE_PRICE.replace_all(line, " ").into_owned(),
        };

        let name = QUANTITY_PRICE_EXPR.replace_all(&stripped, " ");
        let name = PRICE_LITERAL.replace_all(&name, " ");
        let name = LEADING_QUANTITY.replace(&name, "");
        let name = TRAILING_QUANTITY.replace(name.trim_end(), "");
        let name = LONG_DIGIT_RUN.replace_all(&name, " ");
        let name = OCR_ARTIFACTS.replace_all(&name, " ");
        let name = NON_NAME_CHARS.replace_all(&name, " ");

        WHITESPACE_RUN.replace_all(&name, " ").trim().to_string()
    }

    /// Whether a cleaned name is acceptable as an item name.
    pub fn is_valid(&self, name: &str) -> bool {
        let len = name.chars().count();
        if len < self.min_name_length {
            return false;
        }

        // Digits and punctuation only
        if !name.chars().any(char::is_alphabetic) {
            return false;
        }

        if len > RATIO_CHECK_MIN_LEN {
            let digits = name.chars().filter(|c| c.is_ascii_digit()).count();
            if digits as f64 / len as f64 > self.max_digit_ratio {
                return false;
            }
        }

        true
    }
}

impl Default for NameExtractor {
    fn default() -> Self {
        Self::new(&ClassifierThresholds::default())
    }
}

/// Whether a line carries a quantity expression (`2 @ 1.25`, `3 X 0.99`).
///
/// Such lines continue the item above them and never stand for a bare amount.
pub fn has_quantity_marker(line: &str) -> bool {
    QUANTITY_PRICE_EXPR.is_match(line) || LEADING_QUANTITY.is_match(line)
}

fn is_span_of(m: &PriceMatch, line: &str) -> bool {
    m.start < m.end
        && m.end <= line.len()
        && line.is_char_boundary(m.start)
        && line.is_char_boundary(m.end)
}
