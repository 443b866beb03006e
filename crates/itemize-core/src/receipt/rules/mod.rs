//! Rule-based classifiers and extractors for receipt lines.

pub mod names;
pub mod noise;
pub mod normalize;
pub mod patterns;
pub mod prices;
pub mod subtotal;

pub use names::{has_quantity_marker, NameExtractor};
pub use noise::{NoiseClassifier, NoiseRule, NoiseRuleSet};
pub use normalize::{normalize_line, normalize_lines};
pub use prices::{in_price_range, parse_amount, PriceExtractor, MAX_PRICE, MIN_PRICE};
pub use subtotal::{context_window, SubtotalDetector};

/// Trait for single-line field extractors.
pub trait LineExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the preferred occurrence from a line.
    fn extract(&self, line: &str) -> Option<Self::Output>;

    /// Extract all occurrences, in line order.
    fn extract_all(&self, line: &str) -> Vec<Self::Output>;
}
