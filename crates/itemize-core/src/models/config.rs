//! Configuration structures for the extraction engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ItemizeError, Result};
use crate::models::receipt::NoiseCategory;

/// Main configuration for itemize.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemizeConfig {
    /// Line classification configuration.
    pub extraction: ExtractionConfig,

    /// Output rendering configuration.
    pub output: OutputConfig,
}

/// Line classification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Heuristic thresholds.
    pub thresholds: ClassifierThresholds,

    /// How repeated lines are recognised.
    pub dedup: DedupStrategy,

    /// Pair a price-only line with the name-only line above it.
    pub pair_split_lines: bool,

    /// Extra vendor-specific noise patterns (regular expressions).
    pub extra_noise_patterns: Vec<String>,

    /// Built-in noise categories to switch off.
    pub disabled_categories: Vec<NoiseCategory>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            thresholds: ClassifierThresholds::default(),
            dedup: DedupStrategy::default(),
            pair_split_lines: true,
            extra_noise_patterns: Vec::new(),
            disabled_categories: Vec::new(),
        }
    }
}

/// Output rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// chrono format string for `processed_at` in CSV and text output.
    pub timestamp_format: String,

    /// Include the source line column in CSV and text output.
    pub include_source_line: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
            include_source_line: true,
        }
    }
}

/// Tunable heuristics shared by the name extractor and subtotal detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierThresholds {
    /// Names longer than 3 characters above this digit ratio look like codes.
    pub max_digit_ratio: f64,

    /// Maximum distance between a price and the running total to count as a match.
    pub subtotal_epsilon: Decimal,

    /// Shortest accepted item name.
    pub min_name_length: usize,

    /// Shortest line kept by the normalizer.
    pub min_line_length: usize,

    /// Names shorter than this are suspect when the price matches the running total.
    pub subtotal_name_length: usize,

    /// Names shorter than this are suspect next to total vocabulary.
    pub context_name_length: usize,

    /// Lines inspected on each side of a candidate for total vocabulary.
    pub context_window: usize,

    /// Accepted items required before the running-total check applies.
    pub min_items_for_total: usize,
}

impl ClassifierThresholds {
    /// Reject values the heuristics cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.max_digit_ratio) {
            return Err(ItemizeError::Config(format!(
                "max_digit_ratio must be between 0 and 1, got {}",
                self.max_digit_ratio
            )));
        }
        if self.subtotal_epsilon.is_sign_negative() {
            return Err(ItemizeError::Config(format!(
                "subtotal_epsilon must not be negative, got {}",
                self.subtotal_epsilon
            )));
        }
        if self.min_name_length == 0 {
            return Err(ItemizeError::Config("min_name_length must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Strictness::Standard.thresholds()
    }
}

/// Threshold presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strictness {
    /// Keep more borderline lines.
    Lenient,
    #[default]
    Standard,
    /// Reject more borderline lines.
    Strict,
}

impl Strictness {
    pub fn thresholds(self) -> ClassifierThresholds {
        let (max_digit_ratio, subtotal_name_length, context_name_length) = match self {
            Self::Lenient => (0.7, 6, 3),
            Self::Standard => (0.7, 8, 4),
            Self::Strict => (0.6, 10, 6),
        };

        ClassifierThresholds {
            max_digit_ratio,
            subtotal_epsilon: Decimal::new(5, 2),
            min_name_length: 2,
            min_line_length: 3,
            subtotal_name_length,
            context_name_length,
            context_window: 2,
            min_items_for_total: 1,
        }
    }
}

/// Key used by the duplicate filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupStrategy {
    /// Drop a candidate whose exact source line was already accepted.
    #[default]
    SourceLine,
    /// Drop a candidate whose name and price were already accepted.
    NamePrice,
}

impl ItemizeConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
