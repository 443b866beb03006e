//! Line item parser driving the extraction pipeline.

use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, info, trace};

use crate::error::Result;
use crate::models::config::{ClassifierThresholds, DedupStrategy, ExtractionConfig, Strictness};
use crate::models::receipt::{CandidateItem, LineOutcome, LineTrace, RawLine, ReceiptItem};

use super::assembler::Assembler;
use super::rules::{
    context_window, has_quantity_marker, normalize_lines, LineExtractor, NameExtractor,
    NoiseClassifier, NoiseRuleSet, PriceExtractor, SubtotalDetector,
};
use super::{ParseReport, ReceiptParser};

/// A name-only line waiting for a price on the next line.
struct PendingLabel {
    name: String,
    text: String,
}

/// Rule-based receipt parser.
///
/// Immutable once built; every call owns its own state, so one instance can
/// be shared across threads.
#[derive(Debug, Clone)]
pub struct LineItemParser {
    classifier: NoiseClassifier,
    prices: PriceExtractor,
    names: NameExtractor,
    subtotals: SubtotalDetector,
    thresholds: ClassifierThresholds,
    dedup: DedupStrategy,
    pair_split_lines: bool,
}

impl LineItemParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        let thresholds = ClassifierThresholds::default();
        Self {
            classifier: NoiseClassifier::default(),
            prices: PriceExtractor::new(),
            names: NameExtractor::new(&thresholds),
            subtotals: SubtotalDetector::new(&thresholds),
            thresholds,
            dedup: DedupStrategy::default(),
            pair_split_lines: true,
        }
    }

    /// Build a parser from configuration.
    ///
    /// Fails when a threshold is out of range or an extra noise pattern does
    /// not compile.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        config.thresholds.validate()?;

        let rules = NoiseRuleSet::builtin()
            .without_categories(&config.disabled_categories)
            .with_patterns(&config.extra_noise_patterns)?;

        debug!(
            "Built noise rule set with {} rules ({} custom)",
            rules.len(),
            config.extra_noise_patterns.len()
        );

        Ok(Self::new()
            .with_classifier(NoiseClassifier::new(rules))
            .with_thresholds(config.thresholds.clone())
            .with_dedup(config.dedup)
            .with_split_line_pairing(config.pair_split_lines))
    }

    /// Replace the heuristic thresholds.
    pub fn with_thresholds(mut self, thresholds: ClassifierThresholds) -> Self {
        self.names = NameExtractor::new(&thresholds);
        self.subtotals = SubtotalDetector::new(&thresholds);
        self.thresholds = thresholds;
        self
    }

    /// Apply a threshold preset.
    pub fn with_strictness(self, strictness: Strictness) -> Self {
        self.with_thresholds(strictness.thresholds())
    }

    /// Set the duplicate key strategy.
    pub fn with_dedup(mut self, dedup: DedupStrategy) -> Self {
        self.dedup = dedup;
        self
    }

    /// Enable or disable pairing of name-only and price-only lines.
    pub fn with_split_line_pairing(mut self, enabled: bool) -> Self {
        self.pair_split_lines = enabled;
        self
    }

    /// Set the noise classifier.
    pub fn with_classifier(mut self, classifier: NoiseClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn thresholds(&self) -> &ClassifierThresholds {
        &self.thresholds
    }

    /// Parse with every item stamped `processed_at`.
    ///
    /// The same text and timestamp always give the same items.
    pub fn parse_at(&self, text: &str, processed_at: DateTime<Utc>) -> Vec<ReceiptItem> {
        self.run(text, processed_at).items
    }

    fn run(&self, text: &str, processed_at: DateTime<Utc>) -> ParseReport {
        let start = Instant::now();
        let lines = normalize_lines(text, self.thresholds.min_line_length);

        let mut assembler = Assembler::new(self.dedup, processed_at);
        let mut trace = Vec::with_capacity(lines.len());
        let mut pending: Option<PendingLabel> = None;

        for (pos, line) in lines.iter().enumerate() {
            let label = pending.take();

            let outcome = if let Some(category) = self.classifier.category(&line.text) {
                LineOutcome::Skipped { category }
            } else if let Some(price) = self.prices.extract(&line.text) {
                let name = self.names.clean(&line.text, Some(&price));

                let candidate = if self.names.is_valid(&name) {
                    Some(CandidateItem {
                        source_line: line.clone(),
                        raw_name: name,
                        price: price.value,
                    })
                } else if name.is_empty() && !has_quantity_marker(&line.text) {
                    label.map(|label| CandidateItem {
                        source_line: RawLine::new(line.index, format!("{} {}", label.text, line.text)),
                        raw_name: label.name,
                        price: price.value,
                    })
                } else {
                    None
                };

                match candidate {
                    Some(candidate) => self.assemble(candidate, pos, &lines, &mut assembler),
                    None => {
                        trace!("No usable name: {}", line.text);
                        LineOutcome::RejectedAsBadName
                    }
                }
            } else {
                if self.pair_split_lines {
                    pending = self.names.extract(&line.text, None).map(|name| PendingLabel {
                        name,
                        text: line.text.clone(),
                    });
                }
                LineOutcome::NoPrice
            };

            trace.push(LineTrace {
                index: line.index,
                text: line.text.clone(),
                outcome,
            });
        }

        let (items, running_total) = assembler.finish();

        info!(
            "Parsed {} items from {} lines (total {})",
            items.len(),
            lines.len(),
            running_total
        );

        ParseReport {
            items,
            trace,
            running_total,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn assemble(
        &self,
        candidate: CandidateItem,
        pos: usize,
        lines: &[RawLine],
        assembler: &mut Assembler,
    ) -> LineOutcome {
        if assembler.is_duplicate(&candidate) {
            debug!("Rejected duplicate line: {}", candidate.source_line.text);
            return LineOutcome::RejectedAsDuplicate;
        }

        let context = context_window(lines, pos, self.thresholds.context_window);

        if let Some(reason) = self.subtotals.check(&candidate, assembler.state(), &context) {
            debug!(
                "Rejected {:?} {} as subtotal ({:?})",
                candidate.raw_name, candidate.price, reason
            );
            return LineOutcome::RejectedAsSubtotal { reason };
        }

        let item = assembler.accept(candidate);
        debug!("Accepted {:?} {}", item.item, item.amount);
        LineOutcome::Accepted
    }
}

impl Default for LineItemParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptParser for LineItemParser {
    fn parse(&self, text: &str) -> Vec<ReceiptItem> {
        self.parse_at(text, Utc::now())
    }

    fn parse_with_report(&self, text: &str) -> ParseReport {
        self.run(text, Utc::now())
    }
}
