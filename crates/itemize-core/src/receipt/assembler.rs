//! Duplicate filtering and record assembly.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::config::DedupStrategy;
use crate::models::receipt::{CandidateItem, ReceiptItem};

/// Mutable state of a single parse call.
#[derive(Debug, Clone)]
pub struct ParserState {
    running_total: Decimal,
    seen: HashSet<String>,
    accepted: usize,
    dedup: DedupStrategy,
}

impl ParserState {
    pub fn new(dedup: DedupStrategy) -> Self {
        Self {
            running_total: Decimal::ZERO,
            seen: HashSet::new(),
            accepted: 0,
            dedup,
        }
    }

    /// Sum of the amounts accepted so far.
    pub fn running_total(&self) -> Decimal {
        self.running_total
    }

    /// Number of items accepted so far.
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    fn key(&self, name: &str, amount: Decimal, source_line: &str) -> String {
        match self.dedup {
            DedupStrategy::SourceLine => source_line.to_string(),
            DedupStrategy::NamePrice => format!("{}\u{1f}{}", name, amount.normalize()),
        }
    }

    /// Whether an equivalent candidate was already accepted.
    pub fn is_duplicate(&self, candidate: &CandidateItem) -> bool {
        let key = self.key(
            &candidate.raw_name,
            candidate.price,
            &candidate.source_line.text,
        );
        self.seen.contains(&key)
    }

    /// Account for an accepted item.
    pub fn record(&mut self, item: &ReceiptItem) {
        let key = self.key(&item.item, item.amount, &item.source_line);
        self.seen.insert(key);
        self.running_total += item.amount;
        self.accepted += 1;
    }
}

/// Collects accepted candidates into receipt items, in line order.
#[derive(Debug)]
pub struct Assembler {
    processed_at: DateTime<Utc>,
    items: Vec<ReceiptItem>,
    state: ParserState,
}

impl Assembler {
    /// Every item is stamped with `processed_at`.
    pub fn new(dedup: DedupStrategy, processed_at: DateTime<Utc>) -> Self {
        Self {
            processed_at,
            items: Vec::new(),
            state: ParserState::new(dedup),
        }
    }

    pub fn state(&self) -> &ParserState {
        &self.state
    }

    pub fn is_duplicate(&self, candidate: &CandidateItem) -> bool {
        self.state.is_duplicate(candidate)
    }

    /// Turn a validated candidate into a receipt item.
    pub fn accept(&mut self, candidate: CandidateItem) -> &ReceiptItem {
        let item = ReceiptItem {
            item: candidate.raw_name,
            amount: candidate.price,
            source_line: candidate.source_line.text,
            processed_at: self.processed_at,
        };

        self.state.record(&item);
        self.items.push(item);
        &self.items[self.items.len() - 1]
    }

    pub fn items(&self) -> &[ReceiptItem] {
        &self.items
    }

    /// Accepted items and their total.
    pub fn finish(self) -> (Vec<ReceiptItem>, Decimal) {
        (self.items, self.state.running_total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::receipt::RawLine;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn candidate(index: usize, line: &str, name: &str, price: &str) -> CandidateItem {
        CandidateItem {
            source_line: RawLine::new(index, line),
            raw_name: name.to_string(),
            price: Decimal::from_str(price).unwrap(),
        }
    }

    #[test]
    fn test_accept_updates_state() {
        let now = Utc::now();
        let mut assembler = Assembler::new(DedupStrategy::SourceLine, now);

        let item = assembler.accept(candidate(3, "BANANAS 1.29", "BANANAS", "1.29"));
        assert_eq!(item.item, "BANANAS");
        assert_eq!(item.source_line, "BANANAS 1.29");
        assert_eq!(item.processed_at, now);

        assembler.accept(candidate(4, "BREAD 3.00", "BREAD", "3.00"));
        assert_eq!(assembler.state().accepted(), 2);
        assert_eq!(assembler.state().running_total(), Decimal::from_str("4.29").unwrap());

        let (items, total) = assembler.finish();
        assert_eq!(items.len(), 2);
        assert_eq!(total, Decimal::from_str("4.29").unwrap());
    }

    #[test]
    fn test_source_line_dedup() {
        let mut assembler = Assembler::new(DedupStrategy::SourceLine, Utc::now());
        assembler.accept(candidate(0, "GUM 1.00", "GUM", "1.00"));

        assert!(assembler.is_duplicate(&candidate(5, "GUM 1.00", "GUM", "1.00")));
        // Same name and price on a different line is a separate purchase
        assert!(!assembler.is_duplicate(&candidate(6, "GUM 1.00 N", "GUM", "1.00")));
    }

    #[test]
    fn test_name_price_dedup() {
        let mut assembler = Assembler::new(DedupStrategy::NamePrice, Utc::now());
        assembler.accept(candidate(0, "GUM 1.00", "GUM", "1.00"));

        assert!(assembler.is_duplicate(&candidate(6, "GUM 1.00 N", "GUM", "1.0")));
        assert!(!assembler.is_duplicate(&candidate(7, "GUM 1.50", "GUM", "1.50")));
        assert!(!assembler.is_duplicate(&candidate(8, "MINT 1.00", "MINT", "1.00")));
    }
}
