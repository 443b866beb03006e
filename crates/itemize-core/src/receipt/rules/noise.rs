//! Structural noise classification.
//!
//! A line is noise when it can never describe a purchased item, whatever
//! amount it carries: store headers, addresses, timestamps, tender lines,
//! footers, barcodes and the totals block. Rules are grouped by
//! [`NoiseCategory`] and evaluated as a flat table where the first hit wins.

use regex::Regex;
use tracing::trace;

use crate::error::RuleError;
use crate::models::receipt::NoiseCategory;

/// Built-in rule table.
pub const BUILTIN_RULES: &[(NoiseCategory, &str)] = &[
    // Totals block. Substring total/subtotal matching is intentionally loose.
    (
        NoiseCategory::Summary,
        r"(?i)^\s*(?:sub\s*-?\s*total|total|tax\d?|balance(?:\s+due)?|amount\s+due|change(?:\s+due)?|cash|card)\s*:?\s*$",
    ),
    (NoiseCategory::Summary, r"(?i)sub\s*-?\s*total|total"),
    (
        NoiseCategory::Summary,
        r"(?i)\b(?:tax\d*|balance|discount|coupon|savings|you\s+saved|amount\s+due|ttl)\b",
    ),
    (NoiseCategory::Summary, r"(?i)\b(?:items?\s+sold|item\s+count)\b"),
    // Barcodes and bare numbers
    (NoiseCategory::NumericCode, r"^\s*\d+\s*$"),
    (NoiseCategory::NumericCode, r"^\d{12,}$"),
    (NoiseCategory::NumericCode, r"^\d[\d\s-]{10,}\d$"),
    // Dates and times
    (NoiseCategory::DateTime, r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b"),
    (NoiseCategory::DateTime, r"\b\d{4}[/-]\d{1,2}[/-]\d{1,2}\b"),
    (NoiseCategory::DateTime, r"\b\d{1,2}:\d{2}(?::\d{2})?\b"),
    (NoiseCategory::DateTime, r"(?i)^\s*(?:date|time)\b"),
    // Tender and card network lines
    (
        NoiseCategory::Payment,
        r"(?i)\b(?:visa|mastercard|master\s+card|mcard|amex|american\s+express|discover|debit|credit|ebt)\b",
    ),
    (
        NoiseCategory::Payment,
        r"(?i)^\s*(?:cash|change|card|tend(?:er)?(?:ed)?|paid|payment)\b",
    ),
    (
        NoiseCategory::Payment,
        r"(?i)\b(?:signature|approved|approval|chip\s+read|contactless)\b|\bappr\s*#|\bauth(?:orization)?\s*(?:#|code)",
    ),
    // Store identity and transaction metadata
    (
        NoiseCategory::StoreMetadata,
        r"(?i)\b(?:walmart|wal-mart|target|costco|kroger|safeway|supercenter|aldi|walgreens|whole\s+foods|trader\s+joe'?s)\b",
    ),
    (NoiseCategory::StoreMetadata, r"(?i)\b(?:st|op|te|tr|tc|trn|reg)\s*#"),
    (
        NoiseCategory::StoreMetadata,
        r"(?i)\b(?:cashier|manager|mgr|operator|terminal|register|transaction|receipt)\b",
    ),
    (NoiseCategory::StoreMetadata, r"(?i)\bstore\s*(?:#|no\.?|number)?\s*:?\s*\d+"),
    (NoiseCategory::StoreMetadata, r"(?i)^\s*(?:ref|aid|seq|val|qty|quantity)\b|\bref\s*#"),
    // Addresses, phone numbers and postal codes
    (NoiseCategory::Contact, r"\(?\b\d{3}\)?[\s.-]?\d{3}[\s.-]\d{4}\b"),
    (NoiseCategory::Contact, r"(?i)\b(?:phone|tel|fax|address)\b"),
    (NoiseCategory::Contact, r"^\s*\d{5}(?:-\d{4})?\s*$"),
    (NoiseCategory::Contact, r"\b[A-Z]{2}\s+\d{5}(?:-\d{4})?\b"),
    (NoiseCategory::Contact, r"^\s*[A-Z]{2}\s+\d+\s*$"),
    (
        NoiseCategory::Contact,
        r"(?i)^\s*\d+\s+(?:[a-z0-9.']+\s+){0,4}(?:st|street|ave|avenue|rd|road|blvd|dr|drive|ln|lane|way|hwy|pkwy|ct|pl)\.?(?:\s+(?:#|ste|suite|unit)\s*\w+)?\s*$",
    ),
    // Footers and promotions
    (
        NoiseCategory::Marketing,
        r"(?i)\b(?:survey|feedback|thank\s+you|thanks\s+for|low\s+prices|you\s+can\s+trust|every\s+day|free\s+delivery|scan\s+for|visit\s+us|come\s+again|return\s+policy|customer\s+copy)\b",
    ),
    (NoiseCategory::Marketing, r"(?i)www\.|\.com\b"),
    (NoiseCategory::Marketing, r"(?i)^\s*(?:get\s+free|with\s+walmart|give\s+us)\b"),
];

/// A compiled rule tagged with its category.
#[derive(Debug, Clone)]
pub struct NoiseRule {
    pub category: NoiseCategory,
    pub pattern: Regex,
}

/// Immutable, compiled set of noise rules.
#[derive(Debug, Clone)]
pub struct NoiseRuleSet {
    rules: Vec<NoiseRule>,
}

impl NoiseRuleSet {
    /// Compile the built-in rule table.
    pub fn builtin() -> Self {
        let rules = BUILTIN_RULES
            .iter()
            .map(|(category, pattern)| NoiseRule {
                category: *category,
                pattern: Regex::new(pattern).unwrap(),
            })
            .collect();

        Self { rules }
    }

    /// Empty rule set; nothing is noise.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Drop every rule of the given categories.
    pub fn without_categories(mut self, disabled: &[NoiseCategory]) -> Self {
        self.rules.retain(|rule| !disabled.contains(&rule.category));
        self
    }

    /// Add vendor-specific patterns under [`NoiseCategory::Custom`].
    pub fn with_patterns<I, S>(mut self, patterns: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let compiled = Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
            self.rules.push(NoiseRule {
                category: NoiseCategory::Custom,
                pattern: compiled,
            });
        }
        Ok(self)
    }

    /// Number of compiled rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Category of the first matching rule.
    pub fn first_match(&self, line: &str) -> Option<NoiseCategory> {
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(line))
            .map(|rule| rule.category)
    }
}

impl Default for NoiseRuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Decides whether a line is structurally not an item.
#[derive(Debug, Clone, Default)]
pub struct NoiseClassifier {
    rules: NoiseRuleSet,
}

impl NoiseClassifier {
    pub fn new(rules: NoiseRuleSet) -> Self {
        Self { rules }
    }

    /// True when the line is definitely not an item.
    pub fn classify(&self, line: &str) -> bool {
        self.category(line).is_some()
    }

    /// Category of the rule that flagged the line, if any.
    pub fn category(&self, line: &str) -> Option<NoiseCategory> {
        let category = self.rules.first_match(line);
        if let Some(category) = category {
            trace!("Noise ({}): {}", category, line);
        }
        category
    }

    pub fn rules(&self) -> &NoiseRuleSet {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(line: &str) -> Option<NoiseCategory> {
        NoiseClassifier::default().category(line)
    }

    #[test]
    fn test_builtin_rules_compile() {
        assert_eq!(NoiseRuleSet::builtin().len(), BUILTIN_RULES.len());
    }

    #[test]
    fn test_summary_lines() {
        for line in [
            "TOTAL 4.61",
            "Order Subtotal",
            "SUB-TOTAL 12.00",
            "TAX 0.32",
            "Subtotal",
            "BALANCE DUE 8.00",
            "COUPON SAVINGS 1.00",
            "ITEMS SOLD 4",
        ] {
            assert_eq!(category(line), Some(NoiseCategory::Summary), "{line}");
        }
    }

    #[test]
    fn test_total_substring_is_loose() {
        // Product names containing "total" are dropped as well
        assert_eq!(category("TOTAL CEREAL 4.29"), Some(NoiseCategory::Summary));
    }

    #[test]
    fn test_numeric_codes() {
        assert_eq!(category("036000291452"), Some(NoiseCategory::NumericCode));
        assert_eq!(category("123456789"), Some(NoiseCategory::NumericCode));
        assert_eq!(category("0 36000 29145 2"), Some(NoiseCategory::NumericCode));
    }

    #[test]
    fn test_dates_and_times() {
        assert_eq!(category("04/01/24 10:15"), Some(NoiseCategory::DateTime));
        assert_eq!(category("2024-04-01"), Some(NoiseCategory::DateTime));
        assert_eq!(category("12:45:03 PM"), Some(NoiseCategory::DateTime));
    }

    #[test]
    fn test_payment_lines() {
        assert_eq!(category("VISA TEND 12.00"), Some(NoiseCategory::Payment));
        assert_eq!(category("CASH 20.00"), Some(NoiseCategory::Payment));
        assert_eq!(category("CHANGE DUE 3.21"), Some(NoiseCategory::Payment));
        assert_eq!(category("NO SIGNATURE REQUIRED"), Some(NoiseCategory::Payment));
    }

    #[test]
    fn test_store_metadata() {
        assert_eq!(category("WALMART"), Some(NoiseCategory::StoreMetadata));
        assert_eq!(category("ST# 05483 OP# 009056 TE# 06"), Some(NoiseCategory::StoreMetadata));
        assert_eq!(category("STORE 1234"), Some(NoiseCategory::StoreMetadata));
        assert_eq!(category("Manager JOHN SMITH"), Some(NoiseCategory::StoreMetadata));
    }

    #[test]
    fn test_contact_lines() {
        assert_eq!(category("123 MAIN ST"), Some(NoiseCategory::Contact));
        assert_eq!(category("(650) 555-0100"), Some(NoiseCategory::Contact));
        assert_eq!(category("MOUNTAIN VIEW CA 94043"), Some(NoiseCategory::Contact));
        assert_eq!(category("600 SHOWERS DR"), Some(NoiseCategory::Contact));
    }

    #[test]
    fn test_marketing_lines() {
        assert_eq!(category("THANK YOU FOR SHOPPING"), Some(NoiseCategory::Marketing));
        assert_eq!(category("EVERY DAY LOW PRICES"), Some(NoiseCategory::Marketing));
        assert_eq!(category("Give us feedback"), Some(NoiseCategory::Marketing));
        assert_eq!(category("see survey.example.com"), Some(NoiseCategory::Marketing));
        assert_eq!(category("LOW PRICES YOU CAN TRUST"), Some(NoiseCategory::Marketing));
    }

    #[test]
    fn test_item_lines_are_not_noise() {
        let classifier = NoiseClassifier::default();
        for line in [
            "BANANAS 1.29",
            "BREAD 2X1.50 3.00",
            "Milk 1.50",
            "Bread",
            "1.50",
            "CASHEW NUTS 5.99",
            "TAXI TOY 3.49",
            "1/2 GAL MILK 3.49",
            "GV MILK 007874235186 F 2.48 X",
            "EVERYDAY BREAD 2.99",
            "THANKYOU CARD 1.99",
        ] {
            assert!(!classifier.classify(line), "{line}");
        }
    }

    #[test]
    fn test_disabled_categories() {
        let rules = NoiseRuleSet::builtin().without_categories(&[NoiseCategory::StoreMetadata]);
        let classifier = NoiseClassifier::new(rules);
        assert!(!classifier.classify("WALMART"));
        assert!(classifier.classify("TOTAL 4.61"));
    }

    #[test]
    fn test_custom_patterns() {
        let rules = NoiseRuleSet::builtin()
            .with_patterns([r"(?i)\bclub\s+card\b"])
            .unwrap();
        let classifier = NoiseClassifier::new(rules);
        assert_eq!(classifier.category("CLUB CARD 1.00"), Some(NoiseCategory::Custom));
    }

    #[test]
    fn test_invalid_custom_pattern() {
        let err = NoiseRuleSet::empty().with_patterns(["(unclosed"]).unwrap_err();
        assert!(matches!(err, RuleError::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"));
    }

    #[test]
    fn test_empty_rule_set() {
        let classifier = NoiseClassifier::new(NoiseRuleSet::empty());
        assert!(!classifier.classify("TOTAL 4.61"));
        assert!(classifier.rules().is_empty());
    }
}
