//! Line normalization for OCR output.

use crate::models::receipt::RawLine;

use super::patterns::{DECIMAL_SPACING, OCR_ARTIFACTS, WHITESPACE_RUN};

/// Shortest line kept when no threshold is configured.
pub const DEFAULT_MIN_LINE_LENGTH: usize = 3;

/// Clean a single line: drop pipe/backslash artifacts, rejoin split
/// decimals and collapse whitespace.
pub fn normalize_line(line: &str) -> String {
    let cleaned = OCR_ARTIFACTS.replace_all(line, " ");
    let cleaned = DECIMAL_SPACING.replace_all(&cleaned, "$1.$2");
    let cleaned = WHITESPACE_RUN.replace_all(&cleaned, " ");
    cleaned.trim().to_string()
}

/// Split text into normalized lines, keeping the input line index of each.
///
/// Lines shorter than `min_len` characters after cleaning are dropped.
pub fn normalize_lines(text: &str, min_len: usize) -> Vec<RawLine> {
    text.lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let cleaned = normalize_line(line);
            (cleaned.chars().count() >= min_len).then(|| RawLine::new(index, cleaned))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_line() {
        assert_eq!(normalize_line("  BANANAS    1.29  "), "BANANAS 1.29");
        assert_eq!(normalize_line("| MILK | 2 .48"), "MILK 2.48");
        assert_eq!(normalize_line("EGGS\\ 3. 19"), "EGGS 3.19");
        assert_eq!(normalize_line("\tBREAD\t2.00\r"), "BREAD 2.00");
    }

    #[test]
    fn test_drops_short_and_empty_lines() {
        let lines = normalize_lines("AB\n\n   \nMILK 1.50\n||\nOK!", DEFAULT_MIN_LINE_LENGTH);
        assert_eq!(
            lines,
            vec![RawLine::new(3, "MILK 1.50"), RawLine::new(5, "OK!")]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(normalize_lines("", DEFAULT_MIN_LINE_LENGTH).is_empty());
        assert!(normalize_lines(" \n \t \n", DEFAULT_MIN_LINE_LENGTH).is_empty());
    }

    #[test]
    fn test_crlf_input_keeps_indices() {
        let lines = normalize_lines("WALMART\r\nBANANAS 1.29\r\n", DEFAULT_MIN_LINE_LENGTH);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].index, 1);
        assert_eq!(lines[1].text, "BANANAS 1.29");
    }
}
