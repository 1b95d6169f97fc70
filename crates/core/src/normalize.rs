//! Input text normalization.
//!
//! Turns arbitrary pasted or extracted text into clean, trimmed lines ready
//! for segmentation: Unicode NFC, unified line endings, no control
//! characters, collapsed whitespace and no list markers.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex to collapse runs of horizontal whitespace into one space.
static WHITESPACE_COLLAPSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{00A0}\u{3000}]+").unwrap());

/// Regex matching leading list markers such as "- ", "* ", "• ", "3. " or "2) ".
static LIST_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-*+•▪●◦‣]|\d{1,2}[.)])(?:\s+|$)").unwrap());

/// Regex matching a Markdown ATX heading prefix.
static MARKDOWN_HEADING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,6}\s+").unwrap());

/// Text normalizer for segmentation input.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    /// Strip leading bullet / numbered-list markers.
    strip_list_markers: bool,

    /// Rewrite Markdown headings ("## Setup") as colon headings ("Setup:").
    markdown_headings: bool,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    /// Create a new text normalizer with default settings.
    pub fn new() -> Self {
        Self {
            strip_list_markers: true,
            markdown_headings: true,
        }
    }

    /// Set whether to strip leading list markers.
    pub fn with_strip_list_markers(mut self, strip: bool) -> Self {
        self.strip_list_markers = strip;
        self
    }

    /// Set whether Markdown headings become colon headings.
    pub fn with_markdown_headings(mut self, enabled: bool) -> Self {
        self.markdown_headings = enabled;
        self
    }

    /// Normalize a block of text, keeping line breaks.
    ///
    /// - Applies Unicode NFC composition
    /// - Converts CRLF and CR to LF
    /// - Drops control characters other than tab and newline
    /// - Collapses whitespace runs and trims each line
    pub fn normalize_text(&self, text: &str) -> String {
        let composed: String = text
            .replace("\r\n", "\n")
            .replace('\r', "\n")
            .nfc()
            .filter(|c| *c == '\n' || *c == '\t' || !c.is_control())
            .filter(|c| *c != '\u{FEFF}')
            .collect();

        composed
            .lines()
            .map(|line| WHITESPACE_COLLAPSE_REGEX.replace_all(line, " ").trim().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Normalize a single line: list markers and Markdown headings.
    ///
    /// Expects a line that has already gone through [`normalize_text`](Self::normalize_text).
    pub fn normalize_line(&self, line: &str) -> String {
        let mut line = line.trim().to_string();

        if self.markdown_headings && MARKDOWN_HEADING_REGEX.is_match(&line) {
            let heading = MARKDOWN_HEADING_REGEX.replace(&line, "").trim().to_string();
            line = if heading.is_empty() || heading.contains(':') {
                heading
            } else {
                format!("{heading}:")
            };
        }

        if self.strip_list_markers {
            line = LIST_MARKER_REGEX.replace(&line, "").trim().to_string();
        }

        line
    }

    /// Normalize text and split it into trimmed, non-empty lines.
    pub fn normalize_to_lines(&self, text: &str) -> Vec<String> {
        self.normalize_text(text)
            .lines()
            .map(|l| self.normalize_line(l))
            .filter(|l| !l.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_line_endings() {
        let normalizer = TextNormalizer::new();

        assert_eq!(normalizer.normalize_text("one\r\ntwo\rthree"), "one\ntwo\nthree");
    }

    #[test]
    fn test_collapse_whitespace() {
        let normalizer = TextNormalizer::new();

        assert_eq!(normalizer.normalize_text("Hello    world"), "Hello world");
        assert_eq!(normalizer.normalize_text("  Hello  "), "Hello");
        assert_eq!(normalizer.normalize_text("\t\tHello\t\t"), "Hello");
        assert_eq!(normalizer.normalize_text("Hello\u{00A0}\u{00A0}world"), "Hello world");
    }

    #[test]
    fn test_drops_control_characters() {
        let normalizer = TextNormalizer::new();

        assert_eq!(normalizer.normalize_text("bell\u{0007} and\u{0000} nul"), "bell and nul");
        assert_eq!(normalizer.normalize_text("\u{FEFF}BOM first"), "BOM first");
    }

    #[test]
    fn test_nfc_composition() {
        let normalizer = TextNormalizer::new();

        // "e" + combining acute accent composes to a single "é"
        let decomposed = "Caf\u{0065}\u{0301}";
        let normalized = normalizer.normalize_text(decomposed);
        assert_eq!(normalized, "Café");
        assert_eq!(normalized.chars().count(), 4);
    }

    #[test]
    fn test_strip_list_markers() {
        let normalizer = TextNormalizer::new();

        assert_eq!(normalizer.normalize_line("- first point"), "first point");
        assert_eq!(normalizer.normalize_line("* second point"), "second point");
        assert_eq!(normalizer.normalize_line("• third point"), "third point");
        assert_eq!(normalizer.normalize_line("4. fourth point"), "fourth point");
        assert_eq!(normalizer.normalize_line("5) fifth point"), "fifth point");
        // Years and hyphenated words are left alone
        assert_eq!(normalizer.normalize_line("2024 was busy"), "2024 was busy");
        assert_eq!(normalizer.normalize_line("-not a marker"), "-not a marker");
    }

    #[test]
    fn test_list_markers_kept_when_disabled() {
        let normalizer = TextNormalizer::new().with_strip_list_markers(false);

        assert_eq!(normalizer.normalize_line("- first point"), "- first point");
    }

    #[test]
    fn test_markdown_heading_becomes_colon_heading() {
        let normalizer = TextNormalizer::new();

        assert_eq!(normalizer.normalize_line("## Getting Started"), "Getting Started:");
        assert_eq!(normalizer.normalize_line("# Setup: install the tools"), "Setup: install the tools");
        assert_eq!(normalizer.normalize_line("#hashtag"), "#hashtag");
    }

    #[test]
    fn test_markdown_heading_untouched_when_disabled() {
        let normalizer = TextNormalizer::new().with_markdown_headings(false);

        assert_eq!(normalizer.normalize_line("## Getting Started"), "## Getting Started");
    }

    #[test]
    fn test_normalize_to_lines_filters_empty() {
        let normalizer = TextNormalizer::new();

        let lines = normalizer.normalize_to_lines("Hello\n\n   \n- \nWorld");
        assert_eq!(lines, vec!["Hello", "World"]);
    }
}
