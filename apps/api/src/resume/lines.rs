//! Line Classifier: decides how a single content line is rendered.
//!
//! Rule order matters: a bulleted line that also contains ` | ` is still a
//! bullet. Every exporter goes through [`classify`] so PDF, Markdown and
//! plain text agree on what a line is.

use serde::{Deserialize, Serialize};

/// Characters that open a bullet line.
pub const BULLET_MARKERS: &[char] = &['-', '•', '*'];

/// Glyph every renderer uses in place of the original marker.
pub const BULLET_GLYPH: char = '•';

/// Delimiter of "Company | Role | Start - End" lines.
const JOB_HEADER_DELIMITER: &str = " | ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Bullet,
    JobHeader,
    PlainText,
}

/// Classifies a non-empty, trimmed content line.
pub fn classify(line: &str) -> LineKind {
    if line.starts_with(BULLET_MARKERS) {
        LineKind::Bullet
    } else if line.contains(JOB_HEADER_DELIMITER) {
        LineKind::JobHeader
    } else {
        LineKind::PlainText
    }
}

/// Drops exactly one leading marker and the whitespace right after it.
///
/// Lines that do not start with a marker come back unchanged.
pub fn bullet_text(line: &str) -> &str {
    match line.strip_prefix(BULLET_MARKERS) {
        Some(rest) => rest.trim_start(),
        None => line,
    }
}

/// Display form of a bullet: canonical glyph, one space, stripped text.
pub fn bullet_display(line: &str) -> String {
    format!("{BULLET_GLYPH} {}", bullet_text(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullet_markers() {
        assert_eq!(classify("- Built things"), LineKind::Bullet);
        assert_eq!(classify("• Built things"), LineKind::Bullet);
        assert_eq!(classify("* Built things"), LineKind::Bullet);
        assert_eq!(classify("-Built things"), LineKind::Bullet);
    }

    #[test]
    fn test_bullet_wins_over_job_header() {
        assert_eq!(
            classify("- Led team of 5 | Increased revenue"),
            LineKind::Bullet
        );
    }

    #[test]
    fn test_job_header() {
        assert_eq!(
            classify("Acme Corp | Senior Engineer | 2020 - Present"),
            LineKind::JobHeader
        );
    }

    #[test]
    fn test_pipe_without_spaces_is_plain_text() {
        assert_eq!(classify("Rust|Go|Python"), LineKind::PlainText);
        assert_eq!(classify("Rust |Go"), LineKind::PlainText);
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(
            classify("Backend engineer with 8 years of experience."),
            LineKind::PlainText
        );
    }

    #[test]
    fn test_marker_later_in_line_is_not_bullet() {
        assert_eq!(classify("Skills - Rust, Go"), LineKind::PlainText);
    }

    #[test]
    fn test_bullet_text_strips_one_marker_and_spacing() {
        assert_eq!(bullet_text("-   Built things"), "Built things");
        assert_eq!(bullet_text("•\tShipped"), "Shipped");
        assert_eq!(bullet_text("* Cut costs"), "Cut costs");
    }

    #[test]
    fn test_bullet_text_strips_only_one_marker() {
        assert_eq!(bullet_text("-- double dash"), "- double dash");
        assert_eq!(bullet_text("* - nested"), "- nested");
    }

    #[test]
    fn test_bullet_text_keeps_trailing_and_internal_spacing() {
        assert_eq!(bullet_text("- a  b"), "a  b");
    }

    #[test]
    fn test_bullet_text_without_marker_is_unchanged() {
        assert_eq!(bullet_text("Plain line"), "Plain line");
    }

    #[test]
    fn test_marker_only_bullet() {
        assert_eq!(classify("-"), LineKind::Bullet);
        assert_eq!(bullet_text("-"), "");
        assert_eq!(bullet_display("-"), "• ");
    }

    #[test]
    fn test_bullet_display_uses_canonical_glyph() {
        assert_eq!(bullet_display("* Cut p99 latency"), "• Cut p99 latency");
        assert_eq!(bullet_display("•Shipped"), "• Shipped");
    }

    #[test]
    fn test_line_kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&LineKind::JobHeader).unwrap(),
            "\"job_header\""
        );
    }
}
