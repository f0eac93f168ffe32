//! Resume Segmenter: splits free-form resume text into headed sections.
//!
//! # Header heuristic
//! A trimmed line is a section header when it is unchanged by uppercasing,
//! is 3–29 characters long, and does not open with a bullet marker.
//! The check looks at one line at a time; surrounding lines never matter.
//!
//! Lines before the first header form a leading section with an empty heading.
//! Renderers read that block positionally (name, headline, contact).

use serde::{Deserialize, Serialize};

use crate::resume::lines::BULLET_MARKERS;

/// Lengths are measured in UTF-16 code units so that characters outside the
/// BMP count the same way the generating model's tooling counts them.
const HEADER_MIN_EXCLUSIVE: usize = 2;
const HEADER_MAX_EXCLUSIVE: usize = 30;

/// A run of content lines under zero or one heading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeSection {
    /// Empty only for the leading block (name / title / contact).
    pub heading: String,
    /// Non-empty trimmed lines, in input order.
    pub lines: Vec<String>,
}

impl ResumeSection {
    fn headed(heading: &str) -> Self {
        Self {
            heading: heading.to_string(),
            lines: Vec::new(),
        }
    }

    /// True for the synthetic leading block.
    pub fn is_headerless(&self) -> bool {
        self.heading.is_empty()
    }

    fn is_empty(&self) -> bool {
        self.heading.is_empty() && self.lines.is_empty()
    }
}

/// Segments resume text into an ordered list of sections.
///
/// Total over all inputs: empty text yields an empty list, text without any
/// header yields a single headerless section.
pub fn segment(text: &str) -> Vec<ResumeSection> {
    let mut sections = Vec::new();
    let mut current = ResumeSection::default();

    for raw in text.split('\n') {
        let line = trim_line(raw);
        if line.is_empty() {
            continue;
        }

        if is_section_header(line) {
            if !current.is_empty() {
                sections.push(current);
            }
            current = ResumeSection::headed(line);
        } else {
            current.lines.push(line.to_string());
        }
    }

    if !current.is_empty() {
        sections.push(current);
    }

    sections
}

/// Applies the header heuristic to a single, already-trimmed line.
pub fn is_section_header(line: &str) -> bool {
    let len = line.encode_utf16().count();
    if len <= HEADER_MIN_EXCLUSIVE || len >= HEADER_MAX_EXCLUSIVE {
        return false;
    }
    if line.starts_with(BULLET_MARKERS) {
        return false;
    }
    line.to_uppercase() == line
}

/// Strips surrounding whitespace, including a stray byte-order mark.
pub(crate) fn trim_line(raw: &str) -> &str {
    raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(heading: &str, lines: &[&str]) -> ResumeSection {
        ResumeSection {
            heading: heading.to_string(),
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }

    /// Non-blank trimmed input lines, in order.
    fn non_blank_lines(text: &str) -> Vec<String> {
        text.split('\n')
            .map(trim_line)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect()
    }

    /// Headings and lines flattened back into input order.
    fn flatten(sections: &[ResumeSection]) -> Vec<String> {
        let mut out = Vec::new();
        for s in sections {
            if !s.heading.is_empty() {
                out.push(s.heading.clone());
            }
            out.extend(s.lines.iter().cloned());
        }
        out
    }

    const SAMPLE: &str = "\
  Jane Cohen
Senior Backend Engineer
jane@example.com
Tel Aviv, Israel

SUMMARY
Backend engineer with 8 years of experience in   distributed systems.

EXPERIENCE
Acme Corp | Senior Engineer | 2020 - Present
- Led team of 5 | Increased revenue
• Migrated billing to Rust
* Cut p99 latency by 40%

EDUCATION
BSc Computer Science, Technion
";

    #[test]
    fn test_empty_input_yields_no_sections() {
        assert!(segment("").is_empty());
    }

    #[test]
    fn test_whitespace_only_input_yields_no_sections() {
        assert!(segment("  \n\t\n\r\n   ").is_empty());
    }

    #[test]
    fn test_reference_example() {
        // An all-caps name satisfies the header rule on its own, so it heads
        // the first section rather than sitting in a headerless block.
        let text = "JOHN DOE\nSoftware Engineer\nEXPERIENCE\n- Built things\nEDUCATION\nBSc Computing";
        let sections = segment(text);
        assert_eq!(
            sections,
            vec![
                section("JOHN DOE", &["Software Engineer"]),
                section("EXPERIENCE", &["- Built things"]),
                section("EDUCATION", &["BSc Computing"]),
            ]
        );
    }

    #[test]
    fn test_mixed_case_name_stays_in_headerless_block() {
        let sections = segment("John Doe\nSoftware Engineer\nEXPERIENCE\n- Built things");
        assert_eq!(
            sections,
            vec![
                section("", &["John Doe", "Software Engineer"]),
                section("EXPERIENCE", &["- Built things"]),
            ]
        );
    }

    #[test]
    fn test_sample_sections_and_order() {
        let sections = segment(SAMPLE);
        let headings: Vec<&str> = sections.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(headings, vec!["", "SUMMARY", "EXPERIENCE", "EDUCATION"]);
        assert_eq!(
            sections[0].lines,
            vec![
                "Jane Cohen",
                "Senior Backend Engineer",
                "jane@example.com",
                "Tel Aviv, Israel"
            ]
        );
        assert_eq!(sections[2].lines.len(), 4);
    }

    #[test]
    fn test_completeness_and_order_preserved() {
        let sections = segment(SAMPLE);
        assert_eq!(flatten(&sections), non_blank_lines(SAMPLE));
    }

    #[test]
    fn test_content_lines_are_exactly_the_non_header_lines() {
        let sections = segment(SAMPLE);
        let content: Vec<String> = sections.iter().flat_map(|s| s.lines.clone()).collect();
        let expected: Vec<String> = non_blank_lines(SAMPLE)
            .into_iter()
            .filter(|l| !is_section_header(l))
            .collect();
        assert_eq!(content, expected);
    }

    #[test]
    fn test_headerless_section_only_ever_first() {
        let sections = segment(SAMPLE);
        assert!(sections.iter().skip(1).all(|s| !s.is_headerless()));
        assert_eq!(sections.iter().filter(|s| s.is_headerless()).count(), 1);
    }

    #[test]
    fn test_input_starting_with_header_has_no_leading_empty_section() {
        let sections = segment("\n\nSKILLS\nRust, Go\n");
        assert_eq!(sections, vec![section("SKILLS", &["Rust, Go"])]);
    }

    #[test]
    fn test_header_only_input_pushes_each_header() {
        let sections = segment("SKILLS\nEXPERIENCE\n\nEDUCATION");
        assert_eq!(
            sections,
            vec![
                section("SKILLS", &[]),
                section("EXPERIENCE", &[]),
                section("EDUCATION", &[]),
            ]
        );
    }

    #[test]
    fn test_text_without_headers_is_one_block() {
        let text = "Just a paragraph\nwith two lines";
        let sections = segment(text);
        assert_eq!(sections, vec![section("", &["Just a paragraph", "with two lines"])]);
    }

    #[test]
    fn test_blank_lines_are_not_boundaries() {
        let sections = segment("EXPERIENCE\nfirst\n\n\n   \nsecond");
        assert_eq!(sections, vec![section("EXPERIENCE", &["first", "second"])]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let sections = segment("Name\r\nSKILLS\r\nRust\r\n");
        assert_eq!(
            sections,
            vec![section("", &["Name"]), section("SKILLS", &["Rust"])]
        );
    }

    #[test]
    fn test_internal_whitespace_preserved() {
        let sections = segment("   Built   the  thing   \n");
        assert_eq!(sections[0].lines, vec!["Built   the  thing"]);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(segment(SAMPLE), segment(SAMPLE));
    }

    #[test]
    fn test_header_length_lower_bound() {
        assert!(!is_section_header("OK"));
        assert!(!is_section_header("A"));
        assert!(is_section_header("CV!"));
        let sections = segment("EXPERIENCE\nOK");
        assert_eq!(sections, vec![section("EXPERIENCE", &["OK"])]);
    }

    #[test]
    fn test_header_length_upper_bound() {
        let twenty_nine = "A".repeat(29);
        let thirty = "A".repeat(30);
        assert!(is_section_header(&twenty_nine));
        assert!(!is_section_header(&thirty));
        assert!(!is_section_header("PROFESSIONAL EXPERIENCE AND ACHIEVEMENTS"));
    }

    #[test]
    fn test_bullet_markers_are_never_headers() {
        assert!(!is_section_header("• AWS"));
        assert!(!is_section_header("- AWS"));
        assert!(!is_section_header("* AWS"));
        let sections = segment("SKILLS\n• AWS\n- GCP");
        assert_eq!(sections, vec![section("SKILLS", &["• AWS", "- GCP"])]);
    }

    #[test]
    fn test_mixed_case_is_not_header() {
        assert!(!is_section_header("Experience"));
        assert!(!is_section_header("EXPERIENCe"));
    }

    #[test]
    fn test_non_latin_scripts_without_case_are_headers() {
        // Hebrew has no case, so a short Hebrew line passes the uppercase test.
        assert!(is_section_header("ניסיון"));
    }

    #[test]
    fn test_symbol_and_digit_lines_within_bounds_are_headers() {
        assert!(is_section_header("2019 - 2021"));
        assert!(is_section_header("==="));
    }

    #[test]
    fn test_length_counts_utf16_units() {
        // Each emoji is two UTF-16 code units: 15 of them is 30 units.
        let emoji = "😀".repeat(15);
        assert!(!is_section_header(&emoji));
        let shorter = "😀".repeat(14);
        assert!(is_section_header(&shorter));
    }

    #[test]
    fn test_byte_order_mark_is_trimmed() {
        let sections = segment("\u{feff}SUMMARY\ntext");
        assert_eq!(sections, vec![section("SUMMARY", &["text"])]);
    }
}
