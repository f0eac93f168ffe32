//! Renderer-neutral resume document.
//!
//! Every exporter consumes a [`ResumeDocument`] instead of re-walking the raw
//! sections, so the positional header convention and the line classification
//! are applied in exactly one place.

use serde::{Deserialize, Serialize};

use crate::resume::lines::{bullet_display, classify, LineKind, BULLET_GLYPH};
use crate::resume::sections::{segment, ResumeSection};

/// Reading direction of the generated resume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

/// Name, headline and contact details from the leading headerless block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderBlock {
    pub name: Option<String>,
    pub headline: Option<String>,
    pub contact: Vec<String>,
}

impl HeaderBlock {
    fn from_lines(lines: &[String]) -> Self {
        let mut iter = lines.iter().cloned();
        Self {
            name: iter.next(),
            headline: iter.next(),
            contact: iter.collect(),
        }
    }

    /// Contact lines joined into a single line, or `None` if there are none.
    pub fn contact_line(&self, separator: &str) -> Option<String> {
        if self.contact.is_empty() {
            None
        } else {
            Some(self.contact.join(separator))
        }
    }
}

/// A classified content line with its display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentLine {
    pub kind: LineKind,
    /// Bullets carry the canonical glyph; other kinds are verbatim.
    pub text: String,
}

impl ContentLine {
    pub fn from_line(line: &str) -> Self {
        let kind = classify(line);
        let text = match kind {
            LineKind::Bullet => bullet_display(line),
            LineKind::JobHeader | LineKind::PlainText => line.to_string(),
        };
        Self { kind, text }
    }

    /// Display text without the bullet glyph, for formats with their own list syntax.
    pub fn body(&self) -> &str {
        match self.kind {
            LineKind::Bullet => self
                .text
                .strip_prefix(BULLET_GLYPH)
                .unwrap_or(&self.text)
                .trim_start(),
            LineKind::JobHeader | LineKind::PlainText => &self.text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionBlock {
    pub heading: Option<String>,
    pub entries: Vec<ContentLine>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub direction: TextDirection,
    pub header: Option<HeaderBlock>,
    pub sections: Vec<SectionBlock>,
}

impl ResumeDocument {
    /// Segments `text` and maps the result into a document.
    pub fn from_text(text: &str, direction: TextDirection) -> Self {
        Self::from_sections(&segment(text), direction)
    }

    /// Only the first section can become the header block, and only when it
    /// has no heading. A headerless section anywhere else renders as a plain
    /// section without a title.
    pub fn from_sections(sections: &[ResumeSection], direction: TextDirection) -> Self {
        let mut header = None;
        let mut blocks = Vec::with_capacity(sections.len());

        for (i, section) in sections.iter().enumerate() {
            if i == 0 && section.is_headerless() {
                header = Some(HeaderBlock::from_lines(&section.lines));
                continue;
            }
            blocks.push(SectionBlock {
                heading: (!section.heading.is_empty()).then(|| section.heading.clone()),
                entries: section
                    .lines
                    .iter()
                    .map(|l| ContentLine::from_line(l))
                    .collect(),
            });
        }

        Self {
            direction,
            header,
            sections: blocks,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_none() && self.sections.is_empty()
    }

    /// Total number of classified lines across all sections.
    pub fn entry_count(&self) -> usize {
        self.sections.iter().map(|s| s.entries.len()).sum()
    }
}
