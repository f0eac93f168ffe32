//! Plain-text and Markdown exporters.

use crate::resume::document::{HeaderBlock, SectionBlock};
use crate::resume::{LineKind, ResumeDocument, TextDirection};

const CONTACT_SEPARATOR: &str = " | ";

fn header_lines(header: &HeaderBlock) -> Vec<String> {
    let mut lines = Vec::new();
    lines.extend(header.name.clone());
    lines.extend(header.headline.clone());
    lines.extend(header.contact_line(CONTACT_SEPARATOR));
    lines
}

/// Renders the document as plain text. Feeding the output back through the
/// segmenter yields the same headed sections.
pub fn render_plain_text(document: &ResumeDocument) -> String {
    let mut blocks: Vec<String> = Vec::new();

    if let Some(header) = &document.header {
        let lines = header_lines(header);
        if !lines.is_empty() {
            blocks.push(lines.join("\n"));
        }
    }

    for section in &document.sections {
        let mut lines: Vec<&str> = Vec::with_capacity(section.entries.len() + 1);
        lines.extend(section.heading.as_deref());
        lines.extend(section.entries.iter().map(|e| e.text.as_str()));
        if !lines.is_empty() {
            blocks.push(lines.join("\n"));
        }
    }

    finish(blocks.join("\n\n"))
}

fn markdown_header(header: &HeaderBlock, blocks: &mut Vec<String>) {
    if let Some(name) = &header.name {
        blocks.push(format!("# {name}"));
    }
    if let Some(headline) = &header.headline {
        blocks.push(format!("**{headline}**"));
    }
    if let Some(contact) = header.contact_line(CONTACT_SEPARATOR) {
        blocks.push(contact);
    }
}

fn markdown_section(section: &SectionBlock, blocks: &mut Vec<String>) {
    if let Some(heading) = &section.heading {
        blocks.push(format!("## {heading}"));
    }

    // Consecutive bullets form one list block.
    let mut list: Vec<String> = Vec::new();
    for entry in &section.entries {
        if entry.kind == LineKind::Bullet {
            list.push(format!("- {}", entry.body()));
            continue;
        }
        if !list.is_empty() {
            blocks.push(std::mem::take(&mut list).join("\n"));
        }
        match entry.kind {
            LineKind::JobHeader => blocks.push(format!("**{}**", entry.body())),
            _ => blocks.push(entry.body().to_string()),
        }
    }
    if !list.is_empty() {
        blocks.push(list.join("\n"));
    }
}

/// Renders the document as Markdown. Right-to-left documents are wrapped in
/// an HTML block with `dir="rtl"`.
pub fn render_markdown(document: &ResumeDocument) -> String {
    let mut blocks: Vec<String> = Vec::new();

    if let Some(header) = &document.header {
        markdown_header(header, &mut blocks);
    }
    for section in &document.sections {
        markdown_section(section, &mut blocks);
    }

    let body = blocks.join("\n\n");
    match document.direction {
        TextDirection::Ltr => finish(body),
        TextDirection::Rtl if body.is_empty() => String::new(),
        TextDirection::Rtl => format!("<div dir=\"rtl\">\n\n{body}\n\n</div>\n"),
    }
}

fn finish(mut body: String) -> String {
    if !body.is_empty() {
        body.push('\n');
    }
    body
}
