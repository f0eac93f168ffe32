//! PDF exporter (printpdf, builtin Helvetica faces).
//!
//! Layout is a single flowing column on A4. The cursor moves down from the
//! top margin; a new page starts when the next line would cross the bottom
//! margin. Section headings are kept together with at least one body line.
//!
//! Builtin fonts only cover Latin text. Right-to-left documents are aligned
//! to the right margin, but glyph coverage for Hebrew needs an embedded font.

use std::io::BufWriter;

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rgb,
};

use crate::errors::AppError;
use crate::export::metrics::{FontMetrics, HELVETICA, HELVETICA_BOLD};
use crate::resume::document::{ContentLine, HeaderBlock, SectionBlock};
use crate::resume::{LineKind, ResumeDocument, TextDirection};

const DOCUMENT_TITLE: &str = "Tailored Resume";
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
/// 40pt on every side.
const MARGIN_MM: f32 = 14.1;
const TEXT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
const LINE_HEIGHT_FACTOR: f32 = 1.3;
const PT_TO_MM: f32 = 25.4 / 72.0;
const CONTACT_SEPARATOR: &str = " | ";

const PRIMARY: (u8, u8, u8) = (0x4f, 0x46, 0xe5);
const TEXT_DARK: (u8, u8, u8) = (0x1f, 0x29, 0x37);
const TEXT_LIGHT: (u8, u8, u8) = (0x6b, 0x72, 0x80);
const DIVIDER: (u8, u8, u8) = (0xe5, 0xe7, 0xeb);

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Align {
    Start,
    Center,
}

/// Paragraph style, sizes in points and spacing in millimetres.
#[derive(Debug, Clone, Copy)]
struct TextStyle {
    size_pt: f32,
    bold: bool,
    color: (u8, u8, u8),
    align: Align,
    indent_mm: f32,
    space_before_mm: f32,
    space_after_mm: f32,
}

impl TextStyle {
    const fn body(size_pt: f32) -> Self {
        Self {
            size_pt,
            bold: false,
            color: TEXT_DARK,
            align: Align::Start,
            indent_mm: 0.0,
            space_before_mm: 0.7,
            space_after_mm: 0.7,
        }
    }

    fn line_height_mm(&self) -> f32 {
        self.size_pt * LINE_HEIGHT_FACTOR * PT_TO_MM
    }

    fn metrics(&self) -> &'static FontMetrics {
        if self.bold {
            &HELVETICA_BOLD
        } else {
            &HELVETICA
        }
    }

    fn width_mm(&self, text: &str) -> f32 {
        self.metrics().measure_str(text) * self.size_pt * PT_TO_MM
    }

    fn max_width_em(&self) -> f32 {
        (TEXT_WIDTH_MM - self.indent_mm) / (self.size_pt * PT_TO_MM)
    }
}

const NAME: TextStyle = TextStyle {
    bold: true,
    align: Align::Center,
    space_before_mm: 0.0,
    space_after_mm: 1.4,
    ..TextStyle::body(24.0)
};

const HEADLINE: TextStyle = TextStyle {
    color: PRIMARY,
    align: Align::Center,
    space_before_mm: 0.0,
    space_after_mm: 5.6,
    ..TextStyle::body(14.0)
};

const CONTACT: TextStyle = TextStyle {
    color: TEXT_LIGHT,
    align: Align::Center,
    space_before_mm: 0.0,
    space_after_mm: 7.0,
    ..TextStyle::body(10.0)
};

const SECTION_HEADING: TextStyle = TextStyle {
    bold: true,
    color: PRIMARY,
    space_before_mm: 5.6,
    space_after_mm: 1.4,
    ..TextStyle::body(12.0)
};

const JOB_HEADER: TextStyle = TextStyle {
    bold: true,
    space_before_mm: 2.8,
    space_after_mm: 1.4,
    ..TextStyle::body(11.0)
};

const BULLET: TextStyle = TextStyle {
    indent_mm: 4.2,
    ..TextStyle::body(10.0)
};

const PLAIN: TextStyle = TextStyle::body(10.0);

/// Gap between a section heading's divider rule and the first body line.
const DIVIDER_GAP_MM: f32 = 2.8;

fn style_for(kind: LineKind) -> &'static TextStyle {
    match kind {
        LineKind::Bullet => &BULLET,
        LineKind::JobHeader => &JOB_HEADER,
        LineKind::PlainText => &PLAIN,
    }
}

struct PdfRenderer {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    direction: TextDirection,
    /// Baseline cursor, millimetres from the bottom edge.
    y: f32,
    pages: usize,
}

impl PdfRenderer {
    fn new(direction: TextDirection) -> Result<Self, AppError> {
        let (doc, page, layer) = PdfDocument::new(
            DOCUMENT_TITLE,
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );
        let layer = doc.get_page(page).get_layer(layer);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| AppError::Render(format!("PDF font error: {e}")))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| AppError::Render(format!("PDF font error: {e}")))?;

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            direction,
            y: PAGE_HEIGHT_MM - MARGIN_MM,
            pages: 1,
        })
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT_MM - MARGIN_MM;
        self.pages += 1;
    }

    /// Breaks the page unless `needed_mm` still fits above the bottom margin.
    fn ensure_space(&mut self, needed_mm: f32) {
        if self.y - needed_mm < MARGIN_MM {
            self.new_page();
        }
    }

    fn x_for(&self, style: &TextStyle, width_mm: f32) -> f32 {
        match (style.align, self.direction) {
            (Align::Center, _) => MARGIN_MM + (TEXT_WIDTH_MM - width_mm).max(0.0) / 2.0,
            (Align::Start, TextDirection::Ltr) => MARGIN_MM + style.indent_mm,
            (Align::Start, TextDirection::Rtl) => {
                (PAGE_WIDTH_MM - MARGIN_MM - style.indent_mm - width_mm).max(MARGIN_MM)
            }
        }
    }

    fn write_paragraph(&mut self, text: &str, style: &TextStyle) {
        let lines = style.metrics().wrap_to_width(text, style.max_width_em());
        if lines.is_empty() {
            return;
        }

        self.y -= style.space_before_mm;
        let font = if style.bold {
            self.bold.clone()
        } else {
            self.regular.clone()
        };
        self.layer.set_fill_color(rgb(style.color));

        for line in &lines {
            let height = style.line_height_mm();
            if self.y - height < MARGIN_MM {
                self.new_page();
                self.layer.set_fill_color(rgb(style.color));
            }
            self.y -= height;
            let x = self.x_for(style, style.width_mm(line));
            self.layer
                .use_text(line.as_str(), style.size_pt, Mm(x), Mm(self.y), &font);
        }

        self.y -= style.space_after_mm;
    }

    fn write_divider(&mut self) {
        self.layer.set_outline_color(rgb(DIVIDER));
        self.layer.set_outline_thickness(0.75);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(MARGIN_MM), Mm(self.y)), false),
                (Point::new(Mm(PAGE_WIDTH_MM - MARGIN_MM), Mm(self.y)), false),
            ],
            is_closed: false,
        });
        self.y -= DIVIDER_GAP_MM;
    }

    fn write_header(&mut self, header: &HeaderBlock) {
        if let Some(name) = &header.name {
            self.write_paragraph(name, &NAME);
        }
        if let Some(headline) = &header.headline {
            self.write_paragraph(headline, &HEADLINE);
        }
        if let Some(contact) = header.contact_line(CONTACT_SEPARATOR) {
            self.write_paragraph(&contact, &CONTACT);
        }
    }

    fn write_section(&mut self, section: &SectionBlock) {
        if let Some(heading) = &section.heading {
            let first_body = section
                .entries
                .first()
                .map(|e| style_for(e.kind).line_height_mm())
                .unwrap_or(0.0);
            self.ensure_space(
                SECTION_HEADING.space_before_mm
                    + SECTION_HEADING.line_height_mm()
                    + DIVIDER_GAP_MM
                    + first_body,
            );
            self.write_paragraph(heading, &SECTION_HEADING);
            self.write_divider();
        }
        for entry in &section.entries {
            self.write_entry(entry);
        }
    }

    fn write_entry(&mut self, entry: &ContentLine) {
        self.write_paragraph(&entry.text, style_for(entry.kind));
    }

    fn render(&mut self, document: &ResumeDocument) {
        if let Some(header) = &document.header {
            self.write_header(header);
        }
        for section in &document.sections {
            self.write_section(section);
        }
    }

    fn finish(self) -> Result<Vec<u8>, AppError> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buf)
            .map_err(|e| AppError::Render(format!("PDF save error: {e}")))?;
        buf.into_inner()
            .map_err(|e| AppError::Render(format!("PDF buffer error: {e}")))
    }
}

/// Renders a resume document to PDF bytes.
pub fn render_pdf(document: &ResumeDocument) -> Result<Vec<u8>, AppError> {
    let mut renderer = PdfRenderer::new(document.direction)?;
    renderer.render(document);
    tracing::debug!(pages = renderer.pages, "Rendered resume PDF");
    renderer.finish()
}
