//! Prescription PDF rendering.
//!
//! Lays out an A4 page top to bottom with a moving cursor:
//!
//! 1. `Prescription from Dr. <name>` with the date right-aligned beneath it
//! 2. doctor speciality, then a horizontal rule
//! 3. patient block (`Patient:`, optional `Age:` and `Treatment:`)
//! 4. an underlined `Medications:` heading with one bullet per entry, when the text has a
//!    medications section
//! 5. the remaining free text
//! 6. `Date:` line and a right-aligned signature block
//!
//! Lines wider than the printable area are word-wrapped and a new page is started whenever
//! the cursor reaches the bottom margin.

use crate::constants::PRESCRIPTION_PDF_PREFIX;
use crate::error::{CareError, CareResult};
use crate::prescription_text::parse_prescription_text;
use carebook_files::{timestamp_filename, UploadsService};
use chrono::{DateTime, Utc};
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point,
};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
/// 50 pt.
const MARGIN_MM: f32 = 17.64;
const PT_TO_MM: f32 = 0.3528;
/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;
const LINE_SPACING: f32 = 1.2;
const BODY_SIZE: f32 = 12.0;
const HEADING_SIZE: f32 = 14.0;
const TITLE_SIZE: f32 = 16.0;

/// Everything the renderer needs about one prescription.
#[derive(Debug, Clone)]
pub struct PrescriptionPdfData {
    pub doctor_name: String,
    pub doctor_speciality: String,
    pub patient_name: String,
    /// Empty when unknown; the `Age:` line is then omitted.
    pub patient_age: String,
    /// Empty when unknown; the `Treatment:` line is then omitted.
    pub treatment: String,
    pub prescription_text: String,
    pub date: DateTime<Utc>,
}

/// Output of [`render_prescription_pdf`].
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub pages: usize,
}

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    /// Baseline of the next line, in mm from the bottom edge.
    cursor: f32,
    pages: usize,
}

impl PageWriter {
    fn new(title: &str) -> CareResult<Self> {
        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| CareError::PdfRender(e.to_string()))?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            font,
            cursor: PAGE_HEIGHT_MM - MARGIN_MM,
            pages: 1,
        })
    }

    fn line_height(size: f32) -> f32 {
        size * LINE_SPACING * PT_TO_MM
    }

    fn text_width(text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * AVG_GLYPH_WIDTH * PT_TO_MM
    }

    fn ensure_space(&mut self, height: f32) {
        if self.cursor - height >= MARGIN_MM {
            return;
        }
        let (page, layer) = self.doc.add_page(
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            format!("Layer {}", self.pages + 1),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor = PAGE_HEIGHT_MM - MARGIN_MM;
        self.pages += 1;
    }

    /// Writes `text`, wrapping at the printable width. Embedded newlines start new lines.
    fn text(&mut self, text: &str, size: f32, align: Align) {
        let max_width = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
        for paragraph in text.split('\n') {
            for line in wrap(paragraph, size, max_width) {
                let height = Self::line_height(size);
                self.ensure_space(height);
                self.cursor -= height;

                let x = match align {
                    Align::Left => MARGIN_MM,
                    Align::Right => {
                        (PAGE_WIDTH_MM - MARGIN_MM - Self::text_width(&line, size)).max(MARGIN_MM)
                    }
                };
                self.layer
                    .use_text(line, size, Mm(x), Mm(self.cursor), &self.font);
            }
        }
    }

    fn move_down(&mut self, lines: f32) {
        self.cursor -= Self::line_height(BODY_SIZE) * lines;
    }

    fn rule(&self, y: f32, from_x: f32, to_x: f32) {
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(from_x), Mm(y)), false),
                (Point::new(Mm(to_x), Mm(y)), false),
            ],
            is_closed: false,
        });
    }

    fn horizontal_rule(&mut self) {
        self.ensure_space(1.0);
        self.rule(self.cursor, MARGIN_MM, PAGE_WIDTH_MM - MARGIN_MM);
    }

    /// Single-line heading with a rule under it.
    fn underlined(&mut self, text: &str, size: f32) {
        self.text(text, size, Align::Left);
        let width = Self::text_width(text, size);
        self.rule(self.cursor - 0.8, MARGIN_MM, MARGIN_MM + width);
    }

    fn finish(self) -> CareResult<RenderedPdf> {
        let pages = self.pages;
        let bytes = self
            .doc
            .save_to_bytes()
            .map_err(|e| CareError::PdfRender(e.to_string()))?;
        Ok(RenderedPdf { bytes, pages })
    }
}

/// Greedy word wrap by estimated glyph width. Words longer than a line are hard-split.
fn wrap(paragraph: &str, size: f32, max_width: f32) -> Vec<String> {
    let max_chars = ((max_width / (size * AVG_GLYPH_WIDTH * PT_TO_MM)) as usize).max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in paragraph.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word.drain(..max_chars).collect());
        }
        let word: String = word.into_iter().collect();

        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn display_date(date: &DateTime<Utc>) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// Renders a prescription into PDF bytes.
pub fn render_prescription_pdf(data: &PrescriptionPdfData) -> CareResult<RenderedPdf> {
    let mut page = PageWriter::new(&format!("Prescription for {}", data.patient_name))?;
    let date = display_date(&data.date);

    page.text(
        &format!("Prescription from Dr. {}", data.doctor_name),
        TITLE_SIZE,
        Align::Left,
    );
    page.text(&date, BODY_SIZE, Align::Right);
    page.move_down(0.5);

    page.text(&data.doctor_speciality, BODY_SIZE, Align::Left);
    page.move_down(1.0);

    page.horizontal_rule();
    page.move_down(1.0);

    page.text(
        &format!("Patient: {}", data.patient_name),
        BODY_SIZE,
        Align::Left,
    );
    if !data.patient_age.is_empty() {
        page.text(&format!("Age: {}", data.patient_age), BODY_SIZE, Align::Left);
    }
    if !data.treatment.is_empty() {
        page.text(
            &format!("Treatment: {}", data.treatment),
            BODY_SIZE,
            Align::Left,
        );
    }
    page.move_down(1.0);

    let parsed = parse_prescription_text(&data.prescription_text);
    if parsed.has_medications() {
        page.underlined("Medications:", HEADING_SIZE);
        page.move_down(0.5);
        for bullet in parsed.medication_bullets() {
            page.text(&format!("\u{2022} {}", bullet), BODY_SIZE, Align::Left);
        }
        page.move_down(1.0);
    }

    let other = parsed.other_text.trim();
    if !other.is_empty() {
        page.text(other, BODY_SIZE, Align::Left);
        page.move_down(1.0);
    }

    page.text(&format!("Date: {}", date), BODY_SIZE, Align::Left);
    page.move_down(2.0);

    page.text("Doctor's Signature:", BODY_SIZE, Align::Right);
    page.move_down(0.5);
    page.text(&data.doctor_name, BODY_SIZE, Align::Right);

    page.finish()
}

/// Renders the prescription and writes it to the uploads directory as
/// `prescription_<unix-millis>.pdf`.
///
/// Returns the public path (`/uploads/<filename>`) once the file has been written.
///
/// # Errors
///
/// Returns `CareError` if rendering fails or the file cannot be written. A partially
/// written file is left in place.
pub async fn generate_prescription_pdf(
    uploads: &UploadsService,
    data: &PrescriptionPdfData,
) -> CareResult<String> {
    let rendered = render_prescription_pdf(data)?;
    let filename = timestamp_filename(PRESCRIPTION_PDF_PREFIX, ".pdf");

    let metadata = uploads.write_generated(&filename, &rendered.bytes).await?;
    tracing::info!(
        "generated prescription PDF {} ({} pages)",
        metadata.public_path,
        rendered.pages
    );

    Ok(metadata.public_path.into_inner())
}
