//! PDF export
//!
//! A4 portrait, Helvetica 12pt, a centered `Report` title and a bordered
//! grid: one header cell per column, one row per record. Rows that do not
//! fit above the bottom margin continue on a new page under a repeated
//! header.

use flexsearch_core::error::{FlexsearchError, Result};
use flexsearch_core::models::Table;
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point,
};

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const ROW_HEIGHT_MM: f32 = 10.0;
pub const BOTTOM_MARGIN_MM: f32 = 20.0;
const TOP_MARGIN_MM: f32 = 10.0;
const FONT_SIZE_PT: f32 = 12.0;
const TITLE: &str = "Report";
const LAYER: &str = "Layer 1";

/// Average Helvetica glyph advance at 12pt, in mm
const AVG_CHAR_WIDTH_MM: f32 = 2.3;
const CELL_PADDING_MM: f32 = 1.0;
const ELLIPSIS: &str = "...";

/// Render `table` as a PDF report
pub fn to_pdf(table: &Table) -> Result<Vec<u8>> {
    render(table).map(|(bytes, _)| bytes)
}

/// Render the report, also returning the number of pages written
fn render(table: &Table) -> Result<(Vec<u8>, usize)> {
    let (doc, page, layer) = PdfDocument::new(TITLE, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER);
    let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(export_error)?;

    let mut writer = GridWriter {
        doc: &doc,
        layer: doc.get_page(page).get_layer(layer),
        font: &font,
        columns: &table.columns,
        col_width: column_width(table.columns.len()),
        cursor: PAGE_HEIGHT_MM - TOP_MARGIN_MM,
        pages: 1,
    };

    writer.title();

    if !table.columns.is_empty() {
        writer.header();
        for row in table.string_rows() {
            writer.row(&row);
        }
    }

    let pages = writer.pages;
    let bytes = doc.save_to_bytes().map_err(export_error)?;
    Ok((bytes, pages))
}

/// Column width for `n` columns: page width divided evenly, minus 1mm
pub fn column_width(n: usize) -> f32 {
    if n == 0 {
        return 0.0;
    }
    PAGE_WIDTH_MM / n as f32 - 1.0
}

/// Shorten `text` to what fits in a cell of `width` mm, marking the cut
pub fn fit_text(text: &str, width: f32) -> String {
    let text: String = text
        .chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            c if (c as u32) < 0x20 || (c as u32) > 0xFF => '?',
            c => c,
        })
        .collect();

    let capacity = ((width - 2.0 * CELL_PADDING_MM) / AVG_CHAR_WIDTH_MM).floor().max(0.0) as usize;
    let count = text.chars().count();
    if count <= capacity {
        return text;
    }
    if capacity <= ELLIPSIS.len() {
        return ELLIPSIS.chars().take(capacity).collect();
    }
    let mut shortened: String = text.chars().take(capacity - ELLIPSIS.len()).collect();
    shortened.push_str(ELLIPSIS);
    shortened
}

fn export_error(err: printpdf::Error) -> FlexsearchError {
    FlexsearchError::Export { format: "pdf".to_string(), reason: err.to_string() }
}

struct GridWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    font: &'a IndirectFontRef,
    columns: &'a [String],
    col_width: f32,
    /// Top edge of the next line, measured from the page bottom
    cursor: f32,
    pages: usize,
}

impl GridWriter<'_> {
    fn left(&self) -> f32 {
        let table_width = self.col_width * self.columns.len() as f32;
        ((PAGE_WIDTH_MM - table_width) / 2.0).max(0.0)
    }

    fn title(&mut self) {
        let width = TITLE.len() as f32 * AVG_CHAR_WIDTH_MM;
        let x = (PAGE_WIDTH_MM - width) / 2.0;
        self.layer.use_text(
            TITLE,
            FONT_SIZE_PT,
            Mm(x),
            Mm(self.cursor - ROW_HEIGHT_MM + 3.5),
            self.font,
        );
        self.cursor -= ROW_HEIGHT_MM;
    }

    fn header(&mut self) {
        let columns = self.columns;
        self.cells(columns.iter().map(String::as_str));
    }

    fn row(&mut self, cells: &[String]) {
        if self.cursor - ROW_HEIGHT_MM < BOTTOM_MARGIN_MM {
            self.new_page();
            self.header();
        }
        self.cells(cells.iter().map(String::as_str));
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER);
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor = PAGE_HEIGHT_MM - TOP_MARGIN_MM;
        self.pages += 1;
    }

    fn cells<'c>(&mut self, cells: impl Iterator<Item = &'c str>) {
        let top = self.cursor;
        let bottom = top - ROW_HEIGHT_MM;
        let mut x = self.left();

        for text in cells {
            self.layer.add_line(Line {
                points: vec![
                    (Point::new(Mm(x), Mm(bottom)), false),
                    (Point::new(Mm(x + self.col_width), Mm(bottom)), false),
                    (Point::new(Mm(x + self.col_width), Mm(top)), false),
                    (Point::new(Mm(x), Mm(top)), false),
                ],
                is_closed: true,
            });
            self.layer.use_text(
                fit_text(text, self.col_width),
                FONT_SIZE_PT,
                Mm(x + CELL_PADDING_MM),
                Mm(bottom + 3.5),
                self.font,
            );
            x += self.col_width;
        }

        self.cursor = bottom;
    }
}
