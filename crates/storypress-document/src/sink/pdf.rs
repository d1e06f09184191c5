// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF sink — turn layout primitives into a PDF using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: each sheet is a `PdfPage` holding a
// `Vec<Op>`, and the whole document is serialised once via
// `PdfDocument::save()`. PDF space has its origin at the bottom-left, so every
// y coordinate coming from layout (measured from the top) is flipped here.
// The saved bytes then go through `reencode_text_latin1` so that shown strings
// match the fonts' single-byte WinAnsi encoding.

use printpdf::{
    BuiltinFont, Color, Line, LinePoint, Mm, Op, PaintMode, PdfDocument, PdfPage,
    PdfSaveOptions, PdfWarnMsg, Point, Polygon, PolygonRing, Pt, Rgb, TextItem, WindingOrder,
};
use storypress_core::error::{Result, StorypressError};
use tracing::{debug, instrument, warn};

use crate::pdf::reencode_text_latin1;

use super::{DocumentSink, FontFace, PlacedText, Rect, RgbColor, Rule, SheetGeometry};

struct PendingSheet {
    geometry: SheetGeometry,
    ops: Vec<Op>,
}

/// Collects printpdf operations sheet by sheet and serialises them on
/// [`DocumentSink::finish`].
pub struct PdfSink {
    /// Title stored in the PDF /Info dictionary.
    title: String,
    pages: Vec<PdfPage>,
    current: Option<PendingSheet>,
}

impl PdfSink {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            pages: Vec::new(),
            current: None,
        }
    }

    fn flush_current(&mut self) {
        if let Some(sheet) = self.current.take() {
            self.pages.push(PdfPage::new(
                Mm(sheet.geometry.width_mm),
                Mm(sheet.geometry.height_mm),
                sheet.ops,
            ));
        }
    }

    fn ops(&mut self) -> Option<(&SheetGeometry, &mut Vec<Op>)> {
        self.current
            .as_mut()
            .map(|sheet| (&sheet.geometry, &mut sheet.ops))
    }
}

fn pdf_color(color: RgbColor) -> Color {
    Color::Rgb(Rgb {
        r: f32::from(color.r) / 255.0,
        g: f32::from(color.g) / 255.0,
        b: f32::from(color.b) / 255.0,
        icc_profile: None,
    })
}

fn builtin_font(face: FontFace) -> BuiltinFont {
    match face {
        FontFace::Helvetica => BuiltinFont::Helvetica,
        FontFace::HelveticaBold => BuiltinFont::HelveticaBold,
        FontFace::HelveticaOblique => BuiltinFont::HelveticaOblique,
    }
}

/// Layout coordinates (top-left origin, mm) to a PDF point.
fn to_point(geometry: &SheetGeometry, x_mm: f32, y_from_top_mm: f32) -> Point {
    Point {
        x: Mm(x_mm).into_pt(),
        y: Mm(geometry.height_mm - y_from_top_mm).into_pt(),
    }
}

fn corner(point: Point) -> LinePoint {
    LinePoint {
        p: point,
        bezier: false,
    }
}

impl DocumentSink for PdfSink {
    type Output = Vec<u8>;

    fn start_sheet(&mut self, number: u32, geometry: &SheetGeometry) {
        self.flush_current();
        debug!(number, "starting PDF page");
        self.current = Some(PendingSheet {
            geometry: *geometry,
            ops: Vec::new(),
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: RgbColor) {
        let Some((geometry, ops)) = self.ops() else {
            return;
        };

        let left = rect.x_mm;
        let right = rect.x_mm + rect.width_mm;
        let top = rect.y_mm;
        let bottom = rect.y_mm + rect.height_mm;
        let points = vec![
            corner(to_point(geometry, left, top)),
            corner(to_point(geometry, right, top)),
            corner(to_point(geometry, right, bottom)),
            corner(to_point(geometry, left, bottom)),
        ];

        ops.push(Op::SaveGraphicsState);
        ops.push(Op::SetFillColor {
            col: pdf_color(color),
        });
        ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![PolygonRing { points }],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            },
        });
        ops.push(Op::RestoreGraphicsState);
    }

    fn draw_rule(&mut self, rule: &Rule) {
        let Some((geometry, ops)) = self.ops() else {
            return;
        };

        let points = vec![
            corner(to_point(geometry, rule.x1_mm, rule.y_mm)),
            corner(to_point(geometry, rule.x2_mm, rule.y_mm)),
        ];

        ops.push(Op::SaveGraphicsState);
        ops.push(Op::SetOutlineColor {
            col: pdf_color(rule.color),
        });
        ops.push(Op::SetOutlineThickness {
            pt: Mm(rule.thickness_mm).into_pt(),
        });
        ops.push(Op::DrawLine {
            line: Line {
                points,
                is_closed: false,
            },
        });
        ops.push(Op::RestoreGraphicsState);
    }

    fn place_text(&mut self, text: &PlacedText) {
        if text.text.is_empty() {
            return;
        }
        let Some((geometry, ops)) = self.ops() else {
            return;
        };

        let font = builtin_font(text.style.face);
        let pos = to_point(geometry, text.x_mm, text.baseline_mm);

        ops.push(Op::StartTextSection);
        ops.push(Op::SetFillColor {
            col: pdf_color(text.style.color),
        });
        ops.push(Op::SetTextCursor { pos });
        ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(text.style.size_pt),
            font,
        });
        ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text.text.clone())],
            font,
        });
        ops.push(Op::EndTextSection);
    }

    fn sheet_count(&self) -> u32 {
        (self.pages.len() + usize::from(self.current.is_some())) as u32
    }

    #[instrument(skip_all, fields(title = %self.title))]
    fn finish(mut self) -> Result<Self::Output> {
        self.flush_current();
        if self.pages.is_empty() {
            return Err(StorypressError::Sink("no sheets were drawn".into()));
        }

        let page_count = self.pages.len();
        let mut doc = PdfDocument::new(&self.title);
        doc.with_pages(self.pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            warn!(count = warnings.len(), "printpdf reported warnings while saving");
        }

        if output.is_empty() {
            return Err(StorypressError::PdfError(
                "printpdf produced an empty document".into(),
            ));
        }

        let output = reencode_text_latin1(&output)?;
        debug!(pages = page_count, bytes = output.len(), "PDF serialised");
        Ok(output)
    }
}
