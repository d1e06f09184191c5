// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document sinks — the drawing surface the layout engine writes to.
//
// Layout decides *where* everything goes (millimetres from the top-left corner
// of the sheet); a sink decides how those primitives become bytes. `PdfSink`
// produces a PDF via printpdf, `RecordingSink` keeps the primitives in memory.

pub mod pdf;
pub mod record;

pub use pdf::PdfSink;
pub use record::{RecordedSheet, RecordingSink};

use serde::Serialize;
use storypress_core::error::Result;

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn grey(level: u8) -> Self {
        Self::new(level, level, level)
    }
}

/// The three Helvetica faces the template uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FontFace {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStyle {
    pub face: FontFace,
    pub size_pt: f32,
    pub color: RgbColor,
}

/// What a placed piece of text is, so sinks and tests can tell prose from
/// furniture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlockKind {
    /// Running header (story title).
    Header,
    /// Running footer (physical sheet number).
    Footer,
    Title,
    Byline,
    DateStamp,
    /// `~ N ~` above a story page.
    Ornament,
    Narrative,
    /// Bracketed art-direction note.
    Callout,
}

/// One line of text at a fixed position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedText {
    pub kind: BlockKind,
    pub text: String,
    /// Left edge of the text, from the left of the sheet.
    pub x_mm: f32,
    /// Baseline, from the top of the sheet.
    pub baseline_mm: f32,
    pub style: TextStyle,
}

/// Axis-aligned rectangle, measured from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
}

/// Horizontal decorative rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rule {
    pub x1_mm: f32,
    pub x2_mm: f32,
    pub y_mm: f32,
    pub thickness_mm: f32,
    pub color: RgbColor,
}

/// Size of one physical sheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SheetGeometry {
    pub width_mm: f32,
    pub height_mm: f32,
}

/// Output surface for the layout engine.
///
/// Calls arrive in drawing order: `start_sheet`, then any mix of drawing calls
/// for that sheet, then the next `start_sheet`, and finally `finish`.
pub trait DocumentSink {
    type Output;

    /// Begin physical sheet `number` (1-based).
    fn start_sheet(&mut self, number: u32, geometry: &SheetGeometry);

    fn fill_rect(&mut self, rect: Rect, color: RgbColor);

    fn draw_rule(&mut self, rule: &Rule);

    fn place_text(&mut self, text: &PlacedText);

    /// Sheets started so far.
    fn sheet_count(&self) -> u32;

    /// Serialise everything drawn so far.
    fn finish(self) -> Result<Self::Output>;
}
