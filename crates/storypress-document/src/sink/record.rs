// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory sink that records every drawing primitive per sheet.

use serde::Serialize;
use storypress_core::error::Result;

use super::{DocumentSink, PlacedText, Rect, RgbColor, Rule, SheetGeometry};

/// Everything drawn on one physical sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedSheet {
    pub number: u32,
    pub geometry: SheetGeometry,
    pub fills: Vec<(Rect, RgbColor)>,
    pub rules: Vec<Rule>,
    pub texts: Vec<PlacedText>,
}

impl RecordedSheet {
    /// Text of every block of the given kind, in drawing order.
    pub fn texts_of(&self, kind: super::BlockKind) -> impl Iterator<Item = &str> {
        self.texts
            .iter()
            .filter(move |text| text.kind == kind)
            .map(|text| text.text.as_str())
    }
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    sheets: Vec<RecordedSheet>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn current(&mut self) -> Option<&mut RecordedSheet> {
        self.sheets.last_mut()
    }
}

impl DocumentSink for RecordingSink {
    type Output = Vec<RecordedSheet>;

    fn start_sheet(&mut self, number: u32, geometry: &SheetGeometry) {
        self.sheets.push(RecordedSheet {
            number,
            geometry: *geometry,
            fills: Vec::new(),
            rules: Vec::new(),
            texts: Vec::new(),
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: RgbColor) {
        if let Some(sheet) = self.current() {
            sheet.fills.push((rect, color));
        }
    }

    fn draw_rule(&mut self, rule: &Rule) {
        if let Some(sheet) = self.current() {
            sheet.rules.push(*rule);
        }
    }

    fn place_text(&mut self, text: &PlacedText) {
        if let Some(sheet) = self.current() {
            sheet.texts.push(text.clone());
        }
    }

    fn sheet_count(&self) -> u32 {
        self.sheets.len() as u32
    }

    fn finish(self) -> Result<Self::Output> {
        Ok(self.sheets)
    }
}
