// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Mutable layout state for a single assembly call.

/// Where the layout engine currently is.
///
/// One value per document; the engine itself holds no mutable state, so
/// several documents can be laid out in parallel with separate states.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutState {
    /// Current physical sheet, 1-based. Zero before the first sheet.
    pub sheet: u32,
    /// Vertical cursor on the current sheet, mm from the top.
    pub cursor_mm: f32,
}

impl LayoutState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a freshly started sheet.
    pub fn next_sheet(&mut self, body_top_mm: f32) {
        self.sheet += 1;
        self.cursor_mm = body_top_mm;
    }

    pub fn advance(&mut self, mm: f32) {
        self.cursor_mm += mm;
    }

    /// Whether a block of `height_mm` fits above `limit_mm`.
    pub fn fits(&self, height_mm: f32, limit_mm: f32) -> bool {
        self.cursor_mm + height_mm <= limit_mm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_sheet_resets_cursor() {
        let mut state = LayoutState::new();
        state.next_sheet(25.0);
        state.advance(100.0);

        state.next_sheet(25.0);
        assert_eq!(state.sheet, 2);
        assert_eq!(state.cursor_mm, 25.0);
    }

    #[test]
    fn fits_is_inclusive_of_the_limit() {
        let state = LayoutState {
            sheet: 1,
            cursor_mm: 269.0,
        };
        assert!(state.fits(8.0, 277.0));
        assert!(!state.fits(8.5, 277.0));
    }
}
