// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The storybook template: sheet geometry, vertical rhythm, and text styles.
//
// All distances are millimetres measured from the top-left corner of a sheet.
// Title-page positions are given for A4 and scaled with the sheet height.

use storypress_core::PaperSize;

use crate::sink::{FontFace, RgbColor, SheetGeometry, TextStyle};

/// Reference height the title-page positions were designed for.
const A4_HEIGHT_MM: f32 = 297.0;

pub const CREAM: RgbColor = RgbColor::new(255, 250, 240);
pub const STEEL_BLUE: RgbColor = RgbColor::new(70, 130, 180);
pub const LIGHT_PINK: RgbColor = RgbColor::new(255, 182, 193);
pub const SAGE_GREEN: RgbColor = RgbColor::new(100, 150, 100);

/// Fixed visual template for one paper size.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryTemplate {
    pub sheet: SheetGeometry,
    /// Left and right page margin.
    pub side_margin_mm: f32,
    /// Inner padding of a text cell.
    pub cell_padding_mm: f32,

    pub header_top_mm: f32,
    pub header_height_mm: f32,
    /// Where body content starts on every sheet.
    pub body_top_mm: f32,
    /// Distance of the footer cell from the bottom edge.
    pub footer_offset_mm: f32,
    pub footer_height_mm: f32,
    /// Content may not extend past `sheet height - break_margin`.
    pub break_margin_mm: f32,

    pub header_style: TextStyle,
    pub footer_style: TextStyle,

    // -- Title page --
    pub title_background: RgbColor,
    pub title_top_mm: f32,
    pub title_line_height_mm: f32,
    pub title_style: TextStyle,
    pub title_gap_mm: f32,
    pub rule_length_mm: f32,
    pub rule_thickness_mm: f32,
    pub rule_color: RgbColor,
    pub rule_gap_mm: f32,
    pub byline_style: TextStyle,
    pub byline_gap_mm: f32,
    pub date_style: TextStyle,
    /// Height of single-line cells (byline, date, ornament).
    pub cell_height_mm: f32,

    // -- Story pages --
    pub ornament_style: TextStyle,
    pub ornament_gap_mm: f32,
    pub body_line_height_mm: f32,
    pub narrative_style: TextStyle,
    pub narrative_gap_mm: f32,
    pub callout_style: TextStyle,
    pub callout_gap_mm: f32,
    pub blank_line_gap_mm: f32,
}

impl StoryTemplate {
    pub fn new(paper_size: PaperSize) -> Self {
        let (width_mm, height_mm) = paper_size.dimensions_mm();
        let sheet = SheetGeometry {
            width_mm: width_mm as f32,
            height_mm: height_mm as f32,
        };
        let scale = sheet.height_mm / A4_HEIGHT_MM;

        let furniture = |size_pt| TextStyle {
            face: FontFace::HelveticaOblique,
            size_pt,
            color: RgbColor::grey(150),
        };

        Self {
            sheet,
            side_margin_mm: 10.0,
            cell_padding_mm: 1.0,

            header_top_mm: 10.0,
            header_height_mm: 10.0,
            body_top_mm: 25.0,
            footer_offset_mm: 15.0,
            footer_height_mm: 10.0,
            break_margin_mm: 20.0,

            header_style: furniture(10.0),
            footer_style: furniture(8.0),

            title_background: CREAM,
            title_top_mm: 80.0 * scale,
            title_line_height_mm: 15.0,
            title_style: TextStyle {
                face: FontFace::HelveticaBold,
                size_pt: 32.0,
                color: STEEL_BLUE,
            },
            title_gap_mm: 10.0,
            rule_length_mm: 90.0,
            rule_thickness_mm: 2.0,
            rule_color: LIGHT_PINK,
            rule_gap_mm: 20.0,
            byline_style: TextStyle {
                face: FontFace::HelveticaOblique,
                size_pt: 16.0,
                color: RgbColor::grey(100),
            },
            byline_gap_mm: 30.0,
            date_style: TextStyle {
                face: FontFace::Helvetica,
                size_pt: 12.0,
                color: RgbColor::grey(150),
            },
            cell_height_mm: 10.0,

            ornament_style: TextStyle {
                face: FontFace::HelveticaBold,
                size_pt: 14.0,
                color: LIGHT_PINK,
            },
            ornament_gap_mm: 10.0,
            body_line_height_mm: 8.0,
            narrative_style: TextStyle {
                face: FontFace::Helvetica,
                size_pt: 14.0,
                color: RgbColor::grey(50),
            },
            narrative_gap_mm: 3.0,
            callout_style: TextStyle {
                face: FontFace::HelveticaOblique,
                size_pt: 11.0,
                color: SAGE_GREEN,
            },
            callout_gap_mm: 5.0,
            blank_line_gap_mm: 5.0,
        }
    }

    /// Width between the side margins.
    pub fn content_width_mm(&self) -> f32 {
        self.sheet.width_mm - 2.0 * self.side_margin_mm
    }

    /// Width available to wrapped text inside a cell.
    pub fn wrap_width_mm(&self) -> f32 {
        self.content_width_mm() - 2.0 * self.cell_padding_mm
    }

    /// Lowest point content may reach.
    pub fn break_limit_mm(&self) -> f32 {
        self.sheet.height_mm - self.break_margin_mm
    }

    pub fn footer_top_mm(&self) -> f32 {
        self.sheet.height_mm - self.footer_offset_mm
    }
}

impl Default for StoryTemplate {
    fn default() -> Self {
        Self::new(PaperSize::A4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_geometry() {
        let template = StoryTemplate::default();
        assert_eq!(template.content_width_mm(), 190.0);
        assert_eq!(template.wrap_width_mm(), 188.0);
        assert_eq!(template.break_limit_mm(), 277.0);
        assert_eq!(template.footer_top_mm(), 282.0);
        assert_eq!(template.title_top_mm, 80.0);
    }

    #[test]
    fn title_position_scales_with_height() {
        let template = StoryTemplate::new(PaperSize::A5);
        assert!(template.title_top_mm < 80.0);
        assert_eq!(template.break_limit_mm(), 190.0);
    }

    #[test]
    fn callouts_are_distinct_from_prose() {
        let template = StoryTemplate::default();
        assert_ne!(template.callout_style.color, template.narrative_style.color);
        assert_eq!(template.callout_style.face, FontFace::HelveticaOblique);
        assert!(template.callout_style.size_pt < template.narrative_style.size_pt);
    }
}
