// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Helvetica glyph widths for line wrapping and centring.
//
// Widths come from the Adobe AFM files for the base-14 Helvetica faces, in
// thousandths of an em. Tables cover ASCII 0x20..=0x7E; index = code - 32.
// Latin-1 letters above 0x7E use a fallback close to the accented-letter
// average. Helvetica-Oblique shares the regular widths.

use crate::sink::FontFace;

/// Millimetres per PostScript point.
pub const MM_PER_PT: f32 = 25.4 / 72.0;

/// Fallback width for characters above 0x7E.
const LATIN1_FALLBACK: u16 = 556;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // sp ! " # $ % & ' ( ) * + , - . /
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,                               // 0-9
    278, 278, 584, 584, 584, 556, 1015,                                             // : ; < = > ? @
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,                // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,                // N-Z
    278, 278, 278, 469, 556, 333,                                                   // [ \ ] ^ _ `
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,                // a-m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,                // n-z
    334, 260, 334, 584,                                                             // { | } ~
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

fn table(face: FontFace) -> &'static [u16; 95] {
    match face {
        FontFace::Helvetica | FontFace::HelveticaOblique => &HELVETICA,
        FontFace::HelveticaBold => &HELVETICA_BOLD,
    }
}

/// Width of one character in thousandths of an em.
pub fn char_units(face: FontFace, ch: char) -> u16 {
    let code = ch as usize;
    if (32..=126).contains(&code) {
        table(face)[code - 32]
    } else {
        LATIN1_FALLBACK
    }
}

/// Rendered width of `text` in millimetres at `size_pt`.
pub fn text_width_mm(text: &str, face: FontFace, size_pt: f32) -> f32 {
    let units: u32 = text.chars().map(|ch| u32::from(char_units(face, ch))).sum();
    units as f32 / 1000.0 * size_pt * MM_PER_PT
}

/// Font size in millimetres.
pub fn pt_to_mm(size_pt: f32) -> f32 {
    size_pt * MM_PER_PT
}
