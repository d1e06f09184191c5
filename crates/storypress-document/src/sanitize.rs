// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text sanitizer — squeeze arbitrary text into the Latin-1 repertoire that the
// PDF base-14 fonts can draw.
//
// Typographic punctuation is substituted with ASCII look-alikes first; whatever
// still cannot be encoded (emoji, CJK, ...) is dropped silently.

use tracing::debug;

/// Substitutions applied before anything is dropped.
const SUBSTITUTIONS: &[(char, &str)] = &[
    ('\u{2014}', "--"),  // em dash
    ('\u{2013}', "-"),   // en dash
    ('\u{2018}', "'"),   // left single quote
    ('\u{2019}', "'"),   // right single quote
    ('\u{201C}', "\""),  // left double quote
    ('\u{201D}', "\""),  // right double quote
    ('\u{2026}', "..."), // ellipsis
    ('\u{2022}', "*"),   // bullet
    ('\u{00A0}', " "),   // no-break space
    ('\u{2003}', " "),   // em space
    ('\u{2002}', " "),   // en space
    ('\u{00B7}', "*"),   // middle dot
    ('\u{2212}', "-"),   // minus sign
    ('\u{00D7}', "x"),   // multiplication sign
    ('\u{00F7}', "/"),   // division sign
    ('\u{2032}', "'"),   // prime
    ('\u{2033}', "\""),  // double prime
    ('\u{00AE}', "(R)"), // registered
    ('\u{00A9}', "(C)"), // copyright
    ('\u{2122}', "(TM)"),
];

/// First code point outside the Basic Multilingual Plane.
const SUPPLEMENTARY_PLANE_START: u32 = 0x1_0000;

/// Whether `ch` survives the final single-byte encoding step.
pub fn is_representable(ch: char) -> bool {
    (ch as u32) <= 0xFF
}

fn substitute(ch: char) -> Option<&'static str> {
    SUBSTITUTIONS
        .iter()
        .find(|(from, _)| *from == ch)
        .map(|(_, to)| *to)
}

/// Map `text` onto the Latin-1 repertoire.
///
/// Never fails. Idempotent: every substitution produces ASCII, and ASCII is
/// left untouched.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut dropped = 0usize;

    for ch in text.chars() {
        if let Some(replacement) = substitute(ch) {
            out.push_str(replacement);
        } else if (ch as u32) >= SUPPLEMENTARY_PLANE_START || !is_representable(ch) {
            dropped += 1;
        } else {
            out.push(ch);
        }
    }

    if dropped > 0 {
        debug!(dropped, "dropped characters outside the output repertoire");
    }

    out
}

/// Sanitize and encode as single-byte Latin-1.
pub fn to_latin1(text: &str) -> Vec<u8> {
    sanitize(text).chars().map(|ch| ch as u8).collect()
}
