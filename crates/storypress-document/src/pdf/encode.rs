// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text re-encoding — rewrite show-text strings as single-byte Latin-1.
//
// printpdf writes builtin-font text as UTF-8 while declaring the fonts
// /WinAnsiEncoding, so every non-ASCII letter would print as two glyphs. This
// pass walks each page's content stream with `lopdf` and re-encodes the
// operands of the text-showing operators.

use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use storypress_core::error::{Result, StorypressError};
use tracing::{debug, instrument};

use crate::sanitize::to_latin1;

/// Operators whose operands carry strings to be shown.
const SHOW_TEXT_OPERATORS: [&str; 4] = ["Tj", "TJ", "'", "\""];

/// Re-encode every UTF-8 text string in `pdf` as single-byte Latin-1.
///
/// Pages without non-ASCII text are left untouched.
#[instrument(skip_all, fields(bytes_len = pdf.len()))]
pub fn reencode_text_latin1(pdf: &[u8]) -> Result<Vec<u8>> {
    let mut document = Document::load_mem(pdf).map_err(|err| {
        StorypressError::PdfError(format!("failed to reload generated PDF: {err}"))
    })?;

    let page_ids: Vec<ObjectId> = document.get_pages().into_values().collect();
    let mut rewritten = 0usize;

    for page_id in page_ids {
        let raw = document
            .get_page_content(page_id)
            .map_err(|err| StorypressError::PdfError(format!("unreadable page content: {err}")))?;
        let mut content = Content::decode(&raw)
            .map_err(|err| StorypressError::PdfError(format!("undecodable page content: {err}")))?;

        let mut changed = false;
        for operation in &mut content.operations {
            if SHOW_TEXT_OPERATORS.contains(&operation.operator.as_str()) {
                for operand in &mut operation.operands {
                    changed |= reencode_operand(operand);
                }
            }
        }

        if changed {
            let encoded = content
                .encode()
                .map_err(|err| StorypressError::PdfError(format!("content encoding: {err}")))?;
            document
                .change_page_content(page_id, encoded)
                .map_err(|err| StorypressError::PdfError(format!("content update: {err}")))?;
            rewritten += 1;
        }
    }

    if rewritten == 0 {
        return Ok(pdf.to_vec());
    }

    let mut output = Vec::new();
    document
        .save_to(&mut output)
        .map_err(|err| StorypressError::PdfError(format!("failed to save PDF: {err}")))?;

    debug!(pages = rewritten, "text re-encoded as Latin-1");
    Ok(output)
}

/// Re-encode a string operand (or the strings inside a `TJ` array).
fn reencode_operand(operand: &mut Object) -> bool {
    match operand {
        Object::String(bytes, _) => {
            let Ok(text) = std::str::from_utf8(bytes) else {
                return false;
            };
            if text.is_ascii() {
                return false;
            }
            let latin1 = to_latin1(text);
            *bytes = latin1;
            true
        }
        Object::Array(items) => items
            .iter_mut()
            .fold(false, |changed, item| reencode_operand(item) | changed),
        _ => false,
    }
}
