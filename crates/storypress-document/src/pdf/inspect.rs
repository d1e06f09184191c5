// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF inspector — read back a finished storybook with `lopdf` to check what
// was actually written (page count, sheet size, text).

use std::path::Path;

use lopdf::{Document, Object, ObjectId};
use storypress_core::error::{Result, StorypressError};
use tracing::{debug, info, instrument};

/// PostScript points per millimetre.
const PT_PER_MM: f32 = 72.0 / 25.4;

/// Read-only view over an existing PDF.
pub struct PdfInspector {
    document: Document,
}

impl PdfInspector {
    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            StorypressError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self { document })
    }

    /// Inspect PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            StorypressError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        Ok(Self { document })
    }

    /// Number of physical sheets in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Text shown on a page (1-indexed), decoded through the page's fonts.
    pub fn page_text(&self, page_number: u32) -> Result<String> {
        self.document
            .extract_text(&[page_number])
            .map_err(|err| StorypressError::PdfError(format!("text of page {page_number}: {err}")))
    }

    /// Width and height of a page (1-indexed) in millimetres, read from its
    /// MediaBox (inherited from the page tree when the page has none).
    pub fn page_size_mm(&self, page_number: u32) -> Result<(f32, f32)> {
        let pages = self.document.get_pages();
        let mut node: ObjectId = *pages.get(&page_number).ok_or_else(|| {
            StorypressError::PdfError(format!(
                "page {} out of range (document has {} pages)",
                page_number,
                pages.len()
            ))
        })?;

        loop {
            let dict = self
                .document
                .get_dictionary(node)
                .map_err(|err| StorypressError::PdfError(format!("bad page node: {err}")))?;

            if let Ok(media_box) = dict.get(b"MediaBox") {
                return self.media_box_size(media_box);
            }

            node = dict
                .get(b"Parent")
                .and_then(Object::as_reference)
                .map_err(|_| {
                    StorypressError::PdfError(format!("page {page_number} has no MediaBox"))
                })?;
        }
    }

    fn media_box_size(&self, media_box: &Object) -> Result<(f32, f32)> {
        let resolved = match media_box {
            Object::Reference(id) => self
                .document
                .get_object(*id)
                .map_err(|err| StorypressError::PdfError(format!("bad MediaBox: {err}")))?,
            other => other,
        };

        let corners = resolved
            .as_array()
            .map_err(|err| StorypressError::PdfError(format!("bad MediaBox: {err}")))?
            .iter()
            .map(Object::as_float)
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(|err| StorypressError::PdfError(format!("bad MediaBox: {err}")))?;

        match corners.as_slice() {
            [x0, y0, x1, y1] => Ok(((x1 - x0).abs() / PT_PER_MM, (y1 - y0).abs() / PT_PER_MM)),
            _ => Err(StorypressError::PdfError(format!(
                "MediaBox has {} entries, expected 4",
                corners.len()
            ))),
        }
    }
}
