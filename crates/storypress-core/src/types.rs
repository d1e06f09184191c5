// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Storypress.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Standard paper sizes the storybook template can be laid out on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A5,
    Letter,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }
}

/// Everything needed to assemble one storybook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSpec {
    pub title: String,
    pub author: String,
    /// Raw story text, optionally with `--- Page N ---` markers and
    /// `[...]` illustration notes.
    pub content: String,
    /// Number of pages the caller asked the generator for. Advisory only:
    /// never used for layout.
    pub page_count_hint: u32,
}

impl DocumentSpec {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        content: impl Into<String>,
        page_count_hint: u32,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            content: content.into(),
            page_count_hint,
        }
    }
}

/// A logical story page produced by segmentation.
///
/// `index` is assigned sequentially from 1 by the assembler and has nothing to
/// do with any number written in the source markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub index: u32,
    pub text: String,
}

impl Page {
    pub fn new(index: u32, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Lines of the page, split on line breaks.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }
}

/// A finished artifact written to disk.
///
/// Owned by the caller once returned; Storypress never moves or uploads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedDocument {
    /// Where the PDF was written.
    pub path: PathBuf,
    /// Physical sheets in the PDF (title page included).
    pub sheet_count: u32,
    /// Logical story pages after segmentation.
    pub page_count: u32,
    pub byte_len: u64,
    /// SHA-256 of the PDF bytes, lowercase hex.
    pub sha256: String,
    /// Echo of the caller's hint, kept for bookkeeping.
    pub page_count_hint: u32,
}
