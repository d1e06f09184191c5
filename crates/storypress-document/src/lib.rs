// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// storypress-document — Turns generated story text into a storybook PDF.
//
// Provides text sanitizing (Latin-1 repertoire), page segmentation (explicit
// markers or paragraph groups), the fixed storybook layout with automatic
// overflow, pluggable document sinks (PDF, in-memory recording), and the
// assembler that ties them together and writes the artifact atomically.

pub mod assemble;
pub mod layout;
pub mod output;
pub mod pdf;
pub mod sanitize;
pub mod segment;
pub mod sink;

// Re-export the primary items so callers can use `storypress_document::DocumentAssembler` etc.
pub use assemble::{DocumentAssembler, Rendered, assemble};
pub use layout::{LayoutEngine, LayoutState, StoryTemplate};
pub use pdf::PdfInspector;
pub use sanitize::sanitize;
pub use segment::{PageSegmenter, Segmentation};
pub use sink::{DocumentSink, PdfSink, RecordingSink};
