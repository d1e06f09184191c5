// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — post-processing and inspecting finished storybook PDFs.

pub mod encode;
pub mod inspect;

pub use encode::reencode_text_latin1;
pub use inspect::PdfInspector;
