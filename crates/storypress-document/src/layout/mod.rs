// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout module — template, glyph metrics, layout state, and the engine that
// places story content onto physical sheets.

pub mod engine;
pub mod metrics;
pub mod state;
pub mod template;

pub use engine::{LayoutEngine, LineKind, classify_line, wrap_text};
pub use state::LayoutState;
pub use template::StoryTemplate;
