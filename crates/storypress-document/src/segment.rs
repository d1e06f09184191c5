// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page segmenter — split raw story text into logical pages.
//
// Generated stories usually carry `--- Page N ---` markers. When splitting on
// them leaves at most one page, paragraphs are grouped into fixed-size runs
// instead. The strategy is decided
// once per call and reported as a `Segmentation` value.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, instrument};

pub use storypress_core::config::PARAGRAPHS_PER_PAGE;

/// `--- Page 12 ---`, any case, any inner whitespace.
static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)---\s*Page\s*\d+\s*---").expect("marker pattern is valid")
});

/// A line break followed by a whitespace-only line.
static BLANK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("blank-line pattern is valid"));

/// Result of segmenting one story, tagged with the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", content = "pages", rename_all = "snake_case")]
pub enum Segmentation {
    /// Split on explicit page markers.
    Markers(Vec<String>),
    /// Markers gave at most one page; paragraphs grouped into runs.
    Paragraphs(Vec<String>),
}

impl Segmentation {
    pub fn pages(&self) -> &[String] {
        match self {
            Self::Markers(pages) | Self::Paragraphs(pages) => pages,
        }
    }

    pub fn into_pages(self) -> Vec<String> {
        match self {
            Self::Markers(pages) | Self::Paragraphs(pages) => pages,
        }
    }

    pub fn len(&self) -> usize {
        self.pages().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages().is_empty()
    }
}

/// Splits story content into an ordered sequence of non-empty pages.
#[derive(Debug, Clone, Copy)]
pub struct PageSegmenter {
    paragraphs_per_page: usize,
}

impl Default for PageSegmenter {
    fn default() -> Self {
        Self::new(PARAGRAPHS_PER_PAGE)
    }
}

impl PageSegmenter {
    /// A group size of zero is treated as one.
    pub fn new(paragraphs_per_page: usize) -> Self {
        Self {
            paragraphs_per_page: paragraphs_per_page.max(1),
        }
    }

    pub fn paragraphs_per_page(&self) -> usize {
        self.paragraphs_per_page
    }

    /// Segment `content`.
    ///
    /// The marker split wins when it yields two or more non-empty pages; text
    /// before the first marker becomes a leading page of its own. Otherwise
    /// the whole content, marker text included, is grouped by paragraph.
    #[instrument(skip_all, fields(content_len = content.len()))]
    pub fn segment(&self, content: &str) -> Segmentation {
        let fragments = non_empty_fragments(MARKER.split(content));
        let segmentation = if fragments.len() > 1 {
            Segmentation::Markers(fragments)
        } else {
            let paragraphs = non_empty_fragments(BLANK_LINE.split(content));
            Segmentation::Paragraphs(
                paragraphs
                    .chunks(self.paragraphs_per_page)
                    .map(|group| group.join("\n\n"))
                    .collect(),
            )
        };

        debug!(
            strategy = match segmentation {
                Segmentation::Markers(_) => "markers",
                Segmentation::Paragraphs(_) => "paragraphs",
            },
            pages = segmentation.len(),
            "content segmented"
        );

        segmentation
    }
}

fn non_empty_fragments<'a>(fragments: impl Iterator<Item = &'a str>) -> Vec<String> {
    fragments
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Segment with the default paragraph group size.
pub fn segment_pages(content: &str) -> Vec<String> {
    PageSegmenter::default().segment(content).into_pages()
}
