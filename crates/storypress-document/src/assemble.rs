// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document assembler — the storybook pipeline end to end.
//
// sanitize title/author -> segment content -> number pages 1..k -> title page
// -> story pages -> serialise -> write atomically. Each call builds its own
// `LayoutState` and sink, so one assembler can serve many threads.

use std::path::{Path, PathBuf};

use chrono::Local;
use storypress_core::error::Result;
use storypress_core::{AssemblyConfig, DocumentSpec, Page, RenderedDocument};
use tracing::{debug, info, instrument};

use crate::layout::{LayoutEngine, LayoutState, StoryTemplate};
use crate::output::{default_file_name, fingerprint, write_atomically};
use crate::sanitize::sanitize;
use crate::segment::PageSegmenter;
use crate::sink::{DocumentSink, PdfSink};

/// Output of a sink together with what was laid out.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered<T> {
    pub output: T,
    /// Physical sheets, title page included.
    pub sheet_count: u32,
    /// Logical story pages.
    pub page_count: u32,
}

/// Turns a [`DocumentSpec`] into a storybook PDF.
#[derive(Debug, Clone)]
pub struct DocumentAssembler {
    config: AssemblyConfig,
    template: StoryTemplate,
    segmenter: PageSegmenter,
}

impl DocumentAssembler {
    /// Build an assembler after validating `config`.
    pub fn new(config: AssemblyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            template: StoryTemplate::new(config.paper_size),
            segmenter: PageSegmenter::new(config.paragraphs_per_page),
            config,
        })
    }

    pub fn config(&self) -> &AssemblyConfig {
        &self.config
    }

    /// Segment `content` and number the pages from 1.
    pub fn paginate(&self, content: &str) -> Vec<Page> {
        self.segmenter
            .segment(content)
            .into_pages()
            .into_iter()
            .zip(1u32..)
            .map(|(text, index)| Page::new(index, text))
            .collect()
    }

    /// Today's date stamp in the configured format.
    pub fn date_stamp(&self) -> String {
        Local::now().format(&self.config.date_format).to_string()
    }

    /// Lay the story out onto `sink`.
    ///
    /// Deterministic for a given `spec` and `date_stamp`. `page_count_hint`
    /// plays no part in layout.
    pub fn render<S: DocumentSink>(
        &self,
        spec: &DocumentSpec,
        date_stamp: &str,
        sink: S,
    ) -> Result<Rendered<S::Output>> {
        self.render_with(&self.engine(spec), spec, date_stamp, sink)
    }

    /// Render to PDF bytes in memory, stamped with today's date.
    pub fn render_pdf(&self, spec: &DocumentSpec) -> Result<Rendered<Vec<u8>>> {
        let engine = self.engine(spec);
        let sink = PdfSink::new(engine.title());
        self.render_with(&engine, spec, &self.date_stamp(), sink)
    }

    /// Layout engine for `spec`; the title is sanitized once, here.
    fn engine(&self, spec: &DocumentSpec) -> LayoutEngine<'_> {
        LayoutEngine::new(&self.template, &spec.title).with_ornaments(self.config.page_ornaments)
    }

    #[instrument(skip_all, fields(title = %spec.title, content_len = spec.content.len()))]
    fn render_with<S: DocumentSink>(
        &self,
        engine: &LayoutEngine<'_>,
        spec: &DocumentSpec,
        date_stamp: &str,
        mut sink: S,
    ) -> Result<Rendered<S::Output>> {
        let author = match sanitize(&spec.author).trim() {
            "" => sanitize(&self.config.default_author),
            author => author.to_owned(),
        };

        let pages = self.paginate(&spec.content);
        if pages.is_empty() {
            debug!("no story content, title page only");
        }

        let mut state = LayoutState::new();
        engine.render_title_page(&mut state, &mut sink, &author, date_stamp);
        for page in &pages {
            engine.render_page(&mut state, &mut sink, page);
        }

        let sheet_count = state.sheet;
        debug_assert_eq!(sheet_count, sink.sheet_count());
        let output = sink.finish()?;

        Ok(Rendered {
            output,
            sheet_count,
            page_count: pages.len() as u32,
        })
    }

    /// Assemble into the configured output directory under a timestamped name.
    pub fn assemble(&self, spec: &DocumentSpec) -> Result<RenderedDocument> {
        let name = default_file_name(&spec.title, Local::now().naive_local());
        let path = self.config.output_dir.join(name);
        self.assemble_to(spec, &path)
    }

    /// Assemble and write the PDF to `path`.
    ///
    /// The file appears complete or not at all.
    #[instrument(skip_all, fields(title = %spec.title, path = %path.display()))]
    pub fn assemble_to(&self, spec: &DocumentSpec, path: &Path) -> Result<RenderedDocument> {
        info!(
            page_count_hint = spec.page_count_hint,
            "Assembling storybook"
        );

        let rendered = self.render_pdf(spec)?;
        write_atomically(path, &rendered.output)?;

        let document = RenderedDocument {
            path: PathBuf::from(path),
            sheet_count: rendered.sheet_count,
            page_count: rendered.page_count,
            byte_len: rendered.output.len() as u64,
            sha256: fingerprint(&rendered.output),
            page_count_hint: spec.page_count_hint,
        };

        info!(
            sheets = document.sheet_count,
            pages = document.page_count,
            bytes = document.byte_len,
            "Storybook assembled"
        );
        Ok(document)
    }
}

impl Default for DocumentAssembler {
    fn default() -> Self {
        Self {
            config: AssemblyConfig::default(),
            template: StoryTemplate::default(),
            segmenter: PageSegmenter::default(),
        }
    }
}

/// Assemble with default settings into `storage/pdfs`.
pub fn assemble(
    title: &str,
    author: &str,
    content: &str,
    page_count_hint: u32,
) -> Result<RenderedDocument> {
    DocumentAssembler::default().assemble(&DocumentSpec::new(title, author, content, page_count_hint))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::PdfInspector;
    use crate::sink::{BlockKind, RecordedSheet, RecordingSink};

    const STAR: &str = "--- Page 1 ---
High up in the night sky, there lived a little star named Twinkle.

[Illustration: A cute, small star with big sparkly eyes in a dark blue sky]

--- Page 2 ---
\u{201C}I wish I could shine as bright as the big stars,\u{201D} Twinkle sighed.

[Illustration: A kind, smiling Moon talking to the little star]

--- Page 3 ---
From that night on, Twinkle knew that even the smallest light can make a big difference.

--- The End ---
";

    fn record(spec: &DocumentSpec) -> Rendered<Vec<RecordedSheet>> {
        DocumentAssembler::default()
            .render(spec, "October 2026", RecordingSink::new())
            .expect("render")
    }

    #[test]
    fn empty_content_is_title_page_only() {
        let rendered = record(&DocumentSpec::new("Quiet Night", "Ada", "", 10));
        assert_eq!(rendered.sheet_count, 1);
        assert_eq!(rendered.page_count, 0);
        assert_eq!(rendered.output.len(), 1);

        let rendered = record(&DocumentSpec::new("Quiet Night", "Ada", " \n\n\t", 10));
        assert_eq!(rendered.sheet_count, 1);
    }

    #[test]
    fn story_pages_follow_the_title_page() {
        let rendered = record(&DocumentSpec::new("The Brave Little Star", "Ada", STAR, 5));
        assert_eq!(rendered.page_count, 3);
        assert_eq!(rendered.sheet_count, 4);

        let ornaments: Vec<&str> = rendered
            .output
            .iter()
            .flat_map(|sheet| sheet.texts_of(BlockKind::Ornament))
            .collect();
        assert_eq!(ornaments, vec!["~ 1 ~", "~ 2 ~", "~ 3 ~"]);

        let callouts: usize = rendered
            .output
            .iter()
            .map(|sheet| sheet.texts_of(BlockKind::Callout).count())
            .sum();
        assert_eq!(callouts, 2);
    }

    #[test]
    fn pages_are_renumbered_from_one() {
        let content = "--- Page 9 ---\nA\n--- Page 4 ---\nB\n--- Page 4 ---\nC";
        let pages = DocumentAssembler::default().paginate(content);
        let indices: Vec<u32> = pages.iter().map(|page| page.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn title_and_author_are_sanitized_everywhere() {
        let rendered = record(&DocumentSpec::new(
            "Luna\u{2019}s Trip \u{1F680}",
            "Zo\u{00EB} \u{2014} Mum",
            "--- Page 1 ---\nHi",
            1,
        ));
        let title_sheet = &rendered.output[0];
        assert_eq!(
            title_sheet.texts_of(BlockKind::Title).collect::<Vec<_>>(),
            vec!["Luna's Trip"]
        );
        assert_eq!(
            title_sheet.texts_of(BlockKind::Byline).collect::<Vec<_>>(),
            vec!["Written by Zo\u{00EB} -- Mum"]
        );
        for sheet in &rendered.output {
            assert_eq!(
                sheet.texts_of(BlockKind::Header).collect::<Vec<_>>(),
                vec!["Luna's Trip"]
            );
        }
    }

    #[test]
    fn blank_author_uses_default() {
        let rendered = record(&DocumentSpec::new("T", "   ", "", 1));
        assert_eq!(
            rendered.output[0]
                .texts_of(BlockKind::Byline)
                .collect::<Vec<_>>(),
            vec!["Written by StoryLand AI"]
        );
    }

    #[test]
    fn page_count_hint_does_not_affect_layout() {
        let a = record(&DocumentSpec::new("T", "A", STAR, 1));
        let b = record(&DocumentSpec::new("T", "A", STAR, 40));
        assert_eq!(a, b);
    }

    #[test]
    fn identical_inputs_give_identical_layout() {
        let spec = DocumentSpec::new("The Brave Little Star", "Ada", STAR, 5);
        assert_eq!(record(&spec), record(&spec));
    }

    #[test]
    fn only_the_date_stamp_differs_between_days() {
        let assembler = DocumentAssembler::default();
        let spec = DocumentSpec::new("T", "A", STAR, 5);
        let mut monday = assembler
            .render(&spec, "May 2026", RecordingSink::new())
            .expect("render");
        let mut tuesday = assembler
            .render(&spec, "June 2026", RecordingSink::new())
            .expect("render");

        for rendered in [&mut monday, &mut tuesday] {
            rendered.output[0]
                .texts
                .retain(|text| text.kind != BlockKind::DateStamp);
        }
        assert_eq!(monday, tuesday);
    }

    #[test]
    fn markerless_story_groups_paragraphs() {
        let content = (1..=7)
            .map(|n| format!("Paragraph {n}."))
            .collect::<Vec<_>>()
            .join("\n\n");
        let rendered = record(&DocumentSpec::new("T", "A", &content, 3));
        assert_eq!(rendered.page_count, 3);
        assert_eq!(rendered.sheet_count, 4);
    }

    #[test]
    fn config_controls_group_size_and_ornaments() {
        let assembler = DocumentAssembler::new(AssemblyConfig {
            paragraphs_per_page: 1,
            page_ornaments: false,
            ..AssemblyConfig::default()
        })
        .expect("valid config");
        let rendered = assembler
            .render(
                &DocumentSpec::new("T", "A", "a\n\nb\n\nc", 3),
                "x",
                RecordingSink::new(),
            )
            .expect("render");
        assert_eq!(rendered.page_count, 3);
        assert!(
            rendered
                .output
                .iter()
                .all(|sheet| sheet.texts_of(BlockKind::Ornament).count() == 0)
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let result = DocumentAssembler::new(AssemblyConfig {
            paragraphs_per_page: 0,
            ..AssemblyConfig::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn pdf_sheet_count_matches_layout() {
        let assembler = DocumentAssembler::default();
        let long_page = "Line of a long story that keeps going.\n".repeat(60);
        let content = format!("--- Page 1 ---\n{long_page}--- Page 2 ---\nThe end.");
        let rendered = assembler
            .render_pdf(&DocumentSpec::new("Long", "A", &content, 2))
            .expect("render");

        assert_eq!(rendered.page_count, 2);
        assert!(rendered.sheet_count > 3);
        let inspector = PdfInspector::from_bytes(&rendered.output).expect("parse");
        assert_eq!(inspector.page_count(), rendered.sheet_count as usize);
    }

    #[test]
    fn pdf_text_keeps_accented_letters() {
        let content = "--- Page 1 ---\nZo\u{00EB} ordered a caf\u{00E9} cr\u{00E8}me.\n--- Page 2 ---\nThe end.";
        let rendered = DocumentAssembler::default()
            .render_pdf(&DocumentSpec::new(
                "Zo\u{00EB}\u{2019}s Day",
                "Ren\u{00E9}e",
                content,
                2,
            ))
            .expect("render");
        let inspector = PdfInspector::from_bytes(&rendered.output).expect("parse");

        let title_page = inspector.page_text(1).expect("title text");
        assert!(title_page.contains("Zo\u{00EB}'s Day"), "title page: {title_page:?}");
        assert!(title_page.contains("Written by Ren\u{00E9}e"), "title page: {title_page:?}");

        let story_page = inspector.page_text(2).expect("story text");
        assert!(
            story_page.contains("Zo\u{00EB} ordered a caf\u{00E9} cr\u{00E8}me."),
            "story page: {story_page:?}"
        );
        assert!(!story_page.contains('\u{00C3}'), "story page: {story_page:?}");
    }

    #[test]
    fn single_marker_story_is_grouped_by_paragraph() {
        let content = "--- Page 1 ---\nA\n\nB\n\nC\n\nD";
        let rendered = record(&DocumentSpec::new("T", "A", content, 1));
        assert_eq!(rendered.page_count, 2);
        assert_eq!(rendered.sheet_count, 3);

        let narrative: Vec<&str> = rendered.output[1]
            .texts_of(BlockKind::Narrative)
            .collect();
        assert_eq!(narrative, vec!["--- Page 1 ---", "A", "B", "C"]);
    }

    #[test]
    fn empty_story_pdf_has_one_page() {
        let rendered = DocumentAssembler::default()
            .render_pdf(&DocumentSpec::new("Empty", "A", "", 1))
            .expect("render");
        assert_eq!(rendered.sheet_count, 1);
        let inspector = PdfInspector::from_bytes(&rendered.output).expect("parse");
        assert_eq!(inspector.page_count(), 1);
    }

    #[test]
    fn assemble_to_writes_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("star.pdf");
        let spec = DocumentSpec::new("The Brave Little Star", "Ada", STAR, 5);

        let document = DocumentAssembler::default()
            .assemble_to(&spec, &path)
            .expect("assemble");

        assert_eq!(document.path, path);
        assert_eq!(document.sheet_count, 4);
        assert_eq!(document.page_count, 3);
        assert_eq!(document.page_count_hint, 5);

        let bytes = std::fs::read(&path).expect("read back");
        assert_eq!(document.byte_len, bytes.len() as u64);
        assert_eq!(document.sha256, fingerprint(&bytes));

        let inspector = PdfInspector::open(&path).expect("open");
        assert_eq!(inspector.page_count(), 4);
        let (width, height) = inspector.page_size_mm(1).expect("size");
        assert!((width - 210.0).abs() < 1.0);
        assert!((height - 297.0).abs() < 1.0);
    }

    #[test]
    fn assemble_uses_default_destination() {
        let dir = tempfile::tempdir().expect("tempdir");
        let assembler = DocumentAssembler::new(AssemblyConfig {
            output_dir: dir.path().join("pdfs"),
            ..AssemblyConfig::default()
        })
        .expect("valid config");

        let document = assembler
            .assemble(&DocumentSpec::new("Sleepy Owl!", "A", "Hoot.", 1))
            .expect("assemble");

        assert!(document.path.starts_with(dir.path().join("pdfs")));
        let name = document
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .expect("file name");
        assert!(name.starts_with("Sleepy_Owl_"));
        assert!(name.ends_with(".pdf"));
        assert!(document.path.exists());
    }

    #[test]
    fn write_failure_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").expect("seed");
        let path = blocker.join("story.pdf");

        let result = DocumentAssembler::default()
            .assemble_to(&DocumentSpec::new("T", "A", "text", 1), &path);
        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[test]
    fn parallel_renders_do_not_interfere() {
        let assembler = DocumentAssembler::default();
        let spec = DocumentSpec::new("T", "A", STAR, 5);
        let expected = record(&spec);

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| {
                        assembler
                            .render(&spec, "October 2026", RecordingSink::new())
                            .expect("render")
                    })
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().expect("thread"), expected);
            }
        });
    }
}
