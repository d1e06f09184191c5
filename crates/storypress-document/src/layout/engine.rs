// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout engine — places the title page and story pages onto physical sheets.
//
// The engine is immutable; everything that changes while a document is being
// laid out lives in the caller's `LayoutState`. Text flows top to bottom in
// cells: a single-line `cell` leaves the cursor where it was, a wrapped
// `multi_cell` moves it down one line height per wrapped line. Any line that
// would cross the break limit starts a new physical sheet first.

use storypress_core::Page;
use tracing::debug;

use super::metrics::{pt_to_mm, text_width_mm};
use super::state::LayoutState;
use super::template::StoryTemplate;
use crate::sanitize::sanitize;
use crate::sink::{BlockKind, DocumentSink, FontFace, PlacedText, Rect, RgbColor, Rule, TextStyle};

/// How a story line is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Empty after trimming; vertical space only.
    Blank,
    /// `[ ... ]` art-direction note.
    Callout,
    Narrative,
}

/// Classify one line of story text.
pub fn classify_line(line: &str) -> LineKind {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        LineKind::Blank
    } else if trimmed.starts_with('[') && trimmed.ends_with(']') {
        LineKind::Callout
    } else {
        LineKind::Narrative
    }
}

/// Word-wrap `text` so that no line is wider than `max_width_mm`.
///
/// Words wider than a whole line are broken between characters. Always
/// returns at least one line (empty for whitespace-only input).
pub fn wrap_text(text: &str, face: FontFace, size_pt: f32, max_width_mm: f32) -> Vec<String> {
    let space_width = text_width_mm(" ", face, size_pt);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0f32;

    for word in text.split_whitespace() {
        let word_width = text_width_mm(word, face, size_pt);

        if word_width > max_width_mm {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
            }
            for ch in word.chars() {
                let ch_width = text_width_mm(ch.encode_utf8(&mut [0; 4]), face, size_pt);
                if !current.is_empty() && current_width + ch_width > max_width_mm {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0.0;
                }
                current.push(ch);
                current_width += ch_width;
            }
        } else if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + space_width + word_width <= max_width_mm {
            current.push(' ');
            current.push_str(word);
            current_width += space_width + word_width;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_owned()));
            current_width = word_width;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }

    lines
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
}

/// Lays out storybook content onto a [`DocumentSink`].
pub struct LayoutEngine<'t> {
    template: &'t StoryTemplate,
    /// Sanitized story title, drawn on the title page and in every header.
    title: String,
    ornaments: bool,
}

impl<'t> LayoutEngine<'t> {
    /// The title is sanitized here, once, for the whole document.
    pub fn new(template: &'t StoryTemplate, title: &str) -> Self {
        Self {
            template,
            title: sanitize(title).trim().to_owned(),
            ornaments: true,
        }
    }

    /// Toggle the `~ N ~` ornament above story pages.
    pub fn with_ornaments(mut self, ornaments: bool) -> Self {
        self.ornaments = ornaments;
        self
    }

    pub fn template(&self) -> &StoryTemplate {
        self.template
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    // -- Sheets ---------------------------------------------------------------

    /// Start a new physical sheet with its running header and footer.
    pub fn start_sheet<S: DocumentSink>(
        &self,
        state: &mut LayoutState,
        sink: &mut S,
        background: Option<RgbColor>,
    ) {
        let t = self.template;
        state.next_sheet(t.body_top_mm);
        sink.start_sheet(state.sheet, &t.sheet);

        if let Some(color) = background {
            sink.fill_rect(
                Rect {
                    x_mm: 0.0,
                    y_mm: 0.0,
                    width_mm: t.sheet.width_mm,
                    height_mm: t.sheet.height_mm,
                },
                color,
            );
        }

        if !self.title.is_empty() {
            self.place_cell(
                sink,
                BlockKind::Header,
                &self.title,
                t.header_style,
                t.header_top_mm,
                t.header_height_mm,
                Align::Center,
            );
        }
        self.place_cell(
            sink,
            BlockKind::Footer,
            &format!("Page {}", state.sheet),
            t.footer_style,
            t.footer_top_mm(),
            t.footer_height_mm,
            Align::Center,
        );

        debug!(sheet = state.sheet, "sheet started");
    }

    // -- Title page -----------------------------------------------------------

    /// Title, decorative rule, byline, and date stamp on a cream sheet.
    pub fn render_title_page<S: DocumentSink>(
        &self,
        state: &mut LayoutState,
        sink: &mut S,
        author: &str,
        date_stamp: &str,
    ) {
        let t = self.template;
        self.start_sheet(state, sink, Some(t.title_background));

        state.cursor_mm = t.title_top_mm;
        self.multi_cell(
            state,
            sink,
            BlockKind::Title,
            &self.title,
            t.title_style,
            t.title_line_height_mm,
            Align::Center,
        );

        state.advance(t.title_gap_mm);
        let x1_mm = (t.sheet.width_mm - t.rule_length_mm) / 2.0;
        sink.draw_rule(&Rule {
            x1_mm,
            x2_mm: x1_mm + t.rule_length_mm,
            y_mm: state.cursor_mm,
            thickness_mm: t.rule_thickness_mm,
            color: t.rule_color,
        });

        state.advance(t.rule_gap_mm);
        self.cell(
            state,
            sink,
            BlockKind::Byline,
            &sanitize(&format!("Written by {author}")),
            t.byline_style,
            Align::Center,
        );

        state.advance(t.byline_gap_mm);
        self.cell(
            state,
            sink,
            BlockKind::DateStamp,
            &sanitize(date_stamp),
            t.date_style,
            Align::Center,
        );
    }

    // -- Story pages ----------------------------------------------------------

    /// Lay out one logical page, starting on a fresh sheet and spilling onto
    /// further sheets as needed.
    pub fn render_page<S: DocumentSink>(&self, state: &mut LayoutState, sink: &mut S, page: &Page) {
        let t = self.template;
        let first_sheet = state.sheet + 1;
        self.start_sheet(state, sink, None);

        if self.ornaments && page.index > 0 {
            self.cell(
                state,
                sink,
                BlockKind::Ornament,
                &format!("~ {} ~", page.index),
                t.ornament_style,
                Align::Center,
            );
            state.advance(t.ornament_gap_mm);
        }

        for raw in page.lines() {
            let sanitized = sanitize(raw);
            let line = sanitized.trim();

            match classify_line(line) {
                LineKind::Blank => state.advance(t.blank_line_gap_mm),
                LineKind::Callout => {
                    self.multi_cell(
                        state,
                        sink,
                        BlockKind::Callout,
                        line,
                        t.callout_style,
                        t.body_line_height_mm,
                        Align::Left,
                    );
                    state.advance(t.callout_gap_mm);
                }
                LineKind::Narrative => {
                    self.multi_cell(
                        state,
                        sink,
                        BlockKind::Narrative,
                        line,
                        t.narrative_style,
                        t.body_line_height_mm,
                        Align::Left,
                    );
                    state.advance(t.narrative_gap_mm);
                }
            }
        }

        debug!(
            page = page.index,
            sheets = state.sheet + 1 - first_sheet,
            "page laid out"
        );
    }

    // -- Cells ----------------------------------------------------------------

    /// Break to a new sheet if `height_mm` does not fit under the cursor.
    fn ensure_room<S: DocumentSink>(&self, state: &mut LayoutState, sink: &mut S, height_mm: f32) {
        if !state.fits(height_mm, self.template.break_limit_mm()) {
            debug!(
                sheet = state.sheet,
                cursor_mm = state.cursor_mm,
                "overflow, continuing on a new sheet"
            );
            self.start_sheet(state, sink, None);
        }
    }

    /// Single-line cell at the cursor. The cursor does not move.
    fn cell<S: DocumentSink>(
        &self,
        state: &mut LayoutState,
        sink: &mut S,
        kind: BlockKind,
        text: &str,
        style: TextStyle,
        align: Align,
    ) {
        let height = self.template.cell_height_mm;
        self.ensure_room(state, sink, height);
        self.place_cell(sink, kind, text, style, state.cursor_mm, height, align);
    }

    /// Wrapped text; the cursor ends below the last line.
    #[allow(clippy::too_many_arguments)]
    fn multi_cell<S: DocumentSink>(
        &self,
        state: &mut LayoutState,
        sink: &mut S,
        kind: BlockKind,
        text: &str,
        style: TextStyle,
        line_height_mm: f32,
        align: Align,
    ) {
        let width = self.template.wrap_width_mm();
        for line in wrap_text(text, style.face, style.size_pt, width) {
            self.ensure_room(state, sink, line_height_mm);
            if !line.is_empty() {
                self.place_cell(sink, kind, &line, style, state.cursor_mm, line_height_mm, align);
            }
            state.advance(line_height_mm);
        }
    }

    /// Emit one line of text vertically centred in a cell whose top edge is at
    /// `top_mm`.
    #[allow(clippy::too_many_arguments)]
    fn place_cell<S: DocumentSink>(
        &self,
        sink: &mut S,
        kind: BlockKind,
        text: &str,
        style: TextStyle,
        top_mm: f32,
        height_mm: f32,
        align: Align,
    ) {
        let t = self.template;
        let x_mm = match align {
            Align::Left => t.side_margin_mm + t.cell_padding_mm,
            Align::Center => {
                let width = text_width_mm(text, style.face, style.size_pt);
                t.side_margin_mm + (t.content_width_mm() - width) / 2.0
            }
        };
        let baseline_mm = top_mm + 0.5 * height_mm + 0.3 * pt_to_mm(style.size_pt);

        sink.place_text(&PlacedText {
            kind,
            text: text.to_owned(),
            x_mm,
            baseline_mm,
            style,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{RecordedSheet, RecordingSink};

    fn lay_out(pages: &[Page]) -> Vec<RecordedSheet> {
        let template = StoryTemplate::default();
        let engine = LayoutEngine::new(&template, "The Brave Little Star");
        let mut state = LayoutState::new();
        let mut sink = RecordingSink::new();

        engine.render_title_page(&mut state, &mut sink, "Ada", "May 2026");
        for page in pages {
            engine.render_page(&mut state, &mut sink, page);
        }
        sink.finish().expect("recording never fails")
    }

    #[test]
    fn bracketed_line_is_a_callout() {
        assert_eq!(classify_line("[Illustration: a cat]"), LineKind::Callout);
        assert_eq!(classify_line("  [Illustration: a cat]  "), LineKind::Callout);
    }

    #[test]
    fn unbracketed_line_is_narrative() {
        assert_eq!(classify_line("Illustration: a cat"), LineKind::Narrative);
        assert_eq!(classify_line("[half open"), LineKind::Narrative);
        assert_eq!(classify_line("closed only]"), LineKind::Narrative);
    }

    #[test]
    fn whitespace_line_is_blank() {
        assert_eq!(classify_line(""), LineKind::Blank);
        assert_eq!(classify_line(" \t "), LineKind::Blank);
    }

    #[test]
    fn wrap_keeps_short_text_on_one_line() {
        let lines = wrap_text("Once upon a time", FontFace::Helvetica, 14.0, 188.0);
        assert_eq!(lines, vec!["Once upon a time"]);
    }

    #[test]
    fn wrap_respects_width() {
        let text = "the quick brown fox jumps over the lazy dog ".repeat(10);
        let lines = wrap_text(&text, FontFace::Helvetica, 14.0, 100.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width_mm(line, FontFace::Helvetica, 14.0) <= 100.0 + 1e-3);
        }
        assert_eq!(lines.join(" "), text.trim_end());
    }

    #[test]
    fn wrap_breaks_oversized_words() {
        let word = "a".repeat(200);
        let lines = wrap_text(&word, FontFace::Helvetica, 14.0, 50.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn wrap_of_empty_text_is_one_empty_line() {
        assert_eq!(wrap_text("   ", FontFace::Helvetica, 14.0, 50.0), vec![String::new()]);
    }

    #[test]
    fn title_page_has_all_parts() {
        let sheets = lay_out(&[]);
        assert_eq!(sheets.len(), 1);

        let title = &sheets[0];
        assert_eq!(title.fills.len(), 1);
        assert_eq!(title.rules.len(), 1);
        assert_eq!(title.texts_of(BlockKind::Title).collect::<Vec<_>>(), vec!["The Brave Little Star"]);
        assert_eq!(title.texts_of(BlockKind::Byline).collect::<Vec<_>>(), vec!["Written by Ada"]);
        assert_eq!(title.texts_of(BlockKind::DateStamp).collect::<Vec<_>>(), vec!["May 2026"]);
    }

    #[test]
    fn long_title_wraps_and_stays_centred() {
        let template = StoryTemplate::default();
        let title = "The Extraordinarily Long Adventures of a Very Small Hedgehog Named Bartholomew";
        let engine = LayoutEngine::new(&template, title);
        let mut state = LayoutState::new();
        let mut sink = RecordingSink::new();

        engine.render_title_page(&mut state, &mut sink, "Ada", "May 2026");
        let sheets = sink.finish().expect("finish");

        let titles: Vec<&PlacedText> = sheets[0]
            .texts
            .iter()
            .filter(|text| text.kind == BlockKind::Title)
            .collect();
        assert!(titles.len() > 1);
        for line in titles {
            let width = text_width_mm(&line.text, FontFace::HelveticaBold, 32.0);
            let centre = line.x_mm + width / 2.0;
            assert!((centre - 105.0).abs() < 0.01);
        }
    }

    #[test]
    fn callouts_and_prose_get_their_own_styles() {
        let page = Page::new(1, "Twinkle was small.\n\n[Illustration: a tiny star]\nShe dreamed big.");
        let sheets = lay_out(&[page]);
        let content = &sheets[1];

        let callouts: Vec<&PlacedText> = content
            .texts
            .iter()
            .filter(|text| text.kind == BlockKind::Callout)
            .collect();
        assert_eq!(callouts.len(), 1);
        assert_eq!(callouts[0].text, "[Illustration: a tiny star]");
        assert_eq!(callouts[0].style.face, FontFace::HelveticaOblique);

        let prose: Vec<&str> = content.texts_of(BlockKind::Narrative).collect();
        assert_eq!(prose, vec!["Twinkle was small.", "She dreamed big."]);
    }

    #[test]
    fn ornament_uses_page_index() {
        let sheets = lay_out(&[Page::new(1, "a"), Page::new(2, "b")]);
        assert_eq!(sheets[1].texts_of(BlockKind::Ornament).collect::<Vec<_>>(), vec!["~ 1 ~"]);
        assert_eq!(sheets[2].texts_of(BlockKind::Ornament).collect::<Vec<_>>(), vec!["~ 2 ~"]);
    }

    #[test]
    fn ornaments_can_be_disabled() {
        let template = StoryTemplate::default();
        let engine = LayoutEngine::new(&template, "T").with_ornaments(false);
        let mut state = LayoutState::new();
        let mut sink = RecordingSink::new();
        engine.render_page(&mut state, &mut sink, &Page::new(1, "text"));
        let sheets = sink.finish().expect("finish");
        assert_eq!(sheets[0].texts_of(BlockKind::Ornament).count(), 0);
    }

    #[test]
    fn long_page_overflows_onto_more_sheets() {
        let text = (0..120)
            .map(|n| format!("Line number {n} of a very long bedtime story."))
            .collect::<Vec<_>>()
            .join("\n");
        let sheets = lay_out(&[Page::new(1, text)]);
        assert!(sheets.len() > 2, "expected overflow, got {} sheets", sheets.len());

        let template = StoryTemplate::default();
        for sheet in &sheets {
            assert_eq!(sheet.texts_of(BlockKind::Header).collect::<Vec<_>>(), vec!["The Brave Little Star"]);
            assert_eq!(
                sheet.texts_of(BlockKind::Footer).collect::<Vec<_>>(),
                vec![format!("Page {}", sheet.number)]
            );
            for text in sheet.texts.iter().filter(|t| t.kind == BlockKind::Narrative) {
                assert!(text.baseline_mm < template.break_limit_mm());
                assert!(text.baseline_mm > template.body_top_mm);
            }
        }

        // Overflow never repeats the ornament.
        let ornaments: usize = sheets.iter().map(|s| s.texts_of(BlockKind::Ornament).count()).sum();
        assert_eq!(ornaments, 1);
    }

    #[test]
    fn empty_page_still_yields_a_sheet() {
        let sheets = lay_out(&[Page::new(1, "")]);
        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[1].texts_of(BlockKind::Narrative).count(), 0);
    }

    #[test]
    fn lines_are_sanitized() {
        let sheets = lay_out(&[Page::new(1, "\u{201C}Hi\u{201D} \u{1F31F}\n\u{00A0}\n[Art\u{2014}note]")]);
        let texts: Vec<&str> = sheets[1]
            .texts
            .iter()
            .filter(|t| matches!(t.kind, BlockKind::Narrative | BlockKind::Callout))
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(texts, vec!["\"Hi\"", "[Art--note]"]);
    }

    #[test]
    fn title_page_and_headers_share_the_sanitized_title() {
        let template = StoryTemplate::default();
        let engine = LayoutEngine::new(&template, "  Luna\u{2019}s Trip \u{1F680} ");
        assert_eq!(engine.title(), "Luna's Trip");

        let mut state = LayoutState::new();
        let mut sink = RecordingSink::new();
        engine.render_title_page(&mut state, &mut sink, "Ada", "May 2026");
        engine.render_page(&mut state, &mut sink, &Page::new(1, "Hello."));
        let sheets = sink.finish().expect("finish");

        assert_eq!(sheets[0].texts_of(BlockKind::Title).collect::<Vec<_>>(), vec!["Luna's Trip"]);
        for sheet in &sheets {
            assert_eq!(sheet.texts_of(BlockKind::Header).collect::<Vec<_>>(), vec!["Luna's Trip"]);
        }
    }

    #[test]
    fn header_is_sanitized_and_omitted_when_blank() {
        let template = StoryTemplate::default();
        let engine = LayoutEngine::new(&template, "\u{1F600}");
        let mut state = LayoutState::new();
        let mut sink = RecordingSink::new();
        engine.start_sheet(&mut state, &mut sink, None);
        let sheets = sink.finish().expect("finish");
        assert_eq!(sheets[0].texts_of(BlockKind::Header).count(), 0);
        assert_eq!(sheets[0].texts_of(BlockKind::Footer).count(), 1);
    }
}
