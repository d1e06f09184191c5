// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Assembly configuration, persisted as JSON.

use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StorypressError};

/// Paragraphs grouped onto one page when the story has no page markers.
pub const PARAGRAPHS_PER_PAGE: usize = 3;

/// Author shown on the title page when the caller supplies none.
pub const DEFAULT_AUTHOR: &str = "StoryLand AI";

/// Settings for the document assembler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    /// Paper size for every sheet.
    pub paper_size: crate::PaperSize,
    /// Directory used when the caller does not name a destination.
    pub output_dir: PathBuf,
    /// Author used when the supplied author is blank.
    pub default_author: String,
    /// `strftime` pattern for the title-page date stamp.
    pub date_format: String,
    /// Paragraph group size for stories without page markers.
    pub paragraphs_per_page: usize,
    /// Draw the `~ N ~` ornament at the top of each story page.
    pub page_ornaments: bool,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            paper_size: crate::PaperSize::A4,
            output_dir: PathBuf::from("storage/pdfs"),
            default_author: DEFAULT_AUTHOR.to_owned(),
            date_format: "%B %Y".to_owned(),
            paragraphs_per_page: PARAGRAPHS_PER_PAGE,
            page_ornaments: true,
        }
    }
}

impl AssemblyConfig {
    /// Load and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Reject values the layout cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.paragraphs_per_page == 0 {
            return Err(StorypressError::InvalidConfig(
                "paragraphs_per_page must be at least 1".into(),
            ));
        }

        let (width_mm, height_mm) = self.paper_size.dimensions_mm();
        // Margins, header and footer need roughly 120 x 150 mm to fit anything.
        if width_mm < 120 || height_mm < 150 {
            return Err(StorypressError::InvalidConfig(format!(
                "paper {width_mm}x{height_mm}mm is too small for the storybook template"
            )));
        }

        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(StorypressError::InvalidConfig(format!(
                "bad date format {:?}",
                self.date_format
            )));
        }

        Ok(())
    }
}
