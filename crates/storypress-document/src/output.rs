// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Artifact output — file naming, fingerprinting, and atomic writes.

use std::io::Write;
use std::path::Path;

use chrono::NaiveDateTime;
use sha2::{Digest, Sha256};
use storypress_core::error::Result;
use tracing::{debug, info, instrument};

/// Name used when nothing usable is left of the title.
const FALLBACK_STEM: &str = "story";

/// Compute the SHA-256 of `data` as a lowercase hex string.
pub fn fingerprint(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// File-system friendly version of a title: word characters, `-` and
/// whitespace are kept, whitespace becomes `_`.
pub fn safe_title(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|ch| ch.is_alphanumeric() || *ch == '_' || *ch == '-' || ch.is_whitespace())
        .collect();

    kept.trim()
        .chars()
        .map(|ch| if ch.is_whitespace() { '_' } else { ch })
        .collect()
}

/// `{safe_title}_{YYYYmmdd_HHMMSS}.pdf`
pub fn default_file_name(title: &str, at: NaiveDateTime) -> String {
    let stem = safe_title(title);
    let stem = if stem.is_empty() {
        FALLBACK_STEM
    } else {
        stem.as_str()
    };
    format!("{}_{}.pdf", stem, at.format("%Y%m%d_%H%M%S"))
}

/// Write `bytes` to `path` so that the final name only ever holds a complete
/// file.
///
/// Data goes to a temporary file in the destination directory, is synced,
/// then renamed over `path`. On failure the temporary file is removed and
/// nothing appears under `path`. Missing parent directories are created.
#[instrument(skip_all, fields(path = %path.display(), bytes_len = bytes.len()))]
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut staged = tempfile::Builder::new()
        .prefix(".storypress-")
        .suffix(".pdf.part")
        .tempfile_in(parent)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    debug!(staged = %staged.path().display(), "artifact staged");

    staged.persist(path).map_err(|err| err.error)?;
    info!("Wrote storybook PDF to {}", path.display());
    Ok(())
}
