// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for parents and educators using the storybook
// front end.
//
// Every technical error is mapped to plain English with a clear suggestion.

use crate::error::StorypressError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Disk briefly busy or full; trying again may work.
    Transient,
    /// Someone has to fix a setting or a folder.
    ActionRequired,
    /// A bug or damaged file; retrying won't help.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether the caller may retry automatically.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `StorypressError` into a `HumanError`.
pub fn humanize_error(err: &StorypressError) -> HumanError {
    match err {
        StorypressError::PdfError(_) | StorypressError::Sink(_) => HumanError {
            message: "We couldn't put your storybook together.".into(),
            suggestion: "Please try again. If it keeps happening, try a shorter story.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        StorypressError::InvalidConfig(detail) => HumanError {
            message: "The storybook settings look wrong.".into(),
            suggestion: format!("Check the settings file and fix this: {detail}"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        StorypressError::Io(io_err) => humanize_io_error(io_err),

        StorypressError::Serialization(_) => HumanError {
            message: "The settings file couldn't be read.".into(),
            suggestion: "The file may be damaged. Delete it to go back to the default settings."
                .into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}

fn humanize_io_error(err: &std::io::Error) -> HumanError {
    use std::io::ErrorKind;

    match err.kind() {
        ErrorKind::PermissionDenied => HumanError {
            message: "We aren't allowed to save the storybook there.".into(),
            suggestion: "Choose a different folder, or ask someone to give this app permission to write to it.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
        ErrorKind::NotFound => HumanError {
            message: "The folder or file couldn't be found.".into(),
            suggestion: "Check that the folder still exists, then try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
        ErrorKind::StorageFull => HumanError {
            message: "There isn't enough space to save the storybook.".into(),
            suggestion: "Free up some space, then try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
        _ => HumanError {
            message: "Saving the storybook didn't work.".into(),
            suggestion: "Wait a moment and try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}
