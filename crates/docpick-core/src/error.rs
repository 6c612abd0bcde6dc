// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for docpick.

use thiserror::Error;

/// Channel error code: no foreground activity to launch the chooser from.
pub const CODE_NO_ACTIVITY: &str = "NO_ACTIVITY";
/// Channel error code: a pick is already awaiting its result.
pub const CODE_ALREADY_ACTIVE: &str = "ALREADY_ACTIVE";
/// Channel error code: the picked content could not be imported.
pub const CODE_IMPORT_ERROR: &str = "IMPORT_ERROR";

/// Top-level error type for all docpick operations.
#[derive(Debug, Error)]
pub enum PickerError {
    // -- Preconditions --
    #[error("no foreground activity is available")]
    NoActivity,

    #[error("a file pick is already pending")]
    AlreadyActive,

    // -- Import --
    #[error("import failed: {0}")]
    Import(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),
}

impl PickerError {
    /// Flat error code reported over the method channel.
    ///
    /// Everything that goes wrong after the chooser has been launched
    /// collapses to `IMPORT_ERROR`; the detail only reaches the logs.
    pub fn code(&self) -> &'static str {
        match self {
            PickerError::NoActivity => CODE_NO_ACTIVITY,
            PickerError::AlreadyActive => CODE_ALREADY_ACTIVE,
            PickerError::Import(_)
            | PickerError::Io(_)
            | PickerError::Serialization(_)
            | PickerError::Bridge(_) => CODE_IMPORT_ERROR,
        }
    }

    /// Static message that accompanies [`code`](Self::code) on the channel.
    pub fn message(&self) -> &'static str {
        match self.code() {
            CODE_NO_ACTIVITY => "selectFile requires a foreground activity.",
            CODE_ALREADY_ACTIVE => "File dialog is already active",
            _ => "Error importing file",
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PickerError>;
