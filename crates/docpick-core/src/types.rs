// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the picker bridge.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{PickerAction, PickerConfig};
use crate::naming;

/// Identifier of a single `selectFile` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque reference to a user-selected item, as handed back by the chooser.
///
/// Not necessarily a filesystem path: on Android this is normally a
/// `content://` URI that only the content resolver can open.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentUri(String);

impl ContentUri {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// URI scheme, e.g. `content` or `file`.
    pub fn scheme(&self) -> Option<&str> {
        naming::uri_scheme(&self.0)
    }

    /// Whether the URI carries provider metadata (`content://`).
    pub fn is_content(&self) -> bool {
        self.scheme() == Some("content")
    }

    /// Decoded path component.
    pub fn path(&self) -> String {
        naming::uri_path(&self.0)
    }

    /// Last segment of the decoded path.
    pub fn last_path_segment(&self) -> String {
        naming::last_path_segment(&self.0)
    }
}

impl std::fmt::Display for ContentUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// `Activity.RESULT_OK`.
pub const RESULT_OK: i32 = -1;
/// `Activity.RESULT_CANCELED`.
pub const RESULT_CANCELED: i32 = 0;

/// Result code reported by the OS when the chooser finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultCode {
    Ok,
    Canceled,
    /// Any other (failure or custom) code.
    Other(i32),
}

impl ResultCode {
    pub fn from_raw(code: i32) -> Self {
        match code {
            RESULT_OK => ResultCode::Ok,
            RESULT_CANCELED => ResultCode::Canceled,
            other => ResultCode::Other(other),
        }
    }

    pub fn raw(self) -> i32 {
        match self {
            ResultCode::Ok => RESULT_OK,
            ResultCode::Canceled => RESULT_CANCELED,
            ResultCode::Other(code) => code,
        }
    }
}

/// What the OS delivers to the activity-result callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityResult {
    pub result_code: ResultCode,
    /// The picked item (`Intent.getData()`), if any.
    pub data: Option<ContentUri>,
}

impl ActivityResult {
    pub fn picked(uri: ContentUri) -> Self {
        Self {
            result_code: ResultCode::Ok,
            data: Some(uri),
        }
    }

    pub fn canceled() -> Self {
        Self {
            result_code: ResultCode::Canceled,
            data: None,
        }
    }
}

/// Final outcome of a `selectFile` request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    /// Absolute path of the temporary copy.
    Imported(PathBuf),
    /// The user dismissed the chooser.
    Cancelled,
}

/// Everything the platform needs to launch the chooser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerIntent {
    pub action: PickerAction,
    pub mime_type: String,
    /// Restrict to items that can be opened as a stream (`CATEGORY_OPENABLE`).
    pub openable_only: bool,
}

impl PickerIntent {
    pub fn from_config(config: &PickerConfig) -> Self {
        Self {
            action: config.picker_action,
            mime_type: config.mime_type.clone(),
            openable_only: true,
        }
    }
}

/// Book-keeping for the single request awaiting the chooser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingInfo {
    pub id: RequestId,
    pub issued_at: DateTime<Utc>,
}

impl PendingInfo {
    pub fn new() -> Self {
        Self {
            id: RequestId::new(),
            issued_at: Utc::now(),
        }
    }

    /// Milliseconds elapsed since the request was issued.
    pub fn waited_ms(&self) -> i64 {
        (Utc::now() - self.issued_at).num_milliseconds()
    }
}

impl Default for PendingInfo {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_codes_round_trip_android_constants() {
        assert_eq!(ResultCode::from_raw(-1), ResultCode::Ok);
        assert_eq!(ResultCode::from_raw(0), ResultCode::Canceled);
        assert_eq!(ResultCode::from_raw(1), ResultCode::Other(1));
        assert_eq!(ResultCode::Other(42).raw(), 42);
    }

    #[test]
    fn content_uri_helpers() {
        let uri = ContentUri::new("content://com.example.docs/document/report.pdf");
        assert!(uri.is_content());
        assert_eq!(uri.last_path_segment(), "report.pdf");

        let file = ContentUri::new("file:///tmp/x.bin");
        assert!(!file.is_content());
        assert_eq!(file.path(), "/tmp/x.bin");
    }

    #[test]
    fn request_ids_are_unique() {
        assert_ne!(RequestId::new(), RequestId::new());
    }

    #[test]
    fn intent_follows_config() {
        let config = PickerConfig {
            mime_type: "application/pdf".into(),
            picker_action: PickerAction::GetContent,
            ..PickerConfig::default()
        };
        let intent = PickerIntent::from_config(&config);
        assert_eq!(intent.mime_type, "application/pdf");
        assert_eq!(intent.action, PickerAction::GetContent);
        assert!(intent.openable_only);
    }
}
