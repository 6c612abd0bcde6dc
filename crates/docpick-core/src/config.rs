// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Picker configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// File name looked up by [`PickerConfig::load_or_default`].
pub const CONFIG_FILE: &str = "docpick.json";

/// Which system intent launches the chooser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickerAction {
    /// `Intent.ACTION_OPEN_DOCUMENT` (Storage Access Framework).
    #[default]
    OpenDocument,
    /// `Intent.ACTION_GET_CONTENT`.
    GetContent,
}

impl PickerAction {
    /// Fully-qualified Android intent action string.
    pub fn intent_action(self) -> &'static str {
        match self {
            PickerAction::OpenDocument => "android.intent.action.OPEN_DOCUMENT",
            PickerAction::GetContent => "android.intent.action.GET_CONTENT",
        }
    }
}

/// Settings for the picker bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Name of the method channel the plugin answers on.
    pub channel_name: String,
    /// Request code passed to `startActivityForResult` and matched on completion.
    pub request_code: i32,
    /// MIME filter handed to the chooser.
    pub mime_type: String,
    /// Intent action used to launch the chooser.
    pub picker_action: PickerAction,
    /// Buffer size for the content-to-file copy.
    pub copy_chunk_size: usize,
    /// Optional subdirectory of the platform cache dir for imported files.
    pub cache_subdir: Option<String>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            channel_name: "filepicker3".into(),
            request_code: 101,
            mime_type: "*/*".into(),
            picker_action: PickerAction::OpenDocument,
            copy_chunk_size: 4 * 1024,
            cache_subdir: None,
        }
    }
}

impl PickerConfig {
    /// Read a configuration file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let mut config: PickerConfig = serde_json::from_str(&data)?;
        if config.copy_chunk_size == 0 {
            config.copy_chunk_size = PickerConfig::default().copy_chunk_size;
        }
        Ok(config)
    }

    /// Load `docpick.json` from `dir`, or fall back to defaults.
    pub fn load_or_default(dir: &Path) -> Self {
        Self::load(&dir.join(CONFIG_FILE)).unwrap_or_default()
    }

    /// Write the configuration as pretty JSON.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_plugin_contract() {
        let config = PickerConfig::default();
        assert_eq!(config.request_code, 101);
        assert_eq!(config.mime_type, "*/*");
        assert_eq!(config.copy_chunk_size, 4096);
        assert_eq!(
            config.picker_action.intent_action(),
            "android.intent.action.OPEN_DOCUMENT"
        );
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "picker_action": "get_content", "copy_chunk_size": 0 }"#,
        )
        .expect("write config");

        let config = PickerConfig::load_or_default(dir.path());
        assert_eq!(config.picker_action, PickerAction::GetContent);
        assert_eq!(config.copy_chunk_size, 4096);
        assert_eq!(config.channel_name, "filepicker3");
    }

    #[test]
    fn persist_then_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        let config = PickerConfig {
            request_code: 7,
            cache_subdir: Some("imports".into()),
            ..PickerConfig::default()
        };
        config.persist(&path).expect("persist");
        assert_eq!(PickerConfig::load(&path).expect("load"), config);
    }

    #[test]
    fn missing_file_falls_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(
            PickerConfig::load_or_default(dir.path()),
            PickerConfig::default()
        );
    }
}
