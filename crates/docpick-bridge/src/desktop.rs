// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Desktop bridge for builds where the Android APIs are unavailable.
//
// The chooser is the native file dialog from `rfd`, run on its own thread so
// the launch call returns immediately like `startActivityForResult` does.
// Picked files are reported as `file://` URIs and read back with `std::fs`.

use std::fs::File;
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};

use docpick_core::error::{PickerError, Result};
use docpick_core::types::{ActivityResult, ContentUri, PickerIntent};

use crate::traits::*;

/// Directory under the system temp dir that holds imported copies.
const CACHE_DIR_NAME: &str = "docpick";

/// Bridge returned on non-Android platforms.
#[derive(Clone, Default)]
pub struct DesktopBridge {
    listeners: Arc<Mutex<Vec<Arc<dyn ActivityResultListener>>>>,
}

impl DesktopBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand a result to the registered listeners, first taker wins.
    pub fn deliver(&self, request_code: i32, result: ActivityResult) -> bool {
        dispatch(&self.listeners, request_code, result)
    }
}

fn dispatch(
    listeners: &Mutex<Vec<Arc<dyn ActivityResultListener>>>,
    request_code: i32,
    result: ActivityResult,
) -> bool {
    let snapshot: Vec<_> = match listeners.lock() {
        Ok(guard) => guard.clone(),
        Err(_) => return false,
    };
    let handled = snapshot
        .iter()
        .any(|listener| listener.on_activity_result(request_code, result.clone()));
    if !handled {
        tracing::warn!(request_code, "activity result not claimed by any listener");
    }
    handled
}

/// Encode a local path as a `file://` URI.
///
/// Walks path components rather than the raw string so Windows separators
/// and drive prefixes (`C:`) come out as `file:///C:/dir/name`.
pub fn file_uri(path: &Path) -> ContentUri {
    let mut uri = String::from("file://");
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => {
                let prefix = prefix.as_os_str().to_string_lossy().replace('\\', "/");
                uri.push('/');
                uri.push_str(prefix.trim_start_matches('/'));
            }
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir => uri.push_str("/.."),
            Component::Normal(segment) => {
                uri.push('/');
                uri.push_str(&urlencoding::encode(&segment.to_string_lossy()));
            }
        }
    }
    if uri.len() == "file://".len() {
        uri.push('/');
    }
    ContentUri::new(uri)
}

/// Turn a decoded `file://` path back into a local path.
///
/// On Windows the leading `/` before a drive letter is dropped.
fn path_from_uri_path(path: &str) -> PathBuf {
    let bytes = path.as_bytes();
    let drive = bytes.len() >= 3
        && bytes[0] == b'/'
        && bytes[1].is_ascii_alphabetic()
        && bytes[2] == b':';
    if cfg!(windows) && drive {
        PathBuf::from(&path[1..])
    } else {
        PathBuf::from(path)
    }
}

/// Map a URI this bridge understands back to a local path.
fn local_path(uri: &ContentUri) -> Result<PathBuf> {
    match uri.scheme() {
        Some("file") | None => Ok(path_from_uri_path(&uri.path())),
        Some(other) => Err(PickerError::Bridge(format!(
            "desktop bridge cannot resolve `{other}` URIs: {uri}"
        ))),
    }
}

impl PlatformBridge for DesktopBridge {
    fn platform_name(&self) -> &str {
        "Desktop"
    }
}

impl NativeActivityHost for DesktopBridge {
    fn platform_version(&self) -> String {
        format!("Desktop {} ({})", std::env::consts::OS, std::env::consts::ARCH)
    }

    fn has_foreground_activity(&self) -> bool {
        true
    }

    fn launch_document_picker(&self, intent: &PickerIntent, request_code: i32) -> Result<()> {
        tracing::info!(
            mime = %intent.mime_type,
            request_code,
            "Desktop: opening file dialog"
        );

        let listeners = Arc::clone(&self.listeners);
        std::thread::Builder::new()
            .name("docpick-dialog".into())
            .spawn(move || {
                let result = match rfd::FileDialog::new().set_title("Select a file").pick_file() {
                    Some(path) => ActivityResult::picked(file_uri(&path)),
                    None => ActivityResult::canceled(),
                };
                dispatch(&listeners, request_code, result);
            })?;
        Ok(())
    }

    fn add_activity_result_listener(&self, listener: Arc<dyn ActivityResultListener>) {
        if let Ok(mut guard) = self.listeners.lock() {
            guard.push(listener);
        }
    }
}

impl NativeContentResolver for DesktopBridge {
    fn query_display_name(&self, _uri: &ContentUri) -> Result<Option<String>> {
        // Plain files carry no provider metadata.
        Ok(None)
    }

    fn open_input_stream(&self, uri: &ContentUri) -> Result<Box<dyn Read + Send>> {
        let path = local_path(uri)?;
        tracing::debug!(path = %path.display(), "Desktop: opening picked file");
        Ok(Box::new(File::open(path)?))
    }

    fn cache_dir(&self) -> Result<PathBuf> {
        let dir = std::env::temp_dir().join(CACHE_DIR_NAME);
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}
