// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the native picker capabilities.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use docpick_core::error::Result;
use docpick_core::types::{ActivityResult, ContentUri, PickerIntent};

/// Unified bridge that groups the native capabilities the picker needs.
pub trait PlatformBridge: NativeActivityHost + NativeContentResolver + Send + Sync {
    /// Human-readable platform name (e.g. "Android", "Desktop").
    fn platform_name(&self) -> &str;
}

/// Receives activity results delivered by the OS.
///
/// Mirrors `PluginRegistry.ActivityResultListener`: return `true` when the
/// result was meant for this listener, `false` to let others look at it.
pub trait ActivityResultListener: Send + Sync {
    fn on_activity_result(&self, request_code: i32, result: ActivityResult) -> bool;
}

/// The foreground UI surface that can launch the chooser.
pub trait NativeActivityHost {
    /// Host OS name and version, e.g. "Android 14". Never fails.
    fn platform_version(&self) -> String;

    /// Whether a foreground activity is currently attached.
    fn has_foreground_activity(&self) -> bool;

    /// Launch the system document chooser.
    ///
    /// Returns as soon as the chooser is up; the picked item arrives later
    /// through every registered [`ActivityResultListener`], tagged with
    /// `request_code`.
    fn launch_document_picker(&self, intent: &PickerIntent, request_code: i32) -> Result<()>;

    /// Register a listener for activity results.
    fn add_activity_result_listener(&self, listener: Arc<dyn ActivityResultListener>);
}

/// Access to picked content and the private cache area.
pub trait NativeContentResolver {
    /// Display name from the provider's metadata, if it has one.
    ///
    /// Only `content://` URIs carry metadata; other schemes return `Ok(None)`.
    fn query_display_name(&self, uri: &ContentUri) -> Result<Option<String>>;

    /// Open a byte stream over the picked item.
    fn open_input_stream(&self, uri: &ContentUri) -> Result<Box<dyn Read + Send>>;

    /// Private, writable cache directory for temporary copies.
    fn cache_dir(&self) -> Result<PathBuf>;
}
