// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! docpick — Native platform bridge abstractions.
//!
//! This crate defines the seams between the picker plugin and the operating
//! system: launching the document chooser, receiving its result, and reading
//! the chosen content. On Android the seams are backed by JNI calls into the
//! ART runtime; everywhere else a native file dialog stands in so the full
//! request/response cycle can run off-device.

use std::sync::Arc;

pub mod traits;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(target_os = "android"))]
pub mod desktop;

/// Retrieves the bridge implementation for the target operating system.
pub fn platform_bridge() -> Arc<dyn traits::PlatformBridge> {
    #[cfg(target_os = "android")]
    {
        // Android: uses `jni-rs` to invoke methods on the JVM/ART.
        Arc::new(android::AndroidBridge::new())
    }
    #[cfg(not(target_os = "android"))]
    {
        // Desktop/CI: native file dialog plus `file://` resolution.
        Arc::new(desktop::DesktopBridge::new())
    }
}
