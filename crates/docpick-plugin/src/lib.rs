// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docpick — Picker plugin: method dispatch, the pending-request handshake,
// and the import of the picked item into the cache directory.

pub mod channel;
pub mod import;
pub mod pending;
pub mod plugin;

#[cfg(test)]
pub(crate) mod fake;

pub use channel::{Method, MethodCall, MethodReply};
pub use import::ImportedFile;
pub use plugin::FilePickerPlugin;
