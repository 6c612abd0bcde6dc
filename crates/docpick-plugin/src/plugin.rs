// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The picker plugin: answers method calls and listens for the chooser result.
//
// State machine: Idle -> AwaitingPickerResult -> Idle. The activity-result
// callback only resolves the pending oneshot; the awaiting `selectFile`
// task then does the import on a blocking worker and replies.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use docpick_bridge::traits::{ActivityResultListener, PlatformBridge};
use docpick_core::PickerConfig;
use docpick_core::error::{PickerError, Result};
use docpick_core::types::{ActivityResult, PickOutcome, PickerIntent, RequestId, ResultCode};

use crate::channel::{Method, MethodCall, MethodReply};
use crate::import;
use crate::pending::PendingSlot;

/// Method-channel handler backed by a [`PlatformBridge`].
pub struct FilePickerPlugin {
    bridge: Arc<dyn PlatformBridge>,
    config: PickerConfig,
    pending: PendingSlot,
}

impl FilePickerPlugin {
    pub fn new(bridge: Arc<dyn PlatformBridge>, config: PickerConfig) -> Self {
        Self {
            bridge,
            config,
            pending: PendingSlot::new(),
        }
    }

    /// Create the plugin and subscribe it to the bridge's activity results.
    pub fn register(bridge: Arc<dyn PlatformBridge>, config: PickerConfig) -> Arc<Self> {
        let plugin = Arc::new(Self::new(Arc::clone(&bridge), config));
        bridge.add_activity_result_listener(plugin.clone());
        info!(
            channel = %plugin.config.channel_name,
            platform = bridge.platform_name(),
            "file picker plugin registered"
        );
        plugin
    }

    pub fn channel_name(&self) -> &str {
        &self.config.channel_name
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    /// Whether no pick is awaiting the chooser.
    pub fn is_idle(&self) -> bool {
        self.pending.is_idle()
    }

    pub fn pending_request(&self) -> Option<RequestId> {
        self.pending.pending_id()
    }

    /// Host OS name and version.
    pub fn platform_version(&self) -> String {
        self.bridge.platform_version()
    }

    /// Launch the chooser and import whatever the user picks.
    pub async fn select_file(&self) -> Result<PickOutcome> {
        if !self.bridge.has_foreground_activity() {
            warn!("selectFile called without a foreground activity");
            return Err(PickerError::NoActivity);
        }

        let ticket = self.pending.begin()?;
        info!(request_id = %ticket.id(), "selectFile: launching chooser");

        let intent = PickerIntent::from_config(&self.config);
        self.bridge
            .launch_document_picker(&intent, self.config.request_code)?;

        let result = ticket.wait().await?;
        self.finish(result).await
    }

    async fn finish(&self, result: ActivityResult) -> Result<PickOutcome> {
        match result.result_code {
            ResultCode::Ok => {
                let uri = result
                    .data
                    .ok_or_else(|| PickerError::Import("chooser returned no data".into()))?;
                let bridge = Arc::clone(&self.bridge);
                let config = self.config.clone();
                // If this future is dropped mid-copy the unclaimed copy is
                // deleted when the blocking job's output is discarded.
                let imported = tokio::task::spawn_blocking(move || {
                    import::import_picked(bridge.as_ref(), &uri, &config)
                        .map(import::UnclaimedImport::new)
                })
                .await
                .map_err(|e| PickerError::Import(format!("import task failed: {e}")))??
                .claim();
                Ok(PickOutcome::Imported(imported.path))
            }
            ResultCode::Canceled => {
                info!("selectFile: user cancelled the chooser");
                Ok(PickOutcome::Cancelled)
            }
            ResultCode::Other(code) => Err(PickerError::Import(format!(
                "chooser finished with result code {code}"
            ))),
        }
    }

    /// Answer one method call.
    pub async fn handle(&self, call: &MethodCall) -> MethodReply {
        match Method::parse(&call.method) {
            Method::GetPlatformVersion => MethodReply::success(self.platform_version()),
            Method::SelectFile => match self.select_file().await {
                Ok(PickOutcome::Imported(path)) => {
                    MethodReply::success(path.to_string_lossy().into_owned())
                }
                Ok(PickOutcome::Cancelled) => MethodReply::success(Value::Null),
                Err(e) => {
                    warn!(code = e.code(), error = %e, "selectFile failed");
                    MethodReply::from_error(&e)
                }
            },
            Method::Unknown(name) => {
                debug!(method = name, "method not implemented");
                MethodReply::NotImplemented
            }
        }
    }
}

impl ActivityResultListener for FilePickerPlugin {
    fn on_activity_result(&self, request_code: i32, result: ActivityResult) -> bool {
        if request_code != self.config.request_code {
            return false;
        }
        self.pending.complete(result);
        true
    }
}
