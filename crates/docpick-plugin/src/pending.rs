// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The single pending-request slot.
//
// `selectFile` reserves the slot and awaits a oneshot; the activity-result
// callback takes the slot and resolves the oneshot exactly once. Whatever
// happens in between (launch failure, caller dropped) the ticket's `Drop`
// puts the slot back to idle.

use std::sync::Mutex;

use tokio::sync::oneshot;
use tracing::{info, warn};

use docpick_core::error::{PickerError, Result};
use docpick_core::types::{ActivityResult, PendingInfo, RequestId};

struct Pending {
    info: PendingInfo,
    reply: oneshot::Sender<ActivityResult>,
}

/// Holds at most one request awaiting the chooser.
#[derive(Default)]
pub struct PendingSlot {
    inner: Mutex<Option<Pending>>,
}

impl PendingSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the slot. Fails with `AlreadyActive` if it is taken.
    pub fn begin(&self) -> Result<PendingTicket<'_>> {
        let mut slot = self
            .inner
            .lock()
            .map_err(|_| PickerError::Bridge("pending slot lock poisoned".into()))?;
        if let Some(existing) = slot.as_ref() {
            warn!(pending = %existing.info.id, "selectFile rejected: a pick is already pending");
            return Err(PickerError::AlreadyActive);
        }

        let (reply, receiver) = oneshot::channel();
        let info = PendingInfo::new();
        *slot = Some(Pending { info, reply });

        Ok(PendingTicket {
            slot: self,
            id: info.id,
            receiver: Some(receiver),
        })
    }

    /// Resolve the pending request with the OS result and clear the slot.
    ///
    /// Returns `false` when nothing was pending.
    pub fn complete(&self, result: ActivityResult) -> bool {
        let pending = match self.inner.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => None,
        };
        let Some(pending) = pending else {
            warn!(
                result_code = result.result_code.raw(),
                "activity result arrived with no pending request"
            );
            return false;
        };

        info!(
            request_id = %pending.info.id,
            result_code = result.result_code.raw(),
            waited_ms = pending.info.waited_ms(),
            "chooser finished"
        );
        if pending.reply.send(result).is_err() {
            warn!(request_id = %pending.info.id, "caller went away before the chooser finished");
        }
        true
    }

    /// Whether no request is pending.
    pub fn is_idle(&self) -> bool {
        self.inner.lock().map(|slot| slot.is_none()).unwrap_or(false)
    }

    /// Id of the pending request, if any.
    pub fn pending_id(&self) -> Option<RequestId> {
        self.inner
            .lock()
            .ok()
            .and_then(|slot| slot.as_ref().map(|p| p.info.id))
    }

    fn abandon(&self, id: RequestId) {
        if let Ok(mut slot) = self.inner.lock() {
            if slot.as_ref().is_some_and(|p| p.info.id == id) {
                slot.take();
                warn!(request_id = %id, "pending request abandoned");
            }
        }
    }
}

/// Proof that the caller owns the slot. Frees it on drop.
pub struct PendingTicket<'a> {
    slot: &'a PendingSlot,
    id: RequestId,
    receiver: Option<oneshot::Receiver<ActivityResult>>,
}

impl PendingTicket<'_> {
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Wait for the activity-result callback.
    pub async fn wait(mut self) -> Result<ActivityResult> {
        let receiver = self
            .receiver
            .take()
            .ok_or_else(|| PickerError::Import("pending request already awaited".into()))?;
        receiver
            .await
            .map_err(|_| PickerError::Import("pending request dropped without a result".into()))
    }
}

impl Drop for PendingTicket<'_> {
    fn drop(&mut self) {
        self.slot.abandon(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docpick_core::types::ContentUri;

    #[test]
    fn second_begin_is_rejected() {
        let slot = PendingSlot::new();
        let _first = slot.begin().expect("first");
        assert!(matches!(slot.begin(), Err(PickerError::AlreadyActive)));
    }

    #[test]
    fn dropping_ticket_frees_slot() {
        let slot = PendingSlot::new();
        let ticket = slot.begin().expect("begin");
        assert_eq!(slot.pending_id(), Some(ticket.id()));
        drop(ticket);
        assert!(slot.is_idle());
        assert!(slot.begin().is_ok());
    }

    #[test]
    fn complete_without_pending_is_ignored() {
        let slot = PendingSlot::new();
        assert!(!slot.complete(ActivityResult::canceled()));
    }

    #[tokio::test]
    async fn completion_reaches_waiter_and_clears() {
        let slot = PendingSlot::new();
        let ticket = slot.begin().expect("begin");

        let uri = ContentUri::new("content://p/document/9");
        assert!(slot.complete(ActivityResult::picked(uri.clone())));
        assert!(slot.is_idle());

        let result = ticket.wait().await.expect("result");
        assert_eq!(result.data, Some(uri));
    }

    #[tokio::test]
    async fn stale_ticket_does_not_clear_newer_request() {
        let slot = PendingSlot::new();
        let first = slot.begin().expect("first");
        slot.complete(ActivityResult::canceled());

        let second = slot.begin().expect("second");
        let first_result = first.wait().await.expect("first result");
        assert_eq!(first_result, ActivityResult::canceled());

        // `first` has been consumed and dropped; the second request survives.
        assert_eq!(slot.pending_id(), Some(second.id()));
    }
}
