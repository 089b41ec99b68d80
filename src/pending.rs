//! The FIFO of submissions waiting for a window slot.

use crate::protocol::SubmitResp;
use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::Mutex;

/// `Send` is rejected with [`crate::SendStatus::Congested`] once the pending queue reaches this
/// many entries.
pub const CONGESTION_THRESHOLD: usize = 16;

/// What a submission's completion channel ultimately carries.
///
/// `Timeout` and `Aborted` are distinct: a sweep firing `Timeout` means no `SUBMIT_RESP` ever
/// matched this sequence id within its 30-s budget, while `Aborted` means a link reset cleared
/// the window before the caller's own wait elapsed (see `Session`'s disconnect handling).
#[derive(Debug, Clone, Copy)]
pub enum SubmitOutcome {
    Response(SubmitResp),
    Timeout,
    Aborted,
}

/// Creates a one-shot completion channel for a single submission.
pub fn completion_channel() -> (SyncSender<SubmitOutcome>, Receiver<SubmitOutcome>) {
    mpsc::sync_channel(1)
}

/// A fragment produced by the fragmenter, not yet assigned a sequence id.
pub struct PendingSubmission {
    pub dest_terminal_id: Vec<String>,
    pub payload: Vec<u8>,
    pub tp_udhi: u8,
    pub msg_fmt: u8,
    pub pk_total: u8,
    pub pk_number: u8,
    pub registered_delivery: u8,
    pub src_id: String,
    pub completion: SyncSender<SubmitOutcome>,
}

#[derive(Default)]
pub struct PendingQueue {
    entries: Mutex<VecDeque<PendingSubmission>>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_congested(&self) -> bool {
        self.len() >= CONGESTION_THRESHOLD
    }

    pub fn push(&self, submission: PendingSubmission) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(submission);
    }

    pub fn pop(&self) -> Option<PendingSubmission> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
    }
}
