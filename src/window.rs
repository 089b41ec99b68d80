//! Tracks in-flight submissions by sequence id.

use crate::pending::{PendingSubmission, SubmitOutcome};
use crate::protocol::SubmitResp;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

/// The protocol's window size: at most this many `SUBMIT`s may be outstanding at once.
pub const WINDOW_CAPACITY: usize = 16;

/// A submission the session loop has assigned a sequence id and handed to the transport.
pub struct WindowEntry {
    pub sequence_id: u32,
    pub send_time: Instant,
    submission: PendingSubmission,
}

impl WindowEntry {
    pub fn new(sequence_id: u32, send_time: Instant, submission: PendingSubmission) -> Self {
        Self {
            sequence_id,
            send_time,
            submission,
        }
    }

    fn complete(self, outcome: SubmitOutcome) {
        let _ = self.submission.completion.send(outcome);
    }
}

#[derive(Default)]
pub struct WindowRegistry {
    entries: Mutex<HashMap<u32, WindowEntry>>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_full(&self) -> bool {
        self.len() >= WINDOW_CAPACITY
    }

    /// Inserts a freshly-dispatched entry. Callers must hold `len() < WINDOW_CAPACITY` at the
    /// call site; this is the session loop's dispatch-path precondition, not re-checked here.
    pub fn insert(&self, entry: WindowEntry) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(entry.sequence_id, entry);
    }

    /// Completes and removes the entry for `sequence_id`, if one is registered. Returns `false`
    /// for an unknown sequence id (a late response after a timeout sweep already fired).
    pub fn complete(&self, sequence_id: u32, response: SubmitResp) -> bool {
        let entry = self
            .entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&sequence_id);
        match entry {
            Some(entry) => {
                entry.complete(SubmitOutcome::Response(response));
                true
            }
            None => false,
        }
    }

    /// Removes and times out every entry whose `send_time` predates `older_than`. Returns how
    /// many were swept, so the caller can drive stall detection.
    pub fn sweep_timeouts(&self, older_than: Instant) -> usize {
        let expired: Vec<WindowEntry> = {
            let mut guard = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            let expired_ids: Vec<u32> = guard
                .iter()
                .filter(|(_, entry)| entry.send_time < older_than)
                .map(|(id, _)| *id)
                .collect();
            expired_ids
                .into_iter()
                .filter_map(|id| guard.remove(&id))
                .collect()
        };
        let count = expired.len();
        for entry in expired {
            entry.complete(SubmitOutcome::Timeout);
        }
        count
    }

    /// Removes every entry and aborts its waiter, for use on link reset.
    pub fn drain_aborted(&self) {
        let entries: Vec<WindowEntry> = self
            .entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .drain()
            .map(|(_, entry)| entry)
            .collect();
        for entry in entries {
            entry.complete(SubmitOutcome::Aborted);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pending::completion_channel;
    use std::time::Duration;

    fn entry(sequence_id: u32, send_time: Instant) -> (WindowEntry, std::sync::mpsc::Receiver<SubmitOutcome>) {
        let (tx, rx) = completion_channel();
        let submission = PendingSubmission {
            dest_terminal_id: vec!["13800000000".to_owned()],
            payload: vec![0],
            tp_udhi: 0,
            msg_fmt: 8,
            pk_total: 1,
            pk_number: 1,
            registered_delivery: 0,
            src_id: "106575".to_owned(),
            completion: tx,
        };
        (WindowEntry::new(sequence_id, send_time, submission), rx)
    }

    #[test]
    fn complete_removes_and_signals_once() {
        let registry = WindowRegistry::new();
        let (entry, rx) = entry(1, Instant::now());
        registry.insert(entry);
        assert_eq!(registry.len(), 1);

        let response = SubmitResp {
            msg_id: [0; 8],
            result: 0,
        };
        assert!(registry.complete(1, response));
        assert_eq!(registry.len(), 0);
        assert!(matches!(rx.recv().unwrap(), SubmitOutcome::Response(_)));
    }

    #[test]
    fn unknown_sequence_id_is_ignored() {
        let registry = WindowRegistry::new();
        assert!(!registry.complete(99, SubmitResp { msg_id: [0; 8], result: 0 }));
    }

    #[test]
    fn sweep_times_out_only_stale_entries() {
        let registry = WindowRegistry::new();
        let (stale, stale_rx) = entry(1, Instant::now() - Duration::from_secs(60));
        let (fresh, _fresh_rx) = entry(2, Instant::now());
        registry.insert(stale);
        registry.insert(fresh);

        let swept = registry.sweep_timeouts(Instant::now() - Duration::from_secs(30));
        assert_eq!(swept, 1);
        assert_eq!(registry.len(), 1);
        assert!(matches!(stale_rx.recv().unwrap(), SubmitOutcome::Timeout));
    }

    #[test]
    fn drain_aborted_empties_registry_and_signals_every_waiter() {
        let registry = WindowRegistry::new();
        let (e1, rx1) = entry(1, Instant::now());
        let (e2, rx2) = entry(2, Instant::now());
        registry.insert(e1);
        registry.insert(e2);

        registry.drain_aborted();
        assert_eq!(registry.len(), 0);
        assert!(matches!(rx1.recv().unwrap(), SubmitOutcome::Aborted));
        assert!(matches!(rx2.recv().unwrap(), SubmitOutcome::Aborted));
    }
}
