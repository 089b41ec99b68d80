use super::state::SessionState;
use crate::config::ClientConfig;
use crate::events::MessageSink;
use crate::pending::PendingQueue;
use crate::sequence::SequenceCounter;
use crate::timing::SessionTiming;
use crate::transport::Transport;
use crate::window::WindowRegistry;
use std::sync::Mutex;
use std::time::Instant;

/// Shared state touched by the session's worker thread, its receive dispatcher, and any number
/// of caller threads. Every field here is independently guarded; see the crate's concurrency
/// notes for the lock-order rule between the window registry and the pending queue.
pub struct SessionInner {
    pub config: ClientConfig,
    pub timing: SessionTiming,
    pub transport: Box<dyn Transport>,
    pub sink: Box<dyn MessageSink>,
    pub sequence: SequenceCounter,
    pub window: WindowRegistry,
    pub pending: PendingQueue,
    state: Mutex<SessionState>,
    status_text: Mutex<String>,
    last_transfer: Mutex<Instant>,
}

impl SessionInner {
    pub fn new(
        config: ClientConfig,
        timing: SessionTiming,
        transport: Box<dyn Transport>,
        sink: Box<dyn MessageSink>,
    ) -> Self {
        Self {
            config,
            timing,
            transport,
            sink,
            sequence: SequenceCounter::new(),
            window: WindowRegistry::new(),
            pending: PendingQueue::new(),
            state: Mutex::new(SessionState::Disconnected),
            status_text: Mutex::new(String::new()),
            last_transfer: Mutex::new(Instant::now()),
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_state(&self, state: SessionState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }

    pub fn status_text(&self) -> String {
        self.status_text
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn set_status_text(&self, text: impl Into<String>) {
        *self.status_text.lock().unwrap_or_else(|e| e.into_inner()) = text.into();
    }

    pub fn last_transfer(&self) -> Instant {
        *self.last_transfer.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn touch(&self) {
        *self.last_transfer.lock().unwrap_or_else(|e| e.into_inner()) = Instant::now();
    }

    /// Empties the window without re-enqueuing and marks the session disconnected.
    ///
    /// Resolves the spec's open question on re-enqueue-on-disconnect: every waiter still in the
    /// window is released with `Aborted` rather than silently rebound to a sequence id that will
    /// be assigned on the next connection, which would otherwise leave it blocked until its own
    /// 30-s timeout even if the retried submission succeeds.
    pub fn abort_window_and_disconnect(&self) {
        self.window.drain_aborted();
        if self.state() != SessionState::Disposed {
            self.set_state(SessionState::Disconnected);
        }
    }

    /// Actively tears down the transport, then performs the same cleanup as a passive
    /// disconnect notification.
    pub fn disconnect(&self) {
        self.transport.disconnect();
        self.abort_window_and_disconnect();
    }
}
