//! The session engine's public surface: [`Session`], built from the state machine, window
//! registry, pending queue, fragmenter, sender API, receive dispatcher, and background worker.

mod dispatch;
mod inner;
mod sender;
mod state;
mod worker;

pub use state::SessionState;

use crate::config::ClientConfig;
use crate::error::CmppError;
use crate::events::MessageSink;
use crate::status::SendStatus;
use crate::timing::SessionTiming;
use crate::transport::Transport;
use inner::SessionInner;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

/// A running CMPP 3.0 session.
///
/// Construct with [`Session::start`]; [`Session::send`] is synchronous end-to-end and safe to
/// call from any number of threads at once. The session owns exactly one background worker
/// thread, which drives connection, authentication, submission dispatch, and keepalive; nothing
/// else in this crate spawns a thread.
pub struct Session {
    inner: Arc<SessionInner>,
    stop: Arc<AtomicBool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Session {
    /// Performs the first connection attempt and, on success, starts the background session
    /// thread that takes over connecting from there.
    ///
    /// Uses [`SessionTiming::default`], which reproduces the specified durations (30-s submit
    /// budget, 10-s authentication/idle threshold, 3-s reconnect backoff, and so on) verbatim.
    /// See [`Session::start_with_timing`] to override them, e.g. for tests.
    ///
    /// # Errors
    ///
    /// Returns [`CmppError::Io`] if the transport cannot connect or the initial `CONNECT` frame
    /// cannot be written. Once the session is running, the same kind of failure instead drives
    /// the background loop's own reconnect-with-backoff behavior (spec.md §4.7) rather than
    /// being surfaced to a caller.
    pub fn start(
        config: ClientConfig,
        transport: Box<dyn Transport>,
        sink: Box<dyn MessageSink>,
    ) -> Result<Self, CmppError> {
        Self::start_with_timing(config, SessionTiming::default(), transport, sink)
    }

    /// Starts the background session thread with an explicit [`SessionTiming`]. See
    /// [`Session::start`] for the error semantics.
    pub fn start_with_timing(
        config: ClientConfig,
        timing: SessionTiming,
        transport: Box<dyn Transport>,
        sink: Box<dyn MessageSink>,
    ) -> Result<Self, CmppError> {
        let inner = Arc::new(SessionInner::new(config, timing, transport, sink));

        inner.set_state(SessionState::Connecting);
        worker::attempt_connect(&inner)?;
        worker::send_connect_frame(&inner)?;

        let stop = Arc::new(AtomicBool::new(false));
        let worker_inner = Arc::clone(&inner);
        let worker_stop = Arc::clone(&stop);
        let handle = thread::spawn(move || worker::run(worker_inner, worker_stop));

        Ok(Self {
            inner,
            stop,
            worker: Mutex::new(Some(handle)),
        })
    }

    /// Submits `content` to `receivers`, under `extendedCode`, blocking until every fragment
    /// resolves or times out. `needStatusReport` requests a delivery report from the carrier.
    ///
    /// Returns the worst outcome observed across fragments and the message ids accepted before
    /// any failure (possibly a partial list if a later fragment failed).
    pub fn send(
        &self,
        extended_code: &str,
        receivers: &[&str],
        content: &str,
        need_status_report: bool,
    ) -> (SendStatus, Vec<i64>) {
        sender::send(&self.inner, extended_code, receivers, content, need_status_report)
    }

    /// The session's current lifecycle state.
    pub fn status(&self) -> SessionState {
        self.inner.state()
    }

    /// A human-readable elaboration of [`Session::status`], most useful after
    /// `AuthenticationFailed` (e.g. `"认证失败"`).
    pub fn status_text(&self) -> String {
        self.inner.status_text()
    }

    /// Disposes the session: disconnects, releases any in-flight waiters, and joins the
    /// background worker thread. Idempotent.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
        self.inner.set_state(SessionState::Disposed);
        self.inner.disconnect();
        if let Some(handle) = self.worker.lock().unwrap_or_else(|e| e.into_inner()).take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop();
    }
}
