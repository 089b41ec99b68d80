//! The background session loop: connect → authenticate → steady-state pumping →
//! reconnect, run by the one dedicated thread [`super::Session::start`] spawns.

use super::dispatch;
use super::inner::SessionInner;
use super::state::SessionState;
use crate::auth;
use crate::pending::PendingSubmission;
use crate::protocol::{ActiveTest, Connect, Message, Submit};
use crate::transport::{DisconnectCallback, ReceiveCallback};
use crate::window::WindowEntry;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

pub fn run(inner: Arc<SessionInner>, stop: Arc<AtomicBool>) {
    while !stop.load(Ordering::SeqCst) {
        match inner.state() {
            SessionState::Disconnected => connect_and_authenticate(&inner),
            SessionState::Connecting => thread::sleep(inner.timing.backpressure_tick()),
            SessionState::Authenticating => tick_authenticating(&inner),
            SessionState::AuthenticationFailed => thread::sleep(inner.timing.terminal_state_tick()),
            SessionState::Connected => pump(&inner),
            SessionState::Disposed => break,
        }
    }
    inner.transport.disconnect();
}

fn connect_and_authenticate(inner: &Arc<SessionInner>) {
    inner.set_state(SessionState::Connecting);

    if let Err(err) = attempt_connect(inner) {
        warn!("connect failed: {err}");
        inner.set_state(SessionState::Disconnected);
        thread::sleep(inner.timing.reconnect_backoff());
        return;
    }

    if let Err(err) = send_connect_frame(inner) {
        warn!("failed to send CONNECT: {err}");
        inner.disconnect();
        thread::sleep(inner.timing.reconnect_backoff());
    }
}

/// Opens the transport and arms its callbacks. Shared by the reconnect path above and
/// [`super::Session::start_with_timing`], which performs one synchronous attempt before handing
/// off to the background loop so a dead-on-arrival gateway is reported to the caller instead of
/// being silently retried forever.
pub(super) fn attempt_connect(inner: &Arc<SessionInner>) -> io::Result<()> {
    let receive_inner = Arc::clone(inner);
    let on_receive: ReceiveCallback = Box::new(move |sequence_id, message| {
        let inner = Arc::clone(&receive_inner);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            dispatch::on_receive(&inner, sequence_id, message)
        }));
        if outcome.is_err() {
            error!("receive dispatcher panicked; frame dropped, session continues");
        }
    });

    let disconnect_inner = Arc::clone(inner);
    let on_disconnect: DisconnectCallback = Box::new(move || {
        disconnect_inner.abort_window_and_disconnect();
    });

    inner.transport.connect(on_receive, on_disconnect)
}

/// Builds and sends the `CONNECT` frame, advancing state to `Authenticating` on success. Shared
/// with [`super::Session::start_with_timing`] for the same reason as [`attempt_connect`].
pub(super) fn send_connect_frame(inner: &Arc<SessionInner>) -> io::Result<()> {
    let timestamp = auth::format_timestamp(auth::local_now());
    let digest = auth::compute_digest(
        inner.config.gateway_username(),
        inner.config.gateway_password(),
        timestamp,
    );
    let connect = Message::Connect(Connect {
        source_addr: inner.config.gateway_username().to_owned(),
        authenticator_source: digest,
        version: 0x30,
        timestamp,
    });
    let sequence_id = inner.sequence.next();
    inner.touch();
    inner.transport.send(sequence_id, &connect)?;
    inner.set_state(SessionState::Authenticating);
    Ok(())
}

fn tick_authenticating(inner: &Arc<SessionInner>) {
    if inner.last_transfer().elapsed() > inner.timing.auth_timeout() {
        warn!("authentication timed out");
        inner.set_status_text("认证超时");
        inner.disconnect();
        thread::sleep(inner.timing.reconnect_backoff());
        return;
    }
    thread::sleep(inner.timing.idle_tick());
}

fn pump(inner: &Arc<SessionInner>) {
    let swept = inner.window.sweep_timeouts(Instant::now() - inner.timing.submit_timeout());
    if swept > 0 && inner.last_transfer().elapsed() > inner.timing.idle_threshold() {
        warn!("link stalled: {swept} submission(s) timed out with no inbound traffic; reconnecting");
        inner.disconnect();
        return;
    }

    if inner.window.len() == 0
        && inner.pending.is_empty()
        && inner.last_transfer().elapsed() > inner.timing.idle_threshold()
    {
        let sequence_id = inner.sequence.next();
        if let Err(err) = inner.transport.send(sequence_id, &Message::ActiveTest(ActiveTest)) {
            warn!("failed to send keepalive ACTIVE_TEST: {err}");
            inner.disconnect();
            return;
        }
        inner.touch();
        thread::sleep(inner.timing.idle_tick());
        return;
    }

    if inner.window.is_full() || inner.pending.is_empty() {
        thread::sleep(inner.timing.backpressure_tick());
        return;
    }

    while !inner.window.is_full() {
        let submission = match inner.pending.pop() {
            Some(submission) => submission,
            None => break,
        };
        let sequence_id = inner.sequence.next();
        let send_time = Instant::now();
        let message = Message::Submit(build_submit(inner, &submission));
        inner.window.insert(WindowEntry::new(sequence_id, send_time, submission));
        if let Err(err) = inner.transport.send(sequence_id, &message) {
            warn!("transport send failed: {err}");
            inner.disconnect();
            return;
        }
    }
}

fn build_submit(inner: &SessionInner, submission: &PendingSubmission) -> Submit {
    Submit {
        pk_total: submission.pk_total,
        pk_number: submission.pk_number,
        registered_delivery: submission.registered_delivery,
        service_id: inner.config.service_id().to_owned(),
        fee_terminal_id: inner.config.sp_code().to_owned(),
        tp_pid: 0,
        tp_udhi: submission.tp_udhi,
        msg_fmt: submission.msg_fmt,
        msg_src: inner.config.gateway_username().to_owned(),
        fee_type: inner.config.fee_type().to_owned(),
        fee_code: inner.config.fee_code().to_owned(),
        src_id: submission.src_id.clone(),
        dest_terminal_id: submission.dest_terminal_id.clone(),
        msg_content: submission.payload.clone(),
    }
}
