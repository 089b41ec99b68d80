//! Classifies inbound frames, drives authentication, answers probes, and completes windows
//! Runs on the transport's own execution context.

use super::inner::SessionInner;
use super::state::SessionState;
use crate::protocol::{ActiveTest, ActiveTestResp, ConnectResp, Deliver, DeliverContent, DeliverResp, Message, SubmitResp};
use std::sync::Arc;

pub fn on_receive(inner: &Arc<SessionInner>, sequence_id: u32, message: Message) {
    inner.touch();

    if inner.state() == SessionState::Authenticating && !matches!(message, Message::ConnectResp(_)) {
        warn!("unexpected frame while authenticating; disconnecting");
        inner.set_status_text("Unexpected response");
        inner.disconnect();
        return;
    }

    match message {
        Message::ConnectResp(resp) => handle_connect_resp(inner, resp),
        Message::Deliver(deliver) => handle_deliver(inner, sequence_id, deliver),
        Message::ActiveTest(_) => handle_active_test(inner, sequence_id),
        Message::ActiveTestResp(_) => {}
        Message::Terminate(_) => {
            warn!("received TERMINATE; disconnecting");
            inner.disconnect();
        }
        Message::SubmitResp(resp) => complete_submission(inner, sequence_id, resp),
        Message::Connect(_) | Message::Submit(_) => {
            debug!("ignoring a client-originated command id echoed back by the gateway");
        }
    }
}

fn handle_connect_resp(inner: &Arc<SessionInner>, resp: ConnectResp) {
    if inner.state() != SessionState::Authenticating {
        debug!("ignoring CONNECT_RESP outside Authenticating");
        return;
    }
    match resp.status {
        0 => {
            inner.set_status_text("");
            inner.set_state(SessionState::Connected);
            let sequence_id = inner.sequence.next();
            if let Err(err) = inner
                .transport
                .send(sequence_id, &Message::ActiveTest(ActiveTest))
            {
                warn!("failed to send post-auth ACTIVE_TEST: {err}");
            }
        }
        1 => fail_authentication(inner, "结构错误"),
        2 => fail_authentication(inner, "源地址错误"),
        3 => fail_authentication(inner, "认证失败"),
        4 => fail_authentication(inner, "版本太高"),
        other => {
            warn!("unrecognized CONNECT_RESP status {other}");
            inner.disconnect();
        }
    }
}

fn fail_authentication(inner: &SessionInner, reason: &str) {
    inner.set_status_text(reason);
    inner.set_state(SessionState::AuthenticationFailed);
}

fn handle_deliver(inner: &Arc<SessionInner>, sequence_id: u32, deliver: Deliver) {
    let ack = Message::DeliverResp(DeliverResp {
        msg_id: deliver.msg_id,
        result: 0,
    });
    if let Err(err) = inner.transport.send(sequence_id, &ack) {
        warn!("failed to send DELIVER_RESP: {err}");
    }

    match deliver.content {
        DeliverContent::Message { content } => {
            let message_id = to_message_id(deliver.msg_id);
            inner
                .sink
                .on_message_receive(&content, &deliver.src_terminal_id, message_id, &deliver.dest_id);
        }
        DeliverContent::Report {
            message_id,
            status_text,
        } => {
            inner.sink.on_message_report(message_id, &status_text, &deliver.dest_id);
        }
    }
}

fn handle_active_test(inner: &Arc<SessionInner>, sequence_id: u32) {
    if let Err(err) = inner
        .transport
        .send(sequence_id, &Message::ActiveTestResp(ActiveTestResp))
    {
        warn!("failed to send ACTIVE_TEST_RESP: {err}");
    }
}

fn complete_submission(inner: &Arc<SessionInner>, sequence_id: u32, resp: SubmitResp) {
    if !inner.window.complete(sequence_id, resp) {
        trace!("SUBMIT_RESP for unknown sequence id {sequence_id} (late response after timeout)");
    }
}

/// Reinterprets an 8-byte `MsgId` field as a little-endian `i64`.
fn to_message_id(msg_id: [u8; 8]) -> i64 {
    SubmitResp { msg_id, result: 0 }.message_id()
}
