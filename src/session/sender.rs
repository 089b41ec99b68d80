//! The synchronous submit entry point: fragments content, enqueues each piece, and
//! blocks the calling thread on its completion signal.

use super::inner::SessionInner;
use super::state::SessionState;
use crate::fragment::{self, FragmentMode};
use crate::pending::{self, PendingSubmission, SubmitOutcome};
use crate::protocol::{result, SubmitResp};
use crate::status::SendStatus;
use std::thread;

pub fn send(
    inner: &SessionInner,
    extended_code: &str,
    receivers: &[&str],
    content: &str,
    need_status_report: bool,
) -> (SendStatus, Vec<i64>) {
    if let Some(status) = admission_check(inner) {
        return (status, Vec::new());
    }

    let concat_ref = inner.sequence.current() as u8;
    let plan = match fragment::fragment(content, &inner.config, concat_ref) {
        Ok(plan) => plan,
        Err(status) => return (status, Vec::new()),
    };

    let src_id = format!("{}{extended_code}", inner.config.sp_code());
    let dest_terminal_id: Vec<String> = receivers.iter().map(|r| (*r).to_owned()).collect();
    let registered_delivery = u8::from(need_status_report);
    let msg_fmt = if inner.config.attempt_remove_signature() {
        0x0F
    } else {
        0x08
    };

    match plan.mode {
        FragmentMode::Short => {
            send_single(inner, &plan.payloads[0], msg_fmt, &src_id, &dest_terminal_id, registered_delivery)
        }
        FragmentMode::ConcatenatedLong => {
            send_concatenated(inner, &plan.payloads, msg_fmt, &src_id, &dest_terminal_id, registered_delivery)
        }
        FragmentMode::SplitShort => {
            send_split(inner, &plan.payloads, msg_fmt, &src_id, &dest_terminal_id, registered_delivery)
        }
    }
}

fn admission_check(inner: &SessionInner) -> Option<SendStatus> {
    match inner.state() {
        SessionState::AuthenticationFailed => Some(SendStatus::ConfigError),
        SessionState::Disposed => Some(SendStatus::NotConnected),
        SessionState::Authenticating | SessionState::Connecting | SessionState::Disconnected => {
            Some(SendStatus::Congested)
        }
        SessionState::Connected => {
            if inner.pending.is_congested() {
                Some(SendStatus::Congested)
            } else {
                None
            }
        }
    }
}

fn send_single(
    inner: &SessionInner,
    payload: &[u8],
    msg_fmt: u8,
    src_id: &str,
    dest: &[String],
    registered_delivery: u8,
) -> (SendStatus, Vec<i64>) {
    match enqueue_and_wait(inner, payload.to_vec(), 0, msg_fmt, 1, 1, registered_delivery, src_id, dest) {
        Wait::Timeout => (SendStatus::Timeout, Vec::new()),
        Wait::Aborted => (SendStatus::Aborted, Vec::new()),
        Wait::Response(resp) => match map_result(resp.result) {
            SendStatus::Success => (SendStatus::Success, vec![resp.message_id()]),
            status => (status, Vec::new()),
        },
    }
}

fn send_concatenated(
    inner: &SessionInner,
    payloads: &[Vec<u8>],
    msg_fmt: u8,
    src_id: &str,
    dest: &[String],
    registered_delivery: u8,
) -> (SendStatus, Vec<i64>) {
    let total = payloads.len() as u8;
    let mut message_ids = Vec::with_capacity(payloads.len());

    for (i, payload) in payloads.iter().enumerate() {
        loop {
            let outcome = enqueue_and_wait(
                inner,
                payload.clone(),
                1,
                msg_fmt,
                total,
                (i + 1) as u8,
                registered_delivery,
                src_id,
                dest,
            );
            match outcome {
                Wait::Timeout => return (SendStatus::Timeout, message_ids),
                Wait::Aborted => return (SendStatus::Aborted, message_ids),
                Wait::Response(resp) => match map_result(resp.result) {
                    SendStatus::Success => {
                        message_ids.push(resp.message_id());
                        break;
                    }
                    SendStatus::Congested if i == 0 => return (SendStatus::Congested, message_ids),
                    SendStatus::Congested => {
                        thread::sleep(inner.timing.congestion_backoff());
                        continue;
                    }
                    other => return (other, message_ids),
                },
            }
        }
    }
    (SendStatus::Success, message_ids)
}

fn send_split(
    inner: &SessionInner,
    payloads: &[Vec<u8>],
    msg_fmt: u8,
    src_id: &str,
    dest: &[String],
    registered_delivery: u8,
) -> (SendStatus, Vec<i64>) {
    let mut message_ids = Vec::with_capacity(payloads.len());
    for payload in payloads {
        loop {
            let outcome = enqueue_and_wait(inner, payload.clone(), 0, msg_fmt, 1, 1, registered_delivery, src_id, dest);
            match outcome {
                Wait::Timeout => return (SendStatus::Timeout, message_ids),
                Wait::Aborted => return (SendStatus::Aborted, message_ids),
                Wait::Response(resp) => match map_result(resp.result) {
                    SendStatus::Success => {
                        message_ids.push(resp.message_id());
                        break;
                    }
                    SendStatus::Congested => {
                        thread::sleep(inner.timing.congestion_backoff());
                        continue;
                    }
                    other => return (other, message_ids),
                },
            }
        }
    }
    (SendStatus::Success, message_ids)
}

enum Wait {
    Response(SubmitResp),
    Timeout,
    Aborted,
}

#[allow(clippy::too_many_arguments)]
fn enqueue_and_wait(
    inner: &SessionInner,
    payload: Vec<u8>,
    tp_udhi: u8,
    msg_fmt: u8,
    pk_total: u8,
    pk_number: u8,
    registered_delivery: u8,
    src_id: &str,
    dest_terminal_id: &[String],
) -> Wait {
    let (tx, rx) = pending::completion_channel();
    inner.pending.push(PendingSubmission {
        dest_terminal_id: dest_terminal_id.to_vec(),
        payload,
        tp_udhi,
        msg_fmt,
        pk_total,
        pk_number,
        registered_delivery,
        src_id: src_id.to_owned(),
        completion: tx,
    });

    match rx.recv_timeout(inner.timing.submit_timeout()) {
        Ok(SubmitOutcome::Response(resp)) => Wait::Response(resp),
        Ok(SubmitOutcome::Timeout) | Err(_) => Wait::Timeout,
        Ok(SubmitOutcome::Aborted) => Wait::Aborted,
    }
}

fn map_result(code: u32) -> SendStatus {
    match code {
        result::OK => SendStatus::Success,
        result::MESSAGE_TOO_LONG => SendStatus::MessageTooLong,
        result::CONGESTED => SendStatus::Congested,
        result::CONFIG_ERROR_LOW..=result::CONFIG_ERROR_HIGH => SendStatus::ConfigError,
        _ => SendStatus::Unknown,
    }
}
