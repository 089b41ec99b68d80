//! Typed CMPP message records.
//!
//! These are plain data, not wire codecs: encoding and decoding the body bytes of each frame is
//! the transport's job (see [`crate::Transport`]). The session core only ever constructs and
//! inspects these typed values.

/// `CONNECT`: logon request sent once per connection, before anything else.
#[derive(Debug, Clone)]
pub struct Connect {
    pub source_addr: String,
    pub authenticator_source: [u8; 16],
    pub version: u8,
    pub timestamp: u32,
}

/// `CONNECT_RESP`: the gateway's answer to [`Connect`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ConnectResp {
    pub status: u8,
    pub authenticator_isp: [u8; 16],
    pub version: u8,
}

/// `SUBMIT`: one outbound fragment of a short or long message.
#[derive(Debug, Clone)]
pub struct Submit {
    pub pk_total: u8,
    pub pk_number: u8,
    pub registered_delivery: u8,
    pub service_id: String,
    pub fee_terminal_id: String,
    pub tp_pid: u8,
    pub tp_udhi: u8,
    pub msg_fmt: u8,
    pub msg_src: String,
    pub fee_type: String,
    pub fee_code: String,
    pub src_id: String,
    pub dest_terminal_id: Vec<String>,
    pub msg_content: Vec<u8>,
}

/// `SUBMIT_RESP`: the gateway's answer to a [`Submit`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SubmitResp {
    pub msg_id: [u8; 8],
    pub result: u32,
}

impl SubmitResp {
    /// Reinterprets the 8-byte `MsgId` field as a little-endian `i64`, byte-for-byte identical
    /// to the wire representation.
    pub fn message_id(&self) -> i64 {
        i64::from_le_bytes(self.msg_id)
    }
}

/// A mobile-originated message or a delivery report, carried by `DELIVER`.
#[derive(Debug, Clone)]
pub enum DeliverContent {
    /// `RegisteredDelivery == 0`: subscriber-authored text routed to the service.
    Message { content: String },
    /// `RegisteredDelivery == 1`: a status report for a previously submitted message.
    Report {
        message_id: i64,
        status_text: String,
    },
}

/// `DELIVER`: an inbound mobile-originated message or delivery report.
#[derive(Debug, Clone)]
pub struct Deliver {
    pub msg_id: [u8; 8],
    pub dest_id: String,
    pub src_terminal_id: String,
    pub content: DeliverContent,
}

/// `DELIVER_RESP`: acknowledges a [`Deliver`], echoing its `MsgId`.
#[derive(Debug, Clone, Copy)]
pub struct DeliverResp {
    pub msg_id: [u8; 8],
    pub result: u32,
}

/// `ACTIVE_TEST`: the keepalive probe. Carries no body fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActiveTest;

/// `ACTIVE_TEST_RESP`: answers an [`ActiveTest`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ActiveTestResp;

/// `TERMINATE`: either side may send this to end the session gracefully.
#[derive(Debug, Clone, Copy, Default)]
pub struct Terminate;

/// Any CMPP frame body the session core sends or receives.
#[derive(Debug, Clone)]
pub enum Message {
    Connect(Connect),
    ConnectResp(ConnectResp),
    Submit(Submit),
    SubmitResp(SubmitResp),
    Deliver(Deliver),
    DeliverResp(DeliverResp),
    ActiveTest(ActiveTest),
    ActiveTestResp(ActiveTestResp),
    Terminate(Terminate),
}

impl Message {
    pub fn command_id(&self) -> u32 {
        use super::command::*;
        match self {
            Message::Connect(_) => CONNECT,
            Message::ConnectResp(_) => CONNECT_RESP,
            Message::Submit(_) => SUBMIT,
            Message::SubmitResp(_) => SUBMIT_RESP,
            Message::Deliver(_) => DELIVER,
            Message::DeliverResp(_) => DELIVER_RESP,
            Message::ActiveTest(_) => ACTIVE_TEST,
            Message::ActiveTestResp(_) => ACTIVE_TEST_RESP,
            Message::Terminate(_) => TERMINATE,
        }
    }
}
