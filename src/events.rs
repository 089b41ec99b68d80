//! Callbacks through which a [`crate::Session`] hands inbound traffic to the application.

/// Receives mobile-originated (`DELIVER`) messages and delivery reports.
///
/// Implementations are invoked from the session's receive dispatcher, which also answers
/// `DELIVER_RESP` and `ACTIVE_TEST`/`ACTIVE_TEST_RESP` on the caller's behalf; a sink only ever
/// sees the two callbacks below. Implementations must not block: the dispatcher cannot process
/// the next inbound frame, including the keepalive response that keeps the link alive, until a
/// callback returns.
pub trait MessageSink: Send + Sync {
    /// A mobile-originated text message arrived.
    ///
    /// `message_id` is the gateway-assigned 64-bit id carried in `DELIVER`, formatted by the
    /// caller as needed; `source` and `destination` are the originating mobile number and the
    /// service long number, respectively.
    fn on_message_receive(&self, content: &str, source: &str, message_id: i64, destination: &str);

    /// A delivery report arrived for a message this session previously submitted.
    ///
    /// `status_text` is the gateway's `Stat` field (e.g. `"DELIVRD"`, `"UNDELIV"`), passed
    /// through verbatim rather than interpreted, since the set of carrier status strings is not
    /// fixed by the protocol.
    fn on_message_report(&self, message_id: i64, status_text: &str, destination: &str);
}
