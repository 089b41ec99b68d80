/// The outcome of a [`crate::Session::send`] call.
///
/// This is the protocol-level error taxonomy named in the CMPP core specification. It is
/// deliberately a plain, `Copy` enum rather than a [`std::error::Error`] implementor: callers
/// branch on it as a business outcome on every call, not as an exceptional condition.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SendStatus {
    /// Every fragment was accepted by the gateway (`SUBMIT_RESP.result == 0`).
    Success,
    /// `SUBMIT_RESP.result` carried a code this client does not recognize.
    Unknown,
    /// No `SUBMIT_RESP` arrived for a fragment within the per-call timeout.
    Timeout,
    /// The gateway reported `result == 8` (congested), or this client's own pending queue is
    /// at capacity, or the session is not yet `Connected`.
    Congested,
    /// `SUBMIT_RESP.result == 4`: the message, as submitted, was too long.
    MessageTooLong,
    /// `SUBMIT_RESP.result` was one of `10..=13`, or the session has permanently failed
    /// authentication.
    ConfigError,
    /// The session has been disposed and will not reconnect.
    NotConnected,
    /// The submission was in flight when the link was reset; it was not retried on the
    /// caller's behalf. See `Session`'s handling of link resets.
    Aborted,
}
