/// The session's lifecycle state. Transitions are driven exclusively by the session's
/// background worker and its receive dispatcher.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Authenticating,
    Connected,
    AuthenticationFailed,
    Disposed,
}
