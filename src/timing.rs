//! Tunable durations for the session loop and sender API.
//!
//! [`SessionTiming::default`] reproduces the production figures verbatim: a 30-second
//! per-submission budget, a 10-second authentication and idle-keepalive threshold, a 3-second
//! reconnect backoff, and so on. The fields exist as a separate, overridable value, built around
//! consuming `with_*` setters over `const` defaults, so integration tests can run the real state
//! machine without waiting on wall-clock minutes for a stall or a submit timeout to fire.
#[derive(Debug, Clone, Copy)]
pub struct SessionTiming {
    auth_timeout: std::time::Duration,
    submit_timeout: std::time::Duration,
    idle_threshold: std::time::Duration,
    reconnect_backoff: std::time::Duration,
    congestion_backoff: std::time::Duration,
    terminal_state_tick: std::time::Duration,
    idle_tick: std::time::Duration,
    backpressure_tick: std::time::Duration,
}

impl SessionTiming {
    /// How long `Authenticating` may persist with no inbound traffic before the loop
    /// disconnects and backs off.
    pub const DEFAULT_AUTH_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);
    /// How long a `SUBMIT` may sit in the window before its waiter is timed out, and the same
    /// budget [`Session::send`](crate::Session::send) blocks for per fragment.
    pub const DEFAULT_SUBMIT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);
    /// How long the link may go without inbound traffic before the pump emits a keepalive, or
    /// before a timeout sweep is treated as a stall.
    pub const DEFAULT_IDLE_THRESHOLD: std::time::Duration = std::time::Duration::from_secs(10);
    /// Sleep after a failed connect/authenticate attempt before retrying.
    pub const DEFAULT_RECONNECT_BACKOFF: std::time::Duration = std::time::Duration::from_secs(3);
    /// Sleep between retries of the same long-SMS fragment on `Congested`.
    pub const DEFAULT_CONGESTION_BACKOFF: std::time::Duration = std::time::Duration::from_millis(100);
    /// Sleep per loop iteration while `AuthenticationFailed` or `Disposed`.
    pub const DEFAULT_TERMINAL_STATE_TICK: std::time::Duration = std::time::Duration::from_secs(1);
    /// Sleep after emitting an idle-path keepalive.
    pub const DEFAULT_IDLE_TICK: std::time::Duration = std::time::Duration::from_millis(100);
    /// Sleep when the pump has no dispatchable work.
    pub const DEFAULT_BACKPRESSURE_TICK: std::time::Duration = std::time::Duration::from_millis(50);

    pub fn auth_timeout(&self) -> std::time::Duration {
        self.auth_timeout
    }
    pub fn submit_timeout(&self) -> std::time::Duration {
        self.submit_timeout
    }
    pub fn idle_threshold(&self) -> std::time::Duration {
        self.idle_threshold
    }
    pub fn reconnect_backoff(&self) -> std::time::Duration {
        self.reconnect_backoff
    }
    pub fn congestion_backoff(&self) -> std::time::Duration {
        self.congestion_backoff
    }
    pub fn terminal_state_tick(&self) -> std::time::Duration {
        self.terminal_state_tick
    }
    pub fn idle_tick(&self) -> std::time::Duration {
        self.idle_tick
    }
    pub fn backpressure_tick(&self) -> std::time::Duration {
        self.backpressure_tick
    }

    #[must_use]
    pub fn with_auth_timeout(mut self, value: std::time::Duration) -> Self {
        self.auth_timeout = value;
        self
    }
    #[must_use]
    pub fn with_submit_timeout(mut self, value: std::time::Duration) -> Self {
        self.submit_timeout = value;
        self
    }
    #[must_use]
    pub fn with_idle_threshold(mut self, value: std::time::Duration) -> Self {
        self.idle_threshold = value;
        self
    }
    #[must_use]
    pub fn with_reconnect_backoff(mut self, value: std::time::Duration) -> Self {
        self.reconnect_backoff = value;
        self
    }
    #[must_use]
    pub fn with_congestion_backoff(mut self, value: std::time::Duration) -> Self {
        self.congestion_backoff = value;
        self
    }
    #[must_use]
    pub fn with_terminal_state_tick(mut self, value: std::time::Duration) -> Self {
        self.terminal_state_tick = value;
        self
    }
    #[must_use]
    pub fn with_idle_tick(mut self, value: std::time::Duration) -> Self {
        self.idle_tick = value;
        self
    }
    #[must_use]
    pub fn with_backpressure_tick(mut self, value: std::time::Duration) -> Self {
        self.backpressure_tick = value;
        self
    }
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            auth_timeout: Self::DEFAULT_AUTH_TIMEOUT,
            submit_timeout: Self::DEFAULT_SUBMIT_TIMEOUT,
            idle_threshold: Self::DEFAULT_IDLE_THRESHOLD,
            reconnect_backoff: Self::DEFAULT_RECONNECT_BACKOFF,
            congestion_backoff: Self::DEFAULT_CONGESTION_BACKOFF,
            terminal_state_tick: Self::DEFAULT_TERMINAL_STATE_TICK,
            idle_tick: Self::DEFAULT_IDLE_TICK,
            backpressure_tick: Self::DEFAULT_BACKPRESSURE_TICK,
        }
    }
}
