// advisable because not all test modules use all functions of this module:
#![allow(dead_code)]

use cmpp::protocol::Message;
use cmpp::transport::{DisconnectCallback, ReceiveCallback, Transport};
use cmpp::{ClientConfig, MessageSink, SessionTiming};
use flexi_logger::{opt_format, Logger};
use std::io;
use std::sync::{Arc, Mutex, Once};
use std::time::{Duration, Instant};

static LOGGER_INIT: Once = Once::new();

/// Initializes a logger that prints out all info, warn and error messages. Safe to call from
/// every `#[test]` in a file: only the first call actually starts the global logger.
pub fn init_logger() {
    LOGGER_INIT.call_once(|| {
        Logger::try_with_env_or_str("info")
            .unwrap()
            .format(opt_format)
            .start()
            .unwrap_or_else(|e| panic!("Logger initialization failed with {e}"));
    });
}

/// A `ClientConfig` with every required field filled in and every optional field defaulted,
/// shared by every scenario test that doesn't need to vary it.
pub fn test_config() -> ClientConfig {
    ClientConfig::builder()
        .sp_code("106575")
        .gateway_username("600001")
        .gateway_password("password")
        .service_id("SP001")
        .build()
        .unwrap()
}

/// A `SessionTiming` with every sleep/timeout shortened so a scenario test resolves in
/// milliseconds rather than waiting on the production durations `SessionTiming::default()`
/// reproduces.
pub fn fast_timing() -> SessionTiming {
    SessionTiming::default()
        .with_auth_timeout(Duration::from_millis(300))
        .with_submit_timeout(Duration::from_millis(300))
        .with_idle_threshold(Duration::from_secs(3600))
        .with_reconnect_backoff(Duration::from_millis(20))
        .with_congestion_backoff(Duration::from_millis(20))
        .with_terminal_state_tick(Duration::from_millis(20))
        .with_idle_tick(Duration::from_millis(10))
        .with_backpressure_tick(Duration::from_millis(5))
}

#[derive(Default)]
struct State {
    on_receive: Option<Arc<dyn Fn(u32, Message) + Send + Sync>>,
    on_disconnect: Option<Arc<dyn Fn() + Send + Sync>>,
    sent: Vec<(u32, Message)>,
    fail_next_connect: bool,
}

/// An in-memory [`Transport`] test double: records every outbound frame and lets a test inject
/// inbound frames or a disconnection notice on demand, in place of a live gateway socket (the
/// wire codec is explicitly out of scope of the session core under test).
#[derive(Clone)]
pub struct FakeTransport {
    state: Arc<Mutex<State>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    /// The next `connect()` call fails with an I/O error, once.
    pub fn fail_next_connect(&self) {
        self.state.lock().unwrap().fail_next_connect = true;
    }

    /// Delivers `message` to the session's receive dispatcher as if it arrived with the given
    /// `sequence_id`, the way a real transport's reader thread would.
    pub fn deliver(&self, sequence_id: u32, message: Message) {
        let callback = self.state.lock().unwrap().on_receive.clone();
        if let Some(callback) = callback {
            callback(sequence_id, message);
        }
    }

    /// Invokes the disconnection callback the session armed on its last successful `connect()`.
    pub fn trigger_disconnect(&self) {
        let callback = self.state.lock().unwrap().on_disconnect.clone();
        if let Some(callback) = callback {
            callback();
        }
    }

    pub fn sent_frames(&self) -> Vec<(u32, Message)> {
        self.state.lock().unwrap().sent.clone()
    }

    /// Polls (every 5 ms, up to `timeout`) for a sent frame matching `predicate`, returning the
    /// first match. Used to synchronize with the session's background worker thread without a
    /// fixed sleep.
    pub fn wait_for_sent<F>(&self, timeout: Duration, mut predicate: F) -> Option<(u32, Message)>
    where
        F: FnMut(&Message) -> bool,
    {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(found) = self.sent_frames().into_iter().find(|(_, m)| predicate(m)) {
                return Some(found);
            }
            if Instant::now() >= deadline {
                return None;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }
}

impl Transport for FakeTransport {
    fn connect(&self, on_receive: ReceiveCallback, on_disconnect: DisconnectCallback) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_next_connect {
            state.fail_next_connect = false;
            return Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "fake transport: connect failed",
            ));
        }
        state.on_receive = Some(Arc::from(on_receive));
        state.on_disconnect = Some(Arc::from(on_disconnect));
        Ok(())
    }

    fn disconnect(&self) {
        // Matches the real transport: disconnect() does not itself invoke on_disconnect.
    }

    fn send(&self, sequence_id: u32, message: &Message) -> io::Result<()> {
        self.state.lock().unwrap().sent.push((sequence_id, message.clone()));
        Ok(())
    }
}

/// A [`MessageSink`] that records every callback invocation for test assertions.
#[derive(Default)]
pub struct RecordingSink {
    received: Mutex<Vec<(String, String, i64, String)>>,
    reports: Mutex<Vec<(i64, String, String)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn received(&self) -> Vec<(String, String, i64, String)> {
        self.received.lock().unwrap().clone()
    }

    pub fn reports(&self) -> Vec<(i64, String, String)> {
        self.reports.lock().unwrap().clone()
    }
}

impl MessageSink for RecordingSink {
    fn on_message_receive(&self, content: &str, source: &str, message_id: i64, destination: &str) {
        self.received
            .lock()
            .unwrap()
            .push((content.to_owned(), source.to_owned(), message_id, destination.to_owned()));
    }

    fn on_message_report(&self, message_id: i64, status_text: &str, destination: &str) {
        self.reports
            .lock()
            .unwrap()
            .push((message_id, status_text.to_owned(), destination.to_owned()));
    }
}

/// Wraps a shared `RecordingSink` so a test can hand a `Box<dyn MessageSink>` to `Session`
/// while keeping its own handle to inspect recorded callbacks afterward.
pub struct SinkHandle(pub Arc<RecordingSink>);

impl MessageSink for SinkHandle {
    fn on_message_receive(&self, content: &str, source: &str, message_id: i64, destination: &str) {
        self.0.on_message_receive(content, source, message_id, destination);
    }

    fn on_message_report(&self, message_id: i64, status_text: &str, destination: &str) {
        self.0.on_message_report(message_id, status_text, destination);
    }
}

/// Waits for the session's background worker to reach `Authenticating` and drives it straight
/// through to `Connected` by replying to its `CONNECT` with a successful `CONNECT_RESP`, then
/// waits for the post-auth keepalive `ACTIVE_TEST` so callers start from a quiescent, fully
/// connected session.
pub fn connect_and_authenticate(transport: &FakeTransport, session: &cmpp::Session) {
    let (connect_seq, _) = transport
        .wait_for_sent(Duration::from_secs(2), |m| matches!(m, Message::Connect(_)))
        .expect("CONNECT was not sent");
    transport.deliver(
        connect_seq,
        Message::ConnectResp(cmpp::protocol::ConnectResp {
            status: 0,
            authenticator_isp: [0; 16],
            version: 0x30,
        }),
    );
    assert!(wait_until(Duration::from_secs(2), || {
        session.status() == cmpp::SessionState::Connected
    }));
    transport
        .wait_for_sent(Duration::from_secs(2), |m| matches!(m, Message::ActiveTest(_)))
        .expect("post-auth ACTIVE_TEST was not sent");
}

/// Polls `predicate` every 5 ms until it returns `true` or `timeout` elapses.
pub fn wait_until<F: FnMut() -> bool>(timeout: Duration, mut predicate: F) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if predicate() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
}
