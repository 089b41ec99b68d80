mod test_utils;

use cmpp::protocol::{ConnectResp, Message, SubmitResp};
use cmpp::{Session, SessionState, SessionTiming};
use std::time::Duration;
use test_utils::{connect_and_authenticate, test_config, wait_until, FakeTransport, RecordingSink};

/// Two submissions sit in the window with no `SUBMIT_RESP` ever arriving. Each waiter times out
/// on its own after `submit_timeout`; since the link is otherwise silent past `idle_threshold`
/// too, the session treats this as a stalled link, disconnects, and reconnects on its own. A
/// submission made after reconnection drains normally.
#[test]
fn stall_and_recovery() {
    test_utils::init_logger();
    let transport = FakeTransport::new();
    let timing = SessionTiming::default()
        .with_auth_timeout(Duration::from_millis(300))
        .with_submit_timeout(Duration::from_millis(150))
        .with_idle_threshold(Duration::from_millis(150))
        .with_reconnect_backoff(Duration::from_millis(20))
        .with_congestion_backoff(Duration::from_millis(20))
        .with_terminal_state_tick(Duration::from_millis(20))
        .with_idle_tick(Duration::from_millis(10))
        .with_backpressure_tick(Duration::from_millis(5));
    let session = Session::start_with_timing(
        test_config(),
        timing,
        Box::new(transport.clone()),
        Box::new(RecordingSink::new()),
    )
    .unwrap();

    connect_and_authenticate(&transport, &session);

    let (first_outcome, second_outcome) = std::thread::scope(|scope| {
        let session = &session;
        let first = scope.spawn(move || session.send("001", &["13800000000"], "hi", false));
        let second = scope.spawn(move || session.send("001", &["13800000001"], "yo", false));

        // Neither SUBMIT is ever answered, so both calls block until their own submit_timeout
        // elapses.
        (first.join().unwrap(), second.join().unwrap())
    });

    assert_eq!(first_outcome.0, cmpp::SendStatus::Timeout);
    assert_eq!(second_outcome.0, cmpp::SendStatus::Timeout);

    // The stalled link is detected and the session reconnects on its own.
    assert!(wait_until(Duration::from_secs(2), || {
        transport
            .sent_frames()
            .into_iter()
            .filter(|(_, m)| matches!(m, Message::Connect(_)))
            .count()
            >= 2
    }));

    let (reconnect_seq, _) = transport
        .sent_frames()
        .into_iter()
        .rev()
        .find(|(_, m)| matches!(m, Message::Connect(_)))
        .expect("reconnect CONNECT was not sent");
    transport.deliver(
        reconnect_seq,
        Message::ConnectResp(ConnectResp {
            status: 0,
            authenticator_isp: [0; 16],
            version: 0x30,
        }),
    );
    assert!(wait_until(Duration::from_secs(2), || {
        session.status() == SessionState::Connected
    }));

    // The pending queue drains normally once the session is healthy again.
    let result = std::thread::scope(|scope| {
        let session = &session;
        let send_thread = scope.spawn(move || session.send("001", &["13800000000"], "hi", false));

        let (submit_seq, _) = transport
            .wait_for_sent(Duration::from_secs(2), |m| {
                matches!(m, Message::Submit(s) if s.msg_content.len() == 4)
            })
            .expect("post-recovery SUBMIT was not sent");
        transport.deliver(
            submit_seq,
            Message::SubmitResp(SubmitResp {
                msg_id: [0, 0, 0, 0, 0, 0, 0, 9],
                result: 0,
            }),
        );

        send_thread.join().unwrap()
    });
    assert_eq!(result.0, cmpp::SendStatus::Success);

    session.stop();
}
