mod test_utils;

use cmpp::protocol::{Message, SubmitResp};
use cmpp::{Session, SessionTiming};
use std::time::Duration;
use test_utils::{connect_and_authenticate, test_config, FakeTransport, RecordingSink};

/// Content "hi" (4 UCS-2 bytes) fits in one fragment; a `result == 0` `SUBMIT_RESP` maps to
/// `Success` with the `MsgId` field reinterpreted as a little-endian `i64`.
#[test]
fn short_sms_happy_path() {
    test_utils::init_logger();
    let transport = FakeTransport::new();
    let session = Session::start_with_timing(
        test_config(),
        SessionTiming::default(),
        Box::new(transport.clone()),
        Box::new(RecordingSink::new()),
    )
    .unwrap();

    connect_and_authenticate(&transport, &session);

    let handle = {
        let session = &session;
        std::thread::scope(|scope| {
            let send_thread = scope.spawn(move || session.send("001", &["13800000000"], "hi", false));

            let (submit_seq, submit) = transport
                .wait_for_sent(Duration::from_secs(2), |m| matches!(m, Message::Submit(_)))
                .expect("SUBMIT was not sent");
            let Message::Submit(submit) = submit else {
                unreachable!()
            };
            assert_eq!(submit.tp_udhi, 0);
            assert_eq!(submit.msg_content.len(), 4);

            transport.deliver(
                submit_seq,
                Message::SubmitResp(SubmitResp {
                    msg_id: [1, 2, 3, 4, 5, 6, 7, 8],
                    result: 0,
                }),
            );

            send_thread.join().unwrap()
        })
    };

    let (status, message_ids) = handle;
    assert_eq!(status, cmpp::SendStatus::Success);
    assert_eq!(message_ids, vec![i64::from_le_bytes([1, 2, 3, 4, 5, 6, 7, 8])]);

    session.stop();
}
