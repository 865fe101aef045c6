use super::*;
use crate::adapter::tests::{MockChatProfile, MockCredentials};
use crate::api::MockTransport;
use crate::poll::tests::MockSleeper;
use serde_json::json;

const PROCESS_URL: &str = "http://test/api/sms/process-incoming";
const CONVERSATIONS_URL: &str = "http://test/api/sms/conversations";

fn build_api(transport: MockTransport) -> PenziApi<MockTransport, MockCredentials> {
    PenziApi::new(
        "http://test".to_string(),
        transport,
        MockCredentials::with_session("tok-1", "ref-1"),
    )
}

fn conversations_body(phone: &str, count: u32) -> serde_json::Value {
    json!({
        "success": true,
        "message": "ok",
        "data": {
            "conversations": [{
                "phone_number": phone,
                "user_name": "Amina",
                "last_message": "reply",
                "message_count": count,
                "messages": [{
                    "id": 1,
                    "from_phone": "22141",
                    "to_phone": phone,
                    "message_body": "reply",
                    "direction": "outgoing"
                }]
            }]
        }
    })
}

// =========================================================
// 会话状态
// =========================================================

#[test]
fn test_send_guard_rejects_within_two_seconds() {
    let mut session = ChatSession::new("254712345678", "Amina");

    assert_eq!(session.try_begin_send(Timestamp::new(10_000)), Ok(()));
    assert_eq!(
        session.try_begin_send(Timestamp::new(11_999)),
        Err(THROTTLED_MESSAGE)
    );
    // 被拒绝的发送不更新节流时间，原定窗口到点即可再发
    assert_eq!(session.try_begin_send(Timestamp::new(12_000)), Ok(()));
}

#[test]
fn test_optimistic_echo_then_poll_overwrite() {
    let mut session = ChatSession::new("254712345678", "Amina");
    assert_eq!(session.message_count(), 0);

    session.echo_outgoing("Hello Penzi");
    assert_eq!(session.messages().len(), 1);
    assert_eq!(session.messages()[0].id, -1);
    assert_eq!(session.messages()[0].to_phone, SMS_SHORTCODE);
    assert_eq!(session.messages()[0].direction, SmsDirection::Incoming);
    // 回显不冒充服务端计数
    assert_eq!(session.message_count(), 0);

    session.mark_processing();
    assert!(session.is_processing());

    let snapshot = Conversation {
        phone_number: "254712345678".to_string(),
        user_name: "Amina".to_string(),
        last_message: "Welcome to Penzi".to_string(),
        last_message_time: None,
        message_count: 2,
        messages: Vec::new(),
    };
    session.adopt(snapshot);
    assert!(!session.is_processing());
    assert_eq!(session.message_count(), 2);
    assert!(session.messages().is_empty());
}

#[test]
fn test_resume_requires_both_identity_keys() {
    let store = MockChatProfile::default();
    assert_eq!(ChatSession::resume(&store), None);

    store.set_phone("254712345678");
    assert_eq!(ChatSession::resume(&store), None);

    store.set_name("Amina");
    let session = ChatSession::resume(&store).unwrap();
    assert_eq!(session.phone(), "254712345678");
    assert_eq!(session.user_name(), "Amina");
}

// =========================================================
// 发送与回复探测
// =========================================================

#[tokio::test]
async fn test_send_detects_reply_by_count_increase() {
    let transport = MockTransport::new();
    transport.mock_response(PROCESS_URL, 200, json!({ "success": true, "message": "queued" }));
    // 第一次探测计数没变，第二次后端已回话
    transport.mock_response(CONVERSATIONS_URL, 200, conversations_body("254712345678", 2));
    transport.mock_response(CONVERSATIONS_URL, 200, conversations_body("254712345678", 4));

    let api = build_api(transport);
    let sleeper = MockSleeper::default();
    let cancel = CancelFlag::new();

    let outcome = send_and_await_reply(&api, &sleeper, &cancel, "254712345678", "Hello", 2)
        .await
        .unwrap();
    let ReplyOutcome::Replied(conversation) = outcome else {
        panic!("expected a reply");
    };
    assert_eq!(conversation.message_count, 4);

    // 首查 500ms，之后每秒一次
    assert_eq!(
        *sleeper.slept.borrow(),
        vec![Duration::from_millis(500), Duration::from_millis(1000)]
    );

    // 发送载荷:固定短号、incoming 方向
    let requests = api.transport.requests.borrow();
    let crate::api::HttpBody::Json(body) = &requests[0].body else {
        panic!("expected json body");
    };
    let value: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(value["from_phone"], "254712345678");
    assert_eq!(value["to_phone"], SMS_SHORTCODE);
    assert_eq!(value["direction"], "incoming");
    assert_eq!(requests[0].timeout, Some(SEND_TIMEOUT));
}

#[tokio::test]
async fn test_send_exhaustion_reports_processing() {
    let transport = MockTransport::new();
    transport.mock_response(PROCESS_URL, 200, json!({ "success": true }));
    transport.mock_response(CONVERSATIONS_URL, 200, conversations_body("254712345678", 2));

    let api = build_api(transport);
    let sleeper = MockSleeper::default();
    let cancel = CancelFlag::new();

    let outcome = send_and_await_reply(&api, &sleeper, &cancel, "254712345678", "Hello", 2)
        .await
        .unwrap();
    assert_eq!(outcome, ReplyOutcome::StillProcessing);
    assert_eq!(api.transport.request_count(CONVERSATIONS_URL), 20);
}

#[tokio::test]
async fn test_poll_errors_count_as_attempts() {
    let transport = MockTransport::new();
    transport.mock_response(PROCESS_URL, 200, json!({ "success": true }));
    transport.mock_response(CONVERSATIONS_URL, 500, json!({ "message": "down" }));

    let api = build_api(transport);
    let sleeper = MockSleeper::default();
    let cancel = CancelFlag::new();

    let outcome = send_and_await_reply(&api, &sleeper, &cancel, "254712345678", "Hello", 0)
        .await
        .unwrap();
    assert_eq!(outcome, ReplyOutcome::StillProcessing);
    assert_eq!(api.transport.request_count(CONVERSATIONS_URL), 20);
}

#[tokio::test]
async fn test_send_failure_propagates_without_polling() {
    let transport = MockTransport::new();
    transport.mock_response(PROCESS_URL, 500, json!({ "message": "gateway down" }));

    let api = build_api(transport);
    let sleeper = MockSleeper::default();
    let cancel = CancelFlag::new();

    let err = send_and_await_reply(&api, &sleeper, &cancel, "254712345678", "Hello", 0)
        .await
        .unwrap_err();
    assert_eq!(err.message(), "gateway down");
    assert_eq!(api.transport.request_count(CONVERSATIONS_URL), 0);
}

// =========================================================
// 建立会话
// =========================================================

#[tokio::test]
async fn test_start_conversation_normalizes_and_persists_identity() {
    let transport = MockTransport::new();
    transport.mock_response(PROCESS_URL, 200, json!({ "success": true }));
    transport.mock_response(CONVERSATIONS_URL, 200, conversations_body("254712345678", 1));

    let api = build_api(transport);
    let sleeper = MockSleeper::default();
    let cancel = CancelFlag::new();
    let profile = MockChatProfile::default();

    let outcome = start_conversation(&api, &sleeper, &cancel, &profile, "Amina", "0712 345 678")
        .await
        .unwrap();
    let StartOutcome::Ready(session) = outcome else {
        panic!("expected a ready session");
    };
    assert_eq!(session.phone(), "254712345678");
    assert_eq!(session.message_count(), 1);

    assert_eq!(profile.phone(), Some("254712345678".to_string()));
    assert_eq!(profile.name(), Some("Amina".to_string()));

    // 激活指令是固定的 PENZI
    let requests = api.transport.requests.borrow();
    let crate::api::HttpBody::Json(body) = &requests[0].body else {
        panic!("expected json body");
    };
    let value: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(value["message_body"], ACTIVATION_MESSAGE);
}

#[tokio::test]
async fn test_start_conversation_validates_inputs() {
    let api = build_api(MockTransport::new());
    let sleeper = MockSleeper::default();
    let cancel = CancelFlag::new();
    let profile = MockChatProfile::default();

    let err = start_conversation(&api, &sleeper, &cancel, &profile, "  ", "0712345678")
        .await
        .unwrap_err();
    assert_eq!(err, NAME_REQUIRED_MESSAGE);

    let err = start_conversation(&api, &sleeper, &cancel, &profile, "Amina", "12345")
        .await
        .unwrap_err();
    assert_eq!(err, INVALID_PHONE_MESSAGE);

    // 校验失败时什么都没发出去
    assert!(api.transport.requests.borrow().is_empty());
    assert_eq!(profile.phone(), None);
}

#[tokio::test]
async fn test_start_conversation_pending_when_backend_lags() {
    let transport = MockTransport::new();
    transport.mock_response(PROCESS_URL, 200, json!({ "success": true }));
    transport.mock_response(
        CONVERSATIONS_URL,
        200,
        json!({ "success": true, "data": { "conversations": [] } }),
    );

    let api = build_api(transport);
    let sleeper = MockSleeper::default();
    let cancel = CancelFlag::new();
    let profile = MockChatProfile::default();

    let outcome = start_conversation(&api, &sleeper, &cancel, &profile, "Amina", "0712345678")
        .await
        .unwrap();
    let StartOutcome::Pending(session) = outcome else {
        panic!("expected a pending session");
    };
    assert!(session.is_processing());
    // 700ms × 10 的节奏
    assert_eq!(sleeper.slept.borrow().len(), 10);
    assert_eq!(sleeper.slept.borrow()[0], Duration::from_millis(700));
    // 身份在激活发出成功后就已持久化
    assert_eq!(profile.phone(), Some("254712345678".to_string()));
}
