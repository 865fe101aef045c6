use super::*;
use crate::adapter::tests::MockCredentials;
use crate::api::MockTransport;
use crate::poll::tests::MockSleeper;
use serde_json::json;

const INITIATE_URL: &str = "http://test/api/matching/payment/initiate";
const VERIFY_URL: &str = "http://test/api/matching/payment/verify";

fn build_api(transport: MockTransport) -> PenziApi<MockTransport, MockCredentials> {
    PenziApi::new(
        "http://test".to_string(),
        transport,
        MockCredentials::with_session("tok-1", "ref-1"),
    )
}

// =========================================================
// 归约器与输入
// =========================================================

#[test]
fn test_flow_reducer_transitions() {
    let mut flow = PaymentFlow::new();
    assert_eq!(flow.status(), PaymentPhase::Idle);

    flow.set_error(EMPTY_PHONE_MESSAGE);
    assert_eq!(flow.status(), PaymentPhase::Idle);
    assert_eq!(flow.error(), Some(EMPTY_PHONE_MESSAGE));

    flow.begin();
    assert_eq!(flow.status(), PaymentPhase::Processing);
    assert_eq!(flow.error(), None);

    flow.stk_sent(&PaymentInitiateResponse {
        success: true,
        transaction_id: "txn-7".to_string(),
        checkout_request_id: "chk-7".to_string(),
        message: String::new(),
    });
    assert_eq!(flow.transaction_id(), "txn-7");
    assert_eq!(flow.checkout_request_id(), "chk-7");
    assert_eq!(flow.status(), PaymentPhase::Processing);

    // 手动核验失败只写文案，轮询还在跑
    flow.set_error("Still pending");
    assert_eq!(flow.status(), PaymentPhase::Processing);

    flow.confirmed();
    assert_eq!(flow.status(), PaymentPhase::Success);
    assert_eq!(flow.error(), None);

    flow.declined(VERIFY_TIMEOUT_MESSAGE);
    assert_eq!(flow.status(), PaymentPhase::Failed);
    assert_eq!(flow.error(), Some(VERIFY_TIMEOUT_MESSAGE));

    flow.reset();
    assert_eq!(flow, PaymentFlow::new());
}

#[test]
fn test_prepare_phone() {
    assert_eq!(prepare_phone("   "), Err(EMPTY_PHONE_MESSAGE));
    assert_eq!(prepare_phone("0712345678"), Ok("254712345678".to_string()));
    assert_eq!(prepare_phone("+254 712 345 678"), Ok("254712345678".to_string()));
}

#[test]
fn test_surface_message_prefers_server_body() {
    let http_err = PenziError::api("Insufficient funds").with_http_status(400);
    assert_eq!(
        surface_message(&http_err, NETWORK_ERROR_MESSAGE),
        "Insufficient funds"
    );

    let transport_err = PenziError::network("connection refused");
    assert_eq!(
        surface_message(&transport_err, NETWORK_ERROR_MESSAGE),
        NETWORK_ERROR_MESSAGE
    );
}

// =========================================================
// 发起
// =========================================================

#[tokio::test]
async fn test_initiate_sends_normalized_payload() {
    let transport = MockTransport::new();
    transport.mock_response(
        INITIATE_URL,
        200,
        json!({
            "success": true,
            "transactionId": "txn-1",
            "checkoutRequestId": "chk-1",
            "message": "STK push sent"
        }),
    );

    let api = build_api(transport);
    let phone = prepare_phone("0712345678").unwrap();
    let receipt = initiate(&api, "u9", &phone, 50).await.unwrap();
    assert_eq!(receipt.transaction_id, "txn-1");
    assert_eq!(receipt.checkout_request_id, "chk-1");

    let requests = api.transport.requests.borrow();
    let crate::api::HttpBody::Json(body) = &requests[0].body else {
        panic!("expected json body");
    };
    let value: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(value["targetUserId"], "u9");
    assert_eq!(value["phoneNumber"], "254712345678");
    assert_eq!(value["amount"], 50);
}

#[tokio::test]
async fn test_initiate_declined_uses_server_message() {
    let transport = MockTransport::new();
    transport.mock_response(
        INITIATE_URL,
        200,
        json!({ "success": false, "message": "Insufficient funds" }),
    );
    let api = build_api(transport);
    let err = initiate(&api, "u9", "254712345678", 50).await.unwrap_err();
    assert_eq!(err, "Insufficient funds");
}

#[tokio::test]
async fn test_initiate_declined_without_message_falls_back() {
    let transport = MockTransport::new();
    transport.mock_response(INITIATE_URL, 200, json!({ "success": false }));
    let api = build_api(transport);
    let err = initiate(&api, "u9", "254712345678", 50).await.unwrap_err();
    assert_eq!(err, INITIATION_FAILED_MESSAGE);
}

#[tokio::test]
async fn test_initiate_http_error_surfaces_body_message() {
    let transport = MockTransport::new();
    transport.mock_response(INITIATE_URL, 400, json!({ "message": "Invalid phone number" }));
    let api = build_api(transport);
    let err = initiate(&api, "u9", "254712345678", 50).await.unwrap_err();
    assert_eq!(err, "Invalid phone number");
}

// =========================================================
// 核验轮询
// =========================================================

#[tokio::test]
async fn test_poll_confirms_after_pending_attempts() {
    let transport = MockTransport::new();
    transport.mock_response(VERIFY_URL, 200, json!({ "success": false, "message": "Pending" }));
    transport.mock_response(VERIFY_URL, 200, json!({ "success": false, "message": "Pending" }));
    transport.mock_response(VERIFY_URL, 200, json!({ "success": true }));

    let api = build_api(transport);
    let sleeper = MockSleeper::default();
    let cancel = CancelFlag::new();

    let verdict = poll_verification(&api, &sleeper, &cancel, "txn-1", "u9").await;
    assert_eq!(verdict, PaymentVerdict::Confirmed);
    assert_eq!(verdict.failure_message(), None);

    // 首查不等待，之后每次隔 10 秒
    assert_eq!(
        *sleeper.slept.borrow(),
        vec![
            Duration::ZERO,
            Duration::from_secs(10),
            Duration::from_secs(10),
        ]
    );
    assert_eq!(api.transport.request_count(VERIFY_URL), 3);
}

#[tokio::test]
async fn test_poll_exhaustion_reports_timeout() {
    let transport = MockTransport::new();
    transport.mock_response(VERIFY_URL, 200, json!({ "success": false }));

    let api = build_api(transport);
    let sleeper = MockSleeper::default();
    let cancel = CancelFlag::new();

    let verdict = poll_verification(&api, &sleeper, &cancel, "txn-1", "u9").await;
    assert_eq!(verdict, PaymentVerdict::TimedOut);
    assert_eq!(verdict.failure_message(), Some(VERIFY_TIMEOUT_MESSAGE));
    assert_eq!(api.transport.request_count(VERIFY_URL), 30);
}

#[tokio::test]
async fn test_poll_exhaustion_after_errors_reports_failure() {
    let transport = MockTransport::new();
    transport.mock_response(VERIFY_URL, 500, json!({ "message": "Gateway down" }));

    let api = build_api(transport);
    let sleeper = MockSleeper::default();
    let cancel = CancelFlag::new();

    let verdict = poll_verification(&api, &sleeper, &cancel, "txn-1", "u9").await;
    assert_eq!(verdict, PaymentVerdict::Unverifiable);
    assert_eq!(verdict.failure_message(), Some(VERIFY_FAILED_MESSAGE));
    assert_eq!(api.transport.request_count(VERIFY_URL), 30);
}

#[tokio::test]
async fn test_poll_stops_on_cancel() {
    let api = build_api(MockTransport::new());
    let sleeper = MockSleeper::default();
    let cancel = CancelFlag::new();
    cancel.cancel();

    let verdict = poll_verification(&api, &sleeper, &cancel, "txn-1", "u9").await;
    assert_eq!(verdict, PaymentVerdict::Cancelled);
    assert!(api.transport.requests.borrow().is_empty());
}

// =========================================================
// 手动核验与聊天费
// =========================================================

#[tokio::test]
async fn test_verify_once_paths() {
    let transport = MockTransport::new();
    transport.mock_response(VERIFY_URL, 200, json!({ "success": false, "message": "Still pending" }));
    transport.mock_response(VERIFY_URL, 200, json!({ "success": false }));
    transport.mock_response(VERIFY_URL, 200, json!({ "success": true }));
    let api = build_api(transport);

    assert_eq!(
        verify_once(&api, "txn-1", "u9").await,
        Err("Still pending".to_string())
    );
    assert_eq!(
        verify_once(&api, "txn-1", "u9").await,
        Err(MANUAL_VERIFY_FALLBACK.to_string())
    );
    assert_eq!(verify_once(&api, "txn-1", "u9").await, Ok(()));
}

#[tokio::test]
async fn test_load_chat_fee_reads_admin_setting() {
    let transport = MockTransport::new();
    transport.mock_response(
        "http://test/api/admin/settings/chat-fee",
        200,
        json!({ "chatFee": 99 }),
    );
    let api = build_api(transport);
    assert_eq!(load_chat_fee(&api).await, 99);
}

#[tokio::test]
async fn test_load_chat_fee_falls_back_to_default() {
    let api = build_api(MockTransport::new());
    assert_eq!(load_chat_fee(&api).await, DEFAULT_CHAT_FEE);
}
