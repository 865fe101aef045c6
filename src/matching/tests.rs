use super::*;
use crate::adapter::tests::MockCredentials;
use crate::api::MockTransport;
use crate::payment::{self, PaymentVerdict};
use crate::poll::CancelFlag;
use crate::poll::tests::MockSleeper;
use serde_json::json;

// =========================================================
// 辅助函数
// =========================================================

fn candidate(id: &str, first_name: &str) -> CandidateProfile {
    serde_json::from_value(json!({
        "id": id,
        "firstName": first_name,
        "lastName": "Wanjiru",
        "age": 26
    }))
    .unwrap()
}

fn deck_with(profiles: Vec<CandidateProfile>) -> SwipeDeck {
    let mut deck = SwipeDeck::new();
    deck.load(ProfilesResponse {
        profiles,
        total_swiped: 0,
        total_unswiped: 0,
        include_swiped: false,
    });
    deck
}

fn build_api(transport: MockTransport) -> PenziApi<MockTransport, MockCredentials> {
    PenziApi::new(
        "http://test".to_string(),
        transport,
        MockCredentials::with_session("tok-1", "ref-1"),
    )
}

// =========================================================
// 纯状态
// =========================================================

#[test]
fn test_load_resets_cursor_and_stats() {
    let mut deck = deck_with(vec![candidate("a", "Achieng"), candidate("b", "Boke")]);
    deck.gate(SwipeDecision::Pass);
    deck.load(ProfilesResponse {
        profiles: vec![candidate("c", "Chebet")],
        total_swiped: 7,
        total_unswiped: 1,
        include_swiped: true,
    });

    assert_eq!(deck.current_index(), 0);
    assert_eq!(deck.current().map(|p| p.id.as_str()), Some("c"));
    assert_eq!(
        deck.stats(),
        DeckStats {
            total_swiped: 7,
            total_unswiped: 1
        }
    );
}

#[test]
fn test_gate_routes_like_through_payment() {
    let deck = deck_with(vec![candidate("a", "Achieng")]);

    match deck.gate(SwipeDecision::Like) {
        Some(SwipeGate::PaymentRequired(profile)) => assert_eq!(profile.id, "a"),
        other => panic!("like must open the payment gate, got {other:?}"),
    }
    match deck.gate(SwipeDecision::Pass) {
        Some(SwipeGate::RecordNow(profile)) => assert_eq!(profile.id, "a"),
        other => panic!("pass must record directly, got {other:?}"),
    }
}

#[test]
fn test_gate_none_when_exhausted() {
    let deck = SwipeDeck::new();
    assert!(deck.is_exhausted());
    assert!(deck.gate(SwipeDecision::Like).is_none());
}

#[test]
fn test_toggle_show_all_flips() {
    let mut deck = SwipeDeck::new();
    assert!(!deck.show_all());
    assert!(deck.toggle_show_all());
    assert!(!deck.toggle_show_all());
}

// =========================================================
// 后端编排
// =========================================================

#[tokio::test]
async fn test_pass_records_and_advances() {
    let transport = MockTransport::new();
    transport.mock_response(
        "http://test/api/matching/swipe",
        200,
        json!({ "isMatch": false, "message": "Swipe recorded" }),
    );
    transport.mock_response(
        "http://test/api/matching/can-undo",
        200,
        json!({
            "canUndo": true,
            "lastSwipe": {
                "targetUser": { "id": "a", "firstName": "Achieng", "lastName": "Wanjiru" },
                "wasLike": false
            }
        }),
    );

    let api = build_api(transport);
    let mut deck = deck_with(vec![candidate("a", "Achieng"), candidate("b", "Boke")]);
    let target = deck.current().cloned().unwrap();

    let outcome = deck
        .record_swipe(&api, &target, SwipeDecision::Pass)
        .await
        .unwrap();
    assert!(!outcome.is_match);
    assert_eq!(deck.current_index(), 1);
    assert_eq!(deck.current().map(|p| p.id.as_str()), Some("b"));
    assert!(deck.can_undo());

    let requests = api.transport.requests.borrow();
    assert_eq!(requests.len(), 2);
    let crate::api::HttpBody::Json(body) = &requests[0].body else {
        panic!("expected json swipe body");
    };
    let value: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(value["targetUserId"], "a");
    assert_eq!(value["action"], "pass");
}

#[tokio::test]
async fn test_cursor_never_exceeds_deck() {
    let transport = MockTransport::new();
    transport.mock_response("http://test/api/matching/swipe", 200, json!({ "isMatch": true }));

    let api = build_api(transport);
    let mut deck = deck_with(vec![candidate("a", "Achieng")]);
    let target = deck.current().cloned().unwrap();

    deck.record_swipe(&api, &target, SwipeDecision::Pass)
        .await
        .unwrap();
    assert_eq!(deck.current_index(), 1);
    assert!(deck.is_exhausted());

    // 迟到的支付回调再记一笔也不会把游标推出牌堆
    deck.record_swipe(&api, &target, SwipeDecision::Like)
        .await
        .unwrap();
    assert_eq!(deck.current_index(), 1);
}

#[tokio::test]
async fn test_failed_swipe_leaves_cursor() {
    let transport = MockTransport::new();
    transport.mock_response(
        "http://test/api/matching/swipe",
        500,
        json!({ "message": "Database unavailable" }),
    );

    let api = build_api(transport);
    let mut deck = deck_with(vec![candidate("a", "Achieng")]);
    let target = deck.current().cloned().unwrap();

    let err = deck
        .record_swipe(&api, &target, SwipeDecision::Pass)
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Database unavailable");
    assert_eq!(deck.current_index(), 0);
    // 失败的滑动不查撤销状态
    assert_eq!(api.transport.requests.borrow().len(), 1);
}

#[tokio::test]
async fn test_swipe_survives_undo_status_failure() {
    let transport = MockTransport::new();
    transport.mock_response("http://test/api/matching/swipe", 200, json!({ "isMatch": false }));
    // can-undo 未打桩 → 404，滑动本身不受影响

    let api = build_api(transport);
    let mut deck = deck_with(vec![candidate("a", "Achieng")]);
    let target = deck.current().cloned().unwrap();

    deck.record_swipe(&api, &target, SwipeDecision::Pass)
        .await
        .unwrap();
    assert_eq!(deck.current_index(), 1);
    assert!(!deck.can_undo());
}

#[tokio::test]
async fn test_like_records_only_after_confirmed_payment() {
    const INITIATE_URL: &str = "http://test/api/matching/payment/initiate";
    const VERIFY_URL: &str = "http://test/api/matching/payment/verify";
    const SWIPE_URL: &str = "http://test/api/matching/swipe";

    let transport = MockTransport::new();
    transport.mock_response(
        INITIATE_URL,
        200,
        json!({ "success": true, "transactionId": "tx-1", "checkoutRequestId": "co-1" }),
    );
    // 第一次核验未到账，第二次到账
    transport.mock_response(VERIFY_URL, 200, json!({ "success": false, "message": "pending" }));
    transport.mock_response(VERIFY_URL, 200, json!({ "success": true }));
    transport.mock_response(SWIPE_URL, 200, json!({ "isMatch": true }));

    let api = build_api(transport);
    let mut deck = deck_with(vec![candidate("a", "Achieng")]);

    // like 只开闸门，不直接落滑动
    let Some(SwipeGate::PaymentRequired(target)) = deck.gate(SwipeDecision::Like) else {
        panic!("like must open the payment gate");
    };
    assert_eq!(api.transport.request_count(SWIPE_URL), 0);

    let receipt = payment::initiate(&api, &target.id, "254712345678", 50)
        .await
        .unwrap();
    // STK 已发出，滑动仍未落账
    assert_eq!(api.transport.request_count(SWIPE_URL), 0);

    let sleeper = MockSleeper::default();
    let cancel = CancelFlag::new();
    let verdict =
        payment::poll_verification(&api, &sleeper, &cancel, &receipt.transaction_id, &target.id)
            .await;
    assert_eq!(verdict, PaymentVerdict::Confirmed);
    // 核验轮询期间也没有碰 swipe 端点
    assert_eq!(api.transport.request_count(VERIFY_URL), 2);
    assert_eq!(api.transport.request_count(SWIPE_URL), 0);

    // 到账之后才真正记录这笔 like
    let outcome = deck
        .record_swipe(&api, &target, SwipeDecision::Like)
        .await
        .unwrap();
    assert!(outcome.is_match);
    assert_eq!(api.transport.request_count(SWIPE_URL), 1);

    // 全程调用顺序：发起 → 核验 ×2 → 记滑动 →（撤销状态刷新）
    let requests = api.transport.requests.borrow();
    let urls: Vec<&str> = requests.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls[..4],
        [INITIATE_URL, VERIFY_URL, VERIFY_URL, SWIPE_URL]
    );
}

#[tokio::test]
async fn test_undo_splices_at_cursor() {
    let transport = MockTransport::new();
    transport.mock_response("http://test/api/matching/swipe", 200, json!({ "isMatch": false }));
    transport.mock_response(
        "http://test/api/matching/undo-swipe",
        200,
        json!({
            "message": "Swipe undone",
            "undoneUser": { "id": "a", "firstName": "Achieng", "lastName": "Wanjiru" },
            "wasLike": false
        }),
    );

    let api = build_api(transport);
    let mut deck = deck_with(vec![
        candidate("a", "Achieng"),
        candidate("b", "Boke"),
        candidate("c", "Chebet"),
    ]);
    let target = deck.current().cloned().unwrap();
    deck.record_swipe(&api, &target, SwipeDecision::Pass)
        .await
        .unwrap();
    deck.apply_undo_status(CanUndoResponse {
        can_undo: true,
        last_swipe: None,
    });

    let response = deck.undo(&api).await.unwrap();
    assert!(!response.was_like);
    // 撤回的人插在游标处，立即成为当前卡片
    assert_eq!(deck.current().map(|p| p.id.as_str()), Some("a"));
    assert_eq!(deck.profiles().len(), 4);
    assert!(!deck.can_undo());
    assert!(deck.last_swipe().is_none());
}

#[tokio::test]
async fn test_undo_requires_backend_flag() {
    let api = build_api(MockTransport::new());
    let mut deck = deck_with(vec![candidate("a", "Achieng")]);

    let err = deck.undo(&api).await.unwrap_err();
    assert_eq!(err.message(), "Nothing to undo");
    assert!(api.transport.requests.borrow().is_empty());
}

#[tokio::test]
async fn test_refresh_uses_include_swiped_param() {
    let transport = MockTransport::new();
    transport.mock_response(
        "http://test/api/matching/profiles?include_swiped=true",
        200,
        json!({
            "profiles": [{ "id": "a", "firstName": "Achieng", "lastName": "Wanjiru" }],
            "totalSwiped": 4,
            "totalUnswiped": 1,
            "includeSwiped": true
        }),
    );

    let api = build_api(transport);
    let mut deck = SwipeDeck::new();
    deck.toggle_show_all();
    deck.refresh(&api).await.unwrap();

    assert_eq!(deck.profiles().len(), 1);
    assert_eq!(deck.stats().total_swiped, 4);
    let requests = api.transport.requests.borrow();
    assert!(requests[0].url.ends_with("/api/matching/profiles?include_swiped=true"));
}
