//! 匹配 / 支付 / 管理设置模型
//!
//! /api/matching 系列为裸响应（无信封），字段 camelCase。

use crate::UserProfile;
use serde::{Deserialize, Serialize};

// =========================================================
// 滑动候选人
// =========================================================

/// 滑动界面的候选人卡片
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub age: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub town: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_premium: Option<bool>,
}

/// GET /api/matching/profiles 响应，计数随正文平铺返回
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilesResponse {
    #[serde(default)]
    pub profiles: Vec<CandidateProfile>,
    #[serde(default)]
    pub total_swiped: u32,
    #[serde(default)]
    pub total_unswiped: u32,
    #[serde(default)]
    pub include_swiped: bool,
}

// =========================================================
// 滑动动作
// =========================================================

/// 用户对候选人的决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDecision {
    Like,
    Pass,
}

/// POST /api/matching/swipe 请求体
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeRequest {
    pub target_user_id: String,
    pub action: SwipeDecision,
}

/// 双向配对记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub id: String,
    pub user_id: String,
    pub matched_user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_user: Option<UserProfile>,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub is_mutual: bool,
    #[serde(default)]
    pub created_at: String,
}

/// 记录滑动后的结果，`isMatch` 为真时携带配对详情
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeOutcome {
    #[serde(default)]
    pub is_match: bool,
    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    pub matched: Option<MatchRecord>,
    #[serde(default)]
    pub message: String,
}

// =========================================================
// 撤销
// =========================================================

/// GET /api/matching/can-undo 的 `lastSwipe` 明细
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastSwipeInfo {
    pub target_user: CandidateProfile,
    pub was_like: bool,
    #[serde(default)]
    pub swiped_at: String,
}

/// GET /api/matching/can-undo 响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanUndoResponse {
    #[serde(default)]
    pub can_undo: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_swipe: Option<LastSwipeInfo>,
}

/// POST /api/matching/undo-swipe 响应：被撤销的候选人回到队列
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoSwipeResponse {
    #[serde(default)]
    pub message: String,
    pub undone_user: CandidateProfile,
    #[serde(default)]
    pub was_like: bool,
}

// =========================================================
// M-Pesa 支付
// =========================================================

/// POST /api/matching/payment/initiate 请求体
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInitiateRequest {
    pub target_user_id: String,
    pub phone_number: String,
    pub amount: u32,
}

/// STK push 已发出的回执
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInitiateResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub transaction_id: String,
    #[serde(default)]
    pub checkout_request_id: String,
    #[serde(default)]
    pub message: String,
}

/// POST /api/matching/payment/verify 请求体
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentVerifyRequest {
    pub transaction_id: String,
    pub target_user_id: String,
}

/// 支付核验结果，`success` 为真即视为到账
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentVerifyResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

// =========================================================
// 管理端设置
// =========================================================

/// 单条管理设置行（/api/admin/settings）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSetting {
    pub id: i64,
    pub setting_key: String,
    pub setting_value: serde_json::Value,
    #[serde(default)]
    pub setting_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// 聊天费（/api/admin/settings/chat-fee）
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatFee {
    pub chat_fee: u32,
}

/// M-Pesa 通道配置（/api/admin/settings/mpesa）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MpesaSettings {
    #[serde(default)]
    pub shortcode: String,
    #[serde(default)]
    pub consumer_key: String,
    #[serde(default)]
    pub consumer_secret: String,
    #[serde(default)]
    pub passkey: String,
    #[serde(default)]
    pub callback_url: String,
    #[serde(default)]
    pub environment: String,
}
