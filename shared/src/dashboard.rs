//! 管理面板模型（/api/dashboard 与 /api/sms 系列）
//!
//! 这组端点使用信封格式，列表负载把分页信息嵌在 `data` 里
//! （`{ page, pages, per_page, total }`，与顶层信封分页不是同一形状）。

use crate::user::User;
use serde::{Deserialize, Serialize};

// =========================================================
// 总览统计
// =========================================================

/// 匹配漏斗统计（/api/dashboard/analytics）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct DashboardAnalytics {
    pub success_rate: f64,
    pub total_interests: u64,
    pub positive_responses: u64,
    pub conversion_rate: f64,
}

/// data 内嵌分页块
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PageInfo {
    pub page: u32,
    pub pages: u32,
    pub per_page: u32,
    pub total: u64,
}

// =========================================================
// 配对 / 兴趣
// =========================================================

/// 配对双方的摘要视图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchParticipant {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub town: Option<String>,
}

/// 管理端配对行（/api/dashboard/matches）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester: Option<MatchParticipant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_user: Option<MatchParticipant>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub compatibility_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// 兴趣方摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestParty {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

/// 兴趣表达行（/api/dashboard/interests）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interest {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interested_user: Option<InterestParty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_user: Option<InterestParty>,
    #[serde(default)]
    pub interest_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default)]
    pub notification_sent: bool,
    #[serde(default)]
    pub response_received: bool,
    #[serde(default)]
    pub feedback_sent: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_at: Option<String>,
}

// =========================================================
// SMS 消息与会话
// =========================================================

/// 消息方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsDirection {
    Incoming,
    Outgoing,
}

/// 单条 SMS 记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmsMessage {
    pub id: i64,
    pub from_phone: String,
    pub to_phone: String,
    pub message_body: String,
    pub direction: SmsDirection,
    #[serde(default)]
    pub message_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// 按手机号聚合的会话
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub phone_number: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub last_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message_time: Option<String>,
    #[serde(default)]
    pub message_count: u32,
    #[serde(default)]
    pub messages: Vec<SmsMessage>,
}

// =========================================================
// data 负载形状
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersPage {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub pagination: PageInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchesPage {
    #[serde(default)]
    pub matches: Vec<MatchSummary>,
    #[serde(default)]
    pub pagination: PageInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestsPage {
    #[serde(default)]
    pub interests: Vec<Interest>,
    #[serde(default)]
    pub pagination: PageInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesPage {
    #[serde(default)]
    pub messages: Vec<SmsMessage>,
    #[serde(default)]
    pub pagination: PageInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationList {
    #[serde(default)]
    pub conversations: Vec<Conversation>,
}

/// 最近动态（/api/dashboard/recent-activity）
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RecentActivity {
    #[serde(default)]
    pub recent_matches: Vec<MatchSummary>,
    #[serde(default)]
    pub recent_interests: Vec<Interest>,
    #[serde(default)]
    pub recent_messages: Vec<SmsMessage>,
}

/// 通知计数（/api/dashboard/notifications/count，供 30 秒轮询）
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NotificationCount {
    #[serde(default)]
    pub total_count: u32,
    #[serde(default)]
    pub interest_count: u32,
    #[serde(default)]
    pub match_count: u32,
    #[serde(default)]
    pub message_count: u32,
    #[serde(default)]
    pub last_updated: String,
}

// =========================================================
// 过滤枚举
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatusFilter {
    All,
    Active,
    Pending,
    Expired,
}

impl Default for MatchStatusFilter {
    fn default() -> Self {
        MatchStatusFilter::All
    }
}

impl MatchStatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatusFilter::All => "all",
            MatchStatusFilter::Active => "active",
            MatchStatusFilter::Pending => "pending",
            MatchStatusFilter::Expired => "expired",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompatibilityFilter {
    All,
    High,
    Medium,
    Low,
}

impl Default for CompatibilityFilter {
    fn default() -> Self {
        CompatibilityFilter::All
    }
}

impl CompatibilityFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompatibilityFilter::All => "all",
            CompatibilityFilter::High => "high",
            CompatibilityFilter::Medium => "medium",
            CompatibilityFilter::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSort {
    Newest,
    Oldest,
    Compatibility,
}

impl Default for MatchSort {
    fn default() -> Self {
        MatchSort::Newest
    }
}

impl MatchSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchSort::Newest => "newest",
            MatchSort::Oldest => "oldest",
            MatchSort::Compatibility => "compatibility",
        }
    }
}

/// 兴趣回应过滤；YES/NO 为后端原样大写值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterestResponseFilter {
    #[serde(rename = "all")]
    All,
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "YES")]
    Yes,
    #[serde(rename = "NO")]
    No,
}

impl Default for InterestResponseFilter {
    fn default() -> Self {
        InterestResponseFilter::All
    }
}

impl InterestResponseFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterestResponseFilter::All => "all",
            InterestResponseFilter::Pending => "pending",
            InterestResponseFilter::Yes => "YES",
            InterestResponseFilter::No => "NO",
        }
    }
}

/// 消息方向过滤（查询参数用 inbound/outbound，与行内 direction 不同词）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionFilter {
    All,
    Inbound,
    Outbound,
}

impl Default for DirectionFilter {
    fn default() -> Self {
        DirectionFilter::All
    }
}

impl DirectionFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            DirectionFilter::All => "all",
            DirectionFilter::Inbound => "inbound",
            DirectionFilter::Outbound => "outbound",
        }
    }
}
