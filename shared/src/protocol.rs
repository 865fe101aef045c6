//! API 端点协议
//!
//! 每个端点用一个实现 [`ApiRequest`] 的请求类型描述：路径、方法、
//! 响应类型，以及是否套统一信封。动态路径段与查询串通过
//! 覆写 [`ApiRequest::path`] 拼出。

use crate::dashboard::{
    CompatibilityFilter, ConversationList, DashboardAnalytics, DirectionFilter, InterestResponseFilter,
    InterestsPage, MatchSort, MatchStatusFilter, MatchesPage, MessagesPage, NotificationCount,
    RecentActivity, UsersPage,
};
use crate::matching::{
    AdminSetting, CanUndoResponse, CandidateProfile, ChatFee, MpesaSettings, PaymentInitiateRequest,
    PaymentInitiateResponse, PaymentVerifyRequest, PaymentVerifyResponse, ProfilesResponse,
    SwipeOutcome, SwipeRequest, UndoSwipeResponse,
};
use crate::user::{User, UserSearchParams, UserStats};
use crate::{
    AuthResponse, CompleteRegistrationResponse, LoginCredentials, PhotoInventory,
    RegisterCredentials, UserProfile,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize + DeserializeOwned {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The URL path (or suffix).
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// 响应是否包在 `{ success, message, data, ... }` 信封里。
    /// 认证 / 匹配 / 管理设置端点为裸响应。
    const WRAPPED: bool = true;

    /// 实际请求路径；带动态段或查询串的端点覆写此方法
    fn path(&self) -> String {
        Self::PATH.to_string()
    }
}

/// 只关心 message 字段的响应
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

// 查询串拼装，首个键自动带 '?'
fn push_pair(query: &mut String, key: &str, value: &str) {
    query.push(if query.is_empty() { '?' } else { '&' });
    query.push_str(key);
    query.push('=');
    query.push_str(value);
}

// =========================================================
// 认证端点（裸响应）
// =========================================================

impl ApiRequest for LoginCredentials {
    type Response = AuthResponse;
    const PATH: &'static str = "/api/auth/login";
    const METHOD: HttpMethod = HttpMethod::Post;
    const WRAPPED: bool = false;
}

impl ApiRequest for RegisterCredentials {
    type Response = AuthResponse;
    const PATH: &'static str = "/api/auth/register";
    const METHOD: HttpMethod = HttpMethod::Post;
    const WRAPPED: bool = false;
}

/// 刷新访问令牌
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenResponse {
    pub token: String,
}

impl ApiRequest for RefreshTokenRequest {
    type Response = RefreshTokenResponse;
    const PATH: &'static str = "/api/auth/refresh";
    const METHOD: HttpMethod = HttpMethod::Post;
    const WRAPPED: bool = false;
}

/// 当前登录用户
#[derive(Debug, Serialize, Deserialize)]
pub struct MeRequest;

impl ApiRequest for MeRequest {
    type Response = UserProfile;
    const PATH: &'static str = "/api/auth/me";
    const METHOD: HttpMethod = HttpMethod::Get;
    const WRAPPED: bool = false;
}

/// 档案编辑（仅提交被修改的字段）
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

impl ApiRequest for ProfileUpdate {
    type Response = UserProfile;
    const PATH: &'static str = "/api/auth/profile";
    const METHOD: HttpMethod = HttpMethod::Put;
    const WRAPPED: bool = false;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

impl ApiRequest for ForgotPasswordRequest {
    type Response = MessageResponse;
    const PATH: &'static str = "/api/auth/forgot-password";
    const METHOD: HttpMethod = HttpMethod::Post;
    const WRAPPED: bool = false;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

impl ApiRequest for ResetPasswordRequest {
    type Response = MessageResponse;
    const PATH: &'static str = "/api/auth/reset-password";
    const METHOD: HttpMethod = HttpMethod::Post;
    const WRAPPED: bool = false;
}

/// 第三方 OAuth 登录（Google）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleAuthRequest {
    pub token: String,
}

impl ApiRequest for GoogleAuthRequest {
    type Response = AuthResponse;
    const PATH: &'static str = "/api/auth/google";
    const METHOD: HttpMethod = HttpMethod::Post;
    const WRAPPED: bool = false;
}

/// 第三方 OAuth 登录（Facebook）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacebookAuthRequest {
    pub token: String,
}

impl ApiRequest for FacebookAuthRequest {
    type Response = AuthResponse;
    const PATH: &'static str = "/api/auth/facebook";
    const METHOD: HttpMethod = HttpMethod::Post;
    const WRAPPED: bool = false;
}

// =========================================================
// 注册向导终点提交
// =========================================================

/// 向导收集的全部资料，最后一步整包提交
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRegistrationRequest {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub gender: String,
    pub county: String,
    pub town: String,
    pub level_of_education: String,
    pub profession: String,
    pub marital_status: String,
    pub religion: String,
    pub ethnicity: String,
    pub self_description: String,
}

impl ApiRequest for CompleteRegistrationRequest {
    type Response = CompleteRegistrationResponse;
    const PATH: &'static str = "/api/registration/complete";
    const METHOD: HttpMethod = HttpMethod::Post;
    const WRAPPED: bool = false;
}

// =========================================================
// 相册管理（裸响应）
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct RegistrationPhotosRequest;

impl ApiRequest for RegistrationPhotosRequest {
    type Response = PhotoInventory;
    const PATH: &'static str = "/api/registration/photos";
    const METHOD: HttpMethod = HttpMethod::Get;
    const WRAPPED: bool = false;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeletePhotoRequest {
    #[serde(skip)]
    pub id: i64,
}

impl ApiRequest for DeletePhotoRequest {
    type Response = PhotoInventory;
    const PATH: &'static str = "/api/registration/photos";
    const METHOD: HttpMethod = HttpMethod::Delete;
    const WRAPPED: bool = false;

    fn path(&self) -> String {
        format!("{}/{}", Self::PATH, self.id)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SetPrimaryPhotoRequest {
    #[serde(skip)]
    pub id: i64,
}

impl ApiRequest for SetPrimaryPhotoRequest {
    type Response = PhotoInventory;
    const PATH: &'static str = "/api/registration/photos";
    const METHOD: HttpMethod = HttpMethod::Post;
    const WRAPPED: bool = false;

    fn path(&self) -> String {
        format!("{}/{}/primary", Self::PATH, self.id)
    }
}

// =========================================================
// 匹配端点（裸响应）
// =========================================================

/// 滑动候选队列
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct ProfilesRequest {
    /// 为真时后端连同已滑过的人一起返回
    pub include_swiped: bool,
}

impl ApiRequest for ProfilesRequest {
    type Response = ProfilesResponse;
    const PATH: &'static str = "/api/matching/profiles";
    const METHOD: HttpMethod = HttpMethod::Get;
    const WRAPPED: bool = false;

    fn path(&self) -> String {
        if self.include_swiped {
            format!("{}?include_swiped=true", Self::PATH)
        } else {
            Self::PATH.to_string()
        }
    }
}

/// 潜在匹配列表（旧接口，保留兼容）
#[derive(Debug, Serialize, Deserialize)]
pub struct PotentialMatchesRequest;

impl ApiRequest for PotentialMatchesRequest {
    type Response = Vec<CandidateProfile>;
    const PATH: &'static str = "/api/matching/potential";
    const METHOD: HttpMethod = HttpMethod::Get;
    const WRAPPED: bool = false;
}

impl ApiRequest for SwipeRequest {
    type Response = SwipeOutcome;
    const PATH: &'static str = "/api/matching/swipe";
    const METHOD: HttpMethod = HttpMethod::Post;
    const WRAPPED: bool = false;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UndoSwipeRequest;

impl ApiRequest for UndoSwipeRequest {
    type Response = UndoSwipeResponse;
    const PATH: &'static str = "/api/matching/undo-swipe";
    const METHOD: HttpMethod = HttpMethod::Post;
    const WRAPPED: bool = false;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CanUndoRequest;

impl ApiRequest for CanUndoRequest {
    type Response = CanUndoResponse;
    const PATH: &'static str = "/api/matching/can-undo";
    const METHOD: HttpMethod = HttpMethod::Get;
    const WRAPPED: bool = false;
}

impl ApiRequest for PaymentInitiateRequest {
    type Response = PaymentInitiateResponse;
    const PATH: &'static str = "/api/matching/payment/initiate";
    const METHOD: HttpMethod = HttpMethod::Post;
    const WRAPPED: bool = false;
}

impl ApiRequest for PaymentVerifyRequest {
    type Response = PaymentVerifyResponse;
    const PATH: &'static str = "/api/matching/payment/verify";
    const METHOD: HttpMethod = HttpMethod::Post;
    const WRAPPED: bool = false;
}

// =========================================================
// 管理端设置（裸响应）
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminSettingsRequest;

impl ApiRequest for AdminSettingsRequest {
    type Response = Vec<AdminSetting>;
    const PATH: &'static str = "/api/admin/settings";
    const METHOD: HttpMethod = HttpMethod::Get;
    const WRAPPED: bool = false;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatFeeRequest;

impl ApiRequest for ChatFeeRequest {
    type Response = ChatFee;
    const PATH: &'static str = "/api/admin/settings/chat-fee";
    const METHOD: HttpMethod = HttpMethod::Get;
    const WRAPPED: bool = false;
}

/// PUT 聊天费：请求体直接复用 ChatFee
impl ApiRequest for ChatFee {
    type Response = MessageResponse;
    const PATH: &'static str = "/api/admin/settings/chat-fee";
    const METHOD: HttpMethod = HttpMethod::Put;
    const WRAPPED: bool = false;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MpesaSettingsRequest;

impl ApiRequest for MpesaSettingsRequest {
    type Response = MpesaSettings;
    const PATH: &'static str = "/api/admin/settings/mpesa";
    const METHOD: HttpMethod = HttpMethod::Get;
    const WRAPPED: bool = false;
}

/// PUT M-Pesa 配置：请求体复用 MpesaSettings
impl ApiRequest for MpesaSettings {
    type Response = MessageResponse;
    const PATH: &'static str = "/api/admin/settings/mpesa";
    const METHOD: HttpMethod = HttpMethod::Put;
    const WRAPPED: bool = false;
}

// =========================================================
// 用户管理端点（信封响应）
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct UserStatsRequest;

impl ApiRequest for UserStatsRequest {
    type Response = UserStats;
    const PATH: &'static str = "/api/users/stats";
    const METHOD: HttpMethod = HttpMethod::Get;
}

/// 按 ID 查用户
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UserByIdRequest {
    #[serde(skip)]
    pub id: i64,
}

impl ApiRequest for UserByIdRequest {
    type Response = User;
    const PATH: &'static str = "/api/users/profile";
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("{}/{}", Self::PATH, self.id)
    }
}

/// 按手机号查用户
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserByPhoneRequest {
    pub phone_number: String,
}

impl ApiRequest for UserByPhoneRequest {
    type Response = User;
    const PATH: &'static str = "/api/users/profile/phone";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// 管理端编辑用户（仅提交修改的字段）
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub town: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_of_education: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub religion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ethnicity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(skip)]
    pub id: i64,
    #[serde(flatten)]
    pub fields: UserUpdate,
}

impl ApiRequest for UpdateUserRequest {
    type Response = User;
    const PATH: &'static str = "/api/users/update";
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("{}/{}", Self::PATH, self.id)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ActivateUserRequest {
    #[serde(skip)]
    pub id: i64,
}

impl ApiRequest for ActivateUserRequest {
    type Response = serde_json::Value;
    const PATH: &'static str = "/api/users/activate";
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("{}/{}", Self::PATH, self.id)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeactivateUserRequest {
    #[serde(skip)]
    pub id: i64,
}

impl ApiRequest for DeactivateUserRequest {
    type Response = serde_json::Value;
    const PATH: &'static str = "/api/users/deactivate";
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("{}/{}", Self::PATH, self.id)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeleteUserRequest {
    #[serde(skip)]
    pub id: i64,
}

impl ApiRequest for DeleteUserRequest {
    type Response = serde_json::Value;
    const PATH: &'static str = "/api/users/delete";
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("{}/{}", Self::PATH, self.id)
    }
}

// =========================================================
// 管理面板端点（信封响应）
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyticsRequest;

impl ApiRequest for AnalyticsRequest {
    type Response = DashboardAnalytics;
    const PATH: &'static str = "/api/dashboard/analytics";
    const METHOD: HttpMethod = HttpMethod::Get;
}

/// 管理端用户列表，过滤条件进查询串
impl ApiRequest for UserSearchParams {
    type Response = UsersPage;
    const PATH: &'static str = "/api/dashboard/users";
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        let mut query = String::new();
        push_pair(&mut query, "page", &self.page.to_string());
        push_pair(&mut query, "per_page", &self.per_page.to_string());
        push_pair(&mut query, "status", self.status.as_str());
        if !self.search.is_empty() {
            push_pair(&mut query, "search", &self.search);
        }
        format!("{}{}", Self::PATH, query)
    }
}

/// 配对列表查询
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MatchesQuery {
    pub status: MatchStatusFilter,
    pub compatibility: CompatibilityFilter,
    pub sort: MatchSort,
    pub page: u32,
    pub per_page: u32,
}

impl Default for MatchesQuery {
    fn default() -> Self {
        Self {
            status: MatchStatusFilter::All,
            compatibility: CompatibilityFilter::All,
            sort: MatchSort::Newest,
            page: 1,
            per_page: 20,
        }
    }
}

impl ApiRequest for MatchesQuery {
    type Response = MatchesPage;
    const PATH: &'static str = "/api/dashboard/matches";
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        let mut query = String::new();
        push_pair(&mut query, "page", &self.page.to_string());
        push_pair(&mut query, "per_page", &self.per_page.to_string());
        push_pair(&mut query, "status", self.status.as_str());
        push_pair(&mut query, "compatibility", self.compatibility.as_str());
        push_pair(&mut query, "sort", self.sort.as_str());
        format!("{}{}", Self::PATH, query)
    }
}

/// 兴趣列表查询
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InterestsQuery {
    pub response: InterestResponseFilter,
    pub page: u32,
    pub per_page: u32,
}

impl Default for InterestsQuery {
    fn default() -> Self {
        Self {
            response: InterestResponseFilter::All,
            page: 1,
            per_page: 20,
        }
    }
}

impl ApiRequest for InterestsQuery {
    type Response = InterestsPage;
    const PATH: &'static str = "/api/dashboard/interests";
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        let mut query = String::new();
        push_pair(&mut query, "page", &self.page.to_string());
        push_pair(&mut query, "per_page", &self.per_page.to_string());
        push_pair(&mut query, "response", self.response.as_str());
        format!("{}{}", Self::PATH, query)
    }
}

/// 消息列表查询
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesQuery {
    pub direction: DirectionFilter,
    pub message_type: String,
    pub page: u32,
    pub per_page: u32,
}

impl Default for MessagesQuery {
    fn default() -> Self {
        Self {
            direction: DirectionFilter::All,
            message_type: "all".to_string(),
            page: 1,
            per_page: 20,
        }
    }
}

impl ApiRequest for MessagesQuery {
    type Response = MessagesPage;
    const PATH: &'static str = "/api/dashboard/messages";
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        let mut query = String::new();
        push_pair(&mut query, "page", &self.page.to_string());
        push_pair(&mut query, "per_page", &self.per_page.to_string());
        push_pair(&mut query, "direction", self.direction.as_str());
        if !self.message_type.is_empty() {
            push_pair(&mut query, "message_type", &self.message_type);
        }
        format!("{}{}", Self::PATH, query)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardConversationsRequest;

impl ApiRequest for DashboardConversationsRequest {
    type Response = ConversationList;
    const PATH: &'static str = "/api/dashboard/conversations";
    const METHOD: HttpMethod = HttpMethod::Get;
}

/// 管理员以短号身份回复
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendAdminMessageRequest {
    pub to_phone: String,
    pub message: String,
}

impl ApiRequest for SendAdminMessageRequest {
    type Response = serde_json::Value;
    const PATH: &'static str = "/api/dashboard/send-message";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecentActivityRequest;

impl ApiRequest for RecentActivityRequest {
    type Response = RecentActivity;
    const PATH: &'static str = "/api/dashboard/recent-activity";
    const METHOD: HttpMethod = HttpMethod::Get;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NotificationCountRequest;

impl ApiRequest for NotificationCountRequest {
    type Response = NotificationCount;
    const PATH: &'static str = "/api/dashboard/notifications/count";
    const METHOD: HttpMethod = HttpMethod::Get;
}

// =========================================================
// SMS 模拟器端点（信封响应）
// =========================================================

/// 模拟一条入站 SMS
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessIncomingSms {
    pub from_phone: String,
    pub to_phone: String,
    pub message_body: String,
    pub direction: String,
}

impl ProcessIncomingSms {
    /// 以固定短号、incoming 方向构造
    pub fn to_shortcode(from_phone: impl Into<String>, message_body: impl Into<String>) -> Self {
        Self {
            from_phone: from_phone.into(),
            to_phone: crate::SMS_SHORTCODE.to_string(),
            message_body: message_body.into(),
            direction: "incoming".to_string(),
        }
    }
}

impl ApiRequest for ProcessIncomingSms {
    type Response = serde_json::Value;
    const PATH: &'static str = "/api/sms/process-incoming";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SmsConversationsRequest;

impl ApiRequest for SmsConversationsRequest {
    type Response = ConversationList;
    const PATH: &'static str = "/api/sms/conversations";
    const METHOD: HttpMethod = HttpMethod::Get;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeleteSmsMessageRequest {
    #[serde(skip)]
    pub id: i64,
}

impl ApiRequest for DeleteSmsMessageRequest {
    type Response = serde_json::Value;
    const PATH: &'static str = "/api/sms/messages";
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("{}/{}", Self::PATH, self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearConversationRequest {
    #[serde(skip)]
    pub phone: String,
}

impl ApiRequest for ClearConversationRequest {
    type Response = serde_json::Value;
    const PATH: &'static str = "/api/sms/conversations";
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("{}/{}/clear", Self::PATH, self.phone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::UserStatusFilter;

    #[test]
    fn dynamic_paths_interpolate_segments() {
        let req = UpdateUserRequest {
            id: 42,
            fields: UserUpdate::default(),
        };
        assert_eq!(req.path(), "/api/users/update/42");

        let clear = ClearConversationRequest {
            phone: "254712345678".to_string(),
        };
        assert_eq!(clear.path(), "/api/sms/conversations/254712345678/clear");
    }

    #[test]
    fn list_queries_serialize_filters() {
        let q = MatchesQuery {
            status: MatchStatusFilter::Pending,
            compatibility: CompatibilityFilter::High,
            sort: MatchSort::Compatibility,
            page: 3,
            per_page: 20,
        };
        assert_eq!(
            q.path(),
            "/api/dashboard/matches?page=3&per_page=20&status=pending&compatibility=high&sort=compatibility"
        );
    }

    #[test]
    fn user_search_omits_empty_search() {
        let params = UserSearchParams {
            status: UserStatusFilter::Active,
            search: String::new(),
            page: 1,
            per_page: 20,
        };
        assert_eq!(
            params.path(),
            "/api/dashboard/users?page=1&per_page=20&status=active"
        );
    }

    #[test]
    fn profiles_request_toggles_include_swiped() {
        assert_eq!(
            ProfilesRequest { include_swiped: true }.path(),
            "/api/matching/profiles?include_swiped=true"
        );
        assert_eq!(
            ProfilesRequest::default().path(),
            "/api/matching/profiles"
        );
    }

    #[test]
    fn update_body_skips_path_id_and_unset_fields() {
        let req = UpdateUserRequest {
            id: 7,
            fields: UserUpdate {
                town: Some("Nakuru".to_string()),
                ..UserUpdate::default()
            },
        };
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body, serde_json::json!({ "town": "Nakuru" }));
    }

    #[test]
    fn incoming_sms_targets_shortcode() {
        let sms = ProcessIncomingSms::to_shortcode("0712345678", "PENZI");
        assert_eq!(sms.to_phone, crate::SMS_SHORTCODE);
        assert_eq!(sms.direction, "incoming");
    }
}
