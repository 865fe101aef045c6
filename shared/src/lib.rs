//! Penzi 前后端共享类型
//!
//! 所有 DTO 均为后端数据的镜像，字段名通过 serde rename 固定为各端点的
//! 实际线上格式（后端混用 camelCase 与 snake_case，按端点逐一钉死）。

use serde::{Deserialize, Serialize};

pub mod dashboard;
pub mod date;
pub mod matching;
pub mod protocol;
pub mod user;

pub use chrono;
pub use date::Timestamp;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// SMS 模拟器固定收信短号
pub const SMS_SHORTCODE: &str = "22141";
/// 管理端未配置时的默认聊天费（KES）
pub const DEFAULT_CHAT_FEE: u32 = 50;

// --- Cookie 名称与有效期 ---
pub const COOKIE_TOKEN: &str = "token";
pub const COOKIE_REFRESH_TOKEN: &str = "refreshToken";
pub const TOKEN_TTL_DAYS: u32 = 7;
pub const REFRESH_TOKEN_TTL_DAYS: u32 = 30;

// --- LocalStorage 键 ---
pub const KEY_USER: &str = "user";
pub const KEY_LAST_AUTH_CHECK: &str = "lastAuthCheck";
pub const KEY_CHAT_PHONE: &str = "penzi_userPhone";
pub const KEY_CHAT_NAME: &str = "penzi_userName";
pub const KEY_BACKEND_URL: &str = "penzi_backendUrl";

/// 会话快照的新鲜度窗口：5 分钟内不重复请求 /auth/me
pub const AUTH_CACHE_TTL_MS: i64 = 5 * 60 * 1000;

// =========================================================
// 响应信封 (Response Envelope)
// =========================================================

/// 分页元数据，列表端点随信封返回
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

/// 统一响应信封：`{ success, message, data, status_code }`
///
/// 仅部分端点使用（SMS / Dashboard / Users 系列）；认证与匹配端点
/// 直接返回裸负载，见 [`protocol::ApiRequest::WRAPPED`]。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

// =========================================================
// 注册阶段 (Registration Stage)
// =========================================================

/// 服务端上报的注册进度
///
/// 前端不推断阶段顺序，只原样反映；路由守卫据此决定
/// 登录后去向（非 `Completed` 一律转注册向导）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStage {
    Activated,
    Initial,
    DetailsPending,
    DescriptionPending,
    Completed,
}

impl Default for RegistrationStage {
    fn default() -> Self {
        RegistrationStage::Initial
    }
}

impl RegistrationStage {
    pub fn is_completed(&self) -> bool {
        matches!(self, RegistrationStage::Completed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStage::Activated => "activated",
            RegistrationStage::Initial => "initial",
            RegistrationStage::DetailsPending => "details_pending",
            RegistrationStage::DescriptionPending => "description_pending",
            RegistrationStage::Completed => "completed",
        }
    }
}

// =========================================================
// 认证领域模型 (Auth Domain Models)
// =========================================================

/// 用户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::User
    }
}

/// 登录会话中的用户档案（/auth 系列端点，camelCase 线格式）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_stage: Option<RegistrationStage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_registration_complete: Option<bool>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl UserProfile {
    /// 登录/刷新后的去向由注册阶段决定
    pub fn registration_completed(&self) -> bool {
        self.registration_stage
            .map(|s| s.is_completed())
            .unwrap_or(false)
    }
}

/// 登录凭据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub identifier: String,
    pub password: String,
}

/// 账号注册凭据（与注册向导的资料收集是两回事）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCredentials {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub age: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

/// 登录 / 注册成功的响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserProfile,
    pub token: String,
    pub refresh_token: String,
}

/// 头像上传成功的响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePictureResponse {
    pub profile_picture: String,
}

/// 注册向导终点提交的响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteRegistrationResponse {
    #[serde(default)]
    pub message: String,
    pub user: UserProfile,
}

/// 用户相册里的一张照片
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPhoto {
    pub id: i64,
    #[serde(default)]
    pub user_id: i64,
    pub photo_url: String,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub upload_order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// 相册端点的响应体：列表、上传、删除、设主图共用此形状
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoInventory {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub photos: Vec<UserPhoto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub total_photos: u32,
}
