//! 各业务端点的具名方法
//!
//! 与后端路由一一对应，按认证、注册、匹配、管理端、短信分组。
//! 方法只负责组装请求类型并交给客户端核心。

use std::time::Duration;

use serde_json::Value;

use super::client::PenziApi;
use super::transport::{HttpTransport, MultipartPart};
use crate::adapter::CredentialStore;
use crate::error::PenziResult;
use penzi_shared::dashboard::{
    ConversationList, DashboardAnalytics, InterestsPage, MatchesPage, MessagesPage,
    NotificationCount, RecentActivity, UsersPage,
};
use penzi_shared::matching::{
    AdminSetting, CanUndoResponse, CandidateProfile, ChatFee, MpesaSettings,
    PaymentInitiateRequest, PaymentInitiateResponse, PaymentVerifyRequest, PaymentVerifyResponse,
    ProfilesResponse, SwipeOutcome, SwipeRequest, UndoSwipeResponse,
};
use penzi_shared::protocol::{
    AdminSettingsRequest, AnalyticsRequest, CanUndoRequest, ChatFeeRequest,
    ClearConversationRequest, CompleteRegistrationRequest, DashboardConversationsRequest,
    DeletePhotoRequest, DeleteSmsMessageRequest, DeleteUserRequest, DeactivateUserRequest,
    ActivateUserRequest, ForgotPasswordRequest, FacebookAuthRequest, GoogleAuthRequest,
    InterestsQuery, MatchesQuery, MeRequest, MessageResponse, MessagesQuery, MpesaSettingsRequest,
    NotificationCountRequest, PotentialMatchesRequest, ProcessIncomingSms, ProfileUpdate,
    ProfilesRequest, RecentActivityRequest, RegistrationPhotosRequest, ResetPasswordRequest,
    SendAdminMessageRequest, SetPrimaryPhotoRequest, SmsConversationsRequest, UndoSwipeRequest,
    UpdateUserRequest, UserByIdRequest, UserByPhoneRequest, UserStatsRequest,
};
use penzi_shared::user::{User, UserSearchParams, UserStats};
use penzi_shared::{
    AuthResponse, CompleteRegistrationResponse, LoginCredentials, PhotoInventory,
    ProfilePictureResponse, RegisterCredentials, UserProfile,
};

const PROFILE_PICTURE_PATH: &str = "/api/auth/upload-profile-picture";
const PROFILE_PICTURE_FIELD: &str = "profilePicture";
const REGISTRATION_PHOTOS_PATH: &str = "/api/registration/upload-photos";
const REGISTRATION_PHOTOS_FIELD: &str = "photos";

impl<C, S> PenziApi<C, S>
where
    C: HttpTransport,
    S: CredentialStore,
{
    // =========================================================
    // 认证
    // =========================================================

    pub async fn login(&self, credentials: &LoginCredentials) -> PenziResult<AuthResponse> {
        self.execute(credentials).await
    }

    pub async fn register(&self, credentials: &RegisterCredentials) -> PenziResult<AuthResponse> {
        self.execute(credentials).await
    }

    /// 向后端校验当前令牌并取回最新用户资料
    pub async fn current_user(&self) -> PenziResult<UserProfile> {
        self.execute(&MeRequest).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> PenziResult<UserProfile> {
        self.execute(update).await
    }

    pub async fn forgot_password(&self, email: &str) -> PenziResult<MessageResponse> {
        let request = ForgotPasswordRequest {
            email: email.to_string(),
        };
        self.execute(&request).await
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> PenziResult<MessageResponse> {
        let request = ResetPasswordRequest {
            token: token.to_string(),
            password: password.to_string(),
        };
        self.execute(&request).await
    }

    pub async fn google_auth(&self, token: &str) -> PenziResult<AuthResponse> {
        let request = GoogleAuthRequest {
            token: token.to_string(),
        };
        self.execute(&request).await
    }

    pub async fn facebook_auth(&self, token: &str) -> PenziResult<AuthResponse> {
        let request = FacebookAuthRequest {
            token: token.to_string(),
        };
        self.execute(&request).await
    }

    /// 上传头像；字段名由本方法统一设置
    pub async fn upload_profile_picture(
        &self,
        file_name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> PenziResult<ProfilePictureResponse> {
        let part = MultipartPart {
            field_name: PROFILE_PICTURE_FIELD.to_string(),
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            bytes,
        };
        self.send_multipart(PROFILE_PICTURE_PATH, vec![part], false)
            .await
    }

    // =========================================================
    // 注册向导与相册
    // =========================================================

    pub async fn complete_registration(
        &self,
        request: &CompleteRegistrationRequest,
    ) -> PenziResult<CompleteRegistrationResponse> {
        self.execute(request).await
    }

    /// 批量上传相册照片；字段名由本方法统一设置
    pub async fn upload_registration_photos(
        &self,
        photos: Vec<MultipartPart>,
    ) -> PenziResult<PhotoInventory> {
        let parts = photos
            .into_iter()
            .map(|mut part| {
                part.field_name = REGISTRATION_PHOTOS_FIELD.to_string();
                part
            })
            .collect();
        self.send_multipart(REGISTRATION_PHOTOS_PATH, parts, false)
            .await
    }

    pub async fn registration_photos(&self) -> PenziResult<PhotoInventory> {
        self.execute(&RegistrationPhotosRequest).await
    }

    pub async fn delete_photo(&self, id: i64) -> PenziResult<PhotoInventory> {
        self.execute(&DeletePhotoRequest { id }).await
    }

    pub async fn set_primary_photo(&self, id: i64) -> PenziResult<PhotoInventory> {
        self.execute(&SetPrimaryPhotoRequest { id }).await
    }

    // =========================================================
    // 匹配与支付
    // =========================================================

    /// 滑动候选队列
    pub async fn swipe_profiles(&self, include_swiped: bool) -> PenziResult<ProfilesResponse> {
        self.execute(&ProfilesRequest { include_swiped }).await
    }

    pub async fn potential_matches(&self) -> PenziResult<Vec<CandidateProfile>> {
        self.execute(&PotentialMatchesRequest).await
    }

    pub async fn swipe(&self, request: &SwipeRequest) -> PenziResult<SwipeOutcome> {
        self.execute(request).await
    }

    pub async fn can_undo(&self) -> PenziResult<CanUndoResponse> {
        self.execute(&CanUndoRequest).await
    }

    pub async fn undo_swipe(&self) -> PenziResult<UndoSwipeResponse> {
        self.execute(&UndoSwipeRequest).await
    }

    /// 发起 STK push 扣费
    pub async fn initiate_payment(
        &self,
        request: &PaymentInitiateRequest,
    ) -> PenziResult<PaymentInitiateResponse> {
        self.execute(request).await
    }

    pub async fn verify_payment(
        &self,
        request: &PaymentVerifyRequest,
    ) -> PenziResult<PaymentVerifyResponse> {
        self.execute(request).await
    }

    // =========================================================
    // 管理端配置
    // =========================================================

    pub async fn admin_settings(&self) -> PenziResult<Vec<AdminSetting>> {
        self.execute(&AdminSettingsRequest).await
    }

    pub async fn chat_fee(&self) -> PenziResult<ChatFee> {
        self.execute(&ChatFeeRequest).await
    }

    pub async fn set_chat_fee(&self, chat_fee: u32) -> PenziResult<MessageResponse> {
        self.execute(&ChatFee { chat_fee }).await
    }

    pub async fn mpesa_settings(&self) -> PenziResult<MpesaSettings> {
        self.execute(&MpesaSettingsRequest).await
    }

    pub async fn set_mpesa_settings(&self, settings: &MpesaSettings) -> PenziResult<MessageResponse> {
        self.execute(settings).await
    }

    // =========================================================
    // 用户管理
    // =========================================================

    pub async fn user_stats(&self) -> PenziResult<UserStats> {
        self.execute(&UserStatsRequest).await
    }

    pub async fn user_by_id(&self, id: i64) -> PenziResult<User> {
        self.execute(&UserByIdRequest { id }).await
    }

    pub async fn user_by_phone(&self, phone_number: &str) -> PenziResult<User> {
        let request = UserByPhoneRequest {
            phone_number: phone_number.to_string(),
        };
        self.execute(&request).await
    }

    pub async fn update_user(&self, request: &UpdateUserRequest) -> PenziResult<User> {
        self.execute(request).await
    }

    pub async fn activate_user(&self, id: i64) -> PenziResult<Value> {
        self.execute(&ActivateUserRequest { id }).await
    }

    pub async fn deactivate_user(&self, id: i64) -> PenziResult<Value> {
        self.execute(&DeactivateUserRequest { id }).await
    }

    pub async fn delete_user(&self, id: i64) -> PenziResult<Value> {
        self.execute(&DeleteUserRequest { id }).await
    }

    // =========================================================
    // 管理面板
    // =========================================================

    pub async fn dashboard_users(&self, params: &UserSearchParams) -> PenziResult<UsersPage> {
        self.execute(params).await
    }

    pub async fn dashboard_analytics(&self) -> PenziResult<DashboardAnalytics> {
        self.execute(&AnalyticsRequest).await
    }

    pub async fn dashboard_matches(&self, query: &MatchesQuery) -> PenziResult<MatchesPage> {
        self.execute(query).await
    }

    pub async fn dashboard_interests(&self, query: &InterestsQuery) -> PenziResult<InterestsPage> {
        self.execute(query).await
    }

    pub async fn dashboard_messages(&self, query: &MessagesQuery) -> PenziResult<MessagesPage> {
        self.execute(query).await
    }

    pub async fn dashboard_conversations(&self) -> PenziResult<ConversationList> {
        self.execute(&DashboardConversationsRequest).await
    }

    /// 管理员以短号身份给用户发话
    pub async fn send_admin_message(&self, to_phone: &str, message: &str) -> PenziResult<Value> {
        let request = SendAdminMessageRequest {
            to_phone: to_phone.to_string(),
            message: message.to_string(),
        };
        self.execute(&request).await
    }

    pub async fn recent_activity(&self) -> PenziResult<RecentActivity> {
        self.execute(&RecentActivityRequest).await
    }

    pub async fn notification_count(&self) -> PenziResult<NotificationCount> {
        self.execute(&NotificationCountRequest).await
    }

    // =========================================================
    // 短信模拟器
    // =========================================================

    pub async fn sms_conversations(&self) -> PenziResult<ConversationList> {
        self.execute(&SmsConversationsRequest).await
    }

    pub async fn process_incoming_sms(&self, sms: &ProcessIncomingSms) -> PenziResult<Value> {
        self.execute(sms).await
    }

    /// 发送用户消息走带超时的变体，避免卡死发送按钮
    pub async fn process_incoming_sms_with_timeout(
        &self,
        sms: &ProcessIncomingSms,
        timeout: Duration,
    ) -> PenziResult<Value> {
        self.execute_with_timeout(sms, timeout).await
    }

    pub async fn delete_sms_message(&self, id: i64) -> PenziResult<Value> {
        self.execute(&DeleteSmsMessageRequest { id }).await
    }

    pub async fn clear_sms_conversation(&self, phone: &str) -> PenziResult<Value> {
        let request = ClearConversationRequest {
            phone: phone.to_string(),
        };
        self.execute(&request).await
    }
}
