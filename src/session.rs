//! 会话状态机
//!
//! 登录态的纯 reducer 与启动校验决策，不碰浏览器资源，方便直接
//! 在原生环境下测试。信号封装与副作用见 `auth` 模块。

use penzi_shared::protocol::ProfileUpdate;
use penzi_shared::{AUTH_CACHE_TTL_MS, Timestamp, UserProfile};

/// 登录态
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<UserProfile>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl AuthState {
    /// 应用启动时的初始态：未认证，等待首次校验
    pub fn booting() -> Self {
        Self {
            is_loading: true,
            ..Self::default()
        }
    }
}

/// 会话动作
#[derive(Debug, Clone)]
pub enum AuthAction {
    SetLoading(bool),
    SetUser(Box<UserProfile>),
    SetError(String),
    ClearError,
    Logout,
    UpdateUser(Box<ProfileUpdate>),
}

/// 纯 reducer：旧状态 + 动作 -> 新状态
pub fn reduce(mut state: AuthState, action: AuthAction) -> AuthState {
    match action {
        AuthAction::SetLoading(loading) => {
            state.is_loading = loading;
        }
        AuthAction::SetUser(user) => {
            state.user = Some(*user);
            state.is_authenticated = true;
            state.is_loading = false;
            state.error = None;
        }
        AuthAction::SetError(message) => {
            state.error = Some(message);
            state.is_loading = false;
        }
        AuthAction::ClearError => {
            state.error = None;
        }
        AuthAction::Logout => {
            state.user = None;
            state.is_authenticated = false;
            state.is_loading = false;
            state.error = None;
        }
        AuthAction::UpdateUser(update) => {
            state.user = state.user.map(|user| apply_profile_update(user, &update));
        }
    }
    state
}

/// 把档案编辑的局部字段合并进用户资料
pub fn apply_profile_update(mut user: UserProfile, update: &ProfileUpdate) -> UserProfile {
    if let Some(first_name) = &update.first_name {
        user.first_name = first_name.clone();
    }
    if let Some(last_name) = &update.last_name {
        user.last_name = last_name.clone();
    }
    if let Some(age) = update.age {
        user.age = Some(age);
    }
    if let Some(bio) = &update.bio {
        user.bio = Some(bio.clone());
    }
    if let Some(interests) = &update.interests {
        user.interests = Some(interests.clone());
    }
    if let Some(location) = &update.location {
        user.location = Some(location.clone());
    }
    if let Some(profile_picture) = &update.profile_picture {
        user.profile_picture = Some(profile_picture.clone());
    }
    user
}

/// 启动校验的决策结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheDecision {
    /// 没有令牌，结束加载态即可
    NoToken,
    /// 缓存够新，直接采用，省一次 /api/auth/me
    UseCached(Box<UserProfile>),
    /// 缓存过期或缺失，需要向后端校验
    Revalidate,
}

/// 判定启动时如何恢复会话。缓存寿命五分钟，严格小于才算新鲜。
pub fn plan_auth_check(
    has_token: bool,
    cached_user: Option<UserProfile>,
    last_check: Option<Timestamp>,
    now: Timestamp,
) -> CacheDecision {
    if !has_token {
        return CacheDecision::NoToken;
    }
    if let (Some(user), Some(checked_at)) = (cached_user, last_check) {
        if now.as_millis() - checked_at.as_millis() < AUTH_CACHE_TTL_MS {
            return CacheDecision::UseCached(Box::new(user));
        }
    }
    CacheDecision::Revalidate
}
