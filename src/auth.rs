//! 认证模块
//!
//! 会话状态的信号封装与副作用编排。纯转移逻辑在 `session` 模块；
//! 这里负责把 reducer 挂进 Leptos 信号、驱动启动校验与登录登出，
//! 路由服务通过注入的认证信号做重定向，不在本模块手动导航。

use std::sync::Arc;

use leptos::prelude::*;

use crate::adapter::{BrowserSessionCache, CredentialStore, SessionCache};
use crate::api::{Api, HttpTransport, PenziApi};
use crate::error::PenziResult;
use crate::log::log_warn;
use crate::session::{AuthAction, AuthState, CacheDecision, plan_auth_check, reduce};
use crate::web::route::AppRoute;
use penzi_shared::protocol::ProfileUpdate;
use penzi_shared::{LoginCredentials, RegisterCredentials, Timestamp, UserProfile};

/// 当前时刻（毫秒）
pub(crate) fn now() -> Timestamp {
    #[cfg(target_arch = "wasm32")]
    {
        Timestamp::new(js_sys::Date::now() as i64)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let millis = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);
        Timestamp::new(millis)
    }
}

// =========================================================
// 信号封装
// =========================================================

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。写入一律走
/// [`AuthContext::dispatch`]，保证状态只经 reducer 变化。
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub state: ReadSignal<AuthState>,
    set_state: WriteSignal<AuthState>,
}

impl AuthContext {
    /// 创建新的认证上下文，初始为启动加载态
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthState::booting());
        Self { state, set_state }
    }

    /// 经 reducer 应用一个动作
    pub fn dispatch(&self, action: AuthAction) {
        self.set_state
            .update(|state| *state = reduce(std::mem::take(state), action));
    }

    /// 认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().is_authenticated)
    }

    /// 启动校验是否还在进行（路由守卫据此按兵不动）
    pub fn auth_pending_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().is_loading)
    }

    /// 注册阶段是否走完（用于路由守卫注入）
    pub fn registration_completed_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || {
            state
                .get()
                .user
                .map(|user| user.registration_completed())
                .unwrap_or(false)
        })
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

// =========================================================
// 编排 - 可测试版本
// =========================================================

/// 登录：换取令牌、落盘快照、记录校验时间
pub async fn perform_login<C, S, Cache>(
    api: &PenziApi<C, S>,
    cache: &Cache,
    credentials: &LoginCredentials,
    now: Timestamp,
) -> PenziResult<UserProfile>
where
    C: HttpTransport,
    S: CredentialStore,
    Cache: SessionCache,
{
    let response = api.login(credentials).await?;
    api.credentials
        .store_session(&response.token, &response.refresh_token);
    cache.save_user(&response.user);
    cache.set_last_auth_check(now);
    Ok(response.user)
}

/// 账号注册：成功即视同登录
pub async fn perform_register<C, S, Cache>(
    api: &PenziApi<C, S>,
    cache: &Cache,
    credentials: &RegisterCredentials,
    now: Timestamp,
) -> PenziResult<UserProfile>
where
    C: HttpTransport,
    S: CredentialStore,
    Cache: SessionCache,
{
    let response = api.register(credentials).await?;
    api.credentials
        .store_session(&response.token, &response.refresh_token);
    cache.save_user(&response.user);
    cache.set_last_auth_check(now);
    Ok(response.user)
}

/// 启动时恢复会话
///
/// 快照足够新（五分钟内校验过）就直接采用，省掉一次 `/api/auth/me`；
/// 否则向后端校验，校验失败清掉凭据、回到未登录。
pub async fn restore_session<C, S, Cache>(
    api: &PenziApi<C, S>,
    cache: &Cache,
    now: Timestamp,
) -> Option<UserProfile>
where
    C: HttpTransport,
    S: CredentialStore,
    Cache: SessionCache,
{
    let decision = plan_auth_check(
        api.credentials.token().is_some(),
        cache.load_user(),
        cache.last_auth_check(),
        now,
    );
    match decision {
        CacheDecision::NoToken => None,
        CacheDecision::UseCached(user) => Some(*user),
        CacheDecision::Revalidate => match api.current_user().await {
            Ok(user) => {
                cache.save_user(&user);
                cache.set_last_auth_check(now);
                Some(user)
            }
            Err(err) => {
                log_warn!("session validation failed: {err}");
                api.credentials.clear();
                cache.clear_user();
                None
            }
        },
    }
}

/// 注销：清掉令牌与快照。导航由路由服务监听认证信号自动处理。
pub fn perform_logout<C, S, Cache>(api: &PenziApi<C, S>, cache: &Cache)
where
    C: HttpTransport,
    S: CredentialStore,
    Cache: SessionCache,
{
    api.credentials.clear();
    cache.clear_user();
}

// =========================================================
// 信号壳 - 浏览器环境
// =========================================================

/// 初始化认证状态：后台恢复会话，结束加载态
pub fn init_auth(ctx: AuthContext, api: Arc<Api>) {
    leptos::task::spawn_local(async move {
        match restore_session(&*api, &BrowserSessionCache, now()).await {
            Some(user) => ctx.dispatch(AuthAction::SetUser(Box::new(user))),
            None => ctx.dispatch(AuthAction::SetLoading(false)),
        }
    });
}

/// 登录；成功时返回按注册阶段决定的去向，失败时错误进状态
pub async fn login(
    ctx: AuthContext,
    api: Arc<Api>,
    identifier: String,
    password: String,
) -> Option<AppRoute> {
    ctx.dispatch(AuthAction::SetLoading(true));
    let credentials = LoginCredentials {
        identifier,
        password,
    };
    match perform_login(&*api, &BrowserSessionCache, &credentials, now()).await {
        Ok(user) => {
            let destination = AppRoute::post_login(user.registration_completed());
            ctx.dispatch(AuthAction::SetUser(Box::new(user)));
            Some(destination)
        }
        Err(err) => {
            ctx.dispatch(AuthAction::SetError(err.message().to_string()));
            None
        }
    }
}

/// 账号注册；新账号注册阶段必然未完成，去向总是注册向导
pub async fn register(
    ctx: AuthContext,
    api: Arc<Api>,
    credentials: RegisterCredentials,
) -> Option<AppRoute> {
    ctx.dispatch(AuthAction::SetLoading(true));
    match perform_register(&*api, &BrowserSessionCache, &credentials, now()).await {
        Ok(user) => {
            let destination = AppRoute::post_login(user.registration_completed());
            ctx.dispatch(AuthAction::SetUser(Box::new(user)));
            Some(destination)
        }
        Err(err) => {
            ctx.dispatch(AuthAction::SetError(err.message().to_string()));
            None
        }
    }
}

/// 注销并清除状态
pub fn logout(ctx: AuthContext, api: &Api) {
    perform_logout(api, &BrowserSessionCache);
    ctx.dispatch(AuthAction::Logout);
}

/// 档案编辑保存成功后：合并进状态并刷新本地快照
pub fn apply_profile_update(ctx: AuthContext, update: ProfileUpdate) {
    ctx.dispatch(AuthAction::UpdateUser(Box::new(update)));
    if let Some(user) = ctx.state.get_untracked().user {
        BrowserSessionCache.save_user(&user);
    }
}
