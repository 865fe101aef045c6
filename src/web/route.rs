//! 路由定义 - 领域模型
//!
//! 纯业务层，不依赖 DOM 或 web_sys。守卫规则集中在 [`AppRoute::guard`]：
//! 受保护页面要求已登录，登录后的去向由注册阶段决定——阶段未完成
//! 一律转注册向导，这是唯一会用到 `registration_stage` 的地方。

use std::fmt::Display;

/// 应用路由
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页（默认路由）
    #[default]
    Login,
    /// 账号注册页
    Register,
    /// 注册向导（需认证）
    Registration,
    /// 滑动匹配（需认证 + 注册完成）
    Matches,
    /// 管理面板（需认证）
    Dashboard,
    /// SMS 聊天模拟器（测试便利页，匿名可用）
    ChatSimulator,
    /// 页面未找到
    NotFound,
}

/// 守卫裁决
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guarded {
    Allow,
    Redirect(AppRoute),
}

impl AppRoute {
    /// URL path 解析为路由
    pub fn from_path(path: &str) -> Self {
        match path {
            "/" | "/login" => Self::Login,
            "/register" => Self::Register,
            "/registration" => Self::Registration,
            "/matches" => Self::Matches,
            "/dashboard" => Self::Dashboard,
            "/chat-simulator" => Self::ChatSimulator,
            _ => Self::NotFound,
        }
    }

    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Registration => "/registration",
            Self::Matches => "/matches",
            Self::Dashboard => "/dashboard",
            Self::ChatSimulator => "/chat-simulator",
            Self::NotFound => "/404",
        }
    }

    /// 该路由是否要求已登录
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Registration | Self::Matches | Self::Dashboard)
    }

    /// 已登录用户是否应离开此路由（登录/注册页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// 该路由是否要求注册向导已走完
    pub fn requires_completed_registration(&self) -> bool {
        matches!(self, Self::Matches)
    }

    /// 登录成功后的去向：阶段未完成先去注册向导
    pub fn post_login(registration_completed: bool) -> Self {
        if registration_completed {
            Self::Matches
        } else {
            Self::Registration
        }
    }

    /// 认证失败的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 集中守卫：按认证与注册阶段裁决去留
    pub fn guard(&self, is_authenticated: bool, registration_completed: bool) -> Guarded {
        if self.requires_auth() && !is_authenticated {
            return Guarded::Redirect(Self::auth_failure_redirect());
        }
        if self.should_redirect_when_authenticated() && is_authenticated {
            return Guarded::Redirect(Self::post_login(registration_completed));
        }
        if self.requires_completed_registration() && !registration_completed {
            return Guarded::Redirect(Self::Registration);
        }
        Guarded::Allow
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}
