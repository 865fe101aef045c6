//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，所有对 window.history 的操作都集中
//! 在此模块。守卫判定交给 [`AppRoute::guard`]：认证信号与注册阶段
//! 信号由外部注入，路由系统与认证系统解耦。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{AppRoute, Guarded};
use crate::log::log_info;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 认证状态检查（注入的信号）
    is_authenticated: Signal<bool>,
    /// 注册阶段检查（注入的信号）
    registration_completed: Signal<bool>,
    /// 启动校验是否还在进行
    auth_pending: Signal<bool>,
}

impl RouterService {
    fn new(
        is_authenticated: Signal<bool>,
        registration_completed: Signal<bool>,
        auth_pending: Signal<bool>,
    ) -> Self {
        // 初始路由从 URL 解析
        let path = current_path();
        let initial_route = AppRoute::from_path(&path);
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            is_authenticated,
            registration_completed,
            auth_pending,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 按当前认证与注册阶段对目标路由做守卫裁决
    fn resolve(&self, target_route: AppRoute) -> AppRoute {
        let is_auth = self.is_authenticated.get_untracked();
        let completed = self.registration_completed.get_untracked();
        match target_route.guard(is_auth, completed) {
            Guarded::Allow => target_route,
            Guarded::Redirect(redirect) => {
                log_info!("[Router] {target_route} guarded, redirecting to {redirect}");
                redirect
            }
        }
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载
    pub fn navigate(&self, path: &str) {
        self.navigate_to(AppRoute::from_path(path));
    }

    pub fn navigate_to(&self, target_route: AppRoute) {
        let resolved = self.resolve(target_route);
        push_history_state(resolved.to_path());
        self.set_route.set(resolved);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let service = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target_route = AppRoute::from_path(&current_path());
            let resolved = service.resolve(target_route);
            // popstate 时守卫改道要改写 History，不能再 push
            if resolved != target_route {
                replace_history_state(resolved.to_path());
            }
            set_route.set(resolved);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 认证状态变化时的自动重定向
    ///
    /// 登录后离开登录/注册页，登出后离开受保护页面；去向同样
    /// 经守卫裁决，注册未完成的新会话落到注册向导。
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let is_authenticated = self.is_authenticated;
        let auth_pending = self.auth_pending;
        let service = *self;

        Effect::new(move |_| {
            // 订阅认证信号，变化即重新裁决当前路由。
            // 启动校验未落地前不动，避免把深链接弹去登录页。
            let _ = is_authenticated.get();
            if auth_pending.get() {
                return;
            }
            let route = current_route.get_untracked();

            let resolved = service.resolve(route);
            if resolved != route {
                push_history_state(resolved.to_path());
                set_route.set(resolved);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(
    is_authenticated: Signal<bool>,
    registration_completed: Signal<bool>,
    auth_pending: Signal<bool>,
) -> RouterService {
    let router = RouterService::new(is_authenticated, registration_completed, auth_pending);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

/// 导航函数（返回一个可调用的闭包）
#[allow(dead_code)]
pub fn use_navigate() -> impl Fn(&str) + Clone {
    let router = use_router();
    move |to: &str| {
        router.navigate(to);
    }
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 认证状态信号
    is_authenticated: Signal<bool>,
    /// 注册阶段信号
    registration_completed: Signal<bool>,
    /// 启动校验信号
    auth_pending: Signal<bool>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(is_authenticated, registration_completed, auth_pending);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}
