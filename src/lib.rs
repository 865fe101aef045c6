//! Penzi 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `session` / `auth`: 登录态的纯 reducer 与信号封装
//! - `api`: 类型化后端客户端（传输 / 核心 / 端点三层）
//! - `registration` / `matching` / `payment` / `chat`: 各业务流程的状态机
//! - `app`: 管理面板状态容器
//! - `web::route` / `web::router`: 路由定义与路由服务
//!
//! 决策逻辑全部放在可原生测试的纯结构里，信号只做薄壳。

pub mod adapter;
pub mod api;
pub mod app;
pub mod auth;
pub mod chat;
pub mod error;
pub(crate) mod log;
pub mod matching;
pub mod payment;
pub mod phone;
pub mod poll;
pub mod registration;
pub mod session;
pub mod web;

use std::sync::Arc;

use leptos::prelude::*;

use crate::api::Api;
use crate::app::AppContext;
use crate::auth::{AuthContext, init_auth};
use crate::web::route::AppRoute;
use crate::web::router::{Router, RouterOutlet};
use crate::web::storage::LocalStorage;
use penzi_shared::KEY_BACKEND_URL;

/// 未配置时的后端地址
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// 后端基地址：localStorage 里配置过就用配置值，否则用编译期默认
pub fn resolve_backend_url() -> String {
    LocalStorage::get(KEY_BACKEND_URL)
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
}

/// 路由匹配函数
///
/// 页面组件不在本 crate 范围内，这里只给每个路由一个挂载点；
/// 下游把各自的页面树挂到对应节点上。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <main data-page="login"></main> }.into_any(),
        AppRoute::Register => view! { <main data-page="register"></main> }.into_any(),
        AppRoute::Registration => view! { <main data-page="registration"></main> }.into_any(),
        AppRoute::Matches => view! { <main data-page="matches"></main> }.into_any(),
        AppRoute::Dashboard => view! { <main data-page="dashboard"></main> }.into_any(),
        AppRoute::ChatSimulator => view! { <main data-page="chat-simulator"></main> }.into_any(),
        AppRoute::NotFound => view! {
            <main data-page="not-found">
                <h1>"404"</h1>
                <p>"Page not found"</p>
            </main>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. API 客户端：基地址来自配置，整棵组件树共享一个实例
    let api = Arc::new(Api::browser(resolve_backend_url()));
    provide_context(api.clone());

    // 2. 认证上下文，后台恢复上次会话
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);
    init_auth(auth_ctx, api);

    // 3. 面板上下文
    provide_context(AppContext::new());

    // 4. 路由器：注入认证与注册阶段信号实现守卫
    let is_authenticated = auth_ctx.is_authenticated_signal();
    let registration_completed = auth_ctx.registration_completed_signal();
    let auth_pending = auth_ctx.auth_pending_signal();

    view! {
        <Router is_authenticated registration_completed auth_pending>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
