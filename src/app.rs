//! 管理面板状态容器
//!
//! 原产品 AppContext 的 reducer 等价物：一个纯状态结构加同步转移方法，
//! 信号壳只负责存它、渲染它。列表 setter 同时清掉对应的加载标志；
//! 过滤条件为部分合并语义。未读计数由 30 秒定时器驱动，仅在
//! 通知页不在前台时累积。

use penzi_shared::dashboard::{
    Conversation, ConversationList, DashboardAnalytics, Interest, InterestsPage, MatchSummary,
    MatchesPage, MessagesPage, PageInfo, SmsMessage, UsersPage,
};
use std::sync::Arc;

use leptos::prelude::*;

use penzi_shared::protocol::{InterestsQuery, MatchesQuery, MessagesQuery};
use penzi_shared::user::{User, UserSearchParams, UserStats};

use crate::adapter::CredentialStore;
use crate::api::{Api, HttpTransport, PenziApi};
use crate::log::log_warn;
use crate::web::timer::Interval;

/// 通知轮询间隔（毫秒）
pub const NOTIFICATION_TICK_MS: u32 = 30_000;

// =========================================================
// 页签
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardTab {
    #[default]
    Overview,
    Users,
    Matches,
    Interests,
    Messages,
    Conversations,
    Notifications,
    Settings,
}

// =========================================================
// 状态与转移
// =========================================================

/// 面板全量状态。所有字段都是服务端数据的本地影子，
/// 「服务端最后一次写入为准」——乐观更新会被下一次刷新覆盖。
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub loading: bool,
    pub error: Option<String>,

    pub users: Vec<User>,
    pub users_pagination: PageInfo,
    pub user_stats: Option<UserStats>,
    pub current_user: Option<User>,

    pub analytics: Option<DashboardAnalytics>,

    pub matches: Vec<MatchSummary>,
    pub matches_loading: bool,
    pub matches_pagination: PageInfo,

    pub interests: Vec<Interest>,
    pub interests_loading: bool,
    pub interests_pagination: PageInfo,

    pub messages: Vec<SmsMessage>,
    pub messages_loading: bool,
    pub messages_pagination: PageInfo,

    pub conversations: Vec<Conversation>,
    pub conversations_loading: bool,

    pub active_tab: DashboardTab,
    pub sidebar_open: bool,
    pub unread_notifications: u32,

    pub user_filters: UserSearchParams,
    pub match_filters: MatchesQuery,
    pub interest_filters: InterestsQuery,
    pub message_filters: MessagesQuery,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    // --- 全局标志 ---

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.loading = false;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    // --- 列表 setter：写入数据的同时清掉加载标志 ---

    pub fn set_users(&mut self, page: UsersPage) {
        self.users = page.users;
        self.users_pagination = page.pagination;
        self.loading = false;
    }

    pub fn set_user_stats(&mut self, stats: UserStats) {
        self.user_stats = Some(stats);
    }

    pub fn set_current_user(&mut self, user: Option<User>) {
        self.current_user = user;
    }

    pub fn set_analytics(&mut self, analytics: DashboardAnalytics) {
        self.analytics = Some(analytics);
    }

    pub fn set_matches(&mut self, page: MatchesPage) {
        self.matches = page.matches;
        self.matches_pagination = page.pagination;
        self.matches_loading = false;
    }

    pub fn set_interests(&mut self, page: InterestsPage) {
        self.interests = page.interests;
        self.interests_pagination = page.pagination;
        self.interests_loading = false;
    }

    pub fn set_messages(&mut self, page: MessagesPage) {
        self.messages = page.messages;
        self.messages_pagination = page.pagination;
        self.messages_loading = false;
    }

    pub fn set_conversations(&mut self, list: ConversationList) {
        self.conversations = list.conversations;
        self.conversations_loading = false;
    }

    // --- 行级更新 ---

    /// 就地改写用户行；`current_user` 指向同一行时同步更新
    pub fn update_user(&mut self, user: User) {
        if let Some(row) = self.users.iter_mut().find(|u| u.id == user.id) {
            *row = user.clone();
        }
        if self
            .current_user
            .as_ref()
            .is_some_and(|current| current.id == user.id)
        {
            self.current_user = Some(user);
        }
    }

    /// 删除用户行；`current_user` 指向被删行时一并清空
    pub fn delete_user(&mut self, id: i64) {
        self.users.retain(|u| u.id != id);
        if self
            .current_user
            .as_ref()
            .is_some_and(|current| current.id == id)
        {
            self.current_user = None;
        }
    }

    /// 新消息前插消息列表，并追加进手机号匹配的会话
    pub fn add_message(&mut self, message: SmsMessage) {
        if let Some(conversation) = self.conversations.iter_mut().find(|c| {
            c.phone_number == message.from_phone || c.phone_number == message.to_phone
        }) {
            conversation.last_message = message.message_body.clone();
            conversation.last_message_time = message.timestamp.clone();
            conversation.message_count += 1;
            conversation.messages.push(message.clone());
        }
        self.messages.insert(0, message);
    }

    // --- UI 状态 ---

    /// 切页签；进入通知页即视为已读
    pub fn set_active_tab(&mut self, tab: DashboardTab) {
        self.active_tab = tab;
        if tab == DashboardTab::Notifications {
            self.unread_notifications = 0;
        }
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    /// 定时器回报的通知总数；通知页在前台时不累积
    pub fn bump_notifications(&mut self, total: u32) {
        if self.active_tab != DashboardTab::Notifications {
            self.unread_notifications = total;
        }
    }

    // --- 过滤条件：部分合并，改条件即回到第一页 ---

    pub fn update_user_filters(&mut self, patch: impl FnOnce(&mut UserSearchParams)) {
        patch(&mut self.user_filters);
        self.loading = true;
    }

    pub fn update_match_filters(&mut self, patch: impl FnOnce(&mut MatchesQuery)) {
        patch(&mut self.match_filters);
        self.matches_loading = true;
    }

    pub fn update_interest_filters(&mut self, patch: impl FnOnce(&mut InterestsQuery)) {
        patch(&mut self.interest_filters);
        self.interests_loading = true;
    }

    pub fn update_message_filters(&mut self, patch: impl FnOnce(&mut MessagesQuery)) {
        patch(&mut self.message_filters);
        self.messages_loading = true;
    }
}

// =========================================================
// 信号壳
// =========================================================

/// 面板上下文
///
/// 全量状态放单个信号，组件只读切片、写入走转移方法。
#[derive(Clone, Copy)]
pub struct AppContext {
    pub state: RwSignal<DashboardState>,
}

impl AppContext {
    pub fn new() -> Self {
        Self {
            state: RwSignal::new(DashboardState::new()),
        }
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取面板上下文
pub fn use_app() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}

/// 启动 30 秒通知定时器；返回的句柄随持有组件 drop 自动停表
pub fn start_notification_tick(ctx: AppContext, api: Arc<Api>) -> Interval {
    Interval::new(NOTIFICATION_TICK_MS, move || {
        let api = api.clone();
        leptos::task::spawn_local(async move {
            if let Some(total) = poll_notifications(&*api).await {
                ctx.state.update(|state| state.bump_notifications(total));
            }
        });
    })
}

// =========================================================
// 后端编排
// =========================================================

/// 定时通知检查：取总数交给 [`DashboardState::bump_notifications`]，
/// 失败只记日志，下一个周期再试
pub async fn poll_notifications<C, S>(api: &PenziApi<C, S>) -> Option<u32>
where
    C: HttpTransport,
    S: CredentialStore,
{
    match api.notification_count().await {
        Ok(count) => Some(count.total_count),
        Err(err) => {
            log_warn!("notification check failed: {err}");
            None
        }
    }
}
