//! 平台适配层
//!
//! 把会话逻辑依赖的浏览器资源（Cookie、LocalStorage、跳转）抽象为
//! trait，浏览器实现走 `web` 模块，测试用内存桩替换。

use penzi_shared::{
    Timestamp, UserProfile, COOKIE_REFRESH_TOKEN, COOKIE_TOKEN, KEY_CHAT_NAME, KEY_CHAT_PHONE,
    KEY_LAST_AUTH_CHECK, KEY_USER, REFRESH_TOKEN_TTL_DAYS, TOKEN_TTL_DAYS,
};

use crate::log::log_error;
use crate::web::storage::{CookieJar, LocalStorage};

// ============================================================================
// 凭据存取
// ============================================================================

/// 会话令牌的存取适配器
///
/// 访问令牌与刷新令牌均放 Cookie，寿命分别为 7 天与 30 天。
pub trait CredentialStore {
    /// 当前访问令牌
    fn token(&self) -> Option<String>;

    /// 当前刷新令牌
    fn refresh_token(&self) -> Option<String>;

    /// 仅更新访问令牌（刷新成功后）
    fn store_token(&self, token: &str);

    /// 登录成功后写入整套令牌
    fn store_session(&self, token: &str, refresh_token: &str);

    /// 清除全部令牌
    fn clear(&self);

    /// 刷新失败后的兜底：清场并把用户送回登录页
    fn handle_session_expiry(&self);
}

/// 浏览器 Cookie 实现
#[derive(Clone, Copy, Default)]
pub struct BrowserCredentials;

impl CredentialStore for BrowserCredentials {
    fn token(&self) -> Option<String> {
        CookieJar::get(COOKIE_TOKEN)
    }

    fn refresh_token(&self) -> Option<String> {
        CookieJar::get(COOKIE_REFRESH_TOKEN)
    }

    fn store_token(&self, token: &str) {
        CookieJar::set_for_days(COOKIE_TOKEN, token, TOKEN_TTL_DAYS);
    }

    fn store_session(&self, token: &str, refresh_token: &str) {
        CookieJar::set_for_days(COOKIE_TOKEN, token, TOKEN_TTL_DAYS);
        CookieJar::set_for_days(COOKIE_REFRESH_TOKEN, refresh_token, REFRESH_TOKEN_TTL_DAYS);
    }

    fn clear(&self) {
        CookieJar::delete(COOKIE_TOKEN);
        CookieJar::delete(COOKIE_REFRESH_TOKEN);
        LocalStorage::delete(KEY_USER);
        LocalStorage::delete(KEY_LAST_AUTH_CHECK);
    }

    fn handle_session_expiry(&self) {
        log_error!("session expired, returning to login");
        self.clear();
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href("/login");
        }
    }
}

// ============================================================================
// 会话快照缓存
// ============================================================================

/// 用户快照与鉴权校验时间的缓存适配器
///
/// 快照允许页面刷新后立即渲染，后台再向 `/auth/me` 校验。
pub trait SessionCache {
    /// 读取缓存的用户快照
    fn load_user(&self) -> Option<UserProfile>;

    /// 写入用户快照
    fn save_user(&self, user: &UserProfile);

    /// 清除用户快照
    fn clear_user(&self);

    /// 上次成功校验的时间
    fn last_auth_check(&self) -> Option<Timestamp>;

    /// 记录本次校验时间
    fn set_last_auth_check(&self, at: Timestamp);
}

/// 浏览器 LocalStorage 实现
#[derive(Clone, Copy, Default)]
pub struct BrowserSessionCache;

impl SessionCache for BrowserSessionCache {
    fn load_user(&self) -> Option<UserProfile> {
        let raw = LocalStorage::get(KEY_USER)?;
        serde_json::from_str(&raw).ok()
    }

    fn save_user(&self, user: &UserProfile) {
        if let Ok(json) = serde_json::to_string(user) {
            LocalStorage::set(KEY_USER, &json);
        }
    }

    fn clear_user(&self) {
        LocalStorage::delete(KEY_USER);
        LocalStorage::delete(KEY_LAST_AUTH_CHECK);
    }

    fn last_auth_check(&self) -> Option<Timestamp> {
        let raw = LocalStorage::get(KEY_LAST_AUTH_CHECK)?;
        raw.parse::<i64>().ok().map(Timestamp::new)
    }

    fn set_last_auth_check(&self, at: Timestamp) {
        LocalStorage::set(KEY_LAST_AUTH_CHECK, &at.as_millis().to_string());
    }
}

// ============================================================================
// 短信模拟器的本机身份
// ============================================================================

/// 聊天模拟器记住的手机号与姓名
pub trait ChatProfileStore {
    fn phone(&self) -> Option<String>;
    fn set_phone(&self, phone: &str);
    fn name(&self) -> Option<String>;
    fn set_name(&self, name: &str);
}

/// 浏览器 LocalStorage 实现
#[derive(Clone, Copy, Default)]
pub struct BrowserChatProfile;

impl ChatProfileStore for BrowserChatProfile {
    fn phone(&self) -> Option<String> {
        LocalStorage::get(KEY_CHAT_PHONE).filter(|p| !p.is_empty())
    }

    fn set_phone(&self, phone: &str) {
        LocalStorage::set(KEY_CHAT_PHONE, phone);
    }

    fn name(&self) -> Option<String> {
        LocalStorage::get(KEY_CHAT_NAME).filter(|n| !n.is_empty())
    }

    fn set_name(&self, name: &str) {
        LocalStorage::set(KEY_CHAT_NAME, name);
    }
}

// ============================================================================
// 测试桩
// ============================================================================
