//! 浏览器存储封装模块
//!
//! 使用 `web_sys::Storage` 与 `document.cookie` 提供简洁的持久化接口。
//! 会话令牌放 Cookie（带 max-age），用户快照与杂项放 LocalStorage。

use wasm_bindgen::JsCast;

/// 本地存储操作封装
///
/// 提供静态方法访问浏览器 LocalStorage API。
pub struct LocalStorage;

impl LocalStorage {
    /// 获取 LocalStorage 实例
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// 获取存储的字符串值
    ///
    /// # 返回
    /// - `Some(String)` 如果键存在且有值
    /// - `None` 如果键不存在或发生错误
    pub fn get(key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    /// 设置存储值
    ///
    /// # 返回
    /// - `true` 如果操作成功
    pub fn set(key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    /// 删除存储的键值对
    pub fn delete(key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

/// Cookie 操作封装
///
/// 令牌类凭据走 Cookie，与后端约定一致：
/// `token` 7 天、`refreshToken` 30 天，过期由 max-age 控制。
pub struct CookieJar;

impl CookieJar {
    fn html_document() -> Option<web_sys::HtmlDocument> {
        web_sys::window()?.document()?.dyn_into().ok()
    }

    /// 读取指定名称的 Cookie 值
    pub fn get(name: &str) -> Option<String> {
        let raw = Self::html_document()?.cookie().ok()?;
        for pair in raw.split(';') {
            let pair = pair.trim();
            if let Some(value) = pair.strip_prefix(name) {
                if let Some(value) = value.strip_prefix('=') {
                    return Some(value.to_string());
                }
            }
        }
        None
    }

    /// 写入 Cookie，寿命以天计
    pub fn set_for_days(name: &str, value: &str, days: u32) -> bool {
        let cookie = format!(
            "{}={}; path=/; max-age={}; samesite=lax",
            name,
            value,
            days as u64 * 86_400
        );
        Self::html_document()
            .and_then(|d| d.set_cookie(&cookie).ok())
            .is_some()
    }

    /// 删除 Cookie（max-age 置零）
    pub fn delete(name: &str) -> bool {
        let cookie = format!("{}=; path=/; max-age=0", name);
        Self::html_document()
            .and_then(|d| d.set_cookie(&cookie).ok())
            .is_some()
    }
}
