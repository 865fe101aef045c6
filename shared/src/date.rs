//! 时间类型模块
//!
//! 提供 `Timestamp`：可序列化的毫秒时间戳，用于传输、存储和新鲜度判断。
//! 当前时间由运行环境注入（浏览器层通过 `js_sys::Date::now` 提供），
//! 因此本模块不依赖任何平台时钟，纯逻辑可直接在原生测试中使用。

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};
use std::time::Duration;

// =========================================================
// Timestamp - 可传输的时间戳类型
// =========================================================

/// 毫秒时间戳，用于序列化传输和存储
///
/// 内部存储为 `i64`，表示自 Unix 纪元以来的毫秒数
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// 创建新的时间戳
    #[inline]
    pub const fn new(ms: i64) -> Self {
        Self(ms)
    }

    /// 获取毫秒值
    #[inline]
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// 获取秒值
    #[inline]
    pub const fn as_secs(&self) -> i64 {
        self.0 / 1000
    }

    /// 从 ISO 8601 / RFC 3339 字符串解析
    ///
    /// 后端返回的时间串有两种形态：带时区偏移的 RFC 3339，
    /// 以及 Flask `isoformat()` 产出的无时区朴素时间（按 UTC 处理）。
    /// 解析失败返回 `None`。
    pub fn parse(s: &str) -> Option<Self> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self(dt.timestamp_millis()));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(Self(naive.and_utc().timestamp_millis()));
        }
        None
    }

    /// 距另一时间点是否已超过给定时长
    #[inline]
    pub fn elapsed_since(&self, earlier: Timestamp) -> Duration {
        *self - earlier
    }
}

impl From<i64> for Timestamp {
    fn from(ms: i64) -> Self {
        Self(ms)
    }
}

impl From<Timestamp> for i64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl Add<Duration> for Timestamp {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self(self.0 + rhs.as_millis() as i64)
    }
}

impl Sub<Duration> for Timestamp {
    type Output = Self;

    fn sub(self, rhs: Duration) -> Self::Output {
        Self(self.0 - rhs.as_millis() as i64)
    }
}

impl Sub<Timestamp> for Timestamp {
    type Output = Duration;

    /// 计算两个时间戳之间的差值（返回 Duration，负差取零）
    fn sub(self, rhs: Timestamp) -> Self::Output {
        let diff_ms = (self.0 - rhs.0).max(0);
        Duration::from_millis(diff_ms as u64)
    }
}
