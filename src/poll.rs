//! 有界可取消轮询
//!
//! 支付核验、聊天回复探测、会话建立探测共用同一个轮询原语；
//! 各调用点的节奏差异（10s×30 / 500ms 起步×20 / 700ms×10）只体现在
//! [`PollPolicy`] 常量上。取消标志随组件生命周期丢弃时自动置位，
//! 轮询循环在下一次醒来时退出，不会在页面离开后继续跑。

use async_trait::async_trait;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

// =========================================================
// 轮询参数
// =========================================================

/// 一次有界轮询的节奏
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// 第一次探测前的等待
    pub initial_delay: Duration,
    /// 之后每次探测的间隔
    pub interval: Duration,
    /// 探测次数上限
    pub max_attempts: u32,
}

impl PollPolicy {
    pub const fn uniform(interval: Duration, max_attempts: u32) -> Self {
        Self {
            initial_delay: interval,
            interval,
            max_attempts,
        }
    }
}

/// 轮询结束的三种方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome<T> {
    /// 谓词在限内命中
    Found(T),
    /// 次数用尽
    Exhausted,
    /// 取消标志被置位
    Cancelled,
}

impl<T> PollOutcome<T> {
    pub fn found(self) -> Option<T> {
        match self {
            PollOutcome::Found(v) => Some(v),
            _ => None,
        }
    }
}

// =========================================================
// 取消标志
// =========================================================

/// 共享取消标志；clone 出的副本指向同一个标志位
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Rc<Cell<bool>>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }

    /// Drop 即取消的守卫；挂到组件 cleanup 上保证离开页面后轮询停止
    pub fn guard(&self) -> CancelGuard {
        CancelGuard(self.clone())
    }
}

pub struct CancelGuard(CancelFlag);

impl Drop for CancelGuard {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

// =========================================================
// Sleeper 适配器
// =========================================================

/// 睡眠以适配器注入，测试里立即返回
#[async_trait(?Send)]
pub trait Sleeper {
    async fn sleep(&self, duration: Duration);
}

/// 浏览器实现：setTimeout 包装的 future
pub struct BrowserSleeper;

#[async_trait(?Send)]
impl Sleeper for BrowserSleeper {
    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::TimeoutFuture::new(duration.as_millis() as u32).await;
    }
}

// =========================================================
// 轮询循环
// =========================================================

/// 按 `policy` 的节奏反复执行 `check`，直到命中、取消或次数用尽
///
/// 每轮先睡后查；取消在醒来后立刻生效。`check` 返回 `None` 表示
/// 本轮未命中（包括请求失败——失败同样消耗一次尝试，循环继续）。
pub async fn poll_until<S, F, Fut, T>(
    policy: PollPolicy,
    sleeper: &S,
    cancel: &CancelFlag,
    mut check: F,
) -> PollOutcome<T>
where
    S: Sleeper,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Option<T>>,
{
    for attempt in 0..policy.max_attempts {
        let wait = if attempt == 0 {
            policy.initial_delay
        } else {
            policy.interval
        };
        sleeper.sleep(wait).await;

        if cancel.is_cancelled() {
            return PollOutcome::Cancelled;
        }
        if let Some(value) = check(attempt).await {
            return PollOutcome::Found(value);
        }
        if cancel.is_cancelled() {
            return PollOutcome::Cancelled;
        }
    }
    PollOutcome::Exhausted
}

// =========================================================
// 测试支撑与用例
// =========================================================
