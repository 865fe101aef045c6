//! M-Pesa 连接费支付流程
//!
//! like 的前置闸门：发起 STK push，然后客户端轮询核验直到到账。
//! [`PaymentFlow`] 是纯归约器（信号壳只存它、渲染它），网络编排在
//! 本模块的自由函数里，轮询走 [`crate::poll`] 的可取消原语。

use std::cell::Cell;
use std::time::Duration;

use penzi_shared::matching::{PaymentInitiateRequest, PaymentInitiateResponse, PaymentVerifyRequest};

use crate::adapter::CredentialStore;
use crate::api::{HttpTransport, PenziApi};
use crate::error::PenziError;
use crate::log::log_warn;
use crate::phone;
use crate::poll::{CancelFlag, PollOutcome, PollPolicy, Sleeper, poll_until};

// =========================================================
// 常量
// =========================================================

/// 管理端取不到聊天费时的兜底值（KES）
pub const DEFAULT_CHAT_FEE: u32 = 50;

/// 核验节奏：每 10 秒一次、共 30 次（约 5 分钟），首查不等待
pub const VERIFY_POLL: PollPolicy = PollPolicy {
    initial_delay: Duration::ZERO,
    interval: Duration::from_secs(10),
    max_attempts: 30,
};

pub const EMPTY_PHONE_MESSAGE: &str = "Please enter your phone number";
pub const INITIATION_FAILED_MESSAGE: &str = "Payment initiation failed";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";
pub const VERIFY_TIMEOUT_MESSAGE: &str = "Payment verification timeout. Please contact support.";
pub const VERIFY_FAILED_MESSAGE: &str = "Payment verification failed. Please contact support.";
pub const MANUAL_VERIFY_FALLBACK: &str = "Payment verification failed";
pub const MANUAL_VERIFY_ERROR: &str = "Verification failed. Please try again.";

// =========================================================
// 纯状态归约器
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentPhase {
    Idle,
    Processing,
    Success,
    Failed,
}

/// 支付弹窗的全部可见状态。手动核验失败只写 `error`，
/// 不改相位——后台轮询还在继续。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentFlow {
    status: PaymentPhase,
    transaction_id: String,
    checkout_request_id: String,
    error: Option<String>,
}

impl Default for PaymentFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentFlow {
    pub fn new() -> Self {
        Self {
            status: PaymentPhase::Idle,
            transaction_id: String::new(),
            checkout_request_id: String::new(),
            error: None,
        }
    }

    pub fn status(&self) -> PaymentPhase {
        self.status
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    pub fn checkout_request_id(&self) -> &str {
        &self.checkout_request_id
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// 弹窗打开或「Try Again」：回到初始态
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// 发起请求前置为处理中
    pub fn begin(&mut self) {
        self.status = PaymentPhase::Processing;
        self.error = None;
    }

    /// STK push 已发出，记录回执号
    pub fn stk_sent(&mut self, receipt: &PaymentInitiateResponse) {
        self.transaction_id = receipt.transaction_id.clone();
        self.checkout_request_id = receipt.checkout_request_id.clone();
    }

    pub fn confirmed(&mut self) {
        self.status = PaymentPhase::Success;
        self.error = None;
    }

    pub fn declined(&mut self, message: impl Into<String>) {
        self.status = PaymentPhase::Failed;
        self.error = Some(message.into());
    }

    /// 相位不变，只更新内联错误文案
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }
}

// =========================================================
// 编排
// =========================================================

/// 核验轮询的最终裁决
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentVerdict {
    Confirmed,
    /// 次数用尽，后端始终答「未到账」
    TimedOut,
    /// 次数用尽，最后一次是请求失败
    Unverifiable,
    Cancelled,
}

impl PaymentVerdict {
    /// 失败裁决对应的用户文案
    pub fn failure_message(&self) -> Option<&'static str> {
        match self {
            PaymentVerdict::TimedOut => Some(VERIFY_TIMEOUT_MESSAGE),
            PaymentVerdict::Unverifiable => Some(VERIFY_FAILED_MESSAGE),
            PaymentVerdict::Confirmed | PaymentVerdict::Cancelled => None,
        }
    }
}

/// 归一化 M-Pesa 手机号；空输入留在 idle 态内联报错
pub fn prepare_phone(raw: &str) -> Result<String, &'static str> {
    if raw.trim().is_empty() {
        return Err(EMPTY_PHONE_MESSAGE);
    }
    Ok(phone::normalize(raw))
}

// 服务端有话就原样转述，纯网络故障给通用文案
fn surface_message(err: &PenziError, fallback: &'static str) -> String {
    match err.http_status() {
        Some(_) => err.message().to_string(),
        None => fallback.to_string(),
    }
}

fn non_empty_or(message: String, fallback: &'static str) -> String {
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

/// 发起 STK push。`phone_number` 需已归一化（见 [`prepare_phone`]）。
pub async fn initiate<C, S>(
    api: &PenziApi<C, S>,
    target_user_id: &str,
    phone_number: &str,
    amount: u32,
) -> Result<PaymentInitiateResponse, String>
where
    C: HttpTransport,
    S: CredentialStore,
{
    let request = PaymentInitiateRequest {
        target_user_id: target_user_id.to_string(),
        phone_number: phone_number.to_string(),
        amount,
    };
    match api.initiate_payment(&request).await {
        Ok(receipt) if receipt.success => Ok(receipt),
        Ok(receipt) => Err(non_empty_or(receipt.message, INITIATION_FAILED_MESSAGE)),
        Err(err) => Err(surface_message(&err, NETWORK_ERROR_MESSAGE)),
    }
}

/// 轮询核验直到到账、取消或次数用尽。请求失败与「未到账」
/// 同样消耗一次尝试，但决定超限后的文案。
pub async fn poll_verification<C, S, Sl>(
    api: &PenziApi<C, S>,
    sleeper: &Sl,
    cancel: &CancelFlag,
    transaction_id: &str,
    target_user_id: &str,
) -> PaymentVerdict
where
    C: HttpTransport,
    S: CredentialStore,
    Sl: Sleeper,
{
    let last_errored = Cell::new(false);
    let outcome = poll_until(VERIFY_POLL, sleeper, cancel, |_| {
        let request = PaymentVerifyRequest {
            transaction_id: transaction_id.to_string(),
            target_user_id: target_user_id.to_string(),
        };
        let last_errored = &last_errored;
        async move {
            match api.verify_payment(&request).await {
                Ok(result) if result.success => Some(()),
                Ok(_) => {
                    last_errored.set(false);
                    None
                }
                Err(err) => {
                    log_warn!("payment verify attempt failed: {err}");
                    last_errored.set(true);
                    None
                }
            }
        }
    })
    .await;

    match outcome {
        PollOutcome::Found(()) => PaymentVerdict::Confirmed,
        PollOutcome::Cancelled => PaymentVerdict::Cancelled,
        PollOutcome::Exhausted => {
            if last_errored.get() {
                PaymentVerdict::Unverifiable
            } else {
                PaymentVerdict::TimedOut
            }
        }
    }
}

/// 「I have completed payment」按钮：立刻核验一次
pub async fn verify_once<C, S>(
    api: &PenziApi<C, S>,
    transaction_id: &str,
    target_user_id: &str,
) -> Result<(), String>
where
    C: HttpTransport,
    S: CredentialStore,
{
    let request = PaymentVerifyRequest {
        transaction_id: transaction_id.to_string(),
        target_user_id: target_user_id.to_string(),
    };
    match api.verify_payment(&request).await {
        Ok(result) if result.success => Ok(()),
        Ok(result) => Err(non_empty_or(result.message, MANUAL_VERIFY_FALLBACK)),
        Err(err) => Err(surface_message(&err, MANUAL_VERIFY_ERROR)),
    }
}

/// 连接费以管理端配置为准，取不到就用默认值
pub async fn load_chat_fee<C, S>(api: &PenziApi<C, S>) -> u32
where
    C: HttpTransport,
    S: CredentialStore,
{
    match api.chat_fee().await {
        Ok(fee) => fee.chat_fee,
        Err(err) => {
            log_warn!("chat fee fetch failed, using default: {err}");
            DEFAULT_CHAT_FEE
        }
    }
}

#[cfg(test)]
mod tests;
