//! SMS 聊天模拟器
//!
//! 把用户输入作为发往短号 `22141` 的入站短信提交给后端，然后轮询
//! 会话列表等自动回复出现——后端没有推送，这里是纯客户端驱动。
//! 发送节流、乐观回显、身份记忆与建立会话流程都在本模块。

use std::time::Duration;

use penzi_shared::dashboard::{Conversation, ConversationList, SmsDirection, SmsMessage};
use penzi_shared::protocol::ProcessIncomingSms;
use penzi_shared::{SMS_SHORTCODE, Timestamp};

use crate::adapter::{ChatProfileStore, CredentialStore};
use crate::api::{HttpTransport, PenziApi};
use crate::error::PenziResult;
use crate::log::log_warn;
use crate::phone;
use crate::poll::{CancelFlag, PollOutcome, PollPolicy, Sleeper, poll_until};

// =========================================================
// 常量
// =========================================================

/// 两次发送之间的最小间隔，快速连点直接拒绝
pub const SEND_MIN_INTERVAL: Duration = Duration::from_secs(2);

/// 发送请求的中断超时（AbortController）
pub const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// 回复探测节奏：首查等 500ms，之后每秒一次，至多 20 次。
/// 与支付核验的 10s×30 刻意不同，按原调用点各自保留。
pub const REPLY_POLL: PollPolicy = PollPolicy {
    initial_delay: Duration::from_millis(500),
    interval: Duration::from_millis(1000),
    max_attempts: 20,
};

/// 建立会话探测节奏：700ms × 10
pub const START_POLL: PollPolicy = PollPolicy::uniform(Duration::from_millis(700), 10);

/// 激活新会话时发送的固定指令
pub const ACTIVATION_MESSAGE: &str = "PENZI";

pub const THROTTLED_MESSAGE: &str = "Please wait a moment before sending another message";
pub const NAME_REQUIRED_MESSAGE: &str = "Please enter your name";
pub const INVALID_PHONE_MESSAGE: &str = "Please enter a valid Kenyan phone number";

// =========================================================
// 会话状态
// =========================================================

/// 模拟器一侧的会话视图：本机身份 + 最近一次拉到的会话快照。
/// 乐观回显只改本地 `messages`，下一次成功轮询整体覆盖。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatSession {
    phone: String,
    user_name: String,
    conversation: Option<Conversation>,
    last_send: Option<Timestamp>,
    processing: bool,
}

impl ChatSession {
    /// 以归一化好的手机号与展示名开始新会话
    pub fn new(phone: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            user_name: user_name.into(),
            ..Self::default()
        }
    }

    /// 从 localStorage 恢复上次的身份；任一键缺失则视为首次使用
    pub fn resume<P: ChatProfileStore>(store: &P) -> Option<Self> {
        let phone = store.phone()?;
        let user_name = store.name()?;
        Some(Self::new(phone, user_name))
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn conversation(&self) -> Option<&Conversation> {
        self.conversation.as_ref()
    }

    pub fn messages(&self) -> &[SmsMessage] {
        self.conversation
            .as_ref()
            .map(|c| c.messages.as_slice())
            .unwrap_or_default()
    }

    /// 回复轮询超限后为真，UI 显示「处理中」指示
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// 服务端口径的消息数，发送前取一次作为回复探测的基线
    pub fn message_count(&self) -> u32 {
        self.conversation.as_ref().map(|c| c.message_count).unwrap_or(0)
    }

    /// 发送节流守卫：距上次发送不足 [`SEND_MIN_INTERVAL`] 直接拒绝，
    /// 通过则记下本次时间
    pub fn try_begin_send(&mut self, now: Timestamp) -> Result<(), &'static str> {
        if let Some(last) = self.last_send {
            if now - last < SEND_MIN_INTERVAL {
                return Err(THROTTLED_MESSAGE);
            }
        }
        self.last_send = Some(now);
        Ok(())
    }

    /// 乐观回显：发送的消息立即挂进本地会话，id 取负数占位，
    /// 下一次成功轮询会整体覆盖
    pub fn echo_outgoing(&mut self, body: &str) {
        let conversation = self.conversation.get_or_insert_with(|| Conversation {
            phone_number: self.phone.clone(),
            user_name: self.user_name.clone(),
            last_message: String::new(),
            last_message_time: None,
            message_count: 0,
            messages: Vec::new(),
        });
        let local_id = -(conversation.messages.len() as i64 + 1);
        conversation.messages.push(SmsMessage {
            id: local_id,
            from_phone: self.phone.clone(),
            to_phone: SMS_SHORTCODE.to_string(),
            message_body: body.to_string(),
            direction: SmsDirection::Incoming,
            message_type: "user".to_string(),
            related_user_id: None,
            user_name: Some(self.user_name.clone()),
            timestamp: None,
        });
        conversation.last_message = body.to_string();
    }

    /// 轮询拉到新快照：整体覆盖，处理中指示复位
    pub fn adopt(&mut self, conversation: Conversation) {
        self.conversation = Some(conversation);
        self.processing = false;
    }

    pub fn mark_processing(&mut self) {
        self.processing = true;
    }
}

// =========================================================
// 编排
// =========================================================

/// 在会话列表里按手机号找本机会话
pub fn find_conversation<'a>(list: &'a ConversationList, phone: &str) -> Option<&'a Conversation> {
    list.conversations.iter().find(|c| c.phone_number == phone)
}

/// 回复探测的最终裁决
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyOutcome {
    /// 后端回了话，携带最新会话快照
    Replied(Conversation),
    /// 次数用尽仍无新消息，转「处理中」指示
    StillProcessing,
    Cancelled,
}

/// 发送一条用户消息并等待后端自动回复
///
/// 发送走带 10 秒中断的变体，失败原样上抛（调用方弹 toast，回显保留）。
/// 发出后按 [`REPLY_POLL`] 探测会话消息数超过 `baseline`；单次探测
/// 失败同样消耗一次尝试，循环继续。
pub async fn send_and_await_reply<C, S, Sl>(
    api: &PenziApi<C, S>,
    sleeper: &Sl,
    cancel: &CancelFlag,
    sender_phone: &str,
    body: &str,
    baseline: u32,
) -> PenziResult<ReplyOutcome>
where
    C: HttpTransport,
    S: CredentialStore,
    Sl: Sleeper,
{
    let sms = ProcessIncomingSms::to_shortcode(sender_phone, body);
    api.process_incoming_sms_with_timeout(&sms, SEND_TIMEOUT)
        .await?;

    let outcome = poll_until(REPLY_POLL, sleeper, cancel, |_| async {
        match api.sms_conversations().await {
            Ok(list) => find_conversation(&list, sender_phone)
                .filter(|c| c.message_count > baseline)
                .cloned(),
            Err(err) => {
                log_warn!("conversation poll attempt failed: {err}");
                None
            }
        }
    })
    .await;

    Ok(match outcome {
        PollOutcome::Found(conversation) => ReplyOutcome::Replied(conversation),
        PollOutcome::Exhausted => ReplyOutcome::StillProcessing,
        PollOutcome::Cancelled => ReplyOutcome::Cancelled,
    })
}

/// 建立会话的结果
#[derive(Debug, Clone, PartialEq)]
pub enum StartOutcome {
    /// 后端已建好会话
    Ready(ChatSession),
    /// 激活指令已发出但会话还没出现，UI 可先进入等待态
    Pending(ChatSession),
    Cancelled,
}

/// 建立新会话：归一化手机号，向短号发 `PENZI` 激活指令，
/// 然后按 [`START_POLL`] 等会话在列表里出现。选定的身份在
/// 指令发出成功后立即写入 localStorage。
pub async fn start_conversation<C, S, Sl, P>(
    api: &PenziApi<C, S>,
    sleeper: &Sl,
    cancel: &CancelFlag,
    profile: &P,
    name: &str,
    raw_phone: &str,
) -> Result<StartOutcome, &'static str>
where
    C: HttpTransport,
    S: CredentialStore,
    Sl: Sleeper,
    P: ChatProfileStore,
{
    let name = name.trim();
    if name.is_empty() {
        return Err(NAME_REQUIRED_MESSAGE);
    }
    let msisdn = phone::normalize(raw_phone);
    if !phone::is_valid_kenyan(&msisdn) {
        return Err(INVALID_PHONE_MESSAGE);
    }

    let activation = ProcessIncomingSms::to_shortcode(&msisdn, ACTIVATION_MESSAGE);
    if let Err(err) = api.process_incoming_sms(&activation).await {
        log_warn!("conversation activation failed: {err}");
        return Err(INVALID_PHONE_MESSAGE);
    }

    profile.set_phone(&msisdn);
    profile.set_name(name);
    let mut session = ChatSession::new(msisdn.clone(), name);

    let outcome = poll_until(START_POLL, sleeper, cancel, |_| async {
        match api.sms_conversations().await {
            Ok(list) => find_conversation(&list, &msisdn).cloned(),
            Err(err) => {
                log_warn!("conversation poll attempt failed: {err}");
                None
            }
        }
    })
    .await;

    Ok(match outcome {
        PollOutcome::Found(conversation) => {
            session.adopt(conversation);
            StartOutcome::Ready(session)
        }
        PollOutcome::Exhausted => {
            session.mark_processing();
            StartOutcome::Pending(session)
        }
        PollOutcome::Cancelled => StartOutcome::Cancelled,
    })
}

#[cfg(test)]
mod tests;
