use std::fmt;

// =========================================================
// 错误状态枚举
// =========================================================

/// 错误状态枚举
/// 对客户端可见的失败做粗分类，供提示与重试策略使用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenziErrorStatus {
    /// 本地表单校验失败，未发起网络请求
    Validation,
    /// 网络层失败（连接不上、fetch 异常）
    Network,
    /// 401：令牌失效或缺失
    Unauthorized,
    /// 404：资源不存在
    NotFound,
    /// 服务端返回的业务错误（4xx/5xx，消息原样展示）
    Api,
    /// JSON 解析或序列化错误
    Serialization,
    /// 轮询或请求超出时限
    Timeout,
    /// 调用方主动取消（组件卸载等）
    Cancelled,
}

impl PenziErrorStatus {
    pub fn error_code(&self) -> &'static str {
        match self {
            PenziErrorStatus::Validation => "VALIDATION_FAILED",
            PenziErrorStatus::Network => "NETWORK_ERROR",
            PenziErrorStatus::Unauthorized => "UNAUTHORIZED",
            PenziErrorStatus::NotFound => "RESOURCE_NOT_FOUND",
            PenziErrorStatus::Api => "API_ERROR",
            PenziErrorStatus::Serialization => "JSON_PARSE_ERROR",
            PenziErrorStatus::Timeout => "TIMEOUT",
            PenziErrorStatus::Cancelled => "CANCELLED",
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 结构化的错误追踪片段
/// 记录错误发生时的操作和相关细节
#[derive(Debug, Clone)]
pub struct ErrorSpan {
    /// 操作名称，如 "auth.login", "payment.verify"
    pub operation: String,
    /// 额外的细节信息，如路径、手机号尾号等
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// 客户端统一错误
///
/// - status: 错误类型/语义
/// - message: 展示给用户的消息（服务端给出的 message 原样保留）
/// - http_status: 服务端响应码（网络层失败时为 None）
/// - spans: 结构化的调用追踪栈
#[derive(Debug)]
pub struct PenziError {
    pub status: PenziErrorStatus,
    pub message: String,
    http_status: Option<u16>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    spans: Vec<ErrorSpan>,
}

impl PenziError {
    pub fn new(status: PenziErrorStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            http_status: None,
            source: None,
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(PenziErrorStatus::Validation, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PenziErrorStatus::Network, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(PenziErrorStatus::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(PenziErrorStatus::NotFound, message)
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self::new(PenziErrorStatus::Api, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(PenziErrorStatus::Serialization, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(PenziErrorStatus::Timeout, message)
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(PenziErrorStatus::Cancelled, message)
    }

    // --- Context builders ---

    /// 添加操作追踪（无额外细节）
    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    /// 添加操作追踪（带额外细节）
    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    /// 记录服务端响应码
    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    /// 设置原始错误源
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // --- Accessors ---

    pub fn error_code(&self) -> &'static str {
        self.status.error_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn http_status(&self) -> Option<u16> {
        self.http_status
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }

    /// 401 判定，刷新重试路径依赖此方法
    pub fn is_unauthorized(&self) -> bool {
        self.status == PenziErrorStatus::Unauthorized || self.http_status == Some(401)
    }
}

// =========================================================
// Display & Error trait 实现
// =========================================================

impl fmt::Display for PenziError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for PenziError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

pub type PenziResult<T> = std::result::Result<T, PenziError>;

// =========================================================
// 类型转换实现
// =========================================================

impl From<serde_json::Error> for PenziError {
    fn from(e: serde_json::Error) -> Self {
        PenziError::serialization(e.to_string()).with_source(e)
    }
}

// gloo 的错误里裹着 JsValue（非 Send），只保留文本
impl From<gloo_net::Error> for PenziError {
    fn from(e: gloo_net::Error) -> Self {
        PenziError::network(e.to_string())
    }
}
