//! API 客户端核心
//!
//! 统一处理基地址拼接、Bearer 注入、信封/裸响应解码、错误正文提取，
//! 以及 401 时的「刷新一次并重放」。各端点的具名方法见 `endpoints`。

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::transport::{FetchTransport, HttpRequest, HttpResponse, HttpTransport, MultipartPart};
use crate::adapter::{BrowserCredentials, CredentialStore};
use crate::error::{PenziError, PenziResult};
use crate::log::{log_info, log_warn};
use penzi_shared::protocol::{ApiRequest, HttpMethod, RefreshTokenRequest};
use penzi_shared::ApiEnvelope;

/// 刷新尝试的结果；没有刷新令牌时不做任何清理，原错误照常上抛
enum RefreshOutcome {
    Refreshed,
    NoToken,
    Failed,
}

// =========================================================
// 客户端核心 - 可测试版本
// =========================================================

/// 可测试的 API 客户端
/// C: HttpTransport
/// S: CredentialStore
pub struct PenziApi<C, S> {
    base_url: String,
    pub(crate) transport: C,
    pub(crate) credentials: S,
}

/// 浏览器环境的具体类型
pub type Api = PenziApi<FetchTransport, BrowserCredentials>;

impl Api {
    /// 以浏览器适配器构建客户端
    pub fn browser(base_url: String) -> Self {
        Self::new(base_url, FetchTransport, BrowserCredentials)
    }
}

impl<C, S> PenziApi<C, S>
where
    C: HttpTransport,
    S: CredentialStore,
{
    pub fn new(base_url: String, transport: C, credentials: S) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
            credentials,
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 发送请求并解码响应；401 时刷新令牌并重放一次
    pub async fn execute<R: ApiRequest>(&self, request: &R) -> PenziResult<R::Response> {
        self.execute_inner(request, None).await
    }

    /// 同 [`execute`](Self::execute)，但超时后中断请求
    pub async fn execute_with_timeout<R: ApiRequest>(
        &self,
        request: &R,
        timeout: Duration,
    ) -> PenziResult<R::Response> {
        self.execute_inner(request, Some(timeout)).await
    }

    async fn execute_inner<R: ApiRequest>(
        &self,
        request: &R,
        timeout: Option<Duration>,
    ) -> PenziResult<R::Response> {
        let first = self.send_once(request, timeout).await;
        match first {
            // 刷新端点自身的 401 不再重试，避免自我递归
            Err(err) if err.is_unauthorized() && R::PATH != RefreshTokenRequest::PATH => {
                match self.try_refresh().await {
                    RefreshOutcome::Refreshed => self.send_once(request, timeout).await,
                    RefreshOutcome::NoToken | RefreshOutcome::Failed => Err(err),
                }
            }
            other => other,
        }
    }

    /// multipart 上传，同样带 Bearer 与 401 刷新重放
    pub(super) async fn send_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        parts: Vec<MultipartPart>,
        wrapped: bool,
    ) -> PenziResult<T> {
        let first = self.multipart_once(path, parts.clone(), wrapped).await;
        match first {
            Err(err) if err.is_unauthorized() => match self.try_refresh().await {
                RefreshOutcome::Refreshed => self.multipart_once(path, parts, wrapped).await,
                RefreshOutcome::NoToken | RefreshOutcome::Failed => Err(err),
            },
            other => other,
        }
    }

    // --- 单次发送（无重试） ---

    async fn send_once<R: ApiRequest>(
        &self,
        request: &R,
        timeout: Option<Duration>,
    ) -> PenziResult<R::Response> {
        let path = request.path();
        let mut http = HttpRequest::new(&self.url(&path), R::METHOD);
        if let Some(token) = self.credentials.token() {
            http = http.with_header("Authorization", &format!("Bearer {token}"));
        }
        // GET 的参数全部走查询串，不发请求体
        if !matches!(R::METHOD, HttpMethod::Get) {
            let body = serde_json::to_value(request)
                .map_err(|e| PenziError::from(e).in_op_with("encode_request", &path))?;
            http = http.with_json(body);
        }
        if let Some(timeout) = timeout {
            http = http.with_timeout(timeout);
        }

        let response = self.transport.send(http).await?;
        Self::decode_body(&path, &response, R::WRAPPED)
    }

    async fn multipart_once<T: DeserializeOwned>(
        &self,
        path: &str,
        parts: Vec<MultipartPart>,
        wrapped: bool,
    ) -> PenziResult<T> {
        let mut http = HttpRequest::new(&self.url(path), HttpMethod::Post).with_multipart(parts);
        if let Some(token) = self.credentials.token() {
            http = http.with_header("Authorization", &format!("Bearer {token}"));
        }
        let response = self.transport.send(http).await?;
        Self::decode_body(path, &response, wrapped)
    }

    // --- 解码 ---

    fn decode_body<T: DeserializeOwned>(
        path: &str,
        response: &HttpResponse,
        wrapped: bool,
    ) -> PenziResult<T> {
        if !response.is_success() {
            return Err(Self::error_from_response(path, response));
        }
        if !wrapped {
            return response.json().map_err(|e| e.in_op_with("decode_response", path));
        }

        let envelope: ApiEnvelope<T> = response
            .json()
            .map_err(|e| e.in_op_with("decode_envelope", path))?;
        if !envelope.success {
            let message = if envelope.message.is_empty() {
                format!("Request failed: {path}")
            } else {
                envelope.message
            };
            return Err(PenziError::api(message).with_http_status(response.status));
        }
        match envelope.data {
            Some(data) => Ok(data),
            // 成功但无 data 的信封（删除类端点），Response 选 Value 时这里补 null
            None => serde_json::from_value(Value::Null)
                .map_err(|e| PenziError::from(e).in_op_with("missing_data", path)),
        }
    }

    /// 从错误正文提取人类可读信息：`{message}` 或 `{error}`，否则报状态码
    fn error_from_response(path: &str, response: &HttpResponse) -> PenziError {
        let message = serde_json::from_str::<Value>(&response.body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .or_else(|| v.get("error"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("Request failed with status {}", response.status));
        let err = match response.status {
            401 => PenziError::unauthorized(message),
            404 => PenziError::not_found(message),
            _ => PenziError::api(message),
        };
        err.with_http_status(response.status)
            .in_op_with("api_request", path)
    }

    // --- 令牌刷新 ---

    /// 用刷新令牌换新的访问令牌；刷新请求本身失败才清场并送回登录页
    async fn try_refresh(&self) -> RefreshOutcome {
        let Some(refresh_token) = self.credentials.refresh_token() else {
            return RefreshOutcome::NoToken;
        };

        let request = RefreshTokenRequest { refresh_token };
        match self.send_once(&request, None).await {
            Ok(response) => {
                self.credentials.store_token(&response.token);
                log_info!("access token refreshed");
                RefreshOutcome::Refreshed
            }
            Err(err) => {
                log_warn!("token refresh failed: {err}");
                self.credentials.handle_session_expiry();
                RefreshOutcome::Failed
            }
        }
    }
}
