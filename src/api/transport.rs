//! HTTP 传输抽象层
//!
//! 把「发一个请求、拿回状态码和正文」抽象成 trait：浏览器实现走
//! `gloo_net`（fetch），测试用 Mock 替换。上传接口需要 multipart
//! 表单，聊天接口需要可中断的超时，都在这一层解决。

use std::collections::HashMap;
use std::time::Duration;

use gloo_net::http::Request;
use serde::de::DeserializeOwned;

use crate::error::{PenziError, PenziResult};
use penzi_shared::protocol::HttpMethod;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::VecDeque;

// =========================================================
// 核心抽象层
// =========================================================

/// multipart 表单中的一个文件段
#[derive(Clone)]
pub struct MultipartPart {
    pub field_name: String,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// 请求体
#[derive(Clone)]
pub enum HttpBody {
    Empty,
    /// 序列化好的 JSON 文本
    Json(String),
    /// multipart/form-data，边界由浏览器生成
    Multipart(Vec<MultipartPart>),
}

// 增加 Clone 以支持 401 刷新后的重放
#[derive(Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: HttpBody,
    /// 超时后通过 AbortController 中断请求
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: HttpBody::Empty,
            timeout: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_json(mut self, body: serde_json::Value) -> Self {
        self.body = HttpBody::Json(body.to_string());
        self
    }

    pub fn with_multipart(mut self, parts: Vec<MultipartPart>) -> Self {
        self.body = HttpBody::Multipart(parts);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> PenziResult<T> {
        serde_json::from_str(&self.body).map_err(PenziError::from)
    }
}

#[async_trait::async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, req: HttpRequest) -> PenziResult<HttpResponse>;
}

// =========================================================
// 实现层: 浏览器 fetch 客户端
// =========================================================

#[derive(Clone, Copy, Default)]
pub struct FetchTransport;

#[async_trait::async_trait(?Send)]
impl HttpTransport for FetchTransport {
    async fn send(&self, req: HttpRequest) -> PenziResult<HttpResponse> {
        let mut builder = match req.method {
            HttpMethod::Get => Request::get(&req.url),
            HttpMethod::Post => Request::post(&req.url),
            HttpMethod::Put => Request::put(&req.url),
            HttpMethod::Delete => Request::delete(&req.url),
            HttpMethod::Patch => Request::patch(&req.url),
        };

        for (key, value) in &req.headers {
            builder = builder.header(key, value);
        }

        // 带超时的请求挂上 AbortSignal，定时器触发即中断 fetch。
        // 定时器句柄在响应返回前保持存活，Drop 时自动取消。
        let controller = web_sys::AbortController::new().ok();
        let signal = controller.as_ref().map(|c| c.signal());
        let _abort_timer = match (req.timeout, &controller) {
            (Some(timeout), Some(controller)) => {
                builder = builder.abort_signal(signal.as_ref());
                let controller = controller.clone();
                Some(gloo_timers::callback::Timeout::new(
                    timeout.as_millis() as u32,
                    move || controller.abort(),
                ))
            }
            _ => None,
        };

        let request = match req.body {
            HttpBody::Empty => builder.build().map_err(PenziError::from)?,
            HttpBody::Json(json) => builder
                .header("Content-Type", "application/json")
                .body(json)
                .map_err(PenziError::from)?,
            // multipart 不手工设置 Content-Type，浏览器负责生成边界
            HttpBody::Multipart(parts) => builder
                .body(build_form_data(&parts)?)
                .map_err(PenziError::from)?,
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                if let Some(controller) = &controller {
                    if controller.signal().aborted() {
                        return Err(PenziError::timeout("request aborted after timeout"));
                    }
                }
                return Err(PenziError::from(err));
            }
        };

        let status = response.status();
        let body = response.text().await.map_err(PenziError::from)?;
        Ok(HttpResponse { status, body })
    }
}

fn build_form_data(parts: &[MultipartPart]) -> PenziResult<web_sys::FormData> {
    let form = web_sys::FormData::new().map_err(|_| PenziError::network("FormData unavailable"))?;
    for part in parts {
        let bytes = js_sys::Uint8Array::from(part.bytes.as_slice());
        let sequence = js_sys::Array::of1(&bytes);
        let options = web_sys::BlobPropertyBag::new();
        options.set_type(&part.mime_type);
        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&sequence, &options)
            .map_err(|_| PenziError::network("failed to build upload blob"))?;
        form.append_with_blob_and_filename(&part.field_name, &blob, &part.file_name)
            .map_err(|_| PenziError::network("failed to append upload part"))?;
    }
    Ok(form)
}

// =========================================================
// 测试工具: MockTransport
// =========================================================

#[cfg(test)]
pub struct MockTransport {
    // URL -> 响应队列，依次弹出，最后一个保持不动
    responses: RefCell<HashMap<String, VecDeque<(u16, String)>>>,
    // 记录发出的请求
    pub requests: RefCell<Vec<HttpRequest>>,
}

#[cfg(test)]
impl MockTransport {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn mock_response(&self, url: &str, status: u16, body: serde_json::Value) {
        self.responses
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push_back((status, body.to_string()));
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.url == url)
            .count()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpTransport for MockTransport {
    async fn send(&self, req: HttpRequest) -> PenziResult<HttpResponse> {
        self.requests.borrow_mut().push(req.clone());

        let mut responses = self.responses.borrow_mut();
        if let Some(queue) = responses.get_mut(&req.url) {
            let entry = if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            };
            if let Some((status, body)) = entry {
                return Ok(HttpResponse { status, body });
            }
        }
        Ok(HttpResponse {
            status: 404,
            body: "Not Found".to_string(),
        })
    }
}
