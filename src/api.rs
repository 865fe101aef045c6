//! 后端 API 访问层
//!
//! 分三层：`transport` 负责把请求真正发出去（浏览器 fetch / 测试桩），
//! `client` 负责鉴权头、信封解码与 401 刷新重放，`endpoints` 给每个
//! 后端路由一个具名方法。

mod client;
mod endpoints;
mod transport;

pub use client::{Api, PenziApi};
pub use transport::{
    FetchTransport, HttpBody, HttpRequest, HttpResponse, HttpTransport, MultipartPart,
};

#[cfg(test)]
pub use transport::MockTransport;
