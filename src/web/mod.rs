//! 浏览器环境封装
//!
//! History API、存储与定时器的薄封装。守卫规则本身在 `route`，
//! 不碰 DOM，可在原生环境下测试；其余文件只在浏览器里有意义。

pub mod route;
pub mod router;
pub mod storage;
pub mod timer;
