//! 条件编译日志宏
//!
//! wasm32 下走 `web_sys::console`，原生（测试）环境走标准输出，
//! 核心逻辑在浏览器与测试里打同样的日志。

#[cfg(target_arch = "wasm32")]
macro_rules! log_info {
    ($($t:tt)*) => (web_sys::console::log_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_info {
    ($($t:tt)*) => (println!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_warn {
    ($($t:tt)*) => (web_sys::console::warn_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_warn {
    ($($t:tt)*) => (eprintln!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_error {
    ($($t:tt)*) => (web_sys::console::error_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_error {
    ($($t:tt)*) => (eprintln!($($t)*))
}

pub(crate) use {log_error, log_info, log_warn};
