//! panic 隔离工具
//!
//! 用户代码（组件初始化、事件处理器）中的 panic 在调用点被捕获，
//! 并转换为普通的错误信息，框架本身从不展开到调用者。

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// 将 panic 负载转换为可读的消息
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// 执行闭包并捕获 panic，panic 时返回其消息
///
/// `AssertUnwindSafe` 意味着 panic 时处于锁中的共享状态可能不一致。
pub fn catch_panic<R>(f: impl FnOnce() -> R) -> Result<R, String> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| panic_message(payload.as_ref()))
}
