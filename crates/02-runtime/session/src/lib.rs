//! # Boot Session
//!
//! 会话负责组件的完整生命周期：
//!
//! 1. 初始化阶段注册组件工厂
//! 2. 启动时创建全部组件并解析依赖和配置
//! 3. 启动所有进程组件，激活事件总线
//! 4. 等待关闭请求（`shutdown()`、Ctrl-C 或 SIGTERM），或所有进程结束
//! 5. 按初始化的逆序停止进程
//!
//! 事件总线和运行时标志作为默认组件注册，其他组件可以通过 `wire` 注入它们。

pub mod errors;
pub mod logging;
pub mod phase;
pub mod process;
pub mod runtime;
pub mod session;
pub mod testing;

pub use errors::*;
pub use logging::{init_logging, LoggingConfig};
pub use phase::Phase;
pub use process::ProcessManager;
pub use runtime::{Flag, Runtime};
pub use session::Session;
