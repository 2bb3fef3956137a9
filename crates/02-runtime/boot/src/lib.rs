//! # Boot
//!
//! 轻量的组件组合框架：组件以工厂的形式注册，启动时按标签注入依赖和配置，
//! 实现了 [`Process`] 的组件在后台运行，组件之间通过 [`EventBus`] 通信。
//!
//! ## 使用示例
//!
//! ```no_run
//! use boot::{BoxError, Component, Injectable};
//! use std::sync::Arc;
//!
//! #[derive(Default, Injectable)]
//! struct Greeter {
//!     #[boot("config,key:GREETING,default:hello")]
//!     greeting: String,
//! }
//!
//! impl Component for Greeter {}
//!
//! #[derive(Default, Injectable)]
//! struct App {
//!     #[boot("wire")]
//!     greeter: Option<Arc<Greeter>>,
//! }
//!
//! impl Component for App {
//!     fn init(&mut self) -> Result<(), BoxError> {
//!         let greeter = self.greeter.as_ref().ok_or("greeter not wired")?;
//!         println!("{} world", greeter.greeting);
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), boot::SessionError> {
//!     boot::register(Greeter::default)?;
//!     boot::register(App::default)?;
//!     boot::run().await
//! }
//! ```

use once_cell::sync::Lazy;

pub use async_trait::async_trait;
pub use boot_common::{
    catch_panic, full_name, panic_message, parse_tag, split, BoxError, Component,
    ComponentState, ConfigError, DependencyError, DependencyResult, Process, Tag, TagOption,
    TagParseError, TypeInfo, DEFAULT_NAME,
};
pub use boot_config::{
    CommandLineConfigProvider, CompositeConfigProvider, ConfigProvider, ConfigValue,
    EnvironmentConfigProvider, MemoryConfigProvider,
};
pub use boot_di::{
    ComponentEntry, ComponentRegistry, Exports, FieldInfo, FieldKind, Fields, Injectable,
    ResolveContext,
};
pub use boot_eventbus::{
    EventBus, EventBusError, FailedEvent, Handler, HandlerError, HandlerFailure, PublishError,
};
pub use boot_macros::Injectable;
pub use boot_session::{
    init_logging, testing, Flag, LoggingConfig, Phase, ProcessManager, Runtime, Session,
    SessionError, SessionResult,
};

static SESSION: Lazy<Session> = Lazy::new(Session::new);

/// 进程级默认会话
pub fn session() -> &'static Session {
    &SESSION
}

/// 在默认会话中以默认名称注册组件工厂
pub fn register<T, F>(factory: F) -> SessionResult<()>
where
    T: Injectable,
    F: FnOnce() -> T + Send + 'static,
{
    SESSION.register(factory)
}

/// 在默认会话中以指定名称注册组件工厂
pub fn register_name<T, F>(name: &str, factory: F) -> SessionResult<()>
where
    T: Injectable,
    F: FnOnce() -> T + Send + 'static,
{
    SESSION.register_name(name, factory)
}

/// 在默认会话中覆盖同类型的默认注册
pub fn override_component<T, F>(factory: F) -> SessionResult<()>
where
    T: Injectable,
    F: FnOnce() -> T + Send + 'static,
{
    SESSION.override_component(factory)
}

/// 在默认会话中覆盖同类型同名称的注册
pub fn override_name<T, F>(name: &str, factory: F) -> SessionResult<()>
where
    T: Injectable,
    F: FnOnce() -> T + Send + 'static,
{
    SESSION.override_name(name, factory)
}

/// 运行默认会话直到关闭
pub async fn run() -> SessionResult<()> {
    SESSION.run().await
}

/// 请求关闭默认会话
pub fn shutdown() {
    SESSION.shutdown();
}
