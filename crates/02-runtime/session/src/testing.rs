//! 单元测试辅助
//!
//! [`TestSession`] 以 [`Flag::UnitTest`] 模式运行，测试中提供的模拟组件会覆盖
//! 同类型的默认注册。

use crate::errors::SessionResult;
use crate::runtime::Flag;
use crate::session::Session;
use boot_config::ConfigProvider;
use boot_di::Injectable;
use std::sync::Arc;
use tracing::info;

/// 单元测试会话
#[derive(Debug)]
pub struct TestSession {
    session: Session,
}

impl TestSession {
    /// 以单元测试模式创建会话
    pub fn new() -> Self {
        info!("创建单元测试会话");
        Self {
            session: Session::with_flags([Flag::UnitTest]),
        }
    }

    /// 替换配置提供者
    pub fn with_config_provider(self, provider: Arc<dyn ConfigProvider>) -> Self {
        Self {
            session: self.session.with_config_provider(provider),
        }
    }

    /// 注册被测组件
    pub fn register<T, F>(&self, factory: F) -> SessionResult<()>
    where
        T: Injectable,
        F: FnOnce() -> T + Send + 'static,
    {
        self.session.register(factory)
    }

    /// 以默认名称注册模拟组件，覆盖同类型的已有注册
    pub fn mock<T: Injectable>(&self, mock: T) -> SessionResult<()> {
        self.session.override_component(move || mock)
    }

    /// 以指定名称注册模拟组件
    pub fn mock_name<T: Injectable>(&self, name: &str, mock: T) -> SessionResult<()> {
        self.session.override_name(name, move || mock)
    }

    /// 被包装的会话
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// 运行会话直到所有进程结束或请求关闭
    pub async fn run(&self) -> SessionResult<()> {
        self.session.run().await
    }
}

impl Default for TestSession {
    fn default() -> Self {
        Self::new()
    }
}
