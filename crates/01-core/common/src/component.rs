//! 组件基础 trait 定义

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// 用户代码返回的通用错误类型
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 未显式指定名称时使用的注册名称
pub const DEFAULT_NAME: &str = "default";

/// 组件 trait
///
/// 组件是解决单一问题的功能单元。框架在所有声明的依赖和配置都注入完成后，
/// 调用一次 [`Component::init`]。
pub trait Component: Send + Sync + 'static {
    /// 初始化组件
    ///
    /// 在这里设置默认值、订阅事件或完成其他准备工作。返回错误或发生 panic
    /// 都会导致该组件进入 [`ComponentState::Failed`]。
    fn init(&mut self) -> Result<(), BoxError> {
        Ok(())
    }

    /// 如果组件同时是一个进程，返回其进程视图
    ///
    /// 进程组件通常这样实现：
    ///
    /// ```ignore
    /// fn as_process(self: Arc<Self>) -> Option<Arc<dyn Process>> {
    ///     Some(self)
    /// }
    /// ```
    fn as_process(self: Arc<Self>) -> Option<Arc<dyn Process>> {
        None
    }
}

/// 进程 trait
///
/// 进程是带有处理逻辑的组件，例如服务器、定时任务或其他长时间运行的任务。
#[async_trait]
pub trait Process: Send + Sync + 'static {
    /// 所有组件初始化完成后调用，应当一直运行到处理结束
    async fn start(&self) -> Result<(), BoxError>;

    /// 请求终止处理并清理资源，处理可能已经自行结束
    async fn stop(&self) -> Result<(), BoxError>;
}

/// 组件生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentState {
    /// 工厂刚创建完成
    Created,
    /// `init` 已成功调用
    Initialized,
    /// 进程已启动
    Started,
    /// 进程已停止
    Stopped,
    /// 初始化或运行失败
    Failed,
}

impl ComponentState {
    /// 组件是否已经完成初始化（包括之后的运行状态）
    pub fn is_initialized(&self) -> bool {
        matches!(self, Self::Initialized | Self::Started | Self::Stopped)
    }
}

impl fmt::Display for ComponentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Created => "created",
            Self::Initialized => "initialized",
            Self::Started => "started",
            Self::Stopped => "stopped",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}
