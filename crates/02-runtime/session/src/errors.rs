//! 会话错误类型

use crate::phase::Phase;
use boot_common::DependencyError;
use boot_eventbus::EventBusError;
use thiserror::Error;

/// 会话错误类型
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("当前启动阶段 {current} 与期望的启动阶段 {expected} 不匹配")]
    PhaseMismatch { current: Phase, expected: Phase },

    #[error("组件工厂注册需要名称")]
    InvalidRegistration,

    #[error("启动开始后不允许注册组件")]
    RegistrationClosed,

    #[error(transparent)]
    Dependency(#[from] DependencyError),

    #[error(transparent)]
    EventBus(#[from] EventBusError),

    #[error("日志初始化失败: {message}")]
    Logging { message: String },
}

/// 会话结果类型
pub type SessionResult<T> = Result<T, SessionError>;
