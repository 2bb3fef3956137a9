//! 启动阶段

use std::fmt;

/// 会话所处的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// 应用启动后立即进入，此阶段可以注册组件
    Initializing,
    /// 正在创建和初始化组件
    Booting,
    /// 所有组件已初始化，进程已启动
    Running,
    /// 正在停止进程
    Stopping,
    /// 所有进程已停止
    Exiting,
}

impl Phase {
    /// 下一个阶段，`Exiting` 之后没有新的阶段
    pub fn next(self) -> Self {
        match self {
            Self::Initializing => Self::Booting,
            Self::Booting => Self::Running,
            Self::Running => Self::Stopping,
            Self::Stopping | Self::Exiting => Self::Exiting,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initializing => "initialization",
            Self::Booting => "booting",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Exiting => "exiting",
        };
        f.write_str(name)
    }
}
