//! 运行时标志
//!
//! 运行时对所有组件全局可见，用于在测试等场景下切换组件行为，不用于组件配置。

use boot_common::Component;
use boot_di::Injectable;
use std::fmt;
use std::sync::Arc;

/// 组件的特殊运行模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    Standard,
    UnitTest,
    FunctionalTest,
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Standard => "standard",
            Self::UnitTest => "unit test",
            Self::FunctionalTest => "functional test",
        };
        f.write_str(name)
    }
}

/// 运行时组件，以默认名称注册到每个会话中
#[derive(Debug, Clone, Default)]
pub struct Runtime {
    flags: Arc<[Flag]>,
}

impl Runtime {
    /// 以给定标志创建运行时
    pub fn new(flags: impl IntoIterator<Item = Flag>) -> Self {
        Self {
            flags: flags.into_iter().collect(),
        }
    }

    /// 是否带有该标志
    pub fn has_flag(&self, flag: Flag) -> bool {
        self.flags.contains(&flag)
    }

    /// 全部标志
    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }
}

impl Component for Runtime {}
impl Injectable for Runtime {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_flag() {
        let runtime = Runtime::new([Flag::UnitTest]);
        assert!(runtime.has_flag(Flag::UnitTest));
        assert!(!runtime.has_flag(Flag::Standard));
        assert!(!Runtime::default().has_flag(Flag::FunctionalTest));
        assert_eq!(Flag::FunctionalTest.to_string(), "functional test");
    }
}
