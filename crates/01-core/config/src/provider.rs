//! 配置提供者抽象接口

use std::sync::Arc;

/// 配置提供者 trait
///
/// 定义从不同数据源获取原始配置字符串的统一接口，类型转换由 [`crate::ConfigValue`] 完成。
pub trait ConfigProvider: Send + Sync {
    /// 获取配置值
    fn get_value(&self, key: &str) -> Option<String>;

    /// 检查配置键是否存在
    fn contains_key(&self, key: &str) -> bool {
        self.get_value(key).is_some()
    }

    /// 获取提供者名称
    fn name(&self) -> &str;

    /// 获取提供者优先级，数值越大越先被查询
    fn priority(&self) -> i32 {
        0
    }
}

impl<P: ConfigProvider + ?Sized> ConfigProvider for Arc<P> {
    fn get_value(&self, key: &str) -> Option<String> {
        (**self).get_value(key)
    }

    fn contains_key(&self, key: &str) -> bool {
        (**self).contains_key(key)
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn priority(&self) -> i32 {
        (**self).priority()
    }
}
