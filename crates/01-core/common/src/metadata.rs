//! 类型元数据

use std::any::TypeId;
use std::fmt;

/// 类型信息
///
/// 由 `TypeId` 提供稳定的身份，由完整限定的类型名提供可读名称。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 类型 ID
    pub type_id: TypeId,
    /// 完整限定的类型名称
    pub type_name: &'static str,
}

impl TypeInfo {
    /// 获取类型信息，支持 `dyn Trait` 等非 Sized 类型
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// 不带模块路径的简短名称
    pub fn short_name(&self) -> &'static str {
        let base = self.type_name.split('<').next().unwrap_or(self.type_name);
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

/// 注册名称与类型名组成的完整名称，例如 `default:my_app::Server`
pub fn full_name(name: &str, type_info: &TypeInfo) -> String {
    format!("{}:{}", name, type_info.type_name)
}
