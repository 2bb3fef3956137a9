//! 配置值类型转换

use boot_common::ConfigError;

/// 可以从配置字符串转换的字段类型
///
/// 只有当字段仍为零值时才会写入配置值，已经由工厂设置的值保持不变。
pub trait ConfigValue: Sized + Send + Sync + 'static {
    /// 从原始字符串解析
    fn parse_config(raw: &str) -> Result<Self, ConfigError>;

    /// 是否为零值
    fn is_zero(&self) -> bool;

    /// 类型名称，用于日志和错误信息
    fn type_label() -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl ConfigValue for String {
    fn parse_config(raw: &str) -> Result<Self, ConfigError> {
        Ok(raw.to_string())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl ConfigValue for bool {
    fn parse_config(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim() {
            "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
            "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
            other => Err(ConfigError::TypeConversionError {
                value: other.to_string(),
                target_type: "bool",
                message: "不是有效的布尔值".to_string(),
            }),
        }
    }

    fn is_zero(&self) -> bool {
        !*self
    }
}

macro_rules! impl_integer_config_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ConfigValue for $ty {
                fn parse_config(raw: &str) -> Result<Self, ConfigError> {
                    raw.trim()
                        .parse::<$ty>()
                        .map_err(|e| ConfigError::TypeConversionError {
                            value: raw.to_string(),
                            target_type: stringify!($ty),
                            message: e.to_string(),
                        })
                }

                fn is_zero(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

impl_integer_config_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
