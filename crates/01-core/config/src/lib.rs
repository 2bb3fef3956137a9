//! # Boot Config
//!
//! 配置值查找与类型转换。
//!
//! ## 查找顺序
//!
//! 1. 命令行参数 `--<key> <value>`
//! 2. 环境变量 `<key>`
//! 3. 标签中的 `default` 选项（由解析器处理）

pub mod provider;
pub mod providers;
pub mod value;

pub use provider::*;
pub use providers::*;
pub use value::*;
