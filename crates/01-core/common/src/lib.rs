//! # Boot Common
//!
//! 这个 crate 提供了 boot 组件框架各层共享的 traits 和工具。
//!
//! ## 核心组件
//!
//! - [`Component`] - 组件基础 trait
//! - [`Process`] - 长时间运行的进程组件
//! - [`ComponentState`] - 组件生命周期状态
//! - [`TypeInfo`] - 稳定的类型标识
//! - [`tag`] - 字段指令标签解析
//!
//! ## 设计原则
//!
//! - 显式的描述符代替运行时反射
//! - 错误通过 `Result` 传递，panic 只在边界处捕获

pub mod component;
pub mod errors;
pub mod metadata;
pub mod panic;
pub mod tag;

pub use component::*;
pub use errors::*;
pub use metadata::*;
pub use panic::*;
pub use tag::{parse_tag, split, Tag, TagOption};
