//! # Boot Macros
//!
//! 提供 `#[derive(Injectable)]`，根据字段上的 `#[boot("...")]` 标签生成注入描述。
//!
//! ## 使用示例
//!
//! ```ignore
//! use boot::{BoxError, Component, Injectable};
//! use std::sync::Arc;
//!
//! #[derive(Default, Injectable)]
//! #[boot(export = "dyn Storage")]
//! pub struct Repository {
//!     #[boot("wire")]
//!     database: Option<Arc<Database>>,
//!     #[boot("config,key:POOL_SIZE,default:4")]
//!     pool_size: u32,
//! }
//!
//! impl Component for Repository {}
//! ```
//!
//! 类型为 `Option<Arc<U>>` 的字段生成引用描述，其他带标签的字段生成配置值描述。
//! 标签内容在解析时校验，而不是编译时。

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod injectable;
mod utils;

/// 可注入组件派生宏
///
/// # 属性
///
/// - 字段 `#[boot("<tag>")]` - 注入标签，例如 `wire`、`wire,name:primary`、`config,key:PORT`
/// - 结构体 `#[boot(export = "dyn Trait")]` - 额外以 trait 对象导出，可以重复
/// - 结构体 `#[boot(crate = "path")]` - 框架 crate 的路径，默认为 `::boot`
#[proc_macro_derive(Injectable, attributes(boot))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    injectable::derive_injectable_impl(input)
}
