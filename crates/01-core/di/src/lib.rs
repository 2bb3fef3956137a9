//! # Boot DI
//!
//! 组件注册表与依赖/配置解析器。
//!
//! 组件通过实现 [`Injectable`] 显式声明需要注入的字段：
//!
//! - 引用字段（`wire` 指令）由注册表中唯一匹配的组件填充
//! - 值字段（`config` 指令）由命令行参数、环境变量或默认值填充
//!
//! ```
//! use boot_common::Component;
//! use boot_config::MemoryConfigProvider;
//! use boot_di::{ComponentRegistry, Fields, Injectable};
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Store;
//! impl Component for Store {}
//! impl Injectable for Store {}
//!
//! #[derive(Default)]
//! struct Server {
//!     store: Option<Arc<Store>>,
//!     port: u16,
//! }
//! impl Component for Server {}
//! impl Injectable for Server {
//!     fn describe(fields: &mut Fields<Self>) {
//!         fields
//!             .reference::<Store>("store", "wire", |server, store| server.store = Some(store))
//!             .value::<u16>("port", "config,key:PORT,default:8080", |server| &mut server.port);
//!     }
//! }
//!
//! let registry = ComponentRegistry::with_config_provider(Arc::new(MemoryConfigProvider::new()));
//! registry.add("default", false, Server::default()).unwrap();
//! registry.add("default", false, Store).unwrap();
//! registry.resolve_all().unwrap();
//!
//! let server = registry.lookup::<Server>("default").unwrap();
//! assert_eq!(server.port, 8080);
//! assert!(server.store.is_some());
//! ```

pub mod descriptor;
pub mod entry;
pub mod injectable;
pub mod registry;
pub mod resolver;

pub use descriptor::{Exports, FieldInfo, FieldKind, Fields};
pub use entry::ComponentEntry;
pub use injectable::Injectable;
pub use registry::ComponentRegistry;
pub use resolver::ResolveContext;
