//! # Boot EventBus
//!
//! 进程内的类型化事件总线，用于解耦组件之间的直接调用。
//!
//! ## 特性
//!
//! - 按事件类型分发，处理器按订阅顺序调用
//! - 激活前发布的事件进入队列，激活时按发布顺序重放
//! - 分发时使用订阅列表的快照，处理器中可以安全地订阅、取消订阅或发布
//! - 单个处理器的错误或 panic 不影响其他处理器，所有失败汇总到 [`PublishError`]
//!
//! ```
//! use boot_eventbus::EventBus;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! struct UserCreated {
//!     id: u64,
//! }
//!
//! let bus = EventBus::new();
//! let seen = Arc::new(AtomicUsize::new(0));
//! let counter = seen.clone();
//! bus.subscribe(move |event: &UserCreated| {
//!     counter.fetch_add(event.id as usize, Ordering::SeqCst);
//! });
//!
//! bus.publish(UserCreated { id: 7 }).unwrap();
//! assert_eq!(seen.load(Ordering::SeqCst), 0);
//!
//! bus.activate().unwrap();
//! assert_eq!(seen.load(Ordering::SeqCst), 7);
//! ```

pub mod bus;
pub mod errors;
pub mod handler;

pub use bus::*;
pub use errors::*;
pub use handler::{Handler, HandlerId};
