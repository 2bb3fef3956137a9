//! 事件处理器形状
//!
//! 处理器只能是以下两种函数之一：
//!
//! - `Fn(&E)`
//! - `Fn(&E) -> Result<(), Err>`，其中 `Err: Into<BoxError>`
//!
//! 其他形状在编译期被拒绝。参数个数不对：
//!
//! ```compile_fail
//! let bus = boot_eventbus::EventBus::new();
//! bus.subscribe(|a: &u32, b: &u32| {});
//! ```
//!
//! 没有参数：
//!
//! ```compile_fail
//! let bus = boot_eventbus::EventBus::new();
//! bus.subscribe(|| {});
//! ```
//!
//! 不是函数：
//!
//! ```compile_fail
//! let bus = boot_eventbus::EventBus::new();
//! bus.subscribe(42_u32);
//! ```
//!
//! 返回值不是 `Result<(), _>`：
//!
//! ```compile_fail
//! let bus = boot_eventbus::EventBus::new();
//! bus.subscribe(|event: &u32| *event + 1);
//! ```

use boot_common::BoxError;
use std::any::{Any, TypeId};

/// 处理器标识
///
/// 函数指针类型的所有值共享同一个 `TypeId`，因此额外记录指针地址。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId {
    type_id: TypeId,
    address: Option<usize>,
}

/// 事件处理器
///
/// `Marker` 只用于区分两种函数形状，调用方不需要指定。
pub trait Handler<E, Marker>: Send + Sync + 'static {
    /// 处理一个事件
    fn handle(&self, event: &E) -> Result<(), BoxError>;

    /// 用于取消订阅时匹配的标识
    fn id(&self) -> HandlerId;
}

impl<E, F> Handler<E, ()> for F
where
    E: 'static,
    F: Fn(&E) + Send + Sync + 'static,
{
    fn handle(&self, event: &E) -> Result<(), BoxError> {
        self(event);
        Ok(())
    }

    fn id(&self) -> HandlerId {
        let address = (self as &dyn Any)
            .downcast_ref::<fn(&E)>()
            .map(|f| *f as usize);
        HandlerId {
            type_id: TypeId::of::<F>(),
            address,
        }
    }
}

impl<E, F, Err> Handler<E, Result<(), Err>> for F
where
    E: 'static,
    F: Fn(&E) -> Result<(), Err> + Send + Sync + 'static,
    Err: Into<BoxError> + 'static,
{
    fn handle(&self, event: &E) -> Result<(), BoxError> {
        self(event).map_err(Into::into)
    }

    fn id(&self) -> HandlerId {
        let address = (self as &dyn Any)
            .downcast_ref::<fn(&E) -> Result<(), Err>>()
            .map(|f| *f as usize);
        HandlerId {
            type_id: TypeId::of::<F>(),
            address,
        }
    }
}
