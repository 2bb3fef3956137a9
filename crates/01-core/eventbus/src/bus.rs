//! 事件总线实现

use crate::errors::{EventBusError, FailedEvent, HandlerError, HandlerFailure, PublishError};
use crate::handler::{Handler, HandlerId};
use boot_common::{catch_panic, BoxError, Component, TypeInfo};
use boot_di::Injectable;
use parking_lot::{Mutex, RwLock};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

type SharedEvent = Arc<dyn Any + Send + Sync>;
type ErasedHandler = Box<dyn Fn(&(dyn Any + Send + Sync)) -> Result<(), BoxError> + Send + Sync>;

/// 一个订阅
struct Subscription {
    handler: &'static str,
    handler_id: HandlerId,
    call: ErasedHandler,
}

/// 激活前发布的事件
struct QueuedEvent {
    event_type: TypeInfo,
    event: SharedEvent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Activating,
    Active,
}

struct BusState {
    phase: Phase,
    queue: Vec<QueuedEvent>,
}

struct Inner {
    subscriptions: RwLock<HashMap<TypeId, Vec<Arc<Subscription>>>>,
    state: Mutex<BusState>,
}

/// 事件总线
///
/// 克隆得到的是同一个总线的另一个句柄。
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<Inner>,
}

impl EventBus {
    /// 创建未激活的事件总线
    pub fn new() -> Self {
        Self::with_phase(Phase::Idle)
    }

    /// 创建已激活的事件总线，发布的事件立即分发，适用于单元测试
    pub fn activated() -> Self {
        Self::with_phase(Phase::Active)
    }

    fn with_phase(phase: Phase) -> Self {
        Self {
            inner: Arc::new(Inner {
                subscriptions: RwLock::new(HashMap::new()),
                state: Mutex::new(BusState {
                    phase,
                    queue: Vec::new(),
                }),
            }),
        }
    }

    /// 订阅事件
    ///
    /// 事件类型由处理器的参数类型决定，处理器按订阅顺序调用。同一个处理器可以订阅多次。
    /// 需要之后取消订阅时，保留处理器的一份副本（非捕获闭包和函数是 `Copy` 的）。
    pub fn subscribe<E, M, H>(&self, handler: H)
    where
        E: Send + Sync + 'static,
        M: 'static,
        H: Handler<E, M>,
    {
        let event_type = TypeInfo::of::<E>();
        let subscription = Arc::new(Subscription {
            handler: std::any::type_name::<H>(),
            handler_id: handler.id(),
            call: Box::new(move |event: &(dyn Any + Send + Sync)| {
                match event.downcast_ref::<E>() {
                    Some(event) => handler.handle(event),
                    None => Ok(()),
                }
            }),
        });

        debug!("订阅事件 {}: {}", event_type, subscription.handler);
        self.inner
            .subscriptions
            .write()
            .entry(event_type.type_id)
            .or_default()
            .push(subscription);
    }

    /// 取消订阅
    ///
    /// 移除该事件类型下第一个与 `handler` 标识相同的订阅，其余订阅保持原有顺序。
    /// 标识由处理器类型决定，函数指针还会比较地址。
    pub fn unsubscribe<E, M, H>(&self, handler: &H) -> Result<(), EventBusError>
    where
        E: Send + Sync + 'static,
        M: 'static,
        H: Handler<E, M>,
    {
        let event_type = TypeInfo::of::<E>();
        let mut subscriptions = self.inner.subscriptions.write();

        let Some(list) = subscriptions
            .get_mut(&event_type.type_id)
            .filter(|list| !list.is_empty())
        else {
            return Err(EventBusError::NoSubscribers {
                event_type: event_type.type_name,
            });
        };

        let handler_id = handler.id();
        let Some(position) = list.iter().position(|s| s.handler_id == handler_id) else {
            return Err(EventBusError::HandlerNotFound {
                handler: std::any::type_name::<H>(),
                event_type: event_type.type_name,
            });
        };
        list.remove(position);
        let now_empty = list.is_empty();
        if now_empty {
            subscriptions.remove(&event_type.type_id);
        }

        debug!(
            "取消订阅事件 {}: {}",
            event_type,
            std::any::type_name::<H>()
        );
        Ok(())
    }

    /// 是否存在该事件类型的处理器
    pub fn has_handler<E: 'static>(&self) -> bool {
        self.subscriber_count::<E>() > 0
    }

    /// 是否存在可以处理该事件的处理器
    pub fn has_handler_for<E: 'static>(&self, event: &E) -> bool {
        let _ = event;
        self.has_handler::<E>()
    }

    /// 该事件类型的处理器数量
    pub fn subscriber_count<E: 'static>(&self) -> usize {
        self.inner
            .subscriptions
            .read()
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }

    /// 事件总线是否已经激活
    pub fn is_active(&self) -> bool {
        self.inner.state.lock().phase == Phase::Active
    }

    /// 激活前排队的事件数量
    pub fn queued_events(&self) -> usize {
        self.inner.state.lock().queue.len()
    }

    /// 发布事件
    ///
    /// 未激活时事件进入队列并返回 `Ok`。激活后同步调用所有处理器，任意处理器失败时
    /// 返回包含全部失败的 [`EventBusError::Publish`]，没有处理器时返回 `Ok`。
    pub fn publish<E: Send + Sync + 'static>(&self, event: E) -> Result<(), EventBusError> {
        let event_type = TypeInfo::of::<E>();
        let event: SharedEvent = Arc::new(event);

        {
            let mut state = self.inner.state.lock();
            if state.phase != Phase::Active {
                debug!("事件总线未激活，事件 {} 进入队列", event_type);
                state.queue.push(QueuedEvent { event_type, event });
                return Ok(());
            }
        }

        match self.dispatch(event_type, event) {
            None => Ok(()),
            Some(failed) => {
                let aggregate = PublishError {
                    events: vec![failed],
                };
                error!("发布事件 {} 失败: {}", event_type, aggregate);
                Err(aggregate.into())
            }
        }
    }

    /// 激活事件总线并按发布顺序重放队列中的事件
    ///
    /// 重放期间发布的事件排在队列末尾，同样在激活完成前被分发。只能激活一次。
    pub fn activate(&self) -> Result<(), EventBusError> {
        {
            let mut state = self.inner.state.lock();
            if state.phase != Phase::Idle {
                return Err(EventBusError::AlreadyActive);
            }
            state.phase = Phase::Activating;
        }

        let mut aggregate = PublishError::default();
        let mut replayed = 0;
        loop {
            let batch = {
                let mut state = self.inner.state.lock();
                if state.queue.is_empty() {
                    state.phase = Phase::Active;
                    break;
                }
                std::mem::take(&mut state.queue)
            };
            for queued in batch {
                replayed += 1;
                if let Some(failed) = self.dispatch(queued.event_type, queued.event) {
                    aggregate.events.push(failed);
                }
            }
        }

        info!("事件总线已激活，重放 {} 个排队事件", replayed);
        if aggregate.is_empty() {
            Ok(())
        } else {
            error!("重放排队事件失败: {}", aggregate);
            Err(aggregate.into())
        }
    }

    fn dispatch(&self, event_type: TypeInfo, event: SharedEvent) -> Option<FailedEvent> {
        let snapshot = self
            .inner
            .subscriptions
            .read()
            .get(&event_type.type_id)
            .cloned()
            .unwrap_or_default();
        if snapshot.is_empty() {
            debug!("事件 {} 没有处理器", event_type);
            return None;
        }

        debug!("分发事件 {} 到 {} 个处理器", event_type, snapshot.len());
        let failures: Vec<HandlerFailure> = snapshot
            .iter()
            .filter_map(|subscription| {
                let error = match catch_panic(|| (subscription.call)(event.as_ref())) {
                    Ok(Ok(())) => return None,
                    Ok(Err(source)) => HandlerError::Returned { source },
                    Err(message) => HandlerError::Panicked { message },
                };
                warn!(
                    "处理器 {} 处理事件 {} 失败: {}",
                    subscription.handler, event_type, error
                );
                Some(HandlerFailure {
                    handler: subscription.handler,
                    error,
                })
            })
            .collect();

        if failures.is_empty() {
            None
        } else {
            Some(FailedEvent {
                event_type: event_type.type_name,
                event,
                failures,
            })
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("EventBus")
            .field("phase", &state.phase)
            .field("queued", &state.queue.len())
            .field("event_types", &self.inner.subscriptions.read().len())
            .finish()
    }
}

impl Component for EventBus {}

impl Injectable for EventBus {}
