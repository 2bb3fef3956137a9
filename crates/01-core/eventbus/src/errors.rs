//! 事件总线错误类型

use boot_common::BoxError;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// 事件总线错误类型
#[derive(Error, Debug)]
pub enum EventBusError {
    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error("事件总线已经激活")]
    AlreadyActive,

    #[error("事件类型 {event_type} 没有订阅者")]
    NoSubscribers { event_type: &'static str },

    #[error("未找到要移除的处理器 {handler} (事件类型 {event_type})")]
    HandlerNotFound {
        handler: &'static str,
        event_type: &'static str,
    },
}

/// 单个处理器的失败原因
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("处理器返回错误: {source}")]
    Returned { source: BoxError },

    #[error("处理器发生 panic: {message}")]
    Panicked { message: String },
}

/// 单个处理器的失败记录
#[derive(Debug)]
pub struct HandlerFailure {
    /// 处理器的完整限定名称
    pub handler: &'static str,
    /// 失败原因
    pub error: HandlerError,
}

/// 一个分发失败的事件及其所有处理器失败
pub struct FailedEvent {
    /// 事件类型名称
    pub event_type: &'static str,
    /// 事件实例
    pub event: Arc<dyn Any + Send + Sync>,
    /// 按调用顺序排列的处理器失败
    pub failures: Vec<HandlerFailure>,
}

impl FailedEvent {
    /// 以具体类型访问事件实例
    pub fn event<E: 'static>(&self) -> Option<&E> {
        self.event.downcast_ref::<E>()
    }
}

impl fmt::Debug for FailedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailedEvent")
            .field("event_type", &self.event_type)
            .field("failures", &self.failures)
            .finish_non_exhaustive()
    }
}

/// 发布错误汇总
///
/// 记录一次发布（或激活时的一次重放）中所有失败的事件，保持发生顺序。
#[derive(Debug, Default)]
pub struct PublishError {
    /// 失败的事件
    pub events: Vec<FailedEvent>,
}

impl PublishError {
    /// 是否没有任何失败
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// 所有处理器失败的总数
    pub fn failure_count(&self) -> usize {
        self.events.iter().map(|event| event.failures.len()).sum()
    }

    /// 合并另一个汇总，保持顺序
    pub fn merge(&mut self, other: PublishError) {
        self.events.extend(other.events);
    }

    /// 所有处理器失败，按发生顺序
    pub fn failures(&self) -> impl Iterator<Item = &HandlerFailure> {
        self.events.iter().flat_map(|event| event.failures.iter())
    }
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} 个事件发布失败，共 {} 个处理器失败",
            self.events.len(),
            self.failure_count()
        )?;
        for event in &self.events {
            for failure in &event.failures {
                write!(
                    f,
                    "; [{}] {}: {}",
                    event.event_type, failure.handler, failure.error
                )?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for PublishError {}
