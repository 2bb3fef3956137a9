//! 注册表条目

use crate::descriptor::{ErasedValue, ExportTable, Exports, FieldInfo, Fields, SharedInstance};
use crate::injectable::Injectable;
use boot_common::{full_name, BoxError, Component, ComponentState, ConfigError, Process, TypeInfo};
use parking_lot::Mutex;
use std::any::TypeId;
use std::sync::Arc;

/// 尚未初始化的组件，解析期间可以修改
pub(crate) trait PendingComponent: Send {
    fn assign(&mut self, index: usize, value: ErasedValue) -> bool;
    fn configure(&mut self, index: usize, raw: &str) -> Result<bool, ConfigError>;
    fn init(&mut self) -> Result<(), BoxError>;
    fn activate(self: Box<Self>) -> ActiveComponent;
}

struct Pending<T> {
    component: T,
    fields: Fields<T>,
}

impl<T: Injectable> PendingComponent for Pending<T> {
    fn assign(&mut self, index: usize, value: ErasedValue) -> bool {
        self.fields.assign(&mut self.component, index, value)
    }

    fn configure(&mut self, index: usize, raw: &str) -> Result<bool, ConfigError> {
        self.fields.configure(&mut self.component, index, raw)
    }

    fn init(&mut self) -> Result<(), BoxError> {
        self.component.init()
    }

    fn activate(self: Box<Self>) -> ActiveComponent {
        let component = Arc::new(self.component);
        let process = Arc::clone(&component).as_process();
        ActiveComponent {
            instance: component,
            process,
        }
    }
}

/// 初始化完成、已共享的组件
pub(crate) struct ActiveComponent {
    instance: SharedInstance,
    process: Option<Arc<dyn Process>>,
}

enum Slot {
    Pending(Box<dyn PendingComponent>),
    Resolving,
    Active(ActiveComponent),
    Failed,
}

/// 条目中组件实例所处的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SlotStatus {
    Pending,
    Resolving,
    Active,
    Failed,
}

/// 注册表条目，持有一个组件实例及其元数据
pub struct ComponentEntry {
    name: String,
    type_info: TypeInfo,
    fields: Vec<FieldInfo>,
    exports: ExportTable,
    slot: Mutex<Slot>,
    state: Mutex<ComponentState>,
}

impl ComponentEntry {
    pub(crate) fn new<T: Injectable>(name: String, component: T) -> Self {
        let mut fields = Fields::new();
        T::describe(&mut fields);
        let mut exports = Exports::new();
        T::export(&mut exports);

        Self {
            name,
            type_info: TypeInfo::of::<T>(),
            fields: fields.infos().to_vec(),
            exports: exports.into_table(),
            slot: Mutex::new(Slot::Pending(Box::new(Pending { component, fields }))),
            state: Mutex::new(ComponentState::Created),
        }
    }

    /// 注册名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 组件类型信息
    pub fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    /// 注册名称与类型名组成的完整名称
    pub fn full_name(&self) -> String {
        full_name(&self.name, &self.type_info)
    }

    /// 声明的注入字段
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    /// 组件可以作为哪些类型被注入
    pub fn exported_types(&self) -> Vec<TypeInfo> {
        self.exports.types()
    }

    /// 是否可以作为 `U` 被注入
    pub fn exports<U: ?Sized + 'static>(&self) -> bool {
        self.exports.contains(TypeId::of::<U>())
    }

    pub(crate) fn exports_type(&self, type_id: TypeId) -> bool {
        self.exports.contains(type_id)
    }

    /// 当前生命周期状态
    pub fn state(&self) -> ComponentState {
        *self.state.lock()
    }

    /// 当状态为 `from` 时切换到 `to`，返回是否切换成功
    pub fn transition(&self, from: ComponentState, to: ComponentState) -> bool {
        let mut state = self.state.lock();
        if *state == from {
            *state = to;
            true
        } else {
            false
        }
    }

    /// 已初始化的组件实例
    pub fn get<U: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<U>> {
        let value = self.cast(TypeId::of::<U>())?;
        value.downcast::<Arc<U>>().ok().map(|value| *value)
    }

    /// 组件的进程视图，未初始化或不是进程时返回 `None`
    pub fn process(&self) -> Option<Arc<dyn Process>> {
        match &*self.slot.lock() {
            Slot::Active(active) => active.process.clone(),
            _ => None,
        }
    }

    pub(crate) fn cast(&self, type_id: TypeId) -> Option<ErasedValue> {
        let instance = match &*self.slot.lock() {
            Slot::Active(active) => Arc::clone(&active.instance),
            _ => return None,
        };
        self.exports.cast(type_id, instance)
    }

    pub(crate) fn status(&self) -> SlotStatus {
        match &*self.slot.lock() {
            Slot::Pending(_) => SlotStatus::Pending,
            Slot::Resolving => SlotStatus::Resolving,
            Slot::Active(_) => SlotStatus::Active,
            Slot::Failed => SlotStatus::Failed,
        }
    }

    /// 取出待初始化的组件，条目进入解析中状态
    pub(crate) fn begin_resolution(&self) -> Option<Box<dyn PendingComponent>> {
        let mut slot = self.slot.lock();
        match std::mem::replace(&mut *slot, Slot::Resolving) {
            Slot::Pending(pending) => Some(pending),
            other => {
                *slot = other;
                None
            }
        }
    }

    pub(crate) fn complete(&self, active: ActiveComponent) {
        *self.slot.lock() = Slot::Active(active);
        self.transition(ComponentState::Created, ComponentState::Initialized);
    }

    pub(crate) fn fail(&self) {
        *self.slot.lock() = Slot::Failed;
        *self.state.lock() = ComponentState::Failed;
    }
}

impl std::fmt::Debug for ComponentEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentEntry")
            .field("name", &self.name)
            .field("type", &self.type_info.type_name)
            .field("state", &self.state())
            .finish()
    }
}
