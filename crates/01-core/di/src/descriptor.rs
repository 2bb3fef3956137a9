//! 字段描述符与导出表
//!
//! [`Fields`] 记录组件中需要注入的字段以及对应的标签，[`Exports`] 记录组件可以
//! 作为哪些类型（具体类型或 `dyn Trait`）被注入到其他组件中。

use boot_common::{ConfigError, TypeInfo};
use boot_config::ConfigValue;
use std::any::{Any, TypeId};
use std::sync::Arc;

/// 类型擦除后的注入值，内部是一个 `Arc<U>`
pub(crate) type ErasedValue = Box<dyn Any + Send + Sync>;

/// 类型擦除后的共享组件实例
pub(crate) type SharedInstance = Arc<dyn Any + Send + Sync>;

/// 字段种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// 引用字段，保存 `Arc<U>`
    Reference {
        /// 引用的目标类型
        target: TypeInfo,
    },
    /// 值字段，从配置中读取
    Value {
        /// 值的类型名称
        value_type: &'static str,
    },
}

/// 字段信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    /// 字段名称
    pub name: &'static str,
    /// 原始标签文本
    pub tag: String,
    /// 字段种类
    pub kind: FieldKind,
}

type AssignFn<T> = Box<dyn Fn(&mut T, ErasedValue) -> bool + Send + Sync>;
type ConfigureFn<T> = Box<dyn Fn(&mut T, &str) -> Result<bool, ConfigError> + Send + Sync>;

pub(crate) enum FieldBinding<T> {
    Reference(AssignFn<T>),
    Value(ConfigureFn<T>),
}

/// 组件的字段描述符集合
pub struct Fields<T> {
    infos: Vec<FieldInfo>,
    bindings: Vec<FieldBinding<T>>,
}

impl<T: 'static> Fields<T> {
    pub(crate) fn new() -> Self {
        Self {
            infos: Vec::new(),
            bindings: Vec::new(),
        }
    }

    /// 声明一个引用字段
    ///
    /// 字段类型为 `Arc<U>`（通常包裹在 `Option` 中），`U` 可以是具体类型或 `dyn Trait`。
    pub fn reference<U>(
        &mut self,
        field: &'static str,
        tag: impl Into<String>,
        assign: fn(&mut T, Arc<U>),
    ) -> &mut Self
    where
        U: ?Sized + Send + Sync + 'static,
    {
        self.infos.push(FieldInfo {
            name: field,
            tag: tag.into(),
            kind: FieldKind::Reference {
                target: TypeInfo::of::<U>(),
            },
        });
        self.bindings.push(FieldBinding::Reference(Box::new(
            move |component: &mut T, value: ErasedValue| match value.downcast::<Arc<U>>() {
                Ok(value) => {
                    assign(component, *value);
                    true
                }
                Err(_) => false,
            },
        )));
        self
    }

    /// 声明一个值字段
    ///
    /// 只有字段仍为零值时才会写入配置值。
    pub fn value<V: ConfigValue>(
        &mut self,
        field: &'static str,
        tag: impl Into<String>,
        access: fn(&mut T) -> &mut V,
    ) -> &mut Self {
        self.infos.push(FieldInfo {
            name: field,
            tag: tag.into(),
            kind: FieldKind::Value {
                value_type: V::type_label(),
            },
        });
        self.bindings.push(FieldBinding::Value(Box::new(
            move |component: &mut T, raw: &str| {
                let slot = access(component);
                if !slot.is_zero() {
                    return Ok(false);
                }
                *slot = V::parse_config(raw)?;
                Ok(true)
            },
        )));
        self
    }

    /// 已声明的字段信息
    pub fn infos(&self) -> &[FieldInfo] {
        &self.infos
    }

    /// 字段数量
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    /// 是否没有声明任何字段
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    pub(crate) fn assign(&self, component: &mut T, index: usize, value: ErasedValue) -> bool {
        match self.bindings.get(index) {
            Some(FieldBinding::Reference(assign)) => assign(component, value),
            _ => false,
        }
    }

    pub(crate) fn configure(
        &self,
        component: &mut T,
        index: usize,
        raw: &str,
    ) -> Result<bool, ConfigError> {
        match self.bindings.get(index) {
            Some(FieldBinding::Value(configure)) => configure(component, raw),
            _ => Ok(false),
        }
    }
}

type CastFn<T> = Box<dyn Fn(Arc<T>) -> ErasedValue + Send + Sync>;

/// 组件的导出表
///
/// 组件总是以自身的具体类型导出，额外的导出用于按 trait 注入。
pub struct Exports<T> {
    casts: Vec<(TypeInfo, CastFn<T>)>,
}

impl<T: Send + Sync + 'static> Exports<T> {
    pub(crate) fn new() -> Self {
        let mut exports = Self { casts: Vec::new() };
        exports.export::<T>(|component| component);
        exports
    }

    /// 以类型 `U` 导出组件，重复导出同一类型会被忽略
    ///
    /// ```ignore
    /// exports.export::<dyn Greeter>(|component| component as Arc<dyn Greeter>);
    /// ```
    pub fn export<U>(&mut self, cast: fn(Arc<T>) -> Arc<U>) -> &mut Self
    where
        U: ?Sized + Send + Sync + 'static,
    {
        let target = TypeInfo::of::<U>();
        if self.contains(target.type_id) {
            return self;
        }
        self.casts.push((
            target,
            Box::new(move |component: Arc<T>| Box::new(cast(component)) as ErasedValue),
        ));
        self
    }

    /// 是否导出了指定类型
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.casts.iter().any(|(info, _)| info.type_id == type_id)
    }

    /// 导出的类型
    pub fn types(&self) -> Vec<TypeInfo> {
        self.casts.iter().map(|(info, _)| *info).collect()
    }

    pub(crate) fn into_table(self) -> ExportTable {
        let casts = self
            .casts
            .into_iter()
            .map(|(info, cast)| {
                let erased: ErasedCastFn = Box::new(move |instance: SharedInstance| {
                    instance.downcast::<T>().ok().map(|component| cast(component))
                });
                (info, erased)
            })
            .collect();
        ExportTable { casts }
    }
}

type ErasedCastFn = Box<dyn Fn(SharedInstance) -> Option<ErasedValue> + Send + Sync>;

/// 类型擦除后的导出表，保存在注册表条目中
pub(crate) struct ExportTable {
    casts: Vec<(TypeInfo, ErasedCastFn)>,
}

impl ExportTable {
    pub(crate) fn contains(&self, type_id: TypeId) -> bool {
        self.casts.iter().any(|(info, _)| info.type_id == type_id)
    }

    pub(crate) fn cast(&self, type_id: TypeId, instance: SharedInstance) -> Option<ErasedValue> {
        self.casts
            .iter()
            .find(|(info, _)| info.type_id == type_id)
            .and_then(|(_, cast)| cast(instance))
    }

    pub(crate) fn types(&self) -> Vec<TypeInfo> {
        self.casts.iter().map(|(info, _)| *info).collect()
    }
}
