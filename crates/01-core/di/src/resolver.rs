//! 依赖与配置解析
//!
//! 解析一个组件时依次处理其声明的字段：
//!
//! - `wire`：在注册表中查找唯一一个名称匹配且可以作为字段类型注入的组件，
//!   必要时先递归解析该依赖
//! - `config`：按命令行参数、环境变量、`default` 选项的顺序查找配置值，
//!   仅当字段仍为零值时写入
//!
//! 所有字段处理完成后调用组件的 `init`，组件随后被冻结为共享实例。
//! 整个解析过程由注册表的解析锁串行化。

use crate::descriptor::{FieldInfo, FieldKind};
use crate::entry::{ComponentEntry, PendingComponent, SlotStatus};
use crate::registry::ComponentRegistry;
use boot_common::{catch_panic, DependencyError, DependencyResult, Tag, DEFAULT_NAME};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const DIRECTIVE_WIRE: &str = "wire";
const DIRECTIVE_CONFIG: &str = "config";
const OPTION_NAME: &str = "name";
const OPTION_KEY: &str = "key";
const OPTION_PANIC: &str = "panic";
const OPTION_DEFAULT: &str = "default";
const CONFIG_OPTIONS: [&str; 3] = [OPTION_KEY, OPTION_PANIC, OPTION_DEFAULT];

/// 解析上下文
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    /// 当前解析链，用于检测循环依赖
    pub resolution_chain: Vec<String>,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加组件到解析链
    pub fn push(&mut self, full_name: String) {
        self.resolution_chain.push(full_name);
    }

    /// 从解析链中移除最后一个组件
    pub fn pop(&mut self) {
        self.resolution_chain.pop();
    }

    /// 解析链加上再次出现的组件，例如 `a -> b -> a`
    pub fn chain_with(&self, full_name: &str) -> String {
        let mut chain = self.resolution_chain.clone();
        chain.push(full_name.to_string());
        chain.join(" -> ")
    }
}

/// 当前字段的位置信息，用于日志和错误
struct FieldSite<'a> {
    component: &'a str,
    index: usize,
    field: &'a FieldInfo,
}

impl FieldSite<'_> {
    fn component(&self) -> String {
        self.component.to_string()
    }

    fn field(&self) -> String {
        self.field.name.to_string()
    }
}

impl ComponentRegistry {
    /// 解析单个条目及其依赖
    ///
    /// 条目已经初始化时直接返回空列表。返回因此次调用而初始化的条目，依赖在前、
    /// 自身在后，用于决定进程的启动和停止顺序。
    pub fn resolve(&self, entry: &Arc<ComponentEntry>) -> DependencyResult<Vec<Arc<ComponentEntry>>> {
        let _guard = self.resolution.lock();
        let mut context = ResolveContext::new();
        self.resolve_entry(entry, &mut context)
    }

    /// 按插入顺序解析所有条目
    pub fn resolve_all(&self) -> DependencyResult<Vec<Arc<ComponentEntry>>> {
        let _guard = self.resolution.lock();
        let mut resolved = Vec::new();
        for entry in self.entries() {
            let mut context = ResolveContext::new();
            resolved.extend(self.resolve_entry(&entry, &mut context)?);
        }
        info!("{} 个组件已初始化", resolved.len());
        Ok(resolved)
    }

    fn resolve_entry(
        &self,
        entry: &Arc<ComponentEntry>,
        context: &mut ResolveContext,
    ) -> DependencyResult<Vec<Arc<ComponentEntry>>> {
        let Some(mut pending) = entry.begin_resolution() else {
            return Ok(Vec::new());
        };

        debug!("解析组件依赖: {}", entry.full_name());
        context.push(entry.full_name());
        let result = self.inject_and_init(entry, pending.as_mut(), context);
        context.pop();

        match result {
            Ok(mut resolved) => {
                entry.complete(pending.activate());
                resolved.push(Arc::clone(entry));
                Ok(resolved)
            }
            Err(err) => {
                error!("组件 {} 解析失败: {}", entry.full_name(), err);
                entry.fail();
                Err(err)
            }
        }
    }

    fn inject_and_init(
        &self,
        entry: &Arc<ComponentEntry>,
        pending: &mut dyn PendingComponent,
        context: &mut ResolveContext,
    ) -> DependencyResult<Vec<Arc<ComponentEntry>>> {
        let component = entry.type_info().short_name();
        let mut resolved = Vec::new();

        for (index, field) in entry.fields().iter().enumerate() {
            let site = FieldSite {
                component,
                index,
                field,
            };
            let tag = field
                .tag
                .parse::<Tag>()
                .map_err(|_| DependencyError::UnparsableTag {
                    component: site.component(),
                    field: site.field(),
                    tag: field.tag.clone(),
                })?;

            match tag.name.as_str() {
                DIRECTIVE_WIRE => {
                    resolved.extend(self.process_wiring(&site, &tag, pending, context)?);
                }
                DIRECTIVE_CONFIG => self.process_configuration(&site, &tag, pending)?,
                _ => {
                    return Err(DependencyError::UnsupportedDirective {
                        component: site.component(),
                        field: site.field(),
                        tag: field.tag.clone(),
                    });
                }
            }
        }

        debug!("初始化组件: {}", entry.full_name());
        let message = match catch_panic(|| pending.init()) {
            Ok(Ok(())) => return Ok(resolved),
            Ok(Err(err)) => format!("返回错误: {}", err),
            Err(panic) => format!("发生 panic: {}", panic),
        };
        Err(DependencyError::InitializationFailed {
            component: entry.full_name(),
            message,
        })
    }

    fn process_wiring(
        &self,
        site: &FieldSite<'_>,
        tag: &Tag,
        pending: &mut dyn PendingComponent,
        context: &mut ResolveContext,
    ) -> DependencyResult<Vec<Arc<ComponentEntry>>> {
        let FieldKind::Reference { target } = site.field.kind else {
            return Err(DependencyError::NotAReference {
                component: site.component(),
                field: site.field(),
            });
        };
        let name = tag
            .option(OPTION_NAME)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_NAME);

        let candidates: Vec<_> = self
            .entries()
            .into_iter()
            .filter(|candidate| candidate.name() == name && candidate.exports_type(target.type_id))
            .collect();
        let dependency = match candidates.as_slice() {
            [] => {
                return Err(DependencyError::DependencyNotFound {
                    name: name.to_string(),
                    component: site.component(),
                    field: site.field(),
                });
            }
            [single] => Arc::clone(single),
            _ => {
                return Err(DependencyError::AmbiguousDependency {
                    name: name.to_string(),
                    component: site.component(),
                    field: site.field(),
                    candidates: candidates.iter().map(|c| c.full_name()).collect(),
                });
            }
        };

        let resolved = match dependency.status() {
            SlotStatus::Pending => self.resolve_entry(&dependency, context)?,
            SlotStatus::Active => Vec::new(),
            SlotStatus::Resolving => {
                return Err(DependencyError::CircularDependency {
                    dependency_chain: context.chain_with(&dependency.full_name()),
                });
            }
            SlotStatus::Failed => {
                return Err(DependencyError::DependencyFailed {
                    dependency: dependency.full_name(),
                    component: site.component(),
                    field: site.field(),
                });
            }
        };

        let assigned = dependency
            .cast(target.type_id)
            .map(|value| pending.assign(site.index, value))
            .unwrap_or(false);
        if !assigned {
            return Err(DependencyError::DependencyFailed {
                dependency: dependency.full_name(),
                component: site.component(),
                field: site.field(),
            });
        }

        debug!(
            "注入依赖 {} 到 <{}.{}>",
            dependency.full_name(),
            site.component,
            site.field.name
        );
        Ok(resolved)
    }

    fn process_configuration(
        &self,
        site: &FieldSite<'_>,
        tag: &Tag,
        pending: &mut dyn PendingComponent,
    ) -> DependencyResult<()> {
        let unsupported = || DependencyError::UnsupportedConfigOptions {
            component: site.component(),
            field: site.field(),
        };
        let FieldKind::Value { value_type } = site.field.kind else {
            return Err(unsupported());
        };
        if tag.option_keys().any(|key| !CONFIG_OPTIONS.contains(&key)) {
            return Err(unsupported());
        }
        let key = match tag.option(OPTION_KEY) {
            Some(key) if !key.is_empty() => key,
            _ => return Err(unsupported()),
        };
        let fail_hard = tag.has_option(OPTION_PANIC);
        let failed = |reason: String| DependencyError::ConfigurationFailed {
            key: key.to_string(),
            component: site.component(),
            field: site.field(),
            reason,
        };

        let raw = self
            .config
            .get_value(key)
            .or_else(|| tag.option(OPTION_DEFAULT).map(str::to_string));
        let Some(raw) = raw else {
            if fail_hard {
                return Err(failed("未找到配置值".to_string()));
            }
            warn!(
                "未找到配置值 {} <{}.{}>",
                key, site.component, site.field.name
            );
            return Ok(());
        };

        match pending.configure(site.index, &raw) {
            Ok(true) => debug!("设置配置 {}={} <{}.{}>", key, raw, site.component, site.field.name),
            Ok(false) => debug!(
                "字段已有值，忽略配置 {} <{}.{}>",
                key, site.component, site.field.name
            ),
            Err(err) if fail_hard => return Err(failed(err.to_string())),
            Err(err) => warn!(
                "无法将配置值 {} 解析为 {}: {} <{}.{}>",
                raw, value_type, err, site.component, site.field.name
            ),
        }
        Ok(())
    }
}
