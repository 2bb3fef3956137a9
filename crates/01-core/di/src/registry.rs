//! 组件注册表

use crate::entry::ComponentEntry;
use crate::injectable::Injectable;
use boot_common::{DependencyError, DependencyResult, TypeInfo};
use boot_config::{CompositeConfigProvider, ConfigProvider};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::debug;

/// 组件注册表
///
/// 保存所有已创建的组件实例，每个（类型，名称）组合最多一个实例。
/// 条目按插入顺序保存，覆盖时保留原来的位置。
pub struct ComponentRegistry {
    pub(crate) entries: RwLock<Vec<Arc<ComponentEntry>>>,
    pub(crate) config: Arc<dyn ConfigProvider>,
    pub(crate) resolution: Mutex<()>,
}

impl ComponentRegistry {
    /// 使用标准配置查找链（命令行参数、环境变量）创建注册表
    pub fn new() -> Self {
        Self::with_config_provider(Arc::new(CompositeConfigProvider::standard()))
    }

    /// 使用指定的配置提供者创建注册表
    pub fn with_config_provider(config: Arc<dyn ConfigProvider>) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            config,
            resolution: Mutex::new(()),
        }
    }

    /// 添加组件实例
    ///
    /// 相同类型和名称的组件已存在时，`override_existing` 为 `true` 则替换，否则返回错误。
    pub fn add<T: Injectable>(
        &self,
        name: impl Into<String>,
        override_existing: bool,
        component: T,
    ) -> DependencyResult<Arc<ComponentEntry>> {
        let entry = Arc::new(ComponentEntry::new(name.into(), component));
        let mut entries = self.entries.write();

        let existing = entries
            .iter()
            .position(|e| e.type_info() == entry.type_info() && e.name() == entry.name());
        match existing {
            Some(index) if override_existing => {
                debug!("覆盖组件: {}", entry.full_name());
                entries[index] = Arc::clone(&entry);
            }
            Some(_) => {
                return Err(DependencyError::DuplicateComponent {
                    type_name: entry.type_info().type_name.to_string(),
                    name: entry.name().to_string(),
                });
            }
            None => {
                debug!("创建组件: {}", entry.full_name());
                entries.push(Arc::clone(&entry));
            }
        }
        Ok(entry)
    }

    /// 所有条目的快照，按插入顺序
    pub fn entries(&self) -> Vec<Arc<ComponentEntry>> {
        self.entries.read().clone()
    }

    /// 条目数量
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// 注册表是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// 按类型和名称查找条目
    pub fn find(&self, type_info: &TypeInfo, name: &str) -> Option<Arc<ComponentEntry>> {
        self.entries
            .read()
            .iter()
            .find(|e| e.type_info() == *type_info && e.name() == name)
            .cloned()
    }

    /// 查找以 `name` 注册并且可以作为 `U` 注入的已初始化组件
    pub fn lookup<U>(&self, name: &str) -> Option<Arc<U>>
    where
        U: ?Sized + Send + Sync + 'static,
    {
        self.entries()
            .into_iter()
            .filter(|e| e.name() == name)
            .find_map(|e| e.get::<U>())
    }

    /// 配置提供者
    pub fn config_provider(&self) -> &Arc<dyn ConfigProvider> {
        &self.config
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boot_common::Component;
    use boot_config::MemoryConfigProvider;

    #[derive(Debug, PartialEq)]
    struct Counter(u32);

    impl Component for Counter {}
    impl Injectable for Counter {}

    fn registry() -> ComponentRegistry {
        ComponentRegistry::with_config_provider(Arc::new(MemoryConfigProvider::new()))
    }

    #[test]
    fn test_duplicate_registration() {
        let registry = registry();
        registry.add("default", false, Counter(1)).unwrap();
        let err = registry.add("default", false, Counter(2)).unwrap_err();
        assert!(matches!(err, DependencyError::DuplicateComponent { .. }));

        registry.add("other", false, Counter(3)).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_override_keeps_position() {
        let registry = registry();
        registry.add("default", false, Counter(1)).unwrap();
        registry.add("second", false, Counter(2)).unwrap();
        registry.add("default", true, Counter(10)).unwrap();

        let names: Vec<_> = registry
            .entries()
            .iter()
            .map(|e| e.name().to_string())
            .collect();
        assert_eq!(names, vec!["default", "second"]);

        registry.resolve_all().unwrap();
        assert_eq!(registry.lookup::<Counter>("default").unwrap().0, 10);
    }

    #[test]
    fn test_lookup_before_initialization() {
        let registry = registry();
        registry.add("default", false, Counter(1)).unwrap();
        assert!(registry.lookup::<Counter>("default").is_none());
        assert!(registry
            .find(&TypeInfo::of::<Counter>(), "default")
            .is_some());
    }
}
