//! 配置提供者实现

use crate::provider::ConfigProvider;
use std::collections::HashMap;
use tracing::debug;

/// 命令行参数配置提供者
///
/// 识别相邻的两个参数 `--<key> <value>`，同一个键出现多次时取第一个。
#[derive(Debug, Clone)]
pub struct CommandLineConfigProvider {
    args: Vec<String>,
    priority: i32,
}

impl CommandLineConfigProvider {
    /// 使用给定参数创建提供者，参数中不应包含程序名
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            priority: 200, // 命令行参数最高优先级
        }
    }

    /// 使用当前进程的命令行参数创建提供者
    pub fn from_env() -> Self {
        Self::new(std::env::args().skip(1))
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl ConfigProvider for CommandLineConfigProvider {
    fn get_value(&self, key: &str) -> Option<String> {
        let flag = format!("--{}", key);
        self.args
            .windows(2)
            .find(|pair| pair[0] == flag)
            .map(|pair| pair[1].clone())
    }

    fn name(&self) -> &str {
        "command-line"
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// 环境变量配置提供者
///
/// 查询时读取环境变量，可以设置统一的前缀。
#[derive(Debug, Clone)]
pub struct EnvironmentConfigProvider {
    prefix: Option<String>,
    priority: i32,
}

impl EnvironmentConfigProvider {
    /// 创建新的环境变量配置提供者
    pub fn new() -> Self {
        Self {
            prefix: None,
            priority: 100,
        }
    }

    /// 设置环境变量前缀，例如 `APP_`
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    fn env_key(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, key),
            None => key.to_string(),
        }
    }
}

impl Default for EnvironmentConfigProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigProvider for EnvironmentConfigProvider {
    fn get_value(&self, key: &str) -> Option<String> {
        std::env::var(self.env_key(key)).ok()
    }

    fn name(&self) -> &str {
        "environment"
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// 内存配置提供者
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigProvider {
    values: HashMap<String, String>,
    priority: i32,
}

impl MemoryConfigProvider {
    /// 创建空的内存配置提供者
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加配置值
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// 设置配置值
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn get_value(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn name(&self) -> &str {
        "memory"
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// 组合配置提供者
///
/// 按优先级从高到低依次查询，返回第一个找到的值。优先级相同时按添加顺序。
#[derive(Default)]
pub struct CompositeConfigProvider {
    providers: Vec<Box<dyn ConfigProvider>>,
}

impl CompositeConfigProvider {
    /// 创建空的组合提供者
    pub fn new() -> Self {
        Self::default()
    }

    /// 标准查找链：命令行参数，然后是环境变量
    pub fn standard() -> Self {
        Self::new()
            .with_provider(CommandLineConfigProvider::from_env())
            .with_provider(EnvironmentConfigProvider::new())
    }

    /// 添加配置提供者
    pub fn with_provider(mut self, provider: impl ConfigProvider + 'static) -> Self {
        self.add_provider(Box::new(provider));
        self
    }

    /// 添加配置提供者
    pub fn add_provider(&mut self, provider: Box<dyn ConfigProvider>) {
        debug!(
            "注册配置提供者: {} (优先级: {})",
            provider.name(),
            provider.priority()
        );
        let position = self
            .providers
            .iter()
            .position(|existing| existing.priority() < provider.priority())
            .unwrap_or(self.providers.len());
        self.providers.insert(position, provider);
    }

    /// 查找配置值并返回提供该值的提供者名称
    pub fn lookup(&self, key: &str) -> Option<(String, &str)> {
        self.providers.iter().find_map(|provider| {
            provider
                .get_value(key)
                .map(|value| (value, provider.name()))
        })
    }

    /// 已注册的提供者名称，按查询顺序排列
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|provider| provider.name()).collect()
    }
}

impl ConfigProvider for CompositeConfigProvider {
    fn get_value(&self, key: &str) -> Option<String> {
        self.lookup(key).map(|(value, source)| {
            debug!("配置 {} 由 {} 提供", key, source);
            value
        })
    }

    fn name(&self) -> &str {
        "composite"
    }
}
