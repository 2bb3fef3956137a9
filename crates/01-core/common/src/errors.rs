//! 错误类型定义

use thiserror::Error;

/// 标签解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("无法解析的标签: `{raw}`")]
pub struct TagParseError {
    /// 原始标签文本
    pub raw: String,
}

/// 配置错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("配置类型转换失败: 无法将 `{value}` 转换为 {target_type}: {message}")]
    TypeConversionError {
        value: String,
        target_type: &'static str,
        message: String,
    },
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("字段包含无法解析的标签 <{component}.{field} `{tag}`>")]
    UnparsableTag {
        component: String,
        field: String,
        tag: String,
    },

    #[error("依赖字段包含不支持的指令 <{component}.{field} `{tag}`>")]
    UnsupportedDirective {
        component: String,
        field: String,
        tag: String,
    },

    #[error("依赖字段不是引用类型 <{component}.{field}>")]
    NotAReference { component: String, field: String },

    #[error("未找到依赖 <{name}:{component}.{field}>")]
    DependencyNotFound {
        name: String,
        component: String,
        field: String,
    },

    #[error("找到多个依赖 <{name}:{component}.{field}>: {candidates:?}")]
    AmbiguousDependency {
        name: String,
        component: String,
        field: String,
        candidates: Vec<String>,
    },

    #[error("依赖 {dependency} 初始化失败，无法注入 <{component}.{field}>")]
    DependencyFailed {
        dependency: String,
        component: String,
        field: String,
    },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("不支持的配置选项 <{component}.{field}>")]
    UnsupportedConfigOptions { component: String, field: String },

    #[error("加载配置值失败 {key} <{component}.{field}>: {reason}")]
    ConfigurationFailed {
        key: String,
        component: String,
        field: String,
        reason: String,
    },

    #[error("初始化 {component} 失败: {message}")]
    InitializationFailed { component: String, message: String },

    #[error("组件 {type_name} 已经以名称 '{name}' 注册")]
    DuplicateComponent { type_name: String, name: String },
}

/// 依赖注入结果类型
pub type DependencyResult<T> = Result<T, DependencyError>;
