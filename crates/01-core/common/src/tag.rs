//! 字段指令标签解析
//!
//! 标签语法：
//!
//! ```text
//! tag        := directive ("," option)*
//! directive  := "wire" | "config"
//! option     := key [ ":" value ]
//! key        := "name" | "key" | "panic" | "default"
//! value      := 任意文本，可以用单引号包裹以包含 ',' 或 ':'
//! ```
//!
//! 解析器只负责结构，指令和选项名称的合法性由解析器的使用者检查。

use crate::errors::TagParseError;
use std::fmt;
use std::str::FromStr;

/// 标签中使用的引号字符
pub const QUOTE: char = '\'';
/// 选项分隔符
pub const OPTION_SEPARATOR: char = ',';
/// 键值分隔符
pub const VALUE_SEPARATOR: char = ':';

/// 按分隔符拆分文本，引号内的分隔符不拆分
///
/// 一个片段中出现奇数个引号时开启或关闭引用区间。文本结束时引用区间仍未关闭，
/// 返回 `None`。不支持转义引号本身。
///
/// ```
/// use boot_common::split;
///
/// assert_eq!(
///     split("'a,b',c", ',', '\''),
///     Some(vec!["'a,b'".to_string(), "c".to_string()])
/// );
/// assert_eq!(split("a,b'", ',', '\''), None);
/// ```
pub fn split(text: &str, separator: char, quote: char) -> Option<Vec<String>> {
    let mut tokens = Vec::new();
    let mut quoted: Option<String> = None;

    for token in text.split(separator) {
        let toggles = token.matches(quote).count() % 2 == 1;
        quoted = match quoted.take() {
            None if toggles => Some(token.to_string()),
            None => {
                tokens.push(token.to_string());
                None
            }
            Some(mut summarized) => {
                summarized.push(separator);
                summarized.push_str(token);
                if toggles {
                    tokens.push(summarized);
                    None
                } else {
                    Some(summarized)
                }
            }
        };
    }

    match quoted {
        Some(_) => None,
        None => Some(tokens),
    }
}

/// 解析标签，格式错误时返回 `None`
pub fn parse_tag(raw: &str) -> Option<Tag> {
    raw.parse().ok()
}

/// 标签选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagOption {
    /// 选项名称
    pub key: String,
    /// 选项值，仅有名称的选项为空字符串
    pub value: String,
}

impl TagOption {
    /// 创建新的标签选项
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// 已解析的字段指令标签
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// 指令名称，例如 `wire` 或 `config`
    pub name: String,
    /// 按出现顺序排列的选项
    pub options: Vec<TagOption>,
}

impl Tag {
    /// 获取选项值，同名选项取第一个
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|option| option.key == key)
            .map(|option| option.value.as_str())
    }

    /// 检查是否存在选项
    pub fn has_option(&self, key: &str) -> bool {
        self.options.iter().any(|option| option.key == key)
    }

    /// 所有选项名称
    pub fn option_keys(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|option| option.key.as_str())
    }
}

fn trim_value(value: &str) -> &str {
    value.trim_matches(|c: char| c == QUOTE || c.is_whitespace())
}

impl FromStr for Tag {
    type Err = TagParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let malformed = || TagParseError {
            raw: raw.to_string(),
        };

        let tokens = split(raw, OPTION_SEPARATOR, QUOTE).ok_or_else(malformed)?;
        let mut tokens = tokens.into_iter();
        let name = tokens
            .next()
            .map(|token| token.trim().to_string())
            .unwrap_or_default();
        if name.is_empty() {
            return Err(malformed());
        }

        let mut options = Vec::new();
        for token in tokens {
            let pieces = split(&token, VALUE_SEPARATOR, QUOTE).ok_or_else(malformed)?;
            let option = match pieces.as_slice() {
                [key] => TagOption::new(key.trim(), ""),
                [key, value] => TagOption::new(key.trim(), trim_value(value)),
                _ => return Err(malformed()),
            };
            if option.key.is_empty() {
                return Err(malformed());
            }
            options.push(option);
        }

        Ok(Self { name, options })
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for option in &self.options {
            write!(f, "{}{}", OPTION_SEPARATOR, option.key)?;
            if option.value.is_empty() {
                continue;
            }
            let needs_quotes = !option.value.contains(QUOTE)
                && option
                    .value
                    .contains(|c: char| c == OPTION_SEPARATOR || c == VALUE_SEPARATOR);
            if needs_quotes {
                write!(f, "{}{}{}{}", VALUE_SEPARATOR, QUOTE, option.value, QUOTE)?;
            } else {
                write!(f, "{}{}", VALUE_SEPARATOR, option.value)?;
            }
        }
        Ok(())
    }
}
