//! 可注入组件 trait

use crate::descriptor::{Exports, Fields};
use boot_common::Component;

/// 可注入组件
///
/// 描述组件的注入字段和导出类型。没有注入字段的组件只需要一个空实现：
///
/// ```
/// use boot_common::Component;
/// use boot_di::Injectable;
///
/// struct Clock;
/// impl Component for Clock {}
/// impl Injectable for Clock {}
/// ```
///
/// 通常使用 `#[derive(Injectable)]` 根据 `#[boot("...")]` 字段属性生成实现。
pub trait Injectable: Component + Sized {
    /// 声明需要注入的字段
    fn describe(fields: &mut Fields<Self>) {
        let _ = fields;
    }

    /// 声明组件除自身类型外还可以作为哪些类型被注入
    fn export(exports: &mut Exports<Self>) {
        let _ = exports;
    }
}
