//! 宏工具函数

use syn::{Attribute, Expr, GenericArgument, Lit, LitStr, PathArguments, Result, Type};

/// 当 `ty` 的最后一段名为 `wrapper` 时，返回它的第一个泛型类型参数
pub fn generic_argument<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    match &segment.arguments {
        PathArguments::AngleBracketed(args) => args.args.iter().find_map(|arg| match arg {
            GenericArgument::Type(inner) => Some(inner),
            _ => None,
        }),
        _ => None,
    }
}

/// 对于 `Option<Arc<U>>` 返回 `U`
pub fn reference_target(ty: &Type) -> Option<&Type> {
    generic_argument(ty, "Option").and_then(|inner| generic_argument(inner, "Arc"))
}

/// 属性值必须是字符串字面量
pub fn lit_str(expr: &Expr) -> Result<LitStr> {
    match expr {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            Lit::Str(lit_str) => Ok(lit_str.clone()),
            other => Err(syn::Error::new_spanned(other, "需要字符串字面量")),
        },
        other => Err(syn::Error::new_spanned(other, "需要字符串字面量")),
    }
}

/// 所有 `#[boot(...)]` 属性
pub fn boot_attributes(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|attr| attr.path().is_ident("boot"))
}
