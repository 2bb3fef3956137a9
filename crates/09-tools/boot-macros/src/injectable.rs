//! `Injectable` 派生宏实现

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_quote, punctuated::Punctuated, Data, DeriveInput, Field, Fields, Meta, Path, Result,
    Token, Type,
};

use crate::utils::{boot_attributes, lit_str, reference_target};

/// 结构体级别的 `#[boot(...)]` 参数
struct StructArgs {
    krate: Path,
    exports: Vec<Type>,
}

impl StructArgs {
    fn parse(input: &DeriveInput) -> Result<Self> {
        let mut args = Self {
            krate: parse_quote!(::boot),
            exports: Vec::new(),
        };

        for attr in boot_attributes(&input.attrs) {
            let parsed = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
            for meta in parsed {
                match meta {
                    Meta::NameValue(nv) if nv.path.is_ident("export") => {
                        args.exports.push(lit_str(&nv.value)?.parse::<Type>()?);
                    }
                    Meta::NameValue(nv) if nv.path.is_ident("crate") => {
                        args.krate = lit_str(&nv.value)?.parse::<Path>()?;
                    }
                    other => {
                        return Err(syn::Error::new_spanned(
                            other,
                            "不支持的 boot 属性，可用的属性为 export 和 crate",
                        ));
                    }
                }
            }
        }

        Ok(args)
    }
}

pub fn derive_injectable_impl(input: DeriveInput) -> TokenStream {
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> Result<TokenStream2> {
    let args = StructArgs::parse(input)?;
    let krate = &args.krate;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Injectable 只能用于具名字段结构体",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Injectable 只能用于结构体",
            ));
        }
    };

    let mut descriptors = Vec::new();
    for field in fields {
        if let Some(descriptor) = field_descriptor(field)? {
            descriptors.push(descriptor);
        }
    }

    let exports = args.exports.iter().map(|target| {
        quote! {
            exports.export::<#target>(|component| component as ::std::sync::Arc<#target>);
        }
    });

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #krate::Injectable for #name #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn describe(fields: &mut #krate::Fields<Self>) {
                #(#descriptors)*
            }

            #[allow(unused_variables)]
            fn export(exports: &mut #krate::Exports<Self>) {
                #(#exports)*
            }
        }
    })
}

/// 为带有 `#[boot("...")]` 的字段生成描述语句
fn field_descriptor(field: &Field) -> Result<Option<TokenStream2>> {
    let mut attrs = boot_attributes(&field.attrs);
    let Some(attr) = attrs.next() else {
        return Ok(None);
    };
    if let Some(duplicate) = attrs.next() {
        return Err(syn::Error::new_spanned(duplicate, "每个字段只能有一个 boot 标签"));
    }

    let tag: syn::LitStr = attr.parse_args()?;
    let Some(ident) = field.ident.as_ref() else {
        return Ok(None);
    };
    let field_name = ident.to_string();

    let descriptor = match reference_target(&field.ty) {
        Some(target) => quote! {
            fields.reference::<#target>(#field_name, #tag, |component, value| {
                component.#ident = ::std::option::Option::Some(value);
            });
        },
        None => {
            let ty = &field.ty;
            quote! {
                fields.value::<#ty>(#field_name, #tag, |component| &mut component.#ident);
            }
        }
    };
    Ok(Some(descriptor))
}
