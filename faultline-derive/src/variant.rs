//! Variant-level attribute parsing for `#[derive(FaultCatalog)]`.
//!
//! A variant's template comes from `#[fault(message = "...")]` or, failing
//! that, from its doc comment. Everything else falls back to the container.

use proc_macro2::Span;
use syn::{meta::ParseNestedMeta, Attribute, LitBool, LitInt, LitStr, Meta, Result, Token};

use crate::container::ContainerOptions;

/// Options parsed from one variant's `#[fault(...)]` attributes, before the
/// container defaults are applied.
#[derive(Clone, Debug, Default)]
pub(crate) struct VariantOptions {
    pub(crate) message: Option<LitStr>,
    pub(crate) code: Option<i64>,
    pub(crate) safe: Option<bool>,
    pub(crate) name: Option<LitStr>,
}

/// A variant's fully resolved descriptor inputs.
#[derive(Clone, Debug)]
pub(crate) struct ResolvedVariant {
    pub(crate) name: String,
    pub(crate) template: LitStr,
    pub(crate) code: i64,
    pub(crate) safe: bool,
}

pub(crate) fn parse_variant_options(attrs: &[Attribute]) -> Result<VariantOptions> {
    let mut options = VariantOptions::default();

    for attr in attrs {
        if !attr.path().is_ident("fault") {
            continue;
        }

        let Meta::List(list) = &attr.meta else {
            return Err(syn::Error::new_spanned(
                attr,
                "expected #[fault(...)] with at least one option",
            ));
        };

        list.parse_nested_meta(|meta| {
            if meta.path.is_ident("message") {
                set_once(&mut options.message, meta.value()?.parse()?, &meta, "message")
            } else if meta.path.is_ident("code") {
                let code = parse_code(&meta)?;
                set_once(&mut options.code, code, &meta, "code")
            } else if meta.path.is_ident("safe") {
                let safe = parse_flag(&meta)?;
                set_once(&mut options.safe, safe, &meta, "safe")
            } else if meta.path.is_ident("name") {
                set_once(&mut options.name, meta.value()?.parse()?, &meta, "name")
            } else {
                Err(meta.error(format!(
                    "unknown variant option `{}`; expected `message`, `code`, `safe` or `name`",
                    meta.path
                        .get_ident()
                        .map_or_else(|| "?".to_string(), ToString::to_string)
                )))
            }
        })?;
    }

    Ok(options)
}

impl VariantOptions {
    /// Applies container defaults. `ident` names the variant and anchors
    /// errors when no template can be found.
    pub(crate) fn resolve(
        self,
        ident: &syn::Ident,
        attrs: &[Attribute],
        container: &ContainerOptions,
    ) -> Result<ResolvedVariant> {
        let template = match self.message {
            Some(message) => message,
            None => doc_template_from_attrs(attrs).ok_or_else(|| {
                syn::Error::new(
                    ident.span(),
                    "missing fault message: add #[fault(message = \"...\")] or a doc comment",
                )
            })?,
        };
        Ok(ResolvedVariant {
            name: self
                .name
                .map_or_else(|| ident.to_string(), |name| name.value()),
            template,
            code: self.code.unwrap_or(container.code),
            safe: self.safe.unwrap_or(container.safe),
        })
    }
}

fn set_once<T>(
    target: &mut Option<T>,
    value: T,
    meta: &ParseNestedMeta<'_>,
    option: &str,
) -> Result<()> {
    if target.is_some() {
        return Err(meta.error(format!("duplicate `{option}` option")));
    }
    *target = Some(value);
    Ok(())
}

/// Parses `code = N`, allowing a leading minus sign.
pub(crate) fn parse_code(meta: &ParseNestedMeta<'_>) -> Result<i64> {
    let value = meta.value()?;
    let negative = value.peek(Token![-]);
    if negative {
        value.parse::<Token![-]>()?;
    }
    let lit: LitInt = value.parse()?;
    let code: i64 = lit.base10_parse()?;
    Ok(if negative { -code } else { code })
}

/// Parses a bare `flag` or `flag = true|false`.
pub(crate) fn parse_flag(meta: &ParseNestedMeta<'_>) -> Result<bool> {
    if meta.input.peek(Token![=]) {
        let lit: LitBool = meta.value()?.parse()?;
        Ok(lit.value)
    } else {
        Ok(true)
    }
}

/// Joins a variant's doc comment lines into a template.
fn doc_template_from_attrs(attrs: &[Attribute]) -> Option<LitStr> {
    let mut lines = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("doc") {
            continue;
        }
        if let Meta::NameValue(value) = &attr.meta {
            if let syn::Expr::Lit(expr) = &value.value {
                if let syn::Lit::Str(lit) = &expr.lit {
                    lines.push(lit.value().trim().to_string());
                }
            }
        }
    }
    let text = lines.join(" ");
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(LitStr::new(text, Span::call_site()))
}
