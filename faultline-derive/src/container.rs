//! Container-level attribute parsing for `#[derive(FaultCatalog)]`.
//!
//! This module handles attributes on the enum itself, not on variants.

use syn::{Attribute, Meta, Result};

use crate::variant::{parse_code, parse_flag};

/// Default code when neither the container nor the variant declares one.
pub(crate) const DEFAULT_CODE: i64 = 500;

/// Options parsed from container-level `#[fault(...)]` attributes.
#[derive(Clone, Debug)]
pub(crate) struct ContainerOptions {
    /// Code inherited by variants without their own `code`.
    pub(crate) code: i64,
    /// Whether variants are safe to show unless they say otherwise.
    pub(crate) safe: bool,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            code: DEFAULT_CODE,
            safe: false,
        }
    }
}

/// Parses container-level `#[fault(...)]` attributes.
pub(crate) fn parse_container_options(attrs: &[Attribute]) -> Result<ContainerOptions> {
    let mut options = ContainerOptions::default();

    for attr in attrs {
        if !attr.path().is_ident("fault") {
            continue;
        }

        match &attr.meta {
            Meta::Path(_) => {
                // Bare #[fault] on the container carries no options
            }
            Meta::List(list) => {
                list.parse_nested_meta(|meta| {
                    if meta.path.is_ident("code") {
                        options.code = parse_code(&meta)?;
                        Ok(())
                    } else if meta.path.is_ident("safe") {
                        options.safe = parse_flag(&meta)?;
                        Ok(())
                    } else {
                        Err(meta.error(format!(
                            "unknown container option `{}`; expected `code` or `safe`",
                            meta.path
                                .get_ident()
                                .map_or_else(|| "?".to_string(), ToString::to_string)
                        )))
                    }
                })?;
            }
            Meta::NameValue(nv) => {
                return Err(syn::Error::new_spanned(
                    nv,
                    "name-value syntax is not supported for container-level #[fault]",
                ));
            }
        }
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use quote::quote;
    use syn::DeriveInput;

    use super::*;

    fn parse_attrs(tokens: proc_macro2::TokenStream) -> Vec<Attribute> {
        let input: DeriveInput = syn::parse2(quote! {
            #tokens
            enum Dummy {}
        })
        .expect("should parse as DeriveInput");
        input.attrs
    }

    #[test]
    fn no_attribute_returns_defaults() {
        let attrs = parse_attrs(quote! {});
        let options = parse_container_options(&attrs).unwrap();
        assert_eq!(options.code, 500);
        assert!(!options.safe);
    }

    #[test]
    fn code_and_safe_are_parsed() {
        let attrs = parse_attrs(quote! { #[fault(code = 404, safe)] });
        let options = parse_container_options(&attrs).unwrap();
        assert_eq!(options.code, 404);
        assert!(options.safe);
    }

    #[test]
    fn negative_code_is_accepted() {
        let attrs = parse_attrs(quote! { #[fault(code = -1)] });
        let options = parse_container_options(&attrs).unwrap();
        assert_eq!(options.code, -1);
    }

    #[test]
    fn unknown_option_errors() {
        let attrs = parse_attrs(quote! { #[fault(retry)] });
        let result = parse_container_options(&attrs);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("unknown container option"));
    }

    #[test]
    fn other_attributes_are_ignored() {
        let attrs = parse_attrs(quote! { #[derive(Debug)] #[fault] });
        let options = parse_container_options(&attrs).unwrap();
        assert_eq!(options.code, 500);
    }
}
