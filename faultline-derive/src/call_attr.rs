//! Parsing of `#[call(...)]` field attributes.

use proc_macro2::Span;
use syn::{spanned::Spanned, Attribute, Meta, Result};

/// How `#[derive(CallArgs)]` treats one field.
///
/// | Attribute | Role |
/// |-----------|------|
/// | None | `Describe` |
/// | `#[call(context)]` | `Context` |
/// | `#[call(skip)]` | `Skip` |
/// | `#[call(debug)]` | `Debug` |
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FieldRole {
    /// Described through `ToFieldValue`.
    Describe,
    /// Described through its `Debug` rendering.
    Debug,
    /// Handed to the notifier, never described.
    Context,
    /// Neither described nor handed over.
    Skip,
}

fn set_role(target: &mut Option<FieldRole>, next: FieldRole, span: Span) -> Result<()> {
    if target.is_some() {
        return Err(syn::Error::new(
            span,
            "multiple #[call] options specified on the same field",
        ));
    }
    *target = Some(next);
    Ok(())
}

pub(crate) fn parse_field_role(attrs: &[Attribute]) -> Result<FieldRole> {
    let mut role: Option<FieldRole> = None;
    for attr in attrs {
        if !attr.path().is_ident("call") {
            continue;
        }

        let Meta::List(list) = &attr.meta else {
            return Err(syn::Error::new(
                attr.span(),
                "expected #[call(context)], #[call(skip)] or #[call(debug)]",
            ));
        };

        list.parse_nested_meta(|meta| {
            let next = if meta.path.is_ident("context") {
                FieldRole::Context
            } else if meta.path.is_ident("skip") {
                FieldRole::Skip
            } else if meta.path.is_ident("debug") {
                FieldRole::Debug
            } else {
                return Err(meta.error("unknown field option; expected `context`, `skip` or `debug`"));
            };
            set_role(&mut role, next, meta.path.span())
        })?;
    }

    Ok(role.unwrap_or(FieldRole::Describe))
}

#[cfg(test)]
mod tests {
    use quote::quote;
    use syn::DeriveInput;

    use super::*;

    fn parse_attrs(tokens: proc_macro2::TokenStream) -> Vec<Attribute> {
        let input: DeriveInput = syn::parse2(quote! {
            #tokens
            struct Dummy;
        })
        .expect("should parse as DeriveInput");
        input.attrs
    }

    #[test]
    fn no_attribute_describes() {
        let role = parse_field_role(&parse_attrs(quote! {})).unwrap();
        assert_eq!(role, FieldRole::Describe);
    }

    #[test]
    fn each_option_maps_to_a_role() {
        let cases = [
            (quote! { #[call(context)] }, FieldRole::Context),
            (quote! { #[call(skip)] }, FieldRole::Skip),
            (quote! { #[call(debug)] }, FieldRole::Debug),
        ];
        for (tokens, expected) in cases {
            assert_eq!(parse_field_role(&parse_attrs(tokens)).unwrap(), expected);
        }
    }

    #[test]
    fn conflicting_options_error() {
        let result = parse_field_role(&parse_attrs(quote! { #[call(skip)] #[call(debug)] }));
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("multiple #[call] options"));
    }

    #[test]
    fn unknown_option_errors() {
        let result = parse_field_role(&parse_attrs(quote! { #[call(redact)] }));
        assert!(result.unwrap_err().to_string().contains("unknown field option"));
    }

    #[test]
    fn bare_call_errors() {
        assert!(parse_field_role(&parse_attrs(quote! { #[call] })).is_err());
    }
}
