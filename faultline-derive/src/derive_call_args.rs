//! `CallArgs` generation for argument structs.
//!
//! The generated `fields` inserts every described field under its own name,
//! in declaration order. The generated `context` returns the marked field, or
//! `None` for any context type when no field is marked.

use proc_macro2::{Span, TokenStream};
use quote::{quote, quote_spanned};
use syn::{
    parse_quote, spanned::Spanned, Data, DeriveInput, Fields, GenericParam, Ident, Result, Type,
};

use crate::{
    call_attr::{parse_field_role, FieldRole},
    crate_path,
    generics::{add_bounds, collect_generics_from_type},
};

/// Context type parameter used when no field is marked `#[call(context)]`.
const ANY_CONTEXT: &str = "__FaultlineContext";

struct ContextField<'a> {
    ident: &'a Ident,
    ty: Type,
    borrowed: bool,
}

pub(crate) fn derive_call_args(input: DeriveInput) -> Result<TokenStream> {
    let DeriveInput {
        ident,
        generics,
        data,
        ..
    } = input;

    let named = match &data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            other => {
                return Err(syn::Error::new(
                    other.span(),
                    "`CallArgs` requires a struct with named fields",
                ))
            }
        },
        Data::Enum(data) => {
            return Err(syn::Error::new(
                data.enum_token.span(),
                "`CallArgs` can only be derived for structs",
            ))
        }
        Data::Union(data) => {
            return Err(syn::Error::new(
                data.union_token.span(),
                "`CallArgs` can only be derived for structs",
            ))
        }
    };

    let fields_path = crate_path("Fields");
    let field_value_path = crate_path("FieldValue");
    let to_field_value_path = crate_path("ToFieldValue");
    let call_args_path = crate_path("CallArgs");

    let mut context: Option<ContextField<'_>> = None;
    let mut inserts = Vec::new();
    let mut described_generics = Vec::new();
    let mut debug_generics = Vec::new();

    for field in named {
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };
        let name = field_ident.to_string();
        let span = field.span();
        match parse_field_role(&field.attrs)? {
            FieldRole::Describe => {
                collect_generics_from_type(&field.ty, &generics, &mut described_generics);
                inserts.push(quote_spanned! { span =>
                    fields.insert(#name, #to_field_value_path::to_field_value(&self.#field_ident));
                });
            }
            FieldRole::Debug => {
                collect_generics_from_type(&field.ty, &generics, &mut debug_generics);
                inserts.push(quote_spanned! { span =>
                    fields.insert(#name, #field_value_path::from_debug(&self.#field_ident));
                });
            }
            FieldRole::Context => {
                if context.is_some() {
                    return Err(syn::Error::new(
                        span,
                        "only one field can be marked #[call(context)]",
                    ));
                }
                let (ty, borrowed) = match &field.ty {
                    Type::Reference(reference) => ((*reference.elem).clone(), true),
                    other => (other.clone(), false),
                };
                context = Some(ContextField {
                    ident: field_ident,
                    ty,
                    borrowed,
                });
            }
            FieldRole::Skip => {}
        }
    }

    let generics = add_bounds(generics, &described_generics, &parse_quote!(#to_field_value_path));
    let generics = add_bounds(generics, &debug_generics, &parse_quote!(::core::fmt::Debug));

    let (context_ty, context_body, impl_generics_source) = match context {
        Some(ContextField {
            ident: field_ident,
            ty,
            borrowed,
        }) => {
            let body = if borrowed {
                quote! { ::core::option::Option::Some(&*self.#field_ident) }
            } else {
                quote! { ::core::option::Option::Some(&self.#field_ident) }
            };
            (quote! { #ty }, body, generics.clone())
        }
        None => {
            let any_context = Ident::new(ANY_CONTEXT, Span::call_site());
            let mut with_context = generics.clone();
            with_context
                .params
                .push(GenericParam::Type(parse_quote!(#any_context: ?::core::marker::Sized)));
            (
                quote! { #any_context },
                quote! { ::core::option::Option::None },
                with_context,
            )
        }
    };

    let (impl_generics, _, _) = impl_generics_source.split_for_impl();
    let (_, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #call_args_path<#context_ty> for #ident #ty_generics #where_clause {
            fn context(&self) -> ::core::option::Option<&#context_ty> {
                #context_body
            }

            fn fields(&self) -> #fields_path {
                let mut fields = #fields_path::new();
                #(#inserts)*
                fields
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use quote::quote;
    use syn::DeriveInput;

    use super::*;

    fn derive(tokens: TokenStream) -> Result<String> {
        let input: DeriveInput = syn::parse2(tokens).expect("should parse as DeriveInput");
        derive_call_args(input).map(|tokens| tokens.to_string())
    }

    #[test]
    fn borrowed_context_field_sets_the_context_type() {
        let output = derive(quote! {
            struct AttachArgs<'a> {
                #[call(context)]
                ctx: &'a RequestContext,
                instance_id: String,
                #[call(skip)]
                connection: Connection,
            }
        })
        .unwrap();

        assert!(output.contains("CallArgs < RequestContext > for AttachArgs < 'a >"));
        assert!(output.contains("Some (& * self . ctx)"));
        assert!(output.contains("\"instance_id\""));
        assert!(!output.contains("\"ctx\""));
        assert!(!output.contains("\"connection\""));
    }

    #[test]
    fn owned_context_field_is_borrowed() {
        let output = derive(quote! {
            struct AttachArgs {
                #[call(context)]
                ctx: RequestContext,
            }
        })
        .unwrap();
        assert!(output.contains("Some (& self . ctx)"));
    }

    #[test]
    fn missing_context_accepts_any_context_type() {
        let output = derive(quote! {
            struct AttachArgs<T> {
                volume: T,
                #[call(debug)]
                mode: Mode,
            }
        })
        .unwrap();
        assert!(output.contains("__FaultlineContext : ? :: core :: marker :: Sized"));
        assert!(output.contains("T : :: faultline :: ToFieldValue"));
        assert!(output.contains("from_debug"));
        assert!(output.contains("Option :: None"));
    }

    #[test]
    fn two_context_fields_are_rejected() {
        let err = derive(quote! {
            struct AttachArgs<'a> {
                #[call(context)]
                a: &'a RequestContext,
                #[call(context)]
                b: &'a RequestContext,
            }
        })
        .unwrap_err();
        assert!(err.to_string().contains("only one field"));
    }

    #[test]
    fn tuple_structs_and_enums_are_rejected() {
        let err = derive(quote! { struct AttachArgs(String); }).unwrap_err();
        assert!(err.to_string().contains("named fields"));
        let err = derive(quote! { enum AttachArgs { A } }).unwrap_err();
        assert!(err.to_string().contains("only be derived for structs"));
    }
}
