//! `FaultCatalog` generation for fieldless enums.
//!
//! Each variant becomes one `FaultKind` entry in a `const` slice, in
//! declaration order. `kind` indexes that slice, so every descriptor is a
//! `&'static` borrow and no runtime registry exists.

use std::collections::BTreeMap;

use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Data, DeriveInput, Fields, Result};

use crate::{
    container::parse_container_options, crate_path, template::validate_template,
    variant::parse_variant_options,
};

pub(crate) fn derive_catalog(input: DeriveInput) -> Result<TokenStream> {
    let DeriveInput {
        ident,
        generics,
        data,
        attrs,
        ..
    } = input;

    let data = match data {
        Data::Enum(data) => data,
        Data::Struct(data) => {
            return Err(syn::Error::new(
                data.struct_token.span(),
                "`FaultCatalog` can only be derived for enums",
            ))
        }
        Data::Union(data) => {
            return Err(syn::Error::new(
                data.union_token.span(),
                "`FaultCatalog` can only be derived for enums",
            ))
        }
    };

    if !generics.params.is_empty() {
        return Err(syn::Error::new(
            generics.span(),
            "`FaultCatalog` cannot be derived for generic enums",
        ));
    }

    let container = parse_container_options(&attrs)?;
    let fault_kind = crate_path("FaultKind");
    let fault_catalog = crate_path("FaultCatalog");

    let mut kinds = Vec::new();
    let mut variants = Vec::new();
    let mut arms = Vec::new();
    let mut seen_names: BTreeMap<String, syn::Ident> = BTreeMap::new();

    for (index, variant) in data.variants.iter().enumerate() {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new(
                variant.fields.span(),
                "fault variants cannot carry data; supply values as fault fields instead",
            ));
        }

        let variant_ident = &variant.ident;
        let resolved = parse_variant_options(&variant.attrs)?.resolve(
            variant_ident,
            &variant.attrs,
            &container,
        )?;
        validate_template(&resolved.template)?;

        if let Some(previous) = seen_names.insert(resolved.name.clone(), variant_ident.clone()) {
            return Err(syn::Error::new(
                variant_ident.span(),
                format!(
                    "fault name `{}` is already used by variant `{previous}`",
                    resolved.name
                ),
            ));
        }

        let name = &resolved.name;
        let template = &resolved.template;
        let code = resolved.code;
        let safe = resolved.safe;
        kinds.push(quote! {
            #fault_kind::new(#name, #template, #code).with_safe(#safe)
        });
        variants.push(quote! { Self::#variant_ident });
        arms.push(quote! { Self::#variant_ident => &Self::KINDS[#index] });
    }

    // An empty enum has no values, so `kind` can never be called.
    let kind_body = if arms.is_empty() {
        quote! { match *self {} }
    } else {
        quote! {
            match self {
                #(#arms,)*
            }
        }
    };

    Ok(quote! {
        impl #fault_catalog for #ident {
            const KINDS: &'static [#fault_kind] = &[#(#kinds),*];
            const VARIANTS: &'static [Self] = &[#(#variants),*];

            fn kind(&self) -> &'static #fault_kind {
                #kind_body
            }
        }
    })
}
