//! Derive macros for `faultline`.
//!
//! This crate generates:
//! - `FaultCatalog` impls for fieldless enums, turning `#[fault(...)]`
//!   attributes and doc comments into a static table of `FaultKind`s
//! - `CallArgs` impls for argument structs, locating the context field and
//!   describing the remaining fields
//!
//! Message templates are checked here, at compile time. Rendering happens at
//! runtime in the main `faultline` crate.

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::default_trait_access,
    clippy::doc_markdown,
    clippy::if_not_else,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::option_if_let_else
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

#[allow(unused_extern_crates)]
extern crate proc_macro;

use proc_macro_crate::{crate_name, FoundCrate};
use quote::{format_ident, quote};
use syn::{parse_macro_input, DeriveInput};

mod call_attr;
mod container;
mod derive_call_args;
mod derive_catalog;
mod generics;
mod template;
mod variant;

use derive_call_args::derive_call_args;
use derive_catalog::derive_catalog;

/// Derives `faultline::FaultCatalog` for a fieldless enum.
///
/// # Container Attributes
///
/// - `#[fault(code = 400)]` - Default code for every variant (otherwise 500).
/// - `#[fault(safe)]` - Marks every variant's message as fit for end users.
///
/// # Variant Attributes
///
/// - `#[fault(message = "Volume %(volume_id)s is not attached")]` - The
///   message template. Without it, the variant's doc comment is the template.
/// - `#[fault(code = 404)]` - Overrides the container default code.
/// - `#[fault(safe)]` - Marks this variant's message as fit for end users.
/// - `#[fault(name = "NotFound")]` - Overrides the variant name reported in
///   payloads (defaults to the variant identifier).
///
/// Templates are parsed at compile time: a malformed placeholder, a variant
/// with fields, or a variant with neither a message nor a doc comment is a
/// compile error.
#[proc_macro_derive(FaultCatalog, attributes(fault))]
pub fn derive_fault_catalog(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_catalog(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Derives `faultline::CallArgs` for a struct with named fields.
///
/// # Field Attributes
///
/// - `#[call(context)]` - This field is the context handed to the notifier. A
///   `&T` field provides a `T` context. At most one field may be marked.
/// - `#[call(skip)]` - Leave the field out of the payload description.
/// - `#[call(debug)]` - Describe the field with its `Debug` rendering instead
///   of `ToFieldValue`.
///
/// Unmarked fields are described through `faultline::ToFieldValue` under
/// their own names. The wrapper sanitizes the description, so fields such as
/// `admin_password` never reach a notifier.
#[proc_macro_derive(CallArgs, attributes(call))]
pub fn derive_call_args_entry(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_call_args(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Returns the token stream to reference the faultline crate root.
///
/// Handles crate renaming (e.g., `faults = { package = "faultline", ... }`).
/// Inside `faultline` itself the crate is reachable as `::faultline` through
/// its `extern crate self as faultline;` alias.
fn crate_root() -> proc_macro2::TokenStream {
    match crate_name("faultline") {
        Ok(FoundCrate::Name(name)) => {
            let ident = format_ident!("{}", name);
            quote! { ::#ident }
        }
        Ok(FoundCrate::Itself) | Err(_) => quote! { ::faultline },
    }
}

fn crate_path(item: &str) -> proc_macro2::TokenStream {
    let root = crate_root();
    let item_ident = format_ident!("{}", item);
    quote! { #root::#item_ident }
}
