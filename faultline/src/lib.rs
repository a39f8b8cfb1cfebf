//! Structured faults and failure-reporting call wrappers.
//!
//! This crate separates:
//! - **Faults**: what went wrong, as a variant descriptor plus named fields.
//! - **Reporting**: who gets told when a wrapped call fails.
//!
//! Key rules:
//! - A fault's message is rendered on demand from a `%(name)s` template. The
//!   local rendering never includes anything but the template and its fields.
//! - A template that references a missing field is a formatting failure.
//!   [`Settings`] decides whether that failure is returned or replaced by the
//!   raw template.
//! - Every variant's default code is recorded under the `code` field; an
//!   explicit `code` wins.
//! - Fields whose names contain `pass` are stripped before anything is handed
//!   to a notifier.
//! - A wrapped call returns exactly what the callable returned, `Ok` or `Err`.
//!   Reporting is a side effect only.
//!
//! What this crate does:
//! - defines [`Fault`], [`FaultKind`] descriptors and the [`FaultCatalog`] registry
//! - defines the [`Notifier`] port with no-op and `slog`-backed implementations
//! - wraps callables with [`ExceptionWrapper`]
//!
//! What it does not do:
//! - deliver notifications anywhere but a logger
//! - load configuration, retry calls, or serialize faults for re-raising
//!
//! The `FaultCatalog` and `CallArgs` derive macros live in `faultline-derive`
//! and are re-exported here.

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
    clippy::option_if_let_else,
    clippy::new_without_default
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

pub use faultline_derive::{CallArgs, FaultCatalog};

#[allow(unused_extern_crates)]
extern crate self as faultline;

// Module declarations
mod fault;
mod fields;
mod notify;
mod sanitize;
mod settings;
mod template;
mod wrap;

// Re-exports
pub use fault::{Fault, FaultCatalog, FaultKind, CODE_FIELD};
pub use fields::{FieldValue, Fields, ToFieldValue};
pub use notify::{
    ExceptionDescriptor, LogNotifier, NoopNotifier, Notifier, NotifyError, Payload, PayloadJson,
    Priority,
};
pub use sanitize::{is_sensitive_name, sanitize, SENSITIVE_MARKER};
pub use settings::{FormatOptions, Settings};
pub use template::{Template, TemplateError};
pub use wrap::{wrap_exception, CallArgs, ExceptionWrapper, Wrapped};
