//! Structured faults: a variant descriptor plus the named fields of one
//! occurrence.
//!
//! A [`Fault`] is rendered on demand. The local rendering (`Display` and
//! [`Fault::format_message`]) only ever substitutes fields into the variant's
//! template, so internals never leak through the default path. A separate
//! remote detail can be attached for elevated-trust consumers and is only
//! returned by [`Fault::remote_message`].
//!
//! Code resolution follows one rule: the variant's default code is recorded
//! under `code` at construction, and an explicit `code` field replaces it.

mod kind;

use std::fmt;

use slog::error;

pub use kind::{FaultCatalog, FaultKind};

use crate::{
    fields::{FieldValue, Fields},
    sanitize::sanitize,
    settings::Settings,
    template::{self, TemplateError},
};

/// Name of the field that always carries the effective code.
pub const CODE_FIELD: &str = "code";

/// One occurrence of a fault variant.
#[derive(Clone, Debug)]
pub struct Fault {
    kind: &'static FaultKind,
    fields: Fields,
    message: Option<String>,
    remote_detail: Option<String>,
}

impl Fault {
    /// Starts a fault of `kind` whose only field is its default code.
    #[must_use]
    pub fn new(kind: &'static FaultKind) -> Self {
        let mut fields = Fields::new();
        fields.insert(CODE_FIELD, kind.code());
        Self {
            kind,
            fields,
            message: None,
            remote_detail: None,
        }
    }

    /// Starts a fault of `kind` from a prepared field mapping. An explicit
    /// `code` entry wins over the variant default.
    #[must_use]
    pub fn with_fields(kind: &'static FaultKind, fields: Fields) -> Self {
        let mut fault = Self::new(kind);
        fault.fields.extend(fields);
        fault
    }

    /// Adds one named field.
    #[must_use]
    pub fn with<K, V>(mut self, name: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(name, value);
        self
    }

    /// Replaces the template entirely with a fixed message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attaches the string returned to elevated-trust consumers, such as a
    /// full remote trace.
    #[must_use]
    pub fn with_remote_detail(mut self, detail: impl Into<String>) -> Self {
        self.remote_detail = Some(detail.into());
        self
    }

    #[must_use]
    pub fn kind(&self) -> &'static FaultKind {
        self.kind
    }

    #[must_use]
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// The effective code. A non-integer explicit `code` is kept verbatim in
    /// the fields, and the variant default is reported here instead.
    #[must_use]
    pub fn code(&self) -> i64 {
        self.fields
            .get(CODE_FIELD)
            .and_then(FieldValue::as_i64)
            .unwrap_or_else(|| self.kind.code())
    }

    #[must_use]
    pub fn is_safe(&self) -> bool {
        self.kind.is_safe()
    }

    #[must_use]
    pub fn has_remote_detail(&self) -> bool {
        self.remote_detail.is_some()
    }

    /// Renders the local-safe message.
    ///
    /// When the template cannot be rendered, the failure and every sanitized
    /// field are logged at error level. Strict settings then return the error;
    /// lenient settings return the raw template text.
    pub fn format_message(&self, settings: &Settings) -> Result<String, TemplateError> {
        if let Some(message) = &self.message {
            return Ok(message.clone());
        }
        match template::render(self.kind.template(), &self.fields) {
            Ok(rendered) => Ok(rendered),
            Err(err) => {
                let logger = settings.logger();
                error!(logger, "exception in string format operation";
                    "fault" => self.kind.name(),
                    "error" => %err);
                for (name, value) in sanitize(&self.fields).iter() {
                    error!(logger, "{}: {}", name, value);
                }
                if settings.is_strict() {
                    Err(err)
                } else {
                    Ok(self.kind.template().to_string())
                }
            }
        }
    }

    /// Renders the string meant for elevated-trust consumers: the remote
    /// detail when one is attached, otherwise [`Fault::format_message`].
    pub fn remote_message(&self, settings: &Settings) -> Result<String, TemplateError> {
        match &self.remote_detail {
            Some(detail) => Ok(detail.clone()),
            None => self.format_message(settings),
        }
    }

    /// Lenient local rendering without diagnostics.
    fn render_lenient(&self) -> String {
        if let Some(message) = &self.message {
            return message.clone();
        }
        template::render(self.kind.template(), &self.fields)
            .unwrap_or_else(|_| self.kind.template().to_string())
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_lenient())
    }
}

impl std::error::Error for Fault {}

impl From<&'static FaultKind> for Fault {
    fn from(kind: &'static FaultKind) -> Self {
        Self::new(kind)
    }
}
