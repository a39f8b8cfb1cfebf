//! Rendering settings threaded into fault formatting.
//!
//! There is no process-global switch: whoever renders a fault passes the
//! [`Settings`] it wants. Embedding systems usually deserialize a
//! [`FormatOptions`] from their own configuration source and convert it once
//! at startup.

use std::fmt;

use serde::{Deserialize, Serialize};
use slog::{o, Discard, Logger};

/// Operator-facing formatting options.
///
/// `fatal_exception_format_errors` has no default here; the embedding
/// configuration must state it.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FormatOptions {
    /// Escalate template rendering failures instead of falling back to the
    /// raw template.
    pub fatal_exception_format_errors: bool,
}

/// Strictness plus the logger format failures are reported to.
#[derive(Clone)]
pub struct Settings {
    fatal_exception_format_errors: bool,
    logger: Logger,
}

impl Settings {
    #[must_use]
    pub fn new(fatal_exception_format_errors: bool) -> Self {
        Self {
            fatal_exception_format_errors,
            logger: Logger::root(Discard, o!()),
        }
    }

    /// Rendering failures are returned to the caller.
    #[must_use]
    pub fn strict() -> Self {
        Self::new(true)
    }

    /// Rendering failures fall back to the unsubstituted template.
    #[must_use]
    pub fn lenient() -> Self {
        Self::new(false)
    }

    #[must_use]
    pub fn from_options(options: FormatOptions) -> Self {
        Self::new(options.fatal_exception_format_errors)
    }

    /// Routes format-failure diagnostics to `logger` instead of discarding them.
    #[must_use]
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.fatal_exception_format_errors
    }

    #[must_use]
    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

impl From<FormatOptions> for Settings {
    fn from(options: FormatOptions) -> Self {
        Self::from_options(options)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field(
                "fatal_exception_format_errors",
                &self.fatal_exception_format_errors,
            )
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::{FormatOptions, Settings};

    #[test]
    fn options_require_the_flag() {
        let parsed: FormatOptions =
            serde_json::from_str(r#"{"fatal_exception_format_errors": true}"#).unwrap();
        assert!(Settings::from(parsed).is_strict());

        assert!(serde_json::from_str::<FormatOptions>("{}").is_err());
        assert!(serde_json::from_str::<FormatOptions>(
            r#"{"fatal_exception_format_errors": false, "extra": 1}"#
        )
        .is_err());
    }

    #[test]
    fn constructors_set_strictness() {
        assert!(Settings::strict().is_strict());
        assert!(!Settings::lenient().is_strict());
        assert!(format!("{:?}", Settings::lenient()).contains("fatal_exception_format_errors"));
    }
}
