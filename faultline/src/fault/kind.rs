//! Per-variant fault descriptors and the static registry trait.

use super::Fault;

/// Static description of one fault variant: its name, message template,
/// default code, and whether its message may be shown to end users.
///
/// Descriptors are plain `const` data so a whole catalog can live in a
/// `static` slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FaultKind {
    name: &'static str,
    template: &'static str,
    code: i64,
    safe: bool,
}

impl FaultKind {
    /// Code used when a variant does not declare one.
    pub const DEFAULT_CODE: i64 = 500;

    /// The base variant every catalog falls back to.
    pub const UNKNOWN: Self = Self::new(
        "FaultlineError",
        "An unknown exception occurred.",
        Self::DEFAULT_CODE,
    );

    #[must_use]
    pub const fn new(name: &'static str, template: &'static str, code: i64) -> Self {
        Self {
            name,
            template,
            code,
            safe: false,
        }
    }

    /// Marks the rendered message as fit for end users.
    #[must_use]
    pub const fn with_safe(mut self, safe: bool) -> Self {
        self.safe = safe;
        self
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn template(&self) -> &'static str {
        self.template
    }

    #[must_use]
    pub const fn code(&self) -> i64 {
        self.code
    }

    #[must_use]
    pub const fn is_safe(&self) -> bool {
        self.safe
    }
}

/// A closed, statically known set of fault variants.
///
/// Usually derived with `#[derive(FaultCatalog)]` on a fieldless enum; the
/// derive validates every template at compile time.
pub trait FaultCatalog: Sized + 'static {
    /// Descriptors in declaration order.
    const KINDS: &'static [FaultKind];
    /// Variants in declaration order, parallel to [`FaultCatalog::KINDS`].
    const VARIANTS: &'static [Self];

    fn kind(&self) -> &'static FaultKind;

    /// Starts a fault of this variant with only its default code set.
    fn fault(&self) -> Fault {
        Fault::new(self.kind())
    }

    /// Looks a descriptor up by variant name.
    fn find(name: &str) -> Option<&'static FaultKind> {
        Self::KINDS.iter().find(|kind| kind.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::FaultKind;

    #[test]
    fn unknown_kind_defaults() {
        assert_eq!(FaultKind::UNKNOWN.code(), 500);
        assert_eq!(FaultKind::UNKNOWN.template(), "An unknown exception occurred.");
        assert!(!FaultKind::UNKNOWN.is_safe());
    }

    #[test]
    fn const_builders() {
        const QUOTA: FaultKind =
            FaultKind::new("QuotaError", "Quota exceeded: code=%(code)s", 413).with_safe(true);
        assert!(QUOTA.is_safe());
        assert_eq!(QUOTA.name(), "QuotaError");
    }
}
