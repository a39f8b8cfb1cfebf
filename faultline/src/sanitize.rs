//! Removal of credential-bearing fields before data leaves the process.
//!
//! Sanitizing is name-based: any field whose name contains [`SENSITIVE_MARKER`]
//! (`admin_password`, `new_pass`, `rescue_pass`, ...) is dropped. Values are
//! never inspected, so the rule is cheap and predictable.

use crate::fields::Fields;

/// Field names containing this substring are removed by [`sanitize`].
///
/// Matching is an exact, case-sensitive byte comparison; it does not depend on
/// locale.
pub const SENSITIVE_MARKER: &str = "pass";

/// Returns `true` when a field with this name must not leave the process.
#[must_use]
pub fn is_sensitive_name(name: &str) -> bool {
    name.contains(SENSITIVE_MARKER)
}

/// Returns a copy of `fields` without any entry whose name is sensitive.
///
/// The input is left untouched; surviving entries keep their order and values.
#[must_use]
pub fn sanitize(fields: &Fields) -> Fields {
    fields
        .iter()
        .filter(|(name, _)| !is_sensitive_name(name))
        .map(|(name, value)| (name, value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{is_sensitive_name, sanitize};
    use crate::{fields, FieldValue, Fields};

    #[test]
    fn drops_every_name_containing_pass() {
        let input = fields! { "foo" => 1, "blah_pass" => 2, "zoo_password" => 3, "_pass" => 4 };
        assert_eq!(sanitize(&input), fields! { "foo" => 1 });
    }

    #[test]
    fn empty_maps_to_empty() {
        assert_eq!(sanitize(&Fields::new()), Fields::new());
    }

    #[test]
    fn keeps_order_and_values_and_leaves_input_alone() {
        let input = fields! { "z" => "last", "admin_password" => "hunter2", "a" => 1.5 };
        let output = sanitize(&input);

        let keys: Vec<&str> = output.keys().collect();
        assert_eq!(keys, ["z", "a"]);
        assert_eq!(output.get("a"), Some(&FieldValue::Float(1.5)));
        assert_eq!(input.len(), 3);
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!(is_sensitive_name("rescue_pass"));
        assert!(!is_sensitive_name("PASSWORD"));
        assert!(!is_sensitive_name("bypas"));
    }
}
