//! Compile-time validation of `%(name)s` message templates.
//!
//! The grammar matches the runtime parser in `faultline`: `%%` is a literal
//! percent sign, `%(name)c` is a placeholder with conversion `s`, `r`, `d` or
//! `i`, and any other `%` is an error. Validating here means a catalog whose
//! templates are malformed never compiles; missing fields can still only be
//! detected at render time.

use syn::{LitStr, Result};

/// Checks `template` and returns the placeholder names in order of first
/// appearance.
pub(crate) fn validate_template(template: &LitStr) -> Result<Vec<String>> {
    let value = template.value();
    let mut chars = value.chars().peekable();
    let mut names: Vec<String> = Vec::new();

    while let Some(ch) = chars.next() {
        if ch != '%' {
            continue;
        }
        match chars.next() {
            Some('%') => {}
            Some('(') => {
                let mut name = String::new();
                let mut closed = false;
                for next in chars.by_ref() {
                    if next == ')' {
                        closed = true;
                        break;
                    }
                    name.push(next);
                }
                if !closed {
                    return Err(syn::Error::new(
                        template.span(),
                        "unterminated `%(` placeholder in fault message",
                    ));
                }
                if name.is_empty() {
                    return Err(syn::Error::new(
                        template.span(),
                        "empty placeholder name in fault message",
                    ));
                }
                match chars.next() {
                    Some('s' | 'r' | 'd' | 'i') => {}
                    Some(other) => {
                        return Err(syn::Error::new(
                            template.span(),
                            format!(
                                "unsupported conversion `%{other}` for field `{name}`; expected `s`, `r`, `d` or `i`"
                            ),
                        ));
                    }
                    None => {
                        return Err(syn::Error::new(
                            template.span(),
                            format!("placeholder `{name}` is missing its conversion"),
                        ));
                    }
                }
                if !names.contains(&name) {
                    names.push(name);
                }
            }
            _ => {
                return Err(syn::Error::new(
                    template.span(),
                    "`%` must start a `%(name)s` placeholder or a `%%` escape",
                ));
            }
        }
    }

    Ok(names)
}
