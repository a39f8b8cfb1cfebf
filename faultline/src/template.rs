//! Named-field message templates.
//!
//! Templates use `%(name)s` placeholders. Parsing and rendering are separate
//! steps so a malformed template and a missing field are reported as distinct
//! [`TemplateError`]s rather than as one opaque formatting failure.
//!
//! Supported placeholder forms:
//!
//! | Form | Renders |
//! |------|---------|
//! | `%(name)s` | the field's `Display` form |
//! | `%(name)r` | the field's quoted [`FieldValue::repr`] form |
//! | `%(name)d`, `%(name)i` | the field as an integer |
//! | `%%` | a literal `%` |

use std::fmt::Write as _;

use thiserror::Error;

use crate::fields::{FieldValue, Fields};

/// Why a template could not be rendered.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template references field `{name}` which was not supplied")]
    MissingField { name: String },
    #[error("malformed template at byte {offset}: {reason}")]
    Malformed { offset: usize, reason: &'static str },
    #[error("unsupported conversion `%{conversion}` for field `{name}`")]
    UnsupportedConversion { name: String, conversion: char },
    #[error("field `{name}` cannot be rendered as an integer")]
    NotAnInteger { name: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Conversion {
    Display,
    Repr,
    Integer,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Percent,
    Field {
        name: &'a str,
        conversion: Conversion,
    },
}

/// A parsed template borrowing from its source text.
#[derive(Clone, Debug)]
pub struct Template<'a> {
    source: &'a str,
    segments: Vec<Segment<'a>>,
}

impl<'a> Template<'a> {
    /// Parses `source`, rejecting any `%` that does not start a placeholder
    /// or a `%%` escape.
    pub fn parse(source: &'a str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal_start = 0;
        let mut cursor = 0;
        let bytes = source.as_bytes();

        while cursor < bytes.len() {
            if bytes[cursor] != b'%' {
                cursor += 1;
                continue;
            }
            if literal_start < cursor {
                segments.push(Segment::Literal(&source[literal_start..cursor]));
            }
            let (segment, next) = parse_directive(source, cursor)?;
            segments.push(segment);
            cursor = next;
            literal_start = next;
        }
        if literal_start < source.len() {
            segments.push(Segment::Literal(&source[literal_start..]));
        }

        Ok(Self { source, segments })
    }

    /// The unparsed template text.
    #[must_use]
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Names referenced by placeholders, in order of first appearance.
    #[must_use]
    pub fn field_names(&self) -> Vec<&'a str> {
        let mut names: Vec<&'a str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Field { name, .. } = segment {
                if !names.contains(name) {
                    names.push(*name);
                }
            }
        }
        names
    }

    /// Substitutes `fields` into the template. Fields the template does not
    /// reference are ignored.
    pub fn render(&self, fields: &Fields) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Percent => out.push('%'),
                Segment::Field { name, conversion } => {
                    let value = fields.get(name).ok_or_else(|| TemplateError::MissingField {
                        name: (*name).to_string(),
                    })?;
                    render_value(&mut out, name, value, *conversion)?;
                }
            }
        }
        Ok(out)
    }
}

/// Parses and renders in one step.
pub(crate) fn render(source: &str, fields: &Fields) -> Result<String, TemplateError> {
    Template::parse(source)?.render(fields)
}

fn parse_directive(source: &str, start: usize) -> Result<(Segment<'_>, usize), TemplateError> {
    let bytes = source.as_bytes();
    match bytes.get(start + 1) {
        Some(b'%') => Ok((Segment::Percent, start + 2)),
        Some(b'(') => {
            let name_start = start + 2;
            let close = source[name_start..]
                .find(')')
                .map(|offset| name_start + offset)
                .ok_or(TemplateError::Malformed {
                    offset: start,
                    reason: "unterminated `%(` placeholder",
                })?;
            if close == name_start {
                return Err(TemplateError::Malformed {
                    offset: start,
                    reason: "empty placeholder name",
                });
            }
            let name = &source[name_start..close];
            let conversion_char =
                source[close + 1..]
                    .chars()
                    .next()
                    .ok_or(TemplateError::Malformed {
                        offset: start,
                        reason: "placeholder is missing its conversion",
                    })?;
            let conversion = match conversion_char {
                's' => Conversion::Display,
                'r' => Conversion::Repr,
                'd' | 'i' => Conversion::Integer,
                other => {
                    return Err(TemplateError::UnsupportedConversion {
                        name: name.to_string(),
                        conversion: other,
                    })
                }
            };
            Ok((
                Segment::Field { name, conversion },
                close + 1 + conversion_char.len_utf8(),
            ))
        }
        Some(_) => Err(TemplateError::Malformed {
            offset: start,
            reason: "`%` must start a `%(name)` placeholder or a `%%` escape",
        }),
        None => Err(TemplateError::Malformed {
            offset: start,
            reason: "template ends with a lone `%`",
        }),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn render_value(
    out: &mut String,
    name: &str,
    value: &FieldValue,
    conversion: Conversion,
) -> Result<(), TemplateError> {
    match conversion {
        Conversion::Display => {
            let _ = write!(out, "{value}");
        }
        Conversion::Repr => out.push_str(&value.repr()),
        Conversion::Integer => {
            let integer = match value {
                FieldValue::Int(value) => *value,
                FieldValue::Float(value) if value.is_finite() => value.trunc() as i64,
                FieldValue::Bool(value) => i64::from(*value),
                _ => {
                    return Err(TemplateError::NotAnInteger {
                        name: name.to_string(),
                    })
                }
            };
            let _ = write!(out, "{integer}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{render, Template, TemplateError};
    use crate::fields;

    #[test]
    fn plain_text_renders_unchanged() {
        assert_eq!(render("default message", &fields! {}).unwrap(), "default message");
    }

    #[test]
    fn substitutes_named_fields() {
        let fields = fields! { "code" => 500 };
        assert_eq!(
            render("default message: %(code)s", &fields).unwrap(),
            "default message: 500"
        );
    }

    #[test]
    fn extra_fields_are_ignored() {
        let fields = fields! { "code" => 500, "mispelled_code" => "blah" };
        assert_eq!(
            render("default message: %(mispelled_code)s", &fields).unwrap(),
            "default message: blah"
        );
    }

    #[test]
    fn missing_field_is_an_error() {
        let err = render("some message %(somearg)s", &fields! { "lame_arg" => "lame" }).unwrap_err();
        assert_eq!(
            err,
            TemplateError::MissingField {
                name: "somearg".to_string()
            }
        );
    }

    #[test]
    fn conversions() {
        let fields = fields! { "host" => "glance", "port" => 9292, "ratio" => 2.9 };
        assert_eq!(
            render("%(host)r:%(port)d %(ratio)i%%", &fields).unwrap(),
            "\"glance\":9292 2%"
        );
        assert_eq!(
            render("%(host)d", &fields).unwrap_err(),
            TemplateError::NotAnInteger {
                name: "host".to_string()
            }
        );
    }

    #[test]
    fn malformed_templates_are_rejected() {
        for source in ["50% done", "%(name", "%()s", "%(name)", "trailing %"] {
            assert!(
                matches!(Template::parse(source), Err(TemplateError::Malformed { .. })),
                "{source} should be malformed"
            );
        }
        assert_eq!(
            Template::parse("%(name)x").unwrap_err(),
            TemplateError::UnsupportedConversion {
                name: "name".to_string(),
                conversion: 'x'
            }
        );
    }

    #[test]
    fn field_names_are_deduplicated_in_order() {
        let template = Template::parse("%(host)s:%(port)s %(host)s").unwrap();
        assert_eq!(template.field_names(), ["host", "port"]);
    }

    #[test]
    fn multibyte_text_around_placeholders() {
        let fields = fields! { "id" => "秘密" };
        assert_eq!(render("→ %(id)s ←", &fields).unwrap(), "→ 秘密 ←");
    }
}
