//! Plain-data notification payloads.

use std::error::Error;

use serde::Serialize;

use crate::{fault::Fault, fields::Fields, sanitize::sanitize};

/// Transportable description of a failure. Holds no reference to the error.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ExceptionDescriptor {
    /// Fault variant name, or the Rust type name for other errors.
    pub kind: String,
    /// Local-safe rendering of the error.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    /// Sanitized fault fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Fields>,
}

impl ExceptionDescriptor {
    /// Describes `err`, pulling code and fields from the first [`Fault`] found
    /// on the error or its `source()` chain.
    pub fn describe<E>(err: &E) -> Self
    where
        E: Error + 'static,
    {
        let message = err.to_string();
        match find_fault(err) {
            Some(fault) => Self {
                kind: fault.kind().name().to_string(),
                message,
                code: Some(fault.code()),
                fields: Some(sanitize(fault.fields())),
            },
            None => Self {
                kind: std::any::type_name::<E>().to_string(),
                message,
                code: None,
                fields: None,
            },
        }
    }
}

fn find_fault<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a Fault> {
    let mut current = Some(err);
    while let Some(candidate) = current {
        if let Some(fault) = candidate.downcast_ref::<Fault>() {
            return Some(fault);
        }
        current = candidate.source();
    }
    None
}

/// What a notifier receives: the failure and the call's sanitized arguments.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Payload {
    pub exception: ExceptionDescriptor,
    pub args: Fields,
}

impl Payload {
    /// Builds a payload for `err`, sanitizing `args` on the way in.
    pub fn new<E>(err: &E, args: &Fields) -> Self
    where
        E: Error + 'static,
    {
        Self {
            exception: ExceptionDescriptor::describe(err),
            args: sanitize(args),
        }
    }

    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use super::{ExceptionDescriptor, Payload};
    use crate::{fields, Fault, FaultKind};

    static INVALID: FaultKind = FaultKind::new("InvalidInput", "Invalid input received: %(reason)s", 400);

    #[derive(Debug)]
    struct Wrapper(Fault);

    impl fmt::Display for Wrapper {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "request failed")
        }
    }

    impl std::error::Error for Wrapper {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn fault_descriptor_carries_sanitized_fields() {
        let fault = Fault::new(&INVALID)
            .with("reason", "bad flavor")
            .with("admin_password", "hunter2");
        let descriptor = ExceptionDescriptor::describe(&fault);

        assert_eq!(descriptor.kind, "InvalidInput");
        assert_eq!(descriptor.message, "Invalid input received: bad flavor");
        assert_eq!(descriptor.code, Some(400));
        let fields = descriptor.fields.unwrap();
        assert!(fields.contains_key("reason"));
        assert!(!fields.contains_key("admin_password"));
    }

    #[test]
    fn fault_is_found_through_source_chain() {
        let err = Wrapper(Fault::new(&INVALID).with("reason", "x"));
        let descriptor = ExceptionDescriptor::describe(&err);
        assert_eq!(descriptor.kind, "InvalidInput");
        assert_eq!(descriptor.message, "request failed");
    }

    #[test]
    fn plain_errors_use_their_type_name() {
        let err = std::io::Error::other("boom");
        let descriptor = ExceptionDescriptor::describe(&err);
        assert!(descriptor.kind.ends_with("Error"));
        assert_eq!(descriptor.code, None);
    }

    #[test]
    fn payload_json_shape() {
        let err = std::io::Error::other("boom");
        let payload = Payload::new(&err, &fields! { "extra" => 3, "new_pass" => "x" });
        let json = payload.to_json();

        assert_eq!(json["exception"]["message"], "boom");
        assert!(json["exception"].get("code").is_none());
        assert_eq!(json["args"]["extra"], 3);
        assert!(json["args"].get("new_pass").is_none());
    }

    #[test]
    fn payload_args_keep_call_order() {
        let err = std::io::Error::other("boom");
        let payload = Payload::new(&err, &fields! { "volume" => "v", "instance" => "i", "attempt" => 2 });
        let json = payload.to_json();

        let keys: Vec<&str> = json["args"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["volume", "instance", "attempt"]);
    }
}
