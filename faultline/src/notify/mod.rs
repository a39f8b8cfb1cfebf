//! The notification port: how failures leave the wrapper.
//!
//! This module defines the contract only. Delivery (queues, log sinks, HTTP)
//! belongs to implementations of [`Notifier`]. Two are provided:
//!
//! - [`NoopNotifier`]: ignores every call; the default collaborator.
//! - [`LogNotifier`]: writes each notification as one structured `slog` record.
//!
//! Implementations are shared between threads by the callers that hold them;
//! any synchronization they need is their own.

mod log;
mod payload;

use std::{borrow::Cow, fmt, marker::PhantomData, sync::Arc};

use thiserror::Error;

pub use log::{LogNotifier, PayloadJson};
pub use payload::{ExceptionDescriptor, Payload};

/// Severity attached to a notification.
///
/// Priorities are open-ended strings; the associated constants cover the
/// levels most transports understand.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Priority(Cow<'static, str>);

impl Priority {
    pub const CRITICAL: Self = Self::from_static("CRITICAL");
    pub const ERROR: Self = Self::from_static("ERROR");
    pub const WARN: Self = Self::from_static("WARN");
    pub const INFO: Self = Self::from_static("INFO");
    pub const DEBUG: Self = Self::from_static("DEBUG");

    #[must_use]
    pub const fn from_static(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Priority {
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

/// A notifier could not deliver a notification.
#[derive(Debug, Error)]
#[error("notification delivery failed: {message}")]
pub struct NotifyError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl NotifyError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Capability to report a failure outside the process.
///
/// `Context` is opaque to this crate: it is located among the wrapped call's
/// arguments and handed over unchanged.
pub trait Notifier {
    type Context: ?Sized;

    /// Reports one failure. The wrapper does not rely on the outcome beyond
    /// logging an `Err`.
    fn notify(
        &self,
        context: Option<&Self::Context>,
        publisher: Option<&str>,
        event: &str,
        priority: &Priority,
        payload: &Payload,
    ) -> Result<(), NotifyError>;

    /// Priority used when the wrapper was not given one.
    fn error_priority(&self) -> Priority {
        Priority::ERROR
    }
}

impl<N> Notifier for &N
where
    N: Notifier + ?Sized,
{
    type Context = N::Context;

    fn notify(
        &self,
        context: Option<&Self::Context>,
        publisher: Option<&str>,
        event: &str,
        priority: &Priority,
        payload: &Payload,
    ) -> Result<(), NotifyError> {
        (**self).notify(context, publisher, event, priority, payload)
    }

    fn error_priority(&self) -> Priority {
        (**self).error_priority()
    }
}

impl<N> Notifier for Box<N>
where
    N: Notifier + ?Sized,
{
    type Context = N::Context;

    fn notify(
        &self,
        context: Option<&Self::Context>,
        publisher: Option<&str>,
        event: &str,
        priority: &Priority,
        payload: &Payload,
    ) -> Result<(), NotifyError> {
        (**self).notify(context, publisher, event, priority, payload)
    }

    fn error_priority(&self) -> Priority {
        (**self).error_priority()
    }
}

impl<N> Notifier for Arc<N>
where
    N: Notifier + ?Sized,
{
    type Context = N::Context;

    fn notify(
        &self,
        context: Option<&Self::Context>,
        publisher: Option<&str>,
        event: &str,
        priority: &Priority,
        payload: &Payload,
    ) -> Result<(), NotifyError> {
        (**self).notify(context, publisher, event, priority, payload)
    }

    fn error_priority(&self) -> Priority {
        (**self).error_priority()
    }
}

/// Notifier that accepts and discards every notification.
pub struct NoopNotifier<C: ?Sized = ()> {
    _context: PhantomData<fn(&C)>,
}

impl<C: ?Sized> NoopNotifier<C> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _context: PhantomData,
        }
    }
}

impl<C: ?Sized> Default for NoopNotifier<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized> Clone for NoopNotifier<C> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<C: ?Sized> Copy for NoopNotifier<C> {}

impl<C: ?Sized> fmt::Debug for NoopNotifier<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NoopNotifier")
    }
}

impl<C: ?Sized> Notifier for NoopNotifier<C> {
    type Context = C;

    fn notify(
        &self,
        _context: Option<&C>,
        _publisher: Option<&str>,
        _event: &str,
        _priority: &Priority,
        _payload: &Payload,
    ) -> Result<(), NotifyError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::{NoopNotifier, Notifier, NotifyError, Payload, Priority};

    #[test]
    fn noop_accepts_everything() {
        let notifier: NoopNotifier<str> = NoopNotifier::new();
        let payload = Payload::default();
        assert!(notifier
            .notify(Some("ctx"), None, "event", &Priority::ERROR, &payload)
            .is_ok());
        assert_eq!(notifier.error_priority(), Priority::ERROR);
    }

    #[test]
    fn priority_forms() {
        assert_eq!(Priority::from("level").as_str(), "level");
        assert_eq!(Priority::from(String::from("88")).to_string(), "88");
        assert_ne!(Priority::ERROR, Priority::WARN);
    }

    #[test]
    fn notify_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "queue closed");
        let err = NotifyError::with_source("publish failed", io);
        assert_eq!(err.to_string(), "notification delivery failed: publish failed");
        assert!(err.source().is_some());
        assert!(NotifyError::new("x").source().is_none());
    }
}
