//! A notifier that writes notifications to a `slog` logger.
//!
//! Each notification becomes one record. The priority picks the record level,
//! and the payload is attached as a nested JSON value through `slog`'s
//! nested-value support. Payloads are already sanitized when they reach this
//! module; nothing here looks at the original error or arguments.

use std::{fmt, marker::PhantomData};

use serde_json::Value as JsonValue;
use slog::{
    crit, debug, error, info, warn, Key, Level, Logger, Record, Result as SlogResult, Serializer,
    Value as SlogValue,
};

use super::{Notifier, NotifyError, Payload, Priority};

/// A `slog::Value` that emits a payload as structured JSON.
pub struct PayloadJson {
    value: JsonValue,
}

impl From<&Payload> for PayloadJson {
    fn from(payload: &Payload) -> Self {
        Self {
            value: payload.to_json(),
        }
    }
}

impl SlogValue for PayloadJson {
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        let nested = slog::Serde(self.value.clone());
        SlogValue::serialize(&nested, record, key, serializer)
    }
}

/// Maps a priority onto a record level. Unknown priorities log as errors.
fn level_for(priority: &Priority) -> Level {
    match priority.as_str() {
        "CRITICAL" => Level::Critical,
        "WARN" | "WARNING" => Level::Warning,
        "INFO" => Level::Info,
        "DEBUG" => Level::Debug,
        _ => Level::Error,
    }
}

/// Notifier that logs instead of delivering. The context is not logged.
pub struct LogNotifier<C: ?Sized = ()> {
    logger: Logger,
    _context: PhantomData<fn(&C)>,
}

impl<C: ?Sized> LogNotifier<C> {
    #[must_use]
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            _context: PhantomData,
        }
    }
}

impl<C: ?Sized> Clone for LogNotifier<C> {
    fn clone(&self) -> Self {
        Self::new(self.logger.clone())
    }
}

impl<C: ?Sized> fmt::Debug for LogNotifier<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogNotifier").finish_non_exhaustive()
    }
}

impl<C: ?Sized> Notifier for LogNotifier<C> {
    type Context = C;

    fn notify(
        &self,
        _context: Option<&C>,
        publisher: Option<&str>,
        event: &str,
        priority: &Priority,
        payload: &Payload,
    ) -> Result<(), NotifyError> {
        let level = level_for(priority);
        let priority = priority.as_str();
        let payload = PayloadJson::from(payload);
        // Levels are part of each record's static metadata.
        match level {
            Level::Critical => crit!(self.logger, "{}", event;
                "publisher" => publisher, "priority" => priority, "payload" => payload),
            Level::Warning => warn!(self.logger, "{}", event;
                "publisher" => publisher, "priority" => priority, "payload" => payload),
            Level::Info => info!(self.logger, "{}", event;
                "publisher" => publisher, "priority" => priority, "payload" => payload),
            Level::Debug | Level::Trace => debug!(self.logger, "{}", event;
                "publisher" => publisher, "priority" => priority, "payload" => payload),
            Level::Error => error!(self.logger, "{}", event;
                "publisher" => publisher, "priority" => priority, "payload" => payload),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use slog::Level;

    use super::level_for;
    use crate::Priority;

    #[test]
    fn priority_levels() {
        assert_eq!(level_for(&Priority::CRITICAL), Level::Critical);
        assert_eq!(level_for(&Priority::ERROR), Level::Error);
        assert_eq!(level_for(&Priority::from("WARNING")), Level::Warning);
        assert_eq!(level_for(&Priority::INFO), Level::Info);
        assert_eq!(level_for(&Priority::DEBUG), Level::Debug);
        assert_eq!(level_for(&Priority::from("level")), Level::Error);
    }
}
