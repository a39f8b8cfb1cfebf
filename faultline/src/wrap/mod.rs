//! Call wrappers that report failures and hand them back unchanged.
//!
//! An [`ExceptionWrapper`] holds the reporting configuration: an optional
//! notifier, and optional fixed publisher, event and priority. Wrapping a
//! callable with it produces a [`Wrapped`] value whose `call` behaves exactly
//! like the callable:
//!
//! - `Ok` values are returned as-is.
//! - `Err` values are returned as-is, after the notifier (if any) has been
//!   told about them.
//!
//! Defaults are derived per failure: the event falls back to the callable's
//! name, the priority to the notifier's [`Notifier::error_priority`], and the
//! publisher stays `None`. A notifier that fails is logged at warning level;
//! its error never replaces the original one.
//!
//! The wrapper keeps no per-call state, so one wrapper can serve any number of
//! callables and threads.

mod args;

use std::{borrow::Cow, error::Error, fmt};

use slog::{debug, o, warn, Discard, Logger};

pub use args::CallArgs;

use crate::notify::{NoopNotifier, Notifier, Payload, Priority};

/// Reporting configuration applied to wrapped callables.
#[derive(Clone)]
pub struct ExceptionWrapper<N = NoopNotifier> {
    notifier: Option<N>,
    publisher: Option<String>,
    event: Option<String>,
    priority: Option<Priority>,
    logger: Logger,
}

impl ExceptionWrapper {
    /// A wrapper without a notifier: failures pass straight through.
    #[must_use]
    pub fn new() -> Self {
        Self {
            notifier: None,
            publisher: None,
            event: None,
            priority: None,
            logger: Logger::root(Discard, o!()),
        }
    }
}

impl Default for ExceptionWrapper {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a wrapper from its four optional settings in one call.
pub fn wrap_exception<N>(
    notifier: Option<N>,
    publisher: Option<&str>,
    event: Option<&str>,
    priority: Option<Priority>,
) -> ExceptionWrapper<N> {
    ExceptionWrapper {
        notifier,
        publisher: publisher.map(str::to_string),
        event: event.map(str::to_string),
        priority,
        logger: Logger::root(Discard, o!()),
    }
}

impl<N> ExceptionWrapper<N> {
    /// Replaces the notifier, keeping every other setting.
    #[must_use]
    pub fn with_notifier<M>(self, notifier: M) -> ExceptionWrapper<M> {
        ExceptionWrapper {
            notifier: Some(notifier),
            publisher: self.publisher,
            event: self.event,
            priority: self.priority,
            logger: self.logger,
        }
    }

    #[must_use]
    pub fn publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    #[must_use]
    pub fn event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: impl Into<Priority>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Logger for the wrapper's own diagnostics, such as notifier failures.
    #[must_use]
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    #[must_use]
    pub fn notifier(&self) -> Option<&N> {
        self.notifier.as_ref()
    }

    /// Wraps `f`, naming it after the last path segment of its type name.
    /// Closures are named after the function that defines them.
    #[must_use]
    pub fn wrap<F>(&self, f: F) -> Wrapped<N, F>
    where
        N: Clone,
    {
        self.wrap_named(callable_name::<F>(), f)
    }

    /// Wraps `f` under an explicit name.
    #[must_use]
    pub fn wrap_named<F>(&self, name: impl Into<Cow<'static, str>>, f: F) -> Wrapped<N, F>
    where
        N: Clone,
    {
        Wrapped {
            wrapper: self.clone(),
            name: name.into(),
            f,
        }
    }
}

impl<N> ExceptionWrapper<N>
where
    N: Notifier,
{
    /// Calls `f` once with `args`, reporting a failure under `name`.
    pub fn call<A, T, E, F>(&self, name: &str, f: F, args: A) -> Result<T, E>
    where
        F: FnOnce(&A) -> Result<T, E>,
        A: CallArgs<N::Context>,
        E: Error + 'static,
    {
        match f(&args) {
            Ok(value) => Ok(value),
            Err(err) => {
                self.report(name, &err, &args);
                Err(err)
            }
        }
    }

    fn report<A, E>(&self, name: &str, err: &E, args: &A)
    where
        A: CallArgs<N::Context>,
        E: Error + 'static,
    {
        let Some(notifier) = &self.notifier else {
            return;
        };

        let context = args.context();
        let event = self.event.as_deref().unwrap_or(name);
        let priority = self
            .priority
            .clone()
            .unwrap_or_else(|| notifier.error_priority());
        let payload = Payload::new(err, &args.fields());

        debug!(self.logger, "reporting wrapped failure";
            "event" => event,
            "priority" => priority.as_str());
        if let Err(notify_err) = notifier.notify(
            context,
            self.publisher.as_deref(),
            event,
            &priority,
            &payload,
        ) {
            warn!(self.logger, "failed to deliver failure notification";
                "event" => event,
                "error" => %notify_err);
        }
    }
}

impl<N> fmt::Debug for ExceptionWrapper<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExceptionWrapper")
            .field("has_notifier", &self.notifier.is_some())
            .field("publisher", &self.publisher)
            .field("event", &self.event)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// A callable paired with the wrapper that reports its failures.
#[derive(Clone)]
pub struct Wrapped<N, F> {
    wrapper: ExceptionWrapper<N>,
    name: Cow<'static, str>,
    f: F,
}

impl<N, F> Wrapped<N, F>
where
    N: Notifier,
{
    /// The name used as the default event.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the callable with `args`, returning its result unchanged.
    pub fn call<A, T, E>(&self, args: A) -> Result<T, E>
    where
        F: Fn(&A) -> Result<T, E>,
        A: CallArgs<N::Context>,
        E: Error + 'static,
    {
        self.wrapper.call(&self.name, &self.f, args)
    }
}

impl<N, F> fmt::Debug for Wrapped<N, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wrapped")
            .field("name", &self.name)
            .field("wrapper", &self.wrapper)
            .finish_non_exhaustive()
    }
}

fn callable_name<F>() -> &'static str {
    let full = std::any::type_name::<F>();
    last_path_segment(full).unwrap_or(full)
}

/// The last `::` segment of a type name that lies outside every `<...>` group
/// and is not a `{{closure}}` marker.
fn last_path_segment(full: &str) -> Option<&str> {
    let bytes = full.as_bytes();
    let mut last = None;
    let mut depth = 0usize;
    let mut start = 0;
    let mut index = 0;
    while index < bytes.len() {
        match bytes[index] {
            b'<' => {
                if depth == 0 {
                    keep_segment(&full[start..index], &mut last);
                }
                depth += 1;
            }
            // `->` inside a generic argument such as `fn() -> u8`.
            b'>' if index > 0 && bytes[index - 1] == b'-' => {}
            b'>' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    start = index + 1;
                }
            }
            b':' if depth == 0 && bytes.get(index + 1) == Some(&b':') => {
                keep_segment(&full[start..index], &mut last);
                index += 2;
                start = index;
                continue;
            }
            _ => {}
        }
        index += 1;
    }
    if depth == 0 {
        keep_segment(&full[start..], &mut last);
    }
    last
}

fn keep_segment<'a>(segment: &'a str, last: &mut Option<&'a str>) {
    let segment = segment.trim_start_matches('&').trim();
    if !segment.is_empty() && !segment.starts_with('{') {
        *last = Some(segment);
    }
}
