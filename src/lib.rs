//! # Overview
//!
#![doc = include_utils::include_md!("README.md:description")]
//!
//! Logging every call made against a component usually means sprinkling the
//! same "entering"/"exiting" statements over every method. This library moves
//! that cross-cutting concern into a single place:
//!
//! - A [`LoggingInterceptor`] exposes the three advice points of a call: before
//!   it, after a successful return and after a failure.
//! - A [`Logged`] wrapper applies those advice points around calls made against
//!   the object it wraps.
//! - Structured values opt into field-by-field rendering through [`Introspect`]
//!   or [`serde::Serialize`].
//!
//! Records are written through the standard [`Log`](log::Log) facade, so the
//! library works with any logger implementation such as [`env_logger`]. The
//! record target is the full type name of the wrapped object, which lets the
//! usual module filters decide how verbose each component is.
//!
//! ## Basic example
//!
#![doc = include_utils::include_md!("README.md:basic_example")]
//!
//! ## Verbosity
//!
//! With `DEBUG` enabled, calls are logged with their arguments and return
//! values. With only `INFO` enabled, only the method names are logged. Failures
//! are additionally reported at `ERROR` whenever `ERROR` is enabled. See the
//! [`gate`] module for the exact rules.
//!
//! [`env_logger`]: https://docs.rs/env_logger/latest/env_logger

use std::{borrow::Cow, sync::Arc};

pub use self::{
    classify::classify,
    config::InterceptorConfig,
    error::ResolveError,
    future::{FutureExt, InterceptedFuture},
    introspect::{Fields, Introspect},
    invocation::{Failure, Invocation},
    logged::Logged,
    message::RenderedMessage,
    sink::Sink,
    value::{CallValue, ToCallValue},
};

mod classify;
mod config;
mod error;
pub mod future;
pub mod gate;
mod introspect;
mod invocation;
mod logged;
mod message;
mod sink;
#[cfg(test)]
mod test_util;
mod value;

type StaticCowStr = Cow<'static, str>;

/// Logs the entry, the successful exit and the failure of intercepted calls.
///
/// The interceptor is invoked by the surrounding dispatch code at three points
/// of every call: [`before`](Self::before) the call,
/// [`after_returning`](Self::after_returning) a successful return and
/// [`after_throwing`](Self::after_throwing) a failure. [`Logged`] does this for
/// calls made through it.
///
/// For each advice point the interceptor resolves the [`Sink`] of the target
/// type, asks it which levels are enabled and writes the messages selected by
/// the [`gate`]. Writing runs inline on the calling thread.
///
/// # Example
///
/// ```
/// use invocation_logger::{CallValue, Failure, Invocation, LoggingInterceptor};
///
/// struct Order;
///
/// let interceptor = LoggingInterceptor::new().deep_rendering(true);
///
/// let args = [CallValue::display(&7)];
/// let invocation = Invocation::of::<Order>("place").with_arguments(&args);
///
/// interceptor.before(&invocation);
/// // The intercepted call runs here.
/// interceptor.after_returning(&invocation, &CallValue::display(&true));
/// ```
pub struct LoggingInterceptor {
    config: InterceptorConfig,
    inner: Option<Box<dyn log::Log>>,
}

impl LoggingInterceptor {
    /// Creates an interceptor that writes to the global logger.
    ///
    /// The global logger and the maximum level set with [`log::set_max_level`]
    /// are consulted on every call, so the logger may be installed after the
    /// interceptor is created.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            config: InterceptorConfig::new(),
            inner: None,
        }
    }

    /// Creates an interceptor that writes to the given logger instead of the global one.
    #[must_use]
    pub fn with_logger<L>(logger: L) -> Self
    where
        L: log::Log + 'static,
    {
        Self {
            config: InterceptorConfig::new(),
            inner: Some(Box::new(logger)),
        }
    }

    /// Replaces the rendering settings.
    #[must_use]
    pub fn config(mut self, config: InterceptorConfig) -> Self {
        self.config = config;
        self
    }

    /// Enables or disables field-by-field rendering of structured values.
    ///
    /// Disabled by default: structured values are then logged as `TypeName {..}`.
    #[must_use]
    pub fn deep_rendering(mut self, enabled: bool) -> Self {
        self.config = self.config.deep_rendering(enabled);
        self
    }

    /// Only renders structured values field by field if their type name ends with `suffix`.
    #[must_use]
    pub fn marker_suffix(mut self, suffix: impl Into<StaticCowStr>) -> Self {
        self.config = self.config.marker_suffix(suffix);
        self
    }

    /// Sets the prefix stripped from accessor names, `"get"` by default.
    #[must_use]
    pub fn accessor_prefix(mut self, prefix: impl Into<StaticCowStr>) -> Self {
        self.config = self.config.accessor_prefix(prefix);
        self
    }

    /// Wraps `target` so that calls made through the wrapper are intercepted.
    pub fn wrap<T>(self: &Arc<Self>, target: T) -> Logged<T> {
        Logged::new(target, Arc::clone(self))
    }

    /// Resolves the log sink of the given target type.
    ///
    /// # Errors
    ///
    /// Returns an error if `target_type` is empty.
    pub fn sink<'a>(&'a self, target_type: &'a str) -> Result<Sink<'a>, ResolveError> {
        match &self.inner {
            Some(logger) => Sink::resolve(&**logger, log::LevelFilter::Trace, target_type),
            None => Sink::resolve(log::logger(), log::max_level(), target_type),
        }
    }

    /// Advice invoked before the call.
    pub fn before(&self, invocation: &Invocation<'_>) {
        let Some(sink) = self.sink_or_skip(invocation) else {
            return;
        };
        if let Some(message) = gate::on_enter(invocation, sink.levels(), &self.config) {
            sink.write(&message, invocation, None);
        }
    }

    /// Advice invoked after the call returned successfully.
    ///
    /// Calls without a result pass [`CallValue::absent`].
    pub fn after_returning(&self, invocation: &Invocation<'_>, returned: &CallValue<'_>) {
        let Some(sink) = self.sink_or_skip(invocation) else {
            return;
        };
        if let Some(message) = gate::on_exit(invocation, returned, sink.levels(), &self.config) {
            sink.write(&message, invocation, None);
        }
    }

    /// Advice invoked after the call failed.
    ///
    /// The failure is only described; handing it back to the caller is up to the
    /// dispatch code.
    pub fn after_throwing(&self, invocation: &Invocation<'_>, failure: &Failure<'_>) {
        let Some(sink) = self.sink_or_skip(invocation) else {
            return;
        };
        for message in gate::on_failure(invocation, failure, sink.levels()) {
            sink.write(&message, invocation, Some(failure));
        }
    }

    fn sink_or_skip<'a>(&'a self, invocation: &Invocation<'a>) -> Option<Sink<'a>> {
        match self.sink(invocation.target_type()) {
            Ok(sink) => Some(sink),
            Err(err) => {
                // We can't use `log::error!` here because the failure is about logging itself.
                eprintln!(
                    "Skipping invocation logging of `{}`: {err}",
                    invocation.method()
                );
                None
            }
        }
    }
}

impl Default for LoggingInterceptor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LoggingInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggingInterceptor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use log::Level::{Debug, Error, Info};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_util::CapturingLogger;

    mod shop {
        pub struct Order;
    }

    #[allow(clippy::upper_case_acronyms)]
    struct OrderDTO {
        id: u32,
        total: u32,
    }

    impl Introspect for OrderDTO {
        fn accessors(&self, fields: &mut Fields<'_>) {
            fields.field("id", &self.id).field("total", &self.total);
        }
    }

    #[derive(serde::Serialize)]
    struct CustomerDTO {
        name: &'static str,
        age: u8,
    }

    struct Unserializable;

    impl serde::Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            panic!("not serializable")
        }
    }

    #[derive(serde::Serialize)]
    struct PanickyDTO {
        id: u32,
        bad: Unserializable,
    }

    #[derive(Debug)]
    struct IllegalStateError(&'static str);

    impl std::fmt::Display for IllegalStateError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.0)
        }
    }

    impl std::error::Error for IllegalStateError {}

    fn interceptor(levels: &[log::Level]) -> (LoggingInterceptor, CapturingLogger) {
        let logger = CapturingLogger::with_levels(levels);
        (LoggingInterceptor::with_logger(logger.clone()), logger)
    }

    #[test]
    fn test_place_order_debug_with_deep_rendering() {
        let (interceptor, logger) = interceptor(&[Debug, Info]);
        let interceptor = interceptor.deep_rendering(true);

        let dto = OrderDTO { id: 7, total: 42 };
        let args = [CallValue::structured(&dto)];
        let invocation = Invocation::of::<shop::Order>("place").with_arguments(&args);
        interceptor.before(&invocation);

        let lines = logger.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, Debug);

        let text = &lines[0].1;
        let fields = text
            .strip_prefix("Entering --> Order.place(OrderDTO {")
            .and_then(|rest| rest.strip_suffix("})"))
            .unwrap();
        let fields: BTreeSet<_> = fields.split_inclusive('>').collect();
        assert_eq!(fields, BTreeSet::from(["id=<7>", "total=<42>"]));
    }

    #[test]
    fn test_place_order_info_only() {
        let (interceptor, logger) = interceptor(&[Info]);
        let interceptor = interceptor.deep_rendering(true);

        let dto = OrderDTO { id: 7, total: 42 };
        let args = [CallValue::structured(&dto)];
        let invocation = Invocation::of::<shop::Order>("place").with_arguments(&args);
        interceptor.before(&invocation);
        interceptor.after_returning(&invocation, &CallValue::absent());

        assert_eq!(
            logger.lines(),
            [
                (Info, "Entering --> Order.place()".to_owned()),
                (Info, "Exiting <-- Order.place()".to_owned()),
            ]
        );
    }

    #[test]
    fn test_deep_rendering_disabled_uses_placeholder() {
        let (interceptor, logger) = interceptor(&[Debug]);

        let dto = OrderDTO { id: 7, total: 42 };
        let invocation = Invocation::of::<shop::Order>("copy");
        interceptor.after_returning(&invocation, &CallValue::structured(&dto));

        assert_eq!(
            logger.lines(),
            [(
                Debug,
                "Exiting <-- Order.copy(): Returned = OrderDTO {..}".to_owned()
            )]
        );
    }

    #[test]
    fn test_serde_value_placeholder_without_deep_rendering() {
        let (interceptor, logger) = interceptor(&[Debug]);

        let customer = CustomerDTO {
            name: "Alice",
            age: 25,
        };
        let args = [CallValue::structured_serde(&customer)];
        let invocation = Invocation::of::<shop::Order>("place").with_arguments(&args);
        interceptor.before(&invocation);

        assert_eq!(
            logger.lines(),
            [(Debug, "Entering --> Order.place(CustomerDTO {..})".to_owned())]
        );
    }

    #[test]
    fn test_panicking_serde_field_does_not_escape_advice() {
        let (interceptor, logger) = interceptor(&[Debug]);
        let interceptor = interceptor.deep_rendering(true);

        let dto = PanickyDTO {
            id: 7,
            bad: Unserializable,
        };
        let args = [CallValue::structured_serde(&dto)];
        let invocation = Invocation::of::<shop::Order>("place").with_arguments(&args);
        interceptor.before(&invocation);
        interceptor.after_returning(&invocation, &CallValue::structured_serde(&dto));

        assert_eq!(
            logger.lines(),
            [
                (
                    Debug,
                    "Entering --> Order.place(PanickyDTO {id=<7>bad=<>})".to_owned()
                ),
                (
                    Debug,
                    "Exiting <-- Order.place(): Returned = PanickyDTO {id=<7>bad=<>}".to_owned()
                ),
            ]
        );
    }

    #[test]
    fn test_failure_with_debug_and_error() {
        let (interceptor, logger) = interceptor(&[Debug, Error]);

        let error = IllegalStateError("bad state");
        let invocation = Invocation::of::<shop::Order>("place");
        interceptor.after_throwing(&invocation, &Failure::from_error(&error));

        let records = logger.records();
        let levels: Vec<_> = records.iter().map(|record| record.level).collect();
        assert_eq!(levels, [Debug, Debug, Error, Error]);
        for record in &records {
            assert!(record.target.ends_with("::shop::Order"));
            assert!(
                record
                    .error_type
                    .as_deref()
                    .is_some_and(|ty| ty.ends_with("::IllegalStateError"))
            );
        }
        assert!(records[0].text.starts_with("Intercepted error of type ["));
        assert!(records[0].text.ends_with("::shop::Order] and method [place]"));
        assert_eq!(records[1].text, "Error is: bad state");
        assert_eq!(records[0].text, records[2].text);
        assert_eq!(records[1].text, records[3].text);
    }

    #[test]
    fn test_failure_with_error_only() {
        let (interceptor, logger) = interceptor(&[Error]);

        let invocation = Invocation::of::<shop::Order>("place");
        interceptor.before(&invocation);
        interceptor.after_throwing(&invocation, &Failure::new("io::Error", "disk full"));

        let levels: Vec<_> = logger.lines().into_iter().map(|line| line.0).collect();
        assert_eq!(levels, [Error, Error]);
    }

    #[test]
    fn test_unnamed_target_is_skipped() {
        let (interceptor, logger) = interceptor(&[Debug, Info, Error]);

        let invocation = Invocation::new("", "place");
        interceptor.before(&invocation);
        interceptor.after_returning(&invocation, &CallValue::absent());
        interceptor.after_throwing(&invocation, &Failure::new("E", "boom"));

        assert!(logger.records().is_empty());
    }

    #[test]
    fn test_sink_resolution_is_idempotent() {
        let (interceptor, _logger) = interceptor(&[Info, Error]);

        let first = interceptor.sink("shop::Order").unwrap().levels();
        let second = interceptor.sink("shop::Order").unwrap().levels();
        assert_eq!(first, second);
        assert_eq!(
            interceptor.sink("").unwrap_err(),
            ResolveError::UnnamedTarget
        );
    }

    #[test]
    fn test_concurrent_interception() {
        let (interceptor, logger) = interceptor(&[Info]);
        let interceptor = Arc::new(interceptor);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let interceptor = Arc::clone(&interceptor);
                std::thread::spawn(move || {
                    let invocation = Invocation::of::<shop::Order>("place");
                    for _ in 0..10 {
                        interceptor.before(&invocation);
                        interceptor.after_returning(&invocation, &CallValue::absent());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(logger.records().len(), 80);
    }
}
