use crate::{Failure, Invocation, ResolveError, gate::Levels, message::RenderedMessage};

/// The log sink of one target type.
///
/// Records written through a sink use the full type name of the target as
/// their [`target`](log::Metadata::target), so log filters attribute them to
/// the observed component rather than to the interception code.
#[derive(Clone, Copy)]
pub struct Sink<'a> {
    target: &'a str,
    logger: &'a dyn log::Log,
    max_level: log::LevelFilter,
}

impl<'a> Sink<'a> {
    /// Resolves the sink of `target_type` on top of `logger`.
    ///
    /// Resolution has no side effects: resolving the same target type twice
    /// yields sinks with the same enabled levels.
    ///
    /// # Errors
    ///
    /// Returns an error if `target_type` is empty.
    pub fn resolve(
        logger: &'a dyn log::Log,
        max_level: log::LevelFilter,
        target_type: &'a str,
    ) -> Result<Self, ResolveError> {
        if target_type.trim().is_empty() {
            return Err(ResolveError::UnnamedTarget);
        }
        Ok(Self {
            target: target_type,
            logger,
            max_level,
        })
    }

    #[must_use]
    pub fn is_enabled(&self, level: log::Level) -> bool {
        level <= self.max_level
            && self.logger.enabled(
                &log::Metadata::builder()
                    .level(level)
                    .target(self.target)
                    .build(),
            )
    }

    #[must_use]
    pub fn levels(&self) -> Levels {
        Levels {
            debug: self.is_enabled(log::Level::Debug),
            info: self.is_enabled(log::Level::Info),
            error: self.is_enabled(log::Level::Error),
        }
    }

    /// Writes `message` together with the invocation key-values.
    pub fn write(
        &self,
        message: &RenderedMessage,
        invocation: &Invocation<'_>,
        failure: Option<&Failure<'_>>,
    ) {
        let records = InvocationRecords {
            target_type: invocation.target_type(),
            method: invocation.method(),
            error_type: failure.map(Failure::type_name),
        };
        self.logger.log(
            &log::Record::builder()
                .args(format_args!("{}", message.text()))
                .level(message.level())
                .target(self.target)
                .key_values(&records)
                .build(),
        );
    }
}

impl std::fmt::Debug for Sink<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sink")
            .field("target", &self.target)
            .field("max_level", &self.max_level)
            .finish_non_exhaustive()
    }
}

struct InvocationRecords<'a> {
    target_type: &'a str,
    method: &'a str,
    error_type: Option<&'a str>,
}

impl log::kv::Source for InvocationRecords<'_> {
    fn visit<'kvs>(
        &'kvs self,
        visitor: &mut dyn log::kv::VisitSource<'kvs>,
    ) -> Result<(), log::kv::Error> {
        visitor.visit_pair(
            log::kv::Key::from_str("target_type"),
            log::kv::Value::from(self.target_type),
        )?;
        visitor.visit_pair(
            log::kv::Key::from_str("method"),
            log::kv::Value::from(self.method),
        )?;
        if let Some(error_type) = self.error_type {
            visitor.visit_pair(
                log::kv::Key::from_str("error_type"),
                log::kv::Value::from(error_type),
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_util::CapturingLogger;

    #[test]
    fn test_resolve_rejects_unnamed_target() {
        let logger = CapturingLogger::with_levels(&[log::Level::Info]);
        let error = Sink::resolve(&logger, log::LevelFilter::Trace, " ").unwrap_err();
        assert_eq!(error, ResolveError::UnnamedTarget);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let logger = CapturingLogger::with_levels(&[log::Level::Debug, log::Level::Error]);
        let first = Sink::resolve(&logger, log::LevelFilter::Trace, "shop::Order").unwrap();
        let second = Sink::resolve(&logger, log::LevelFilter::Trace, "shop::Order").unwrap();

        assert_eq!(first.levels(), second.levels());
        assert_eq!(
            first.levels(),
            Levels {
                debug: true,
                info: false,
                error: true
            }
        );
        assert!(logger.records().is_empty());
    }

    #[test]
    fn test_max_level_caps_logger() {
        let logger = CapturingLogger::with_levels(&[log::Level::Debug, log::Level::Info]);
        let sink = Sink::resolve(&logger, log::LevelFilter::Info, "shop::Order").unwrap();

        assert!(!sink.is_enabled(log::Level::Debug));
        assert!(sink.is_enabled(log::Level::Info));
    }

    #[test]
    fn test_write_attaches_invocation_records() {
        let logger = CapturingLogger::with_levels(&[log::Level::Error]);
        let sink = Sink::resolve(&logger, log::LevelFilter::Trace, "shop::Order").unwrap();
        let invocation = Invocation::new("shop::Order", "place");
        let failure = Failure::new("shop::IllegalStateError", "bad state");

        sink.write(
            &RenderedMessage::new(log::Level::Error, "Error is: bad state"),
            &invocation,
            Some(&failure),
        );

        let records = logger.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].target, "shop::Order");
        assert_eq!(records[0].text, "Error is: bad state");
        assert_eq!(records[0].method.as_deref(), Some("place"));
        assert_eq!(
            records[0].error_type.as_deref(),
            Some("shop::IllegalStateError")
        );
    }
}
