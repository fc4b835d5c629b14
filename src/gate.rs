//! Selection of the messages produced at each interception point.
//!
//! Before a call and after a successful return, at most one message is
//! produced: a detailed `DEBUG` one if `DEBUG` is enabled, otherwise a brief
//! `INFO` one if `INFO` is enabled. After a failure the `DEBUG`/`INFO` pair and
//! the `ERROR` pair are selected independently, so both can be produced for the
//! same failure.

use crate::{
    CallValue, Failure, InterceptorConfig, Invocation,
    message::{self, RenderedMessage},
};

/// Levels enabled on a sink.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Levels {
    pub debug: bool,
    pub info: bool,
    pub error: bool,
}

/// Message for the point before the call.
#[must_use]
pub fn on_enter(
    invocation: &Invocation<'_>,
    levels: Levels,
    config: &InterceptorConfig,
) -> Option<RenderedMessage> {
    if levels.debug {
        Some(RenderedMessage::new(
            log::Level::Debug,
            message::enter_detailed(invocation, config),
        ))
    } else if levels.info {
        Some(RenderedMessage::new(
            log::Level::Info,
            message::enter_brief(invocation),
        ))
    } else {
        None
    }
}

/// Message for the point after a successful return.
#[must_use]
pub fn on_exit(
    invocation: &Invocation<'_>,
    returned: &CallValue<'_>,
    levels: Levels,
    config: &InterceptorConfig,
) -> Option<RenderedMessage> {
    if levels.debug {
        Some(RenderedMessage::new(
            log::Level::Debug,
            message::exit_detailed(invocation, returned, config),
        ))
    } else if levels.info {
        Some(RenderedMessage::new(
            log::Level::Info,
            message::exit_brief(invocation),
        ))
    } else {
        None
    }
}

/// Messages for the point after a failed call, in emission order.
#[must_use]
pub fn on_failure(
    invocation: &Invocation<'_>,
    failure: &Failure<'_>,
    levels: Levels,
) -> Vec<RenderedMessage> {
    let mut messages = Vec::new();
    let description = message::failure_description(invocation, failure);

    if levels.debug {
        messages.push(RenderedMessage::new(log::Level::Debug, description.clone()));
        messages.push(RenderedMessage::new(
            log::Level::Debug,
            message::failure_detail(failure),
        ));
    } else if levels.info {
        messages.push(RenderedMessage::new(log::Level::Info, description.clone()));
        messages.push(RenderedMessage::new(
            log::Level::Info,
            message::failure_brief(invocation),
        ));
    }

    if levels.error {
        messages.push(RenderedMessage::new(log::Level::Error, description));
        messages.push(RenderedMessage::new(
            log::Level::Error,
            message::failure_detail(failure),
        ));
    }

    messages
}
