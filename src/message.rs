use crate::{CallValue, Failure, InterceptorConfig, Invocation, classify::classify};

const ENTERING_METHOD_INDICATOR: &str = "Entering --> ";
const EXITING_METHOD_INDICATOR: &str = "Exiting <-- ";

/// A log line ready to be written to a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    level: log::Level,
    text: String,
}

impl RenderedMessage {
    #[must_use]
    pub fn new(level: log::Level, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    #[must_use]
    pub const fn level(&self) -> log::Level {
        self.level
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// `Entering --> Order.place(7, OrderDTO {id=<7>total=<42>})`
pub(crate) fn enter_detailed(invocation: &Invocation<'_>, config: &InterceptorConfig) -> String {
    let mut msg = method_prefix(ENTERING_METHOD_INDICATOR, invocation);
    msg.push('(');
    for (i, argument) in invocation.arguments().iter().enumerate() {
        if i > 0 {
            msg.push_str(", ");
        }
        render_value(argument, config, &mut msg);
    }
    msg.push(')');
    msg
}

/// `Entering --> Order.place()`
pub(crate) fn enter_brief(invocation: &Invocation<'_>) -> String {
    let mut msg = method_prefix(ENTERING_METHOD_INDICATOR, invocation);
    msg.push_str("()");
    msg
}

/// `Exiting <-- Order.place(): Returned = 42`
pub(crate) fn exit_detailed(
    invocation: &Invocation<'_>,
    returned: &CallValue<'_>,
    config: &InterceptorConfig,
) -> String {
    let mut msg = method_prefix(EXITING_METHOD_INDICATOR, invocation);
    msg.push_str("(): Returned = ");
    render_value(returned, config, &mut msg);
    msg
}

/// `Exiting <-- Order.place()`
pub(crate) fn exit_brief(invocation: &Invocation<'_>) -> String {
    let mut msg = method_prefix(EXITING_METHOD_INDICATOR, invocation);
    msg.push_str("()");
    msg
}

pub(crate) fn failure_description(invocation: &Invocation<'_>, failure: &Failure<'_>) -> String {
    format!(
        "Intercepted error of type [{}] thrown by target type [{}] and method [{}]",
        failure.type_name(),
        invocation.target_type(),
        invocation.method()
    )
}

pub(crate) fn failure_detail(failure: &Failure<'_>) -> String {
    format!("Error is: {}", failure.message())
}

pub(crate) fn failure_brief(invocation: &Invocation<'_>) -> String {
    format!("Error in: {}()", invocation.method())
}

fn method_prefix(indicator: &str, invocation: &Invocation<'_>) -> String {
    let mut msg = String::from(indicator);
    msg.push_str(invocation.target_name());
    msg.push('.');
    msg.push_str(invocation.method());
    msg
}

/// Appends the field listing of a structured value if deep rendering is on,
/// the plain representation otherwise.
fn render_value(value: &CallValue<'_>, config: &InterceptorConfig, out: &mut String) {
    if config.deep_rendering && classify(value, config.marker_suffix.as_deref()) {
        if let Some(fields) = value.render_fields(&config.accessor_prefix) {
            out.push_str(&fields);
            return;
        }
    }
    value.write_plain(out);
}
