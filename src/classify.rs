use crate::{CallValue, value::simple_type_name};

/// Decides whether `value` is a structured value eligible for deep rendering.
///
/// Only values captured with [`CallValue::structured`] or
/// [`CallValue::structured_serde`] qualify. If `marker_suffix` is given, the
/// simple type name of the value must also end with it. Absent values never
/// qualify.
#[must_use]
pub fn classify(value: &CallValue<'_>, marker_suffix: Option<&str>) -> bool {
    if !value.is_structured() {
        return false;
    }
    marker_suffix.is_none_or(|suffix| simple_type_name(value.type_name()).ends_with(suffix))
}
