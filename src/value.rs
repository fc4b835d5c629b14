use std::fmt::{self, Write as _};

use crate::introspect::Introspect;

/// A borrowed view of a single argument or return value of an intercepted call.
///
/// A `CallValue` remembers the full type name of the value it was captured from
/// and how the value should be rendered: through its [`Display`](fmt::Display),
/// [`Debug`](fmt::Debug) or [`serde::Serialize`] implementation, as an error, or
/// as a structured value whose fields can be listed one by one.
///
/// Plain rendering goes through the [`Display`](fmt::Display) implementation of
/// `CallValue` itself. An absent value renders as an empty string and a
/// structured value renders as the `TypeName {..}` placeholder; the field
/// listing is only produced by the interceptor when deep rendering is enabled.
///
/// # Example
///
/// ```
/// use invocation_logger::CallValue;
///
/// let answer = 42;
/// let value = CallValue::display(&answer);
/// assert_eq!(value.to_string(), "42");
/// assert_eq!(CallValue::absent().to_string(), "");
/// ```
#[derive(Clone, Copy)]
pub struct CallValue<'a> {
    type_name: &'static str,
    inner: CallValueInner<'a>,
}

#[derive(Clone, Copy)]
enum CallValueInner<'a> {
    Absent,
    String(&'a str),
    Display(&'a dyn fmt::Display),
    Debug(&'a dyn fmt::Debug),
    Error(&'a (dyn std::error::Error + 'static)),
    Serde(&'a dyn erased_serde::Serialize),
    Structured(&'a dyn Introspect),
    StructuredSerde(&'a dyn erased_serde::Serialize),
}

impl<'a> CallValue<'a> {
    /// A missing value, e.g. the result of a call that returns nothing.
    #[must_use]
    pub const fn absent() -> Self {
        Self {
            type_name: "()",
            inner: CallValueInner::Absent,
        }
    }

    #[must_use]
    pub const fn str(value: &'a str) -> Self {
        Self {
            type_name: "&str",
            inner: CallValueInner::String(value),
        }
    }

    #[must_use]
    pub fn display<T>(value: &'a T) -> Self
    where
        T: fmt::Display,
    {
        Self {
            type_name: std::any::type_name::<T>(),
            inner: CallValueInner::Display(value),
        }
    }

    #[must_use]
    pub fn debug<T>(value: &'a T) -> Self
    where
        T: fmt::Debug,
    {
        Self {
            type_name: std::any::type_name::<T>(),
            inner: CallValueInner::Debug(value),
        }
    }

    #[must_use]
    pub fn error<T>(value: &'a T) -> Self
    where
        T: std::error::Error + 'static,
    {
        Self {
            type_name: std::any::type_name::<T>(),
            inner: CallValueInner::Error(value),
        }
    }

    #[must_use]
    pub fn serde<S>(value: &'a S) -> Self
    where
        S: serde::Serialize,
    {
        Self {
            type_name: std::any::type_name::<S>(),
            inner: CallValueInner::Serde(value),
        }
    }

    /// Captures a value that lists its own fields through [`Introspect`].
    ///
    /// Such a value is eligible for deep rendering.
    #[must_use]
    pub fn structured<T>(value: &'a T) -> Self
    where
        T: Introspect,
    {
        Self {
            type_name: std::any::type_name::<T>(),
            inner: CallValueInner::Structured(value),
        }
    }

    /// Captures a serializable value whose top-level fields are listed on deep rendering.
    ///
    /// This is the derive-based alternative to implementing [`Introspect`] by hand:
    /// `#[derive(Serialize)]` is enough to make a plain data carrier eligible.
    #[must_use]
    pub fn structured_serde<S>(value: &'a S) -> Self
    where
        S: serde::Serialize,
    {
        Self {
            type_name: std::any::type_name::<S>(),
            inner: CallValueInner::StructuredSerde(value),
        }
    }

    /// Full type name of the captured value.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self.inner, CallValueInner::Absent)
    }

    /// Returns `true` if the value carries the structured value marker.
    #[must_use]
    pub const fn is_structured(&self) -> bool {
        matches!(
            self.inner,
            CallValueInner::Structured(_) | CallValueInner::StructuredSerde(_)
        )
    }

    /// Renders the structured value field by field.
    ///
    /// Returns `None` for values without the structured value marker.
    pub(crate) fn render_fields(&self, accessor_prefix: &str) -> Option<String> {
        match self.inner {
            CallValueInner::Structured(value) => {
                Some(crate::introspect::render(value, accessor_prefix))
            }
            CallValueInner::StructuredSerde(value) => Some(
                crate::introspect::render_serde(simple_type_name(self.type_name), value),
            ),
            _ => None,
        }
    }

    /// Appends the plain textual representation to `out`.
    ///
    /// A failing `Display` implementation truncates the output instead of panicking.
    pub(crate) fn write_plain(&self, out: &mut String) {
        let _ = write!(out, "{self}");
    }

    pub fn as_log_value(&self) -> log::kv::Value<'_> {
        match &self.inner {
            CallValueInner::Absent => log::kv::Value::null(),
            CallValueInner::String(s) => log::kv::Value::from(*s),
            CallValueInner::Display(value) => log::kv::Value::from_dyn_display(*value),
            CallValueInner::Debug(value) => log::kv::Value::from_dyn_debug(*value),
            CallValueInner::Error(value) => log::kv::Value::from_dyn_error(*value),
            CallValueInner::Serde(value) => log::kv::Value::from_serde(value),
            CallValueInner::Structured(_) | CallValueInner::StructuredSerde(_) => {
                log::kv::Value::from_dyn_display(self)
            }
        }
    }
}

impl fmt::Display for CallValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            CallValueInner::Absent => Ok(()),
            CallValueInner::Structured(value) => write!(f, "{} {{..}}", value.type_name()),
            CallValueInner::StructuredSerde(_) => {
                write!(f, "{} {{..}}", simple_type_name(self.type_name))
            }
            _ => fmt::Display::fmt(&self.as_log_value(), f),
        }
    }
}

impl fmt::Debug for CallValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallValue")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Conversion of a value into a [`CallValue`] borrowing from it.
///
/// Implemented for primitives, strings, `()`, [`Option`] and [`Vec`] so that
/// [`Logged`](crate::Logged) can render return values without extra code at
/// the call site. Plain data carriers implement it with
/// [`CallValue::structured`] or [`CallValue::structured_serde`].
pub trait ToCallValue {
    fn to_call_value(&self) -> CallValue<'_>;
}

macro_rules! impl_to_call_value_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToCallValue for $ty {
                fn to_call_value(&self) -> CallValue<'_> {
                    CallValue::display(self)
                }
            }
        )*
    };
}

impl_to_call_value_display!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

impl ToCallValue for str {
    fn to_call_value(&self) -> CallValue<'_> {
        CallValue::str(self)
    }
}

impl ToCallValue for String {
    fn to_call_value(&self) -> CallValue<'_> {
        CallValue::str(self)
    }
}

impl ToCallValue for () {
    fn to_call_value(&self) -> CallValue<'_> {
        CallValue::absent()
    }
}

impl<T: ToCallValue> ToCallValue for Option<T> {
    fn to_call_value(&self) -> CallValue<'_> {
        self.as_ref()
            .map_or_else(CallValue::absent, ToCallValue::to_call_value)
    }
}

impl<T: fmt::Debug> ToCallValue for Vec<T> {
    fn to_call_value(&self) -> CallValue<'_> {
        CallValue::debug(self)
    }
}

impl<T: ToCallValue + ?Sized> ToCallValue for &T {
    fn to_call_value(&self) -> CallValue<'_> {
        (**self).to_call_value()
    }
}

impl ToCallValue for CallValue<'_> {
    fn to_call_value(&self) -> CallValue<'_> {
        *self
    }
}

impl<'a, T: ToCallValue + ?Sized> From<&'a T> for CallValue<'a> {
    fn from(value: &'a T) -> Self {
        value.to_call_value()
    }
}

/// Strips the module path and generic arguments from a full type name.
pub(crate) fn simple_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
