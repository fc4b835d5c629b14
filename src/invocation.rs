use std::{borrow::Cow, fmt::Write as _};

use crate::{CallValue, value::simple_type_name};

/// A single call made against an intercepted target.
///
/// An invocation only lives for one advice callback; it borrows the method
/// name and the arguments from the call site.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    target_type: &'a str,
    method: &'a str,
    arguments: &'a [CallValue<'a>],
}

impl<'a> Invocation<'a> {
    /// Creates an invocation of `method` on a target with the given full type name.
    #[must_use]
    pub const fn new(target_type: &'a str, method: &'a str) -> Self {
        Self {
            target_type,
            method,
            arguments: &[],
        }
    }

    /// Creates an invocation of `method` on a target of type `T`.
    #[must_use]
    pub fn of<T: ?Sized>(method: &'a str) -> Self {
        Self::new(std::any::type_name::<T>(), method)
    }

    /// Sets the call arguments, in call-site order.
    #[must_use]
    pub const fn with_arguments(mut self, arguments: &'a [CallValue<'a>]) -> Self {
        self.arguments = arguments;
        self
    }

    #[must_use]
    pub const fn target_type(&self) -> &'a str {
        self.target_type
    }

    /// Target type name without its module path.
    #[must_use]
    pub fn target_name(&self) -> &'a str {
        simple_type_name(self.target_type)
    }

    #[must_use]
    pub const fn method(&self) -> &'a str {
        self.method
    }

    #[must_use]
    pub const fn arguments(&self) -> &'a [CallValue<'a>] {
        self.arguments
    }
}

/// The error an intercepted call finished with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure<'a> {
    type_name: &'a str,
    message: Cow<'a, str>,
}

impl<'a> Failure<'a> {
    #[must_use]
    pub fn new(type_name: &'a str, message: impl Into<Cow<'a, str>>) -> Self {
        Self {
            type_name,
            message: message.into(),
        }
    }

    /// Describes `error` by its type name and its `Display` output.
    #[must_use]
    pub fn from_error<E>(error: &E) -> Failure<'static>
    where
        E: std::error::Error + ?Sized,
    {
        let mut message = String::new();
        let _ = write!(message, "{error}");
        Failure {
            type_name: std::any::type_name::<E>(),
            message: Cow::Owned(message),
        }
    }

    #[must_use]
    pub const fn type_name(&self) -> &'a str {
        self.type_name
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
