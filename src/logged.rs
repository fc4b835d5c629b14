use std::{
    ops::{Deref, DerefMut},
    sync::Arc,
};

use crate::{
    CallValue, Failure, FutureExt, InterceptedFuture, Invocation, LoggingInterceptor,
    ToCallValue,
};

/// A wrapper that logs the calls made through it against the wrapped target.
///
/// The wrapper is created once per target, usually with
/// [`LoggingInterceptor::wrap`]. Each call method runs a closure against the
/// target and applies the interceptor advice around it; the closure result is
/// handed back unchanged. The target type name is used as the log target.
///
/// Implementing a trait of the target for `Logged<Target>` by forwarding every
/// method through [`call`](Self::call) or [`try_call`](Self::try_call) gives a
/// logging decorator with the same interface as the target.
///
/// Calls made through [`Deref`] are not intercepted.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use invocation_logger::{CallValue, LoggingInterceptor};
///
/// struct Inventory {
///     items: Vec<String>,
/// }
///
/// let interceptor = Arc::new(LoggingInterceptor::new());
/// let mut inventory = interceptor.wrap(Inventory { items: Vec::new() });
///
/// let item = "apple".to_owned();
/// inventory.call_mut("add", &[CallValue::str(&item)], |inventory| {
///     inventory.items.push(item.clone());
/// });
/// let count = inventory.call("count", &[], |inventory| inventory.items.len());
/// assert_eq!(count, 1);
/// ```
pub struct Logged<T> {
    target: T,
    interceptor: Arc<LoggingInterceptor>,
}

impl<T> Logged<T> {
    pub const fn new(target: T, interceptor: Arc<LoggingInterceptor>) -> Self {
        Self {
            target,
            interceptor,
        }
    }

    #[must_use]
    pub fn interceptor(&self) -> &LoggingInterceptor {
        &self.interceptor
    }

    pub fn into_inner(self) -> T {
        self.target
    }

    /// Calls `method` with shared access to the target.
    pub fn call<R, F>(&self, method: &str, args: &[CallValue<'_>], f: F) -> R
    where
        F: FnOnce(&T) -> R,
        R: ToCallValue,
    {
        let invocation = Self::invocation(method, args);
        self.interceptor.before(&invocation);
        let result = f(&self.target);
        self.interceptor
            .after_returning(&invocation, &result.to_call_value());
        result
    }

    /// Calls `method` with exclusive access to the target.
    pub fn call_mut<R, F>(&mut self, method: &str, args: &[CallValue<'_>], f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
        R: ToCallValue,
    {
        let invocation = Self::invocation(method, args);
        self.interceptor.before(&invocation);
        let result = f(&mut self.target);
        self.interceptor
            .after_returning(&invocation, &result.to_call_value());
        result
    }

    /// Calls a fallible `method` with shared access to the target.
    ///
    /// # Errors
    ///
    /// Returns the error of the call as is, after it has been logged.
    pub fn try_call<R, E, F>(&self, method: &str, args: &[CallValue<'_>], f: F) -> Result<R, E>
    where
        F: FnOnce(&T) -> Result<R, E>,
        R: ToCallValue,
        E: std::error::Error,
    {
        let invocation = Self::invocation(method, args);
        self.interceptor.before(&invocation);
        let result = f(&self.target);
        self.after_result(&invocation, &result);
        result
    }

    /// Calls a fallible `method` with exclusive access to the target.
    ///
    /// # Errors
    ///
    /// Returns the error of the call as is, after it has been logged.
    pub fn try_call_mut<R, E, F>(
        &mut self,
        method: &str,
        args: &[CallValue<'_>],
        f: F,
    ) -> Result<R, E>
    where
        F: FnOnce(&mut T) -> Result<R, E>,
        R: ToCallValue,
        E: std::error::Error,
    {
        let invocation = Self::invocation(method, args);
        self.interceptor.before(&invocation);
        let result = f(&mut self.target);
        self.after_result(&invocation, &result);
        result
    }

    /// Calls an asynchronous fallible `method` with shared access to the target.
    ///
    /// The entry is logged right away, the exit or the failure once the returned
    /// future completes.
    pub fn try_call_async<'s, R, E, F, Fut>(
        &'s self,
        method: &'static str,
        args: &[CallValue<'_>],
        f: F,
    ) -> InterceptedFuture<Fut>
    where
        F: FnOnce(&'s T) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        R: ToCallValue,
        E: std::error::Error,
    {
        let invocation = Self::invocation(method, args);
        self.interceptor.before(&invocation);
        f(&self.target).intercepted(
            Arc::clone(&self.interceptor),
            std::any::type_name::<T>(),
            method,
        )
    }

    fn invocation<'a>(method: &'a str, args: &'a [CallValue<'a>]) -> Invocation<'a> {
        Invocation::of::<T>(method).with_arguments(args)
    }

    fn after_result<R, E>(&self, invocation: &Invocation<'_>, result: &Result<R, E>)
    where
        R: ToCallValue,
        E: std::error::Error,
    {
        match result {
            Ok(value) => self
                .interceptor
                .after_returning(invocation, &value.to_call_value()),
            Err(error) => self
                .interceptor
                .after_throwing(invocation, &Failure::from_error(error)),
        }
    }
}

impl<T> Deref for Logged<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.target
    }
}

impl<T> DerefMut for Logged<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.target
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Logged<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logged")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}
