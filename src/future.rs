//! Interception of asynchronous calls.

use std::{
    pin::Pin,
    sync::Arc,
    task::{Context, Poll, ready},
};

use pin_project::pin_project;

use crate::{Failure, Invocation, LoggingInterceptor, ToCallValue};

/// Extension trait for futures produced by fallible asynchronous calls.
pub trait FutureExt: Future + Sized {
    /// Logs the exit or the failure of `method` on `target_type` once the future completes.
    ///
    /// The entry is not logged; call [`LoggingInterceptor::before`] when the call
    /// starts, or use [`Logged::try_call_async`](crate::Logged::try_call_async)
    /// which does both.
    fn intercepted(
        self,
        interceptor: Arc<LoggingInterceptor>,
        target_type: &'static str,
        method: &'static str,
    ) -> InterceptedFuture<Self>;
}

impl<F> FutureExt for F
where
    F: Future,
{
    fn intercepted(
        self,
        interceptor: Arc<LoggingInterceptor>,
        target_type: &'static str,
        method: &'static str,
    ) -> InterceptedFuture<Self> {
        InterceptedFuture {
            inner: self,
            interceptor,
            target_type,
            method,
        }
    }
}

#[pin_project]
#[derive(Debug)]
pub struct InterceptedFuture<F> {
    #[pin]
    inner: F,
    interceptor: Arc<LoggingInterceptor>,
    target_type: &'static str,
    method: &'static str,
}

impl<F, R, E> Future for InterceptedFuture<F>
where
    F: Future<Output = Result<R, E>>,
    R: ToCallValue,
    E: std::error::Error,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();

        let result = ready!(this.inner.poll(cx));
        let invocation = Invocation::new(*this.target_type, *this.method);
        match &result {
            Ok(value) => this
                .interceptor
                .after_returning(&invocation, &value.to_call_value()),
            Err(error) => this
                .interceptor
                .after_throwing(&invocation, &Failure::from_error(error)),
        }

        Poll::Ready(result)
    }
}
