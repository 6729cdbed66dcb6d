// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Deciding whether a failed request is sent again, and after how long.
use std::num::NonZeroU32;
use std::ops::ControlFlow;
use std::time::Duration;

use tgkit_mtsender::{InvocationError, RpcError};

/// Decides what [`crate::Client::invoke`] does when a request fails.
///
/// Closures taking a [`RetryContext`] are policies too.
pub trait RetryPolicy: Send + Sync {
    /// `Continue` with the delay to sleep before sending the request again, or `Break` to
    /// return the error in the context to the caller.
    fn should_retry(&self, ctx: &RetryContext) -> ControlFlow<(), Duration>;
}

impl<F> RetryPolicy for F
where
    F: Fn(&RetryContext) -> ControlFlow<(), Duration> + Send + Sync,
{
    fn should_retry(&self, ctx: &RetryContext) -> ControlFlow<(), Duration> {
        self(ctx)
    }
}

/// What is known about a request that keeps failing.
pub struct RetryContext {
    /// How many times the request has failed, including the `error`.
    pub fail_count: NonZeroU32,
    /// Total of the delays slept on before each retry.
    pub slept_so_far: Duration,
    /// The error of the last attempt.
    pub error: InvocationError,
}

impl RetryContext {
    pub(crate) fn new(error: InvocationError) -> Self {
        Self {
            fail_count: NonZeroU32::MIN,
            slept_so_far: Duration::ZERO,
            error,
        }
    }

    /// Account for another failed attempt after sleeping for `delay`.
    pub(crate) fn failed_again(&mut self, delay: Duration, error: InvocationError) {
        self.fail_count = self.fail_count.saturating_add(1);
        self.slept_so_far += delay;
        self.error = error;
    }

    fn is_first_failure(&self) -> bool {
        self.fail_count == NonZeroU32::MIN
    }
}

/// Never retries.
pub struct NoRetries;

impl RetryPolicy for NoRetries {
    fn should_retry(&self, _: &RetryContext) -> ControlFlow<(), Duration> {
        ControlFlow::Break(())
    }
}

/// Retries a request once, after sleeping through a flood or slow mode wait that is no longer
/// than [`AutoSleep::threshold`].
pub struct AutoSleep {
    /// The longest wait that is slept through. With `FLOOD_WAIT_17` and a threshold of 20
    /// seconds the request is sent again after 17 seconds, while `FLOOD_WAIT_21` is returned.
    pub threshold: Duration,

    /// How long to wait before retrying after an I/O error, or `None` to return them.
    /// The `threshold` does not apply to it.
    pub io_errors_as_flood_of: Option<Duration>,
}

impl Default for AutoSleep {
    /// Sleeps through waits of up to a minute, and for a second after I/O errors.
    fn default() -> Self {
        Self {
            threshold: Duration::from_secs(60),
            io_errors_as_flood_of: Some(Duration::from_secs(1)),
        }
    }
}

impl RetryPolicy for AutoSleep {
    fn should_retry(&self, ctx: &RetryContext) -> ControlFlow<(), Duration> {
        if !ctx.is_first_failure() {
            return ControlFlow::Break(());
        }
        let delay = match &ctx.error {
            InvocationError::Io(_) => self.io_errors_as_flood_of,
            error => error
                .rpc()
                .and_then(RpcError::flood_wait)
                .filter(|wait| *wait <= self.threshold),
        };
        delay.map_or(ControlFlow::Break(()), ControlFlow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn context(fail_count: u32, error: InvocationError) -> RetryContext {
        let mut ctx = RetryContext::new(error);
        ctx.fail_count = NonZeroU32::new(fail_count).unwrap();
        ctx
    }

    fn rpc(code: i32, name: &str, value: Option<u32>) -> InvocationError {
        InvocationError::Rpc(RpcError {
            value,
            ..RpcError::new(code, name)
        })
    }

    fn flood(seconds: u32) -> InvocationError {
        rpc(420, "FLOOD_WAIT", Some(seconds))
    }

    #[test]
    fn sleeps_once_on_short_floods() {
        let policy = AutoSleep::default();
        assert_eq!(
            policy.should_retry(&context(1, flood(17))),
            ControlFlow::Continue(Duration::from_secs(17))
        );
        assert_eq!(policy.should_retry(&context(2, flood(17))), ControlFlow::Break(()));
        assert_eq!(policy.should_retry(&context(1, flood(61))), ControlFlow::Break(()));
    }

    #[test]
    fn slow_mode_counts_as_a_flood() {
        assert_eq!(
            AutoSleep::default().should_retry(&context(1, rpc(420, "SLOWMODE_WAIT", Some(3)))),
            ControlFlow::Continue(Duration::from_secs(3))
        );
    }

    #[test]
    fn io_errors_are_configurable() {
        let io_error = || InvocationError::Io(io::Error::from(io::ErrorKind::ConnectionReset));
        assert_eq!(
            AutoSleep::default().should_retry(&context(1, io_error())),
            ControlFlow::Continue(Duration::from_secs(1))
        );

        let policy = AutoSleep {
            io_errors_as_flood_of: None,
            ..AutoSleep::default()
        };
        assert_eq!(policy.should_retry(&context(1, io_error())), ControlFlow::Break(()));
    }

    #[test]
    fn other_errors_are_not_retried() {
        let error = rpc(400, "CHAT_ADMIN_REQUIRED", None);
        assert_eq!(AutoSleep::default().should_retry(&context(1, error)), ControlFlow::Break(()));
        assert_eq!(NoRetries.should_retry(&context(1, flood(1))), ControlFlow::Break(()));
    }

    #[test]
    fn failures_accumulate_in_the_context() {
        let mut ctx = RetryContext::new(flood(2));
        ctx.failed_again(Duration::from_secs(2), InvocationError::Dropped);
        assert_eq!(ctx.fail_count.get(), 2);
        assert_eq!(ctx.slept_so_far, Duration::from_secs(2));
        assert!(matches!(ctx.error, InvocationError::Dropped));
    }

    #[test]
    fn closures_are_policies() {
        let up_to_three = |ctx: &RetryContext| {
            if ctx.fail_count.get() < 3 {
                ControlFlow::Continue(Duration::from_millis(10))
            } else {
                ControlFlow::Break(())
            }
        };
        assert_eq!(
            up_to_three.should_retry(&context(2, InvocationError::Dropped)),
            ControlFlow::Continue(Duration::from_millis(10))
        );
        assert_eq!(
            up_to_three.should_retry(&context(3, InvocationError::Dropped)),
            ControlFlow::Break(())
        );
    }
}
