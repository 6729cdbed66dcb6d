// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use tgkit_mtsender::{InvocationError, RpcError};
use web_time::{SystemTime, UNIX_EPOCH};

static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Generate a "random" ID suitable for sending messages or media.
///
/// Consecutive calls never return the same value.
pub(crate) fn generate_random_id() -> i64 {
    if LAST_ID.load(Ordering::SeqCst) == 0 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as i64)
            .unwrap_or(1);

        let _ = LAST_ID.compare_exchange(0, now, Ordering::SeqCst, Ordering::SeqCst);
    }

    LAST_ID.fetch_add(1, Ordering::SeqCst)
}

pub(crate) fn generate_random_ids(n: usize) -> Vec<i64> {
    (0..n).map(|_| generate_random_id()).collect()
}

pub(crate) fn date(timestamp: i32) -> DateTime<Utc> {
    DateTime::from_timestamp(timestamp as i64, 0).unwrap_or_default()
}

/// An error the server would have returned, raised locally when the request can't even be made.
pub(crate) fn artificial_rpc_error(code: i32, name: &str) -> InvocationError {
    InvocationError::Rpc(RpcError::new(code, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_ids_are_unique() {
        let ids = generate_random_ids(3);
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
    }

    #[test]
    fn dates_are_utc_seconds() {
        assert_eq!(date(86400).to_rfc3339(), "1970-01-02T00:00:00+00:00");
    }
}
