// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use futures_util::future::BoxFuture;

use crate::InvocationError;

/// A single established connection to one datacenter.
///
/// Implementations take care of everything below the API layer: transport,
/// encryption and message sequencing. To the rest of the libraries, the
/// connection is an opaque primitive mapping a serialized request body to
/// the serialized body of its result.
///
/// If the server answered with an error, the returned body should be the
/// serialized `rpc_error`, which the [`crate::SenderPool`] turns into
/// [`InvocationError::Rpc`].
pub trait Connection: Send + Sync {
    /// Invoke a request and wait for its serialized result.
    fn invoke(&self, body: Vec<u8>) -> BoxFuture<'_, Result<Vec<u8>, InvocationError>>;
}

/// Factory for [`Connection`]s, used by the [`crate::SenderPool`]
/// when the first request to a datacenter is made.
pub trait Connector: Send + Sync {
    /// Establish a new connection to the given datacenter.
    ///
    /// Should fail with [`InvocationError::InvalidDc`] if the datacenter is unknown.
    fn connect(&self, dc_id: i32) -> BoxFuture<'_, Result<Box<dyn Connection>, InvocationError>>;
}
