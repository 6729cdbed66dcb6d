// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This library takes care of dispatching serialized requests to the right
//! datacenter, initializing each connection the first time it is used.
//!
//! The [`SenderPoolRunner`] owns every [`Connection`] and must be driven,
//! typically by spawning [`SenderPoolRunner::run`] as a task. Requests are
//! then sent from any number of clones of the [`SenderPoolHandle`].

#![deny(unsafe_code)]

mod configuration;
mod connection;
mod errors;
mod sender_pool;

pub use configuration::ConnectionParams;
pub use connection::{Connection, Connector};
pub use errors::{InvocationError, RpcError};
pub use sender_pool::{SenderPool, SenderPoolHandle, SenderPoolRunner};
