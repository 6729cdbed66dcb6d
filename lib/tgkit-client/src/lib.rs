// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A high level client on top of a [`SenderPool`], exposing a flat set of methods on a
//! single [`Client`] type to count dialogs, manage chat administrators, and send, edit,
//! fetch, search and delete messages.
//!
//! Create the pool, hand it to [`Client::new`] along with a [`session::Session`],
//! and drive the pool's runner on a task of its own:
//!
//! ```
//! use std::sync::Arc;
//! use tgkit_client::{Client, SenderPool, sender::Connector, session::storages::MemorySession};
//!
//! # async fn f(connector: impl Connector + 'static) -> Result<(), Box<dyn std::error::Error>> {
//! const API_ID: i32 = 932939;
//!
//! let pool = SenderPool::new(connector, API_ID);
//! let client = Client::new(&pool, Arc::new(MemorySession::default()));
//! tokio::spawn(pool.runner.run());
//!
//! let dialogs = client.get_dialogs_count(false, Default::default()).await?;
//! println!("you have {dialogs} dialogs");
//! # Ok(())
//! # }
//! ```
//!
//! # Method cost
//!
//! When a method is said to be "expensive", calling it too much in a certain period of time
//! will result in the API returning "flood wait" errors, meaning that the method cannot be
//! called again for a certain amount of seconds. The default [`client::ClientConfiguration`]
//! sleeps on small flood errors so that simple scripts are not interrupted.
//!
//! # Re-exports
//!
//! The [`InvocationError`] is re-exported at the top level, as all methods that interact with
//! the API need to invoke a request and may thus fail. The rest of the lower-level crates are
//! re-exported as [`sender`], [`session`] and [`tl`]. Using the raw [`tl::types`] is possible
//! whenever the friendly types fall short, but they are **not part of the semantic versioning**.

#![deny(unsafe_code)]

pub mod client;
pub mod message;
pub mod peer;
pub(crate) mod utils;

pub use client::Client;
pub use tgkit_mtsender::{self as sender, InvocationError, SenderPool};
pub use tgkit_session as session;
pub use tgkit_tl_types as tl;

/// Alias for [`std::result::Result`] with the error set to [`InvocationError`].
pub type Result<T> = std::result::Result<T, InvocationError>;
