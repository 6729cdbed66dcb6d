// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Contains client-specific configuration and types.
//!
//! The methods themselves are grouped by what they act upon: [`Client`] methods
//! about chats and their members live next to the chat types, while the methods
//! about messages live next to the message iterators.

mod chats;
#[allow(clippy::module_inception)]
mod client;
mod iter_buffer;
mod messages;
mod net;
mod retry_policy;

pub(crate) use client::ClientInner;
pub use client::{Client, ClientConfiguration};
pub use iter_buffer::IterBuffer;
pub use messages::{GlobalSearchIter, MessageIter, ReplyIter, SearchIter};
pub use retry_policy::{AutoSleep, NoRetries, RetryContext, RetryPolicy};
