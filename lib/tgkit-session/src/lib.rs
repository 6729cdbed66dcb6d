// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This library serves as the session interface for the data that the
//! other tgkit libraries need to operate correctly:
//! - The "home" datacenter, to know where requests go by default.
//! - Cached peers, necessary to interact with the API.
//! - Cached usernames, to avoid resolving them over and over.
//!
//! To use with other libraries, you will want to instantiate one of the
//! [`storages`], which are what implement the [`Session`] trait.

#![deny(unsafe_code)]

mod peer;
mod session;
mod session_data;
pub mod storages;

pub use peer::{ChannelKind, PeerAuth, PeerId, PeerIdOutOfRange, PeerInfo, PeerKind, PeerRef};
pub use session::Session;
pub use session_data::{DEFAULT_DC, SessionData};
