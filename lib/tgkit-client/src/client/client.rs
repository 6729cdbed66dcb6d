// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;
use std::sync::Arc;

use tgkit_mtsender::SenderPoolHandle;
use tgkit_session::Session;

pub(crate) struct ClientInner {
    pub(crate) session: Arc<dyn Session>,
    pub(crate) handle: SenderPoolHandle,
    pub(crate) configuration: ClientConfiguration,
}

/// Wrapper around [`SenderPool`] to facilitate interaction with Telegram's API.
///
/// This structure is the "entry point" of the library, from which you can start using the rest.
/// Every method is available on this one type, and it can be cheaply cloned to use the same
/// connections from several tasks at once.
///
/// [`SenderPool`]: tgkit_mtsender::SenderPool
#[derive(Clone)]
pub struct Client(pub(crate) Arc<ClientInner>);

/// Configuration that controls the [`Client`] behaviour when making requests.
pub struct ClientConfiguration {
    /// The retry policy to use when encountering errors after invoking a request.
    pub retry_policy: Box<dyn super::RetryPolicy>,

    /// Whether to call [`Session::cache_peer`] on all peer information that
    /// the high-level methods receive as a response (e.g. [`Client::get_chat_history`]).
    ///
    /// The cached peers are then usable by other methods such as [`Client::resolve_peer`]
    /// for as long as the same session is used.
    pub auto_cache_peers: bool,
}

impl Default for ClientConfiguration {
    /// Returns an instance that with an [`AutoSleep::default`] retry policy,
    /// where encountered peers are automatically passed to [`Session::cache_peer`].
    ///
    /// [`AutoSleep::default`]: super::AutoSleep::default
    fn default() -> Self {
        Self {
            retry_policy: Box::new(super::AutoSleep::default()),
            auto_cache_peers: true,
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("home_dc_id", &self.0.session.home_dc_id())
            .field("auto_cache_peers", &self.0.configuration.auto_cache_peers)
            .finish_non_exhaustive()
    }
}
