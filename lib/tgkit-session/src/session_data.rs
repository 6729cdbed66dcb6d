// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::HashMap;

use crate::{PeerId, PeerInfo, Session};

/// Datacenter used by sessions that have never connected anywhere.
pub const DEFAULT_DC: i32 = 2;

/// Plain representation of everything a [`Session`] stores.
///
/// Serves as the intermediate step when moving data between storages.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionData {
    pub home_dc: i32,
    pub peer_infos: HashMap<PeerId, PeerInfo>,
    pub usernames: HashMap<String, PeerId>,
}

impl Default for SessionData {
    fn default() -> Self {
        Self {
            home_dc: DEFAULT_DC,
            peer_infos: HashMap::new(),
            usernames: HashMap::new(),
        }
    }
}

impl SessionData {
    /// Copy all of the data into the given session.
    pub fn import_to<S: Session + ?Sized>(&self, session: &S) {
        session.set_home_dc_id(self.home_dc);
        self.peer_infos
            .values()
            .for_each(|peer| session.cache_peer(peer));
        self.usernames
            .iter()
            .for_each(|(username, peer)| session.cache_username(username, *peer));
    }
}
