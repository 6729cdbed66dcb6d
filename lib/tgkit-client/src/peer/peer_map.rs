// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::collections::HashMap;
use std::sync::Arc;

use log::warn;
use tgkit_session::PeerId;
use tgkit_tl_types as tl;

use super::{Peer, User};

/// Helper structure to efficiently retrieve peers via their identifier.
///
/// A lot of responses include the peers related to them in the form of a list of users
/// and chats, making it annoying to extract a specific peer. This structure lets you
/// save those separate vectors in a single place and query them by using a `PeerId`.
///
/// Cloning the map is cheap, as the peers are shared behind a reference count.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PeerMap {
    map: Arc<HashMap<PeerId, Peer>>,
}

impl PeerMap {
    pub(crate) fn new<U, C>(users: U, chats: C) -> Self
    where
        U: IntoIterator<Item = tl::enums::User>,
        C: IntoIterator<Item = tl::enums::Chat>,
    {
        Self {
            map: Arc::new(
                users
                    .into_iter()
                    .map(Peer::from_user)
                    .chain(chats.into_iter().map(Peer::from_raw))
                    .filter_map(|peer| match peer {
                        Ok(peer) => Some((peer.id(), peer)),
                        Err(e) => {
                            warn!("dropping peer from response: {e}");
                            None
                        }
                    })
                    .collect(),
            ),
        }
    }

    pub(crate) fn empty() -> Self {
        Self::default()
    }

    /// Retrieve the full `Peer` object given its `PeerId`.
    pub fn get(&self, peer: PeerId) -> Option<&Peer> {
        self.map.get(&peer)
    }

    /// Take the full `Peer` object given its `PeerId`.
    ///
    /// The peer will be removed from the map if there are no other strong references to it.
    pub fn take(&mut self, peer: PeerId) -> Option<Peer> {
        match Arc::get_mut(&mut self.map) {
            Some(map) => map.remove(&peer),
            None => self.get(peer).cloned(),
        }
    }

    pub(crate) fn take_user(&mut self, user_id: i64) -> Option<User> {
        match self.take(PeerId::try_user(user_id).ok()?)? {
            Peer::User(user) => Some(user),
            _ => None,
        }
    }

    /// Iterate over the peers in the map.
    pub fn iter_peers(&self) -> impl Iterator<Item = &Peer> {
        self.map.values()
    }

    /// Amount of peers in the map.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the map contains no peers.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
