// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::sync::Mutex;

use log::{trace, warn};

use crate::{PeerId, PeerInfo, PeerKind, Session, SessionData};

/// In-memory session interface.
///
/// Does not offer any way to persist the state, so everything it learns
/// is lost when dropped. Use [`MemorySession::snapshot`] to extract it.
#[derive(Default)]
pub struct MemorySession(Mutex<SessionData>);

impl From<SessionData> for MemorySession {
    fn from(session_data: SessionData) -> Self {
        Self(Mutex::new(session_data))
    }
}

impl MemorySession {
    /// Copy of all the data currently held.
    pub fn snapshot(&self) -> SessionData {
        self.0.lock().unwrap().clone()
    }
}

impl Session for MemorySession {
    fn home_dc_id(&self) -> i32 {
        self.0.lock().unwrap().home_dc
    }

    fn set_home_dc_id(&self, dc_id: i32) {
        self.0.lock().unwrap().home_dc = dc_id;
    }

    fn peer(&self, peer: PeerId) -> Option<PeerInfo> {
        let data = self.0.lock().unwrap();
        let info = if peer.kind() == PeerKind::UserSelf {
            data.peer_infos.values().find(|info| info.is_self()).cloned()
        } else {
            data.peer_infos.get(&peer).cloned()
        };
        if info.is_none() {
            trace!("peer {} is not cached", peer);
        }
        info
    }

    fn cache_peer(&self, peer: &PeerInfo) {
        let id = match peer.try_id() {
            Ok(id) => id,
            Err(e) => {
                warn!("not caching peer: {e}");
                return;
            }
        };
        let mut data = self.0.lock().unwrap();
        let merged = match data.peer_infos.get(&id) {
            Some(known) => known.merge(peer),
            None => peer.clone(),
        };
        trace!("caching peer {:?}", merged);
        data.peer_infos.insert(id, merged);
    }

    fn peer_by_username(&self, username: &str) -> Option<PeerId> {
        self.0
            .lock()
            .unwrap()
            .usernames
            .get(&username.to_lowercase())
            .copied()
    }

    fn cache_username(&self, username: &str, peer: PeerId) {
        self.0
            .lock()
            .unwrap()
            .usernames
            .insert(username.to_lowercase(), peer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PeerAuth;

    #[test]
    fn defaults_match_session_data() {
        let session = MemorySession::default();
        assert_eq!(session.home_dc_id(), SessionData::default().home_dc);
        assert_eq!(session.peer(PeerId::user(1)), None);
        assert_eq!(session.peer(PeerId::self_user()), None);
    }

    #[test]
    fn self_user_is_found_by_sentinel() {
        let session = MemorySession::default();
        let me = PeerInfo::User {
            id: 100,
            auth: Some(PeerAuth::from_hash(1)),
            bot: Some(false),
            is_self: Some(true),
        };
        session.cache_peer(&me);
        assert_eq!(session.peer(PeerId::self_user()), Some(me.clone()));
        assert_eq!(session.peer(PeerId::user(100)), Some(me));
    }

    #[test]
    fn caching_min_peer_keeps_hash() {
        let session = MemorySession::default();
        session.cache_peer(&PeerInfo::Channel {
            id: 7,
            auth: Some(PeerAuth::from_hash(70)),
            kind: None,
        });
        session.cache_peer(&PeerInfo::Channel {
            id: 7,
            auth: None,
            kind: Some(crate::ChannelKind::Megagroup),
        });
        assert_eq!(
            session.peer(PeerId::channel(7)),
            Some(PeerInfo::Channel {
                id: 7,
                auth: Some(PeerAuth::from_hash(70)),
                kind: Some(crate::ChannelKind::Megagroup),
            })
        );
    }

    #[test]
    fn out_of_range_peers_are_not_cached() {
        let session = MemorySession::default();
        session.cache_peer(&PeerInfo::User {
            id: 0,
            auth: Some(PeerAuth::from_hash(1)),
            bot: None,
            is_self: Some(true),
        });
        assert_eq!(session.peer(PeerId::self_user()), None);
        assert!(session.snapshot().peer_infos.is_empty());
    }

    #[test]
    fn usernames_are_case_insensitive() {
        let session = MemorySession::default();
        session.cache_username("SomeUser", PeerId::user(5));
        assert_eq!(session.peer_by_username("someuser"), Some(PeerId::user(5)));
        assert_eq!(session.peer_by_username("SOMEUSER"), Some(PeerId::user(5)));
    }

    #[test]
    fn data_can_be_moved_between_sessions() {
        let source = MemorySession::default();
        source.set_home_dc_id(4);
        source.cache_peer(&PeerInfo::Chat { id: 3 });
        source.cache_username("group", PeerId::chat(3));

        let target = MemorySession::default();
        source.snapshot().import_to(&target);
        assert_eq!(target.snapshot(), source.snapshot());
    }
}
