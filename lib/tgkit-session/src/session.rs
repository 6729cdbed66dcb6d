// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::{PeerId, PeerInfo};

/// The main interface to interact with the different [`crate::storages`].
///
/// All methods are synchronous and infallible because clients are not
/// equipped to deal with the arbitrary errors that a dynamic `Session`
/// could produce.
///
/// A newly-created storage should return the same values that
/// [`crate::SessionData::default`] would produce.
pub trait Session: Send + Sync {
    /// Datacenter that is "home" to the user authorized by this session.
    ///
    /// This method should be cheap to call, because it is used on every request.
    fn home_dc_id(&self) -> i32;

    /// Changes the [`Session::home_dc_id`] after finding out the actual datacenter
    /// to which main queries should be executed against.
    fn set_home_dc_id(&self, dc_id: i32);

    /// Query a single peer by its identity.
    ///
    /// Querying for [`PeerId::self_user`] returns the logged-in account,
    /// if it has been cached with its `is_self` flag set.
    fn peer(&self, peer: PeerId) -> Option<PeerInfo>;

    /// Cache a peer's basic information for [`Session::peer`] to be able to query them later.
    ///
    /// Information already known about the peer that the new sighting lacks,
    /// such as its authority, must be preserved (see [`PeerInfo::merge`]).
    fn cache_peer(&self, peer: &PeerInfo);

    /// Query a peer by its lowercase username, as remembered by [`Session::cache_username`].
    fn peer_by_username(&self, username: &str) -> Option<PeerId>;

    /// Remember which peer a username resolved to.
    fn cache_username(&self, username: &str, peer: PeerId);
}
