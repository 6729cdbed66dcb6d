// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use tgkit_session::{PeerAuth, PeerId, PeerRef};
use tgkit_tl_types as tl;

/// A broadcast channel.
///
/// In a broadcast channel, only administrators can broadcast messages to all the subscribers.
/// The rest of users can only join and see messages.
#[derive(Clone, Debug, PartialEq)]
pub struct Channel {
    pub raw: tl::enums::Chat,
    pub(crate) id: PeerId,
}

impl Channel {
    /// Return the unique identifier for this channel.
    pub fn id(&self) -> PeerId {
        self.id
    }

    pub(crate) fn auth(&self) -> Option<PeerAuth> {
        super::chat_auth(&self.raw)
    }

    /// Convert the channel to its reference, if it was not a "min" sighting.
    pub fn to_ref(&self) -> Option<PeerRef> {
        self.auth().map(|auth| PeerRef {
            id: self.id(),
            auth,
        })
    }

    /// Return the title of this channel.
    pub fn title(&self) -> Option<&str> {
        match &self.raw {
            tl::enums::Chat::Channel(channel) => Some(channel.title.as_str()),
            tl::enums::Chat::ChannelForbidden(channel) => Some(channel.title.as_str()),
            _ => None,
        }
    }

    /// Return the public @username of this channel, if any.
    ///
    /// The returned username does not contain the "@" prefix.
    pub fn username(&self) -> Option<&str> {
        match &self.raw {
            tl::enums::Chat::Channel(channel) => channel.username.as_deref(),
            _ => None,
        }
    }

    /// Whether the logged-in account created this channel.
    pub fn is_creator(&self) -> bool {
        matches!(&self.raw, tl::enums::Chat::Channel(channel) if channel.creator)
    }

    /// The administrator rights the logged-in account has in this channel, if any.
    pub fn admin_rights(&self) -> Option<&tl::types::ChatAdminRights> {
        match &self.raw {
            tl::enums::Chat::Channel(channel) => match &channel.admin_rights {
                Some(tl::enums::ChatAdminRights::Rights(rights)) => Some(rights),
                None => None,
            },
            _ => None,
        }
    }
}
