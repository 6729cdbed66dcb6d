// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use tgkit_session::{PeerAuth, PeerId, PeerRef};
use tgkit_tl_types as tl;

/// A group chat.
///
/// Telegram's API internally distinguishes between "small group chats" and "megagroups", also
/// known as "supergroups" in the UI of Telegram applications.
///
/// Small group chats are the default, and offer less features than megagroups, but you can
/// join more of them. Certain actions in official clients, like setting a chat's username,
/// silently upgrade the chat to a megagroup.
#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    pub raw: tl::enums::Chat,
    pub(crate) id: PeerId,
}

impl Group {
    /// Return the unique identifier for this group.
    ///
    /// Note that if this group is migrated to a megagroup, both this group and the new one will
    /// exist as separate chats, with different identifiers.
    pub fn id(&self) -> PeerId {
        self.id
    }

    pub(crate) fn auth(&self) -> Option<PeerAuth> {
        super::chat_auth(&self.raw)
    }

    /// Convert the group to its reference, if it was not a "min" sighting.
    pub fn to_ref(&self) -> Option<PeerRef> {
        self.auth().map(|auth| PeerRef {
            id: self.id(),
            auth,
        })
    }

    /// Return the title of this group.
    ///
    /// The title will be `None` if the group is not accessible.
    pub fn title(&self) -> Option<&str> {
        use tl::enums::Chat;

        match &self.raw {
            Chat::Empty(_) => None,
            Chat::Chat(chat) => Some(chat.title.as_str()),
            Chat::Forbidden(chat) => Some(chat.title.as_str()),
            Chat::Channel(channel) => Some(channel.title.as_str()),
            Chat::ChannelForbidden(channel) => Some(channel.title.as_str()),
        }
    }

    /// Return the public @username of this group, if any.
    ///
    /// The returned username does not contain the "@" prefix.
    pub fn username(&self) -> Option<&str> {
        match &self.raw {
            tl::enums::Chat::Channel(channel) => channel.username.as_deref(),
            _ => None,
        }
    }

    /// Returns true if this group is a megagroup (also known as supergroups).
    ///
    /// In case inner type of group is Chat, then it's a small group chat.
    pub fn is_megagroup(&self) -> bool {
        matches!(
            self.raw,
            tl::enums::Chat::Channel(_) | tl::enums::Chat::ChannelForbidden(_)
        )
    }

    /// Amount of members in the group, if known.
    pub fn participants_count(&self) -> Option<i32> {
        match &self.raw {
            tl::enums::Chat::Chat(chat) => Some(chat.participants_count),
            tl::enums::Chat::Channel(channel) => channel.participants_count,
            _ => None,
        }
    }
}
