// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Types relating to users, groups and channels.
//!
//! Properties containing raw types are public and will either be called "raw" or prefixed with "raw_".\
//! Keep in mind that **these fields are not part of the semantic versioning guarantees**.

mod action;
mod channel;
mod chat_id;
mod chat_list;
mod group;
mod participant;
mod peer_map;
mod privileges;
mod user;

pub use action::{ActionSender, ChatAction};
pub use channel::Channel;
pub use chat_id::ChatId;
pub use chat_list::ChatList;
pub use group::Group;
pub use participant::{Admin, Banned, Creator, Normal, Participant, Promotion, Role};
pub use peer_map::PeerMap;
pub use privileges::ChatPrivileges;
pub use user::User;

use tgkit_session::{PeerAuth, PeerId, PeerIdOutOfRange, PeerInfo, PeerRef};
use tgkit_tl_types as tl;

/// A user, group, or broadcast channel.
///
/// * Private conversations with other people are treated as the peer of the user itself.
/// * Conversations in a group, whether it's a small group chat or a megagroup, are groups.
/// * Conversations where only administrators broadcast messages are known as channels.
#[derive(Clone, Debug, PartialEq)]
pub enum Peer {
    /// A [`User`].
    User(User),

    /// A [`Group`] chat.
    Group(Group),

    /// A broadcast [`Channel`].
    Channel(Channel),
}

impl Peer {
    pub(crate) fn from_user(user: tl::enums::User) -> Result<Self, PeerIdOutOfRange> {
        User::from_raw(user).map(Self::User)
    }

    /// Wrap a raw chat as either a [`Group`] or a broadcast [`Channel`].
    ///
    /// Fails if the identifier of the chat is not one Telegram could have assigned.
    pub fn from_raw(chat: tl::enums::Chat) -> Result<Self, PeerIdOutOfRange> {
        use tl::enums::Chat as C;

        let id = chat_id(&chat)?;
        let broadcast = match &chat {
            C::Empty(_) | C::Chat(_) | C::Forbidden(_) => false,
            C::Channel(channel) => channel.broadcast,
            C::ChannelForbidden(channel) => channel.broadcast,
        };

        Ok(if broadcast {
            Self::Channel(Channel { raw: chat, id })
        } else {
            Self::Group(Group { raw: chat, id })
        })
    }

    /// Return the unique identifier for this peer.
    ///
    /// Every account will see the same identifier for the same peer.
    pub fn id(&self) -> PeerId {
        match self {
            Self::User(user) => user.id(),
            Self::Group(group) => group.id(),
            Self::Channel(channel) => channel.id(),
        }
    }

    /// Non-min auth stored in the peer, if any.
    pub(crate) fn auth(&self) -> Option<PeerAuth> {
        match self {
            Self::User(user) => user.auth(),
            Self::Group(group) => group.auth(),
            Self::Channel(channel) => channel.auth(),
        }
    }

    /// Convert the peer to its reference, if the peer carried enough information to be used.
    pub fn to_ref(&self) -> Option<PeerRef> {
        self.auth().map(|auth| PeerRef {
            id: self.id(),
            auth,
        })
    }

    /// Return the name of this peer.
    ///
    /// For private conversations (users), this is their first name. For groups and channels,
    /// this is their title.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::User(user) => user.first_name(),
            Self::Group(group) => group.title(),
            Self::Channel(channel) => channel.title(),
        }
    }

    /// Return the public @username of this peer, if any.
    ///
    /// The returned username does not contain the "@" prefix.
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::User(user) => user.username(),
            Self::Group(group) => group.username(),
            Self::Channel(channel) => channel.username(),
        }
    }
}

impl From<&Peer> for PeerInfo {
    fn from(peer: &Peer) -> Self {
        match peer {
            Peer::User(user) => PeerInfo::from(&user.raw),
            Peer::Group(group) => PeerInfo::from(&group.raw),
            Peer::Channel(channel) => PeerInfo::from(&channel.raw),
        }
    }
}

fn chat_id(chat: &tl::enums::Chat) -> Result<PeerId, PeerIdOutOfRange> {
    use tl::enums::Chat;

    match chat {
        Chat::Empty(chat) => PeerId::try_chat(chat.id),
        Chat::Chat(chat) => PeerId::try_chat(chat.id),
        Chat::Forbidden(chat) => PeerId::try_chat(chat.id),
        Chat::Channel(channel) => PeerId::try_channel(channel.id),
        Chat::ChannelForbidden(channel) => PeerId::try_channel(channel.id),
    }
}

/// Non-min authority of a raw chat, as used by groups and channels.
pub(crate) fn chat_auth(chat: &tl::enums::Chat) -> Option<PeerAuth> {
    use tl::enums::Chat;

    match chat {
        Chat::Empty(_) | Chat::Chat(_) | Chat::Forbidden(_) => Some(PeerAuth::default()),
        Chat::Channel(channel) => channel
            .access_hash
            .filter(|_| !channel.min)
            .map(PeerAuth::from_hash),
        Chat::ChannelForbidden(channel) => Some(PeerAuth::from_hash(channel.access_hash)),
    }
}
