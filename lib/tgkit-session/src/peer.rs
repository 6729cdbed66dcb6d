// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;
use std::ops::RangeInclusive;

use tgkit_tl_types as tl;

/// A compact peer identifier.
/// ```
/// use std::mem::size_of;
/// assert_eq!(size_of::<tgkit_session::PeerId>(), size_of::<i64>());
/// ```
///
/// The internal representation uses the Bot API Dialog ID format to
/// bit-pack both the peer's true identifier and its kind in a single integer:
/// users are positive, small group chats are negated, and channels are
/// negated after being offset by `1000000000000`.
///
/// See <https://core.telegram.org/api/bots/ids>.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(i64);

/// Witness to the session's authority from Telegram to interact with a peer,
/// known in the API as the `access_hash`.
///
/// [`PeerAuth::default`] represents the ambient authority, which Telegram accepts
/// for small group chats, and for other peers when it already considers the
/// logged-in account to be allowed to reach them.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PeerAuth(i64);

/// A peer identity together with the authority needed to use it in requests.
///
/// Converts into [`tl::enums::InputPeer`], [`tl::enums::InputUser`] and
/// [`tl::enums::InputChannel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PeerRef {
    /// The peer identity.
    pub id: PeerId,
    /// The authority bound to both the sibling identity and the session of the logged-in user.
    pub auth: PeerAuth,
}

/// [`PeerId`]'s kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PeerKind {
    /// A user or bot account.
    User,
    /// The logged-in account, before its true identifier is known.
    UserSelf,
    /// A small group chat.
    Chat,
    /// A broadcast channel, megagroup or gigagroup.
    Channel,
}

/// Everything the session remembers about a peer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PeerInfo {
    User {
        /// Bare user identifier. Always strictly positive.
        id: i64,
        /// Non-ambient authority bound to both the user and the session.
        auth: Option<PeerAuth>,
        /// Whether this user is a bot account.
        bot: Option<bool>,
        /// Whether this user is the logged-in account.
        is_self: Option<bool>,
    },
    Chat {
        /// Bare chat identifier. Always strictly positive.
        id: i64,
    },
    Channel {
        /// Bare channel identifier. Always strictly positive.
        id: i64,
        /// Non-ambient authority bound to both the channel and the session.
        auth: Option<PeerAuth>,
        /// What sort of channel this is, if known.
        kind: Option<ChannelKind>,
    },
}

/// Additional information about a [`PeerInfo::Channel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelKind {
    /// A channel with its `megagroup` flag set.
    Megagroup,
    /// A channel with its `broadcast` flag set.
    Broadcast,
    /// A channel with its `gigagroup` flag set.
    Gigagroup,
}

/// A peer identifier which does not fall within the range of its kind.
///
/// Produced when converting identifiers received from Telegram, such as a
/// `peerUser` whose `user_id` is zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeerIdOutOfRange {
    /// The kind the identifier was meant to have.
    pub kind: PeerKind,
    /// The bare identifier as it was received.
    pub id: i64,
}

impl fmt::Display for PeerIdOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            PeerKind::User | PeerKind::UserSelf => "user",
            PeerKind::Chat => "chat",
            PeerKind::Channel => "channel",
        };
        write!(f, "{kind} ID out of range: {}", self.id)
    }
}

impl std::error::Error for PeerIdOutOfRange {}

const USER_IDS: RangeInclusive<i64> = 1..=0xffffffffff;
const CHAT_IDS: RangeInclusive<i64> = 1..=999999999999;
const CHANNEL_IDS: RangeInclusive<i64> = 1..=997852516352;
const MONOFORUM_IDS: RangeInclusive<i64> = 1002147483649..=3000000000000;
const CHANNEL_OFFSET: i64 = 1000000000000;

/// Sentinel outside of every valid Bot API Dialog ID range, used for
/// the logged-in account while its true identifier is unknown.
const SELF_USER_ID: PeerId = PeerId(1 << 40);

/// Value used for `chat_id` parameters when the peer is not a small group chat.
///
/// Falls in the hole between the chat and channel ranges.
const EMPTY_CHAT_ID: i64 = -CHANNEL_OFFSET;

impl PeerId {
    /// The logged-in account.
    pub fn self_user() -> Self {
        SELF_USER_ID
    }

    /// Creates a peer identity for a user or bot account.
    ///
    /// # Panics
    ///
    /// Panics if the identifier is outside of the range Telegram uses for users.
    /// Use [`Self::try_user`] for identifiers that come from the network.
    pub fn user(id: i64) -> Self {
        match Self::try_user(id) {
            Ok(peer) => peer,
            Err(_) => panic!("user ID out of range"),
        }
    }

    /// Creates a peer identity for a small group chat.
    ///
    /// # Panics
    ///
    /// Panics if the identifier is outside of the range Telegram uses for chats.
    pub fn chat(id: i64) -> Self {
        match Self::try_chat(id) {
            Ok(peer) => peer,
            Err(_) => panic!("chat ID out of range"),
        }
    }

    /// Creates a peer identity for a channel of any kind.
    ///
    /// # Panics
    ///
    /// Panics if the identifier is outside of the range Telegram uses for channels.
    pub fn channel(id: i64) -> Self {
        match Self::try_channel(id) {
            Ok(peer) => peer,
            Err(_) => panic!("channel ID out of range"),
        }
    }

    /// Like [`Self::user`], but reports out-of-range identifiers instead of panicking.
    pub fn try_user(id: i64) -> Result<Self, PeerIdOutOfRange> {
        if USER_IDS.contains(&id) {
            Ok(Self(id))
        } else {
            Err(PeerIdOutOfRange { kind: PeerKind::User, id })
        }
    }

    /// Like [`Self::chat`], but reports out-of-range identifiers instead of panicking.
    pub fn try_chat(id: i64) -> Result<Self, PeerIdOutOfRange> {
        if CHAT_IDS.contains(&id) {
            Ok(Self(-id))
        } else {
            Err(PeerIdOutOfRange { kind: PeerKind::Chat, id })
        }
    }

    /// Like [`Self::channel`], but reports out-of-range identifiers instead of panicking.
    pub fn try_channel(id: i64) -> Result<Self, PeerIdOutOfRange> {
        if CHANNEL_IDS.contains(&id) || MONOFORUM_IDS.contains(&id) {
            Ok(Self(-(CHANNEL_OFFSET + id)))
        } else {
            Err(PeerIdOutOfRange { kind: PeerKind::Channel, id })
        }
    }

    /// Interprets a Bot API Dialog ID, such as `-1001234567890` for a channel.
    ///
    /// Returns `None` if the value does not belong to any peer kind.
    ///
    /// ```
    /// use tgkit_session::{PeerId, PeerKind};
    ///
    /// let id = PeerId::from_bot_api_dialog_id(-1001234567890).unwrap();
    /// assert_eq!(id.kind(), PeerKind::Channel);
    /// assert_eq!(id.bare_id(), 1234567890);
    /// assert!(PeerId::from_bot_api_dialog_id(0).is_none());
    /// ```
    pub fn from_bot_api_dialog_id(dialog_id: i64) -> Option<Self> {
        if USER_IDS.contains(&dialog_id) {
            Some(Self(dialog_id))
        } else if CHAT_IDS.contains(&-dialog_id) {
            Some(Self(dialog_id))
        } else {
            let bare = dialog_id.checked_neg()?.checked_sub(CHANNEL_OFFSET)?;
            (CHANNEL_IDS.contains(&bare) || MONOFORUM_IDS.contains(&bare)).then_some(Self(dialog_id))
        }
    }

    /// Peer kind.
    pub fn kind(self) -> PeerKind {
        if self == SELF_USER_ID {
            PeerKind::UserSelf
        } else if self.0 > 0 {
            PeerKind::User
        } else if CHAT_IDS.contains(&-self.0) {
            PeerKind::Chat
        } else {
            PeerKind::Channel
        }
    }

    /// Returns the identity using the Bot API Dialog ID format.
    ///
    /// The value for [`PeerKind::UserSelf`] is arbitrary and should not be persisted.
    pub fn bot_api_dialog_id(&self) -> i64 {
        self.0
    }

    /// Unpacked peer identifier, as used by Telegram's API.
    ///
    /// # Panics
    ///
    /// Panics if [`Self::kind`] is [`PeerKind::UserSelf`].
    pub fn bare_id(&self) -> i64 {
        match self.kind() {
            PeerKind::User => self.0,
            PeerKind::UserSelf => panic!("self-user ID not known"),
            PeerKind::Chat => -self.0,
            PeerKind::Channel => -self.0 - CHANNEL_OFFSET,
        }
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.bot_api_dialog_id().fmt(f)
    }
}

impl PeerAuth {
    /// Construct a new peer authentication using Telegram's `access_hash` value.
    pub fn from_hash(access_hash: i64) -> Self {
        PeerAuth(access_hash)
    }

    /// Grants access to the internal access hash.
    pub fn hash(&self) -> i64 {
        self.0
    }
}

impl Default for PeerAuth {
    /// The ambient authority, represented as a zero access hash.
    fn default() -> Self {
        Self(0)
    }
}

impl PeerRef {
    /// Reference to the logged-in account, which needs no authority.
    pub fn self_user() -> Self {
        Self {
            id: PeerId::self_user(),
            auth: PeerAuth::default(),
        }
    }
}

impl PeerInfo {
    /// Returns the `PeerId` represented by this info.
    ///
    /// The returned [`PeerId::kind()`] will never be [`PeerKind::UserSelf`].
    ///
    /// # Panics
    ///
    /// Panics if the bare identifier is out of range for its kind.
    pub fn id(&self) -> PeerId {
        match self.try_id() {
            Ok(id) => id,
            Err(e) => panic!("{e}"),
        }
    }

    /// Returns the `PeerId` represented by this info, if the bare identifier is in range.
    pub fn try_id(&self) -> Result<PeerId, PeerIdOutOfRange> {
        match self {
            PeerInfo::User { id, .. } => PeerId::try_user(*id),
            PeerInfo::Chat { id } => PeerId::try_chat(*id),
            PeerInfo::Channel { id, .. } => PeerId::try_channel(*id),
        }
    }

    /// Returns the `PeerAuth` stored in this info, or [`PeerAuth::default()`] if that info is not known.
    pub fn auth(&self) -> PeerAuth {
        match self {
            PeerInfo::User { auth, .. } | PeerInfo::Channel { auth, .. } => {
                auth.unwrap_or_default()
            }
            PeerInfo::Chat { .. } => PeerAuth::default(),
        }
    }

    /// Whether this info describes the logged-in account.
    pub fn is_self(&self) -> bool {
        matches!(self, PeerInfo::User { is_self: Some(true), .. })
    }

    /// Combines the information from a newer sighting of the same peer
    /// with what was already known, never forgetting a known authority.
    ///
    /// Telegram sends "min" constructors without an access hash,
    /// which must not overwrite a hash learnt earlier.
    pub fn merge(&self, newer: &PeerInfo) -> PeerInfo {
        match (self, newer) {
            (
                PeerInfo::User { auth, bot, is_self, .. },
                PeerInfo::User { id, auth: new_auth, bot: new_bot, is_self: new_is_self },
            ) => PeerInfo::User {
                id: *id,
                auth: new_auth.or(*auth),
                bot: new_bot.or(*bot),
                is_self: new_is_self.or(*is_self),
            },
            (
                PeerInfo::Channel { auth, kind, .. },
                PeerInfo::Channel { id, auth: new_auth, kind: new_kind },
            ) => PeerInfo::Channel {
                id: *id,
                auth: new_auth.or(*auth),
                kind: new_kind.or(*kind),
            },
            (_, newer) => newer.clone(),
        }
    }
}

impl From<PeerInfo> for PeerRef {
    fn from(peer: PeerInfo) -> Self {
        PeerRef::from(&peer)
    }
}

impl From<&PeerInfo> for PeerRef {
    fn from(peer: &PeerInfo) -> Self {
        PeerRef {
            id: peer.id(),
            auth: peer.auth(),
        }
    }
}

impl TryFrom<tl::enums::Peer> for PeerId {
    type Error = PeerIdOutOfRange;

    fn try_from(peer: tl::enums::Peer) -> Result<Self, Self::Error> {
        PeerId::try_from(&peer)
    }
}

impl TryFrom<&tl::enums::Peer> for PeerId {
    type Error = PeerIdOutOfRange;

    fn try_from(peer: &tl::enums::Peer) -> Result<Self, Self::Error> {
        match peer {
            tl::enums::Peer::User(user) => PeerId::try_user(user.user_id),
            tl::enums::Peer::Chat(chat) => PeerId::try_chat(chat.chat_id),
            tl::enums::Peer::Channel(channel) => PeerId::try_channel(channel.channel_id),
        }
    }
}

impl From<&tl::enums::User> for PeerInfo {
    fn from(user: &tl::enums::User) -> Self {
        match user {
            tl::enums::User::Empty(user) => PeerInfo::User {
                id: user.id,
                auth: None,
                bot: None,
                is_self: None,
            },
            tl::enums::User::User(user) => PeerInfo::User {
                id: user.id,
                auth: if user.min {
                    None
                } else {
                    user.access_hash.map(PeerAuth::from_hash)
                },
                bot: Some(user.bot),
                is_self: Some(user.is_self),
            },
        }
    }
}

impl From<&tl::enums::Chat> for PeerInfo {
    fn from(chat: &tl::enums::Chat) -> Self {
        match chat {
            tl::enums::Chat::Empty(chat) => PeerInfo::Chat { id: chat.id },
            tl::enums::Chat::Chat(chat) => PeerInfo::Chat { id: chat.id },
            tl::enums::Chat::Forbidden(chat) => PeerInfo::Chat { id: chat.id },
            tl::enums::Chat::Channel(channel) => PeerInfo::Channel {
                id: channel.id,
                auth: if channel.min {
                    None
                } else {
                    channel.access_hash.map(PeerAuth::from_hash)
                },
                kind: Some(if channel.gigagroup {
                    ChannelKind::Gigagroup
                } else if channel.megagroup {
                    ChannelKind::Megagroup
                } else {
                    ChannelKind::Broadcast
                }),
            },
            tl::enums::Chat::ChannelForbidden(channel) => PeerInfo::Channel {
                id: channel.id,
                auth: Some(PeerAuth::from_hash(channel.access_hash)),
                kind: Some(if channel.megagroup {
                    ChannelKind::Megagroup
                } else {
                    ChannelKind::Broadcast
                }),
            },
        }
    }
}

impl From<tl::enums::InputPeer> for PeerRef {
    /// # Panics
    ///
    /// Panics on [`tl::enums::InputPeer::Empty`], which references no peer,
    /// and on identifiers out of range for their kind.
    fn from(peer: tl::enums::InputPeer) -> Self {
        match peer {
            tl::enums::InputPeer::Empty => panic!("InputPeer::Empty cannot be converted to any Peer"),
            tl::enums::InputPeer::PeerSelf => PeerRef::self_user(),
            tl::enums::InputPeer::User(user) => PeerRef {
                id: PeerId::user(user.user_id),
                auth: PeerAuth::from_hash(user.access_hash),
            },
            tl::enums::InputPeer::Chat(chat) => PeerRef {
                id: PeerId::chat(chat.chat_id),
                auth: PeerAuth::default(),
            },
            tl::enums::InputPeer::Channel(channel) => PeerRef {
                id: PeerId::channel(channel.channel_id),
                auth: PeerAuth::from_hash(channel.access_hash),
            },
        }
    }
}

impl From<PeerId> for tl::enums::Peer {
    /// # Panics
    ///
    /// Panics if the kind is [`PeerKind::UserSelf`], whose true identifier is unknown.
    fn from(peer: PeerId) -> Self {
        match peer.kind() {
            PeerKind::User => tl::types::PeerUser {
                user_id: peer.bare_id(),
            }
            .into(),
            PeerKind::UserSelf => panic!("self-user ID not known"),
            PeerKind::Chat => tl::types::PeerChat {
                chat_id: peer.bare_id(),
            }
            .into(),
            PeerKind::Channel => tl::types::PeerChannel {
                channel_id: peer.bare_id(),
            }
            .into(),
        }
    }
}

impl From<PeerRef> for tl::enums::InputPeer {
    fn from(peer: PeerRef) -> Self {
        match peer.id.kind() {
            PeerKind::User => tl::types::InputPeerUser {
                user_id: peer.id.bare_id(),
                access_hash: peer.auth.hash(),
            }
            .into(),
            PeerKind::UserSelf => tl::enums::InputPeer::PeerSelf,
            PeerKind::Chat => tl::types::InputPeerChat {
                chat_id: peer.id.bare_id(),
            }
            .into(),
            PeerKind::Channel => tl::types::InputPeerChannel {
                channel_id: peer.id.bare_id(),
                access_hash: peer.auth.hash(),
            }
            .into(),
        }
    }
}

impl From<PeerRef> for tl::enums::InputUser {
    fn from(peer: PeerRef) -> Self {
        match peer.id.kind() {
            PeerKind::User => tl::types::InputUser {
                user_id: peer.id.bare_id(),
                access_hash: peer.auth.hash(),
            }
            .into(),
            PeerKind::UserSelf => tl::enums::InputUser::UserSelf,
            PeerKind::Chat | PeerKind::Channel => tl::enums::InputUser::Empty,
        }
    }
}

impl From<PeerRef> for tl::enums::InputChannel {
    fn from(peer: PeerRef) -> Self {
        match peer.id.kind() {
            PeerKind::Channel => tl::types::InputChannel {
                channel_id: peer.id.bare_id(),
                access_hash: peer.auth.hash(),
            }
            .into(),
            PeerKind::User | PeerKind::UserSelf | PeerKind::Chat => tl::enums::InputChannel::Empty,
        }
    }
}

impl From<PeerRef> for i64 {
    /// The `chat_id` to use in requests meant for small group chats.
    fn from(peer: PeerRef) -> Self {
        match peer.id.kind() {
            PeerKind::Chat => peer.id.bare_id(),
            PeerKind::User | PeerKind::UserSelf | PeerKind::Channel => EMPTY_CHAT_ID,
        }
    }
}
