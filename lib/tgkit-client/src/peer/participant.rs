// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use chrono::{DateTime, Utc};
use tgkit_session::{PeerId, PeerIdOutOfRange};
use tgkit_tl_types as tl;

use super::{ChatPrivileges, PeerMap, User};
use crate::message::Message;
use crate::utils;

/// Chat participant with default permissions.
#[derive(Clone, Debug, PartialEq)]
pub struct Normal {
    date: i32,
    inviter_id: Option<PeerId>,
}

/// Chat participant that created the chat itself.
#[derive(Clone, Debug, PartialEq)]
pub struct Creator {
    privileges: ChatPrivileges,
    rank: Option<String>,
}

/// Chat participant promoted to administrator.
#[derive(Clone, Debug, PartialEq)]
pub struct Admin {
    can_edit: bool,
    inviter_id: Option<PeerId>,
    promoted_by: PeerId,
    date: i32,
    privileges: ChatPrivileges,
    rank: Option<String>,
}

/// Chat participant demoted to have restrictions.
#[derive(Clone, Debug, PartialEq)]
pub struct Banned {
    left: bool,
    kicked_by: PeerId,
    date: i32,
    rights: tl::types::ChatBannedRights,
}

/// Participant role within a group or channel.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum Role {
    User(Normal),
    Creator(Creator),
    Admin(Admin),
    Banned(Banned),
    Left,
}

/// Member and their role within the group or channel.
///
/// The `user` is only present if the response included it, which is not the case
/// when the member is a chat or channel, as happens with some bans.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct Participant {
    pub id: PeerId,
    pub user: Option<User>,
    pub role: Role,
}

/// Result of [`crate::Client::promote_chat_member`].
#[derive(Clone, Debug)]
pub enum Promotion {
    /// The service message produced by the promotion.
    Message(Box<Message>),
    /// The promotion took place without producing a message, with the server's verdict.
    Applied(bool),
}

impl Normal {
    /// Date when the participant joined.
    pub fn date(&self) -> DateTime<Utc> {
        utils::date(self.date)
    }

    /// Identifier of the person that invited the participant into the chat, if known.
    pub fn inviter_id(&self) -> Option<PeerId> {
        self.inviter_id
    }
}

impl Creator {
    /// Privileges this creator has in the chat.
    pub fn privileges(&self) -> &ChatPrivileges {
        &self.privileges
    }

    /// Custom administrator title.
    pub fn rank(&self) -> Option<&str> {
        self.rank.as_deref()
    }
}

impl Admin {
    /// Whether the logged-in account can edit the privileges of this administrator.
    pub fn can_edit(&self) -> bool {
        self.can_edit
    }

    /// Identifier of the person that invited the participant into the chat, if known.
    pub fn inviter_id(&self) -> Option<PeerId> {
        self.inviter_id
    }

    /// Identifier of the person that promoted the participant.
    pub fn promoted_by(&self) -> PeerId {
        self.promoted_by
    }

    pub fn date(&self) -> DateTime<Utc> {
        utils::date(self.date)
    }

    /// Privileges this administrator has in the chat.
    pub fn privileges(&self) -> &ChatPrivileges {
        &self.privileges
    }

    /// Custom administrator title.
    pub fn rank(&self) -> Option<&str> {
        self.rank.as_deref()
    }
}

impl Banned {
    pub fn left(&self) -> bool {
        self.left
    }

    /// Identifier of the person that kicked the participant from the chat.
    pub fn kicked_by(&self) -> PeerId {
        self.kicked_by
    }

    pub fn date(&self) -> DateTime<Utc> {
        utils::date(self.date)
    }

    /// Raw restrictions applied to the participant.
    pub fn rights(&self) -> &tl::types::ChatBannedRights {
        &self.rights
    }

    /// Date when the restrictions are lifted, or `None` if they are permanent.
    pub fn until_date(&self) -> Option<DateTime<Utc>> {
        Some(self.rights.until_date)
            .filter(|&date| date != 0)
            .map(utils::date)
    }
}

impl Role {
    /// Custom administrator title, if the participant is the creator or an administrator.
    pub fn rank(&self) -> Option<&str> {
        match self {
            Self::Creator(creator) => creator.rank(),
            Self::Admin(admin) => admin.rank(),
            _ => None,
        }
    }

    /// Privileges held by the participant, if they are the creator or an administrator.
    pub fn privileges(&self) -> Option<&ChatPrivileges> {
        match self {
            Self::Creator(creator) => Some(creator.privileges()),
            Self::Admin(admin) => Some(admin.privileges()),
            _ => None,
        }
    }
}

impl Participant {
    /// Fails if any of the users involved has an identifier out of range.
    pub(crate) fn from_raw_channel(
        peers: &mut PeerMap,
        participant: tl::enums::ChannelParticipant,
    ) -> Result<Self, PeerIdOutOfRange> {
        use tl::enums::ChannelParticipant as P;

        let (id, role) = match participant {
            P::Participant(p) => (
                PeerId::try_user(p.user_id)?,
                Role::User(Normal {
                    date: p.date,
                    inviter_id: None,
                }),
            ),
            P::ParticipantSelf(p) => (
                PeerId::try_user(p.user_id)?,
                Role::User(Normal {
                    date: p.date,
                    inviter_id: Some(PeerId::try_user(p.inviter_id)?),
                }),
            ),
            P::Creator(p) => (
                PeerId::try_user(p.user_id)?,
                Role::Creator(Creator {
                    privileges: ChatPrivileges::from(&p.admin_rights),
                    rank: p.rank,
                }),
            ),
            P::Admin(p) => (
                PeerId::try_user(p.user_id)?,
                Role::Admin(Admin {
                    can_edit: p.can_edit,
                    inviter_id: p.inviter_id.map(PeerId::try_user).transpose()?,
                    promoted_by: PeerId::try_user(p.promoted_by)?,
                    date: p.date,
                    privileges: ChatPrivileges::from(&p.admin_rights),
                    rank: p.rank,
                }),
            ),
            P::Banned(p) => {
                let tl::enums::ChatBannedRights::Rights(rights) = p.banned_rights;
                (
                    PeerId::try_from(&p.peer)?,
                    Role::Banned(Banned {
                        left: p.left,
                        kicked_by: PeerId::try_user(p.kicked_by)?,
                        date: p.date,
                        rights,
                    }),
                )
            }
            P::Left(p) => (PeerId::try_from(&p.peer)?, Role::Left),
        };

        let user = match id.kind() {
            tgkit_session::PeerKind::User => peers.take_user(id.bare_id()),
            _ => None,
        };

        Ok(Self { id, user, role })
    }
}

impl Promotion {
    /// The service message produced by the promotion, if any.
    pub fn message(&self) -> Option<&Message> {
        match self {
            Self::Message(message) => Some(message),
            Self::Applied(_) => None,
        }
    }

    /// Whether the promotion succeeded.
    ///
    /// Producing a service message always counts as success.
    pub fn succeeded(&self) -> bool {
        match self {
            Self::Message(_) => true,
            Self::Applied(applied) => *applied,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peer::tests::raw_user;

    fn admin_rights() -> tl::enums::ChatAdminRights {
        ChatPrivileges {
            can_pin_messages: true,
            ..ChatPrivileges::default()
        }
        .write()
    }

    #[test]
    fn admins_keep_rank_and_privileges() {
        let mut peers = PeerMap::new([raw_user(10, 1)], []);
        let participant = Participant::from_raw_channel(
            &mut peers,
            tl::types::ChannelParticipantAdmin {
                can_edit: true,
                is_self: false,
                user_id: 10,
                inviter_id: None,
                promoted_by: 11,
                date: 100,
                admin_rights: admin_rights(),
                rank: Some("Mod".into()),
            }
            .into(),
        )
        .unwrap();

        assert_eq!(participant.id, PeerId::user(10));
        assert_eq!(
            participant.user.as_ref().and_then(User::first_name),
            Some("Ada")
        );
        assert_eq!(participant.role.rank(), Some("Mod"));
        assert!(participant.role.privileges().unwrap().can_pin_messages);
        match participant.role {
            Role::Admin(admin) => assert_eq!(admin.promoted_by(), PeerId::user(11)),
            role => panic!("unexpected role: {role:?}"),
        }
    }

    #[test]
    fn banned_channels_have_no_user() {
        let mut peers = PeerMap::empty();
        let participant = Participant::from_raw_channel(
            &mut peers,
            tl::types::ChannelParticipantBanned {
                left: true,
                peer: tl::types::PeerChannel { channel_id: 4 }.into(),
                kicked_by: 11,
                date: 100,
                banned_rights: tl::types::ChatBannedRights {
                    view_messages: true,
                    send_messages: false,
                    send_media: false,
                    send_stickers: false,
                    send_gifs: false,
                    send_games: false,
                    send_inline: false,
                    embed_links: false,
                    send_polls: false,
                    change_info: false,
                    invite_users: false,
                    pin_messages: false,
                    manage_topics: false,
                    send_photos: false,
                    send_videos: false,
                    send_roundvideos: false,
                    send_audios: false,
                    send_voices: false,
                    send_docs: false,
                    send_plain: false,
                    until_date: 0,
                }
                .into(),
            }
            .into(),
        )
        .unwrap();

        assert_eq!(participant.id, PeerId::channel(4));
        assert!(participant.user.is_none());
        match participant.role {
            Role::Banned(banned) => {
                assert!(banned.left());
                assert_eq!(banned.until_date(), None);
            }
            role => panic!("unexpected role: {role:?}"),
        }
    }

    #[test]
    fn out_of_range_promoter_is_an_error() {
        let mut peers = PeerMap::new([raw_user(10, 1)], []);
        let err = Participant::from_raw_channel(
            &mut peers,
            tl::types::ChannelParticipantAdmin {
                can_edit: false,
                is_self: false,
                user_id: 10,
                inviter_id: None,
                promoted_by: 0,
                date: 100,
                admin_rights: admin_rights(),
                rank: None,
            }
            .into(),
        )
        .unwrap_err();
        assert_eq!(err.id, 0);
    }

    #[test]
    fn applied_promotions_report_verdict() {
        assert!(Promotion::Applied(true).succeeded());
        assert!(!Promotion::Applied(false).succeeded());
        assert!(Promotion::Applied(true).message().is_none());
    }
}
