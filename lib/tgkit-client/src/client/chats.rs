// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Methods related to dialogs, users, groups and channels.

use log::{debug, trace};
use tgkit_mtsender::InvocationError;
use tgkit_session::{PeerAuth, PeerId, PeerInfo, PeerKind, PeerRef};
use tgkit_tl_types as tl;

use super::Client;
use crate::message::Message;
use crate::peer::{
    ActionSender, ChatId, ChatList, ChatPrivileges, Participant, Peer, PeerMap, Promotion, User,
};
use crate::utils;

impl Client {
    /// Count the dialogs in one of the chat lists of the logged-in account.
    ///
    /// With `pinned_only`, only the dialogs pinned at the top of the list are counted.
    /// Otherwise, every dialog in the list is, taking the total reported by Telegram
    /// whenever the response does not carry the whole list already.
    ///
    /// # Examples
    ///
    /// ```
    /// # async fn f(client: tgkit_client::Client) -> Result<(), Box<dyn std::error::Error>> {
    /// use tgkit_client::peer::ChatList;
    ///
    /// let all = client.get_dialogs_count(false, ChatList::Main).await?;
    /// let pinned = client.get_dialogs_count(true, ChatList::Main).await?;
    /// let archived = client.get_dialogs_count(false, ChatList::Archive).await?;
    /// println!("{pinned} of {all} dialogs are pinned, and {archived} are archived");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_dialogs_count(
        &self,
        pinned_only: bool,
        chat_list: ChatList,
    ) -> Result<usize, InvocationError> {
        let folder_id = chat_list.folder_id();

        if pinned_only {
            let tl::enums::messages::PeerDialogs::Dialogs(dialogs) = self
                .invoke(&tl::functions::messages::GetPinnedDialogs { folder_id })
                .await?;
            return Ok(dialogs.dialogs.len());
        }

        let count = match self
            .invoke(&tl::functions::messages::GetDialogs {
                exclude_pinned: false,
                folder_id: Some(folder_id),
                offset_date: 0,
                offset_id: 0,
                offset_peer: tl::enums::InputPeer::Empty,
                limit: 1,
                hash: 0,
            })
            .await?
        {
            tl::enums::messages::Dialogs::Dialogs(dialogs) => dialogs.dialogs.len(),
            tl::enums::messages::Dialogs::Slice(slice) => slice.count.max(0) as usize,
            tl::enums::messages::Dialogs::NotModified(dialogs) => dialogs.count.max(0) as usize,
        };
        Ok(count)
    }

    /// Promote a member of a group or channel to administrator, or demote them by
    /// passing [`ChatPrivileges::none`].
    ///
    /// The custom title the member already had as an administrator is preserved. If their
    /// current role cannot be fetched because Telegram answered with an error, they will
    /// be left without a title.
    ///
    /// Small group chats have no fine-grained privileges, so the member is only made an
    /// administrator there if any of the privileges is set.
    ///
    /// # Examples
    ///
    /// ```
    /// # async fn f(client: tgkit_client::Client) -> Result<(), Box<dyn std::error::Error>> {
    /// use tgkit_client::peer::ChatPrivileges;
    ///
    /// let privileges = ChatPrivileges {
    ///     can_pin_messages: true,
    ///     can_invite_users: true,
    ///     ..Default::default()
    /// };
    ///
    /// let promotion = client.promote_chat_member("@engines", "@ada", privileges).await?;
    /// if let Some(message) = promotion.message() {
    ///     println!("promoted in message {}", message.id());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn promote_chat_member<C: Into<ChatId>, U: Into<ChatId>>(
        &self,
        chat: C,
        user: U,
        privileges: ChatPrivileges,
    ) -> Result<Promotion, InvocationError> {
        let chat = self.resolve_peer(chat).await?;
        let user = self.resolve_peer(user).await?;

        match chat.id.kind() {
            PeerKind::Chat => {
                let applied = self
                    .invoke(&tl::functions::messages::EditChatAdmin {
                        chat_id: chat.into(),
                        user_id: user.into(),
                        is_admin: privileges.is_admin(),
                    })
                    .await?;
                return Ok(Promotion::Applied(applied));
            }
            PeerKind::Channel => {}
            PeerKind::User | PeerKind::UserSelf => {
                return Err(utils::artificial_rpc_error(400, "CHANNEL_INVALID"));
            }
        }

        let rank = match self
            .invoke(&tl::functions::channels::GetParticipant {
                channel: chat.into(),
                participant: user.into(),
            })
            .await
        {
            Ok(tl::enums::channels::ChannelParticipant::Participant(participant)) => {
                match participant.participant {
                    tl::enums::ChannelParticipant::Admin(admin) => admin.rank,
                    _ => None,
                }
            }
            Err(InvocationError::Rpc(err)) => {
                debug!("member has no rank to keep: {err}");
                None
            }
            Err(err) => return Err(err),
        };

        let updates = self
            .invoke(&tl::functions::channels::EditAdmin {
                channel: chat.into(),
                user_id: user.into(),
                admin_rights: privileges.write(),
                rank: rank.unwrap_or_default(),
            })
            .await?;

        Ok(match self.new_messages_from_updates(updates).into_iter().next() {
            Some(message) => Promotion::Message(Box::new(message)),
            None => Promotion::Applied(true),
        })
    }

    /// Fetch a member of a group or channel along with their role in it.
    ///
    /// Only channels and megagroups can be queried for a single member, so small group
    /// chats fail with `CHANNEL_INVALID`.
    pub async fn get_chat_member<C: Into<ChatId>, U: Into<ChatId>>(
        &self,
        chat: C,
        user: U,
    ) -> Result<Participant, InvocationError> {
        let chat = self.resolve_peer(chat).await?;
        if chat.id.kind() != PeerKind::Channel {
            return Err(utils::artificial_rpc_error(400, "CHANNEL_INVALID"));
        }
        let user = self.resolve_peer(user).await?;

        let tl::enums::channels::ChannelParticipant::Participant(participant) = self
            .invoke(&tl::functions::channels::GetParticipant {
                channel: chat.into(),
                participant: user.into(),
            })
            .await?;

        let mut peers = self.build_peer_map(participant.users, participant.chats);
        Participant::from_raw_channel(&mut peers, participant.participant).map_err(|e| {
            debug!("participant not usable: {e}");
            utils::artificial_rpc_error(400, "PEER_ID_INVALID")
        })
    }

    /// Turn anything that identifies a chat into a [`PeerRef`] usable in requests.
    ///
    /// The session is looked up first. Usernames not found there are resolved, and users
    /// or channels not found there are fetched with the ambient authority, which works
    /// for bot accounts and for peers the account has seen recently.
    ///
    /// # Examples
    ///
    /// ```
    /// # async fn f(client: tgkit_client::Client) -> Result<(), Box<dyn std::error::Error>> {
    /// let me = client.resolve_peer("me").await?;
    /// let channel = client.resolve_peer(-1001234567890_i64).await?;
    /// let person = client.resolve_peer("@ada").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn resolve_peer<C: Into<ChatId>>(&self, chat: C) -> Result<PeerRef, InvocationError> {
        match chat.into() {
            ChatId::Ref(peer) => Ok(peer),
            ChatId::Me => Ok(self
                .0
                .session
                .peer(PeerId::self_user())
                .map(PeerRef::from)
                .unwrap_or_else(PeerRef::self_user)),
            ChatId::Username(username) => {
                if let Some(id) = self.0.session.peer_by_username(&username) {
                    if let Some(info) = self.0.session.peer(id) {
                        return Ok(PeerRef::from(info));
                    }
                }
                match self.resolve_username(&username).await? {
                    Some(peer) => peer
                        .to_ref()
                        .ok_or_else(|| utils::artificial_rpc_error(400, "PEER_ID_INVALID")),
                    None => Err(utils::artificial_rpc_error(400, "USERNAME_NOT_OCCUPIED")),
                }
            }
            ChatId::Id(dialog_id) => {
                let id = PeerId::from_bot_api_dialog_id(dialog_id)
                    .ok_or_else(|| utils::artificial_rpc_error(400, "PEER_ID_INVALID"))?;
                self.resolve_peer_id(id).await
            }
        }
    }

    async fn resolve_peer_id(&self, id: PeerId) -> Result<PeerRef, InvocationError> {
        if let Some(info) = self.0.session.peer(id) {
            return Ok(PeerRef::from(info));
        }
        trace!("peer {id} not in session, fetching it");

        let ambient = PeerRef {
            id,
            auth: PeerAuth::default(),
        };
        let peer = match id.kind() {
            PeerKind::Chat | PeerKind::UserSelf => return Ok(ambient),
            PeerKind::User => self
                .invoke(&tl::functions::users::GetUsers {
                    id: vec![ambient.into()],
                })
                .await?
                .into_iter()
                .filter_map(|user| Peer::from_user(user).ok())
                .find(|peer| peer.id() == id),
            PeerKind::Channel => {
                let chats = match self
                    .invoke(&tl::functions::channels::GetChannels {
                        id: vec![ambient.into()],
                    })
                    .await?
                {
                    tl::enums::messages::Chats::Chats(chats) => chats.chats,
                    tl::enums::messages::Chats::Slice(chat_slice) => chat_slice.chats,
                };
                chats
                    .into_iter()
                    .filter_map(|chat| Peer::from_raw(chat).ok())
                    .find(|peer| peer.id() == id)
            }
        };

        let peer_ref = peer.as_ref().and_then(|peer| {
            self.cache_peer_maybe(peer);
            peer.to_ref()
        });
        peer_ref.ok_or_else(|| utils::artificial_rpc_error(400, "PEER_ID_INVALID"))
    }

    /// Resolves a username into the peer that owns it, if any.
    ///
    /// Note that this method is expensive to call, and can quickly cause long flood waits.
    ///
    /// The leading "@" may be included. Successfully resolved usernames are remembered by
    /// the session, so [`Client::resolve_peer`] won't need to resolve them again.
    ///
    /// # Examples
    ///
    /// ```
    /// # async fn f(client: tgkit_client::Client) -> Result<(), Box<dyn std::error::Error>> {
    /// if let Some(peer) = client.resolve_username("username").await? {
    ///     println!("Found peer!: {:?}", peer.name());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn resolve_username(&self, username: &str) -> Result<Option<Peer>, InvocationError> {
        let username = username.trim_start_matches('@');
        let tl::types::contacts::ResolvedPeer { peer, users, chats } = match self
            .invoke(&tl::functions::contacts::ResolveUsername {
                username: username.into(),
            })
            .await
        {
            Ok(tl::enums::contacts::ResolvedPeer::Peer(p)) => p,
            Err(err) if err.is("USERNAME_NOT_OCCUPIED") => return Ok(None),
            Err(err) => return Err(err),
        };

        let id = PeerId::try_from(peer).map_err(|e| {
            debug!("resolved peer not usable: {e}");
            utils::artificial_rpc_error(400, "PEER_ID_INVALID")
        })?;
        let mut peers = self.build_peer_map(users, chats);
        let peer = peers.take(id);
        if peer.is_some() {
            self.0.session.cache_username(username, id);
        }
        Ok(peer)
    }

    /// Fetch full information about the currently logged-in user.
    ///
    /// Although this method is cheap to call, you might want to cache the results somewhere.
    ///
    /// # Examples
    ///
    /// ```
    /// # async fn f(client: tgkit_client::Client) -> Result<(), Box<dyn std::error::Error>> {
    /// println!("Displaying full user information of the logged-in user:");
    /// dbg!(client.get_me().await?);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_me(&self) -> Result<User, InvocationError> {
        let user = self
            .invoke(&tl::functions::users::GetUsers {
                id: vec![tl::enums::InputUser::UserSelf],
            })
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| utils::artificial_rpc_error(400, "USER_ID_INVALID"))?;

        let info = PeerInfo::from(&user);
        let user = User::from_raw(user).map_err(|e| {
            debug!("logged-in user not usable: {e}");
            utils::artificial_rpc_error(400, "USER_ID_INVALID")
        })?;
        // Always remembered, as it is how the true identity of "me" becomes known.
        self.0.session.cache_peer(&info);
        Ok(user)
    }

    /// Start sending chat actions to the given chat.
    ///
    /// # Examples
    ///
    /// **Do a one-shot pulse and let it fade away**
    /// ```
    /// # async fn f(client: tgkit_client::Client) -> Result<(), Box<dyn std::error::Error>> {
    /// use tgkit_client::peer::ChatAction;
    ///
    /// client.action("@ada").await?.oneshot(ChatAction::Typing).await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// **Cancel any actions**
    /// ```
    /// # async fn f(client: tgkit_client::Client) -> Result<(), Box<dyn std::error::Error>> {
    /// client.action("@ada").await?.cancel().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn action<C: Into<ChatId>>(&self, chat: C) -> Result<ActionSender, InvocationError> {
        let peer = self.resolve_peer(chat).await?;
        Ok(ActionSender::new(self, peer))
    }

    /// Delete the whole message history of a private conversation or small group chat.
    ///
    /// With `revoke`, the messages are deleted for everyone instead of only for the
    /// logged-in account. Returns how many messages were deleted.
    ///
    /// Telegram deletes long histories in chunks, so this method keeps asking for more
    /// to be deleted until nothing is left.
    pub async fn delete_chat_history<C: Into<ChatId>>(
        &self,
        chat: C,
        revoke: bool,
    ) -> Result<usize, InvocationError> {
        let peer = self.resolve_peer(chat).await?;
        let mut deleted = 0;
        loop {
            let tl::enums::messages::AffectedHistory::History(affected) = self
                .invoke(&tl::functions::messages::DeleteHistory {
                    just_clear: false,
                    revoke,
                    peer: peer.into(),
                    max_id: 0,
                    min_date: None,
                    max_date: None,
                })
                .await?;
            deleted += affected.pts_count.max(0) as usize;
            if affected.offset <= 0 {
                break Ok(deleted);
            }
        }
    }

    pub(crate) fn build_peer_map(
        &self,
        users: Vec<tl::enums::User>,
        chats: Vec<tl::enums::Chat>,
    ) -> PeerMap {
        let peers = PeerMap::new(users, chats);
        for peer in peers.iter_peers() {
            self.cache_peer_maybe(peer);
        }
        peers
    }

    fn cache_peer_maybe(&self, peer: &Peer) {
        if self.0.configuration.auto_cache_peers && peer.auth().is_some() {
            self.0.session.cache_peer(&peer.into());
        }
    }

    /// Messages newly produced by a request, in the order Telegram listed them.
    pub(crate) fn new_messages_from_updates(&self, updates: tl::enums::Updates) -> Vec<Message> {
        let (updates, users, chats) = match updates {
            tl::enums::Updates::UpdateShort(update) => (vec![update.update], Vec::new(), Vec::new()),
            tl::enums::Updates::Combined(updates) => (updates.updates, updates.users, updates.chats),
            tl::enums::Updates::Updates(updates) => (updates.updates, updates.users, updates.chats),
            tl::enums::Updates::TooLong | tl::enums::Updates::UpdateShortSentMessage(_) => {
                return Vec::new();
            }
        };

        let peers = self.build_peer_map(users, chats);
        updates
            .into_iter()
            .filter_map(|update| match update {
                tl::enums::Update::NewMessage(tl::types::UpdateNewMessage { message, .. })
                | tl::enums::Update::NewChannelMessage(tl::types::UpdateNewChannelMessage {
                    message,
                    ..
                }) => Some(Message::from_raw(self, message, None, &peers)),
                _ => None,
            })
            .collect()
    }
}
