// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;

use chrono::{DateTime, Utc};
use tgkit_mtsender::InvocationError;
use tgkit_session::{PeerAuth, PeerId, PeerKind, PeerRef};
use tgkit_tl_types as tl;

use super::{InputMessage, InputReactions};
use crate::Client;
use crate::peer::{ChatId, Peer, PeerMap};
use crate::utils;

/// Represents a Telegram message, which includes text messages and service messages.
///
/// This message should be treated as a snapshot in time, that is, if the message is edited while
/// using this object, those changes won't alter this structure.
#[derive(Clone)]
pub struct Message {
    pub raw: tl::enums::Message,
    pub(crate) fetched_in: Option<PeerId>,
    pub(crate) client: Client,
    // A single response carries every peer the messages in it mention, and the map is
    // shared between all of them.
    pub(crate) peers: PeerMap,
}

impl Message {
    pub(crate) fn from_raw(
        client: &Client,
        message: tl::enums::Message,
        fetched_in: Option<PeerId>,
        peers: &PeerMap,
    ) -> Self {
        Self {
            raw: message,
            fetched_in,
            client: client.clone(),
            peers: peers.clone(),
        }
    }

    /// Rebuild the message that was sent when Telegram only answers with its identifier.
    ///
    /// The chat must not be [`PeerKind::UserSelf`], as its true identifier is needed.
    pub(crate) fn from_raw_short_updates(
        client: &Client,
        updates: tl::types::UpdateShortSentMessage,
        input: InputMessage,
        chat: PeerId,
    ) -> Self {
        let entities = updates.entities.or_else(|| input.raw_entities());
        Self {
            raw: tl::enums::Message::Message(tl::types::Message {
                out: updates.out,
                mentioned: false,
                media_unread: false,
                silent: input.silent,
                post: false,
                from_scheduled: false,
                legacy: false,
                edit_hide: false,
                pinned: false,
                noforwards: input.noforwards,
                invert_media: false,
                offline: false,
                id: updates.id,
                from_id: None,
                from_boosts_applied: None,
                peer_id: chat.into(),
                saved_peer_id: None,
                fwd_from: None,
                via_bot_id: None,
                via_business_bot_id: None,
                reply_to: input.reply_to.map(|reply_to_msg_id| {
                    tl::types::MessageReplyHeader {
                        reply_to_scheduled: false,
                        forum_topic: input.topic_id.is_some(),
                        quote: false,
                        reply_to_msg_id: Some(reply_to_msg_id),
                        reply_to_peer_id: None,
                        reply_from: None,
                        reply_media: None,
                        reply_to_top_id: input.topic_id,
                        quote_text: None,
                        quote_entities: None,
                        quote_offset: None,
                    }
                    .into()
                }),
                date: updates.date,
                message: input.text,
                media: updates.media,
                reply_markup: input.reply_markup,
                entities,
                views: None,
                forwards: None,
                replies: None,
                edit_date: None,
                post_author: None,
                grouped_id: None,
                reactions: None,
                restriction_reason: None,
                ttl_period: updates.ttl_period,
                quick_reply_shortcut_id: None,
            }),
            fetched_in: Some(chat),
            client: client.clone(),
            peers: PeerMap::empty(),
        }
    }

    /// Whether the message is outgoing (i.e. you sent this message to some other chat) or
    /// incoming (i.e. someone else sent it to you or the chat).
    pub fn outgoing(&self) -> bool {
        match &self.raw {
            tl::enums::Message::Empty(_) => false,
            tl::enums::Message::Message(message) => message.out,
            tl::enums::Message::Service(message) => message.out,
        }
    }

    /// Whether you were mentioned in this message or not.
    pub fn mentioned(&self) -> bool {
        match &self.raw {
            tl::enums::Message::Empty(_) => false,
            tl::enums::Message::Message(message) => message.mentioned,
            tl::enums::Message::Service(message) => message.mentioned,
        }
    }

    /// Whether the message should notify people with sound or not.
    pub fn silent(&self) -> bool {
        match &self.raw {
            tl::enums::Message::Empty(_) => false,
            tl::enums::Message::Message(message) => message.silent,
            tl::enums::Message::Service(message) => message.silent,
        }
    }

    /// Whether this message is a post in a broadcast channel or not.
    pub fn post(&self) -> bool {
        match &self.raw {
            tl::enums::Message::Empty(_) => false,
            tl::enums::Message::Message(message) => message.post,
            tl::enums::Message::Service(message) => message.post,
        }
    }

    /// Whether this message was originated from a previously-scheduled message or not.
    pub fn from_scheduled(&self) -> bool {
        match &self.raw {
            tl::enums::Message::Message(message) => message.from_scheduled,
            _ => false,
        }
    }

    /// Whether this message is currently pinned or not.
    pub fn pinned(&self) -> bool {
        match &self.raw {
            tl::enums::Message::Message(message) => message.pinned,
            _ => false,
        }
    }

    /// Whether this message is protected from being forwarded or saved.
    pub fn noforwards(&self) -> bool {
        match &self.raw {
            tl::enums::Message::Message(message) => message.noforwards,
            _ => false,
        }
    }

    /// The ID of this message.
    ///
    /// Every channel has its own unique message counter, the same for all users.
    ///
    /// Every account has another unique message counter which is used for private conversations
    /// and small group chats, so **you cannot use the message ID of User A when running as
    /// User B** unless this message belongs to a megagroup or broadcast channel.
    pub fn id(&self) -> i32 {
        match &self.raw {
            tl::enums::Message::Empty(message) => message.id,
            tl::enums::Message::Message(message) => message.id,
            tl::enums::Message::Service(message) => message.id,
        }
    }

    /// Whether the message is empty, which is how deleted or inaccessible messages are returned.
    pub fn is_empty(&self) -> bool {
        matches!(self.raw, tl::enums::Message::Empty(_))
    }

    /// Whether the message is a service message, such as a member joining.
    pub fn is_service(&self) -> bool {
        matches!(self.raw, tl::enums::Message::Service(_))
    }

    /// Identifier of the chat where this message lives.
    ///
    /// Empty messages may lack it when they were not fetched from a known chat, and
    /// any message may lack it if Telegram sent an identifier out of range.
    pub fn peer_id(&self) -> Option<PeerId> {
        match &self.raw {
            tl::enums::Message::Empty(message) => message
                .peer_id
                .as_ref()
                .and_then(|peer| PeerId::try_from(peer).ok())
                .or(self.fetched_in),
            tl::enums::Message::Message(message) => PeerId::try_from(&message.peer_id).ok(),
            tl::enums::Message::Service(message) => PeerId::try_from(&message.peer_id).ok(),
        }
    }

    /// Reference to the chat where this message lives, if there is enough information to
    /// use it in further requests.
    pub fn peer_ref(&self) -> Option<PeerRef> {
        let id = self.peer_id()?;
        if let Some(peer) = self.peers.get(id).and_then(Peer::to_ref) {
            return Some(peer);
        }
        match id.kind() {
            PeerKind::Chat | PeerKind::UserSelf => Some(PeerRef {
                id,
                auth: PeerAuth::default(),
            }),
            PeerKind::User | PeerKind::Channel => {
                self.client.0.session.peer(id).map(PeerRef::from)
            }
        }
    }

    /// The chat where this message was sent to, if it came along with the message.
    ///
    /// This might be the user you're talking to for private conversations, or the group or
    /// channel where the message was sent.
    pub fn chat(&self) -> Option<&Peer> {
        self.peers.get(self.peer_id()?)
    }

    /// Identifier of the sender of this message, if any.
    pub fn sender_id(&self) -> Option<PeerId> {
        let from_id = match &self.raw {
            tl::enums::Message::Empty(_) => None,
            tl::enums::Message::Message(message) => message.from_id.as_ref(),
            tl::enums::Message::Service(message) => message.from_id.as_ref(),
        };
        match from_id {
            Some(from_id) => PeerId::try_from(from_id).ok(),
            None => {
                // Incoming messages in private conversations don't include `from_id`,
                // but the sender can only be the chat we're in.
                let peer_id = self.peer_id()?;
                (!self.outgoing() && peer_id.kind() == PeerKind::User).then_some(peer_id)
            }
        }
    }

    /// The sender of this message, if any and if it came along with the message.
    pub fn sender(&self) -> Option<&Peer> {
        self.peers.get(self.sender_id()?)
    }

    /// If this message is replying to a previous message, return the header with information
    /// about that reply.
    pub fn reply_header(&self) -> Option<&tl::types::MessageReplyHeader> {
        let header = match &self.raw {
            tl::enums::Message::Empty(_) => None,
            tl::enums::Message::Message(message) => message.reply_to.as_ref(),
            tl::enums::Message::Service(message) => message.reply_to.as_ref(),
        };
        header.map(|tl::enums::MessageReplyHeader::Header(header)| header)
    }

    /// If this message is replying to another message, return the replied message ID.
    pub fn reply_to_message_id(&self) -> Option<i32> {
        self.reply_header()
            .and_then(|header| header.reply_to_msg_id)
    }

    pub(crate) fn date_timestamp(&self) -> i32 {
        match &self.raw {
            tl::enums::Message::Empty(_) => 0,
            tl::enums::Message::Message(message) => message.date,
            tl::enums::Message::Service(message) => message.date,
        }
    }

    /// The date when this message was produced.
    pub fn date(&self) -> DateTime<Utc> {
        utils::date(self.date_timestamp())
    }

    /// The message's text.
    ///
    /// For service or empty messages, this will be the empty strings.
    pub fn text(&self) -> &str {
        match &self.raw {
            tl::enums::Message::Message(message) => &message.message,
            _ => "",
        }
    }

    /// The media attached to this message, such as a location, contact or dice.
    pub fn media(&self) -> Option<&tl::enums::MessageMedia> {
        match &self.raw {
            tl::enums::Message::Message(message) => message.media.as_ref(),
            _ => None,
        }
    }

    /// The formatting entities applied to the [`Message::text`].
    pub fn fmt_entities(&self) -> Option<&Vec<tl::enums::MessageEntity>> {
        match &self.raw {
            tl::enums::Message::Message(message) => message.entities.as_ref(),
            _ => None,
        }
    }

    /// The reply markup of this message, which is how bots attach buttons.
    pub fn reply_markup(&self) -> Option<&tl::enums::ReplyMarkup> {
        match &self.raw {
            tl::enums::Message::Message(message) => message.reply_markup.as_ref(),
            _ => None,
        }
    }

    /// How many replies this message has, when those are tracked.
    ///
    /// Posts of channels with a linked discussion group count their comments here.
    pub fn reply_count(&self) -> Option<i32> {
        match &self.raw {
            tl::enums::Message::Message(message) => message.replies.as_ref().map(
                |tl::enums::MessageReplies::Replies(replies)| replies.replies,
            ),
            _ => None,
        }
    }

    /// How many views does this message have, when applicable.
    pub fn view_count(&self) -> Option<i32> {
        match &self.raw {
            tl::enums::Message::Message(message) => message.views,
            _ => None,
        }
    }

    /// How many times has this message been forwarded, when applicable.
    pub fn forward_count(&self) -> Option<i32> {
        match &self.raw {
            tl::enums::Message::Message(message) => message.forwards,
            _ => None,
        }
    }

    /// The date when this message was last edited.
    pub fn edit_date(&self) -> Option<DateTime<Utc>> {
        match &self.raw {
            tl::enums::Message::Message(message) => message.edit_date.map(utils::date),
            _ => None,
        }
    }

    /// If this message was sent to a channel, return the name used by the author to post it.
    pub fn post_author(&self) -> Option<&str> {
        match &self.raw {
            tl::enums::Message::Message(message) => message.post_author.as_deref(),
            _ => None,
        }
    }

    /// If this message belongs to a group of messages, return the unique identifier for that
    /// group.
    pub fn grouped_id(&self) -> Option<i64> {
        match &self.raw {
            tl::enums::Message::Message(message) => message.grouped_id,
            _ => None,
        }
    }

    /// If this message is a service message, return the service action that occured.
    pub fn action(&self) -> Option<&tl::enums::MessageAction> {
        match &self.raw {
            tl::enums::Message::Service(message) => Some(&message.action),
            _ => None,
        }
    }

    fn chat_ref(&self) -> Result<ChatId, InvocationError> {
        self.peer_ref()
            .map(ChatId::Ref)
            .ok_or_else(|| utils::artificial_rpc_error(400, "PEER_ID_INVALID"))
    }

    /// Fetch the message that this message is replying to, or `None` if this message is not a
    /// reply to a previous message.
    ///
    /// Shorthand for [`Client::get_reply_to_message`].
    pub async fn get_reply(&self) -> Result<Option<Self>, InvocationError> {
        self.client.get_reply_to_message(self).await
    }

    /// Respond to this message by sending a new message in the same chat, but without directly
    /// replying to it.
    ///
    /// Shorthand for [`Client::send_message`].
    pub async fn respond<M: Into<InputMessage>>(
        &self,
        message: M,
    ) -> Result<Self, InvocationError> {
        self.client.send_message(self.chat_ref()?, message).await
    }

    /// Directly reply to this message by sending a new message in the same chat that replies to
    /// it. This methods overrides the `reply_to` on the `InputMessage` to point to `self`.
    ///
    /// Shorthand for [`Client::send_message`].
    pub async fn reply<M: Into<InputMessage>>(&self, message: M) -> Result<Self, InvocationError> {
        let message = message.into();
        self.client
            .send_message(self.chat_ref()?, message.reply_to(Some(self.id())))
            .await
    }

    /// Forward this message to another (or the same) chat.
    ///
    /// Shorthand for [`Client::forward_messages`]. Returns `None` if Telegram did not
    /// include the forwarded copy in its response.
    pub async fn forward_to<C: Into<ChatId>>(
        &self,
        chat: C,
    ) -> Result<Option<Self>, InvocationError> {
        let mut messages = self
            .client
            .forward_messages(chat, self.chat_ref()?, &[self.id()])
            .await?;
        Ok(messages.pop().flatten())
    }

    /// Edit the text of this message.
    ///
    /// Shorthand for [`Client::edit_message_text`].
    pub async fn edit_text<M: Into<InputMessage>>(
        &self,
        new_message: M,
    ) -> Result<Option<Self>, InvocationError> {
        self.client
            .edit_message_text(self.chat_ref()?, self.id(), new_message)
            .await
    }

    /// Delete this message for everyone.
    ///
    /// Shorthand for [`Client::delete_messages`].
    pub async fn delete(&self) -> Result<(), InvocationError> {
        self.client
            .delete_messages(self.chat_ref()?, &[self.id()], true)
            .await
            .map(drop)
    }

    /// Mark this message and all messages above it as read.
    ///
    /// Shorthand for [`Client::read_chat_history`].
    pub async fn mark_as_read(&self) -> Result<bool, InvocationError> {
        self.client
            .read_chat_history(self.chat_ref()?, self.id())
            .await
    }

    /// React to this message.
    ///
    /// # Examples
    ///
    /// ```
    /// # async fn f(message: tgkit_client::message::Message) -> Result<(), Box<dyn std::error::Error>> {
    /// use tgkit_client::message::InputReactions;
    ///
    /// message.react("👍").await?;
    /// message.react(InputReactions::emoticon("🤯").big().add_to_recent()).await?;
    /// message.react(InputReactions::remove()).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn react<R: Into<InputReactions>>(
        &self,
        reactions: R,
    ) -> Result<(), InvocationError> {
        self.client
            .set_reaction(self.chat_ref()?, self.id(), reactions)
            .await
            .map(drop)
    }

    /// Fetch this message again, returning the server's current copy.
    ///
    /// `None` is returned if the message no longer exists.
    pub async fn refetch(&self) -> Result<Option<Self>, InvocationError> {
        let mut messages = self
            .client
            .get_messages(self.chat_ref()?, &[self.id()])
            .await?;
        Ok(messages.pop().flatten())
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("id", &self.id())
            .field("peer_id", &self.peer_id())
            .field("outgoing", &self.outgoing())
            .field("date", &self.date())
            .field("text", &self.text())
            .field("sender_id", &self.sender_id())
            .field("reply_to_message_id", &self.reply_to_message_id())
            .field("mentioned", &self.mentioned())
            .field("silent", &self.silent())
            .field("post", &self.post())
            .field("pinned", &self.pinned())
            .field("view_count", &self.view_count())
            .field("forward_count", &self.forward_count())
            .field("edit_date", &self.edit_date())
            .field("post_author", &self.post_author())
            .field("grouped_id", &self.grouped_id())
            .field("action", &self.action())
            .finish()
    }
}
