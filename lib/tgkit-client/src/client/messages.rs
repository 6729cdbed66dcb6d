// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Methods related to sending, fetching and searching messages.
use std::collections::HashMap;

use chrono::{DateTime, TimeZone};
use log::{Level, log_enabled, warn};
use tgkit_mtsender::InvocationError;
use tgkit_session::{PeerId, PeerKind, PeerRef};
use tgkit_tl_types as tl;
use tl::enums::InputPeer;

use super::{Client, IterBuffer};
use crate::message::{InputMessage, InputReactions, Message, SearchFilter};
use crate::peer::{ChatAction, ChatId, PeerMap};
use crate::utils::{generate_random_id, generate_random_ids};

const MAX_LIMIT: usize = 100;

/// Seconds since the epoch as Telegram expects them, saturating outside the `i32` range.
fn unix_seconds<Tz: TimeZone>(date_time: &DateTime<Tz>) -> i32 {
    let seconds = date_time.timestamp();
    i32::try_from(seconds).unwrap_or(if seconds < 0 { i32::MIN } else { i32::MAX })
}

fn input_geo_point(latitude: f64, longitude: f64) -> tl::enums::InputGeoPoint {
    tl::types::InputGeoPoint {
        lat: latitude,
        long: longitude,
        accuracy_radius: None,
    }
    .into()
}

fn raw_message_id(message: &tl::enums::Message) -> i32 {
    match message {
        tl::enums::Message::Empty(message) => message.id,
        tl::enums::Message::Message(message) => message.id,
        tl::enums::Message::Service(message) => message.id,
    }
}

/// Split any of the responses that carry messages into its parts.
fn messages_parts(
    messages: tl::enums::messages::Messages,
) -> (
    Vec<tl::enums::Message>,
    Vec<tl::enums::User>,
    Vec<tl::enums::Chat>,
) {
    use tl::enums::messages::Messages;

    match messages {
        Messages::Messages(m) => (m.messages, m.users, m.chats),
        Messages::Slice(m) => (m.messages, m.users, m.chats),
        Messages::ChannelMessages(m) => (m.messages, m.users, m.chats),
        Messages::NotModified(_) => (Vec::new(), Vec::new(), Vec::new()),
    }
}

/// How many messages a response says there are, whether or not it carries them all.
fn messages_count(messages: &tl::enums::messages::Messages) -> usize {
    use tl::enums::messages::Messages;

    let count = match messages {
        Messages::Messages(m) => return m.messages.len(),
        Messages::Slice(m) => m.count,
        Messages::ChannelMessages(m) => m.count,
        Messages::NotModified(m) => m.count,
    };
    count.max(0) as usize
}

fn map_random_ids_to_messages(
    client: &Client,
    fetched_in: PeerId,
    random_ids: &[i64],
    updates: tl::enums::Updates,
) -> Vec<Option<Message>> {
    let (updates, users, chats) = match updates {
        tl::enums::Updates::Updates(updates) => (updates.updates, updates.users, updates.chats),
        tl::enums::Updates::Combined(updates) => (updates.updates, updates.users, updates.chats),
        _ => {
            warn!("response updates carry no message identifiers to map sent messages from");
            return random_ids.iter().map(|_| None).collect();
        }
    };

    let peers = client.build_peer_map(users, chats);

    let rnd_to_id = updates
        .iter()
        .filter_map(|update| match update {
            tl::enums::Update::MessageId(u) => Some((u.random_id, u.id)),
            _ => None,
        })
        .collect::<HashMap<_, _>>();

    let mut id_to_msg = updates
        .into_iter()
        .filter_map(|update| match update {
            tl::enums::Update::NewMessage(tl::types::UpdateNewMessage { message, .. }) => {
                Some(message)
            }
            tl::enums::Update::NewChannelMessage(tl::types::UpdateNewChannelMessage {
                message,
                ..
            }) => Some(message),
            _ => None,
        })
        .map(|message| Message::from_raw(client, message, Some(fetched_in), &peers))
        .map(|message| (message.id(), message))
        .collect::<HashMap<_, _>>();

    random_ids
        .iter()
        .map(|rnd| {
            rnd_to_id
                .get(rnd)
                .and_then(|id| id_to_msg.remove(id))
                .or_else(|| {
                    if id_to_msg.len() == 1 {
                        // If there's no random_id to map from, in the common case a single message
                        // should've been produced regardless, so try to recover by returning that.
                        id_to_msg.drain().next().map(|(_, m)| m)
                    } else {
                        None
                    }
                })
        })
        .collect()
}

impl<R: tl::RemoteCall<Return = tl::enums::messages::Messages>> IterBuffer<R, Message> {
    /// Fetches the total unless cached.
    ///
    /// The `request.limit` should be set to the right value before calling this method.
    async fn get_total(&mut self) -> Result<usize, InvocationError> {
        if let Some(total) = self.total {
            return Ok(total);
        }

        let total = messages_count(&self.client.invoke(&self.request).await?);
        self.total = Some(total);
        Ok(total)
    }

    /// Performs the network call, fills the buffer, and returns the `offset_rate` if any.
    ///
    /// The `request.limit` should be set to the right value before calling this method.
    async fn fill_buffer(
        &mut self,
        limit: i32,
        peer: Option<PeerId>,
    ) -> Result<Option<i32>, InvocationError> {
        use tl::enums::messages::Messages;

        let response = self.client.invoke(&self.request).await?;
        self.total = Some(messages_count(&response));
        let rate = match &response {
            Messages::Messages(_) | Messages::NotModified(_) => {
                self.last_chunk = true;
                None
            }
            // Can't rely on `count(messages) < limit` as the stop condition.
            //
            // If the highest fetched message ID is lower than or equal to the limit,
            // there can't be more messages after (highest ID - limit), because the
            // absolute lowest message ID is 1.
            Messages::Slice(m) => {
                self.last_chunk = m
                    .messages
                    .first()
                    .is_none_or(|first| raw_message_id(first) <= limit);
                m.next_rate
            }
            Messages::ChannelMessages(m) => {
                self.last_chunk = m
                    .messages
                    .first()
                    .is_none_or(|first| raw_message_id(first) <= limit);
                None
            }
        };

        let (messages, users, chats) = messages_parts(response);
        let peers = self.client.build_peer_map(users, chats);

        let client = self.client.clone();
        self.buffer.extend(
            messages
                .into_iter()
                .map(|message| Message::from_raw(&client, message, peer, &peers)),
        );

        Ok(rate)
    }
}

/// Iterator over the history of a chat, from the newest message to the oldest.
pub type MessageIter = IterBuffer<tl::functions::messages::GetHistory, Message>;

impl MessageIter {
    fn new(client: &Client, peer: PeerRef) -> Self {
        Self::from_request(
            client,
            MAX_LIMIT,
            tl::functions::messages::GetHistory {
                peer: peer.into(),
                offset_id: 0,
                offset_date: 0,
                add_offset: 0,
                limit: 0,
                max_id: 0,
                min_id: 0,
                hash: 0,
            },
        )
    }

    /// Start returning messages older than this message identifier.
    pub fn offset_id(mut self, offset: i32) -> Self {
        self.request.offset_id = offset;
        self
    }

    /// Start returning messages older than this date.
    pub fn max_date<Tz: TimeZone>(mut self, date_time: &DateTime<Tz>) -> Self {
        self.request.offset_date = unix_seconds(date_time);
        self
    }

    /// Determines how many messages there are in total.
    ///
    /// This only performs a network call if `next` has not been called before.
    pub async fn total(&mut self) -> Result<usize, InvocationError> {
        self.request.limit = 1;
        self.get_total().await
    }

    /// Return the next `Message` from the internal buffer, filling the buffer previously if it's
    /// empty.
    ///
    /// Returns `None` if the `limit` is reached or there are no messages left.
    pub async fn next(&mut self) -> Result<Option<Message>, InvocationError> {
        if let Some(message) = self.buffered() {
            return Ok(message);
        }

        self.request.limit = self.page_size(MAX_LIMIT);
        let peer = PeerRef::from(self.request.peer.clone()).id;
        self.fill_buffer(self.request.limit, Some(peer)).await?;

        if let Some((id, date)) = self.next_offset().map(|m| (m.id(), m.date_timestamp())) {
            self.request.offset_id = id;
            self.request.offset_date = date;
        }

        Ok(self.pop_front())
    }
}

/// Iterator over the messages in a chat that match a search.
pub type SearchIter = IterBuffer<tl::functions::messages::Search, Message>;

impl SearchIter {
    fn new(client: &Client, peer: PeerRef) -> Self {
        Self::from_request(
            client,
            MAX_LIMIT,
            tl::functions::messages::Search {
                peer: peer.into(),
                q: String::new(),
                from_id: None,
                top_msg_id: None,
                filter: tl::enums::MessagesFilter::InputMessagesFilterEmpty,
                min_date: 0,
                max_date: 0,
                offset_id: 0,
                add_offset: 0,
                limit: 0,
                max_id: 0,
                min_id: 0,
                hash: 0,
                saved_peer_id: None,
                saved_reaction: None,
            },
        )
    }

    /// Start returning messages older than this message identifier.
    pub fn offset_id(mut self, offset: i32) -> Self {
        self.request.offset_id = offset;
        self
    }

    /// Changes the query of the search. Telegram servers perform a somewhat fuzzy search over
    /// this query (so a word in singular may also return messages with the word in plural, for
    /// example).
    pub fn query(mut self, query: &str) -> Self {
        self.request.q = query.to_string();
        self
    }

    /// Restricts results to messages sent by the logged-in user
    pub fn sent_by_self(mut self) -> Self {
        self.request.from_id = Some(InputPeer::PeerSelf);
        self
    }

    /// Restricts results to messages sent by the given peer, which must have been resolved.
    pub fn sent_by(mut self, sender: PeerRef) -> Self {
        self.request.from_id = Some(sender.into());
        self
    }

    /// Restricts results to the messages in one forum topic.
    pub fn topic_id(mut self, topic_id: i32) -> Self {
        self.request.top_msg_id = Some(topic_id);
        self
    }

    /// Returns only messages with date bigger than date_time.
    ///
    /// ```
    /// use chrono::DateTime;
    ///
    /// # async fn f(client: tgkit_client::Client) -> Result<(), Box<dyn std::error::Error>> {
    /// // Search messages sent after Jan 1st, 2021
    /// let min_date = DateTime::parse_from_rfc3339("2021-01-01T00:00:00-00:00").unwrap();
    ///
    /// let mut messages = client.search_messages("me").await?.min_date(&min_date);
    ///
    /// # Ok(())
    /// # }
    /// ```
    pub fn min_date<Tz: TimeZone>(mut self, date_time: &DateTime<Tz>) -> Self {
        self.request.min_date = unix_seconds(date_time);
        self
    }

    /// Returns only messages with date smaller than date_time
    pub fn max_date<Tz: TimeZone>(mut self, date_time: &DateTime<Tz>) -> Self {
        self.request.max_date = unix_seconds(date_time);
        self
    }

    /// Changes the media filter. Only messages with this type of media will be fetched.
    pub fn filter(mut self, filter: SearchFilter) -> Self {
        self.request.filter = filter.into();
        self
    }

    /// Determines how many messages there are in total.
    ///
    /// This only performs a network call if `next` has not been called before.
    pub async fn total(&mut self) -> Result<usize, InvocationError> {
        // Unlike most requests, a limit of 0 actually returns 0 and not a default amount.
        self.request.limit = 0;
        self.get_total().await
    }

    /// Return the next `Message` from the internal buffer, filling the buffer previously if it's
    /// empty.
    ///
    /// Returns `None` if the `limit` is reached or there are no messages left.
    pub async fn next(&mut self) -> Result<Option<Message>, InvocationError> {
        if let Some(message) = self.buffered() {
            return Ok(message);
        }

        self.request.limit = self.page_size(MAX_LIMIT);
        let peer = PeerRef::from(self.request.peer.clone()).id;
        self.fill_buffer(self.request.limit, Some(peer)).await?;

        if let Some((id, date)) = self.next_offset().map(|m| (m.id(), m.date_timestamp())) {
            self.request.offset_id = id;
            self.request.max_date = date;
        }

        Ok(self.pop_front())
    }
}

/// Iterator over the messages in every chat that match a search.
pub type GlobalSearchIter = IterBuffer<tl::functions::messages::SearchGlobal, Message>;

impl GlobalSearchIter {
    fn new(client: &Client) -> Self {
        Self::from_request(
            client,
            MAX_LIMIT,
            tl::functions::messages::SearchGlobal {
                broadcasts_only: false,
                folder_id: None,
                q: String::new(),
                filter: tl::enums::MessagesFilter::InputMessagesFilterEmpty,
                min_date: 0,
                max_date: 0,
                offset_rate: 0,
                offset_peer: InputPeer::Empty,
                offset_id: 0,
                limit: 0,
            },
        )
    }

    /// Changes the query of the search. Telegram servers perform a somewhat fuzzy search over
    /// this query (so a word in singular may also return messages with the word in plural, for
    /// example).
    pub fn query(mut self, query: &str) -> Self {
        self.request.q = query.to_string();
        self
    }

    /// Changes the media filter. Only messages with this type of media will be fetched.
    pub fn filter(mut self, filter: SearchFilter) -> Self {
        self.request.filter = filter.into();
        self
    }

    /// Only search the chats in the given list.
    pub fn chat_list(mut self, chat_list: crate::peer::ChatList) -> Self {
        self.request.folder_id = Some(chat_list.folder_id());
        self
    }

    /// Determines how many messages there are in total.
    ///
    /// This only performs a network call if `next` has not been called before.
    pub async fn total(&mut self) -> Result<usize, InvocationError> {
        self.request.limit = 1;
        self.get_total().await
    }

    /// Return the next `Message` from the internal buffer, filling the buffer previously if it's
    /// empty.
    ///
    /// Returns `None` if the `limit` is reached or there are no messages left.
    pub async fn next(&mut self) -> Result<Option<Message>, InvocationError> {
        if let Some(message) = self.buffered() {
            return Ok(message);
        }

        self.request.limit = self.page_size(MAX_LIMIT);
        let offset_rate = self.fill_buffer(self.request.limit, None).await?;

        // Results come from every chat, so the offset includes the chat of the last one.
        if let Some((id, peer)) = self.next_offset().map(|m| (m.id(), m.peer_ref())) {
            self.request.offset_rate = offset_rate.unwrap_or(0);
            self.request.offset_peer = peer.map(Into::into).unwrap_or(InputPeer::Empty);
            self.request.offset_id = id;
        }

        Ok(self.pop_front())
    }
}

/// Iterator over the replies to a message, such as the comments on a channel post.
///
/// Comments live in the discussion group linked to the channel, so the messages are not tied
/// to the chat the post was in.
pub type ReplyIter = IterBuffer<tl::functions::messages::GetReplies, Message>;

impl ReplyIter {
    fn new(client: &Client, peer: PeerRef, message_id: i32) -> Self {
        Self::from_request(
            client,
            MAX_LIMIT,
            tl::functions::messages::GetReplies {
                peer: peer.into(),
                msg_id: message_id,
                offset_id: 0,
                offset_date: 0,
                add_offset: 0,
                limit: 0,
                max_id: 0,
                min_id: 0,
                hash: 0,
            },
        )
    }

    /// Start returning replies older than this message identifier.
    pub fn offset_id(mut self, offset: i32) -> Self {
        self.request.offset_id = offset;
        self
    }

    /// Determines how many replies there are in total.
    ///
    /// This only performs a network call if `next` has not been called before.
    pub async fn total(&mut self) -> Result<usize, InvocationError> {
        self.request.limit = 1;
        self.get_total().await
    }

    /// Return the next reply, newest first, fetching more from Telegram when the buffer runs out.
    pub async fn next(&mut self) -> Result<Option<Message>, InvocationError> {
        if let Some(message) = self.buffered() {
            return Ok(message);
        }

        self.request.limit = self.page_size(MAX_LIMIT);
        self.fill_buffer(self.request.limit, None).await?;

        if let Some((id, date)) = self.next_offset().map(|m| (m.id(), m.date_timestamp())) {
            self.request.offset_id = id;
            self.request.offset_date = date;
        }

        Ok(self.pop_front())
    }
}

/// Method implementations related to sending, modifying or getting messages.
impl Client {
    /// Sends a text message to the desired chat.
    ///
    /// Refer to [`InputMessage`] to learn more options, such as replying to another message.
    ///
    /// See also: [`Message::respond`], [`Message::reply`].
    ///
    /// # Examples
    ///
    /// ```
    /// # async fn f(client: tgkit_client::Client) -> Result<(), Box<dyn std::error::Error>> {
    /// client.send_message("me", "Boring text message :-(").await?;
    ///
    /// use tgkit_client::message::InputMessage;
    ///
    /// client.send_message("@ada", InputMessage::text("Sneaky message").silent(true)).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send_message<C: Into<ChatId>, M: Into<InputMessage>>(
        &self,
        chat: C,
        message: M,
    ) -> Result<Message, InvocationError> {
        let peer = self.resolve_peer(chat).await?;
        let message = message.into();
        let random_id = generate_random_id();
        let updates = self
            .invoke(&tl::functions::messages::SendMessage {
                no_webpage: !message.link_preview,
                silent: message.silent,
                background: message.background,
                clear_draft: message.clear_draft,
                noforwards: message.noforwards,
                update_stickersets_order: false,
                invert_media: false,
                peer: peer.into(),
                reply_to: message.reply_header(),
                message: message.text.clone(),
                random_id,
                reply_markup: message.reply_markup.clone(),
                entities: message.raw_entities(),
                schedule_date: message.schedule_date,
                send_as: None,
            })
            .await?;

        self.sent_message_from_updates(peer, random_id, message, updates)
            .await
    }

    /// Sends a media message to the desired chat, with `message` as its caption and options.
    ///
    /// [`Client::send_location`], [`Client::send_venue`], [`Client::send_contact`] and
    /// [`Client::send_dice`] build the media for the most common cases.
    ///
    /// # Examples
    ///
    /// ```
    /// # async fn f(client: tgkit_client::Client) -> Result<(), Box<dyn std::error::Error>> {
    /// use tgkit_client::message::InputMessage;
    /// use tgkit_client::tl;
    ///
    /// let dice = tl::types::InputMediaDice { emoticon: "🎯".into() };
    /// client.send_media("me", dice.into(), InputMessage::text("").silent(true)).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send_media<C: Into<ChatId>, M: Into<InputMessage>>(
        &self,
        chat: C,
        media: tl::enums::InputMedia,
        message: M,
    ) -> Result<Message, InvocationError> {
        let peer = self.resolve_peer(chat).await?;
        let message = message.into();
        let random_id = generate_random_id();
        let updates = self
            .invoke(&tl::functions::messages::SendMedia {
                silent: message.silent,
                background: message.background,
                clear_draft: message.clear_draft,
                noforwards: message.noforwards,
                update_stickersets_order: false,
                invert_media: false,
                peer: peer.into(),
                reply_to: message.reply_header(),
                media,
                message: message.text.clone(),
                random_id,
                reply_markup: message.reply_markup.clone(),
                entities: message.raw_entities(),
                schedule_date: message.schedule_date,
                send_as: None,
            })
            .await?;

        self.sent_message_from_updates(peer, random_id, message, updates)
            .await
    }

    /// Sends a point on the map.
    pub async fn send_location<C: Into<ChatId>>(
        &self,
        chat: C,
        latitude: f64,
        longitude: f64,
    ) -> Result<Message, InvocationError> {
        let media = tl::types::InputMediaGeoPoint {
            geo_point: input_geo_point(latitude, longitude),
        };
        self.send_media(chat, media.into(), InputMessage::text(""))
            .await
    }

    /// Sends a venue, which is a point on the map with a title and an address.
    pub async fn send_venue<C: Into<ChatId>>(
        &self,
        chat: C,
        latitude: f64,
        longitude: f64,
        title: &str,
        address: &str,
    ) -> Result<Message, InvocationError> {
        let media = tl::types::InputMediaVenue {
            geo_point: input_geo_point(latitude, longitude),
            title: title.to_string(),
            address: address.to_string(),
            provider: String::new(),
            venue_id: String::new(),
            venue_type: String::new(),
        };
        self.send_media(chat, media.into(), InputMessage::text(""))
            .await
    }

    /// Sends a phone contact. The `last_name` may be left empty.
    pub async fn send_contact<C: Into<ChatId>>(
        &self,
        chat: C,
        phone_number: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<Message, InvocationError> {
        let media = tl::types::InputMediaContact {
            phone_number: phone_number.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            vcard: String::new(),
        };
        self.send_media(chat, media.into(), InputMessage::text(""))
            .await
    }

    /// Sends an animated emoji with a random value, such as a dice (🎲), a dart (🎯) or a basketball (🏀).
    ///
    /// The value Telegram rolled can be read from the media of the returned message.
    pub async fn send_dice<C: Into<ChatId>>(
        &self,
        chat: C,
        emoticon: &str,
    ) -> Result<Message, InvocationError> {
        let media = tl::types::InputMediaDice {
            emoticon: emoticon.to_string(),
        };
        self.send_media(chat, media.into(), InputMessage::text(""))
            .await
    }

    /// Find the message that was just sent with `random_id` in the response to sending it.
    async fn sent_message_from_updates(
        &self,
        peer: PeerRef,
        random_id: i64,
        message: InputMessage,
        updates: tl::enums::Updates,
    ) -> Result<Message, InvocationError> {
        Ok(match updates {
            tl::enums::Updates::UpdateShortSentMessage(updates) => {
                let chat = match peer.id.kind() {
                    // The rebuilt message needs the true identifier of the chat.
                    PeerKind::UserSelf => match self.0.session.peer(peer.id) {
                        Some(info) => info.id(),
                        None => self.get_me().await?.id(),
                    },
                    _ => peer.id,
                };
                Message::from_raw_short_updates(self, updates, message, chat)
            }
            updates => {
                let updates_debug = if log_enabled!(Level::Warn) {
                    Some(updates.clone())
                } else {
                    None
                };

                match map_random_ids_to_messages(self, peer.id, &[random_id], updates)
                    .pop()
                    .flatten()
                {
                    Some(message) => message,
                    None => {
                        if let Some(updates) = updates_debug {
                            warn!("failed to find just-sent message in response updates:");
                            warn!("{:#?}", updates);
                        }
                        Message::from_raw(
                            self,
                            tl::enums::Message::Empty(tl::types::MessageEmpty {
                                id: 0,
                                peer_id: None,
                            }),
                            Some(peer.id),
                            &PeerMap::empty(),
                        )
                    }
                }
            }
        })
    }

    /// Edits the text of an existing message.
    ///
    /// Returns the edited message if Telegram included it in its response.
    ///
    /// # Examples
    ///
    /// ```
    /// # async fn f(client: tgkit_client::Client) -> Result<(), Box<dyn std::error::Error>> {
    /// let old_message_id = 123;
    /// client.edit_message_text("me", old_message_id, "New text message").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn edit_message_text<C: Into<ChatId>, M: Into<InputMessage>>(
        &self,
        chat: C,
        message_id: i32,
        new_message: M,
    ) -> Result<Option<Message>, InvocationError> {
        let peer = self.resolve_peer(chat).await?;
        let new_message = new_message.into();
        let updates = self
            .invoke(&tl::functions::messages::EditMessage {
                no_webpage: !new_message.link_preview,
                invert_media: false,
                peer: peer.into(),
                id: message_id,
                message: Some(new_message.text.clone()),
                media: None,
                reply_markup: new_message.reply_markup.clone(),
                entities: new_message.raw_entities(),
                schedule_date: new_message.schedule_date,
            })
            .await?;

        Ok(self.edited_message_from_updates(updates, message_id))
    }

    /// Deletes up to 100 messages in a chat.
    ///
    /// With `revoke`, the messages are deleted for everyone and not only for the logged-in
    /// account. Messages in channels and megagroups are always deleted for everyone.
    ///
    /// Returns how many messages were deleted.
    ///
    /// <div class="stab unstable">
    ///
    /// **Warning**: when deleting messages from small group chats or private conversations, this
    /// method cannot validate that the provided message IDs actually belong to the input chat due
    /// to the way Telegram's API works. Make sure to pass correct message IDs to avoid deleting
    /// unrelated messages.
    ///
    /// </div>
    ///
    /// # Examples
    ///
    /// ```
    /// # async fn f(client: tgkit_client::Client) -> Result<(), Box<dyn std::error::Error>> {
    /// let message_ids = [123, 456, 789];
    ///
    /// let count = client.delete_messages("me", &message_ids, true).await?;
    /// assert!(count <= message_ids.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn delete_messages<C: Into<ChatId>>(
        &self,
        chat: C,
        message_ids: &[i32],
        revoke: bool,
    ) -> Result<usize, InvocationError> {
        let peer = self.resolve_peer(chat).await?;
        let tl::enums::messages::AffectedMessages::Messages(affected) =
            if peer.id.kind() == PeerKind::Channel {
                self.invoke(&tl::functions::channels::DeleteMessages {
                    channel: peer.into(),
                    id: message_ids.to_vec(),
                })
                .await
            } else {
                self.invoke(&tl::functions::messages::DeleteMessages {
                    revoke,
                    id: message_ids.to_vec(),
                })
                .await
            }?;

        Ok(affected.pts_count.max(0) as usize)
    }

    /// Forwards up to 100 messages from `source` into `destination`.
    ///
    /// For every message that fails to be forwarded, its slot in the returned vector
    /// is `None`. The forwarded messages keep their original author and date.
    ///
    /// # Examples
    ///
    /// ```
    /// # async fn f(client: tgkit_client::Client) -> Result<(), Box<dyn std::error::Error>> {
    /// let message_ids = [123, 456, 789];
    ///
    /// let messages = client.forward_messages("me", "@engines", &message_ids).await?;
    /// let fail_count = messages.iter().filter(|m| m.is_none()).count();
    /// println!("Failed to forward {} out of {} messages", fail_count, message_ids.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn forward_messages<C: Into<ChatId>, S: Into<ChatId>>(
        &self,
        destination: C,
        source: S,
        message_ids: &[i32],
    ) -> Result<Vec<Option<Message>>, InvocationError> {
        let destination = self.resolve_peer(destination).await?;
        let source = self.resolve_peer(source).await?;
        let request = tl::functions::messages::ForwardMessages {
            silent: false,
            background: false,
            with_my_score: false,
            drop_author: false,
            drop_media_captions: false,
            noforwards: false,
            from_peer: source.into(),
            id: message_ids.to_vec(),
            random_id: generate_random_ids(message_ids.len()),
            to_peer: destination.into(),
            top_msg_id: None,
            schedule_date: None,
            send_as: None,
            quick_reply_shortcut: None,
        };
        let result = self.invoke(&request).await?;
        Ok(map_random_ids_to_messages(
            self,
            destination.id,
            &request.random_id,
            result,
        ))
    }

    /// Sends a copy of a message into `destination`, as if the logged-in account wrote it.
    ///
    /// Unlike forwarding, the copy carries no link to the original message.
    ///
    /// Returns `None` when the original message does not exist. Service messages cannot be
    /// copied and fail with `MESSAGE_ID_INVALID`.
    pub async fn copy_message<C: Into<ChatId>, S: Into<ChatId>>(
        &self,
        destination: C,
        source: S,
        message_id: i32,
    ) -> Result<Option<Message>, InvocationError> {
        let destination = self.resolve_peer(destination).await?;
        let Some(original) = self
            .get_messages(source, &[message_id])
            .await?
            .pop()
            .flatten()
        else {
            return Ok(None);
        };
        if original.is_service() {
            return Err(crate::utils::artificial_rpc_error(400, "MESSAGE_ID_INVALID"));
        }

        let copy = InputMessage::text(original.text())
            .fmt_entities(original.fmt_entities().cloned().unwrap_or_default())
            .silent(original.silent());
        self.send_message(destination, copy).await.map(Some)
    }

    /// Get up to 100 messages using their ID.
    ///
    /// Returns the new retrieved messages in a list. Those messages that could not be retrieved
    /// or do not belong to the input chat will be `None`. The length of the resulting list is the
    /// same as the length of the input message IDs, and the indices from the list of IDs map to
    /// the indices in the result so you can find which messages are missing.
    ///
    /// # Examples
    ///
    /// ```
    /// # async fn f(client: tgkit_client::Client) -> Result<(), Box<dyn std::error::Error>> {
    /// let message_ids = [123, 456, 789];
    ///
    /// let messages = client.get_messages("me", &message_ids).await?;
    /// let count = messages.into_iter().filter(Option::is_some).count();
    /// println!("{} out of {} messages were deleted!", message_ids.len() - count, message_ids.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_messages<C: Into<ChatId>>(
        &self,
        chat: C,
        message_ids: &[i32],
    ) -> Result<Vec<Option<Message>>, InvocationError> {
        let peer = self.resolve_peer(chat).await?;
        let id = message_ids
            .iter()
            .map(|&id| tl::enums::InputMessage::Id(tl::types::InputMessageId { id }))
            .collect();

        let result = if peer.id.kind() == PeerKind::Channel {
            self.invoke(&tl::functions::channels::GetMessages {
                channel: peer.into(),
                id,
            })
            .await
        } else {
            self.invoke(&tl::functions::messages::GetMessages { id })
                .await
        }?;

        let (messages, users, chats) = messages_parts(result);
        let peers = self.build_peer_map(users, chats);
        let filter_chat = peer.id.kind() != PeerKind::UserSelf;
        let mut map = messages
            .into_iter()
            // Telegram answers with an empty message for every identifier that does not exist.
            .filter(|m| !matches!(m, tl::enums::Message::Empty(_)))
            .map(|m| Message::from_raw(self, m, Some(peer.id), &peers))
            .filter(|m| !filter_chat || m.peer_id() == Some(peer.id))
            .map(|m| (m.id(), m))
            .collect::<HashMap<_, _>>();

        Ok(message_ids.iter().map(|id| map.remove(id)).collect())
    }

    /// Get the message that the given message is replying to, or `None` if it is not a
    /// reply or the replied message no longer exists.
    pub async fn get_reply_to_message(
        &self,
        message: &Message,
    ) -> Result<Option<Message>, InvocationError> {
        let Some(reply_to_message_id) = message.reply_to_message_id() else {
            return Ok(None);
        };
        let Some(peer) = message.peer_ref() else {
            return Ok(None);
        };
        let mut messages = self
            .get_messages(ChatId::Ref(peer), &[reply_to_message_id])
            .await?;
        Ok(messages.pop().flatten())
    }

    /// Get the message that starts the discussion thread of `message_id`.
    ///
    /// For a channel post this is its copy in the linked discussion group, where the comments
    /// are replies to it. Returns `None` if Telegram sent no message back.
    ///
    /// # Examples
    ///
    /// ```
    /// # async fn f(client: tgkit_client::Client) -> Result<(), Box<dyn std::error::Error>> {
    /// let post_id = 123;
    /// if let Some(thread) = client.get_discussion_message("@engines", post_id).await? {
    ///     thread.reply("First!").await?;
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_discussion_message<C: Into<ChatId>>(
        &self,
        chat: C,
        message_id: i32,
    ) -> Result<Option<Message>, InvocationError> {
        let peer = self.resolve_peer(chat).await?;
        let tl::enums::messages::DiscussionMessage::Message(discussion) = self
            .invoke(&tl::functions::messages::GetDiscussionMessage {
                peer: peer.into(),
                msg_id: message_id,
            })
            .await?;

        let peers = self.build_peer_map(discussion.users, discussion.chats);
        Ok(discussion
            .messages
            .into_iter()
            .find(|m| !matches!(m, tl::enums::Message::Empty(_)))
            .map(|m| Message::from_raw(self, m, None, &peers)))
    }

    /// Iterate over the replies to a message, from most recent to oldest.
    ///
    /// For a channel post these are its comments.
    ///
    /// # Examples
    ///
    /// ```
    /// # async fn f(client: tgkit_client::Client) -> Result<(), Box<dyn std::error::Error>> {
    /// let post_id = 123;
    /// let mut replies = client.get_discussion_replies("@engines", post_id).await?.limit(10);
    ///
    /// while let Some(reply) = replies.next().await? {
    ///     println!("{}", reply.text());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_discussion_replies<C: Into<ChatId>>(
        &self,
        chat: C,
        message_id: i32,
    ) -> Result<ReplyIter, InvocationError> {
        let peer = self.resolve_peer(chat).await?;
        Ok(ReplyIter::new(self, peer, message_id))
    }

    /// Count the replies to a message.
    pub async fn get_discussion_replies_count<C: Into<ChatId>>(
        &self,
        chat: C,
        message_id: i32,
    ) -> Result<usize, InvocationError> {
        self.get_discussion_replies(chat, message_id)
            .await?
            .total()
            .await
    }

    /// Iterate over the message history of a chat, from most recent to oldest.
    ///
    /// # Examples
    ///
    /// ```
    /// # async fn f(client: tgkit_client::Client) -> Result<(), Box<dyn std::error::Error>> {
    /// // Note we're setting a reasonable limit, or we'd print out ALL the messages in chat!
    /// let mut messages = client.get_chat_history("me").await?.limit(100);
    ///
    /// while let Some(message) = messages.next().await? {
    ///     println!("{}", message.text());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_chat_history<C: Into<ChatId>>(
        &self,
        chat: C,
    ) -> Result<MessageIter, InvocationError> {
        let peer = self.resolve_peer(chat).await?;
        Ok(MessageIter::new(self, peer))
    }

    /// Count the messages in the history of a chat.
    pub async fn get_chat_history_count<C: Into<ChatId>>(
        &self,
        chat: C,
    ) -> Result<usize, InvocationError> {
        self.get_chat_history(chat).await?.total().await
    }

    /// Iterate over the messages that match certain search criteria.
    ///
    /// This allows you to search by text within a chat or filter by media among other things.
    ///
    /// # Examples
    ///
    /// ```
    /// # async fn f(client: tgkit_client::Client) -> Result<(), Box<dyn std::error::Error>> {
    /// // Let's print all the people who think tgkit is cool.
    /// let mut messages = client
    ///     .search_messages("@engines")
    ///     .await?
    ///     .query("tgkit is cool");
    ///
    /// while let Some(message) = messages.next().await? {
    ///     println!("{:?}", message.sender_id());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search_messages<C: Into<ChatId>>(
        &self,
        chat: C,
    ) -> Result<SearchIter, InvocationError> {
        let peer = self.resolve_peer(chat).await?;
        Ok(SearchIter::new(self, peer))
    }

    /// Count the messages in a chat that match a query and filter.
    ///
    /// An empty query with [`SearchFilter::Empty`] counts every message.
    pub async fn search_messages_count<C: Into<ChatId>>(
        &self,
        chat: C,
        query: &str,
        filter: SearchFilter,
    ) -> Result<usize, InvocationError> {
        self.search_messages(chat)
            .await?
            .query(query)
            .filter(filter)
            .total()
            .await
    }

    /// Iterate over the messages that match certain search criteria, without being restricted to
    /// searching in a specific chat. The downside is that this global search supports less
    /// filters.
    ///
    /// This allows you to search by text within a chat or filter by media among other things.
    ///
    /// # Examples
    ///
    /// ```
    /// # async fn f(client: tgkit_client::Client) -> Result<(), Box<dyn std::error::Error>> {
    /// // Let's print all the chats where people think tgkit is cool.
    /// let mut messages = client.search_global().query("tgkit is cool");
    ///
    /// while let Some(message) = messages.next().await? {
    ///     println!("{:?}", message.chat().and_then(|chat| chat.name()));
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn search_global(&self) -> GlobalSearchIter {
        GlobalSearchIter::new(self)
    }

    /// Count the messages in every chat that match a query and filter.
    pub async fn search_global_count(
        &self,
        query: &str,
        filter: SearchFilter,
    ) -> Result<usize, InvocationError> {
        self.search_global().query(query).filter(filter).total().await
    }

    /// Mark the messages in a chat as read, up to and including `max_id`.
    ///
    /// A `max_id` of 0 marks the whole chat as read.
    ///
    /// # Examples
    ///
    /// ```
    /// # async fn f(client: tgkit_client::Client) -> Result<(), Box<dyn std::error::Error>> {
    /// client.read_chat_history("@engines", 0).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn read_chat_history<C: Into<ChatId>>(
        &self,
        chat: C,
        max_id: i32,
    ) -> Result<bool, InvocationError> {
        let peer = self.resolve_peer(chat).await?;
        if peer.id.kind() == PeerKind::Channel {
            self.invoke(&tl::functions::channels::ReadHistory {
                channel: peer.into(),
                max_id,
            })
            .await
        } else {
            self.invoke(&tl::functions::messages::ReadHistory {
                peer: peer.into(),
                max_id,
            })
            .await
            .map(|_| true)
        }
    }

    /// Tell the other members of a chat what the logged-in account is doing.
    ///
    /// Telegram only shows the action for a few seconds. Use [`Client::action`] to keep it
    /// shown while some work is ongoing.
    pub async fn send_chat_action<C: Into<ChatId>>(
        &self,
        chat: C,
        action: ChatAction,
    ) -> Result<bool, InvocationError> {
        self.action(chat).await?.oneshot(action).await
    }

    /// Set the reactions of the logged-in account on a message, replacing any previous ones.
    ///
    /// Returns the message with its updated reactions, if Telegram included it in its response.
    ///
    /// # Examples
    ///
    /// ```
    /// # async fn f(client: tgkit_client::Client) -> Result<(), Box<dyn std::error::Error>> {
    /// use tgkit_client::message::InputReactions;
    ///
    /// let message_id = 123;
    /// client.set_reaction("@engines", message_id, "👍").await?;
    /// client.set_reaction("@engines", message_id, InputReactions::remove()).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn set_reaction<C: Into<ChatId>, R: Into<InputReactions>>(
        &self,
        chat: C,
        message_id: i32,
        reactions: R,
    ) -> Result<Option<Message>, InvocationError> {
        let peer = self.resolve_peer(chat).await?;
        let reactions: InputReactions = reactions.into();
        let updates = self
            .invoke(&tl::functions::messages::SendReaction {
                big: reactions.big,
                add_to_recent: reactions.add_to_recent,
                peer: peer.into(),
                msg_id: message_id,
                reaction: Some(reactions.reactions),
            })
            .await?;

        Ok(self.edited_message_from_updates(updates, message_id))
    }

    fn edited_message_from_updates(
        &self,
        updates: tl::enums::Updates,
        message_id: i32,
    ) -> Option<Message> {
        let (updates, users, chats) = match updates {
            tl::enums::Updates::UpdateShort(update) => (vec![update.update], Vec::new(), Vec::new()),
            tl::enums::Updates::Combined(updates) => (updates.updates, updates.users, updates.chats),
            tl::enums::Updates::Updates(updates) => (updates.updates, updates.users, updates.chats),
            tl::enums::Updates::TooLong | tl::enums::Updates::UpdateShortSentMessage(_) => {
                return None;
            }
        };

        let peers = self.build_peer_map(users, chats);
        updates
            .into_iter()
            .filter_map(|update| match update {
                tl::enums::Update::EditMessage(tl::types::UpdateEditMessage { message, .. })
                | tl::enums::Update::EditChannelMessage(tl::types::UpdateEditChannelMessage {
                    message,
                    ..
                }) => Some(message),
                _ => None,
            })
            .find(|message| raw_message_id(message) == message_id)
            .map(|message| Message::from_raw(self, message, None, &peers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn unix_seconds_saturate() {
        let date = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert_eq!(unix_seconds(&date), 1_700_000_000);

        let far_future = Utc.timestamp_opt(1 << 40, 0).unwrap();
        assert_eq!(unix_seconds(&far_future), i32::MAX);

        let far_past = Utc.timestamp_opt(-(1 << 40), 0).unwrap();
        assert_eq!(unix_seconds(&far_past), i32::MIN);
    }
}
