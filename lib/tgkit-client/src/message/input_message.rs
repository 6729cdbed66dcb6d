// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use tgkit_tl_types as tl;
use web_time::{SystemTime, UNIX_EPOCH};

// https://github.com/telegramdesktop/tdesktop/blob/e7fbcce9d9f0a8944eb2c34e74bd01b8776cb891/Telegram/SourceFiles/data/data_scheduled_messages.h#L52
const SCHEDULE_ONCE_ONLINE: i32 = 0x7FFFFFFE;

/// Construct and send text messages with various options.
///
/// # Examples
///
/// ```
/// use tgkit_client::message::InputMessage;
///
/// let message = InputMessage::text("Hello!").silent(true).reply_to(Some(12));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct InputMessage {
    pub(crate) background: bool,
    pub(crate) clear_draft: bool,
    pub(crate) link_preview: bool,
    pub(crate) noforwards: bool,
    pub(crate) reply_to: Option<i32>,
    pub(crate) topic_id: Option<i32>,
    pub(crate) schedule_date: Option<i32>,
    pub(crate) silent: bool,
    pub(crate) text: String,
    pub(crate) entities: Vec<tl::enums::MessageEntity>,
    pub(crate) reply_markup: Option<tl::enums::ReplyMarkup>,
}

impl Default for InputMessage {
    fn default() -> Self {
        Self {
            background: false,
            clear_draft: false,
            link_preview: true,
            noforwards: false,
            reply_to: None,
            topic_id: None,
            schedule_date: None,
            silent: false,
            text: String::new(),
            entities: Vec::new(),
            reply_markup: None,
        }
    }
}

impl InputMessage {
    /// Builds a new message using the given plaintext as the message contents.
    pub fn text<T: AsRef<str>>(s: T) -> Self {
        Self {
            text: s.as_ref().to_string(),
            ..Self::default()
        }
    }

    /// Whether to "send this message as a background message".
    ///
    /// This description is taken from https://core.telegram.org/method/messages.sendMessage.
    pub fn background(mut self, background: bool) -> Self {
        self.background = background;
        self
    }

    /// Whether the draft in this chat, if any, should be cleared.
    pub fn clear_draft(mut self, clear_draft: bool) -> Self {
        self.clear_draft = clear_draft;
        self
    }

    /// Whether the link preview be shown for the message.
    ///
    /// Defaults to `true`.
    pub fn link_preview(mut self, link_preview: bool) -> Self {
        self.link_preview = link_preview;
        self
    }

    /// Whether the message should be protected from forwarding and saving.
    pub fn noforwards(mut self, noforwards: bool) -> Self {
        self.noforwards = noforwards;
        self
    }

    /// The message identifier to which this message should reply to, if any.
    ///
    /// Otherwise, this message will not be a reply to any other.
    pub fn reply_to(mut self, reply_to: Option<i32>) -> Self {
        self.reply_to = reply_to;
        self
    }

    /// The forum topic to send this message in.
    pub fn topic_id(mut self, topic_id: Option<i32>) -> Self {
        self.topic_id = topic_id;
        self
    }

    /// If set to a distant enough future time, the message won't be sent immediately,
    /// and instead it will be scheduled to be automatically sent at a later time.
    ///
    /// This scheduling is done server-side, and may not be accurate to the second.
    ///
    /// Bot accounts cannot schedule messages.
    pub fn schedule_date(mut self, schedule_date: Option<SystemTime>) -> Self {
        self.schedule_date = schedule_date.map(|t| {
            t.duration_since(UNIX_EPOCH)
                .map(|d| i32::try_from(d.as_secs()).unwrap_or(i32::MAX))
                .unwrap_or(0)
        });
        self
    }

    /// Schedule the message to be sent once the person comes online.
    ///
    /// This only works in private chats, and only if the person has their
    /// last seen visible.
    pub fn schedule_once_online(mut self) -> Self {
        self.schedule_date = Some(SCHEDULE_ONCE_ONLINE);
        self
    }

    /// Formatting entities for the text, with offsets and lengths in UTF-16 code units.
    pub fn fmt_entities(mut self, entities: Vec<tl::enums::MessageEntity>) -> Self {
        self.entities = entities;
        self
    }

    /// The reply markup to show along the message, such as an inline keyboard.
    pub fn reply_markup(mut self, reply_markup: Option<tl::enums::ReplyMarkup>) -> Self {
        self.reply_markup = reply_markup;
        self
    }

    /// Whether the message should notify people or not.
    ///
    /// Defaults to `false`, which means it will notify them. Set it to `true`
    /// to alter this behaviour.
    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Entities to send, or `None` when there are none, so the flag is left unset.
    pub(crate) fn raw_entities(&self) -> Option<Vec<tl::enums::MessageEntity>> {
        (!self.entities.is_empty()).then(|| self.entities.clone())
    }

    /// Raw reply header, built from the message and topic being replied to.
    pub(crate) fn reply_header(&self) -> Option<tl::enums::InputReplyTo> {
        match (self.reply_to, self.topic_id) {
            (None, None) => None,
            (reply_to, top_msg_id) => Some(
                tl::types::InputReplyToMessage {
                    reply_to_msg_id: reply_to.or(top_msg_id).unwrap_or(0),
                    top_msg_id,
                    reply_to_peer_id: None,
                    quote_text: None,
                    quote_entities: None,
                    quote_offset: None,
                }
                .into(),
            ),
        }
    }
}

impl From<&str> for InputMessage {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for InputMessage {
    fn from(text: String) -> Self {
        Self {
            text,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_preview_is_on_by_default() {
        let message = InputMessage::from("hi");
        assert!(message.link_preview);
        assert_eq!(message.text, "hi");
        assert_eq!(message.reply_header(), None);
    }

    #[test]
    fn topics_are_replied_to_when_no_message_is() {
        let message = InputMessage::text("hi").topic_id(Some(5));
        assert_eq!(
            message.reply_header(),
            Some(
                tl::types::InputReplyToMessage {
                    reply_to_msg_id: 5,
                    top_msg_id: Some(5),
                    reply_to_peer_id: None,
                    quote_text: None,
                    quote_entities: None,
                    quote_offset: None,
                }
                .into()
            )
        );

        let message = message.reply_to(Some(9));
        assert_eq!(
            message.reply_header(),
            Some(
                tl::types::InputReplyToMessage {
                    reply_to_msg_id: 9,
                    top_msg_id: Some(5),
                    reply_to_peer_id: None,
                    quote_text: None,
                    quote_entities: None,
                    quote_offset: None,
                }
                .into()
            )
        );
    }

    #[test]
    fn schedule_dates_are_unix_seconds() {
        let when = UNIX_EPOCH + std::time::Duration::from_secs(1000);
        assert_eq!(
            InputMessage::text("later").schedule_date(Some(when)).schedule_date,
            Some(1000)
        );

        let far = UNIX_EPOCH + std::time::Duration::from_secs(1 << 40);
        assert_eq!(
            InputMessage::text("later").schedule_date(Some(far)).schedule_date,
            Some(i32::MAX)
        );
    }

    #[test]
    fn empty_entities_leave_flag_unset() {
        let message = InputMessage::text("hi");
        assert_eq!(message.raw_entities(), None);

        let bold = tl::enums::MessageEntity::Bold(tl::types::MessageEntityBold {
            offset: 0,
            length: 2,
        });
        let message = message.fmt_entities(vec![bold.clone()]);
        assert_eq!(message.raw_entities(), Some(vec![bold]));
    }
}
