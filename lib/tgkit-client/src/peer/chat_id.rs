// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use tgkit_session::{PeerId, PeerRef};

/// Anything that identifies a chat, to be resolved by [`crate::Client::resolve_peer`].
///
/// Strings are interpreted the way people write them: `"me"` and `"self"` name the
/// logged-in account, strings of digits (with an optional leading `-`) are Bot API
/// dialog identifiers, and anything else is a username, with or without its `@`.
///
/// ```
/// use tgkit_client::peer::ChatId;
///
/// assert_eq!(ChatId::from("me"), ChatId::Me);
/// assert_eq!(ChatId::from("-1001234567890"), ChatId::Id(-1001234567890));
/// assert_eq!(ChatId::from("@Lonami"), ChatId::Username("lonami".into()));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatId {
    /// The logged-in account.
    Me,
    /// A peer identifier in the Bot API Dialog ID format.
    Id(i64),
    /// A lowercase username without the leading `@`.
    Username(String),
    /// An already-resolved reference, used as-is.
    Ref(PeerRef),
}

impl From<&str> for ChatId {
    fn from(value: &str) -> Self {
        let value = value.trim();
        if value.eq_ignore_ascii_case("me") || value.eq_ignore_ascii_case("self") {
            return Self::Me;
        }
        if let Ok(id) = value.parse::<i64>() {
            return Self::Id(id);
        }
        Self::Username(value.trim_start_matches('@').to_ascii_lowercase())
    }
}

impl From<String> for ChatId {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<&String> for ChatId {
    fn from(value: &String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl From<PeerId> for ChatId {
    fn from(id: PeerId) -> Self {
        Self::Id(id.bot_api_dialog_id())
    }
}

impl From<PeerRef> for ChatId {
    fn from(peer: PeerRef) -> Self {
        Self::Ref(peer)
    }
}

impl From<&PeerRef> for ChatId {
    fn from(peer: &PeerRef) -> Self {
        Self::Ref(*peer)
    }
}
