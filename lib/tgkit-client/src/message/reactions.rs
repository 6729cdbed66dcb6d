// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use tgkit_tl_types as tl;
use tl::enums::Reaction;

/// Reactions to set on a message with [`crate::Client::set_reaction`].
///
/// An empty set removes the reactions the logged-in account had placed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputReactions {
    pub(crate) reactions: Vec<Reaction>,
    pub(crate) add_to_recent: bool,
    pub(crate) big: bool,
}

impl InputReactions {
    /// Make reaction animation big.
    pub fn big(mut self) -> Self {
        self.big = true;
        self
    }

    /// Add this reaction to the recent reactions list.
    ///
    /// More about that: \
    /// https://core.telegram.org/api/reactions#recent-reactions
    pub fn add_to_recent(mut self) -> Self {
        self.add_to_recent = true;
        self
    }

    /// Create new InputReactions with one emoticon reaction.
    ///
    /// An empty emoticon is the same as [`InputReactions::remove`].
    pub fn emoticon<S: Into<String>>(emoticon: S) -> Self {
        let emoticon = emoticon.into();
        if emoticon.is_empty() {
            return Self::remove();
        }
        Self {
            reactions: vec![Reaction::Emoji(tl::types::ReactionEmoji { emoticon })],
            ..Self::default()
        }
    }

    /// Create new InputReactions with one custom emoji reaction
    pub fn custom_emoji(document_id: i64) -> Self {
        Self {
            reactions: vec![Reaction::CustomEmoji(tl::types::ReactionCustomEmoji {
                document_id,
            })],
            ..Self::default()
        }
    }

    /// Remove every reaction previously set.
    pub fn remove() -> Self {
        Self::default()
    }
}

impl From<String> for InputReactions {
    fn from(emoticon: String) -> Self {
        Self::emoticon(emoticon)
    }
}

impl From<&str> for InputReactions {
    fn from(emoticon: &str) -> Self {
        Self::emoticon(emoticon)
    }
}

impl From<Vec<Reaction>> for InputReactions {
    fn from(reactions: Vec<Reaction>) -> Self {
        Self {
            reactions,
            ..Self::default()
        }
    }
}

impl From<InputReactions> for Vec<Reaction> {
    fn from(reactions: InputReactions) -> Self {
        reactions.reactions
    }
}
