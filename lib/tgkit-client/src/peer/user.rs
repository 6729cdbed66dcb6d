// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use tgkit_session::{PeerAuth, PeerId, PeerIdOutOfRange, PeerRef};
use tgkit_tl_types as tl;

/// A user.
///
/// Users include your contacts, members of a group, bot accounts created by [@BotFather], or
/// anyone with a Telegram account.
///
/// A "normal" (non-bot) user may also behave like a "bot" without actually being one, for
/// example, when controlled with a library like this one instead of an official client.
///
/// [@BotFather]: https://t.me/BotFather
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub raw: tl::enums::User,
    id: PeerId,
}

impl User {
    /// Wrap a raw user, as long as its identifier is one Telegram could have assigned.
    pub fn from_raw(user: tl::enums::User) -> Result<Self, PeerIdOutOfRange> {
        let id = PeerId::try_user(match &user {
            tl::enums::User::User(user) => user.id,
            tl::enums::User::Empty(user) => user.id,
        })?;
        Ok(Self { raw: user, id })
    }

    fn user(&self) -> Option<&tl::types::User> {
        match &self.raw {
            tl::enums::User::User(user) => Some(user),
            tl::enums::User::Empty(_) => None,
        }
    }

    /// Return the unique identifier for this user.
    pub fn id(&self) -> PeerId {
        self.id
    }

    pub(crate) fn auth(&self) -> Option<PeerAuth> {
        self.user()
            .filter(|user| !user.min)
            .and_then(|user| user.access_hash)
            .map(PeerAuth::from_hash)
    }

    /// Convert the user to its reference, if it was not a "min" sighting.
    pub fn to_ref(&self) -> Option<PeerRef> {
        self.auth().map(|auth| PeerRef {
            id: self.id(),
            auth,
        })
    }

    /// Return the first name of this user.
    ///
    /// The name will be `None` if the account was deleted.
    pub fn first_name(&self) -> Option<&str> {
        self.user().and_then(|user| user.first_name.as_deref())
    }

    /// Return the last name of this user, if any.
    pub fn last_name(&self) -> Option<&str> {
        self.user().and_then(|user| user.last_name.as_deref())
    }

    /// Return the full name of this user.
    ///
    /// This is equal to the user's first name concatenated with the user's last name, if this
    /// is not empty. Otherwise, it equals the user's first name.
    pub fn full_name(&self) -> String {
        let first_name = self.first_name().unwrap_or_default();
        match self.last_name() {
            Some(last_name) if !last_name.is_empty() => format!("{first_name} {last_name}"),
            _ => first_name.to_string(),
        }
    }

    /// Return the public @username of this user, if any.
    ///
    /// The returned username does not contain the "@" prefix.
    pub fn username(&self) -> Option<&str> {
        self.user().and_then(|user| user.username.as_deref())
    }

    /// Return the phone number of this user, if they are not a bot and their privacy settings
    /// allow you to see it.
    pub fn phone(&self) -> Option<&str> {
        self.user().and_then(|user| user.phone.as_deref())
    }

    /// Does this user represent the account that's currently logged in?
    pub fn is_self(&self) -> bool {
        self.user().is_some_and(|user| user.is_self)
    }

    /// Is this user a bot account?
    pub fn is_bot(&self) -> bool {
        self.user().is_some_and(|user| user.bot)
    }

    /// Is this user's account deleted?
    pub fn deleted(&self) -> bool {
        self.user().is_none_or(|user| user.deleted)
    }

    /// Has the account of this user been verified?
    pub fn verified(&self) -> bool {
        self.user().is_some_and(|user| user.verified)
    }

    /// Does this user have a Telegram Premium subscription?
    pub fn is_premium(&self) -> bool {
        self.user().is_some_and(|user| user.premium)
    }

    /// The IETF language tag of this user's client, if they are a bot talking to you.
    pub fn lang_code(&self) -> Option<&str> {
        self.user().and_then(|user| user.lang_code.as_deref())
    }
}
