// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use tgkit_tl_types as tl;

/// Privileges of an administrator in a chat.
///
/// The default value only allows managing the chat, which is the least an administrator
/// can do. Use [`ChatPrivileges::none`] to demote an administrator instead.
///
/// # Examples
///
/// ```
/// use tgkit_client::peer::ChatPrivileges;
///
/// let moderator = ChatPrivileges {
///     can_delete_messages: true,
///     can_restrict_members: true,
///     ..Default::default()
/// };
/// assert!(moderator.is_admin());
/// assert!(!ChatPrivileges::none().is_admin());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChatPrivileges {
    /// Access the chat event log, statistics and members, and see hidden members.
    pub can_manage_chat: bool,
    /// Delete messages of other users.
    pub can_delete_messages: bool,
    /// Manage video chats.
    pub can_manage_video_chats: bool,
    /// Restrict, ban or unban members.
    pub can_restrict_members: bool,
    /// Add new administrators with a subset of this administrator's privileges,
    /// or demote administrators that were promoted by this one.
    pub can_promote_members: bool,
    /// Change the title, photo and other settings of the chat.
    pub can_change_info: bool,
    /// Post messages in a broadcast channel.
    pub can_post_messages: bool,
    /// Edit messages of other users and pin messages in a broadcast channel.
    pub can_edit_messages: bool,
    /// Invite new users to the chat.
    pub can_invite_users: bool,
    /// Pin messages in groups.
    pub can_pin_messages: bool,
    /// Create, rename, close and reopen forum topics.
    pub can_manage_topics: bool,
    /// Post stories on behalf of the chat.
    pub can_post_stories: bool,
    /// Edit stories posted by other administrators.
    pub can_edit_stories: bool,
    /// Delete stories posted by other administrators.
    pub can_delete_stories: bool,
    /// Stay hidden in the member list and send messages on behalf of the chat.
    pub is_anonymous: bool,
}

impl Default for ChatPrivileges {
    fn default() -> Self {
        Self {
            can_manage_chat: true,
            ..Self::none()
        }
    }
}

impl ChatPrivileges {
    /// A set of privileges with every flag disabled, used to demote an administrator.
    pub fn none() -> Self {
        Self {
            can_manage_chat: false,
            can_delete_messages: false,
            can_manage_video_chats: false,
            can_restrict_members: false,
            can_promote_members: false,
            can_change_info: false,
            can_post_messages: false,
            can_edit_messages: false,
            can_invite_users: false,
            can_pin_messages: false,
            can_manage_topics: false,
            can_post_stories: false,
            can_edit_stories: false,
            can_delete_stories: false,
            is_anonymous: false,
        }
    }

    /// Every privilege, as held by the creator of a chat.
    pub fn all() -> Self {
        Self {
            can_manage_chat: true,
            can_delete_messages: true,
            can_manage_video_chats: true,
            can_restrict_members: true,
            can_promote_members: true,
            can_change_info: true,
            can_post_messages: true,
            can_edit_messages: true,
            can_invite_users: true,
            can_pin_messages: true,
            can_manage_topics: true,
            can_post_stories: true,
            can_edit_stories: true,
            can_delete_stories: true,
            is_anonymous: false,
        }
    }

    /// Whether any privilege is granted, making its holder an administrator.
    pub fn is_admin(&self) -> bool {
        *self != Self::none()
    }

    pub(crate) fn from_raw(rights: &tl::types::ChatAdminRights) -> Self {
        Self {
            can_manage_chat: rights.other,
            can_delete_messages: rights.delete_messages,
            can_manage_video_chats: rights.manage_call,
            can_restrict_members: rights.ban_users,
            can_promote_members: rights.add_admins,
            can_change_info: rights.change_info,
            can_post_messages: rights.post_messages,
            can_edit_messages: rights.edit_messages,
            can_invite_users: rights.invite_users,
            can_pin_messages: rights.pin_messages,
            can_manage_topics: rights.manage_topics,
            can_post_stories: rights.post_stories,
            can_edit_stories: rights.edit_stories,
            can_delete_stories: rights.delete_stories,
            is_anonymous: rights.anonymous,
        }
    }

    /// Raw administrator rights as sent to Telegram when promoting a member.
    pub fn write(&self) -> tl::enums::ChatAdminRights {
        tl::types::ChatAdminRights {
            change_info: self.can_change_info,
            post_messages: self.can_post_messages,
            edit_messages: self.can_edit_messages,
            delete_messages: self.can_delete_messages,
            ban_users: self.can_restrict_members,
            invite_users: self.can_invite_users,
            pin_messages: self.can_pin_messages,
            add_admins: self.can_promote_members,
            anonymous: self.is_anonymous,
            manage_call: self.can_manage_video_chats,
            other: self.can_manage_chat,
            manage_topics: self.can_manage_topics,
            post_stories: self.can_post_stories,
            edit_stories: self.can_edit_stories,
            delete_stories: self.can_delete_stories,
        }
        .into()
    }
}

impl From<&tl::enums::ChatAdminRights> for ChatPrivileges {
    fn from(rights: &tl::enums::ChatAdminRights) -> Self {
        let tl::enums::ChatAdminRights::Rights(rights) = rights;
        Self::from_raw(rights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_only_manages_chat() {
        let tl::enums::ChatAdminRights::Rights(rights) = ChatPrivileges::default().write();
        assert!(rights.other);
        assert!(!rights.delete_messages);
        assert!(!rights.add_admins);
        assert!(!rights.anonymous);
    }

    #[test]
    fn flags_map_to_their_rights() {
        let privileges = ChatPrivileges {
            can_restrict_members: true,
            can_promote_members: true,
            can_manage_video_chats: true,
            is_anonymous: true,
            ..ChatPrivileges::none()
        };
        let tl::enums::ChatAdminRights::Rights(rights) = privileges.write();
        assert!(rights.ban_users);
        assert!(rights.add_admins);
        assert!(rights.manage_call);
        assert!(rights.anonymous);
        assert!(!rights.other);
        assert_eq!(ChatPrivileges::from_raw(&rights), privileges);
    }

    #[test]
    fn none_is_not_admin() {
        assert!(!ChatPrivileges::none().is_admin());
        assert!(ChatPrivileges::default().is_admin());
        assert!(ChatPrivileges::all().is_admin());
    }
}
