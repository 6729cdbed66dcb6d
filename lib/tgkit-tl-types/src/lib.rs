// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This library contains the Rust definitions for the part of Telegram's
//! schema that tgkit speaks, in the form of [`types`] (concrete constructors
//! as `struct`), [`enums`] (boxed types as `enum`) and [`functions`] (remote
//! procedure calls as `struct`).
//!
//! Types and enums implement both [`Serializable`] and [`Deserializable`],
//! so responses can be scripted as easily as requests. Functions implement
//! [`Serializable`] and [`RemoteCall`], which names the type of their result.
//!
//! The definitions are generated at build time from `tl/api.tl`, an excerpt
//! of the official schema holding the constructors used by the client crates,
//! and from `tl/mtproto.tl`.
//!
//! # Features
//!
//! The default feature set includes:
//!
//! * `tl-api`: generates code for the `api.tl`.
//! * `impl-debug`: implements `Debug` for the generated code.
//! * `impl-from-type`: implements `From<Type> for Enum`.
//! * `impl-from-enum`: implements `TryFrom<Enum> for Type`.
//!
//! Other features are:
//!
//! * `tl-mtproto`: generates code for the `mtproto.tl`, where `rpc_error` lives.
//! * `deserializable-functions`: implements [`Deserializable`] for [`functions`],
//!   for the side of the connection that receives requests.
//! * `impl-serde`: derives `serde` traits for the generated code.
//!
//! ```
//! use tgkit_tl_types::{Deserializable, Identifiable, Serializable, enums, types};
//!
//! let peer = enums::InputPeer::Chat(types::InputPeerChat { chat_id: 123 });
//! let bytes = peer.to_bytes();
//! assert_eq!(&bytes[..4], types::InputPeerChat::CONSTRUCTOR_ID.to_le_bytes());
//! assert_eq!(enums::InputPeer::from_bytes(&bytes).unwrap(), peer);
//! ```

#![deny(unsafe_code)]

pub mod deserialize;
pub mod errors;
mod generated;
mod serialize;

pub use deserialize::{Cursor, Deserializable};
pub use generated::{LAYER, enums, functions, name_for_id, types};
pub use serialize::Serializable;

/// The concrete type of a vector, that is, `vector` as opposed to the
/// boxed `Vector`, which carries no constructor identifier.
#[derive(Clone, Debug, PartialEq)]
pub struct RawVec<T>(pub Vec<T>);

/// An unparsed blob, passed through without interpretation.
#[derive(Clone, Debug, PartialEq)]
pub struct Blob(pub Vec<u8>);

impl From<Vec<u8>> for Blob {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

/// Anything implementing this trait is identifiable by both ends (client-server)
/// when performing Remote Procedure Calls (RPC) and transmission of objects.
pub trait Identifiable {
    /// The unique identifier for the type.
    const CONSTRUCTOR_ID: u32;
}

/// Structures implementing this trait indicate that they are suitable for
/// use to perform Remote Procedure Calls (RPC), and know what the type of
/// the response will be.
pub trait RemoteCall: Serializable {
    /// The type of the "return" value coming from the other end of the
    /// connection.
    type Return: Deserializable;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn functions_write_constructor_and_flags() {
        let request = functions::messages::GetDialogs {
            exclude_pinned: false,
            folder_id: Some(1),
            offset_date: 0,
            offset_id: 0,
            offset_peer: enums::InputPeer::Empty,
            limit: 1,
            hash: 0,
        };

        let mut expected = Vec::new();
        0xa0f4cb4fu32.serialize(&mut expected);
        2u32.serialize(&mut expected);
        1i32.serialize(&mut expected);
        0i32.serialize(&mut expected);
        0i32.serialize(&mut expected);
        types::InputPeerEmpty::CONSTRUCTOR_ID.serialize(&mut expected);
        1i32.serialize(&mut expected);
        0i64.serialize(&mut expected);

        assert_eq!(request.to_bytes(), expected);
    }

    #[test]
    fn absent_flags_are_not_written() {
        let request = functions::messages::GetDialogs {
            exclude_pinned: true,
            folder_id: None,
            offset_date: 0,
            offset_id: 0,
            offset_peer: enums::InputPeer::Empty,
            limit: 1,
            hash: 0,
        };
        let bytes = request.to_bytes();
        assert_eq!(&bytes[4..8], 1u32.to_le_bytes());
        assert_eq!(bytes.len(), 4 + 4 + 4 + 4 + 4 + 4 + 8);
    }

    #[test]
    fn boxed_types_decode_their_variant() {
        let response = enums::messages::Dialogs::Slice(types::messages::DialogsSlice {
            count: 42,
            dialogs: Vec::new(),
            messages: Vec::new(),
            chats: Vec::new(),
            users: Vec::new(),
        });
        let decoded = enums::messages::Dialogs::from_bytes(&response.to_bytes()).unwrap();
        assert_eq!(decoded, response);
    }

    #[test]
    fn optional_fields_follow_flags() {
        let rights = types::ChatAdminRights {
            change_info: true,
            post_messages: false,
            edit_messages: false,
            delete_messages: true,
            ban_users: false,
            invite_users: true,
            pin_messages: false,
            add_admins: false,
            anonymous: false,
            manage_call: false,
            other: false,
            manage_topics: false,
            post_stories: false,
            edit_stories: false,
            delete_stories: false,
        };
        assert_eq!(rights.to_bytes(), 0b101001u32.to_le_bytes());
        assert_eq!(types::ChatAdminRights::from_bytes(&rights.to_bytes()), Ok(rights));
    }

    #[test]
    fn unknown_constructor_is_reported() {
        let err = enums::Peer::from_bytes(&0xdeadbeefu32.to_le_bytes()).unwrap_err();
        assert_eq!(err, deserialize::Error::UnexpectedConstructor { id: 0xdeadbeef });
    }

    #[test]
    fn channels_decode_with_their_second_flags_and_photo() {
        let mut bytes = Vec::new();
        0x0aadfc8fu32.serialize(&mut bytes);
        ((1u32 << 8) | (1 << 13)).serialize(&mut bytes);
        0u32.serialize(&mut bytes);
        1234i64.serialize(&mut bytes);
        99i64.serialize(&mut bytes);
        "Rust".to_string().serialize(&mut bytes);
        types::ChatPhotoEmpty::CONSTRUCTOR_ID.serialize(&mut bytes);
        7i32.serialize(&mut bytes);

        match enums::Chat::from_bytes(&bytes).unwrap() {
            enums::Chat::Channel(channel) => {
                assert!(channel.megagroup);
                assert_eq!(channel.id, 1234);
                assert_eq!(channel.access_hash, Some(99));
                assert_eq!(channel.title, "Rust");
                assert_eq!(channel.photo, enums::ChatPhoto::Empty);
                assert_eq!(channel.date, 7);
                assert_eq!(channel.usernames, None);
            }
            chat => panic!("unexpected chat: {chat:?}"),
        }
    }

    #[test]
    fn names_are_known() {
        assert_eq!(name_for_id(0xa0f4cb4f), "messages.getDialogs");
        assert_eq!(name_for_id(0x446972fd), "messages.getDiscussionMessage");
        assert_eq!(name_for_id(0xaadfc8f), "channel");
    }
}
