// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

/// Partition of the dialogs of an account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChatList {
    /// The dialogs shown by default.
    #[default]
    Main,
    /// The archived dialogs.
    Archive,
}

impl ChatList {
    /// Identifier of the folder holding this list, as used by the API.
    pub fn folder_id(self) -> i32 {
        match self {
            Self::Main => 0,
            Self::Archive => 1,
        }
    }
}

impl TryFrom<i32> for ChatList {
    type Error = i32;

    /// Only the main (`0`) and archive (`1`) folders are chat lists.
    fn try_from(folder_id: i32) -> Result<Self, Self::Error> {
        match folder_id {
            0 => Ok(Self::Main),
            1 => Ok(Self::Archive),
            other => Err(other),
        }
    }
}
