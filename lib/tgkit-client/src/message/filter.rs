// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use tgkit_tl_types as tl;

/// Kind of messages to look for when searching.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchFilter {
    /// Any kind of message.
    #[default]
    Empty,
    Photo,
    Video,
    PhotoVideo,
    Document,
    Url,
    Voice,
    Audio,
    Pinned,
}

impl From<SearchFilter> for tl::enums::MessagesFilter {
    fn from(filter: SearchFilter) -> Self {
        use tl::enums::MessagesFilter as F;

        match filter {
            SearchFilter::Empty => F::InputMessagesFilterEmpty,
            SearchFilter::Photo => F::InputMessagesFilterPhotos,
            SearchFilter::Video => F::InputMessagesFilterVideo,
            SearchFilter::PhotoVideo => F::InputMessagesFilterPhotoVideo,
            SearchFilter::Document => F::InputMessagesFilterDocument,
            SearchFilter::Url => F::InputMessagesFilterUrl,
            SearchFilter::Voice => F::InputMessagesFilterVoice,
            SearchFilter::Audio => F::InputMessagesFilterMusic,
            SearchFilter::Pinned => F::InputMessagesFilterPinned,
        }
    }
}
