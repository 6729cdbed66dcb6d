// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::collections::VecDeque;

use crate::Client;

/// A paginated request along with the items of the last page that were not returned yet.
///
/// Obtained from client methods such as [`Client::get_chat_history`] or
/// [`Client::get_discussion_replies`]; each kind of request adds its own `next` and `total`.
pub struct IterBuffer<R, T> {
    pub(crate) client: Client,
    pub(crate) request: R,
    pub(crate) buffer: VecDeque<T>,
    /// Set once Telegram said how many items there are.
    pub(crate) total: Option<usize>,
    /// Set once the page in the buffer is known to be the last one.
    pub(crate) last_chunk: bool,
    limit: Option<usize>,
    yielded: usize,
}

impl<R, T> IterBuffer<R, T> {
    pub(crate) fn from_request(client: &Client, page_size: usize, request: R) -> Self {
        Self {
            client: client.clone(),
            request,
            buffer: VecDeque::with_capacity(page_size),
            total: None,
            last_chunk: false,
            limit: None,
            yielded: 0,
        }
    }

    /// Stop after returning `n` items.
    ///
    /// Unlike dropping the iterator early, the last request only asks for as many items as
    /// are still missing.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    fn remaining(&self) -> Option<usize> {
        self.limit.map(|limit| limit.saturating_sub(self.yielded))
    }

    /// The next item if no request is needed to produce it.
    ///
    /// `Some(None)` means the iterator is done, either because the limit was reached or
    /// because the last page ran out. `None` means another page has to be fetched.
    pub(crate) fn buffered(&mut self) -> Option<Option<T>> {
        if self.remaining() == Some(0) || (self.buffer.is_empty() && self.last_chunk) {
            return Some(None);
        }
        self.pop_front().map(Some)
    }

    /// How many items the next request should ask for, at most `max`.
    pub(crate) fn page_size(&self, max: usize) -> i32 {
        // Telegram answers a limit of 0 with a default amount, so never ask for less than 1.
        let size = self.remaining().map_or(max, |remaining| remaining.clamp(1, max));
        i32::try_from(size).unwrap_or(i32::MAX)
    }

    /// The item the next page should start after, unless there is no next page.
    pub(crate) fn next_offset(&self) -> Option<&T> {
        if self.last_chunk {
            None
        } else {
            self.buffer.back()
        }
    }

    /// Take the first item of the page, counting it towards the limit.
    pub(crate) fn pop_front(&mut self) -> Option<T> {
        let item = self.buffer.pop_front()?;
        self.yielded += 1;
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use futures_util::FutureExt;
    use futures_util::future::BoxFuture;
    use tgkit_mtsender::{Connection, Connector, InvocationError, SenderPool};
    use tgkit_session::storages::MemorySession;

    struct Offline;

    impl Connector for Offline {
        fn connect(&self, _: i32) -> BoxFuture<'_, Result<Box<dyn Connection>, InvocationError>> {
            async { Err(InvocationError::InvalidDc) }.boxed()
        }
    }

    fn page(items: &[i32], last_chunk: bool) -> IterBuffer<(), i32> {
        let pool = SenderPool::new(Offline, 1);
        let client = Client::new(&pool, Arc::new(MemorySession::default()));
        let mut iter = IterBuffer::from_request(&client, items.len(), ());
        iter.buffer.extend(items);
        iter.last_chunk = last_chunk;
        iter
    }

    #[test]
    fn more_pages_are_needed_until_the_last() {
        let mut iter = page(&[1, 2], false);
        assert_eq!(iter.buffered(), Some(Some(1)));
        assert_eq!(iter.buffered(), Some(Some(2)));
        assert_eq!(iter.buffered(), None);

        let mut iter = page(&[1], true);
        assert_eq!(iter.buffered(), Some(Some(1)));
        assert_eq!(iter.buffered(), Some(None));
    }

    #[test]
    fn pages_shrink_to_the_limit() {
        let mut iter = page(&[1, 2, 3], false).limit(2);
        assert_eq!(iter.page_size(100), 2);
        assert_eq!(iter.buffered(), Some(Some(1)));
        assert_eq!(iter.page_size(100), 1);
        assert_eq!(iter.buffered(), Some(Some(2)));
        assert_eq!(iter.buffered(), Some(None));
        assert_eq!(iter.page_size(100), 1);

        assert_eq!(page(&[], false).page_size(100), 100);
    }

    #[test]
    fn offsets_come_from_the_end_of_the_page() {
        assert_eq!(page(&[5, 4, 3], false).next_offset(), Some(&3));
        assert_eq!(page(&[5, 4, 3], true).next_offset(), None);
        assert_eq!(page(&[], false).next_offset(), None);
    }
}
