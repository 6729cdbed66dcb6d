// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::future::Future;
use std::time::Duration;

use tgkit_mtsender::InvocationError;
use tgkit_session::PeerRef;
use tgkit_tl_types as tl;
use tl::enums::SendMessageAction;
use tokio::time::sleep;

use crate::Client;

const DEFAULT_REPEAT_DELAY: Duration = Duration::from_secs(4);

/// What the logged-in account is doing in a chat, as shown to the other members.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatAction {
    Typing,
    UploadPhoto,
    RecordVideo,
    UploadVideo,
    RecordAudio,
    UploadAudio,
    UploadDocument,
    FindLocation,
    RecordVideoNote,
    UploadVideoNote,
    Playing,
    ChooseContact,
    ChooseSticker,
    /// Stop showing any action.
    Cancel,
}

impl From<ChatAction> for SendMessageAction {
    fn from(action: ChatAction) -> Self {
        use tl::types as t;

        match action {
            ChatAction::Typing => Self::SendMessageTypingAction,
            ChatAction::UploadPhoto => t::SendMessageUploadPhotoAction { progress: 0 }.into(),
            ChatAction::RecordVideo => Self::SendMessageRecordVideoAction,
            ChatAction::UploadVideo => t::SendMessageUploadVideoAction { progress: 0 }.into(),
            ChatAction::RecordAudio => Self::SendMessageRecordAudioAction,
            ChatAction::UploadAudio => t::SendMessageUploadAudioAction { progress: 0 }.into(),
            ChatAction::UploadDocument => {
                t::SendMessageUploadDocumentAction { progress: 0 }.into()
            }
            ChatAction::FindLocation => Self::SendMessageGeoLocationAction,
            ChatAction::RecordVideoNote => Self::SendMessageRecordRoundAction,
            ChatAction::UploadVideoNote => t::SendMessageUploadRoundAction { progress: 0 }.into(),
            ChatAction::Playing => Self::SendMessageGamePlayAction,
            ChatAction::ChooseContact => Self::SendMessageChooseContactAction,
            ChatAction::ChooseSticker => Self::SendMessageChooseStickerAction,
            ChatAction::Cancel => Self::SendMessageCancelAction,
        }
    }
}

/// Sends chat actions to one peer, obtained with [`Client::action`].
pub struct ActionSender {
    client: Client,
    peer: PeerRef,
    topic_id: Option<i32>,
    repeat_delay: Duration,
}

impl ActionSender {
    pub(crate) fn new(client: &Client, peer: PeerRef) -> Self {
        Self {
            client: client.clone(),
            peer,
            topic_id: None,
            repeat_delay: DEFAULT_REPEAT_DELAY,
        }
    }

    /// Set custom repeat delay
    pub fn repeat_delay(mut self, repeat_delay: Duration) -> Self {
        self.repeat_delay = repeat_delay;
        self
    }

    /// Set a topic id
    pub fn topic_id(mut self, topic_id: i32) -> Self {
        self.topic_id = Some(topic_id);
        self
    }

    /// Cancel any actions
    pub async fn cancel(&self) -> Result<bool, InvocationError> {
        self.oneshot(ChatAction::Cancel).await
    }

    /// Do a one-shot set action request
    pub async fn oneshot<A: Into<SendMessageAction>>(
        &self,
        action: A,
    ) -> Result<bool, InvocationError> {
        self.client
            .invoke(&tl::functions::messages::SetTyping {
                peer: self.peer.into(),
                top_msg_id: self.topic_id,
                action: action.into(),
            })
            .await
    }

    /// Repeat set action request until the future is done
    ///
    /// Telegram clears actions after a few seconds, so they must be sent again while the
    /// work they describe is still ongoing. The action is not cancelled once the future
    /// completes, and will fade away on its own instead.
    ///
    /// # Example
    ///
    /// ```
    /// # use std::time::Duration;
    /// # async fn f(peer: tgkit_session::PeerRef, client: tgkit_client::Client) -> Result<(), Box<dyn std::error::Error>> {
    /// use tgkit_client::peer::ChatAction;
    ///
    /// let heavy_task = async {
    ///     tokio::time::sleep(Duration::from_secs(10)).await;
    ///     42
    /// };
    /// tokio::pin!(heavy_task);
    ///
    /// let (task_result, _) = client
    ///     .action(peer)
    ///     .await?
    ///     .repeat(|| ChatAction::UploadDocument, heavy_task)
    ///     .await;
    ///
    /// assert_eq!(task_result, 42);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn repeat<A: Into<SendMessageAction>, T>(
        &self,
        action: impl Fn() -> A,
        mut future: impl Future<Output = T> + Unpin,
    ) -> (T, Result<(), InvocationError>) {
        let mut request_result = Ok(());

        let future_output = loop {
            if request_result.is_err() {
                // Don't try to make a request again
                return (future.await, request_result);
            }

            let action = async {
                request_result = self.oneshot(action()).await.map(drop);
                sleep(self.repeat_delay).await;
            };

            tokio::select! {
                _ = action => continue,
                output = &mut future => break output,
            };
        };

        (future_output, request_result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uploads_carry_no_progress() {
        assert_eq!(
            SendMessageAction::from(ChatAction::UploadVideo),
            SendMessageAction::SendMessageUploadVideoAction(tl::types::SendMessageUploadVideoAction {
                progress: 0
            })
        );
        assert_eq!(
            SendMessageAction::from(ChatAction::Cancel),
            SendMessageAction::SendMessageCancelAction
        );
    }
}
