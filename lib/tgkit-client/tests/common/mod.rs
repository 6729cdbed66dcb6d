// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A scripted stand-in for Telegram, answering each request with the responses
//! queued for its constructor.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use simple_logger::SimpleLogger;
use tgkit_client::Client;
use tgkit_client::sender::{Connection, Connector, InvocationError, SenderPool, SenderPoolHandle};
use tgkit_client::session::storages::MemorySession;
use tgkit_client::session::{PeerInfo, Session};
use tgkit_client::tl::{self, Identifiable, Serializable, enums, types};
use tokio::runtime;
use tokio::task::JoinHandle;

const INVOKE_WITH_LAYER: u32 = 0xda9b0d0d;

#[derive(Default)]
struct Script {
    requests: Vec<Vec<u8>>,
    responses: HashMap<u32, VecDeque<Vec<u8>>>,
}

#[derive(Clone, Default)]
pub struct ScriptedConnector(Arc<Mutex<Script>>);

struct ScriptedConnection(Arc<Mutex<Script>>);

impl ScriptedConnector {
    /// Queue the response to the next request of type `F`.
    pub fn respond<F: Identifiable>(&self, response: impl Serializable) {
        self.0
            .lock()
            .unwrap()
            .responses
            .entry(F::CONSTRUCTOR_ID)
            .or_default()
            .push_back(response.to_bytes());
    }

    /// Queue bytes that may not decode as anything as the response to the next request of type `F`.
    pub fn respond_raw<F: Identifiable>(&self, body: Vec<u8>) {
        self.0
            .lock()
            .unwrap()
            .responses
            .entry(F::CONSTRUCTOR_ID)
            .or_default()
            .push_back(body);
    }

    /// Queue an RPC error as the response to the next request of type `F`.
    pub fn fail<F: Identifiable>(&self, code: i32, message: &str) {
        self.respond::<F>(enums::RpcError::Error(types::RpcError {
            error_code: code,
            error_message: message.into(),
        }));
    }

    /// Every request body sent so far, without the connection setup.
    pub fn requests(&self) -> Vec<Vec<u8>> {
        self.0.lock().unwrap().requests.clone()
    }

    /// Request bodies of type `F` sent so far.
    pub fn sent<F: Identifiable>(&self) -> Vec<Vec<u8>> {
        self.requests()
            .into_iter()
            .filter(|body| constructor_id(body) == F::CONSTRUCTOR_ID)
            .collect()
    }
}

fn constructor_id(body: &[u8]) -> u32 {
    u32::from_le_bytes([body[0], body[1], body[2], body[3]])
}

impl Connector for ScriptedConnector {
    fn connect(&self, _dc_id: i32) -> BoxFuture<'_, Result<Box<dyn Connection>, InvocationError>> {
        let script = Arc::clone(&self.0);
        async move { Ok(Box::new(ScriptedConnection(script)) as Box<dyn Connection>) }.boxed()
    }
}

impl Connection for ScriptedConnection {
    fn invoke(&self, body: Vec<u8>) -> BoxFuture<'_, Result<Vec<u8>, InvocationError>> {
        let id = constructor_id(&body);
        let response = if id == INVOKE_WITH_LAYER {
            enums::NearestDc::Dc(types::NearestDc {
                country: "ES".into(),
                this_dc: 2,
                nearest_dc: 2,
            })
            .to_bytes()
        } else {
            let mut script = self.0.lock().unwrap();
            script.requests.push(body);
            script
                .responses
                .get_mut(&id)
                .and_then(VecDeque::pop_front)
                .unwrap_or_else(|| {
                    enums::RpcError::Error(types::RpcError {
                        error_code: 500,
                        error_message: format!("UNSCRIPTED_{id:08x}"),
                    })
                    .to_bytes()
                })
        };
        async move { Ok(response) }.boxed()
    }
}

pub fn runtime() -> runtime::Runtime {
    let _ = SimpleLogger::new()
        .with_level(log::LevelFilter::Debug)
        .init();

    runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

/// A client wired to a [`ScriptedConnector`], with its pool running on a task.
pub struct Harness {
    pub client: Client,
    pub connector: ScriptedConnector,
    pub session: Arc<MemorySession>,
    handle: SenderPoolHandle,
    pool_task: JoinHandle<()>,
}

impl Harness {
    /// Must be called from within the runtime.
    pub fn start() -> Self {
        let connector = ScriptedConnector::default();
        let session = Arc::new(MemorySession::default());
        let pool = SenderPool::new(connector.clone(), 1);
        let client = Client::new(&pool, session.clone());
        let SenderPool { runner, handle } = pool;
        let pool_task = tokio::spawn(runner.run());

        Self {
            client,
            connector,
            session,
            handle,
            pool_task,
        }
    }

    pub fn remember_user(&self, user: &enums::User) {
        self.session.cache_peer(&PeerInfo::from(user));
    }

    pub fn remember_chat(&self, chat: &enums::Chat) {
        self.session.cache_peer(&PeerInfo::from(chat));
    }

    pub async fn stop(self) {
        self.handle.quit();
        self.pool_task.await.unwrap();
    }
}

pub fn user(id: i64, access_hash: i64, username: &str) -> enums::User {
    types::User {
        is_self: false,
        contact: false,
        mutual_contact: false,
        deleted: false,
        bot: false,
        verified: false,
        restricted: false,
        min: false,
        support: false,
        scam: false,
        premium: false,
        bot_chat_history: false,
        bot_nochats: false,
        bot_inline_geo: false,
        apply_min_photo: false,
        fake: false,
        bot_attach_menu: false,
        attach_menu_enabled: false,
        bot_can_edit: false,
        close_friend: false,
        stories_hidden: false,
        stories_unavailable: false,
        contact_require_premium: false,
        bot_business: false,
        id,
        access_hash: Some(access_hash),
        first_name: Some("Ada".into()),
        last_name: None,
        username: Some(username.into()),
        phone: None,
        photo: None,
        status: None,
        bot_info_version: None,
        restriction_reason: None,
        bot_inline_placeholder: None,
        lang_code: None,
        emoji_status: None,
        usernames: None,
        stories_max_id: None,
        color: None,
        profile_color: None,
    }
    .into()
}

pub fn megagroup(id: i64, access_hash: i64) -> enums::Chat {
    types::Channel {
        creator: true,
        left: false,
        broadcast: false,
        verified: false,
        megagroup: true,
        restricted: false,
        min: false,
        scam: false,
        gigagroup: false,
        forum: false,
        signatures: false,
        has_link: false,
        has_geo: false,
        slowmode_enabled: false,
        call_active: false,
        call_not_empty: false,
        fake: false,
        noforwards: false,
        join_to_send: false,
        join_request: false,
        stories_hidden: false,
        stories_hidden_min: false,
        stories_unavailable: false,
        id,
        access_hash: Some(access_hash),
        title: "Engines".into(),
        username: Some("engines".into()),
        photo: enums::ChatPhoto::Empty,
        date: 0,
        restriction_reason: None,
        admin_rights: None,
        banned_rights: None,
        default_banned_rights: None,
        participants_count: None,
        usernames: None,
        stories_max_id: None,
        color: None,
        profile_color: None,
        emoji_status: None,
        level: None,
    }
    .into()
}

pub fn text_message(id: i32, peer_id: enums::Peer, text: &str) -> enums::Message {
    types::Message {
        out: false,
        mentioned: false,
        media_unread: false,
        silent: false,
        post: false,
        from_scheduled: false,
        legacy: false,
        edit_hide: false,
        pinned: false,
        noforwards: false,
        invert_media: false,
        offline: false,
        id,
        from_id: None,
        from_boosts_applied: None,
        peer_id,
        saved_peer_id: None,
        fwd_from: None,
        via_bot_id: None,
        via_business_bot_id: None,
        reply_to: None,
        date: 1_700_000_000 + id,
        message: text.into(),
        media: None,
        reply_markup: None,
        entities: None,
        views: None,
        forwards: None,
        replies: None,
        edit_date: None,
        post_author: None,
        grouped_id: None,
        reactions: None,
        restriction_reason: None,
        ttl_period: None,
        quick_reply_shortcut_id: None,
    }
    .into()
}

/// A message sent by `user_id` in the chat `peer_id`.
pub fn message_from(id: i32, peer_id: enums::Peer, user_id: i64, text: &str) -> enums::Message {
    let enums::Message::Message(mut message) = text_message(id, peer_id, text) else {
        unreachable!()
    };
    message.from_id = Some(peer_user(user_id));
    message.into()
}

pub fn empty_message(id: i32, peer_id: Option<enums::Peer>) -> enums::Message {
    types::MessageEmpty { id, peer_id }.into()
}

pub fn peer_user(user_id: i64) -> enums::Peer {
    types::PeerUser { user_id }.into()
}

pub fn peer_channel(channel_id: i64) -> enums::Peer {
    types::PeerChannel { channel_id }.into()
}

pub fn updates(updates: Vec<enums::Update>, users: Vec<enums::User>, chats: Vec<enums::Chat>) -> enums::Updates {
    types::Updates {
        updates,
        users,
        chats,
        date: 0,
        seq: 0,
    }
    .into()
}

pub fn new_message(message: enums::Message) -> enums::Update {
    types::UpdateNewMessage {
        message,
        pts: 1,
        pts_count: 1,
    }
    .into()
}

pub fn new_channel_message(message: enums::Message) -> enums::Update {
    types::UpdateNewChannelMessage {
        message,
        pts: 1,
        pts_count: 1,
    }
    .into()
}

pub fn affected_messages(pts_count: i32) -> tl::enums::messages::AffectedMessages {
    tl::types::messages::AffectedMessages { pts: 10, pts_count }.into()
}
