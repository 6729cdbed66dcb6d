// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use simple_logger::SimpleLogger;
use std::sync::{Arc, Mutex};
use tgkit_mtsender::{Connection, Connector, InvocationError, SenderPool};
use tgkit_tl_types::{Deserializable, Identifiable, Serializable, enums, functions, types};
use tokio::runtime;

#[derive(Default)]
struct Log {
    connects: Vec<i32>,
    bodies: Vec<Vec<u8>>,
}

#[derive(Clone, Default)]
struct ScriptedConnector(Arc<Mutex<Log>>);

struct ScriptedConnection(Arc<Mutex<Log>>);

impl Connector for ScriptedConnector {
    fn connect(&self, dc_id: i32) -> BoxFuture<'_, Result<Box<dyn Connection>, InvocationError>> {
        let log = Arc::clone(&self.0);
        async move {
            if !(1..=5).contains(&dc_id) {
                return Err(InvocationError::InvalidDc);
            }
            log.lock().unwrap().connects.push(dc_id);
            Ok(Box::new(ScriptedConnection(log)) as Box<dyn Connection>)
        }
        .boxed()
    }
}

impl Connection for ScriptedConnection {
    fn invoke(&self, body: Vec<u8>) -> BoxFuture<'_, Result<Vec<u8>, InvocationError>> {
        let id = u32::from_le_bytes([body[0], body[1], body[2], body[3]]);
        self.0.lock().unwrap().bodies.push(body);
        let response = match id {
            0xda9b0d0d => enums::NearestDc::Dc(types::NearestDc {
                country: "ES".into(),
                this_dc: 2,
                nearest_dc: 2,
            })
            .to_bytes(),
            functions::messages::ReadHistory::CONSTRUCTOR_ID => {
                enums::RpcError::Error(types::RpcError {
                    error_code: 400,
                    error_message: "PEER_ID_INVALID".into(),
                })
                .to_bytes()
            }
            _ => true.to_bytes(),
        };
        async move { Ok(response) }.boxed()
    }
}

fn runtime() -> runtime::Runtime {
    let _ = SimpleLogger::new()
        .with_level(log::LevelFilter::Debug)
        .init();

    runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn set_typing() -> Vec<u8> {
    functions::messages::SetTyping {
        peer: enums::InputPeer::PeerSelf,
        top_msg_id: None,
        action: enums::SendMessageAction::SendMessageTypingAction,
    }
    .to_bytes()
}

#[test]
fn connections_are_initialized_once() {
    let connector = ScriptedConnector::default();
    let log = Arc::clone(&connector.0);

    runtime().block_on(async {
        let SenderPool { runner, handle } = SenderPool::new(connector, 1);
        let pool_task = tokio::spawn(runner.run());

        for _ in 0..2 {
            let response = handle.invoke_in_dc(2, set_typing()).await.unwrap();
            assert!(bool::from_bytes(&response).unwrap());
        }

        handle.quit();
        pool_task.await.unwrap();
    });

    let log = log.lock().unwrap();
    assert_eq!(log.connects, vec![2]);
    assert_eq!(log.bodies.len(), 3);
    assert_eq!(
        &log.bodies[0][..4],
        functions::InvokeWithLayer::<functions::help::GetNearestDc>::CONSTRUCTOR_ID.to_le_bytes()
    );
    assert_eq!(log.bodies[1], set_typing());
}

#[test]
fn rpc_errors_reach_the_caller() {
    runtime().block_on(async {
        let SenderPool { runner, handle } = SenderPool::new(ScriptedConnector::default(), 1);
        let pool_task = tokio::spawn(runner.run());

        let request = functions::messages::ReadHistory {
            peer: enums::InputPeer::PeerSelf,
            max_id: 0,
        };
        match handle.invoke_in_dc(2, request.to_bytes()).await {
            Err(InvocationError::Rpc(err)) => {
                assert_eq!(err.name, "PEER_ID_INVALID");
                assert_eq!(
                    err.caused_by,
                    Some(functions::messages::ReadHistory::CONSTRUCTOR_ID)
                );
            }
            other => panic!("unexpected result: {other:?}"),
        }

        handle.quit();
        pool_task.await.unwrap();
    });
}

#[test]
fn unknown_dc_fails_without_stopping_the_pool() {
    let connector = ScriptedConnector::default();
    let log = Arc::clone(&connector.0);

    runtime().block_on(async {
        let SenderPool { runner, handle } = SenderPool::new(connector, 1);
        let pool_task = tokio::spawn(runner.run());

        assert!(matches!(
            handle.invoke_in_dc(99, set_typing()).await,
            Err(InvocationError::InvalidDc)
        ));
        assert!(handle.invoke_in_dc(4, set_typing()).await.is_ok());

        handle.quit();
        pool_task.await.unwrap();
    });

    assert_eq!(log.lock().unwrap().connects, vec![4]);
}

#[test]
fn disconnected_dcs_reconnect_on_demand() {
    let connector = ScriptedConnector::default();
    let log = Arc::clone(&connector.0);

    runtime().block_on(async {
        let SenderPool { runner, handle } = SenderPool::new(connector, 1);
        let pool_task = tokio::spawn(runner.run());

        handle.invoke_in_dc(2, set_typing()).await.unwrap();
        assert!(handle.disconnect_from_dc(2));
        handle.invoke_in_dc(2, set_typing()).await.unwrap();

        handle.quit();
        pool_task.await.unwrap();
    });

    assert_eq!(log.lock().unwrap().connects, vec![2, 2]);
}

#[test]
fn requests_after_quit_are_dropped() {
    runtime().block_on(async {
        let SenderPool { runner, handle } = SenderPool::new(ScriptedConnector::default(), 1);
        let pool_task = tokio::spawn(runner.run());

        handle.quit();
        pool_task.await.unwrap();

        assert!(matches!(
            handle.invoke_in_dc(2, set_typing()).await,
            Err(InvocationError::Dropped)
        ));
    });
}
