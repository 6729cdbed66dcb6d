// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::configuration::ConnectionParams;
use crate::{Connection, Connector, InvocationError, RpcError};
use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use log::{debug, info, warn};
use std::fmt;
use std::ops::ControlFlow;
use std::sync::Arc;
use tgkit_tl_types::{self as tl, Deserializable, Identifiable, Serializable};
use tokio::sync::{mpsc, oneshot};
use tokio::task::{AbortHandle, JoinSet};

type InvokeResponse = Vec<u8>;

enum Request {
    Invoke {
        dc_id: i32,
        body: Vec<u8>,
        tx: oneshot::Sender<Result<InvokeResponse, InvocationError>>,
    },
    Disconnect {
        dc_id: i32,
    },
    Quit,
}

struct Rpc {
    body: Vec<u8>,
    tx: oneshot::Sender<Result<InvokeResponse, InvocationError>>,
}

struct ConnectionInfo {
    dc_id: i32,
    rpc_tx: mpsc::UnboundedSender<Rpc>,
    abort_handle: AbortHandle,
}

/// Cheaply cloneable handle to interact with its [`SenderPoolRunner`].
#[derive(Clone)]
pub struct SenderPoolHandle(mpsc::UnboundedSender<Request>);

/// Named type holding the actual runner and initial handle. The entry point.
pub struct SenderPool {
    /// The single mutable instance responsible for driving I/O.
    ///
    /// Connections are created on-demand, so any errors while the pool
    /// is running can only be retrieved with one of the [`SenderPool::handle`]s.
    pub runner: SenderPoolRunner,
    /// Starting handle attached to the [`SenderPool::runner`].
    ///
    /// This is the only way to interact with the runner once it's running.
    pub handle: SenderPoolHandle,
}

/// Manages and runs a pool of zero or more [`Connection`]s, one per datacenter.
///
/// Use [`SenderPool::new`] to create an instance of this type and associated channels.
pub struct SenderPoolRunner {
    connector: Arc<dyn Connector>,
    /// Developer's [Application Identifier](https://core.telegram.org/myapp).
    ///
    /// This parameter is required to initialize new connections.
    pub api_id: i32,
    /// Remaining connection parameters used by [`tl::functions::InitConnection`].
    pub connection_params: ConnectionParams,
    request_rx: mpsc::UnboundedReceiver<Request>,
    connections: Vec<ConnectionInfo>,
    connection_pool: JoinSet<()>,
}

impl SenderPoolHandle {
    /// Communicate with the running [`SenderPoolRunner`] instance
    /// to invoke the serialized request body in the specified datacenter.
    pub async fn invoke_in_dc(
        &self,
        dc_id: i32,
        body: Vec<u8>,
    ) -> Result<InvokeResponse, InvocationError> {
        let (tx, rx) = oneshot::channel();
        self.0
            .send(Request::Invoke { dc_id, body, tx })
            .map_err(|_| InvocationError::Dropped)?;
        rx.await.map_err(|_| InvocationError::Dropped)?
    }

    /// Communicate with the running [`SenderPoolRunner`] instance
    /// to drop any active connection to the given datacenter.
    ///
    /// Has no effect if there was no connection to the datacenter.
    pub fn disconnect_from_dc(&self, dc_id: i32) -> bool {
        self.0.send(Request::Disconnect { dc_id }).is_ok()
    }

    /// Communicate with the running [`SenderPoolRunner`] instance
    /// to drop all active connections and gracefully stop running.
    pub fn quit(&self) -> bool {
        self.0.send(Request::Quit).is_ok()
    }
}

impl SenderPool {
    /// Creates a new sender pool with default connection parameters, which will use
    /// the given connector and [Application Identifier](https://core.telegram.org/myapp)
    /// belonging to the developer.
    pub fn new<C: Connector + 'static>(connector: C, api_id: i32) -> Self {
        Self::with_configuration(connector, api_id, Default::default())
    }

    /// Creates a new sender pool with non-[`ConnectionParams::default`] configuration.
    pub fn with_configuration<C: Connector + 'static>(
        connector: C,
        api_id: i32,
        connection_params: ConnectionParams,
    ) -> Self {
        let (request_tx, request_rx) = mpsc::unbounded_channel();

        Self {
            runner: SenderPoolRunner {
                connector: Arc::new(connector),
                api_id,
                connection_params,
                request_rx,
                connections: Vec::new(),
                connection_pool: JoinSet::new(),
            },
            handle: SenderPoolHandle(request_tx),
        }
    }
}

impl SenderPoolRunner {
    /// Run the sender pool until [`SenderPoolHandle::quit`] is called, every handle
    /// is dropped, or the returned future is dropped.
    ///
    /// Connections will be initiated on-demand whenever the first request to a datacenter is made.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                biased;
                Some(_) = self.connection_pool.join_next(), if !self.connection_pool.is_empty() => {
                    self.connections
                        .retain(|connection| !connection.abort_handle.is_finished());
                }
                request = self.request_rx.recv() => {
                    let flow = match request {
                        Some(request) => self.process_request(request).await,
                        None => ControlFlow::Break(()),
                    };
                    if flow.is_break() {
                        break;
                    }
                }
            }
        }

        // Dropping the channels stops every `run_connection` loop once in-flight requests finish.
        self.connections.clear();
        while self.connection_pool.join_next().await.is_some() {}
    }

    async fn process_request(&mut self, request: Request) -> ControlFlow<()> {
        match request {
            Request::Invoke { dc_id, body, tx } => {
                let position = self
                    .connections
                    .iter()
                    .position(|connection| connection.dc_id == dc_id);

                let index = match position {
                    Some(index) => index,
                    None => match self.connect(dc_id).await {
                        Ok(connection) => {
                            let (rpc_tx, rpc_rx) = mpsc::unbounded_channel();
                            let abort_handle = self
                                .connection_pool
                                .spawn(run_connection(connection, rpc_rx));
                            self.connections.push(ConnectionInfo {
                                dc_id,
                                rpc_tx,
                                abort_handle,
                            });
                            self.connections.len() - 1
                        }
                        Err(e) => {
                            warn!("failed to connect to dc {dc_id}: {e}");
                            let _ = tx.send(Err(e));
                            return ControlFlow::Continue(());
                        }
                    },
                };

                if let Err(mpsc::error::SendError(rpc)) =
                    self.connections[index].rpc_tx.send(Rpc { body, tx })
                {
                    let _ = rpc.tx.send(Err(InvocationError::Dropped));
                }
                ControlFlow::Continue(())
            }
            Request::Disconnect { dc_id } => {
                self.connections.retain(|connection| {
                    if connection.dc_id == dc_id {
                        info!("disconnecting from dc {dc_id}");
                        connection.abort_handle.abort();
                        false
                    } else {
                        true
                    }
                });
                ControlFlow::Continue(())
            }
            Request::Quit => ControlFlow::Break(()),
        }
    }

    /// Establishes a connection and initializes it with the layer and parameters in use.
    async fn connect(&self, dc_id: i32) -> Result<Arc<dyn Connection>, InvocationError> {
        let connection: Arc<dyn Connection> = Arc::from(self.connector.connect(dc_id).await?);

        let init_connection = tl::functions::InvokeWithLayer {
            layer: tl::LAYER,
            query: tl::functions::InitConnection {
                api_id: self.api_id,
                device_model: self.connection_params.device_model.clone(),
                system_version: self.connection_params.system_version.clone(),
                app_version: self.connection_params.app_version.clone(),
                system_lang_code: self.connection_params.system_lang_code.clone(),
                lang_pack: self.connection_params.lang_pack.clone(),
                lang_code: self.connection_params.lang_code.clone(),
                proxy: None,
                params: None,
                query: tl::functions::help::GetNearestDc {},
            },
        };

        let body = invoke_raw(connection.as_ref(), init_connection.to_bytes()).await?;
        let tl::enums::NearestDc::Dc(nearest) = tl::enums::NearestDc::from_bytes(&body)?;
        info!(
            "connected to dc {dc_id} using layer {} (nearest dc: {}, country: {})",
            tl::LAYER,
            nearest.nearest_dc,
            nearest.country
        );

        Ok(connection)
    }
}

/// Invokes the body over the connection, turning `rpc_error` results into errors.
async fn invoke_raw(
    connection: &dyn Connection,
    body: Vec<u8>,
) -> Result<InvokeResponse, InvocationError> {
    let request_id = constructor_of(&body);
    let response = connection.invoke(body).await?;

    if constructor_of(&response) == Some(tl::types::RpcError::CONSTRUCTOR_ID) {
        let tl::enums::RpcError::Error(error) = tl::enums::RpcError::from_bytes(&response)?;
        let mut error = RpcError::from(error);
        if let Some(request_id) = request_id {
            error = error.with_caused_by(request_id);
        }
        debug!("request failed: {error}");
        return Err(InvocationError::Rpc(error));
    }

    Ok(response)
}

fn constructor_of(body: &[u8]) -> Option<u32> {
    body.get(..4)
        .and_then(|id| id.try_into().ok())
        .map(u32::from_le_bytes)
}

async fn run_connection(connection: Arc<dyn Connection>, mut rpc_rx: mpsc::UnboundedReceiver<Rpc>) {
    let mut in_flight = FuturesUnordered::new();

    loop {
        tokio::select! {
            Some(()) = in_flight.next(), if !in_flight.is_empty() => {}
            rpc = rpc_rx.recv() => match rpc {
                Some(Rpc { body, tx }) => {
                    let connection = Arc::clone(&connection);
                    in_flight.push(async move {
                        let result = invoke_raw(connection.as_ref(), body).await;
                        if tx.send(result).is_err() {
                            debug!("response arrived after its request was dropped");
                        }
                    });
                }
                None => break,
            },
        }
    }

    while in_flight.next().await.is_some() {}
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invoke { dc_id, body, tx } => f
                .debug_struct("Invoke")
                .field("dc_id", dc_id)
                .field(
                    "request",
                    &constructor_of(body)
                        .map(tl::name_for_id)
                        .unwrap_or("?"),
                )
                .field("tx", tx)
                .finish(),
            Self::Disconnect { dc_id } => {
                f.debug_struct("Disconnect").field("dc_id", dc_id).finish()
            }
            Self::Quit => write!(f, "Quit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;
    use futures_util::future::BoxFuture;
    use std::sync::Mutex;

    struct Echo;

    impl Connection for Echo {
        fn invoke(&self, body: Vec<u8>) -> BoxFuture<'_, Result<Vec<u8>, InvocationError>> {
            async move { Ok(body) }.boxed()
        }
    }

    struct Failing(Mutex<Option<tl::types::RpcError>>);

    impl Connection for Failing {
        fn invoke(&self, _body: Vec<u8>) -> BoxFuture<'_, Result<Vec<u8>, InvocationError>> {
            let error = self.0.lock().unwrap().clone();
            async move {
                Ok(error
                    .map(|e| tl::enums::RpcError::Error(e).to_bytes())
                    .unwrap_or_default())
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn plain_results_pass_through() {
        let response = invoke_raw(&Echo, vec![1, 2, 3, 4, 5]).await.unwrap();
        assert_eq!(response, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn rpc_errors_are_decoded() {
        let connection = Failing(Mutex::new(Some(tl::types::RpcError {
            error_code: 400,
            error_message: "CHANNEL_PRIVATE".into(),
        })));
        let request = tl::functions::channels::GetParticipant {
            channel: tl::enums::InputChannel::Empty,
            participant: tl::enums::InputPeer::PeerSelf,
        };

        match invoke_raw(&connection, request.to_bytes()).await {
            Err(InvocationError::Rpc(err)) => {
                assert_eq!(err.code, 400);
                assert_eq!(err.name, "CHANNEL_PRIVATE");
                assert_eq!(
                    err.caused_by,
                    Some(tl::functions::channels::GetParticipant::CONSTRUCTOR_ID)
                );
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn constructor_needs_four_bytes() {
        assert_eq!(constructor_of(&[1, 2, 3]), None);
        assert_eq!(constructor_of(&[0x19, 0xca, 0x44, 0x21, 0xff]), Some(0x2144ca19));
    }
}
