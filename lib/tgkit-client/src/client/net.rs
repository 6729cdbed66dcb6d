// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::ops::ControlFlow;
use std::sync::Arc;

use log::{debug, info};
use tgkit_mtsender::{InvocationError, SenderPool};
use tgkit_session::Session;
use tgkit_tl_types::{self as tl, Deserializable};
use tokio::time::sleep;

use super::retry_policy::RetryContext;
use super::{Client, ClientConfiguration, ClientInner};

/// Building a client and sending its requests.
impl Client {
    /// Wrap the handle of a [`SenderPool`], answering requests on the session's home DC.
    ///
    /// Peers seen in responses are cached in `session` so that later requests can refer to
    /// them. The pool's runner may be spawned afterwards, as nothing is sent until the first
    /// request.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use tgkit_client::{Client, SenderPool, sender::Connector};
    /// use tgkit_session::storages::MemorySession;
    ///
    /// // Placeholder. Real applications register their own at https://my.telegram.org.
    /// const API_ID: i32 = 932939;
    ///
    /// # fn f(connector: impl Connector + 'static) {
    /// let pool = SenderPool::new(connector, API_ID);
    /// let client = Client::new(&pool, Arc::new(MemorySession::default()));
    /// # }
    /// ```
    pub fn new(sender_pool: &SenderPool, session: Arc<dyn Session>) -> Self {
        Self::with_configuration(sender_pool, session, ClientConfiguration::default())
    }

    /// Like [`Self::new`], with a [`ClientConfiguration`] other than the default.
    pub fn with_configuration(
        sender_pool: &SenderPool,
        session: Arc<dyn Session>,
        configuration: ClientConfiguration,
    ) -> Self {
        Self(Arc::new(ClientInner {
            session,
            handle: sender_pool.handle.clone(),
            configuration,
        }))
    }

    /// Send a raw request to the home DC and decode its response.
    ///
    /// Failures go through the configured [`super::RetryPolicy`] before being returned.
    ///
    /// <div class="stab unstable">
    ///
    /// **Warning**: the raw [`tl`] types change with every layer, so code using this method
    /// may break on *minor* version changes.
    ///
    /// </div>
    ///
    /// # Examples
    ///
    /// ```
    /// # async fn f(client: tgkit_client::Client) -> Result<(), Box<dyn std::error::Error>> {
    /// use tgkit_tl_types as tl;
    ///
    /// let tl::enums::NearestDc::Dc(nearest) = client.invoke(&tl::functions::help::GetNearestDc {}).await?;
    /// println!("closest datacenter is {}", nearest.nearest_dc);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn invoke<R: tl::RemoteCall>(
        &self,
        request: &R,
    ) -> Result<R::Return, InvocationError> {
        self.invoke_in_dc(self.0.session.home_dc_id(), request).await
    }

    /// Like [`Self::invoke`], in a DC other than the home one.
    pub async fn invoke_in_dc<R: tl::RemoteCall>(
        &self,
        dc_id: i32,
        request: &R,
    ) -> Result<R::Return, InvocationError> {
        let body = self.invoke_body(dc_id, request.to_bytes()).await?;
        Ok(R::Return::from_bytes(&body)?)
    }

    /// Send an encoded request until it succeeds or the retry policy gives up.
    async fn invoke_body(&self, dc_id: i32, body: Vec<u8>) -> Result<Vec<u8>, InvocationError> {
        let policy = &self.0.configuration.retry_policy;
        let mut ctx = match self.0.handle.invoke_in_dc(dc_id, body.clone()).await {
            Ok(response) => return Ok(response),
            Err(error) => RetryContext::new(error),
        };

        loop {
            let delay = match policy.should_retry(&ctx) {
                ControlFlow::Continue(delay) => delay,
                ControlFlow::Break(()) => {
                    debug!("giving up after {} failures: {}", ctx.fail_count, ctx.error);
                    return Err(ctx.error);
                }
            };

            info!("sleeping on {} for {:?} before retrying", ctx.error, delay);
            sleep(delay).await;
            match self.0.handle.invoke_in_dc(dc_id, body.clone()).await {
                Ok(response) => return Ok(response),
                Err(error) => ctx.failed_again(delay, error),
            }
        }
    }
}
