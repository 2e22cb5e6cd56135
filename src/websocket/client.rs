// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2026 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! WebSocket client running CQG WebAPI workflows against a live endpoint.
//!
//! Each run opens its own connection and session: credentials are validated, the socket is
//! connected, a writer and a reader task are spawned around the split stream, and a
//! [`FeedHandler`] drives the workflow until it completes, fails or times out.

use futures_util::{SinkExt, StreamExt};
use tokio::{net::TcpStream, sync::mpsc, time::Instant};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async_tls_with_config, tungstenite::Message,
};
use tokio_util::sync::CancellationToken;

use super::{
    handler::{FeedHandler, RawEvent},
    tls::create_connector,
    transport::WsTransport,
};
use crate::{
    codec::ProtobufCodec,
    config::CqgWebApiConfig,
    engine::{Workflow, WorkflowContext, WorkflowEngine, WorkflowReport, WorkflowState},
    error::{WebApiError, WebApiResult},
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket client for the CQG WebAPI.
#[derive(Clone, Debug)]
pub struct CqgWebSocketClient {
    config: CqgWebApiConfig,
    cancel: CancellationToken,
}

impl CqgWebSocketClient {
    /// Creates a new [`CqgWebSocketClient`] instance.
    #[must_use]
    pub fn new(config: CqgWebApiConfig) -> Self {
        Self {
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Creates a client configured from the `CQG_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(CqgWebApiConfig::from_env())
    }

    #[must_use]
    pub const fn config(&self) -> &CqgWebApiConfig {
        &self.config
    }

    #[must_use]
    pub fn url(&self) -> String {
        self.config.ws_url()
    }

    /// Cancels every run in progress and any later run of this client.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Runs `workflow` over a new connection and returns how it ended.
    ///
    /// Failures before the session exists (invalid credentials, connect errors) are reported
    /// the same way as failures during the run, as [`WorkflowState::Failed`].
    pub async fn run_workflow(&self, workflow: Workflow) -> WorkflowReport {
        let deadline = Instant::now() + self.config.workflow_timeout();
        let name = workflow.name();

        let credentials = self.config.credentials();
        if let Err(e) = credentials.validate() {
            tracing::error!("Workflow `{name}` not started: {e}");
            return failed_report(&workflow, e);
        }

        if self.is_cancelled() {
            tracing::warn!("Workflow `{name}` not started: client cancelled");
            return failed_report(&workflow, WebApiError::ConnectionClosed);
        }

        let url = self.url();
        tracing::info!("Connecting to {url}");
        let stream = match self.connect(&url).await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::error!("Workflow `{name}` not started: {e}");
                return failed_report(&workflow, e);
            }
        };
        tracing::info!("Connected to {url}");

        let (mut write, mut read) = stream.split();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Message>();
        let (raw_tx, raw_rx) = mpsc::unbounded_channel::<RawEvent>();

        let writer = tokio::spawn(async move {
            while let Some(message) = out_rx.recv().await {
                let is_close = matches!(message, Message::Close(_));
                if let Err(e) = write.send(message).await {
                    tracing::debug!("Writer stopped: {e}");
                    return;
                }
                if is_close {
                    break;
                }
            }
            if let Err(e) = write.close().await {
                tracing::trace!("Error closing sink: {e}");
            }
        });

        let reader = tokio::spawn(async move {
            while let Some(result) = read.next().await {
                let event = result.map_err(WebApiError::from);
                let stop = event.is_err();
                if raw_tx.send(event).is_err() || stop {
                    break;
                }
            }
        });

        let engine = WorkflowEngine::new(
            workflow,
            credentials,
            ProtobufCodec,
            WsTransport::new(out_tx.clone()),
        );
        let handler = FeedHandler::new(engine, raw_rx, out_tx, self.cancel.child_token(), deadline);
        let report = handler.run().await;

        reader.abort();
        if tokio::time::timeout(self.config.connect_timeout(), writer)
            .await
            .is_err()
        {
            tracing::warn!("Timed out flushing the close frame");
        }

        match &report.state {
            WorkflowState::Completed => {
                tracing::info!("Workflow `{}` completed", report.workflow);
            }
            state => tracing::warn!("Workflow `{}` ended in state {state}", report.workflow),
        }
        if report.unroutable_count > 0 {
            tracing::warn!(
                "Workflow `{}` dropped {} unroutable messages",
                report.workflow,
                report.unroutable_count
            );
        }
        report
    }

    /// Runs `workflow` and returns its accumulated context.
    ///
    /// # Errors
    ///
    /// Returns the reason the run failed.
    pub async fn execute(&self, workflow: Workflow) -> WebApiResult<WorkflowContext> {
        self.run_workflow(workflow).await.into_result()
    }

    async fn connect(&self, url: &str) -> WebApiResult<WsStream> {
        let connector = create_connector(self.config.verify_tls)?;
        let timeout = self.config.connect_timeout();

        let (stream, response) = tokio::time::timeout(
            timeout,
            connect_async_tls_with_config(url, None, false, Some(connector)),
        )
        .await
        .map_err(|_| WebApiError::Timeout(format!("connecting to {url} after {timeout:?}")))??;

        tracing::debug!("Handshake response status {}", response.status());
        Ok(stream)
    }
}

fn failed_report(workflow: &Workflow, error: WebApiError) -> WorkflowReport {
    WorkflowReport {
        workflow: workflow.name().into(),
        state: WorkflowState::Failed(error),
        context: WorkflowContext::new(),
        unroutable_count: 0,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::workflows::account_discovery;

    #[rstest]
    #[tokio::test]
    async fn test_missing_credentials_fail_without_connecting() {
        let client = CqgWebSocketClient::new(CqgWebApiConfig {
            // Nothing listens here, a connection attempt would surface as a transport error
            base_url_ws: Some("ws://127.0.0.1:1".to_string()),
            ..Default::default()
        });

        let report = client.run_workflow(account_discovery()).await;

        assert_eq!(report.workflow.as_str(), "account_discovery");
        assert!(matches!(
            report.state,
            WorkflowState::Failed(WebApiError::InvalidCredentials(_))
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn test_unreachable_endpoint_fails_with_transport_error() {
        let client = CqgWebSocketClient::new(CqgWebApiConfig {
            base_url_ws: Some("ws://127.0.0.1:1".to_string()),
            user_name: Some("u1".to_string()),
            password: Some("p1".to_string()),
            ..Default::default()
        });

        let result = client.execute(account_discovery()).await;

        assert!(matches!(result, Err(WebApiError::Transport(_))));
    }

    #[rstest]
    #[tokio::test]
    async fn test_cancelled_client_does_not_connect() {
        let client = CqgWebSocketClient::new(CqgWebApiConfig {
            base_url_ws: Some("ws://127.0.0.1:1".to_string()),
            user_name: Some("u1".to_string()),
            password: Some("p1".to_string()),
            ..Default::default()
        });
        client.cancel();

        let report = client.run_workflow(account_discovery()).await;

        assert_eq!(
            report.state,
            WorkflowState::Failed(WebApiError::ConnectionClosed)
        );
    }

    #[rstest]
    fn test_cancel_is_shared_by_clones() {
        let client = CqgWebSocketClient::new(CqgWebApiConfig::default());
        let clone = client.clone();

        clone.cancel();

        assert!(client.is_cancelled());
    }
}
