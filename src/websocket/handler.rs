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

//! Feed handler driving a [`WorkflowEngine`] from WebSocket events.
//!
//! The handler owns the engine and feeds it one event at a time: inbound messages from the
//! reader task, the run deadline and caller cancellation. Engine errors are already recorded in
//! its state, so the loop only watches for a terminal state.

use tokio::{sync::mpsc, time::Instant};
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use super::transport::WsTransport;
use crate::{
    codec::Codec,
    engine::{WorkflowEngine, WorkflowReport},
    error::{WebApiError, WebApiResult},
};

/// Inbound event forwarded by the reader task.
pub type RawEvent = WebApiResult<Message>;

/// Runs one workflow over an established connection.
#[derive(Debug)]
pub struct FeedHandler<C> {
    engine: WorkflowEngine<C, WsTransport>,
    raw_rx: mpsc::UnboundedReceiver<RawEvent>,
    out_tx: mpsc::UnboundedSender<Message>,
    cancel: CancellationToken,
    deadline: Instant,
}

impl<C> FeedHandler<C>
where
    C: Codec,
{
    /// Creates a new [`FeedHandler`].
    ///
    /// `out_tx` feeds the same writer task as the engine's transport and carries WebSocket pongs.
    #[must_use]
    pub const fn new(
        engine: WorkflowEngine<C, WsTransport>,
        raw_rx: mpsc::UnboundedReceiver<RawEvent>,
        out_tx: mpsc::UnboundedSender<Message>,
        cancel: CancellationToken,
        deadline: Instant,
    ) -> Self {
        Self {
            engine,
            raw_rx,
            out_tx,
            cancel,
            deadline,
        }
    }

    /// Starts the workflow and processes events until it reaches a terminal state.
    pub async fn run(mut self) -> WorkflowReport {
        if self.engine.start().is_err() {
            return self.engine.into_report();
        }

        let deadline = tokio::time::sleep_until(self.deadline);
        tokio::pin!(deadline);

        while !self.engine.is_terminal() {
            tokio::select! {
                event = self.raw_rx.recv() => self.handle_event(event),
                () = self.cancel.cancelled() => {
                    let _ = self.engine.cancel();
                }
                () = &mut deadline => {
                    let _ = self.engine.on_timeout();
                }
            }
        }

        tracing::debug!(
            "Workflow `{}` finished in state {}",
            self.engine.name(),
            self.engine.state()
        );
        self.engine.into_report()
    }

    fn handle_event(&mut self, event: Option<RawEvent>) {
        match event {
            Some(Ok(Message::Binary(data))) => {
                let _ = self.engine.on_frame(&data);
            }
            Some(Ok(Message::Ping(data))) => {
                if self.out_tx.send(Message::Pong(data)).is_err() {
                    tracing::debug!("Writer stopped, pong not sent");
                }
            }
            Some(Ok(Message::Close(frame))) => {
                tracing::debug!("Received close frame: {frame:?}");
                let _ = self.engine.on_transport_closed();
            }
            Some(Ok(Message::Text(text))) => {
                tracing::warn!("Ignoring text frame of {} bytes", text.len());
            }
            Some(Ok(_)) => {}
            Some(Err(WebApiError::ConnectionClosed)) | None => {
                let _ = self.engine.on_transport_closed();
            }
            Some(Err(WebApiError::Transport(cause))) => {
                let _ = self.engine.on_transport_error(cause);
            }
            Some(Err(e)) => {
                let _ = self.engine.on_transport_error(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rstest::rstest;

    use super::*;
    use crate::{
        codec::{ProtobufCodec, proto::ClientMsg},
        common::{
            credential::Credentials,
            testing::{decode_client_msg, encode_server_msg, logon_result_msg},
        },
        engine::{Workflow, WorkflowState},
        workflows::account_discovery,
    };

    struct Harness {
        raw_tx: mpsc::UnboundedSender<RawEvent>,
        out_rx: mpsc::UnboundedReceiver<Message>,
        cancel: CancellationToken,
        handler: FeedHandler<ProtobufCodec>,
    }

    fn harness(workflow: Workflow, timeout: Duration) -> Harness {
        let (raw_tx, raw_rx) = mpsc::unbounded_channel();
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let engine = WorkflowEngine::new(
            workflow,
            Credentials::new("u1", "p1"),
            ProtobufCodec,
            WsTransport::new(out_tx.clone()),
        );
        let cancel = CancellationToken::new();
        let handler = FeedHandler::new(
            engine,
            raw_rx,
            out_tx,
            cancel.clone(),
            Instant::now() + timeout,
        );
        Harness {
            raw_tx,
            out_rx,
            cancel,
            handler,
        }
    }

    fn binary(msg: &crate::codec::proto::ServerMsg) -> RawEvent {
        Ok(Message::Binary(encode_server_msg(msg).into()))
    }

    fn sent_client_msgs(out_rx: &mut mpsc::UnboundedReceiver<Message>) -> Vec<ClientMsg> {
        let mut msgs = Vec::new();
        while let Ok(message) = out_rx.try_recv() {
            if let Message::Binary(data) = message {
                msgs.push(decode_client_msg(&data));
            }
        }
        msgs
    }

    #[rstest]
    #[tokio::test]
    async fn test_logon_rejection_fails_run() {
        let mut harness = harness(account_discovery(), Duration::from_secs(5));
        harness
            .raw_tx
            .send(binary(&logon_result_msg(101, "bad password")))
            .unwrap();

        let report = harness.handler.run().await;

        assert_eq!(
            report.state,
            WorkflowState::Failed(WebApiError::Rejected {
                code: 101,
                message: "bad password".to_string(),
            })
        );
        let sent = sent_client_msgs(&mut harness.out_rx);
        assert_eq!(sent.len(), 1);
        assert!(sent[0].logon.is_some());
    }

    #[rstest]
    #[tokio::test]
    async fn test_server_close_fails_run() {
        let harness = harness(account_discovery(), Duration::from_secs(5));
        harness.raw_tx.send(Ok(Message::Close(None))).unwrap();

        let report = harness.handler.run().await;

        assert_eq!(
            report.state,
            WorkflowState::Failed(WebApiError::ConnectionClosed)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn test_reader_error_fails_run() {
        let harness = harness(account_discovery(), Duration::from_secs(5));
        harness
            .raw_tx
            .send(Err(WebApiError::Transport("reset".to_string())))
            .unwrap();

        let report = harness.handler.run().await;

        assert_eq!(
            report.state,
            WorkflowState::Failed(WebApiError::Transport("reset".to_string()))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn test_websocket_ping_answered_with_pong() {
        let mut harness = harness(account_discovery(), Duration::from_secs(5));
        harness
            .raw_tx
            .send(Ok(Message::Ping(vec![7].into())))
            .unwrap();
        harness.raw_tx.send(Ok(Message::Close(None))).unwrap();

        let _ = harness.handler.run().await;

        let mut pongs = 0;
        while let Ok(message) = harness.out_rx.try_recv() {
            if message == Message::Pong(vec![7].into()) {
                pongs += 1;
            }
        }
        assert_eq!(pongs, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn test_deadline_times_out_run() {
        let harness = harness(account_discovery(), Duration::from_millis(20));

        let report = harness.handler.run().await;

        assert!(matches!(
            report.state,
            WorkflowState::Failed(WebApiError::Timeout(_))
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn test_cancel_closes_run() {
        let harness = harness(account_discovery(), Duration::from_secs(5));
        harness.cancel.cancel();

        let report = harness.handler.run().await;

        assert_eq!(
            report.state,
            WorkflowState::Failed(WebApiError::ConnectionClosed)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn test_invalid_credentials_fail_before_sending() {
        let (_raw_tx, raw_rx) = mpsc::unbounded_channel();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel();
        let engine = WorkflowEngine::new(
            account_discovery(),
            Credentials::new("", ""),
            ProtobufCodec,
            WsTransport::new(out_tx.clone()),
        );
        let handler = FeedHandler::new(
            engine,
            raw_rx,
            out_tx,
            CancellationToken::new(),
            Instant::now(),
        );

        let report = handler.run().await;

        assert!(matches!(
            report.state,
            WorkflowState::Failed(WebApiError::InvalidCredentials(_))
        ));
        assert!(sent_client_msgs(&mut out_rx).is_empty());
    }
}
