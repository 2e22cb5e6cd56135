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

//! [`Transport`] implementation handing frames to the WebSocket writer task.

use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use crate::{
    engine::Transport,
    error::{WebApiError, WebApiResult},
};

/// Queues outbound frames for the writer task that owns the socket's sink half.
///
/// Sends never block: the engine runs synchronously inside the feed handler and the writer
/// drains the queue in order.
#[derive(Debug)]
pub struct WsTransport {
    tx: mpsc::UnboundedSender<Message>,
    closed: bool,
}

impl WsTransport {
    /// Creates a new [`WsTransport`] feeding `tx`.
    #[must_use]
    pub const fn new(tx: mpsc::UnboundedSender<Message>) -> Self {
        Self { tx, closed: false }
    }
}

impl Transport for WsTransport {
    fn send(&mut self, frame: Vec<u8>) -> WebApiResult<()> {
        if self.closed {
            return Err(WebApiError::ConnectionClosed);
        }
        self.tx
            .send(Message::Binary(frame.into()))
            .map_err(|_| WebApiError::ConnectionClosed)
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if self.tx.send(Message::Close(None)).is_err() {
            tracing::trace!("Writer already stopped");
        }
    }

    fn is_closed(&self) -> bool {
        self.closed || self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_send_queues_binary_frame() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut transport = WsTransport::new(tx);

        transport.send(vec![1, 2, 3]).unwrap();

        assert_eq!(rx.try_recv().unwrap(), Message::Binary(vec![1, 2, 3].into()));
    }

    #[rstest]
    fn test_close_queues_close_frame_once() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut transport = WsTransport::new(tx);

        transport.close();
        transport.close();

        assert!(transport.is_closed());
        assert_eq!(rx.try_recv().unwrap(), Message::Close(None));
        assert!(rx.try_recv().is_err());
    }

    #[rstest]
    fn test_send_after_close_fails() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut transport = WsTransport::new(tx);
        transport.close();

        assert_eq!(
            transport.send(vec![1]),
            Err(WebApiError::ConnectionClosed)
        );
    }

    #[rstest]
    fn test_dropped_writer_closes_transport() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut transport = WsTransport::new(tx);
        drop(rx);

        assert!(transport.is_closed());
        assert_eq!(
            transport.send(vec![1]),
            Err(WebApiError::ConnectionClosed)
        );
    }
}
