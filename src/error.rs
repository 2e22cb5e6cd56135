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

//! Error types for the CQG WebAPI client.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Result type alias for CQG WebAPI operations.
pub type WebApiResult<T> = Result<T, WebApiError>;

/// Error types for a CQG WebAPI workflow run.
///
/// Every variant is terminal for the run that produced it. Messages which cannot be routed are
/// not errors: they are dropped and counted by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebApiError {
    /// Local credential validation failed before any network I/O.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),
    /// A component was invoked out of order.
    #[error("Illegal state: {0}")]
    IllegalState(String),
    /// A correlation id was registered while a request with the same id was still pending.
    #[error("Duplicate correlation id: {0}")]
    DuplicateCorrelationId(u32),
    /// The server rejected the logon.
    #[error("Logon rejected {code}: {message}")]
    Rejected {
        /// The result code from the server.
        code: u32,
        /// The text message from the server.
        message: String,
    },
    /// The server reported a failure for a request the active step was waiting on.
    #[error("Step failed {code}: {message}")]
    StepFailed {
        /// The status code from the server.
        code: u32,
        /// The text message from the server.
        message: String,
    },
    /// The connection was closed, intentionally or by the peer.
    #[error("Connection closed")]
    ConnectionClosed,
    /// Transport-level error during WebSocket communication.
    #[error("Transport error: {0}")]
    Transport(String),
    /// Protobuf encoding or decoding error.
    #[error("Codec error: {0}")]
    Codec(String),
    /// The workflow did not finish within the configured time.
    #[error("Timeout: {0}")]
    Timeout(String),
}

impl WebApiError {
    /// Returns whether the error originates from the connection rather than the server's
    /// answer to a request, so a caller may decide to reconnect with a fresh session.
    #[must_use]
    pub const fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::ConnectionClosed | Self::Transport(_) | Self::Timeout(_)
        )
    }
}

impl From<tungstenite::Error> for WebApiError {
    fn from(error: tungstenite::Error) -> Self {
        match error {
            tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
                Self::ConnectionClosed
            }
            other => Self::Transport(other.to_string()),
        }
    }
}

impl From<prost::DecodeError> for WebApiError {
    fn from(error: prost::DecodeError) -> Self {
        Self::Codec(error.to_string())
    }
}

impl From<prost::EncodeError> for WebApiError {
    fn from(error: prost::EncodeError) -> Self {
        Self::Codec(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(WebApiError::ConnectionClosed, true)]
    #[case(WebApiError::Transport("reset".to_string()), true)]
    #[case(WebApiError::Timeout("60s".to_string()), true)]
    #[case(WebApiError::Rejected { code: 101, message: "bad".to_string() }, false)]
    #[case(WebApiError::StepFailed { code: 104, message: "bad".to_string() }, false)]
    #[case(WebApiError::InvalidCredentials("empty".to_string()), false)]
    #[case(WebApiError::DuplicateCorrelationId(1), false)]
    fn test_is_connection_error(#[case] error: WebApiError, #[case] expected: bool) {
        assert_eq!(error.is_connection_error(), expected);
    }

    #[rstest]
    fn test_display_surfaces_wire_code_and_message() {
        let error = WebApiError::Rejected {
            code: 5,
            message: "Invalid user name or password".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Logon rejected 5: Invalid user name or password"
        );
    }

    #[rstest]
    fn test_from_tungstenite_connection_closed() {
        let error: WebApiError = tungstenite::Error::ConnectionClosed.into();

        assert_eq!(error, WebApiError::ConnectionClosed);
    }
}
