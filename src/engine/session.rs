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

//! Authentication handshake state for one connection.

use strum::Display;

use crate::{
    common::credential::{Credentials, ProtocolVersion},
    engine::envelope::{ReportPayload, RequestEnvelope, ResponseEnvelope},
    error::{WebApiError, WebApiResult},
};

/// Authentication status of a [`Session`].
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq)]
pub enum AuthStatus {
    #[default]
    Unauthenticated,
    Authenticating,
    Authenticated,
    Rejected,
    Closed,
}

impl AuthStatus {
    /// Returns whether no further authentication transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Authenticated | Self::Rejected | Self::Closed)
    }
}

/// Result of consuming a logon result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    Ready,
    Rejected { code: u32, message: String },
}

/// Holds the one-time logon handshake of a connection.
///
/// Transitions are monotone: `Authenticated` and `Rejected` are only reachable from
/// `Authenticating`, and a retry requires a new session.
#[derive(Debug, Default)]
pub struct Session {
    status: AuthStatus,
    owner: Option<String>,
    protocol_version: Option<ProtocolVersion>,
    session_token: Option<String>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn status(&self) -> AuthStatus {
        self.status
    }

    /// Returns the masked user name of the session owner once logon has begun.
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Returns the protocol version announced by the server in its logon result.
    #[must_use]
    pub const fn protocol_version(&self) -> Option<ProtocolVersion> {
        self.protocol_version
    }

    #[must_use]
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    /// Returns whether requests other than logon may be sent.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status == AuthStatus::Authenticated
    }

    /// Builds the logon request and moves to `Authenticating`.
    ///
    /// # Errors
    ///
    /// Returns [`WebApiError::InvalidCredentials`] if the user name or password is empty, or
    /// [`WebApiError::IllegalState`] if logon has already begun.
    pub fn begin_logon(&mut self, credentials: &Credentials) -> WebApiResult<RequestEnvelope> {
        if self.status != AuthStatus::Unauthenticated {
            return Err(WebApiError::IllegalState(format!(
                "logon already begun, session is {}",
                self.status
            )));
        }
        credentials.validate()?;

        self.owner = Some(credentials.masked_user_name());
        self.status = AuthStatus::Authenticating;
        Ok(RequestEnvelope::logon(credentials.clone()))
    }

    /// Consumes a logon result.
    ///
    /// # Errors
    ///
    /// Returns [`WebApiError::IllegalState`] if the session is not `Authenticating` or the
    /// response is not a logon result.
    pub fn on_logon_result(&mut self, response: &ResponseEnvelope) -> WebApiResult<SessionOutcome> {
        if self.status != AuthStatus::Authenticating {
            return Err(WebApiError::IllegalState(format!(
                "logon result received while session is {}",
                self.status
            )));
        }

        let ReportPayload::LogonResult(result) = &response.payload else {
            return Err(WebApiError::IllegalState(format!(
                "expected logon result, was {}",
                response.kind()
            )));
        };

        if !response.is_success() {
            self.status = AuthStatus::Rejected;
            return Ok(SessionOutcome::Rejected {
                code: response.status_code,
                message: response.text_message.clone(),
            });
        }

        if let (Some(major), Some(minor)) =
            (result.protocol_version_major, result.protocol_version_minor)
        {
            self.protocol_version = Some(ProtocolVersion::new(major, minor));
        }
        if !result.session_token.is_empty() {
            self.session_token = Some(result.session_token.clone());
        }
        self.status = AuthStatus::Authenticated;
        Ok(SessionOutcome::Ready)
    }

    /// Marks the session closed. Idempotent.
    pub fn close(&mut self) {
        self.status = AuthStatus::Closed;
    }
}
