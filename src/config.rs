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

//! Configuration structures for the CQG WebAPI adapter.

use std::{fmt::Debug, time::Duration};

use serde::Deserialize;

use crate::common::{
    consts::{
        CQG_DEFAULT_CLIENT_APP_ID, CQG_DEFAULT_CLIENT_VERSION, CQG_PROTOCOL_VERSION_MAJOR,
        CQG_PROTOCOL_VERSION_MINOR, CQG_WEBAPI_DEMO_WS_URL, CQG_WEBAPI_WS_URL,
    },
    credential::{Credentials, ProtocolVersion},
};

/// Environment variable overriding the WebSocket URL.
pub const ENV_WEBAPI_URL: &str = "CQG_WEBAPI_URL";
/// Environment variable holding the user name.
pub const ENV_USERNAME: &str = "CQG_USERNAME";
/// Environment variable holding the password.
pub const ENV_PASSWORD: &str = "CQG_PASSWORD";
/// Environment variable disabling TLS certificate verification when `false` or `0`.
pub const ENV_VERIFY_TLS: &str = "CQG_VERIFY_TLS";

/// Configuration for the CQG WebAPI client.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct CqgWebApiConfig {
    /// Optional override for the WebSocket URL.
    pub base_url_ws: Option<String>,
    /// Use the demo environment (default: false).
    pub is_demo: bool,
    pub user_name: Option<String>,
    pub password: Option<String>,
    /// Client application id sent at logon.
    pub client_app_id: String,
    /// Client version sent at logon.
    pub client_version: String,
    pub protocol_version_major: u32,
    pub protocol_version_minor: u32,
    /// Verify the server certificate (default: true). Disable only for trusted private endpoints.
    pub verify_tls: bool,
    /// Timeout in seconds for the WebSocket handshake.
    pub connect_timeout_secs: u64,
    /// Timeout in seconds for a whole workflow run, from connect to completion.
    pub workflow_timeout_secs: u64,
}

impl Debug for CqgWebApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(CqgWebApiConfig))
            .field("base_url_ws", &self.base_url_ws)
            .field("is_demo", &self.is_demo)
            .field("user_name", &self.user_name)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("client_app_id", &self.client_app_id)
            .field("client_version", &self.client_version)
            .field("protocol_version_major", &self.protocol_version_major)
            .field("protocol_version_minor", &self.protocol_version_minor)
            .field("verify_tls", &self.verify_tls)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("workflow_timeout_secs", &self.workflow_timeout_secs)
            .finish()
    }
}

impl Default for CqgWebApiConfig {
    fn default() -> Self {
        Self {
            base_url_ws: None,
            is_demo: false,
            user_name: None,
            password: None,
            client_app_id: CQG_DEFAULT_CLIENT_APP_ID.to_string(),
            client_version: CQG_DEFAULT_CLIENT_VERSION.to_string(),
            protocol_version_major: CQG_PROTOCOL_VERSION_MAJOR,
            protocol_version_minor: CQG_PROTOCOL_VERSION_MINOR,
            verify_tls: true,
            connect_timeout_secs: 30,
            workflow_timeout_secs: 60,
        }
    }
}

impl CqgWebApiConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON; missing fields take their default.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a valid configuration object.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Creates a default configuration overridden by the `CQG_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(ENV_WEBAPI_URL) {
            config.base_url_ws = Some(url);
        }
        config.user_name = std::env::var(ENV_USERNAME).ok();
        config.password = std::env::var(ENV_PASSWORD).ok();
        if let Ok(value) = std::env::var(ENV_VERIFY_TLS) {
            config.verify_tls = parse_flag(&value).unwrap_or(config.verify_tls);
        }
        config
    }

    /// Returns `true` if both user name and password are available.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.user_name.is_some() && self.password.is_some()
    }

    /// Returns the WebSocket URL, considering overrides and environment.
    #[must_use]
    pub fn ws_url(&self) -> String {
        self.base_url_ws.clone().unwrap_or_else(|| {
            if self.is_demo {
                CQG_WEBAPI_DEMO_WS_URL.to_string()
            } else {
                CQG_WEBAPI_WS_URL.to_string()
            }
        })
    }

    /// Builds logon credentials; missing values become empty and fail validation at logon.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(
            self.user_name.clone().unwrap_or_default(),
            self.password.clone().unwrap_or_default(),
        )
        .with_client(self.client_app_id.clone(), self.client_version.clone())
        .with_protocol_version(ProtocolVersion::new(
            self.protocol_version_major,
            self.protocol_version_minor,
        ))
    }

    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    #[must_use]
    pub const fn workflow_timeout(&self) -> Duration {
        Duration::from_secs(self.workflow_timeout_secs)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
