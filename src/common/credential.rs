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

//! CQG WebAPI logon credentials.

use core::fmt::Debug;

use zeroize::ZeroizeOnDrop;

use super::consts::{
    CQG_DEFAULT_CLIENT_APP_ID, CQG_DEFAULT_CLIENT_VERSION, CQG_PROTOCOL_VERSION_MAJOR,
    CQG_PROTOCOL_VERSION_MINOR,
};
use crate::error::{WebApiError, WebApiResult};

/// WebAPI protocol version announced at logon and echoed back by the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProtocolVersion {
    pub major: u32,
    pub minor: u32,
}

impl ProtocolVersion {
    /// Creates a new [`ProtocolVersion`] instance.
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::new(CQG_PROTOCOL_VERSION_MAJOR, CQG_PROTOCOL_VERSION_MINOR)
    }
}

impl std::fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Logon credentials for a single WebAPI session.
///
/// Immutable once a session starts. The password is wiped from memory on drop and is never
/// rendered by the `Debug` implementation.
#[derive(Clone, ZeroizeOnDrop)]
pub struct Credentials {
    user_name: Box<str>,
    password: Box<str>,
    client_app_id: Box<str>,
    client_version: Box<str>,
    #[zeroize(skip)]
    protocol_version: ProtocolVersion,
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(Credentials))
            .field("user_name", &self.masked_user_name())
            .field("password", &"<redacted>")
            .field("client_app_id", &self.client_app_id)
            .field("client_version", &self.client_version)
            .field("protocol_version", &self.protocol_version)
            .finish()
    }
}

impl Credentials {
    /// Creates new [`Credentials`] with the default client identification and protocol version.
    #[must_use]
    pub fn new(user_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into().into_boxed_str(),
            password: password.into().into_boxed_str(),
            client_app_id: CQG_DEFAULT_CLIENT_APP_ID.into(),
            client_version: CQG_DEFAULT_CLIENT_VERSION.into(),
            protocol_version: ProtocolVersion::default(),
        }
    }

    /// Overrides the client application id and version sent at logon.
    #[must_use]
    pub fn with_client(
        mut self,
        client_app_id: impl Into<String>,
        client_version: impl Into<String>,
    ) -> Self {
        self.client_app_id = client_app_id.into().into_boxed_str();
        self.client_version = client_version.into().into_boxed_str();
        self
    }

    /// Overrides the protocol version sent at logon.
    #[must_use]
    pub fn with_protocol_version(mut self, protocol_version: ProtocolVersion) -> Self {
        self.protocol_version = protocol_version;
        self
    }

    /// Returns the user name (the session owner identity).
    #[must_use]
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Returns the password.
    ///
    /// # Safety
    ///
    /// The password should be handled carefully and never logged or exposed.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    #[must_use]
    pub fn client_app_id(&self) -> &str {
        &self.client_app_id
    }

    #[must_use]
    pub fn client_version(&self) -> &str {
        &self.client_version
    }

    #[must_use]
    pub fn protocol_version(&self) -> ProtocolVersion {
        self.protocol_version
    }

    /// Returns a masked version of the user name for logging purposes.
    ///
    /// Shows the first 2 characters followed by asterisks. Names of 2 characters or fewer
    /// are fully masked.
    #[must_use]
    pub fn masked_user_name(&self) -> String {
        let name = self.user_name.as_ref();
        let len = name.chars().count();

        if len <= 2 {
            "*".repeat(len)
        } else {
            let prefix: String = name.chars().take(2).collect();
            format!("{prefix}{}", "*".repeat(len - 2))
        }
    }

    /// Validates the credentials locally, before any network I/O.
    ///
    /// # Errors
    ///
    /// Returns [`WebApiError::InvalidCredentials`] if the user name or password is empty.
    pub fn validate(&self) -> WebApiResult<()> {
        if self.user_name.trim().is_empty() {
            return Err(WebApiError::InvalidCredentials(
                "user name must not be empty".to_string(),
            ));
        }
        if self.password.is_empty() {
            return Err(WebApiError::InvalidCredentials(
                "password must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const USER_NAME: &str = "trader01";
    const PASSWORD: &str = "hunter2-secret";

    #[rstest]
    fn test_credentials_defaults() {
        let credentials = Credentials::new(USER_NAME, PASSWORD);

        assert_eq!(credentials.user_name(), USER_NAME);
        assert_eq!(credentials.password(), PASSWORD);
        assert_eq!(credentials.client_app_id(), "WebApiTest");
        assert_eq!(credentials.client_version(), "python-client-test-2-1");
        assert_eq!(credentials.protocol_version(), ProtocolVersion::new(2, 90));
    }

    #[rstest]
    fn test_with_client_overrides() {
        let credentials = Credentials::new(USER_NAME, PASSWORD)
            .with_client("NautilusTrader", "1.0")
            .with_protocol_version(ProtocolVersion::new(2, 100));

        assert_eq!(credentials.client_app_id(), "NautilusTrader");
        assert_eq!(credentials.client_version(), "1.0");
        assert_eq!(credentials.protocol_version().to_string(), "2.100");
    }

    #[rstest]
    #[case("", PASSWORD)]
    #[case("   ", PASSWORD)]
    #[case(USER_NAME, "")]
    fn test_validate_rejects_empty_fields(#[case] user_name: &str, #[case] password: &str) {
        let result = Credentials::new(user_name, password).validate();

        assert!(matches!(result, Err(WebApiError::InvalidCredentials(_))));
    }

    #[rstest]
    fn test_validate_accepts_populated_fields() {
        assert!(Credentials::new(USER_NAME, PASSWORD).validate().is_ok());
    }

    #[rstest]
    #[case("trader01", "tr******")]
    #[case("ab", "**")]
    #[case("", "")]
    fn test_masked_user_name(#[case] user_name: &str, #[case] expected: &str) {
        let credentials = Credentials::new(user_name, PASSWORD);

        assert_eq!(credentials.masked_user_name(), expected);
    }

    #[rstest]
    fn test_debug_does_not_leak_secret() {
        let credentials = Credentials::new(USER_NAME, PASSWORD);
        let debug_string = format!("{credentials:?}");

        assert!(!debug_string.contains(PASSWORD));
        assert!(!debug_string.contains(USER_NAME));
        assert!(debug_string.contains("<redacted>"));
    }
}
