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

//! Core constants for the CQG adapter.

/// Venue identifier string.
pub const CQG: &str = "CQG";

// Production URLs
pub const CQG_WEBAPI_WS_URL: &str = "wss://api.cqg.com:443";

// Demo URLs
pub const CQG_WEBAPI_DEMO_WS_URL: &str = "wss://demoapi.cqg.com:443";

// Logon defaults
pub const CQG_DEFAULT_CLIENT_APP_ID: &str = "WebApiTest";
pub const CQG_DEFAULT_CLIENT_VERSION: &str = "python-client-test-2-1";
pub const CQG_PROTOCOL_VERSION_MAJOR: u32 = 2;
pub const CQG_PROTOCOL_VERSION_MINOR: u32 = 90;

/// Status code the WebAPI uses for success on every result-bearing message.
pub const CQG_STATUS_SUCCESS: u32 = 0;

/// Algo strategy used by the algo order workflows.
pub const CQG_ARRIVAL_PRICE_STRATEGY: &str = "CQG ARRIVALPRICE";

// Extra order attributes understood by CQG algo strategies
pub const CQG_ALGO_COST_MODEL_ATTRIBUTE: &str = "ALGO_CQG_cost_model";
pub const CQG_ALGO_PERCENT_OF_VOLUME_ATTRIBUTE: &str = "ALGO_CQG_percent_of_volume";
