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

//! Example binary listing the accounts available to a CQG WebAPI user.
//!
//! # Environment Variables
//!
//! - `CQG_USERNAME`: CQG user name (required)
//! - `CQG_PASSWORD`: CQG password (required)
//! - `CQG_WEBAPI_URL`: WebSocket URL override (optional)
//! - `CQG_VERIFY_TLS`: set to `false` to skip certificate verification (optional)
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin cqg-ws-accounts
//! ```

use nautilus_cqg::{
    websocket::CqgWebSocketClient,
    workflows::{KEY_ACCOUNT_IDS, account_discovery},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let client = CqgWebSocketClient::from_env();
    let cancel_client = client.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_client.cancel();
        }
    });

    let context = client.execute(account_discovery()).await?;

    let account_ids = context.get_text_list(KEY_ACCOUNT_IDS).unwrap_or_default();
    println!("Found {} accounts", account_ids.len());
    for account_id in account_ids {
        println!("  {account_id}");
    }

    Ok(())
}
