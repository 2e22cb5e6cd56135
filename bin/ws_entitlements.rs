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

//! Example binary listing the order entitlements of an account for a symbol.
//!
//! Credentials and endpoint are read from the `CQG_*` environment variables, see
//! `cqg-ws-accounts`.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin cqg-ws-entitlements -- <ACCOUNT_ID> [SYMBOL]
//! ```

use std::env;

use anyhow::Context;
use nautilus_cqg::{
    websocket::CqgWebSocketClient,
    workflows::{KEY_CONTRACT_SYMBOL, KEY_ENTITLED_ALGO_STRATEGIES, entitlement_lookup},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = env::args().skip(1);
    let account_id: i32 = args
        .next()
        .context("usage: cqg-ws-entitlements <ACCOUNT_ID> [SYMBOL]")?
        .parse()
        .context("account id must be an integer")?;
    let symbol = args.next().unwrap_or_else(|| "EP".to_string());

    let client = CqgWebSocketClient::from_env();
    let context = client
        .execute(entitlement_lookup(&symbol, account_id))
        .await?;

    println!(
        "Account {account_id} on {}",
        context.get_text(KEY_CONTRACT_SYMBOL).unwrap_or_default()
    );
    for strategy in context
        .get_text_list(KEY_ENTITLED_ALGO_STRATEGIES)
        .unwrap_or_default()
    {
        println!("  {strategy}");
    }

    Ok(())
}
