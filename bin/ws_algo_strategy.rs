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

//! Example binary fetching CQG algo strategy definitions for a symbol.
//!
//! Credentials and endpoint are read from the `CQG_*` environment variables, see
//! `cqg-ws-accounts`.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin cqg-ws-algo-strategy -- EP "CQG ARRIVALPRICE" "CQG VWAP"
//! ```

use std::env;

use nautilus_cqg::{
    common::consts::CQG_ARRIVAL_PRICE_STRATEGY,
    websocket::CqgWebSocketClient,
    workflows::{KEY_ALGO_STRATEGY_NAMES, KEY_CONTRACT_SYMBOL, algo_strategy_lookup},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = env::args().skip(1);
    let symbol = args.next().unwrap_or_else(|| "EP".to_string());
    let mut strategies: Vec<String> = args.collect();
    if strategies.is_empty() {
        strategies.push(CQG_ARRIVAL_PRICE_STRATEGY.to_string());
    }

    tracing::info!("Looking up {strategies:?} for {symbol}");

    let client = CqgWebSocketClient::from_env();
    let context = client
        .execute(algo_strategy_lookup(&symbol, strategies))
        .await?;

    println!(
        "Contract: {}",
        context.get_text(KEY_CONTRACT_SYMBOL).unwrap_or_default()
    );
    for name in context.get_text_list(KEY_ALGO_STRATEGY_NAMES).unwrap_or_default() {
        println!("  {name}");
    }

    Ok(())
}
