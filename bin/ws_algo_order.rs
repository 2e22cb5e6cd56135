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

//! Example binary placing a CQG arrival price algo order.
//!
//! Credentials and endpoint are read from the `CQG_*` environment variables, see
//! `cqg-ws-accounts`. Use a demo account: the order is live once acknowledged.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin cqg-ws-algo-order -- <ACCOUNT_ID> [SYMBOL] [BUY|SELL] [QTY]
//! ```

use std::env;

use anyhow::Context;
use nautilus_cqg::{
    common::enums::CqgOrderSide,
    websocket::CqgWebSocketClient,
    workflows::{
        AlgoOrderParams, KEY_CONTRACT_SYMBOL, KEY_ORDER_ID, KEY_ORDER_STATUS, algo_order_placement,
    },
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let usage = "usage: cqg-ws-algo-order <ACCOUNT_ID> [SYMBOL] [BUY|SELL] [QTY]";
    let mut args = env::args().skip(1);
    let account_id: i32 = args
        .next()
        .context(usage)?
        .parse()
        .context("account id must be an integer")?;
    let symbol = args.next().unwrap_or_else(|| "EP".to_string());
    let side = match args.next().as_deref().map(str::to_ascii_uppercase).as_deref() {
        None | Some("BUY") => CqgOrderSide::Buy,
        Some("SELL") => CqgOrderSide::Sell,
        Some(other) => anyhow::bail!("invalid side {other}, {usage}"),
    };
    let qty: i64 = match args.next() {
        Some(qty) => qty.parse().context("quantity must be an integer")?,
        None => 1,
    };

    let cl_order_id = chrono::Utc::now().timestamp_millis().to_string();
    let order = AlgoOrderParams::arrival_price(account_id, cl_order_id.clone(), side, qty);

    let client = CqgWebSocketClient::from_env();
    let cancel_client = client.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_client.cancel();
        }
    });

    tracing::info!("Placing {side} {qty} {symbol} as order {cl_order_id}");
    let context = client.execute(algo_order_placement(&symbol, order)).await?;

    println!(
        "Order {cl_order_id} on {}: id {} status {}",
        context.get_text(KEY_CONTRACT_SYMBOL).unwrap_or_default(),
        context.get_text(KEY_ORDER_ID).unwrap_or_default(),
        context.get_text(KEY_ORDER_STATUS).unwrap_or_default(),
    );

    Ok(())
}
