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

//! Workflow definitions for the CQG WebAPI use cases.
//!
//! Each workflow is an ordered list of [`WorkflowStep`]s; the engine supplies logon, correlation
//! and transitions. Values the steps produce are stored in the
//! [`WorkflowContext`](crate::engine::WorkflowContext) under the `KEY_*` constants below.

pub mod accounts;
pub mod entitlements;
pub mod orders;
pub mod strategy;

pub use self::{
    accounts::account_discovery,
    entitlements::entitlement_lookup,
    orders::{AlgoOrderParams, algo_order_placement},
    strategy::algo_strategy_lookup,
};
use crate::{
    engine::{
        envelope::{InformationPayload, InformationRequestKind, RequestPayload},
        step::{ContextUpdate, ContextValue, StepOutcome, WorkflowContext, WorkflowStep},
    },
    error::{WebApiError, WebApiResult},
};

pub const KEY_CONTRACT_ID: &str = "contract_id";
pub const KEY_CONTRACT_SYMBOL: &str = "contract_symbol";
pub const KEY_ACCOUNT_IDS: &str = "account_ids";
pub const KEY_ACCOUNTS_REPORT: &str = "accounts_report";
pub const KEY_TRADE_SUBSCRIPTION_ID: &str = "trade_subscription_id";
pub const KEY_CL_ORDER_ID: &str = "cl_order_id";
pub const KEY_ORDER_ID: &str = "order_id";
pub const KEY_ORDER_STATUS: &str = "order_status";
pub const KEY_ALGO_STRATEGY_NAMES: &str = "algo_strategy_names";
pub const KEY_ALGO_STRATEGY_DEFINITIONS: &str = "algo_strategy_definitions";
pub const KEY_ORDER_ENTITLEMENTS: &str = "order_entitlements";
pub const KEY_ENTITLED_ALGO_STRATEGIES: &str = "entitled_algo_strategies";

/// Resolves `symbol` into contract metadata, storing [`KEY_CONTRACT_ID`] and
/// [`KEY_CONTRACT_SYMBOL`].
#[must_use]
pub fn resolve_symbol_step(symbol: &str) -> WorkflowStep {
    let symbol = symbol.to_string();
    WorkflowStep::new(
        "resolve_symbol",
        move |_| {
            Ok(vec![RequestPayload::Information(
                InformationRequestKind::SymbolResolution {
                    symbol: symbol.clone(),
                },
            )])
        },
        |response, _| match response.information() {
            Some(InformationPayload::SymbolResolution(report)) => {
                match &report.contract_metadata {
                    Some(metadata) => {
                        tracing::info!(
                            "Resolved {} to contract {}",
                            metadata.contract_symbol,
                            metadata.contract_id
                        );
                        StepOutcome::Accept(
                            ContextUpdate::new()
                                .with(
                                    KEY_CONTRACT_ID,
                                    ContextValue::Uint(u64::from(metadata.contract_id)),
                                )
                                .with(
                                    KEY_CONTRACT_SYMBOL,
                                    ContextValue::Text(metadata.contract_symbol.clone()),
                                ),
                        )
                    }
                    None => StepOutcome::Reject(
                        "symbol resolution without contract metadata".to_string(),
                    ),
                }
            }
            _ => StepOutcome::Continue,
        },
    )
}

/// Reads the contract id stored by [`resolve_symbol_step`].
pub(crate) fn contract_id(context: &WorkflowContext) -> WebApiResult<u32> {
    let value = context.require_uint(KEY_CONTRACT_ID)?;
    u32::try_from(value)
        .map_err(|_| WebApiError::IllegalState(format!("contract id {value} out of range")))
}
