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

//! Order entitlement lookup: resolves a symbol, then fetches the order types, durations and algo
//! strategies an account may use for that contract.

use super::{
    KEY_ENTITLED_ALGO_STRATEGIES, KEY_ORDER_ENTITLEMENTS, contract_id, resolve_symbol_step,
};
use crate::{
    codec::proto::OrderEntitlementReport,
    engine::{
        envelope::{InformationPayload, InformationRequestKind, ReportPayload, RequestPayload},
        step::{ContextUpdate, ContextValue, StepOutcome, Workflow, WorkflowStep},
    },
};

/// Builds the entitlement lookup workflow for `symbol` and `account_id`.
///
/// Stores the report under [`KEY_ORDER_ENTITLEMENTS`] and the distinct entitled algo strategy
/// names under [`KEY_ENTITLED_ALGO_STRATEGIES`].
#[must_use]
pub fn entitlement_lookup(symbol: &str, account_id: i32) -> Workflow {
    Workflow::new(
        "entitlement_lookup",
        vec![
            resolve_symbol_step(symbol),
            order_entitlements_step(account_id),
        ],
    )
}

fn order_entitlements_step(account_id: i32) -> WorkflowStep {
    WorkflowStep::new(
        "order_entitlements",
        move |context| {
            Ok(vec![RequestPayload::Information(
                InformationRequestKind::OrderEntitlements {
                    contract_id: contract_id(context)?,
                    account_id,
                },
            )])
        },
        |response, _| match response.information() {
            Some(InformationPayload::OrderEntitlements(report)) => {
                let strategies = entitled_algo_strategies(report);
                tracing::info!(
                    "Received {} order entitlements, algo strategies {strategies:?}",
                    report.order_entitlements.len()
                );
                StepOutcome::Accept(
                    ContextUpdate::new()
                        .with(
                            KEY_ENTITLED_ALGO_STRATEGIES,
                            ContextValue::TextList(strategies),
                        )
                        .with(
                            KEY_ORDER_ENTITLEMENTS,
                            ContextValue::Report(Box::new(ReportPayload::Information(
                                InformationPayload::OrderEntitlements(report.clone()),
                            ))),
                        ),
                )
            }
            _ => StepOutcome::Continue,
        },
    )
}

/// Returns the distinct algo strategy names of the entitlements, in report order.
#[must_use]
pub fn entitled_algo_strategies(report: &OrderEntitlementReport) -> Vec<String> {
    let mut strategies: Vec<String> = Vec::new();
    for entitlement in &report.order_entitlements {
        let name = &entitlement.algo_strategy;
        if !name.is_empty() && !strategies.contains(name) {
            strategies.push(name.clone());
        }
    }
    strategies
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{
        codec::proto::OrderEntitlement,
        engine::step::WorkflowContext,
        error::WebApiError,
        workflows::KEY_CONTRACT_ID,
    };

    #[rstest]
    fn test_entitled_algo_strategies_are_distinct() {
        let entitlement = |name: &str| OrderEntitlement {
            algo_strategy: name.to_string(),
            ..Default::default()
        };
        let report = OrderEntitlementReport {
            order_entitlements: vec![
                entitlement(""),
                entitlement("CQG ARRIVALPRICE"),
                entitlement("CQG VWAP"),
                entitlement("CQG ARRIVALPRICE"),
            ],
        };

        assert_eq!(
            entitled_algo_strategies(&report),
            vec!["CQG ARRIVALPRICE", "CQG VWAP"]
        );
    }

    #[rstest]
    fn test_request_uses_resolved_contract() {
        let step = order_entitlements_step(16_888_888);
        let mut context = WorkflowContext::new();
        context.merge(ContextUpdate::new().with(KEY_CONTRACT_ID, ContextValue::Uint(42)));

        let requests = step.build_requests(&context).unwrap();

        assert!(matches!(
            requests[0],
            RequestPayload::Information(InformationRequestKind::OrderEntitlements {
                contract_id: 42,
                account_id: 16_888_888,
            })
        ));
    }

    #[rstest]
    fn test_request_without_contract_fails() {
        let step = order_entitlements_step(1);

        assert!(matches!(
            step.build_requests(&WorkflowContext::new()),
            Err(WebApiError::IllegalState(_))
        ));
    }
}
