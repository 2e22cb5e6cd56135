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

//! Algo order placement: resolves a symbol, subscribes to order updates, then submits an algo
//! order and waits for the venue to acknowledge it.

use chrono::Utc;

use super::{
    KEY_CL_ORDER_ID, KEY_ORDER_ID, KEY_ORDER_STATUS, KEY_TRADE_SUBSCRIPTION_ID, contract_id,
    resolve_symbol_step,
};
use crate::{
    common::{
        consts::{
            CQG_ALGO_COST_MODEL_ATTRIBUTE, CQG_ALGO_PERCENT_OF_VOLUME_ATTRIBUTE,
            CQG_ARRIVAL_PRICE_STRATEGY,
        },
        enums::{CqgOrderDuration, CqgOrderSide, CqgOrderStatus, CqgOrderType, CqgSubscriptionScope},
    },
    engine::{
        envelope::{NewOrderParams, ReportKind, ReportPayload, RequestPayload},
        step::{ContextUpdate, ContextValue, StepOutcome, Workflow, WorkflowStep},
    },
};

/// Order parameters of [`algo_order_placement`]; the contract comes from symbol resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlgoOrderParams {
    pub account_id: i32,
    /// Client order id, unique per trader per day.
    pub cl_order_id: String,
    pub order_type: CqgOrderType,
    pub duration: CqgOrderDuration,
    pub side: CqgOrderSide,
    pub qty_significand: i64,
    pub qty_exponent: i32,
    pub is_manual: bool,
    pub algo_strategy: String,
    pub extra_attributes: Vec<(String, String)>,
}

impl AlgoOrderParams {
    /// Creates a day market order for the CQG arrival price strategy with its default
    /// attributes.
    #[must_use]
    pub fn arrival_price(
        account_id: i32,
        cl_order_id: impl Into<String>,
        side: CqgOrderSide,
        qty: i64,
    ) -> Self {
        Self {
            account_id,
            cl_order_id: cl_order_id.into(),
            order_type: CqgOrderType::Mkt,
            duration: CqgOrderDuration::Day,
            side,
            qty_significand: qty,
            qty_exponent: 0,
            is_manual: false,
            algo_strategy: CQG_ARRIVAL_PRICE_STRATEGY.to_string(),
            extra_attributes: vec![
                (CQG_ALGO_COST_MODEL_ATTRIBUTE.to_string(), "1".to_string()),
                (CQG_ALGO_PERCENT_OF_VOLUME_ATTRIBUTE.to_string(), "0".to_string()),
            ],
        }
    }

    fn to_new_order(&self, contract_id: u32) -> NewOrderParams {
        NewOrderParams {
            account_id: self.account_id,
            contract_id,
            cl_order_id: self.cl_order_id.clone(),
            order_type: self.order_type,
            duration: self.duration,
            side: self.side,
            qty_significand: self.qty_significand,
            qty_exponent: self.qty_exponent,
            is_manual: self.is_manual,
            algo_strategy: Some(self.algo_strategy.clone()).filter(|name| !name.is_empty()),
            extra_attributes: self.extra_attributes.clone(),
            when_utc: Utc::now(),
        }
    }
}

/// Builds the algo order placement workflow for `symbol`.
///
/// Stores [`KEY_TRADE_SUBSCRIPTION_ID`] after subscribing, then [`KEY_CL_ORDER_ID`],
/// [`KEY_ORDER_ID`] and [`KEY_ORDER_STATUS`] once the order is acknowledged.
#[must_use]
pub fn algo_order_placement(symbol: &str, order: AlgoOrderParams) -> Workflow {
    Workflow::new(
        "algo_order_placement",
        vec![
            resolve_symbol_step(symbol),
            trade_subscription_step(),
            place_order_step(order),
        ],
    )
}

fn trade_subscription_step() -> WorkflowStep {
    WorkflowStep::new(
        "trade_subscription",
        |_| {
            Ok(vec![RequestPayload::TradeSubscription {
                scopes: vec![CqgSubscriptionScope::Orders],
                subscribe: true,
            }])
        },
        |response, _| match &response.payload {
            ReportPayload::TradeSubscriptionStatus(status) => {
                tracing::info!("Trade subscription {} active", status.id);
                StepOutcome::Accept(ContextUpdate::new().with(
                    KEY_TRADE_SUBSCRIPTION_ID,
                    ContextValue::Uint(u64::from(status.id)),
                ))
            }
            _ => StepOutcome::Continue,
        },
    )
}

fn place_order_step(order: AlgoOrderParams) -> WorkflowStep {
    let cl_order_id = order.cl_order_id.clone();
    WorkflowStep::new(
        "place_order",
        move |context| {
            let new_order = order.to_new_order(contract_id(context)?);
            Ok(vec![RequestPayload::NewOrder(Box::new(new_order))])
        },
        move |response, _| match &response.payload {
            ReportPayload::OrderStatus(status) => {
                let matches = status
                    .order
                    .as_ref()
                    .is_some_and(|order| order.cl_order_id == cl_order_id);
                if !matches {
                    return StepOutcome::Continue;
                }

                let Some(order_status) = CqgOrderStatus::from_repr(status.status) else {
                    return StepOutcome::Reject(format!("unknown order status {}", status.status));
                };
                if order_status.is_rejected() {
                    return StepOutcome::Reject(format!(
                        "order {cl_order_id} {order_status}: {}",
                        status.text_message
                    ));
                }
                if order_status.is_transient() {
                    tracing::debug!("Order {cl_order_id} {order_status}");
                    return StepOutcome::Continue;
                }

                tracing::info!(
                    "Order {cl_order_id} acknowledged as {} with status {order_status}",
                    status.order_id
                );
                StepOutcome::Accept(
                    ContextUpdate::new()
                        .with(KEY_CL_ORDER_ID, ContextValue::Text(cl_order_id.clone()))
                        .with(KEY_ORDER_ID, ContextValue::Text(status.order_id.clone()))
                        .with(
                            KEY_ORDER_STATUS,
                            ContextValue::Text(order_status.to_string()),
                        ),
                )
            }
            ReportPayload::OrderRequestReject(reject) => StepOutcome::Reject(format!(
                "order request {} rejected: {}",
                reject.request_id, reject.text_message
            )),
            _ => StepOutcome::Continue,
        },
    )
    .with_push_kinds(&[ReportKind::OrderStatus])
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{
        codec::proto::{Order, OrderStatus},
        engine::{ResponseEnvelope, step::WorkflowContext},
        workflows::KEY_CONTRACT_ID,
    };

    fn order() -> AlgoOrderParams {
        AlgoOrderParams::arrival_price(16_888_888, "3", CqgOrderSide::Buy, 5)
    }

    fn status(cl_order_id: &str, status: CqgOrderStatus) -> ResponseEnvelope {
        OrderStatus {
            status: status.as_u32(),
            order_id: "O-1".to_string(),
            text_message: "reason".to_string(),
            order: Some(Order {
                cl_order_id: cl_order_id.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
        .into()
    }

    #[rstest]
    fn test_arrival_price_defaults() {
        let params = order();

        assert_eq!(params.algo_strategy, "CQG ARRIVALPRICE");
        assert_eq!(params.order_type, CqgOrderType::Mkt);
        assert_eq!(params.extra_attributes.len(), 2);
    }

    #[rstest]
    fn test_order_request_uses_resolved_contract() {
        let step = place_order_step(order());
        let mut context = WorkflowContext::new();
        context.merge(ContextUpdate::new().with(KEY_CONTRACT_ID, ContextValue::Uint(42)));

        let requests = step.build_requests(&context).unwrap();

        let RequestPayload::NewOrder(params) = &requests[0] else {
            panic!("expected new order");
        };
        assert_eq!(params.contract_id, 42);
        assert_eq!(params.algo_strategy.as_deref(), Some("CQG ARRIVALPRICE"));
    }

    #[rstest]
    fn test_order_step_subscribes_to_order_statuses() {
        assert_eq!(
            place_order_step(order()).push_kinds(),
            &[ReportKind::OrderStatus]
        );
    }

    #[rstest]
    #[case(CqgOrderStatus::InTransit, "continue")]
    #[case(CqgOrderStatus::Working, "accept")]
    #[case(CqgOrderStatus::Filled, "accept")]
    #[case(CqgOrderStatus::Rejected, "reject")]
    fn test_order_status_outcomes(#[case] order_status: CqgOrderStatus, #[case] expected: &str) {
        let step = place_order_step(order());

        let outcome = step.evaluate(&status("3", order_status), &WorkflowContext::new());

        let actual = match outcome {
            StepOutcome::Accept(_) => "accept",
            StepOutcome::Reject(_) => "reject",
            StepOutcome::Continue => "continue",
        };
        assert_eq!(actual, expected);
    }

    #[rstest]
    fn test_other_orders_are_ignored() {
        let step = place_order_step(order());

        let outcome = step.evaluate(
            &status("other", CqgOrderStatus::Rejected),
            &WorkflowContext::new(),
        );

        assert_eq!(outcome, StepOutcome::Continue);
    }

    #[rstest]
    fn test_accept_stores_order_details() {
        let step = place_order_step(order());

        let StepOutcome::Accept(update) =
            step.evaluate(&status("3", CqgOrderStatus::Working), &WorkflowContext::new())
        else {
            panic!("expected accept");
        };
        let mut context = WorkflowContext::new();
        context.merge(update);

        assert_eq!(context.get_text(KEY_ORDER_ID), Some("O-1"));
        assert_eq!(context.get_text(KEY_ORDER_STATUS), Some("WORKING"));
        assert_eq!(context.get_text(KEY_CL_ORDER_ID), Some("3"));
    }
}
