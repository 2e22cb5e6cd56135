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

//! Test fixtures: a recording transport and synthetic server messages.

use prost::Message;

use crate::{
    codec::proto::{
        Account, AccountsReport, AlgoStrategyDefinition, AlgoStrategyDefinitionReport, Brokerage,
        ClientMsg, ContractMetadata, InformationReport, LoggedOff, LogonResult, Order,
        OrderEntitlement, OrderEntitlementReport, OrderRequestReject, OrderStatus, Ping,
        SalesSeries, ServerMsg, SymbolResolutionReport, TradeSnapshotCompletion,
        TradeSubscriptionStatus,
    },
    common::enums::CqgOrderStatus,
    engine::transport::Transport,
    error::{WebApiError, WebApiResult},
};

/// A [`Transport`] which records every frame it is handed.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    frames: Vec<Vec<u8>>,
    closed: bool,
    fail_sends: bool,
}

impl RecordingTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport whose sends always fail with a transport error.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_sends: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn frames(&self) -> &[Vec<u8>] {
        &self.frames
    }

    /// Decodes the recorded frames as client messages.
    ///
    /// # Panics
    ///
    /// Panics if a recorded frame is not a valid `ClientMsg`.
    #[must_use]
    pub fn client_msgs(&self) -> Vec<ClientMsg> {
        self.frames
            .iter()
            .map(|frame| decode_client_msg(frame))
            .collect()
    }
}

impl Transport for RecordingTransport {
    fn send(&mut self, frame: Vec<u8>) -> WebApiResult<()> {
        if self.closed {
            return Err(WebApiError::ConnectionClosed);
        }
        if self.fail_sends {
            return Err(WebApiError::Transport("send refused".to_string()));
        }
        self.frames.push(frame);
        Ok(())
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Encodes a server message into a binary frame.
#[must_use]
pub fn encode_server_msg(msg: &ServerMsg) -> Vec<u8> {
    msg.encode_to_vec()
}

/// Decodes a client frame.
///
/// # Panics
///
/// Panics if the frame is not a valid `ClientMsg`.
#[must_use]
pub fn decode_client_msg(frame: &[u8]) -> ClientMsg {
    ClientMsg::decode(frame).expect("frame should be a valid ClientMsg")
}

#[must_use]
pub fn logon_result_msg(result_code: u32, text_message: &str) -> ServerMsg {
    ServerMsg {
        logon_result: Some(LogonResult {
            result_code,
            text_message: text_message.to_string(),
            session_token: "test-session".to_string(),
            protocol_version_major: Some(2),
            protocol_version_minor: Some(90),
            user_id: 1001,
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[must_use]
pub fn logged_off_msg(logoff_reason: u32, text_message: &str) -> ServerMsg {
    ServerMsg {
        logged_off: Some(LoggedOff {
            logoff_reason,
            text_message: text_message.to_string(),
        }),
        ..Default::default()
    }
}

#[must_use]
pub fn ping_msg(token: &str) -> ServerMsg {
    ServerMsg {
        ping: Some(Ping {
            token: token.to_string(),
            ping_utc_time: 1_700_000_000_000,
        }),
        ..Default::default()
    }
}

/// A failed information report without result payload.
#[must_use]
pub fn information_failure_msg(id: u32, status_code: u32, text_message: &str) -> ServerMsg {
    ServerMsg {
        information_reports: vec![InformationReport {
            id,
            is_report_complete: Some(true),
            status_code,
            text_message: text_message.to_string(),
            ..Default::default()
        }],
        ..Default::default()
    }
}

#[must_use]
pub fn symbol_resolution_msg(id: u32, contract_id: u32, contract_symbol: &str) -> ServerMsg {
    ServerMsg {
        information_reports: vec![InformationReport {
            id,
            is_report_complete: Some(true),
            symbol_resolution_report: Some(SymbolResolutionReport {
                contract_metadata: Some(ContractMetadata {
                    contract_id,
                    contract_symbol: contract_symbol.to_string(),
                    tick_size: 0.25,
                    tick_value: 12.5,
                    ..Default::default()
                }),
            }),
            ..Default::default()
        }],
        ..Default::default()
    }
}

/// An accounts report with one brokerage and one sales series holding `accounts`.
#[must_use]
pub fn accounts_msg(id: u32, accounts: &[(i32, &str)]) -> ServerMsg {
    let accounts = accounts
        .iter()
        .map(|(account_id, name)| Account {
            account_id: *account_id,
            brokerage_account_id: format!("B{account_id}"),
            name: (*name).to_string(),
            ..Default::default()
        })
        .collect();

    ServerMsg {
        information_reports: vec![InformationReport {
            id,
            is_report_complete: Some(true),
            accounts_report: Some(AccountsReport {
                brokerages: vec![Brokerage {
                    id: 1,
                    name: "Test Brokerage".to_string(),
                    sales_series: vec![SalesSeries {
                        number: "1".to_string(),
                        name: "Series 1".to_string(),
                        accounts,
                    }],
                }],
            }),
            ..Default::default()
        }],
        ..Default::default()
    }
}

/// Marks every information report in `msg` as a non-final part of a multi-part reply.
#[must_use]
pub fn incomplete_report(mut msg: ServerMsg) -> ServerMsg {
    for report in &mut msg.information_reports {
        report.is_report_complete = Some(false);
    }
    msg
}

#[must_use]
pub fn algo_strategy_definitions_msg(id: u32, abbreviations: &[&str]) -> ServerMsg {
    ServerMsg {
        information_reports: vec![InformationReport {
            id,
            is_report_complete: Some(true),
            algo_strategy_definition_report: Some(AlgoStrategyDefinitionReport {
                algo_strategy_definitions: abbreviations
                    .iter()
                    .map(|abbreviation| AlgoStrategyDefinition {
                        abbreviation: (*abbreviation).to_string(),
                        definition: "<Strategy/>".to_string(),
                    })
                    .collect(),
            }),
            ..Default::default()
        }],
        ..Default::default()
    }
}

#[must_use]
pub fn order_entitlements_msg(id: u32, algo_strategies: &[&str]) -> ServerMsg {
    let mut order_entitlements = vec![OrderEntitlement {
        order_type: 1,
        duration: 1,
        ..Default::default()
    }];
    order_entitlements.extend(algo_strategies.iter().map(|strategy| OrderEntitlement {
        order_type: 1,
        duration: 1,
        algo_strategy: (*strategy).to_string(),
        ..Default::default()
    }));

    ServerMsg {
        information_reports: vec![InformationReport {
            id,
            is_report_complete: Some(true),
            order_entitlement_report: Some(OrderEntitlementReport { order_entitlements }),
            ..Default::default()
        }],
        ..Default::default()
    }
}

#[must_use]
pub fn trade_subscription_status_msg(id: u32, status_code: u32) -> ServerMsg {
    ServerMsg {
        trade_subscription_statuses: vec![TradeSubscriptionStatus {
            id,
            status_code,
            text_message: String::new(),
        }],
        ..Default::default()
    }
}

#[must_use]
pub fn trade_snapshot_completion_msg(subscription_id: u32) -> ServerMsg {
    ServerMsg {
        trade_snapshot_completions: vec![TradeSnapshotCompletion {
            subscription_id,
            subscription_scopes: vec![1],
        }],
        ..Default::default()
    }
}

#[must_use]
pub fn order_status_msg(
    subscription_id: u32,
    cl_order_id: &str,
    status: CqgOrderStatus,
    order_id: &str,
) -> ServerMsg {
    ServerMsg {
        order_statuses: vec![OrderStatus {
            subscription_ids: vec![subscription_id],
            status: status.as_u32(),
            order_id: order_id.to_string(),
            chain_order_id: order_id.to_string(),
            order: Some(Order {
                cl_order_id: cl_order_id.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }],
        ..Default::default()
    }
}

#[must_use]
pub fn order_request_reject_msg(request_id: u32, reject_code: u32, text_message: &str) -> ServerMsg {
    ServerMsg {
        order_request_rejects: vec![OrderRequestReject {
            request_id,
            reject_code,
            text_message: text_message.to_string(),
        }],
        ..Default::default()
    }
}
