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

//! Protobuf wire messages for the subset of CQG WebAPI 2 used by the client workflows.
//!
//! Messages follow the WebAPI package layout (`WebAPI_2`, `user_session_2`, `metadata_2`,
//! `trading_account_2`, `trade_routing_2`, `order_2`, `strategy_2`, `cqg`, `shared_1`) flattened
//! into one module. Scalars that the protocol treats as required-with-default are modelled as
//! plain fields; scalars whose absence carries meaning are `Option`.

/// Message sent from client to server. Each field is an independent batch.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ClientMsg {
    #[prost(message, repeated, tag = "1")]
    pub information_requests: Vec<InformationRequest>,
    #[prost(message, repeated, tag = "2")]
    pub trade_subscriptions: Vec<TradeSubscription>,
    #[prost(message, repeated, tag = "3")]
    pub order_requests: Vec<OrderRequest>,
    #[prost(message, optional, tag = "100")]
    pub logon: Option<Logon>,
    #[prost(message, optional, tag = "101")]
    pub logoff: Option<Logoff>,
    #[prost(message, optional, tag = "108")]
    pub pong: Option<Pong>,
}

/// Message sent from server to client. A single frame may batch several independent results.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ServerMsg {
    #[prost(message, optional, tag = "1")]
    pub logon_result: Option<LogonResult>,
    #[prost(message, optional, tag = "2")]
    pub logged_off: Option<LoggedOff>,
    #[prost(message, repeated, tag = "3")]
    pub information_reports: Vec<InformationReport>,
    #[prost(message, repeated, tag = "4")]
    pub order_request_rejects: Vec<OrderRequestReject>,
    #[prost(message, repeated, tag = "5")]
    pub trade_subscription_statuses: Vec<TradeSubscriptionStatus>,
    #[prost(message, repeated, tag = "6")]
    pub trade_snapshot_completions: Vec<TradeSnapshotCompletion>,
    #[prost(message, repeated, tag = "7")]
    pub order_statuses: Vec<OrderStatus>,
    #[prost(message, optional, tag = "14")]
    pub ping: Option<Ping>,
}

// -------------------------------------------------------------------------------------------------
// Session
// -------------------------------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Logon {
    #[prost(string, tag = "1")]
    pub user_name: String,
    #[prost(string, tag = "2")]
    pub password: String,
    #[prost(string, tag = "4")]
    pub client_app_id: String,
    #[prost(string, tag = "5")]
    pub client_version: String,
    #[prost(uint32, optional, tag = "7")]
    pub protocol_version_minor: Option<u32>,
    #[prost(uint32, optional, tag = "8")]
    pub protocol_version_major: Option<u32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LogonResult {
    #[prost(uint32, tag = "1")]
    pub result_code: u32,
    #[prost(string, tag = "2")]
    pub base_time: String,
    #[prost(string, tag = "3")]
    pub session_token: String,
    #[prost(string, tag = "4")]
    pub text_message: String,
    #[prost(uint32, optional, tag = "6")]
    pub protocol_version_minor: Option<u32>,
    #[prost(uint32, optional, tag = "7")]
    pub protocol_version_major: Option<u32>,
    #[prost(sint32, tag = "8")]
    pub user_id: i32,
    #[prost(sint64, tag = "9")]
    pub server_time: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Logoff {
    #[prost(string, tag = "1")]
    pub text_message: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LoggedOff {
    #[prost(uint32, tag = "1")]
    pub logoff_reason: u32,
    #[prost(string, tag = "2")]
    pub text_message: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Ping {
    #[prost(string, tag = "1")]
    pub token: String,
    #[prost(sint64, tag = "2")]
    pub ping_utc_time: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Pong {
    #[prost(string, tag = "1")]
    pub token: String,
    #[prost(sint64, tag = "2")]
    pub ping_utc_time: i64,
    #[prost(sint64, tag = "3")]
    pub pong_utc_time: i64,
}

// -------------------------------------------------------------------------------------------------
// Information requests and reports
// -------------------------------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InformationRequest {
    #[prost(uint32, tag = "1")]
    pub id: u32,
    #[prost(bool, optional, tag = "2")]
    pub subscribe: Option<bool>,
    #[prost(message, optional, tag = "3")]
    pub accounts_request: Option<AccountsRequest>,
    #[prost(message, optional, tag = "4")]
    pub symbol_resolution_request: Option<SymbolResolutionRequest>,
    #[prost(message, optional, tag = "12")]
    pub order_entitlement_request: Option<OrderEntitlementRequest>,
    #[prost(message, optional, tag = "20")]
    pub algo_strategy_definition_request: Option<AlgoStrategyDefinitionRequest>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InformationReport {
    #[prost(uint32, tag = "1")]
    pub id: u32,
    /// Absent means complete: multi-part reports set `false` on every part but the last.
    #[prost(bool, optional, tag = "2")]
    pub is_report_complete: Option<bool>,
    #[prost(uint32, tag = "3")]
    pub status_code: u32,
    #[prost(string, tag = "4")]
    pub text_message: String,
    #[prost(message, optional, tag = "5")]
    pub accounts_report: Option<AccountsReport>,
    #[prost(message, optional, tag = "6")]
    pub symbol_resolution_report: Option<SymbolResolutionReport>,
    #[prost(message, optional, tag = "14")]
    pub order_entitlement_report: Option<OrderEntitlementReport>,
    #[prost(message, optional, tag = "22")]
    pub algo_strategy_definition_report: Option<AlgoStrategyDefinitionReport>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AccountsRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AccountsReport {
    #[prost(message, repeated, tag = "1")]
    pub brokerages: Vec<Brokerage>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Brokerage {
    #[prost(uint32, tag = "1")]
    pub id: u32,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(message, repeated, tag = "3")]
    pub sales_series: Vec<SalesSeries>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SalesSeries {
    #[prost(string, tag = "1")]
    pub number: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(message, repeated, tag = "3")]
    pub accounts: Vec<Account>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Account {
    #[prost(sint32, tag = "1")]
    pub account_id: i32,
    #[prost(string, tag = "2")]
    pub brokerage_account_id: String,
    #[prost(string, tag = "3")]
    pub name: String,
    #[prost(sint64, tag = "4")]
    pub last_statement_date: i64,
    #[prost(bool, tag = "5")]
    pub is_view_only: bool,
    #[prost(bool, tag = "6")]
    pub is_unauthorized: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SymbolResolutionRequest {
    #[prost(string, tag = "1")]
    pub symbol: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SymbolResolutionReport {
    #[prost(message, optional, tag = "1")]
    pub contract_metadata: Option<ContractMetadata>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContractMetadata {
    #[prost(uint32, tag = "1")]
    pub contract_id: u32,
    #[prost(string, tag = "2")]
    pub contract_symbol: String,
    #[prost(double, tag = "3")]
    pub correct_price_scale: f64,
    #[prost(uint32, tag = "4")]
    pub display_price_scale: u32,
    #[prost(string, tag = "5")]
    pub description: String,
    #[prost(string, tag = "6")]
    pub title: String,
    #[prost(double, tag = "7")]
    pub tick_size: f64,
    #[prost(double, tag = "8")]
    pub tick_value: f64,
    #[prost(string, tag = "9")]
    pub cfi_code: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OrderEntitlementRequest {
    #[prost(uint32, tag = "1")]
    pub contract_id: u32,
    #[prost(sint32, tag = "2")]
    pub account_id: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OrderEntitlementReport {
    #[prost(message, repeated, tag = "1")]
    pub order_entitlements: Vec<OrderEntitlement>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OrderEntitlement {
    #[prost(uint32, tag = "1")]
    pub order_type: u32,
    #[prost(bool, tag = "2")]
    pub is_synthetic: bool,
    #[prost(uint32, tag = "3")]
    pub duration: u32,
    #[prost(uint32, tag = "4")]
    pub exec_instruction: u32,
    #[prost(string, tag = "5")]
    pub algo_strategy: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AlgoStrategyDefinitionRequest {
    #[prost(string, repeated, tag = "1")]
    pub algo_strategies: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AlgoStrategyDefinitionReport {
    #[prost(message, repeated, tag = "1")]
    pub algo_strategy_definitions: Vec<AlgoStrategyDefinition>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AlgoStrategyDefinition {
    #[prost(string, tag = "1")]
    pub abbreviation: String,
    /// FIXatdl XML describing the strategy parameters.
    #[prost(string, tag = "2")]
    pub definition: String,
}

// -------------------------------------------------------------------------------------------------
// Trade routing
// -------------------------------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TradeSubscription {
    #[prost(uint32, tag = "1")]
    pub id: u32,
    #[prost(uint32, repeated, packed = "false", tag = "2")]
    pub subscription_scopes: Vec<u32>,
    #[prost(uint32, optional, tag = "3")]
    pub publication_type: Option<u32>,
    #[prost(sint32, optional, tag = "4")]
    pub account_id: Option<i32>,
    #[prost(bool, tag = "7")]
    pub subscribe: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TradeSubscriptionStatus {
    #[prost(uint32, tag = "1")]
    pub id: u32,
    #[prost(uint32, tag = "2")]
    pub status_code: u32,
    #[prost(string, tag = "3")]
    pub text_message: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TradeSnapshotCompletion {
    #[prost(uint32, tag = "1")]
    pub subscription_id: u32,
    #[prost(uint32, repeated, packed = "false", tag = "2")]
    pub subscription_scopes: Vec<u32>,
}

// -------------------------------------------------------------------------------------------------
// Orders
// -------------------------------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OrderRequest {
    #[prost(uint32, tag = "1")]
    pub request_id: u32,
    #[prost(message, optional, tag = "2")]
    pub new_order: Option<NewOrder>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NewOrder {
    #[prost(message, optional, tag = "1")]
    pub order: Option<Order>,
    #[prost(bool, optional, tag = "2")]
    pub suspend: Option<bool>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Order {
    #[prost(sint32, tag = "1")]
    pub account_id: i32,
    #[prost(message, optional, tag = "2")]
    pub when_utc_timestamp: Option<Timestamp>,
    #[prost(uint32, tag = "3")]
    pub contract_id: u32,
    #[prost(string, tag = "4")]
    pub cl_order_id: String,
    #[prost(uint32, tag = "5")]
    pub order_type: u32,
    #[prost(uint32, repeated, packed = "false", tag = "6")]
    pub exec_instructions: Vec<u32>,
    #[prost(uint32, tag = "7")]
    pub duration: u32,
    #[prost(uint32, tag = "9")]
    pub side: u32,
    #[prost(message, optional, tag = "12")]
    pub qty: Option<Decimal>,
    #[prost(bool, optional, tag = "13")]
    pub is_manual: Option<bool>,
    #[prost(string, tag = "14")]
    pub algo_strategy: String,
    #[prost(message, repeated, tag = "15")]
    pub extra_attributes: Vec<NamedValue>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OrderRequestReject {
    #[prost(uint32, tag = "1")]
    pub request_id: u32,
    #[prost(uint32, tag = "2")]
    pub reject_code: u32,
    #[prost(string, tag = "3")]
    pub text_message: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OrderStatus {
    #[prost(uint32, repeated, packed = "false", tag = "1")]
    pub subscription_ids: Vec<u32>,
    #[prost(bool, tag = "2")]
    pub is_snapshot: bool,
    #[prost(uint32, tag = "3")]
    pub status: u32,
    #[prost(string, tag = "4")]
    pub order_id: String,
    #[prost(string, tag = "5")]
    pub chain_order_id: String,
    #[prost(string, tag = "6")]
    pub exec_order_id: String,
    #[prost(message, optional, tag = "7")]
    pub status_utc_timestamp: Option<Timestamp>,
    #[prost(message, optional, tag = "8")]
    pub order: Option<Order>,
    #[prost(string, tag = "9")]
    pub text_message: String,
}

// -------------------------------------------------------------------------------------------------
// Shared
// -------------------------------------------------------------------------------------------------

/// Decimal number `significand * 10^exponent`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Decimal {
    #[prost(sint64, optional, tag = "1")]
    pub significand: Option<i64>,
    #[prost(sint32, optional, tag = "2")]
    pub exponent: Option<i32>,
}

/// Wire-compatible `google.protobuf.Timestamp`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Timestamp {
    #[prost(int64, tag = "1")]
    pub seconds: i64,
    #[prost(int32, tag = "2")]
    pub nanos: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NamedValue {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub value: String,
}
