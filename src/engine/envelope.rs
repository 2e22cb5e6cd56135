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

//! Typed request and response envelopes exchanged through the engine.
//!
//! Outbound requests are a closed set of [`RequestPayload`] variants; inbound results are a
//! closed set of [`ReportPayload`] variants. The dispatcher matches on them exhaustively, so a
//! new protocol variant fails to compile until every routing decision accounts for it.

use chrono::{DateTime, Utc};
use strum::{AsRefStr, Display};

use crate::{
    codec::proto::{
        AccountsReport, AlgoStrategyDefinitionReport, InformationReport, LoggedOff, LogonResult,
        OrderEntitlementReport, OrderRequestReject, OrderStatus, Ping, SymbolResolutionReport,
        TradeSnapshotCompletion, TradeSubscriptionStatus,
    },
    common::{
        consts::CQG_STATUS_SUCCESS,
        credential::Credentials,
        enums::{CqgOrderDuration, CqgOrderSide, CqgOrderType, CqgSubscriptionScope},
    },
    error::{WebApiError, WebApiResult},
};

/// Identifies the kind of an outbound request.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum RequestKind {
    Logon,
    Accounts,
    SymbolResolution,
    AlgoStrategyDefinitions,
    OrderEntitlements,
    TradeSubscription,
    NewOrder,
}

/// Information request variants carried by `InformationRequest`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InformationRequestKind {
    /// All accounts the user is authorized to trade or monitor.
    Accounts,
    /// Resolve a symbol name into contract metadata.
    SymbolResolution { symbol: String },
    /// Parameter definitions of the named algo strategies.
    AlgoStrategyDefinitions { strategies: Vec<String> },
    /// Order types, durations and algo strategies allowed for a contract and account.
    OrderEntitlements { contract_id: u32, account_id: i32 },
}

/// Parameters of a new order request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewOrderParams {
    pub account_id: i32,
    pub contract_id: u32,
    /// Client order id, unique per trader per day.
    pub cl_order_id: String,
    pub order_type: CqgOrderType,
    pub duration: CqgOrderDuration,
    pub side: CqgOrderSide,
    pub qty_significand: i64,
    pub qty_exponent: i32,
    pub is_manual: bool,
    pub algo_strategy: Option<String>,
    pub extra_attributes: Vec<(String, String)>,
    pub when_utc: DateTime<Utc>,
}

/// Outbound request variants.
#[derive(Clone, Debug)]
pub enum RequestPayload {
    Logon(Credentials),
    Information(InformationRequestKind),
    TradeSubscription {
        scopes: Vec<CqgSubscriptionScope>,
        subscribe: bool,
    },
    NewOrder(Box<NewOrderParams>),
}

impl RequestPayload {
    /// Returns the kind of this request.
    #[must_use]
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::Logon(_) => RequestKind::Logon,
            Self::Information(InformationRequestKind::Accounts) => RequestKind::Accounts,
            Self::Information(InformationRequestKind::SymbolResolution { .. }) => {
                RequestKind::SymbolResolution
            }
            Self::Information(InformationRequestKind::AlgoStrategyDefinitions { .. }) => {
                RequestKind::AlgoStrategyDefinitions
            }
            Self::Information(InformationRequestKind::OrderEntitlements { .. }) => {
                RequestKind::OrderEntitlements
            }
            Self::TradeSubscription { .. } => RequestKind::TradeSubscription,
            Self::NewOrder(_) => RequestKind::NewOrder,
        }
    }
}

/// An outbound request with its correlation id.
///
/// The logon request is answered by a `LogonResult` and carries no correlation id; every other
/// request carries one.
#[derive(Clone, Debug)]
pub struct RequestEnvelope {
    pub correlation_id: Option<u32>,
    pub payload: RequestPayload,
    pub issued_at: DateTime<Utc>,
}

impl RequestEnvelope {
    /// Creates the logon request envelope.
    #[must_use]
    pub fn logon(credentials: Credentials) -> Self {
        Self {
            correlation_id: None,
            payload: RequestPayload::Logon(credentials),
            issued_at: Utc::now(),
        }
    }

    /// Creates a request envelope which expects a reply correlated by `correlation_id`.
    #[must_use]
    pub fn correlated(correlation_id: u32, payload: RequestPayload) -> Self {
        Self {
            correlation_id: Some(correlation_id),
            payload,
            issued_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> RequestKind {
        self.payload.kind()
    }
}

/// Identifies the kind of an inbound result.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ReportKind {
    LogonResult,
    LoggedOff,
    Ping,
    AccountsReport,
    SymbolResolutionReport,
    AlgoStrategyDefinitionReport,
    OrderEntitlementReport,
    /// An information report without a result payload, typically a failure.
    EmptyInformationReport,
    OrderRequestReject,
    TradeSubscriptionStatus,
    TradeSnapshotCompletion,
    OrderStatus,
}

/// Result payload of an information report.
#[derive(Clone, Debug, PartialEq)]
pub enum InformationPayload {
    Accounts(AccountsReport),
    SymbolResolution(SymbolResolutionReport),
    AlgoStrategyDefinitions(AlgoStrategyDefinitionReport),
    OrderEntitlements(OrderEntitlementReport),
    Empty,
}

impl InformationPayload {
    /// Appends the entries of a later part of the same multi-part report.
    ///
    /// # Errors
    ///
    /// Returns [`WebApiError::IllegalState`] if `part` carries a different kind of report.
    pub fn extend(&mut self, part: Self) -> WebApiResult<()> {
        if matches!(self, Self::Empty) {
            *self = part;
            return Ok(());
        }

        match (self, part) {
            (Self::Accounts(report), Self::Accounts(part)) => {
                report.brokerages.extend(part.brokerages);
            }
            (Self::AlgoStrategyDefinitions(report), Self::AlgoStrategyDefinitions(part)) => {
                report
                    .algo_strategy_definitions
                    .extend(part.algo_strategy_definitions);
            }
            (Self::OrderEntitlements(report), Self::OrderEntitlements(part)) => {
                report.order_entitlements.extend(part.order_entitlements);
            }
            (Self::SymbolResolution(report), Self::SymbolResolution(part)) => {
                if part.contract_metadata.is_some() {
                    *report = part;
                }
            }
            (_, Self::Empty) => {}
            (_, part) => {
                return Err(WebApiError::IllegalState(format!(
                    "{} part of a different multi-part report",
                    ReportPayload::Information(part).kind()
                )));
            }
        }
        Ok(())
    }
}

/// Inbound result variants, one per independent entry of a `ServerMsg` batch.
#[derive(Clone, Debug, PartialEq)]
pub enum ReportPayload {
    LogonResult(LogonResult),
    LoggedOff(LoggedOff),
    Ping(Ping),
    Information(InformationPayload),
    OrderRequestReject(OrderRequestReject),
    TradeSubscriptionStatus(TradeSubscriptionStatus),
    TradeSnapshotCompletion(TradeSnapshotCompletion),
    OrderStatus(Box<OrderStatus>),
}

impl ReportPayload {
    /// Returns the kind of this result.
    #[must_use]
    pub fn kind(&self) -> ReportKind {
        match self {
            Self::LogonResult(_) => ReportKind::LogonResult,
            Self::LoggedOff(_) => ReportKind::LoggedOff,
            Self::Ping(_) => ReportKind::Ping,
            Self::Information(InformationPayload::Accounts(_)) => ReportKind::AccountsReport,
            Self::Information(InformationPayload::SymbolResolution(_)) => {
                ReportKind::SymbolResolutionReport
            }
            Self::Information(InformationPayload::AlgoStrategyDefinitions(_)) => {
                ReportKind::AlgoStrategyDefinitionReport
            }
            Self::Information(InformationPayload::OrderEntitlements(_)) => {
                ReportKind::OrderEntitlementReport
            }
            Self::Information(InformationPayload::Empty) => ReportKind::EmptyInformationReport,
            Self::OrderRequestReject(_) => ReportKind::OrderRequestReject,
            Self::TradeSubscriptionStatus(_) => ReportKind::TradeSubscriptionStatus,
            Self::TradeSnapshotCompletion(_) => ReportKind::TradeSnapshotCompletion,
            Self::OrderStatus(_) => ReportKind::OrderStatus,
        }
    }
}

/// An inbound result with its status and optional correlation id.
///
/// Push messages (order statuses, snapshot completions) carry no correlation id.
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseEnvelope {
    pub correlation_id: Option<u32>,
    /// Zero means success; any other value is surfaced verbatim.
    pub status_code: u32,
    pub text_message: String,
    /// `false` while more parts of a multi-part response are still to come.
    pub is_final: bool,
    pub payload: ReportPayload,
}

impl ResponseEnvelope {
    /// Creates a final, successful envelope without correlation id.
    #[must_use]
    pub fn push(payload: ReportPayload) -> Self {
        Self {
            correlation_id: None,
            status_code: CQG_STATUS_SUCCESS,
            text_message: String::new(),
            is_final: true,
            payload,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ReportKind {
        self.payload.kind()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status_code == CQG_STATUS_SUCCESS
    }

    /// Returns the information payload, if this is an information report.
    #[must_use]
    pub fn information(&self) -> Option<&InformationPayload> {
        match &self.payload {
            ReportPayload::Information(info) => Some(info),
            _ => None,
        }
    }

    /// Folds a later part of the same multi-part reply into this one.
    ///
    /// # Errors
    ///
    /// Returns [`WebApiError::IllegalState`] if either side is not an information report, or
    /// the parts carry different kinds of report.
    pub fn extend(&mut self, part: Self) -> WebApiResult<()> {
        let is_final = part.is_final;
        match (&mut self.payload, part.payload) {
            (ReportPayload::Information(info), ReportPayload::Information(part)) => {
                info.extend(part)?;
            }
            (payload, part) => {
                return Err(WebApiError::IllegalState(format!(
                    "cannot merge {} into {}",
                    part.kind(),
                    payload.kind()
                )));
            }
        }
        self.is_final = is_final;
        Ok(())
    }
}

impl From<LogonResult> for ResponseEnvelope {
    fn from(result: LogonResult) -> Self {
        Self {
            correlation_id: None,
            status_code: result.result_code,
            text_message: result.text_message.clone(),
            is_final: true,
            payload: ReportPayload::LogonResult(result),
        }
    }
}

impl From<LoggedOff> for ResponseEnvelope {
    fn from(logged_off: LoggedOff) -> Self {
        Self {
            correlation_id: None,
            status_code: logged_off.logoff_reason,
            text_message: logged_off.text_message.clone(),
            is_final: true,
            payload: ReportPayload::LoggedOff(logged_off),
        }
    }
}

impl From<Ping> for ResponseEnvelope {
    fn from(ping: Ping) -> Self {
        Self::push(ReportPayload::Ping(ping))
    }
}

impl From<InformationReport> for ResponseEnvelope {
    fn from(report: InformationReport) -> Self {
        let payload = if let Some(accounts) = report.accounts_report {
            InformationPayload::Accounts(accounts)
        } else if let Some(resolution) = report.symbol_resolution_report {
            InformationPayload::SymbolResolution(resolution)
        } else if let Some(definitions) = report.algo_strategy_definition_report {
            InformationPayload::AlgoStrategyDefinitions(definitions)
        } else if let Some(entitlements) = report.order_entitlement_report {
            InformationPayload::OrderEntitlements(entitlements)
        } else {
            InformationPayload::Empty
        };

        Self {
            correlation_id: Some(report.id),
            status_code: report.status_code,
            text_message: report.text_message,
            is_final: report.is_report_complete.unwrap_or(true),
            payload: ReportPayload::Information(payload),
        }
    }
}

impl From<OrderRequestReject> for ResponseEnvelope {
    fn from(reject: OrderRequestReject) -> Self {
        Self {
            correlation_id: Some(reject.request_id),
            status_code: reject.reject_code,
            text_message: reject.text_message.clone(),
            is_final: true,
            payload: ReportPayload::OrderRequestReject(reject),
        }
    }
}

impl From<TradeSubscriptionStatus> for ResponseEnvelope {
    fn from(status: TradeSubscriptionStatus) -> Self {
        Self {
            correlation_id: Some(status.id),
            status_code: status.status_code,
            text_message: status.text_message.clone(),
            is_final: true,
            payload: ReportPayload::TradeSubscriptionStatus(status),
        }
    }
}

impl From<TradeSnapshotCompletion> for ResponseEnvelope {
    fn from(completion: TradeSnapshotCompletion) -> Self {
        Self::push(ReportPayload::TradeSnapshotCompletion(completion))
    }
}

impl From<OrderStatus> for ResponseEnvelope {
    fn from(status: OrderStatus) -> Self {
        let text_message = status.text_message.clone();
        Self {
            text_message,
            ..Self::push(ReportPayload::OrderStatus(Box::new(status)))
        }
    }
}
