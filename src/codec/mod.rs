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

//! Wire codec for CQG WebAPI frames.
//!
//! Every WebSocket binary frame carries exactly one protobuf `ClientMsg` (client to server) or
//! `ServerMsg` (server to client). The engine depends only on the [`Codec`] trait;
//! [`ProtobufCodec`] is the production implementation.

pub mod proto;

use chrono::{DateTime, Utc};
use prost::Message;

use self::proto::{
    AccountsRequest, AlgoStrategyDefinitionRequest, ClientMsg, Decimal, InformationRequest,
    Logoff, Logon, NamedValue, NewOrder, Order, OrderEntitlementRequest, OrderRequest, Ping, Pong,
    ServerMsg, SymbolResolutionRequest, Timestamp, TradeSubscription,
};
use crate::{
    common::credential::Credentials,
    engine::envelope::{InformationRequestKind, NewOrderParams, RequestEnvelope, RequestPayload},
    error::{WebApiError, WebApiResult},
};

/// Encodes outbound messages into frames and decodes inbound frames into messages.
pub trait Codec {
    /// Encodes a client message into a binary frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be encoded.
    fn encode(&self, msg: &ClientMsg) -> WebApiResult<Vec<u8>>;

    /// Decodes a binary frame into a server message.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame is not a valid server message.
    fn decode(&self, frame: &[u8]) -> WebApiResult<ServerMsg>;
}

/// Protobuf implementation of [`Codec`] backed by `prost`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProtobufCodec;

impl Codec for ProtobufCodec {
    fn encode(&self, msg: &ClientMsg) -> WebApiResult<Vec<u8>> {
        let mut buf = Vec::with_capacity(msg.encoded_len());
        msg.encode(&mut buf)?;
        Ok(buf)
    }

    fn decode(&self, frame: &[u8]) -> WebApiResult<ServerMsg> {
        if frame.is_empty() {
            return Err(WebApiError::Codec("empty frame".to_string()));
        }
        Ok(ServerMsg::decode(frame)?)
    }
}

/// Builds the `ClientMsg` carrying a single request envelope.
///
/// # Errors
///
/// Returns [`WebApiError::IllegalState`] if a request which expects a correlated reply has no
/// correlation id.
pub fn client_msg_for(envelope: &RequestEnvelope) -> WebApiResult<ClientMsg> {
    let require_id = || {
        envelope.correlation_id.ok_or_else(|| {
            WebApiError::IllegalState(format!(
                "{} request without correlation id",
                envelope.kind()
            ))
        })
    };

    let msg = match &envelope.payload {
        RequestPayload::Logon(credentials) => ClientMsg {
            logon: Some(logon_msg(credentials)),
            ..Default::default()
        },
        RequestPayload::Information(kind) => ClientMsg {
            information_requests: vec![information_request(require_id()?, kind)],
            ..Default::default()
        },
        RequestPayload::TradeSubscription { scopes, subscribe } => ClientMsg {
            trade_subscriptions: vec![TradeSubscription {
                id: require_id()?,
                subscription_scopes: scopes.iter().map(|scope| scope.as_u32()).collect(),
                subscribe: *subscribe,
                ..Default::default()
            }],
            ..Default::default()
        },
        RequestPayload::NewOrder(params) => ClientMsg {
            order_requests: vec![OrderRequest {
                request_id: require_id()?,
                new_order: Some(NewOrder {
                    order: Some(order_msg(params)),
                    suspend: None,
                }),
            }],
            ..Default::default()
        },
    };

    Ok(msg)
}

/// Builds the `ClientMsg` answering a server ping.
#[must_use]
pub fn pong_msg(ping: &Ping, now: DateTime<Utc>) -> ClientMsg {
    ClientMsg {
        pong: Some(Pong {
            token: ping.token.clone(),
            ping_utc_time: ping.ping_utc_time,
            pong_utc_time: now.timestamp_millis(),
        }),
        ..Default::default()
    }
}

/// Builds the `ClientMsg` requesting an orderly logoff.
#[must_use]
pub fn logoff_msg(text_message: &str) -> ClientMsg {
    ClientMsg {
        logoff: Some(Logoff {
            text_message: text_message.to_string(),
        }),
        ..Default::default()
    }
}

fn logon_msg(credentials: &Credentials) -> Logon {
    let version = credentials.protocol_version();
    Logon {
        user_name: credentials.user_name().to_string(),
        password: credentials.password().to_string(),
        client_app_id: credentials.client_app_id().to_string(),
        client_version: credentials.client_version().to_string(),
        protocol_version_minor: Some(version.minor),
        protocol_version_major: Some(version.major),
    }
}

fn information_request(id: u32, kind: &InformationRequestKind) -> InformationRequest {
    let mut request = InformationRequest {
        id,
        ..Default::default()
    };

    match kind {
        InformationRequestKind::Accounts => {
            request.accounts_request = Some(AccountsRequest {});
        }
        InformationRequestKind::SymbolResolution { symbol } => {
            request.symbol_resolution_request = Some(SymbolResolutionRequest {
                symbol: symbol.clone(),
            });
        }
        InformationRequestKind::AlgoStrategyDefinitions { strategies } => {
            request.algo_strategy_definition_request = Some(AlgoStrategyDefinitionRequest {
                algo_strategies: strategies.clone(),
            });
        }
        InformationRequestKind::OrderEntitlements {
            contract_id,
            account_id,
        } => {
            request.order_entitlement_request = Some(OrderEntitlementRequest {
                contract_id: *contract_id,
                account_id: *account_id,
            });
        }
    }

    request
}

fn order_msg(params: &NewOrderParams) -> Order {
    Order {
        account_id: params.account_id,
        when_utc_timestamp: Some(Timestamp {
            seconds: params.when_utc.timestamp(),
            nanos: 0,
        }),
        contract_id: params.contract_id,
        cl_order_id: params.cl_order_id.clone(),
        order_type: params.order_type.as_u32(),
        exec_instructions: Vec::new(),
        duration: params.duration.as_u32(),
        side: params.side.as_u32(),
        qty: Some(Decimal {
            significand: Some(params.qty_significand),
            exponent: Some(params.qty_exponent),
        }),
        is_manual: Some(params.is_manual),
        algo_strategy: params.algo_strategy.clone().unwrap_or_default(),
        extra_attributes: params
            .extra_attributes
            .iter()
            .map(|(name, value)| NamedValue {
                name: name.clone(),
                value: value.clone(),
            })
            .collect(),
    }
}
