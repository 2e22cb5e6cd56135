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

//! Demultiplexing of inbound server messages.
//!
//! A `ServerMsg` batches independent results. [`Dispatcher::split`] fans a batch out into one
//! [`ResponseEnvelope`] per result and [`Dispatcher::route`] decides where each one goes.

use std::fmt::{self, Display, Formatter};

use crate::{
    codec::proto::ServerMsg,
    engine::{
        correlator::{Correlator, Expectation, Resolution},
        envelope::{ReportKind, ReportPayload, ResponseEnvelope},
        session::{AuthStatus, Session},
    },
};

/// Why a response could not be routed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnroutableReason {
    /// No pending request with this correlation id: unknown, late or duplicated.
    UnknownCorrelationId(u32),
    /// A logon result arrived while no logon was in progress.
    UnexpectedLogonResult,
    /// The message carried no variant this client understands.
    EmptyMessage,
    /// The frame could not be decoded.
    Undecodable(String),
}

impl Display for UnroutableReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCorrelationId(id) => write!(f, "unknown correlation id {id}"),
            Self::UnexpectedLogonResult => write!(f, "unexpected logon result"),
            Self::EmptyMessage => write!(f, "empty message"),
            Self::Undecodable(cause) => write!(f, "undecodable frame: {cause}"),
        }
    }
}

/// Destination of one response envelope.
#[derive(Clone, Debug, PartialEq)]
pub enum Route {
    /// Logon result for the session handshake.
    Logon(ResponseEnvelope),
    /// Reply to a pending request.
    Correlated {
        expectation: Expectation,
        response: ResponseEnvelope,
    },
    /// Unsolicited update the active step subscribed to.
    Push(ResponseEnvelope),
    /// Connection-level message: ping or logged off.
    Control(ResponseEnvelope),
    /// Unsolicited update nobody is waiting for.
    Ignored(ReportKind),
    /// Dropped and counted.
    Unroutable(UnroutableReason),
}

/// Splits inbound batches and routes each result.
#[derive(Debug, Default)]
pub struct Dispatcher {
    unroutable_count: u64,
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of responses dropped as unroutable.
    #[must_use]
    pub const fn unroutable_count(&self) -> u64 {
        self.unroutable_count
    }

    /// Splits a server message into one envelope per independent result, in processing order.
    ///
    /// `LoggedOff` is placed last so results delivered alongside it are still processed.
    #[must_use]
    pub fn split(&self, msg: ServerMsg) -> Vec<ResponseEnvelope> {
        let ServerMsg {
            logon_result,
            logged_off,
            information_reports,
            order_request_rejects,
            trade_subscription_statuses,
            trade_snapshot_completions,
            order_statuses,
            ping,
        } = msg;

        let mut envelopes = Vec::with_capacity(
            information_reports.len()
                + order_request_rejects.len()
                + trade_subscription_statuses.len()
                + trade_snapshot_completions.len()
                + order_statuses.len()
                + 3,
        );

        envelopes.extend(logon_result.map(ResponseEnvelope::from));
        envelopes.extend(ping.map(ResponseEnvelope::from));
        envelopes.extend(information_reports.into_iter().map(ResponseEnvelope::from));
        envelopes.extend(order_request_rejects.into_iter().map(ResponseEnvelope::from));
        envelopes.extend(
            trade_subscription_statuses
                .into_iter()
                .map(ResponseEnvelope::from),
        );
        envelopes.extend(
            trade_snapshot_completions
                .into_iter()
                .map(ResponseEnvelope::from),
        );
        envelopes.extend(order_statuses.into_iter().map(ResponseEnvelope::from));
        envelopes.extend(logged_off.map(ResponseEnvelope::from));

        envelopes
    }

    /// Routes one envelope.
    ///
    /// Correlated replies are resolved against `correlator`; push messages go to the active step
    /// only if its kind is in `push_kinds`.
    pub fn route(
        &mut self,
        response: ResponseEnvelope,
        session: &Session,
        correlator: &mut Correlator,
        push_kinds: &[ReportKind],
    ) -> Route {
        match &response.payload {
            ReportPayload::LogonResult(_) => {
                if session.status() == AuthStatus::Authenticating {
                    Route::Logon(response)
                } else {
                    self.record_unroutable(UnroutableReason::UnexpectedLogonResult)
                }
            }
            ReportPayload::LoggedOff(_) | ReportPayload::Ping(_) => Route::Control(response),
            ReportPayload::Information(_)
            | ReportPayload::OrderRequestReject(_)
            | ReportPayload::TradeSubscriptionStatus(_)
            | ReportPayload::TradeSnapshotCompletion(_)
            | ReportPayload::OrderStatus(_) => match response.correlation_id {
                Some(id) => match correlator.resolve(id, &response) {
                    Resolution::Final(expectation) | Resolution::Partial(expectation) => {
                        Route::Correlated {
                            expectation,
                            response,
                        }
                    }
                    Resolution::NotFound => {
                        self.record_unroutable(UnroutableReason::UnknownCorrelationId(id))
                    }
                },
                None if push_kinds.contains(&response.kind()) => Route::Push(response),
                None => {
                    tracing::trace!("Ignoring {} push", response.kind());
                    Route::Ignored(response.kind())
                }
            },
        }
    }

    /// Counts and logs a dropped response.
    pub fn record_unroutable(&mut self, reason: UnroutableReason) -> Route {
        self.unroutable_count += 1;
        tracing::warn!("Dropping unroutable message: {reason}");
        Route::Unroutable(reason)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::{fixture, rstest};
    use tracing_test::traced_test;

    use super::*;
    use crate::{
        codec::proto::{
            InformationReport, LoggedOff, LogonResult, OrderStatus, Ping, TradeSnapshotCompletion,
        },
        common::credential::Credentials,
        engine::envelope::RequestKind,
    };

    #[fixture]
    fn authenticating() -> Session {
        let mut session = Session::new();
        session.begin_logon(&Credentials::new("u1", "p1")).unwrap();
        session
    }

    fn pending(correlator: &mut Correlator, id: u32) {
        correlator
            .register(Expectation {
                correlation_id: id,
                kind: RequestKind::SymbolResolution,
                step_index: 0,
                issued_at: Utc::now(),
            })
            .unwrap();
    }

    #[rstest]
    fn test_split_preserves_batch_and_puts_logged_off_last() {
        let msg = ServerMsg {
            logged_off: Some(LoggedOff::default()),
            information_reports: vec![
                InformationReport {
                    id: 1,
                    ..Default::default()
                },
                InformationReport {
                    id: 2,
                    ..Default::default()
                },
            ],
            order_statuses: vec![OrderStatus::default()],
            ping: Some(Ping::default()),
            ..Default::default()
        };

        let kinds: Vec<ReportKind> = Dispatcher::new()
            .split(msg)
            .iter()
            .map(ResponseEnvelope::kind)
            .collect();

        assert_eq!(
            kinds,
            vec![
                ReportKind::Ping,
                ReportKind::EmptyInformationReport,
                ReportKind::EmptyInformationReport,
                ReportKind::OrderStatus,
                ReportKind::LoggedOff,
            ]
        );
    }

    #[rstest]
    fn test_split_empty_message() {
        assert!(Dispatcher::new().split(ServerMsg::default()).is_empty());
    }

    #[rstest]
    fn test_logon_result_routes_to_session(authenticating: Session) {
        let mut dispatcher = Dispatcher::new();
        let mut correlator = Correlator::new();

        let route = dispatcher.route(
            LogonResult::default().into(),
            &authenticating,
            &mut correlator,
            &[],
        );

        assert!(matches!(route, Route::Logon(_)));
        assert_eq!(dispatcher.unroutable_count(), 0);
    }

    #[rstest]
    fn test_logon_result_without_handshake_is_unroutable() {
        let mut dispatcher = Dispatcher::new();
        let mut correlator = Correlator::new();

        let route = dispatcher.route(
            LogonResult::default().into(),
            &Session::new(),
            &mut correlator,
            &[],
        );

        assert_eq!(
            route,
            Route::Unroutable(UnroutableReason::UnexpectedLogonResult)
        );
        assert_eq!(dispatcher.unroutable_count(), 1);
    }

    #[rstest]
    fn test_correlated_report_resolves(authenticating: Session) {
        let mut dispatcher = Dispatcher::new();
        let mut correlator = Correlator::new();
        pending(&mut correlator, 7);

        let route = dispatcher.route(
            InformationReport {
                id: 7,
                ..Default::default()
            }
            .into(),
            &authenticating,
            &mut correlator,
            &[],
        );

        assert!(matches!(
            route,
            Route::Correlated { ref expectation, .. } if expectation.correlation_id == 7
        ));
        assert_eq!(correlator.pending_count(), 0);
    }

    #[rstest]
    #[traced_test]
    fn test_unknown_correlation_id_is_counted_and_logged(authenticating: Session) {
        let mut dispatcher = Dispatcher::new();
        let mut correlator = Correlator::new();
        pending(&mut correlator, 1);

        let route = dispatcher.route(
            InformationReport {
                id: 99,
                ..Default::default()
            }
            .into(),
            &authenticating,
            &mut correlator,
            &[],
        );

        assert_eq!(
            route,
            Route::Unroutable(UnroutableReason::UnknownCorrelationId(99))
        );
        assert_eq!(dispatcher.unroutable_count(), 1);
        assert_eq!(correlator.pending_count(), 1);
        assert!(logs_contain("unknown correlation id 99"));
    }

    #[rstest]
    fn test_push_routes_only_when_subscribed(authenticating: Session) {
        let mut dispatcher = Dispatcher::new();
        let mut correlator = Correlator::new();
        let status: ResponseEnvelope = OrderStatus::default().into();

        let subscribed = dispatcher.route(
            status.clone(),
            &authenticating,
            &mut correlator,
            &[ReportKind::OrderStatus],
        );
        let ignored = dispatcher.route(
            TradeSnapshotCompletion::default().into(),
            &authenticating,
            &mut correlator,
            &[ReportKind::OrderStatus],
        );

        assert_eq!(subscribed, Route::Push(status));
        assert_eq!(
            ignored,
            Route::Ignored(ReportKind::TradeSnapshotCompletion)
        );
        assert_eq!(dispatcher.unroutable_count(), 0);
    }

    #[rstest]
    fn test_ping_and_logged_off_are_control(authenticating: Session) {
        let mut dispatcher = Dispatcher::new();
        let mut correlator = Correlator::new();

        let ping = dispatcher.route(
            Ping::default().into(),
            &authenticating,
            &mut correlator,
            &[],
        );
        let logged_off = dispatcher.route(
            LoggedOff::default().into(),
            &authenticating,
            &mut correlator,
            &[],
        );

        assert!(matches!(ping, Route::Control(_)));
        assert!(matches!(logged_off, Route::Control(_)));
    }
}
