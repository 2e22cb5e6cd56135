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

//! Workflow engine scenarios driven through the public API with synthetic server messages.

use nautilus_cqg::{
    codec::{
        Codec, ProtobufCodec,
        proto::{LogonResult, ServerMsg},
    },
    common::{
        credential::Credentials,
        enums::{CqgOrderSide, CqgOrderStatus},
        testing::{
            RecordingTransport, accounts_msg, encode_server_msg, incomplete_report,
            information_failure_msg, logged_off_msg, logon_result_msg, order_entitlements_msg, order_request_reject_msg,
            order_status_msg, ping_msg, symbol_resolution_msg, trade_snapshot_completion_msg,
            trade_subscription_status_msg,
        },
    },
    engine::{
        ResponseEnvelope, Transport, Workflow, WorkflowEngine, WorkflowState,
        correlator::{Correlator, Expectation, Resolution},
        dispatcher::Dispatcher,
        envelope::RequestKind,
        session::{AuthStatus, Session},
    },
    error::WebApiError,
    workflows::{
        AlgoOrderParams, KEY_ACCOUNT_IDS, KEY_CONTRACT_ID, KEY_ENTITLED_ALGO_STRATEGIES, KEY_ORDER_ID,
        KEY_ORDER_STATUS, account_discovery, algo_order_placement, entitlement_lookup,
        resolve_symbol_step,
    },
};
use rstest::rstest;

type TestEngine = WorkflowEngine<ProtobufCodec, RecordingTransport>;

fn engine(workflow: Workflow) -> TestEngine {
    WorkflowEngine::new(
        workflow,
        Credentials::new("u1", "p1"),
        ProtobufCodec,
        RecordingTransport::new(),
    )
}

fn resolve_ep() -> Workflow {
    Workflow::new("resolve", vec![resolve_symbol_step("EP")])
}

fn feed(engine: &mut TestEngine, msg: &ServerMsg) {
    let _ = engine.on_frame(&encode_server_msg(msg));
}

fn logged_on(workflow: Workflow) -> TestEngine {
    let mut engine = engine(workflow);
    engine.start().unwrap();
    feed(&mut engine, &logon_result_msg(0, ""));
    engine
}

fn information_request_ids(engine: &TestEngine) -> Vec<u32> {
    engine
        .transport()
        .client_msgs()
        .iter()
        .flat_map(|msg| msg.information_requests.iter().map(|request| request.id))
        .collect()
}

#[rstest]
fn test_symbol_resolution_completes_with_contract_id() {
    let mut engine = engine(resolve_ep());

    engine.start().unwrap();
    feed(&mut engine, &logon_result_msg(0, ""));
    feed(&mut engine, &symbol_resolution_msg(1, 42, "F.US.EPZ6"));

    assert_eq!(engine.state(), &WorkflowState::Completed);
    assert_eq!(engine.context().get_uint(KEY_CONTRACT_ID), Some(42));
    assert_eq!(engine.correlator().pending_count(), 0);
    assert!(engine.transport().is_closed());

    let sent = engine.transport().client_msgs();
    assert_eq!(sent.len(), 3);
    assert!(sent[0].logon.is_some());
    let request = &sent[1].information_requests[0];
    assert_eq!(request.id, 1);
    assert_eq!(
        request
            .symbol_resolution_request
            .as_ref()
            .map(|r| r.symbol.as_str()),
        Some("EP")
    );
    assert!(sent[2].logoff.is_some());
}

#[rstest]
fn test_logon_rejection_fails_without_further_requests() {
    let mut engine = engine(resolve_ep());

    engine.start().unwrap();
    feed(
        &mut engine,
        &logon_result_msg(5, "Invalid user name or password"),
    );

    assert_eq!(
        engine.state(),
        &WorkflowState::Failed(WebApiError::Rejected {
            code: 5,
            message: "Invalid user name or password".to_string(),
        })
    );
    assert_eq!(engine.correlator().pending_count(), 0);
    assert_eq!(engine.transport().client_msgs().len(), 1);
    assert!(engine.transport().is_closed());
}

#[rstest]
fn test_unknown_correlation_id_is_unroutable() {
    let mut engine = logged_on(resolve_ep());
    let state = engine.state().clone();

    feed(&mut engine, &symbol_resolution_msg(99, 42, "F.US.EPZ6"));

    assert_eq!(engine.state(), &state);
    assert_eq!(engine.unroutable_count(), 1);
    assert!(engine.context().is_empty());
    assert!(engine.correlator().is_pending(1));
}

#[rstest]
fn test_nothing_but_logon_sent_before_authentication() {
    let mut engine = engine(entitlement_lookup("EP", 16_888_888));

    engine.start().unwrap();
    feed(&mut engine, &ping_msg("early"));
    feed(&mut engine, &symbol_resolution_msg(1, 42, "F.US.EPZ6"));

    let sent = engine.transport().client_msgs();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].logon.is_some());
    assert_eq!(engine.state(), &WorkflowState::AwaitingLogon);
    assert_eq!(engine.unroutable_count(), 1);
}

#[rstest]
fn test_correlation_ids_are_unique_across_steps() {
    let mut engine = logged_on(entitlement_lookup("EP", 16_888_888));

    feed(&mut engine, &symbol_resolution_msg(1, 42, "F.US.EPZ6"));
    feed(&mut engine, &order_entitlements_msg(2, &["CQG ARRIVALPRICE"]));

    assert_eq!(engine.state(), &WorkflowState::Completed);
    assert_eq!(information_request_ids(&engine), vec![1, 2]);
    assert_eq!(
        engine
            .context()
            .get_text_list(KEY_ENTITLED_ALGO_STRATEGIES),
        Some(&["CQG ARRIVALPRICE".to_string()][..])
    );
}

#[rstest]
fn test_step_advances_exactly_once_on_duplicate_reply() {
    let mut engine = logged_on(entitlement_lookup("EP", 16_888_888));

    feed(&mut engine, &symbol_resolution_msg(1, 42, "F.US.EPZ6"));
    feed(&mut engine, &symbol_resolution_msg(1, 43, "F.US.EPH7"));

    assert_eq!(engine.state(), &WorkflowState::RunningStep(1));
    assert_eq!(engine.current_step(), Some("order_entitlements"));
    assert_eq!(engine.context().get_uint(KEY_CONTRACT_ID), Some(42));
    assert_eq!(engine.unroutable_count(), 1);
    assert_eq!(information_request_ids(&engine), vec![1, 2]);
}

#[rstest]
fn test_failure_status_fails_step() {
    let mut engine = logged_on(resolve_ep());

    feed(&mut engine, &information_failure_msg(1, 104, "Unknown symbol"));

    assert_eq!(
        engine.state(),
        &WorkflowState::Failed(WebApiError::StepFailed {
            code: 104,
            message: "Unknown symbol".to_string(),
        })
    );
    assert_eq!(engine.correlator().pending_count(), 0);
}

#[rstest]
fn test_ping_answered_after_logon() {
    let mut engine = logged_on(resolve_ep());

    feed(&mut engine, &ping_msg("token-7"));

    let sent = engine.transport().client_msgs();
    let pong = sent.last().and_then(|msg| msg.pong.as_ref()).unwrap();
    assert_eq!(pong.token, "token-7");
    assert!(matches!(engine.state(), WorkflowState::RunningStep(0)));
}

#[rstest]
fn test_logged_off_closes_run() {
    let mut engine = logged_on(resolve_ep());

    feed(&mut engine, &logged_off_msg(1, "Forced logoff"));

    assert_eq!(
        engine.state(),
        &WorkflowState::Failed(WebApiError::ConnectionClosed)
    );
    assert!(engine.transport().is_closed());
}

#[rstest]
fn test_account_discovery_stores_account_ids() {
    let mut engine = logged_on(account_discovery());

    feed(&mut engine, &accounts_msg(1, &[(11, "A"), (12, "B")]));

    let context = engine.into_report().into_result().unwrap();
    assert_eq!(
        context.get_text_list(KEY_ACCOUNT_IDS),
        Some(&["11".to_string(), "12".to_string()][..])
    );
}

#[rstest]
fn test_multi_part_accounts_report_is_assembled() {
    let mut engine = logged_on(account_discovery());

    feed(&mut engine, &incomplete_report(accounts_msg(1, &[(11, "A")])));

    assert_eq!(engine.state(), &WorkflowState::RunningStep(0));
    assert!(engine.correlator().is_pending(1));
    assert!(engine.context().is_empty());
    assert_eq!(engine.transport().client_msgs().len(), 2);

    feed(&mut engine, &accounts_msg(1, &[(12, "B")]));

    assert_eq!(engine.state(), &WorkflowState::Completed);
    assert_eq!(engine.unroutable_count(), 0);
    assert_eq!(
        engine.context().get_text_list(KEY_ACCOUNT_IDS),
        Some(&["11".to_string(), "12".to_string()][..])
    );
}

#[rstest]
fn test_multi_part_entitlements_report_is_assembled() {
    let mut engine = logged_on(entitlement_lookup("EP", 16_888_888));
    feed(&mut engine, &symbol_resolution_msg(1, 42, "F.US.EPZ6"));

    feed(
        &mut engine,
        &incomplete_report(order_entitlements_msg(2, &["CQG ARRIVALPRICE"])),
    );
    assert_eq!(engine.current_step(), Some("order_entitlements"));

    feed(&mut engine, &order_entitlements_msg(2, &["CQG VWAP"]));

    assert_eq!(engine.state(), &WorkflowState::Completed);
    assert_eq!(
        engine
            .context()
            .get_text_list(KEY_ENTITLED_ALGO_STRATEGIES),
        Some(&["CQG ARRIVALPRICE".to_string(), "CQG VWAP".to_string()][..])
    );
}

#[rstest]
fn test_failure_after_partial_reply_fails_step() {
    let mut engine = logged_on(account_discovery());
    feed(&mut engine, &incomplete_report(accounts_msg(1, &[(11, "A")])));

    feed(&mut engine, &information_failure_msg(1, 110, "Report aborted"));

    assert_eq!(
        engine.state(),
        &WorkflowState::Failed(WebApiError::StepFailed {
            code: 110,
            message: "Report aborted".to_string(),
        })
    );
    assert!(engine.context().is_empty());
}

#[rstest]
fn test_algo_order_placement_flow() {
    let order = AlgoOrderParams::arrival_price(16_888_888, "3", CqgOrderSide::Buy, 1);
    let mut engine = logged_on(algo_order_placement("EP", order));

    feed(&mut engine, &symbol_resolution_msg(1, 42, "F.US.EPZ6"));
    feed(&mut engine, &trade_subscription_status_msg(2, 0));
    feed(&mut engine, &trade_snapshot_completion_msg(2));
    assert_eq!(engine.current_step(), Some("place_order"));

    let sent = engine.transport().client_msgs();
    let order_request = sent
        .iter()
        .flat_map(|msg| &msg.order_requests)
        .next()
        .unwrap();
    assert_eq!(order_request.request_id, 3);
    let new_order = order_request
        .new_order
        .as_ref()
        .and_then(|new_order| new_order.order.as_ref())
        .unwrap();
    assert_eq!(new_order.contract_id, 42);

    feed(
        &mut engine,
        &order_status_msg(2, "3", CqgOrderStatus::InTransit, "O-1"),
    );
    assert_eq!(engine.current_step(), Some("place_order"));

    feed(
        &mut engine,
        &order_status_msg(2, "3", CqgOrderStatus::Working, "O-1"),
    );

    assert_eq!(engine.state(), &WorkflowState::Completed);
    assert_eq!(engine.context().get_text(KEY_ORDER_ID), Some("O-1"));
    assert_eq!(engine.context().get_text(KEY_ORDER_STATUS), Some("WORKING"));
}

#[rstest]
fn test_algo_order_reject_fails_run() {
    let order = AlgoOrderParams::arrival_price(16_888_888, "3", CqgOrderSide::Sell, 1);
    let mut engine = logged_on(algo_order_placement("EP", order));
    feed(&mut engine, &symbol_resolution_msg(1, 42, "F.US.EPZ6"));
    feed(&mut engine, &trade_subscription_status_msg(2, 0));

    feed(&mut engine, &order_request_reject_msg(3, 7, "Not entitled"));

    assert!(matches!(
        engine.state(),
        WorkflowState::Failed(WebApiError::StepFailed { code: 7, .. })
    ));
}

#[rstest]
fn test_correlator_resolves_at_most_once() {
    let mut correlator = Correlator::new();
    let id = correlator.next_id().unwrap();
    correlator
        .register(Expectation {
            correlation_id: id,
            kind: RequestKind::SymbolResolution,
            step_index: 0,
            issued_at: chrono::Utc::now(),
        })
        .unwrap();
    let response = encode_and_split(&symbol_resolution_msg(id, 42, "F.US.EPZ6")).remove(0);

    assert!(matches!(
        correlator.resolve(id, &response),
        Resolution::Final(_)
    ));
    assert_eq!(correlator.resolve(id, &response), Resolution::NotFound);
    assert_ne!(correlator.next_id().unwrap(), id);
}

#[rstest]
fn test_logon_result_after_terminal_state_is_illegal() {
    let mut session = Session::new();
    session
        .begin_logon(&Credentials::new("u1", "p1"))
        .unwrap();
    let rejected = ResponseEnvelope::from(LogonResult {
        result_code: 5,
        text_message: "bad".to_string(),
        ..Default::default()
    });

    session.on_logon_result(&rejected).unwrap();
    assert_eq!(session.status(), AuthStatus::Rejected);

    assert!(matches!(
        session.on_logon_result(&rejected),
        Err(WebApiError::IllegalState(_))
    ));
}

fn encode_and_split(msg: &ServerMsg) -> Vec<ResponseEnvelope> {
    let decoded = ProtobufCodec.decode(&encode_server_msg(msg)).unwrap();
    Dispatcher::new().split(decoded)
}
