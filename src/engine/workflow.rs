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

//! The workflow engine: drives an ordered list of steps over one authenticated session.
//!
//! The engine is sans-IO. Its owner feeds it inbound frames and connection lifecycle events, one
//! at a time and in arrival order; the engine answers by handing frames to its [`Transport`].
//! Every event is fully processed, including the sends it triggers, before the next is accepted.
//!
//! ```text
//! Idle -> AwaitingLogon -> RunningStep(0) -> ... -> RunningStep(n) -> Completed
//!                  \______________\____________________\___________-> Failed(reason)
//! ```

use std::fmt::Display;

use ahash::AHashMap;
use chrono::Utc;
use ustr::Ustr;

use crate::{
    codec::{Codec, client_msg_for, logoff_msg, pong_msg, proto::ClientMsg},
    common::credential::Credentials,
    engine::{
        correlator::{Correlator, Expectation},
        dispatcher::{Dispatcher, Route, UnroutableReason},
        envelope::{ReportKind, ReportPayload, RequestEnvelope, RequestPayload, ResponseEnvelope},
        session::{Session, SessionOutcome},
        step::{StepOutcome, Workflow, WorkflowContext, WorkflowStep},
        transport::Transport,
    },
    error::{WebApiError, WebApiResult},
};

/// State of a workflow run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum WorkflowState {
    #[default]
    Idle,
    AwaitingLogon,
    RunningStep(usize),
    Completed,
    Failed(WebApiError),
}

impl WorkflowState {
    /// Returns whether the run has finished, successfully or not.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed(_))
    }
}

impl Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::AwaitingLogon => write!(f, "AwaitingLogon"),
            Self::RunningStep(index) => write!(f, "RunningStep({index})"),
            Self::Completed => write!(f, "Completed"),
            Self::Failed(error) => write!(f, "Failed({error})"),
        }
    }
}

/// Outcome of a finished (or abandoned) workflow run.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkflowReport {
    pub workflow: Ustr,
    pub state: WorkflowState,
    pub context: WorkflowContext,
    pub unroutable_count: u64,
}

impl WorkflowReport {
    /// Converts the report into the accumulated context on success.
    ///
    /// # Errors
    ///
    /// Returns the failure reason of a failed run, or [`WebApiError::IllegalState`] if the run
    /// never reached a terminal state.
    pub fn into_result(self) -> WebApiResult<WorkflowContext> {
        match self.state {
            WorkflowState::Completed => Ok(self.context),
            WorkflowState::Failed(error) => Err(error),
            state => Err(WebApiError::IllegalState(format!(
                "workflow `{}` did not finish, state {state}",
                self.workflow
            ))),
        }
    }
}

/// Drives one workflow run over one session.
///
/// Event methods return `Err` when the call failed the run; the error is also recorded as
/// [`WorkflowState::Failed`]. Session, correlator and context are owned exclusively by the engine.
#[derive(Debug)]
pub struct WorkflowEngine<C, T> {
    name: Ustr,
    steps: Vec<WorkflowStep>,
    credentials: Credentials,
    codec: C,
    transport: T,
    session: Session,
    correlator: Correlator,
    dispatcher: Dispatcher,
    context: WorkflowContext,
    partial_replies: AHashMap<u32, ResponseEnvelope>,
    state: WorkflowState,
}

impl<C, T> WorkflowEngine<C, T>
where
    C: Codec,
    T: Transport,
{
    /// Creates a new [`WorkflowEngine`] with a fresh session and correlator.
    pub fn new(workflow: Workflow, credentials: Credentials, codec: C, transport: T) -> Self {
        let (name, steps) = workflow.into_parts();
        Self {
            name,
            steps,
            credentials,
            codec,
            transport,
            session: Session::new(),
            correlator: Correlator::new(),
            dispatcher: Dispatcher::new(),
            context: WorkflowContext::new(),
            partial_replies: AHashMap::new(),
            state: WorkflowState::Idle,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    #[must_use]
    pub const fn state(&self) -> &WorkflowState {
        &self.state
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    #[must_use]
    pub const fn context(&self) -> &WorkflowContext {
        &self.context
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub const fn correlator(&self) -> &Correlator {
        &self.correlator
    }

    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    #[must_use]
    pub const fn unroutable_count(&self) -> u64 {
        self.dispatcher.unroutable_count()
    }

    /// Returns the name of the active step.
    #[must_use]
    pub fn current_step(&self) -> Option<&str> {
        match self.state {
            WorkflowState::RunningStep(index) => self.steps.get(index).map(WorkflowStep::name),
            _ => None,
        }
    }

    /// Consumes the engine into its report.
    #[must_use]
    pub fn into_report(self) -> WorkflowReport {
        WorkflowReport {
            workflow: self.name,
            unroutable_count: self.dispatcher.unroutable_count(),
            state: self.state,
            context: self.context,
        }
    }

    /// Starts the run by sending the logon request.
    ///
    /// # Errors
    ///
    /// Returns [`WebApiError::InvalidCredentials`] if the credentials are empty (nothing is sent),
    /// [`WebApiError::IllegalState`] if the run was already started, or the error of the failed
    /// send.
    pub fn start(&mut self) -> WebApiResult<()> {
        if self.state != WorkflowState::Idle {
            return self.fail(WebApiError::IllegalState(format!(
                "start called in state {}",
                self.state
            )));
        }

        let envelope = match self.session.begin_logon(&self.credentials) {
            Ok(envelope) => envelope,
            Err(e) => return self.fail(e),
        };

        tracing::debug!(
            "Starting workflow `{}` for {}",
            self.name,
            self.session.owner().unwrap_or_default()
        );
        self.state = WorkflowState::AwaitingLogon;

        if let Err(e) = self.send_envelope(&envelope) {
            return self.fail(e);
        }
        Ok(())
    }

    /// Handles one inbound binary frame.
    ///
    /// Undecodable frames and unroutable results are dropped and counted, never fatal. Once the
    /// run is terminal, the rest of the batch and any later frame is ignored.
    ///
    /// # Errors
    ///
    /// Returns the reason if processing the frame failed the run.
    pub fn on_frame(&mut self, frame: &[u8]) -> WebApiResult<()> {
        if self.is_terminal() {
            tracing::trace!("Workflow finished, ignoring frame of {} bytes", frame.len());
            return Ok(());
        }

        let msg = match self.codec.decode(frame) {
            Ok(msg) => msg,
            Err(e) => {
                self.dispatcher
                    .record_unroutable(UnroutableReason::Undecodable(e.to_string()));
                return Ok(());
            }
        };

        let envelopes = self.dispatcher.split(msg);
        if envelopes.is_empty() {
            self.dispatcher
                .record_unroutable(UnroutableReason::EmptyMessage);
            return Ok(());
        }

        for envelope in envelopes {
            if self.is_terminal() {
                tracing::trace!("Workflow finished, dropping {} from batch", envelope.kind());
                break;
            }
            self.on_envelope(envelope)?;
        }
        Ok(())
    }

    /// Moves from `AwaitingLogon` to the first step and issues its requests.
    ///
    /// # Errors
    ///
    /// Returns [`WebApiError::IllegalState`] if no logon is awaited or the session is not
    /// authenticated, or the reason the first step failed to issue its requests.
    pub fn on_session_ready(&mut self) -> WebApiResult<()> {
        if self.state != WorkflowState::AwaitingLogon || !self.session.is_ready() {
            return self.fail(WebApiError::IllegalState(format!(
                "session ready in state {} with session {}",
                self.state,
                self.session.status()
            )));
        }

        tracing::debug!("Logged on, workflow `{}` running", self.name);
        self.enter_step(0)
    }

    /// Evaluates the active step's predicate against a correlated reply or subscribed push.
    ///
    /// A non-zero status code fails the step before the predicate is consulted.
    ///
    /// # Errors
    ///
    /// Returns [`WebApiError::StepFailed`] if the response carries a failure status or the
    /// predicate rejects it, [`WebApiError::IllegalState`] if no step is running, or the reason
    /// the next step failed to issue its requests.
    pub fn on_response(&mut self, response: &ResponseEnvelope) -> WebApiResult<()> {
        let WorkflowState::RunningStep(index) = self.state else {
            return self.fail(WebApiError::IllegalState(format!(
                "{} response in state {}",
                response.kind(),
                self.state
            )));
        };

        if !response.is_success() {
            return self.fail(WebApiError::StepFailed {
                code: response.status_code,
                message: response.text_message.clone(),
            });
        }

        let Some(step) = self.steps.get(index) else {
            return self.fail(WebApiError::IllegalState(format!("no step {index}")));
        };

        match step.evaluate(response, &self.context) {
            StepOutcome::Accept(update) => {
                self.context.merge(update);
                self.advance(index)
            }
            StepOutcome::Reject(reason) => self.fail(WebApiError::StepFailed {
                code: response.status_code,
                message: reason,
            }),
            StepOutcome::Continue => {
                tracing::trace!(
                    "Step `{}` continues after {}",
                    step.name(),
                    response.kind()
                );
                Ok(())
            }
        }
    }

    /// Handles the transport closing, by either side.
    ///
    /// # Errors
    ///
    /// Returns [`WebApiError::ConnectionClosed`] if the run was not already finished.
    pub fn on_transport_closed(&mut self) -> WebApiResult<()> {
        self.session.close();
        if self.is_terminal() {
            return Ok(());
        }
        self.fail(WebApiError::ConnectionClosed)
    }

    /// Handles a transport failure.
    ///
    /// # Errors
    ///
    /// Returns [`WebApiError::Transport`] with `cause` if the run was not already finished.
    pub fn on_transport_error(&mut self, cause: impl Display) -> WebApiResult<()> {
        if self.is_terminal() {
            return Ok(());
        }
        self.fail(WebApiError::Transport(cause.to_string()))
    }

    /// Handles the run exceeding its time limit.
    ///
    /// # Errors
    ///
    /// Returns [`WebApiError::Timeout`] if the run was not already finished.
    pub fn on_timeout(&mut self) -> WebApiResult<()> {
        if self.is_terminal() {
            return Ok(());
        }
        let detail = match self.current_step() {
            Some(step) => format!("workflow `{}` stuck in step `{step}`", self.name),
            None => format!("workflow `{}` stuck in state {}", self.name, self.state),
        };
        self.fail(WebApiError::Timeout(detail))
    }

    /// Abandons the run at the caller's request.
    ///
    /// # Errors
    ///
    /// Returns [`WebApiError::ConnectionClosed`] if the run was not already finished.
    pub fn cancel(&mut self) -> WebApiResult<()> {
        if self.is_terminal() {
            return Ok(());
        }
        tracing::debug!("Cancelling workflow `{}`", self.name);
        self.fail(WebApiError::ConnectionClosed)
    }

    fn on_envelope(&mut self, envelope: ResponseEnvelope) -> WebApiResult<()> {
        let push_kinds: &[ReportKind] = match self.state {
            WorkflowState::RunningStep(index) => self
                .steps
                .get(index)
                .map_or(&[], WorkflowStep::push_kinds),
            _ => &[],
        };

        let route = self.dispatcher.route(
            envelope,
            &self.session,
            &mut self.correlator,
            push_kinds,
        );

        match route {
            Route::Logon(response) => self.on_logon_result(&response),
            Route::Correlated {
                expectation,
                response,
            } => self.on_correlated(&expectation, &response),
            Route::Push(response) => self.on_response(&response),
            Route::Control(response) => self.on_control(&response),
            Route::Ignored(_) | Route::Unroutable(_) => Ok(()),
        }
    }

    fn on_logon_result(&mut self, response: &ResponseEnvelope) -> WebApiResult<()> {
        match self.session.on_logon_result(response) {
            Ok(SessionOutcome::Ready) => self.on_session_ready(),
            Ok(SessionOutcome::Rejected { code, message }) => {
                self.fail(WebApiError::Rejected { code, message })
            }
            Err(e) => self.fail(e),
        }
    }

    fn on_correlated(
        &mut self,
        expectation: &Expectation,
        response: &ResponseEnvelope,
    ) -> WebApiResult<()> {
        if self.state != WorkflowState::RunningStep(expectation.step_index) {
            tracing::debug!(
                "Dropping {} for {} issued by step {}",
                response.kind(),
                expectation.kind,
                expectation.step_index
            );
            return Ok(());
        }
        tracing::trace!(
            "Reply {} to {} request {}",
            response.kind(),
            expectation.kind,
            expectation.correlation_id
        );

        if !response.is_success() {
            return self.on_response(response);
        }
        let id = expectation.correlation_id;
        if response.is_final && !self.partial_replies.contains_key(&id) {
            return self.on_response(response);
        }

        let assembled = match self.partial_replies.remove(&id) {
            Some(mut earlier) => match earlier.extend(response.clone()) {
                Ok(()) => earlier,
                Err(e) => return self.fail(e),
            },
            None => response.clone(),
        };
        if assembled.is_final {
            return self.on_response(&assembled);
        }

        tracing::trace!("Holding part of {} for request {id}", assembled.kind());
        self.partial_replies.insert(id, assembled);
        Ok(())
    }

    fn on_control(&mut self, response: &ResponseEnvelope) -> WebApiResult<()> {
        match &response.payload {
            ReportPayload::Ping(ping) => {
                if !self.session.is_ready() {
                    tracing::trace!("Ignoring ping before logon");
                    return Ok(());
                }
                let pong = pong_msg(ping, Utc::now());
                if let Err(e) = self.send_msg(&pong) {
                    return self.fail(e);
                }
                Ok(())
            }
            ReportPayload::LoggedOff(_) => {
                tracing::debug!(
                    "Logged off by server, reason {}: {}",
                    response.status_code,
                    response.text_message
                );
                self.fail(WebApiError::ConnectionClosed)
            }
            _ => Ok(()),
        }
    }

    fn advance(&mut self, index: usize) -> WebApiResult<()> {
        let Some(step) = self.steps.get_mut(index) else {
            return self.fail(WebApiError::IllegalState(format!("no step {index}")));
        };
        if let Err(e) = step.mark_advanced() {
            return self.fail(e);
        }
        let terminal = step.is_terminal();
        tracing::debug!("Step `{}` accepted", step.name());

        self.partial_replies.clear();
        let released = self.correlator.release_step(index);
        if released > 0 {
            tracing::debug!("Released {released} pending requests of step {index}");
        }

        if terminal {
            self.complete();
            return Ok(());
        }
        self.enter_step(index + 1)
    }

    fn enter_step(&mut self, index: usize) -> WebApiResult<()> {
        self.state = WorkflowState::RunningStep(index);

        let Some(step) = self.steps.get(index) else {
            self.complete();
            return Ok(());
        };

        let payloads = match step.build_requests(&self.context) {
            Ok(payloads) => payloads,
            Err(e) => return self.fail(e),
        };
        tracing::debug!(
            "Entering step {index} `{}` with {} requests",
            step.name(),
            payloads.len()
        );

        for payload in payloads {
            if let Err(e) = self.issue(index, payload) {
                return self.fail(e);
            }
        }
        Ok(())
    }

    fn issue(&mut self, step_index: usize, payload: RequestPayload) -> WebApiResult<()> {
        if matches!(payload, RequestPayload::Logon(_)) {
            return Err(WebApiError::IllegalState(
                "workflow steps cannot issue logon".to_string(),
            ));
        }

        let id = self.correlator.next_id()?;
        let envelope = RequestEnvelope::correlated(id, payload);

        // Registered before the frame leaves, a reply may beat the send call
        self.correlator.register(Expectation {
            correlation_id: id,
            kind: envelope.kind(),
            step_index,
            issued_at: envelope.issued_at,
        })?;

        self.send_envelope(&envelope)
    }

    fn send_envelope(&mut self, envelope: &RequestEnvelope) -> WebApiResult<()> {
        let is_logon = matches!(envelope.payload, RequestPayload::Logon(_));
        if !is_logon && !self.session.is_ready() {
            return Err(WebApiError::IllegalState(format!(
                "{} request before logon completed",
                envelope.kind()
            )));
        }

        let msg = client_msg_for(envelope)?;
        tracing::trace!("Sending {} request {:?}", envelope.kind(), envelope.correlation_id);
        self.send_msg(&msg)
    }

    fn send_msg(&mut self, msg: &ClientMsg) -> WebApiResult<()> {
        if self.transport.is_closed() {
            return Err(WebApiError::ConnectionClosed);
        }
        let frame = self.codec.encode(msg)?;
        self.transport.send(frame)
    }

    fn complete(&mut self) {
        self.state = WorkflowState::Completed;
        tracing::debug!("Workflow `{}` completed", self.name);

        if let Err(e) = self.send_msg(&logoff_msg("workflow completed")) {
            tracing::debug!("Logoff not sent: {e}");
        }
        self.shutdown();
    }

    fn fail(&mut self, error: WebApiError) -> WebApiResult<()> {
        if self.is_terminal() {
            return Err(error);
        }
        tracing::error!("Workflow `{}` failed: {error}", self.name);
        self.state = WorkflowState::Failed(error.clone());
        self.shutdown();
        Err(error)
    }

    fn shutdown(&mut self) {
        self.partial_replies.clear();
        self.correlator.clear();
        self.transport.close();
    }
}
