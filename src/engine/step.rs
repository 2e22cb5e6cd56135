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

//! Workflow step descriptors and the context they accumulate.

use std::fmt::Debug;

use ahash::AHashMap;
use ustr::Ustr;

use crate::{
    engine::envelope::{ReportKind, ReportPayload, RequestPayload, ResponseEnvelope},
    error::{WebApiError, WebApiResult},
};

/// A value produced by a completed step.
#[derive(Clone, Debug, PartialEq)]
pub enum ContextValue {
    Int(i64),
    Uint(u64),
    Text(String),
    TextList(Vec<String>),
    Report(Box<ReportPayload>),
}

/// Key/value pairs a step merges into the [`WorkflowContext`] when it accepts a response.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContextUpdate {
    entries: Vec<(Ustr, ContextValue)>,
}

impl ContextUpdate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: ContextValue) -> Self {
        self.entries.push((Ustr::from(key), value));
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Values accumulated by completed steps, readable by later steps.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorkflowContext {
    values: AHashMap<Ustr, ContextValue>,
}

impl WorkflowContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges an update, later entries overwriting earlier ones.
    pub fn merge(&mut self, update: ContextUpdate) {
        self.values.extend(update.entries);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.values.get(&Ustr::from(key))
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(&Ustr::from(key))
    }

    #[must_use]
    pub fn get_uint(&self, key: &str) -> Option<u64> {
        match self.get(key)? {
            ContextValue::Uint(value) => Some(*value),
            ContextValue::Int(value) => u64::try_from(*value).ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            ContextValue::Int(value) => Some(*value),
            ContextValue::Uint(value) => i64::try_from(*value).ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_text(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            ContextValue::Text(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_text_list(&self, key: &str) -> Option<&[String]> {
        match self.get(key)? {
            ContextValue::TextList(values) => Some(values),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_report(&self, key: &str) -> Option<&ReportPayload> {
        match self.get(key)? {
            ContextValue::Report(report) => Some(report),
            _ => None,
        }
    }

    /// Reads an unsigned value which an earlier step must have stored.
    ///
    /// # Errors
    ///
    /// Returns [`WebApiError::IllegalState`] if the key is missing or not an unsigned value.
    pub fn require_uint(&self, key: &str) -> WebApiResult<u64> {
        self.get_uint(key)
            .ok_or_else(|| WebApiError::IllegalState(format!("context has no `{key}`")))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the entries sorted by key.
    #[must_use]
    pub fn entries(&self) -> Vec<(&str, &ContextValue)> {
        let mut entries: Vec<_> = self
            .values
            .iter()
            .map(|(key, value)| (key.as_str(), value))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

/// Decision of a step's completion predicate for one response.
#[derive(Clone, Debug, PartialEq)]
pub enum StepOutcome {
    /// The step is satisfied; merge the update and advance.
    Accept(ContextUpdate),
    /// The step failed; the run terminates with this reason.
    Reject(String),
    /// Not the response the step is waiting for; stay on this step.
    Continue,
}

pub type RequestFn = Box<dyn Fn(&WorkflowContext) -> WebApiResult<Vec<RequestPayload>> + Send>;
pub type PredicateFn = Box<dyn Fn(&ResponseEnvelope, &WorkflowContext) -> StepOutcome + Send>;

/// One stage of a workflow: the requests it issues and the predicate that completes it.
pub struct WorkflowStep {
    name: Ustr,
    requests: RequestFn,
    predicate: PredicateFn,
    push_kinds: Vec<ReportKind>,
    terminal: bool,
    advanced: bool,
}

impl Debug for WorkflowStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(WorkflowStep))
            .field("name", &self.name)
            .field("push_kinds", &self.push_kinds)
            .field("terminal", &self.terminal)
            .field("advanced", &self.advanced)
            .finish_non_exhaustive()
    }
}

impl WorkflowStep {
    /// Creates a new [`WorkflowStep`] instance.
    ///
    /// `requests` builds the payloads to send when the step becomes active; the engine assigns
    /// correlation ids. `predicate` is evaluated against every successful correlated reply and
    /// every push message whose kind the step subscribes to via [`Self::with_push_kinds`].
    pub fn new<R, P>(name: &str, requests: R, predicate: P) -> Self
    where
        R: Fn(&WorkflowContext) -> WebApiResult<Vec<RequestPayload>> + Send + 'static,
        P: Fn(&ResponseEnvelope, &WorkflowContext) -> StepOutcome + Send + 'static,
    {
        Self {
            name: Ustr::from(name),
            requests: Box::new(requests),
            predicate: Box::new(predicate),
            push_kinds: Vec::new(),
            terminal: false,
            advanced: false,
        }
    }

    /// Routes push messages of these kinds to the step while it is active.
    #[must_use]
    pub fn with_push_kinds(mut self, kinds: &[ReportKind]) -> Self {
        self.push_kinds = kinds.to_vec();
        self
    }

    /// Completes the workflow when this step accepts.
    #[must_use]
    pub const fn terminal(mut self, terminal: bool) -> Self {
        self.terminal = terminal;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    #[must_use]
    pub fn push_kinds(&self) -> &[ReportKind] {
        &self.push_kinds
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.terminal
    }

    #[must_use]
    pub const fn has_advanced(&self) -> bool {
        self.advanced
    }

    /// Builds this step's request payloads from the current context.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the request builder, typically a missing context value.
    pub fn build_requests(&self, context: &WorkflowContext) -> WebApiResult<Vec<RequestPayload>> {
        (self.requests)(context)
    }

    #[must_use]
    pub fn evaluate(&self, response: &ResponseEnvelope, context: &WorkflowContext) -> StepOutcome {
        (self.predicate)(response, context)
    }

    /// Records that the step advanced.
    ///
    /// # Errors
    ///
    /// Returns [`WebApiError::IllegalState`] if the step has already advanced.
    pub fn mark_advanced(&mut self) -> WebApiResult<()> {
        if self.advanced {
            return Err(WebApiError::IllegalState(format!(
                "step `{}` already advanced",
                self.name
            )));
        }
        self.advanced = true;
        Ok(())
    }
}

/// A named, ordered sequence of steps.
#[derive(Debug)]
pub struct Workflow {
    name: Ustr,
    steps: Vec<WorkflowStep>,
}

impl Workflow {
    /// Creates a new [`Workflow`]; the last step is always terminal.
    #[must_use]
    pub fn new(name: &str, mut steps: Vec<WorkflowStep>) -> Self {
        if let Some(last) = steps.last_mut() {
            last.terminal = true;
        }
        Self {
            name: Ustr::from(name),
            steps,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    #[must_use]
    pub fn steps(&self) -> &[WorkflowStep] {
        &self.steps
    }

    #[must_use]
    pub fn into_parts(self) -> (Ustr, Vec<WorkflowStep>) {
        (self.name, self.steps)
    }
}
