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

//! Sans-IO protocol engine.
//!
//! Inbound frames flow codec → [`dispatcher`] → [`correlator`] / [`workflow`]; outbound requests
//! flow [`workflow`] → [`correlator`] (registration) → codec → [`transport`]. The [`session`]
//! gates every send except logon.

pub mod correlator;
pub mod dispatcher;
pub mod envelope;
pub mod session;
pub mod step;
pub mod transport;
pub mod workflow;

pub use self::{
    envelope::{RequestEnvelope, RequestPayload, ResponseEnvelope},
    step::{ContextUpdate, ContextValue, StepOutcome, Workflow, WorkflowContext, WorkflowStep},
    transport::Transport,
    workflow::{WorkflowEngine, WorkflowReport, WorkflowState},
};
