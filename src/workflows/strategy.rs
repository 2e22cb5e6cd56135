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

//! Algo strategy definition lookup: resolves a symbol, then fetches the parameter definitions of
//! the named algo strategies.

use super::{KEY_ALGO_STRATEGY_DEFINITIONS, KEY_ALGO_STRATEGY_NAMES, resolve_symbol_step};
use crate::{
    engine::{
        envelope::{InformationPayload, InformationRequestKind, ReportPayload, RequestPayload},
        step::{ContextUpdate, ContextValue, StepOutcome, Workflow, WorkflowStep},
    },
    error::WebApiError,
};

/// Builds the algo strategy lookup workflow for `symbol` and `strategies`.
///
/// Stores the returned abbreviations under [`KEY_ALGO_STRATEGY_NAMES`] and the report under
/// [`KEY_ALGO_STRATEGY_DEFINITIONS`].
#[must_use]
pub fn algo_strategy_lookup(symbol: &str, strategies: Vec<String>) -> Workflow {
    Workflow::new(
        "algo_strategy_lookup",
        vec![
            resolve_symbol_step(symbol),
            algo_strategy_definitions_step(strategies),
        ],
    )
}

fn algo_strategy_definitions_step(strategies: Vec<String>) -> WorkflowStep {
    WorkflowStep::new(
        "algo_strategy_definitions",
        move |_| {
            if strategies.is_empty() {
                return Err(WebApiError::IllegalState(
                    "no algo strategies to look up".to_string(),
                ));
            }
            Ok(vec![RequestPayload::Information(
                InformationRequestKind::AlgoStrategyDefinitions {
                    strategies: strategies.clone(),
                },
            )])
        },
        |response, _| match response.information() {
            Some(InformationPayload::AlgoStrategyDefinitions(report)) => {
                let names: Vec<String> = report
                    .algo_strategy_definitions
                    .iter()
                    .map(|definition| definition.abbreviation.clone())
                    .collect();
                tracing::info!("Received algo strategy definitions {names:?}");
                StepOutcome::Accept(
                    ContextUpdate::new()
                        .with(KEY_ALGO_STRATEGY_NAMES, ContextValue::TextList(names))
                        .with(
                            KEY_ALGO_STRATEGY_DEFINITIONS,
                            ContextValue::Report(Box::new(ReportPayload::Information(
                                InformationPayload::AlgoStrategyDefinitions(report.clone()),
                            ))),
                        ),
                )
            }
            _ => StepOutcome::Continue,
        },
    )
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{common::consts::CQG_ARRIVAL_PRICE_STRATEGY, engine::step::WorkflowContext};

    #[rstest]
    fn test_workflow_steps() {
        let workflow =
            algo_strategy_lookup("EP", vec![CQG_ARRIVAL_PRICE_STRATEGY.to_string()]);

        let names: Vec<&str> = workflow.steps().iter().map(WorkflowStep::name).collect();

        assert_eq!(names, vec!["resolve_symbol", "algo_strategy_definitions"]);
    }

    #[rstest]
    fn test_empty_strategy_list_fails_request() {
        let step = algo_strategy_definitions_step(Vec::new());

        assert!(step.build_requests(&WorkflowContext::new()).is_err());
    }
}
