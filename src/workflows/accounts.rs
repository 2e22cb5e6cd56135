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

//! Account discovery: lists every account the user may trade or monitor.

use super::{KEY_ACCOUNT_IDS, KEY_ACCOUNTS_REPORT};
use crate::{
    codec::proto::AccountsReport,
    engine::{
        envelope::{InformationPayload, InformationRequestKind, ReportPayload, RequestPayload},
        step::{ContextUpdate, ContextValue, StepOutcome, Workflow, WorkflowStep},
    },
};

/// Builds the account discovery workflow.
///
/// Stores the account ids under [`KEY_ACCOUNT_IDS`] and the full report under
/// [`KEY_ACCOUNTS_REPORT`].
#[must_use]
pub fn account_discovery() -> Workflow {
    Workflow::new("account_discovery", vec![accounts_step()])
}

fn accounts_step() -> WorkflowStep {
    WorkflowStep::new(
        "accounts",
        |_| {
            Ok(vec![RequestPayload::Information(
                InformationRequestKind::Accounts,
            )])
        },
        |response, _| match response.information() {
            Some(InformationPayload::Accounts(report)) => {
                let account_ids = account_ids(report);
                tracing::info!("Received {} accounts", account_ids.len());
                StepOutcome::Accept(
                    ContextUpdate::new()
                        .with(KEY_ACCOUNT_IDS, ContextValue::TextList(account_ids))
                        .with(
                            KEY_ACCOUNTS_REPORT,
                            ContextValue::Report(Box::new(ReportPayload::Information(
                                InformationPayload::Accounts(report.clone()),
                            ))),
                        ),
                )
            }
            _ => StepOutcome::Continue,
        },
    )
}

/// Flattens the brokerage / sales series hierarchy into account ids.
#[must_use]
pub fn account_ids(report: &AccountsReport) -> Vec<String> {
    report
        .brokerages
        .iter()
        .flat_map(|brokerage| &brokerage.sales_series)
        .flat_map(|series| &series.accounts)
        .map(|account| account.account_id.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{
        codec::proto::{Account, Brokerage, SalesSeries},
        engine::step::WorkflowContext,
    };

    fn report() -> AccountsReport {
        AccountsReport {
            brokerages: vec![
                Brokerage {
                    id: 1,
                    name: "A".to_string(),
                    sales_series: vec![SalesSeries {
                        accounts: vec![
                            Account {
                                account_id: 11,
                                ..Default::default()
                            },
                            Account {
                                account_id: 12,
                                ..Default::default()
                            },
                        ],
                        ..Default::default()
                    }],
                },
                Brokerage {
                    id: 2,
                    name: "B".to_string(),
                    sales_series: vec![SalesSeries {
                        accounts: vec![Account {
                            account_id: 21,
                            ..Default::default()
                        }],
                        ..Default::default()
                    }],
                },
            ],
        }
    }

    #[rstest]
    fn test_account_ids_flattens_hierarchy() {
        assert_eq!(account_ids(&report()), vec!["11", "12", "21"]);
    }

    #[rstest]
    fn test_workflow_shape() {
        let workflow = account_discovery();

        assert_eq!(workflow.name(), "account_discovery");
        assert_eq!(workflow.steps().len(), 1);
        assert!(workflow.steps()[0].is_terminal());
    }

    #[rstest]
    fn test_accounts_step_ignores_other_reports() {
        let step = accounts_step();
        let response = crate::engine::ResponseEnvelope::push(ReportPayload::Information(
            InformationPayload::Empty,
        ));

        assert_eq!(
            step.evaluate(&response, &WorkflowContext::new()),
            StepOutcome::Continue
        );
    }
}
