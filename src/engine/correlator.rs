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

//! Correlation of in-flight requests with their asynchronous replies.

use ahash::AHashMap;
use chrono::{DateTime, Utc};

use crate::{
    engine::envelope::{RequestKind, ResponseEnvelope},
    error::{WebApiError, WebApiResult},
};

/// What the engine expects back for a request it has sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expectation {
    pub correlation_id: u32,
    pub kind: RequestKind,
    /// Index of the workflow step that issued the request.
    pub step_index: usize,
    pub issued_at: DateTime<Utc>,
}

/// Result of resolving a correlation id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The final part of the reply arrived; the expectation is no longer pending.
    Final(Expectation),
    /// A non-final part of a multi-part reply arrived; the expectation stays pending.
    Partial(Expectation),
    /// Unknown, already resolved or released id.
    NotFound,
}

impl Resolution {
    #[must_use]
    pub const fn expectation(&self) -> Option<&Expectation> {
        match self {
            Self::Final(expectation) | Self::Partial(expectation) => Some(expectation),
            Self::NotFound => None,
        }
    }
}

/// Tracks pending requests of one session, keyed by correlation id.
///
/// Ids come from a strictly increasing counter starting at 1 which is never reset, so an id is
/// never reused within a session.
#[derive(Debug)]
pub struct Correlator {
    next_id: u32,
    pending: AHashMap<u32, Expectation>,
}

impl Default for Correlator {
    fn default() -> Self {
        Self {
            next_id: 1,
            pending: AHashMap::new(),
        }
    }
}

impl Correlator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next correlation id.
    ///
    /// # Errors
    ///
    /// Returns [`WebApiError::IllegalState`] if the id space of the session is exhausted.
    pub fn next_id(&mut self) -> WebApiResult<u32> {
        let id = self.next_id;
        self.next_id = id
            .checked_add(1)
            .ok_or_else(|| WebApiError::IllegalState("correlation ids exhausted".to_string()))?;
        Ok(id)
    }

    /// Registers a pending expectation.
    ///
    /// # Errors
    ///
    /// Returns [`WebApiError::DuplicateCorrelationId`] if the id is already pending.
    pub fn register(&mut self, expectation: Expectation) -> WebApiResult<()> {
        let id = expectation.correlation_id;
        if self.pending.contains_key(&id) {
            return Err(WebApiError::DuplicateCorrelationId(id));
        }
        self.pending.insert(id, expectation);
        Ok(())
    }

    /// Resolves a reply against the pending expectation for `id`.
    ///
    /// The expectation is removed when the reply is final; a non-final part of a multi-part
    /// reply leaves it pending.
    pub fn resolve(&mut self, id: u32, response: &ResponseEnvelope) -> Resolution {
        if !response.is_final {
            return match self.pending.get(&id) {
                Some(expectation) => Resolution::Partial(expectation.clone()),
                None => Resolution::NotFound,
            };
        }

        match self.pending.remove(&id) {
            Some(expectation) => Resolution::Final(expectation),
            None => Resolution::NotFound,
        }
    }

    /// Releases every expectation issued by `step_index`, returning how many were dropped.
    pub fn release_step(&mut self, step_index: usize) -> usize {
        let before = self.pending.len();
        self.pending
            .retain(|_, expectation| expectation.step_index != step_index);
        before - self.pending.len()
    }

    #[must_use]
    pub fn is_pending(&self, id: u32) -> bool {
        self.pending.contains_key(&id)
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Drops every pending expectation. The id counter is not reset.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::{
        codec::proto::InformationReport,
        engine::envelope::{InformationPayload, ReportPayload},
    };

    #[fixture]
    fn correlator() -> Correlator {
        Correlator::new()
    }

    fn expectation(id: u32, step_index: usize) -> Expectation {
        Expectation {
            correlation_id: id,
            kind: RequestKind::SymbolResolution,
            step_index,
            issued_at: Utc::now(),
        }
    }

    fn report(id: u32, is_final: bool) -> ResponseEnvelope {
        ResponseEnvelope {
            correlation_id: Some(id),
            is_final,
            ..ResponseEnvelope::push(ReportPayload::Information(InformationPayload::Empty))
        }
    }

    #[rstest]
    fn test_ids_start_at_one_and_increase(mut correlator: Correlator) {
        let ids: Vec<u32> = (0..5).map(|_| correlator.next_id().unwrap()).collect();

        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[rstest]
    fn test_ids_not_reused_after_resolution(mut correlator: Correlator) {
        let first = correlator.next_id().unwrap();
        correlator.register(expectation(first, 0)).unwrap();
        correlator.resolve(first, &report(first, true));

        let second = correlator.next_id().unwrap();

        assert!(second > first);
    }

    #[rstest]
    fn test_register_duplicate_fails(mut correlator: Correlator) {
        correlator.register(expectation(1, 0)).unwrap();

        let result = correlator.register(expectation(1, 0));

        assert_eq!(result, Err(WebApiError::DuplicateCorrelationId(1)));
        assert_eq!(correlator.pending_count(), 1);
    }

    #[rstest]
    fn test_resolve_at_most_once(mut correlator: Correlator) {
        correlator.register(expectation(1, 0)).unwrap();

        let first = correlator.resolve(1, &report(1, true));
        let second = correlator.resolve(1, &report(1, true));

        assert!(matches!(first, Resolution::Final(ref e) if e.correlation_id == 1));
        assert_eq!(second, Resolution::NotFound);
        assert_eq!(correlator.pending_count(), 0);
    }

    #[rstest]
    fn test_resolve_unknown_is_not_found(mut correlator: Correlator) {
        assert_eq!(correlator.resolve(99, &report(99, true)), Resolution::NotFound);
    }

    #[rstest]
    fn test_partial_reply_keeps_pending(mut correlator: Correlator) {
        correlator.register(expectation(3, 0)).unwrap();

        let partial = correlator.resolve(3, &report(3, false));

        assert!(matches!(partial, Resolution::Partial(_)));
        assert!(correlator.is_pending(3));

        let last = correlator.resolve(3, &report(3, true));

        assert!(matches!(last, Resolution::Final(_)));
        assert!(!correlator.is_pending(3));
    }

    #[rstest]
    fn test_release_step_drops_only_that_step(mut correlator: Correlator) {
        correlator.register(expectation(1, 0)).unwrap();
        correlator.register(expectation(2, 0)).unwrap();
        correlator.register(expectation(3, 1)).unwrap();

        let released = correlator.release_step(0);

        assert_eq!(released, 2);
        assert_eq!(correlator.pending_count(), 1);
        assert!(correlator.is_pending(3));
    }

    #[rstest]
    fn test_clear_keeps_counter(mut correlator: Correlator) {
        let id = correlator.next_id().unwrap();
        correlator.register(expectation(id, 0)).unwrap();

        correlator.clear();

        assert_eq!(correlator.pending_count(), 0);
        assert_eq!(correlator.next_id().unwrap(), id + 1);
    }

    #[rstest]
    fn test_information_report_conversion_resolves(mut correlator: Correlator) {
        correlator.register(expectation(4, 0)).unwrap();
        let response: ResponseEnvelope = InformationReport {
            id: 4,
            ..Default::default()
        }
        .into();

        let resolution = correlator.resolve(4, &response);

        assert!(matches!(resolution, Resolution::Final(_)));
    }
}
