//! Offline analytics replay
//!
//! Loads the canned test cases once (on demand, no timer) and recomputes
//! derived stats for the selected case. The set is immutable after load; a
//! reload replaces it wholesale.

use crate::fetch::{ApiClient, FetchError};
use crate::model::TestCase;
use crate::stats::DerivedStats;

/// A loaded set of analytics test cases with a current selection
#[derive(Debug, Clone, Default)]
pub struct AnalyticsReplay {
    test_cases: Vec<TestCase>,
    selected_id: Option<String>,
}

impl AnalyticsReplay {
    /// Fetch the test cases from the backend and select the first
    pub async fn load(client: &ApiClient) -> Result<Self, FetchError> {
        let test_cases = client.fetch_test_cases().await?;
        Ok(Self::from_cases(test_cases))
    }

    /// Build a replay over an already-loaded set, selecting the first case
    #[must_use]
    pub fn from_cases(test_cases: Vec<TestCase>) -> Self {
        let selected_id = test_cases.first().map(|case| case.id.clone());
        Self {
            test_cases,
            selected_id,
        }
    }

    /// All loaded test cases, in backend order
    #[must_use]
    pub fn test_cases(&self) -> &[TestCase] {
        &self.test_cases
    }

    /// Switch the selection by test-case id
    ///
    /// An unknown id is remembered as-is; [`selected`](Self::selected)
    /// falls back to the first case until the id matches something.
    pub fn select(&mut self, id: impl Into<String>) {
        self.selected_id = Some(id.into());
    }

    /// The currently selected case: the one matching the selected id, else
    /// the first case, else nothing
    #[must_use]
    pub fn selected(&self) -> Option<&TestCase> {
        self.selected_id
            .as_deref()
            .and_then(|id| self.test_cases.iter().find(|case| case.id == id))
            .or_else(|| self.test_cases.first())
    }

    /// Derived stats for the selected case, recomputed on each call
    #[must_use]
    pub fn stats(&self) -> Option<DerivedStats> {
        self.selected()
            .map(|case| DerivedStats::analytics(&case.orders))
    }
}
