//! State of the cases slice

use crate::model::{Case, CaseId, CaseNationality};
use std::collections::HashMap;
use std::sync::Arc;

/// Shared, immutable case list
pub type CaseList = Arc<Vec<Arc<Case>>>;

/// Shared, immutable nationality records keyed by case id
pub type NationalityMap = Arc<HashMap<CaseId, Arc<CaseNationality>>>;

/// Case list, nationality records, request status and selection
///
/// Like the clients slice, `items` and `nationalities` are replaced rather
/// than mutated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CasesState {
    /// Cases in insertion order
    pub items: CaseList,
    /// Nationality records of immigration cases
    pub nationalities: NationalityMap,
    /// A request is in flight
    pub loading: bool,
    /// Message of the last failed request
    pub error: Option<String>,
    /// Currently selected case
    pub selected_id: Option<CaseId>,
}

impl CasesState {
    /// Empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Case with this id
    #[must_use]
    pub fn get(&self, id: &CaseId) -> Option<&Arc<Case>> {
        self.items.iter().find(|c| &c.id == id)
    }

    /// Nationality record of a case
    #[must_use]
    pub fn nationality(&self, case_id: &CaseId) -> Option<&Arc<CaseNationality>> {
        self.nationalities.get(case_id)
    }

    /// Number of cases
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no cases
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
