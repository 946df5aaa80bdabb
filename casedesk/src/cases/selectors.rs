//! Read projections over [`CasesState`]

use super::{CaseList, CasesState, NationalityMap};
use crate::model::{Case, CaseId, CaseNationality, CaseStatus, ClientId, Matter};
use casedesk_core::Selector;
use std::sync::Arc;

/// Every case, in insertion order
#[must_use]
pub fn select_all(state: &CasesState) -> CaseList {
    Arc::clone(&state.items)
}

/// Case with this id, or `None`
#[must_use]
pub fn select_by_id(state: &CasesState, id: &CaseId) -> Option<Arc<Case>> {
    state.get(id).cloned()
}

/// A request is in flight
#[must_use]
pub const fn select_loading(state: &CasesState) -> bool {
    state.loading
}

/// Message of the last failed request
#[must_use]
pub fn select_error(state: &CasesState) -> Option<String> {
    state.error.clone()
}

/// Id of the selected case
#[must_use]
pub fn select_selected_id(state: &CasesState) -> Option<CaseId> {
    state.selected_id.clone()
}

/// The selected case, if it is in the list
#[must_use]
pub fn select_selected(state: &CasesState) -> Option<Arc<Case>> {
    state
        .selected_id
        .as_ref()
        .and_then(|id| select_by_id(state, id))
}

/// Number of cases
#[must_use]
pub fn select_count(state: &CasesState) -> usize {
    state.items.len()
}

/// Cases owned by one client
#[must_use]
pub fn select_by_client(state: &CasesState, client_id: &ClientId) -> Vec<Arc<Case>> {
    state
        .items
        .iter()
        .filter(|c| &c.client_id == client_id)
        .cloned()
        .collect()
}

/// Cases of one matter
#[must_use]
pub fn select_by_matter(state: &CasesState, matter: Matter) -> Vec<Arc<Case>> {
    state
        .items
        .iter()
        .filter(|c| c.matter == matter)
        .cloned()
        .collect()
}

/// Cases in one status
#[must_use]
pub fn select_by_status(state: &CasesState, status: CaseStatus) -> Vec<Arc<Case>> {
    state
        .items
        .iter()
        .filter(|c| c.status == status)
        .cloned()
        .collect()
}

/// Nationality record of a case, or `None`
#[must_use]
pub fn select_nationality(state: &CasesState, case_id: &CaseId) -> Option<Arc<CaseNationality>> {
    state.nationality(case_id).cloned()
}

/// Search and menu filters over the case list
///
/// The text query is trimmed and compared case-insensitively against the case
/// number, the owning client's full name and the matter. The menu filters
/// must all match when set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CaseFilter {
    query: String,
    matter: Option<Matter>,
    status: Option<CaseStatus>,
    client_id: Option<ClientId>,
}

impl CaseFilter {
    /// Filter on `query`
    #[must_use]
    pub fn new(query: &str) -> Self {
        Self {
            query: query.trim().to_lowercase(),
            ..Self::default()
        }
    }

    /// Only cases of `matter`
    #[must_use]
    pub const fn with_matter(mut self, matter: Matter) -> Self {
        self.matter = Some(matter);
        self
    }

    /// Only cases in `status`
    #[must_use]
    pub const fn with_status(mut self, status: CaseStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Only cases of one client
    #[must_use]
    pub fn with_client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    /// Normalized query
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns true if `case` passes every filter
    ///
    /// `client_name` is the resolved full name of the owner, if known.
    #[must_use]
    pub fn matches(&self, case: &Case, client_name: Option<&str>) -> bool {
        if self.matter.is_some_and(|m| m != case.matter)
            || self.status.is_some_and(|s| s != case.status)
            || self.client_id.as_ref().is_some_and(|id| id != &case.client_id)
        {
            return false;
        }
        if self.query.is_empty() {
            return true;
        }
        [
            Some(case.case_number.as_str()),
            client_name,
            Some(case.matter.as_str()),
            Some(case.matter.label()),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&self.query))
    }
}

type ListSelector<T> = Selector<CasesState, CaseList, T>;

/// Memoized case views
#[derive(Debug)]
pub struct CaseSelectors {
    /// Selected case joined with the list
    pub selected: Selector<CasesState, (CaseList, Option<CaseId>), Option<Arc<Case>>>,
    /// Cases that are not closed
    pub open: ListSelector<Arc<Vec<Arc<Case>>>>,
    /// Number of cases
    pub count: ListSelector<usize>,
}

impl CaseSelectors {
    /// Fresh selectors with empty caches
    #[must_use]
    pub fn new() -> Self {
        Self {
            selected: Selector::new(
                |s: &CasesState| (select_all(s), select_selected_id(s)),
                |(items, selected): &(CaseList, Option<CaseId>)| {
                    selected
                        .as_ref()
                        .and_then(|id| items.iter().find(|c| &c.id == id).cloned())
                },
            ),
            open: Selector::new(select_all, |items: &CaseList| {
                Arc::new(items.iter().filter(|c| !c.is_closed()).cloned().collect())
            }),
            count: Selector::new(select_all, |items: &CaseList| items.len()),
        }
    }

    /// Memoized [`select_by_client`]
    #[must_use]
    pub fn by_client(client_id: ClientId) -> ListSelector<Arc<Vec<Arc<Case>>>> {
        Selector::new(select_all, move |items: &CaseList| {
            Arc::new(
                items
                    .iter()
                    .filter(|c| c.client_id == client_id)
                    .cloned()
                    .collect(),
            )
        })
    }

    /// Memoized [`select_by_matter`]
    #[must_use]
    pub fn by_matter(matter: Matter) -> ListSelector<Arc<Vec<Arc<Case>>>> {
        Selector::new(select_all, move |items: &CaseList| {
            Arc::new(items.iter().filter(|c| c.matter == matter).cloned().collect())
        })
    }

    /// Memoized [`select_nationality`], keyed on the nationality map
    #[must_use]
    pub fn nationality(
        case_id: CaseId,
    ) -> Selector<CasesState, NationalityMap, Option<Arc<CaseNationality>>> {
        Selector::new(
            |s: &CasesState| Arc::clone(&s.nationalities),
            move |map: &NationalityMap| map.get(&case_id).cloned(),
        )
    }
}

impl Default for CaseSelectors {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cases::{CasesAction, CasesEnvironment, CasesReducer};
    use crate::services::{Fixtures, LatencyProfile, MockBackend, MockCaseService};
    use casedesk_core::Reducer;
    use casedesk_testing::{test_clock, SequentialIdGenerator};

    fn env() -> CasesEnvironment {
        CasesEnvironment::new(Arc::new(
            MockCaseService::new(
                MockBackend::empty(),
                Arc::new(test_clock()),
                Arc::new(SequentialIdGenerator::new()),
            )
            .with_latency(LatencyProfile::none()),
        ))
    }

    fn reduce(state: &mut CasesState, action: CasesAction) {
        let _ = CasesReducer.reduce(state, action, &env());
    }

    fn loaded() -> CasesState {
        let fixtures = Fixtures::bundled().unwrap();
        let mut state = CasesState::new();
        reduce(
            &mut state,
            CasesAction::LoadSuccess {
                cases: fixtures.cases,
                nationalities: fixtures.nationalities,
            },
        );
        state
    }

    fn ids(cases: &[Arc<Case>]) -> Vec<&str> {
        cases.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_nationality_join() {
        let state = loaded();
        let record = select_nationality(&state, &CaseId::from("case-1")).unwrap();
        assert_eq!(record.case_id, CaseId::from("case-1"));
        assert!(select_nationality(&state, &CaseId::from("case-2")).is_none());
        // EXTRANJERIA case without a record
        assert!(select_nationality(&state, &CaseId::from("case-4")).is_none());
    }

    #[test]
    fn test_foreign_key_and_enumeration_filters() {
        let state = loaded();
        assert_eq!(ids(&select_by_client(&state, &ClientId::from("2"))), vec!["case-1"]);
        assert!(select_by_client(&state, &ClientId::from("5")).is_empty());
        assert_eq!(
            ids(&select_by_matter(&state, Matter::Extranjeria)),
            vec!["case-1", "case-4"]
        );
        assert_eq!(
            ids(&select_by_status(&state, CaseStatus::EnTramitacion)),
            vec!["case-1", "case-4"]
        );
        assert!(select_by_matter(&state, Matter::Penal).is_empty());
    }

    #[test]
    fn test_selected_case() {
        let mut state = loaded();
        assert!(select_selected(&state).is_none());
        reduce(
            &mut state,
            CasesAction::Select {
                case_id: CaseId::from("case-3"),
            },
        );
        assert_eq!(
            select_selected(&state).map(|c| c.case_number.clone()),
            Some("2024-003".to_string())
        );
        assert_eq!(select_count(&state), 4);
        assert!(!select_loading(&state));
        assert!(select_error(&state).is_none());
    }

    #[test]
    fn test_filter_combines_query_and_menus() {
        let state = loaded();
        let case = |id: &str| select_by_id(&state, &CaseId::from(id)).unwrap();

        let filter = CaseFilter::new("2024-00");
        assert!(filter.matches(&case("case-2"), None));

        let filter = CaseFilter::new(" maría ");
        assert!(filter.matches(&case("case-1"), Some("María González López")));
        assert!(!filter.matches(&case("case-1"), None));

        let filter = CaseFilter::new("extranjería");
        assert!(filter.matches(&case("case-4"), None));
        assert!(!filter.matches(&case("case-2"), None));

        let filter = CaseFilter::new("").with_matter(Matter::Extranjeria);
        assert!(filter.matches(&case("case-1"), None));
        assert!(!filter.matches(&case("case-3"), None));

        let filter = CaseFilter::new("2024")
            .with_status(CaseStatus::EnTramitacion)
            .with_client(ClientId::from("4"));
        assert!(filter.matches(&case("case-4"), None));
        assert!(!filter.matches(&case("case-1"), None));
    }

    #[test]
    fn test_memoized_bundle_ignores_flag_changes() {
        let selectors = CaseSelectors::new();
        let mut state = loaded();

        assert_eq!(selectors.count.select(&state), 4);
        assert_eq!(selectors.open.select(&state).len(), 4);

        reduce(&mut state, CasesAction::Load);
        reduce(
            &mut state,
            CasesAction::LoadFailure {
                error: "network down".to_string(),
            },
        );
        assert_eq!(selectors.open.select(&state).len(), 4);
        assert_eq!(selectors.open.recomputations(), 1);

        let mut closed = state.items[1].as_ref().clone();
        closed.status = CaseStatus::Cerrado;
        reduce(&mut state, CasesAction::UpdateSuccess { case: closed });
        assert_eq!(selectors.open.select(&state).len(), 3);
        assert_eq!(selectors.open.recomputations(), 2);
        assert_eq!(selectors.count.select(&state), 4);
    }

    #[test]
    fn test_parameterized_selectors() {
        let mut state = loaded();
        let by_client = CaseSelectors::by_client(ClientId::from("3"));
        let by_matter = CaseSelectors::by_matter(Matter::Familiar);
        let nationality = CaseSelectors::nationality(CaseId::from("case-1"));

        assert_eq!(ids(&by_client.select(&state)), vec!["case-2"]);
        assert_eq!(ids(&by_matter.select(&state)), vec!["case-3"]);
        assert!(nationality.select(&state).is_some());

        // Updating a case swaps the list but not the nationality map
        let edited = state.items[0].as_ref().clone();
        reduce(&mut state, CasesAction::UpdateSuccess { case: edited });
        assert!(nationality.select(&state).is_some());
        assert_eq!(nationality.recomputations(), 1);
        let _ = by_client.select(&state);
        assert_eq!(by_client.recomputations(), 2);
    }
}
