//! Read projections over [`ClientsState`]
//!
//! The free functions derive a view directly. [`ClientSelectors`] wraps the
//! ones that traverse the list in memoized [`Selector`]s, keyed on the list
//! `Arc` so they recompute only after the reducer swapped in a new list.

use super::{ClientList, ClientsState};
use crate::model::{Client, ClientId, ClientType};
use casedesk_core::Selector;
use std::sync::Arc;

/// Every client, in insertion order
#[must_use]
pub fn select_all(state: &ClientsState) -> ClientList {
    Arc::clone(&state.items)
}

/// Clients that have not been soft-deleted
#[must_use]
pub fn select_active(state: &ClientsState) -> Vec<Arc<Client>> {
    state
        .items
        .iter()
        .filter(|c| !c.is_deleted())
        .cloned()
        .collect()
}

/// Client with this id, or `None`
#[must_use]
pub fn select_by_id(state: &ClientsState, id: &ClientId) -> Option<Arc<Client>> {
    state.get(id).cloned()
}

/// A request is in flight
#[must_use]
pub const fn select_loading(state: &ClientsState) -> bool {
    state.loading
}

/// Message of the last failed request
#[must_use]
pub fn select_error(state: &ClientsState) -> Option<String> {
    state.error.clone()
}

/// Id of the selected client
#[must_use]
pub fn select_selected_id(state: &ClientsState) -> Option<ClientId> {
    state.selected_id.clone()
}

/// The selected client, if it is in the list
#[must_use]
pub fn select_selected(state: &ClientsState) -> Option<Arc<Client>> {
    state
        .selected_id
        .as_ref()
        .and_then(|id| select_by_id(state, id))
}

/// Number of clients
#[must_use]
pub fn select_count(state: &ClientsState) -> usize {
    state.items.len()
}

/// Clients of one type
#[must_use]
pub fn select_by_type(state: &ClientsState, client_type: ClientType) -> Vec<Arc<Client>> {
    state
        .items
        .iter()
        .filter(|c| c.client_type == client_type)
        .cloned()
        .collect()
}

/// Text search over the client list
///
/// The query is trimmed and compared case-insensitively against first name,
/// last name, nationality and client type. An empty query matches everyone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientFilter {
    query: String,
}

impl ClientFilter {
    /// Filter on `query`
    #[must_use]
    pub fn new(query: &str) -> Self {
        Self {
            query: query.trim().to_lowercase(),
        }
    }

    /// Normalized query
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns true if `client` matches the query
    #[must_use]
    pub fn matches(&self, client: &Client) -> bool {
        if self.query.is_empty() {
            return true;
        }
        [
            Some(client.first_name.as_str()),
            Some(client.last_name.as_str()),
            client.nationality.as_deref(),
            Some(client.client_type.as_str()),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&self.query))
    }

    /// Matching clients, in list order
    #[must_use]
    pub fn apply(&self, clients: &[Arc<Client>]) -> Vec<Arc<Client>> {
        clients
            .iter()
            .filter(|c| self.matches(c))
            .cloned()
            .collect()
    }
}

type ListSelector<T> = Selector<ClientsState, ClientList, T>;

/// Memoized client views
///
/// Share one bundle (`Arc<ClientSelectors>`) between the subscriptions that
/// read the same state.
#[derive(Debug)]
pub struct ClientSelectors {
    /// Non-deleted clients
    pub active: ListSelector<Arc<Vec<Arc<Client>>>>,
    /// Selected client joined with the list
    pub selected: Selector<ClientsState, (ClientList, Option<ClientId>), Option<Arc<Client>>>,
    /// Number of clients
    pub count: ListSelector<usize>,
}

impl ClientSelectors {
    /// Fresh selectors with empty caches
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: Selector::new(select_all, |items: &ClientList| {
                Arc::new(
                    items
                        .iter()
                        .filter(|c| !c.is_deleted())
                        .cloned()
                        .collect(),
                )
            }),
            selected: Selector::new(
                |s: &ClientsState| (select_all(s), select_selected_id(s)),
                |(items, selected): &(ClientList, Option<ClientId>)| {
                    selected
                        .as_ref()
                        .and_then(|id| items.iter().find(|c| &c.id == id).cloned())
                },
            ),
            count: Selector::new(select_all, |items: &ClientList| items.len()),
        }
    }

    /// Memoized [`select_by_type`]
    #[must_use]
    pub fn by_type(client_type: ClientType) -> ListSelector<Arc<Vec<Arc<Client>>>> {
        Selector::new(select_all, move |items: &ClientList| {
            Arc::new(
                items
                    .iter()
                    .filter(|c| c.client_type == client_type)
                    .cloned()
                    .collect(),
            )
        })
    }

    /// Memoized search results for `filter`
    #[must_use]
    pub fn search(filter: ClientFilter) -> ListSelector<Arc<Vec<Arc<Client>>>> {
        Selector::new(select_all, move |items: &ClientList| {
            Arc::new(filter.apply(items))
        })
    }

    /// Memoized [`select_by_id`]
    #[must_use]
    pub fn by_id(id: ClientId) -> ListSelector<Option<Arc<Client>>> {
        Selector::new(select_all, move |items: &ClientList| {
            items.iter().find(|c| c.id == id).cloned()
        })
    }
}

impl Default for ClientSelectors {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::clients::{ClientsAction, ClientsEnvironment, ClientsReducer};
    use crate::services::{Fixtures, LatencyProfile, MockBackend, MockClientService};
    use casedesk_core::environment::Clock;
    use casedesk_core::Reducer;
    use casedesk_testing::{test_clock, SequentialIdGenerator};

    fn env() -> ClientsEnvironment {
        ClientsEnvironment::new(Arc::new(
            MockClientService::new(
                MockBackend::empty(),
                Arc::new(test_clock()),
                Arc::new(SequentialIdGenerator::new()),
            )
            .with_latency(LatencyProfile::none()),
        ))
    }

    fn reduce(state: &mut ClientsState, action: ClientsAction) {
        let _ = ClientsReducer.reduce(state, action, &env());
    }

    fn loaded() -> ClientsState {
        let mut state = ClientsState::new();
        reduce(
            &mut state,
            ClientsAction::LoadSuccess {
                clients: Fixtures::bundled().unwrap().clients,
            },
        );
        state
    }

    #[test]
    fn test_select_by_id_absent_is_none() {
        let state = loaded();
        assert_eq!(
            select_by_id(&state, &ClientId::from("3")).map(|c| c.first_name.clone()),
            Some("Carlos".to_string())
        );
        assert!(select_by_id(&state, &ClientId::from("404")).is_none());
        assert!(select_by_id(&ClientsState::new(), &ClientId::from("1")).is_none());
    }

    #[test]
    fn test_select_selected_joins_id_with_list() {
        let mut state = loaded();
        assert!(select_selected(&state).is_none());

        reduce(
            &mut state,
            ClientsAction::Select {
                client_id: ClientId::from("5"),
            },
        );
        assert_eq!(
            select_selected(&state).map(|c| c.full_name()),
            Some("Empresa Legal S.L.".to_string())
        );

        // Selected id that is not (yet) loaded
        reduce(
            &mut state,
            ClientsAction::Select {
                client_id: ClientId::from("99"),
            },
        );
        assert!(select_selected(&state).is_none());
        assert_eq!(select_selected_id(&state), Some(ClientId::from("99")));
    }

    #[test]
    fn test_select_by_type() {
        let state = loaded();
        assert_eq!(select_by_type(&state, ClientType::Fisico).len(), 4);
        assert_eq!(select_by_type(&state, ClientType::Juridico).len(), 1);
        assert_eq!(select_count(&state), 5);
    }

    #[test]
    fn test_active_excludes_soft_deleted() {
        let mut state = loaded();
        let mut gone = state.items[0].as_ref().clone();
        gone.deleted_at = Some(test_clock().now());
        reduce(&mut state, ClientsAction::UpdateSuccess { client: gone });

        assert_eq!(select_active(&state).len(), 4);
        assert_eq!(ClientSelectors::new().active.select(&state).len(), 4);
        assert_eq!(select_count(&state), 5);
    }

    #[test]
    fn test_filter_matches_names_nationality_and_type() {
        let state = loaded();
        let names = |query: &str| -> Vec<String> {
            ClientFilter::new(query)
                .apply(&state.items)
                .iter()
                .map(|c| c.id.to_string())
                .collect()
        };

        assert_eq!(names(""), vec!["1", "2", "3", "4", "5"]);
        assert_eq!(names("  MARÍA "), vec!["2"]);
        assert_eq!(names("garcía"), vec!["1"]);
        assert_eq!(names("española"), vec!["1", "5"]);
        assert_eq!(names("juridico"), vec!["5"]);
        assert!(names("zzz").is_empty());
    }

    #[test]
    fn test_memoized_selectors_skip_unchanged_lists() {
        let selectors = ClientSelectors::new();
        let mut state = loaded();

        assert_eq!(selectors.count.select(&state), 5);
        assert_eq!(selectors.active.select(&state).len(), 5);

        // Flags and selection leave the list alone
        reduce(&mut state, ClientsAction::Load);
        reduce(
            &mut state,
            ClientsAction::LoadFailure {
                error: "network down".to_string(),
            },
        );
        assert_eq!(selectors.count.select(&state), 5);
        assert_eq!(selectors.active.select(&state).len(), 5);
        assert_eq!(selectors.count.recomputations(), 1);
        assert_eq!(selectors.active.recomputations(), 1);

        reduce(
            &mut state,
            ClientsAction::DeleteSuccess {
                client_id: ClientId::from("1"),
            },
        );
        assert_eq!(selectors.count.select(&state), 4);
        assert_eq!(selectors.count.recomputations(), 2);
    }

    #[test]
    fn test_selected_recomputes_on_selection_change() {
        let selectors = ClientSelectors::new();
        let mut state = loaded();

        assert!(selectors.selected.select(&state).is_none());
        reduce(
            &mut state,
            ClientsAction::Select {
                client_id: ClientId::from("2"),
            },
        );
        let selected = selectors.selected.select(&state).unwrap();
        assert!(Arc::ptr_eq(&selected, &state.items[1]));
        let _ = selectors.selected.select(&state);
        assert_eq!(selectors.selected.recomputations(), 2);
    }

    #[test]
    fn test_parameterized_selectors() {
        let state = loaded();
        let by_type = ClientSelectors::by_type(ClientType::Juridico);
        let by_id = ClientSelectors::by_id(ClientId::from("4"));
        let search = ClientSelectors::search(ClientFilter::new("colombiana"));

        assert_eq!(by_type.select(&state).len(), 1);
        assert_eq!(by_id.select(&state).map(|c| c.first_name.clone()), Some("Ana".to_string()));
        assert_eq!(search.select(&state)[0].id, ClientId::from("2"));

        let _ = search.select(&state.clone());
        assert_eq!(search.recomputations(), 1);
    }
}
