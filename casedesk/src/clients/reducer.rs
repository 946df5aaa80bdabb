//! Reducer of the clients slice

use super::{effects, ClientsAction, ClientsState};
use crate::model::{Client, ClientId};
use crate::services::ClientService;
use casedesk_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
use std::sync::Arc;

/// Environment dependencies for the clients reducer
#[derive(Clone)]
pub struct ClientsEnvironment {
    /// Data API the effects call
    pub service: Arc<dyn ClientService>,
}

impl ClientsEnvironment {
    /// Creates a new `ClientsEnvironment`
    #[must_use]
    pub fn new(service: Arc<dyn ClientService>) -> Self {
        Self { service }
    }
}

impl std::fmt::Debug for ClientsEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientsEnvironment").finish_non_exhaustive()
    }
}

/// Reducer for the clients slice
#[derive(Clone, Debug, Default)]
pub struct ClientsReducer;

impl ClientsReducer {
    /// Creates a new `ClientsReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn begin_request(state: &mut ClientsState) {
        state.loading = true;
        state.error = None;
    }

    fn finish_request(state: &mut ClientsState) {
        state.loading = false;
        state.error = None;
    }

    fn fail_request(state: &mut ClientsState, error: String) {
        state.loading = false;
        state.error = Some(error);
    }

    /// New list with `client` in place of the entry sharing its id
    ///
    /// Other entries are carried over by pointer. Returns `None` when no
    /// entry matches.
    fn replace(items: &[Arc<Client>], client: Client) -> Option<Vec<Arc<Client>>> {
        let position = items.iter().position(|c| c.id == client.id)?;
        let mut next = items.to_vec();
        next[position] = Arc::new(client);
        Some(next)
    }

    fn remove(items: &[Arc<Client>], id: &ClientId) -> Vec<Arc<Client>> {
        items.iter().filter(|c| &c.id != id).cloned().collect()
    }
}

impl Reducer for ClientsReducer {
    type State = ClientsState;
    type Action = ClientsAction;
    type Environment = ClientsEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // Requests
            ClientsAction::Load => {
                Self::begin_request(state);
                smallvec![effects::load(env)]
            },
            ClientsAction::Add { client } => {
                Self::begin_request(state);
                smallvec![effects::add(env, client)]
            },
            ClientsAction::Update { client } => {
                Self::begin_request(state);
                smallvec![effects::update(env, client)]
            },
            ClientsAction::Delete { client_id } => {
                Self::begin_request(state);
                smallvec![effects::delete(env, client_id)]
            },

            // Results
            ClientsAction::LoadSuccess { clients } => {
                state.items = Arc::new(clients.into_iter().map(Arc::new).collect());
                Self::finish_request(state);
                smallvec![Effect::None]
            },
            ClientsAction::AddSuccess { client } => {
                let mut next = state.items.to_vec();
                next.push(Arc::new(client));
                state.items = Arc::new(next);
                Self::finish_request(state);
                smallvec![Effect::None]
            },
            ClientsAction::UpdateSuccess { client } => {
                let id = client.id.clone();
                match Self::replace(&state.items, client) {
                    Some(next) => state.items = Arc::new(next),
                    None => tracing::debug!(client_id = %id, "Updated client is not in the list"),
                }
                Self::finish_request(state);
                smallvec![Effect::None]
            },
            ClientsAction::DeleteSuccess { client_id } => {
                state.items = Arc::new(Self::remove(&state.items, &client_id));
                if state.selected_id.as_ref() == Some(&client_id) {
                    state.selected_id = None;
                }
                Self::finish_request(state);
                smallvec![Effect::None]
            },
            ClientsAction::LoadFailure { error }
            | ClientsAction::AddFailure { error }
            | ClientsAction::UpdateFailure { error }
            | ClientsAction::DeleteFailure { error } => {
                Self::fail_request(state, error);
                smallvec![Effect::None]
            },

            // Selection
            ClientsAction::Select { client_id } => {
                state.selected_id = Some(client_id);
                smallvec![Effect::None]
            },
            ClientsAction::ClearSelection => {
                state.selected_id = None;
                smallvec![Effect::None]
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::NewClient;
    use crate::services::{Fixtures, LatencyProfile, MockBackend, MockClientService};
    use casedesk_testing::{assertions, run_effects, test_clock, ReducerTest, SequentialIdGenerator};
    use proptest::prelude::*;

    fn fixtures() -> Vec<Client> {
        Fixtures::bundled().unwrap().clients
    }

    fn mock_service() -> MockClientService {
        MockClientService::new(
            MockBackend::seeded().unwrap(),
            Arc::new(test_clock()),
            Arc::new(SequentialIdGenerator::new()),
        )
        .with_latency(LatencyProfile::none())
    }

    fn test_env() -> ClientsEnvironment {
        ClientsEnvironment::new(Arc::new(mock_service()))
    }

    fn loaded(clients: Vec<Client>) -> ClientsState {
        let mut state = ClientsState::new();
        let _ = ClientsReducer.reduce(
            &mut state,
            ClientsAction::LoadSuccess { clients },
            &test_env(),
        );
        state
    }

    #[test]
    fn test_initial_state() {
        let state = ClientsState::new();
        assert!(state.is_empty());
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert!(state.selected_id.is_none());
    }

    #[test]
    fn test_load_sets_loading_and_starts_cancellable_fetch() {
        ReducerTest::new(ClientsReducer::new())
            .with_env(test_env())
            .given_state(ClientsState {
                error: Some("stale".to_string()),
                ..ClientsState::new()
            })
            .when_action(ClientsAction::Load)
            .then_state(|state| {
                assert!(state.loading);
                assert!(state.error.is_none());
                assert!(state.is_empty());
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_cancellable_effect(effects, effects::LOAD_EFFECT_ID);
            })
            .run();
    }

    #[test]
    fn test_load_success_replaces_in_order() {
        let clients = fixtures();
        let (a, b) = (clients[0].clone(), clients[1].clone());

        ReducerTest::new(ClientsReducer::new())
            .with_env(test_env())
            .given_state(ClientsState::new())
            .given_actions(vec![ClientsAction::Load])
            .when_action(ClientsAction::LoadSuccess {
                clients: vec![a.clone(), b.clone()],
            })
            .then_state(move |state| {
                let ids: Vec<&ClientId> = state.items.iter().map(|c| &c.id).collect();
                assert_eq!(ids, vec![&a.id, &b.id]);
                assert!(!state.loading);
                assert!(state.error.is_none());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_empty_load_success_replaces_without_merging() {
        ReducerTest::new(ClientsReducer::new())
            .with_env(test_env())
            .given_state(loaded(fixtures()))
            .when_action(ClientsAction::LoadSuccess { clients: vec![] })
            .then_state(|state| assert!(state.is_empty()))
            .run();
    }

    #[test]
    fn test_add_success_appends() {
        let mut added = fixtures()[0].clone();
        added.id = ClientId::from("client-1");
        let expected = added.clone();

        ReducerTest::new(ClientsReducer::new())
            .with_env(test_env())
            .given_state(loaded(fixtures()))
            .given_actions(vec![ClientsAction::Add {
                client: NewClient::person("1", "Ana", "Ruiz"),
            }])
            .when_action(ClientsAction::AddSuccess { client: added })
            .then_state(move |state| {
                assert_eq!(state.len(), 6);
                assert_eq!(state.items.last().map(|c| c.as_ref()), Some(&expected));
                assert!(!state.loading);
            })
            .run();
    }

    #[test]
    fn test_update_success_preserves_identity_of_others() {
        let before = loaded(fixtures());
        let mut edited = fixtures()[2].clone();
        edited.email = Some("carlos@example.org".to_string());

        let mut after = before.clone();
        let _ = ClientsReducer.reduce(
            &mut after,
            ClientsAction::UpdateSuccess {
                client: edited.clone(),
            },
            &test_env(),
        );

        assert_eq!(after.get(&edited.id).map(|c| c.as_ref()), Some(&edited));
        assert_eq!(after.items.len(), before.items.len());
        for (old, new) in before.items.iter().zip(after.items.iter()) {
            if old.id == edited.id {
                assert!(!Arc::ptr_eq(old, new));
            } else {
                assert!(Arc::ptr_eq(old, new), "{} was rebuilt", old.id);
            }
        }
        // The earlier snapshot is untouched
        assert_eq!(before.items[2].email.as_deref(), Some("carlos.martinez@example.com"));
    }

    #[test]
    fn test_update_success_for_unknown_client_keeps_list() {
        let before = loaded(fixtures());
        let mut ghost = fixtures()[0].clone();
        ghost.id = ClientId::from("404");

        let mut after = before.clone();
        let _ = ClientsReducer.reduce(
            &mut after,
            ClientsAction::UpdateSuccess { client: ghost },
            &test_env(),
        );
        assert!(Arc::ptr_eq(&before.items, &after.items));
    }

    #[test]
    fn test_delete_success_clears_matching_selection() {
        ReducerTest::new(ClientsReducer::new())
            .with_env(test_env())
            .given_state(loaded(fixtures()))
            .given_actions(vec![ClientsAction::Select {
                client_id: ClientId::from("2"),
            }])
            .when_action(ClientsAction::DeleteSuccess {
                client_id: ClientId::from("2"),
            })
            .then_state(|state| {
                assert_eq!(state.len(), 4);
                assert!(state.get(&ClientId::from("2")).is_none());
                assert!(state.selected_id.is_none());
            })
            .run();
    }

    #[test]
    fn test_delete_success_keeps_other_selection() {
        ReducerTest::new(ClientsReducer::new())
            .with_env(test_env())
            .given_state(loaded(fixtures()))
            .given_actions(vec![ClientsAction::Select {
                client_id: ClientId::from("1"),
            }])
            .when_action(ClientsAction::DeleteSuccess {
                client_id: ClientId::from("2"),
            })
            .then_state(|state| {
                assert_eq!(state.selected_id, Some(ClientId::from("1")));
            })
            .run();
    }

    #[test]
    fn test_failure_keeps_collection() {
        let state = loaded(fixtures());
        let items = Arc::clone(&state.items);

        ReducerTest::new(ClientsReducer::new())
            .with_env(test_env())
            .given_state(state)
            .given_actions(vec![ClientsAction::Load])
            .when_action(ClientsAction::LoadFailure {
                error: "network down".to_string(),
            })
            .then_state(move |state| {
                assert!(!state.loading);
                assert_eq!(state.error.as_deref(), Some("network down"));
                assert!(Arc::ptr_eq(&state.items, &items));
            })
            .run();
    }

    #[test]
    fn test_clear_selection_when_unselected_is_identity() {
        let state = loaded(fixtures());
        let expected = state.clone();

        ReducerTest::new(ClientsReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(ClientsAction::ClearSelection)
            .then_state(move |state| assert_eq!(state, &expected))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_mutations_are_not_cancellable() {
        ReducerTest::new(ClientsReducer::new())
            .with_env(test_env())
            .given_state(ClientsState::new())
            .when_action(ClientsAction::Delete {
                client_id: ClientId::from("1"),
            })
            .then_effects(|effects| {
                assertions::assert_has_future_effect(effects);
                assertions::assert_not_cancellable(effects);
            })
            .run();
    }

    #[tokio::test]
    async fn test_load_effect_resolves_to_success() {
        let mut state = ClientsState::new();
        let effects = ClientsReducer.reduce(&mut state, ClientsAction::Load, &test_env());

        let actions = run_effects(effects).await;
        assert_eq!(actions.len(), 1);
        assert!(matches!(
            &actions[0],
            ClientsAction::LoadSuccess { clients } if clients.len() == 5
        ));
    }

    #[tokio::test]
    async fn test_failing_collaborator_resolves_to_failure() {
        let service = mock_service();
        service.inject_failure("network down");
        let env = ClientsEnvironment::new(Arc::new(service));

        let mut state = loaded(fixtures());
        let before = Arc::clone(&state.items);
        let effects = ClientsReducer.reduce(&mut state, ClientsAction::Load, &env);
        for action in run_effects(effects).await {
            let _ = ClientsReducer.reduce(&mut state, action, &env);
        }

        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("network down"));
        assert!(Arc::ptr_eq(&state.items, &before));
    }

    fn action_strategy() -> impl Strategy<Value = ClientsAction> {
        let clients = fixtures();
        let ids: Vec<ClientId> = clients
            .iter()
            .map(|c| c.id.clone())
            .chain(std::iter::once(ClientId::from("404")))
            .collect();
        let pick_client = proptest::sample::select(clients.clone());
        let pick_id = proptest::sample::select(ids);

        prop_oneof![
            proptest::sample::subsequence(clients, 0..=5)
                .prop_map(|clients| ClientsAction::LoadSuccess { clients }),
            pick_client
                .clone()
                .prop_map(|client| ClientsAction::AddSuccess { client }),
            (pick_client, "[a-z]{1,8}").prop_map(|(mut client, email)| {
                client.email = Some(email);
                ClientsAction::UpdateSuccess { client }
            }),
            pick_id
                .clone()
                .prop_map(|client_id| ClientsAction::DeleteSuccess { client_id }),
            pick_id.prop_map(|client_id| ClientsAction::Select { client_id }),
            Just(ClientsAction::ClearSelection),
            "[a-z ]{0,12}".prop_map(|error| ClientsAction::UpdateFailure { error }),
        ]
    }

    proptest! {
        #[test]
        fn prop_reducer_is_total_and_never_touches_snapshots(
            actions in proptest::collection::vec(action_strategy(), 0..40)
        ) {
            let env = test_env();
            let mut state = ClientsState::new();

            for action in actions {
                let snapshot = state.clone();
                let frozen: Vec<Client> = snapshot.items.iter().map(|c| c.as_ref().clone()).collect();

                let effects = ClientsReducer.reduce(&mut state, action, &env);

                prop_assert!(effects.iter().all(|e| matches!(e, Effect::None)));
                let still: Vec<Client> = snapshot.items.iter().map(|c| c.as_ref().clone()).collect();
                prop_assert_eq!(frozen, still);
                prop_assert!(!state.loading);
            }
        }
    }
}
