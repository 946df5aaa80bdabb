//! Reducer of the cases slice

use super::{effects, CasesAction, CasesState};
use crate::model::{Case, CaseNationality};
use crate::services::CaseService;
use casedesk_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
use std::collections::HashMap;
use std::sync::Arc;

/// Environment dependencies for the cases reducer
#[derive(Clone)]
pub struct CasesEnvironment {
    /// Data API the effects call
    pub service: Arc<dyn CaseService>,
}

impl CasesEnvironment {
    /// Creates a new `CasesEnvironment`
    #[must_use]
    pub fn new(service: Arc<dyn CaseService>) -> Self {
        Self { service }
    }
}

impl std::fmt::Debug for CasesEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CasesEnvironment").finish_non_exhaustive()
    }
}

/// Reducer for the cases slice
#[derive(Clone, Debug, Default)]
pub struct CasesReducer;

impl CasesReducer {
    /// Creates a new `CasesReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn begin_request(state: &mut CasesState) {
        state.loading = true;
        state.error = None;
    }

    fn finish_request(state: &mut CasesState) {
        state.loading = false;
        state.error = None;
    }

    fn apply_load(state: &mut CasesState, cases: Vec<Case>, nationalities: Vec<CaseNationality>) {
        state.items = Arc::new(cases.into_iter().map(Arc::new).collect());
        state.nationalities = Arc::new(
            nationalities
                .into_iter()
                .map(|n| (n.case_id.clone(), Arc::new(n)))
                .collect(),
        );
    }

    fn apply_add(state: &mut CasesState, case: Case, nationality: Option<CaseNationality>) {
        if let Some(record) = nationality {
            let mut map: HashMap<_, _> = state.nationalities.as_ref().clone();
            map.insert(case.id.clone(), Arc::new(record));
            state.nationalities = Arc::new(map);
        }

        let mut next = state.items.to_vec();
        next.push(Arc::new(case));
        state.items = Arc::new(next);
    }

    fn apply_update(state: &mut CasesState, case: Case) {
        let Some(position) = state.items.iter().position(|c| c.id == case.id) else {
            tracing::debug!(case_id = %case.id, "Updated case is not in the list");
            return;
        };
        let mut next = state.items.to_vec();
        next[position] = Arc::new(case);
        state.items = Arc::new(next);
    }
}

impl Reducer for CasesReducer {
    type State = CasesState;
    type Action = CasesAction;
    type Environment = CasesEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // Requests
            CasesAction::Load => {
                Self::begin_request(state);
                smallvec![effects::load(env)]
            },
            CasesAction::LoadByClient { client_id } => {
                Self::begin_request(state);
                smallvec![effects::load_by_client(env, client_id)]
            },
            CasesAction::Add { case } => {
                Self::begin_request(state);
                smallvec![effects::add(env, case)]
            },
            CasesAction::AddWithNationality { case, nationality } => {
                Self::begin_request(state);
                smallvec![effects::add_with_nationality(env, case, nationality)]
            },
            CasesAction::Update { case } => {
                Self::begin_request(state);
                smallvec![effects::update(env, case)]
            },

            // Results
            CasesAction::LoadSuccess {
                cases,
                nationalities,
            } => {
                Self::apply_load(state, cases, nationalities);
                Self::finish_request(state);
                smallvec![Effect::None]
            },
            CasesAction::AddSuccess { case, nationality } => {
                Self::apply_add(state, case, nationality);
                Self::finish_request(state);
                smallvec![Effect::None]
            },
            CasesAction::UpdateSuccess { case } => {
                Self::apply_update(state, case);
                Self::finish_request(state);
                smallvec![Effect::None]
            },
            CasesAction::LoadFailure { error }
            | CasesAction::AddFailure { error }
            | CasesAction::UpdateFailure { error } => {
                state.loading = false;
                state.error = Some(error);
                smallvec![Effect::None]
            },

            // Selection
            CasesAction::Select { case_id } => {
                state.selected_id = Some(case_id);
                smallvec![Effect::None]
            },
            CasesAction::ClearSelection => {
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
    use crate::model::{CaseId, ClientId, Matter, NewCase};
    use crate::services::{Fixtures, LatencyProfile, MockBackend, MockCaseService};
    use casedesk_testing::{assertions, run_effects, test_clock, ReducerTest, SequentialIdGenerator};
    use proptest::prelude::*;

    fn mock_service() -> MockCaseService {
        MockCaseService::new(
            MockBackend::empty(),
            Arc::new(test_clock()),
            Arc::new(SequentialIdGenerator::new()),
        )
        .with_latency(LatencyProfile::none())
    }

    fn test_env() -> CasesEnvironment {
        CasesEnvironment::new(Arc::new(mock_service()))
    }

    fn fixtures() -> Fixtures {
        Fixtures::bundled().unwrap()
    }

    fn loaded() -> CasesState {
        let fixtures = fixtures();
        let mut state = CasesState::new();
        let _ = CasesReducer.reduce(
            &mut state,
            CasesAction::LoadSuccess {
                cases: fixtures.cases,
                nationalities: fixtures.nationalities,
            },
            &test_env(),
        );
        state
    }

    #[test]
    fn test_initial_state() {
        let state = CasesState::new();
        assert!(state.is_empty());
        assert!(state.nationalities.is_empty());
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert!(state.selected_id.is_none());
    }

    #[test]
    fn test_every_request_sets_loading() {
        let requests = vec![
            CasesAction::Load,
            CasesAction::LoadByClient {
                client_id: ClientId::from("1"),
            },
            CasesAction::Add {
                case: NewCase::open("2025-001", ClientId::from("1"), Matter::Civil),
            },
            CasesAction::AddWithNationality {
                case: NewCase::open("2025-002", ClientId::from("2"), Matter::Extranjeria),
                nationality: None,
            },
            CasesAction::Update {
                case: fixtures().cases[0].clone(),
            },
        ];

        for request in requests {
            let mut state = CasesState {
                error: Some("old".to_string()),
                ..CasesState::new()
            };
            let effects = CasesReducer.reduce(&mut state, request, &test_env());
            assert!(state.loading);
            assert!(state.error.is_none());
            assertions::assert_has_future_effect(&effects);
        }
    }

    #[test]
    fn test_both_loads_share_a_cancellation_scope() {
        for request in [
            CasesAction::Load,
            CasesAction::LoadByClient {
                client_id: ClientId::from("2"),
            },
        ] {
            ReducerTest::new(CasesReducer::new())
                .with_env(test_env())
                .given_state(CasesState::new())
                .when_action(request)
                .then_effects(|effects| {
                    assertions::assert_has_cancellable_effect(effects, effects::LOAD_EFFECT_ID);
                })
                .run();
        }
    }

    #[test]
    fn test_load_success_rebuilds_nationality_map() {
        let fixtures = fixtures();
        let case = fixtures.cases[1].clone();

        ReducerTest::new(CasesReducer::new())
            .with_env(test_env())
            .given_state(loaded())
            .when_action(CasesAction::LoadSuccess {
                cases: vec![case],
                nationalities: vec![],
            })
            .then_state(|state| {
                assert_eq!(state.len(), 1);
                assert!(state.nationalities.is_empty());
                assert!(!state.loading);
            })
            .run();
    }

    #[test]
    fn test_add_success_inserts_nationality_under_new_id() {
        let mut case = fixtures().cases[0].clone();
        case.id = CaseId::from("case-9");
        let mut record = CaseNationality::for_case(CaseId::from("case-9"));
        record.oficina_extranjeria = Some("Oficina de Extranjería de Madrid".to_string());

        ReducerTest::new(CasesReducer::new())
            .with_env(test_env())
            .given_state(loaded())
            .when_action(CasesAction::AddSuccess {
                case,
                nationality: Some(record.clone()),
            })
            .then_state(move |state| {
                assert_eq!(state.len(), 5);
                assert_eq!(state.items[4].id, CaseId::from("case-9"));
                assert_eq!(
                    state.nationality(&CaseId::from("case-9")).map(|n| n.as_ref()),
                    Some(&record)
                );
                // Existing record is carried over
                assert!(state.nationality(&CaseId::from("case-1")).is_some());
            })
            .run();
    }

    #[test]
    fn test_add_success_without_nationality_keeps_map() {
        let before = loaded();
        let mut state = before.clone();
        let mut case = fixtures().cases[1].clone();
        case.id = CaseId::from("case-10");

        let _ = CasesReducer.reduce(
            &mut state,
            CasesAction::AddSuccess {
                case,
                nationality: None,
            },
            &test_env(),
        );

        assert!(Arc::ptr_eq(&before.nationalities, &state.nationalities));
        assert_eq!(before.len(), 4);
        assert_eq!(state.len(), 5);
    }

    #[test]
    fn test_update_success_replaces_in_place() {
        let before = loaded();
        let mut edited = before.items[3].as_ref().clone();
        edited.notes = Some("Resolución favorable".to_string());

        let mut after = before.clone();
        let _ = CasesReducer.reduce(
            &mut after,
            CasesAction::UpdateSuccess {
                case: edited.clone(),
            },
            &test_env(),
        );

        assert_eq!(after.items[3].as_ref(), &edited);
        for i in 0..3 {
            assert!(Arc::ptr_eq(&before.items[i], &after.items[i]));
        }
        assert!(Arc::ptr_eq(&before.nationalities, &after.nationalities));
    }

    #[test]
    fn test_failure_keeps_collections() {
        let state = loaded();
        let items = Arc::clone(&state.items);

        ReducerTest::new(CasesReducer::new())
            .with_env(test_env())
            .given_state(state)
            .given_actions(vec![CasesAction::Load])
            .when_action(CasesAction::LoadFailure {
                error: "network down".to_string(),
            })
            .then_state(move |state| {
                assert!(!state.loading);
                assert_eq!(state.error.as_deref(), Some("network down"));
                assert!(Arc::ptr_eq(&state.items, &items));
                assert_eq!(state.nationalities.len(), 1);
            })
            .run();
    }

    #[test]
    fn test_select_and_clear() {
        ReducerTest::new(CasesReducer::new())
            .with_env(test_env())
            .given_state(loaded())
            .given_actions(vec![
                CasesAction::Select {
                    case_id: CaseId::from("case-2"),
                },
                CasesAction::ClearSelection,
            ])
            .when_action(CasesAction::ClearSelection)
            .then_state(|state| assert!(state.selected_id.is_none()))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_writes_are_not_cancellable() {
        let writes = vec![
            CasesAction::Add {
                case: NewCase::open("2025-003", ClientId::from("1"), Matter::Familiar),
            },
            CasesAction::Update {
                case: fixtures().cases[2].clone(),
            },
        ];

        for write in writes {
            let effects = CasesReducer.reduce(&mut CasesState::new(), write, &test_env());
            assertions::assert_not_cancellable(&effects);
            assertions::assert_effects_count(&effects, 1);
        }
    }

    #[tokio::test]
    async fn test_add_with_nationality_round_trip() {
        let env = test_env();
        let mut state = CasesState::new();
        let mut record = CaseNationality::for_case(CaseId::from("draft"));
        record.residence_start_year = Some(2019);

        let effects = CasesReducer.reduce(
            &mut state,
            CasesAction::AddWithNationality {
                case: NewCase::open("2025-001", ClientId::from("3"), Matter::Extranjeria),
                nationality: Some(record),
            },
            &env,
        );
        for action in run_effects(effects).await {
            let _ = CasesReducer.reduce(&mut state, action, &env);
        }

        assert_eq!(state.len(), 1);
        let added = &state.items[0];
        assert_eq!(added.id, CaseId::from("case-1"));
        assert_eq!(added.matter, Matter::Extranjeria);
        assert_eq!(
            state.nationality(&added.id).and_then(|n| n.residence_start_year),
            Some(2019)
        );
        assert!(!state.loading);
    }

    fn action_strategy() -> impl Strategy<Value = CasesAction> {
        let fixtures = fixtures();
        let case_ids: Vec<CaseId> = fixtures.cases.iter().map(|c| c.id.clone()).collect();
        let pick_case = proptest::sample::select(fixtures.cases.clone());
        let nationalities = fixtures.nationalities.clone();

        prop_oneof![
            (proptest::sample::subsequence(fixtures.cases, 0..=4), any::<bool>()).prop_map(
                move |(cases, with_nationalities)| CasesAction::LoadSuccess {
                    cases,
                    nationalities: if with_nationalities {
                        nationalities.clone()
                    } else {
                        Vec::new()
                    },
                }
            ),
            pick_case.clone().prop_map(|case| {
                let nationality = case
                    .requires_nationality()
                    .then(|| CaseNationality::for_case(case.id.clone()));
                CasesAction::AddSuccess { case, nationality }
            }),
            pick_case.prop_map(|mut case| {
                case.sequence_number += 1;
                CasesAction::UpdateSuccess { case }
            }),
            proptest::sample::select(case_ids).prop_map(|case_id| CasesAction::Select { case_id }),
            Just(CasesAction::ClearSelection),
            "[a-z ]{0,12}".prop_map(|error| CasesAction::AddFailure { error }),
        ]
    }

    proptest! {
        #[test]
        fn prop_reducer_is_total_and_never_touches_snapshots(
            actions in proptest::collection::vec(action_strategy(), 0..40)
        ) {
            let env = test_env();
            let mut state = CasesState::new();

            for action in actions {
                let snapshot = state.clone();
                let frozen = (
                    snapshot.items.iter().map(|c| c.as_ref().clone()).collect::<Vec<_>>(),
                    snapshot.nationalities.len(),
                );

                let _ = CasesReducer.reduce(&mut state, action, &env);

                let still = (
                    snapshot.items.iter().map(|c| c.as_ref().clone()).collect::<Vec<_>>(),
                    snapshot.nationalities.len(),
                );
                prop_assert_eq!(frozen, still);
                for id in state.nationalities.keys() {
                    prop_assert_eq!(state.nationality(id).map(|n| &n.case_id), Some(id));
                }
            }
        }
    }
}
