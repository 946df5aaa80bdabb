//! Application-level composition
//!
//! [`AppState`] holds both slices side by side. Each slice reducer is scoped
//! into the app types with [`scope_reducer`] and the two are run together by
//! [`combine_reducers`], so an action of one slice never touches the other.
//! The cross-slice selectors here join cases with their owning clients.

use crate::cases::{
    self, CaseFilter, CaseList, CasesAction, CasesEnvironment, CasesReducer, CasesState,
};
use crate::clients::{self, ClientList, ClientsAction, ClientsEnvironment, ClientsReducer, ClientsState};
use crate::config::Config;
use crate::error::ServiceError;
use crate::model::{Case, Client, ClientId};
use crate::services::{
    CaseService, ClientService, LatencyProfile, MockBackend, MockCaseService, MockClientService,
    TimestampIdGenerator,
};
use casedesk_core::composition::{combine_reducers, scope_reducer, CombinedReducer, SharedReducer};
use casedesk_core::environment::{Clock, IdGenerator, SystemClock};
use casedesk_core::Selector;
use casedesk_runtime::Store;
use std::collections::HashMap;
use std::sync::Arc;

/// Shown where a case's client cannot be resolved
pub const UNKNOWN_CLIENT: &str = "N/A";

/// Root state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
    /// Clients slice
    pub clients: ClientsState,
    /// Cases slice
    pub cases: CasesState,
}

/// Root action, tagged by slice
#[derive(Clone, Debug, PartialEq)]
pub enum AppAction {
    /// Action of the clients slice
    Clients(ClientsAction),
    /// Action of the cases slice
    Cases(CasesAction),
}

impl AppAction {
    /// `"[Scope] Variant"` label of the wrapped action
    #[must_use]
    pub const fn action_type(&self) -> &'static str {
        match self {
            Self::Clients(action) => action.action_type(),
            Self::Cases(action) => action.action_type(),
        }
    }

    /// Returns true if the wrapped action resolves a request
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        match self {
            Self::Clients(action) => action.is_terminal(),
            Self::Cases(action) => action.is_terminal(),
        }
    }

    fn into_clients(self) -> Option<ClientsAction> {
        match self {
            Self::Clients(action) => Some(action),
            Self::Cases(_) => None,
        }
    }

    fn into_cases(self) -> Option<CasesAction> {
        match self {
            Self::Cases(action) => Some(action),
            Self::Clients(_) => None,
        }
    }
}

impl From<ClientsAction> for AppAction {
    fn from(action: ClientsAction) -> Self {
        Self::Clients(action)
    }
}

impl From<CasesAction> for AppAction {
    fn from(action: CasesAction) -> Self {
        Self::Cases(action)
    }
}

/// Root environment
#[derive(Clone, Debug)]
pub struct AppEnvironment {
    /// Clients slice dependencies
    pub clients: ClientsEnvironment,
    /// Cases slice dependencies
    pub cases: CasesEnvironment,
}

impl AppEnvironment {
    /// Environment over the given services
    #[must_use]
    pub fn new(clients: Arc<dyn ClientService>, cases: Arc<dyn CaseService>) -> Self {
        Self {
            clients: ClientsEnvironment::new(clients),
            cases: CasesEnvironment::new(cases),
        }
    }

    /// Mock services over one shared backend, set up from `config`
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Fixture`] if the bundled fixtures fail to parse.
    pub fn from_config(config: &Config) -> Result<Self, ServiceError> {
        let backend = if config.backend.seed_fixtures {
            MockBackend::seeded()?
        } else {
            MockBackend::empty()
        };
        let latency = LatencyProfile::default().scaled(config.backend.latency_scale);
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let ids: Arc<dyn IdGenerator> = Arc::new(TimestampIdGenerator::new(Arc::clone(&clock)));

        tracing::info!(
            seeded = config.backend.seed_fixtures,
            latency_scale = config.backend.latency_scale,
            "Mock backend ready"
        );

        Ok(Self::new(
            Arc::new(
                MockClientService::new(backend.clone(), Arc::clone(&clock), Arc::clone(&ids))
                    .with_latency(latency),
            ),
            Arc::new(MockCaseService::new(backend, clock, ids).with_latency(latency)),
        ))
    }
}

/// Reducer of the whole application
pub type AppReducer = CombinedReducer<AppState, AppAction, AppEnvironment>;

/// Store over the whole application
pub type AppStore = Store<AppState, AppAction, AppEnvironment, AppReducer>;

/// Both slice reducers scoped into the app types
#[must_use]
pub fn app_reducer() -> AppReducer {
    let clients: SharedReducer<AppState, AppAction, AppEnvironment> = Arc::new(scope_reducer(
        ClientsReducer::new(),
        |s: &mut AppState| &mut s.clients,
        AppAction::into_clients,
        AppAction::Clients,
        |e: &AppEnvironment| &e.clients,
    ));
    let cases: SharedReducer<AppState, AppAction, AppEnvironment> = Arc::new(scope_reducer(
        CasesReducer::new(),
        |s: &mut AppState| &mut s.cases,
        AppAction::into_cases,
        AppAction::Cases,
        |e: &AppEnvironment| &e.cases,
    ));
    combine_reducers(vec![clients, cases])
}

/// Store with empty state, configured from `config`
///
/// # Errors
///
/// See [`AppEnvironment::from_config`].
pub fn build_store(config: &Config) -> Result<AppStore, ServiceError> {
    Ok(Store::with_config(
        AppState::default(),
        app_reducer(),
        AppEnvironment::from_config(config)?,
        config.store_config(),
    ))
}

/// A case joined with its owning client
#[derive(Clone, Debug, PartialEq)]
pub struct CaseRow {
    /// The case
    pub case: Arc<Case>,
    /// Owner, if loaded
    pub client: Option<Arc<Client>>,
}

impl CaseRow {
    /// Owner's full name, or [`UNKNOWN_CLIENT`]
    #[must_use]
    pub fn client_name(&self) -> String {
        self.client
            .as_ref()
            .map_or_else(|| UNKNOWN_CLIENT.to_string(), |c| c.full_name())
    }
}

/// One pass over each collection: clients are indexed before cases are walked
fn join(cases: &[Arc<Case>], clients: &[Arc<Client>]) -> Vec<CaseRow> {
    let mut by_id: HashMap<&ClientId, &Arc<Client>> = HashMap::with_capacity(clients.len());
    for client in clients {
        by_id.entry(&client.id).or_insert(client);
    }
    cases
        .iter()
        .map(|case| CaseRow {
            case: Arc::clone(case),
            client: by_id.get(&case.client_id).copied().cloned(),
        })
        .collect()
}

fn filter_rows(rows: Vec<CaseRow>, filter: &CaseFilter) -> Vec<CaseRow> {
    rows.into_iter()
        .filter(|row| {
            let name = row.client.as_ref().map(|c| c.full_name());
            filter.matches(&row.case, name.as_deref())
        })
        .collect()
}

/// Full name of the client owning `case`, or `"N/A"`
#[must_use]
pub fn select_client_name(state: &AppState, case: &Case) -> String {
    clients::selectors::select_by_id(&state.clients, &case.client_id)
        .map_or_else(|| UNKNOWN_CLIENT.to_string(), |c| c.full_name())
}

/// Every case paired with its client
#[must_use]
pub fn select_cases_with_clients(state: &AppState) -> Vec<CaseRow> {
    join(&state.cases.items, &state.clients.items)
}

/// Cases of the selected client; empty when no client is selected
#[must_use]
pub fn select_selected_client_cases(state: &AppState) -> Vec<Arc<Case>> {
    state
        .clients
        .selected_id
        .as_ref()
        .map(|id| cases::selectors::select_by_client(&state.cases, id))
        .unwrap_or_default()
}

/// Cases passing `filter`, matched against the resolved client name
#[must_use]
pub fn select_filtered_cases(state: &AppState, filter: &CaseFilter) -> Vec<CaseRow> {
    filter_rows(select_cases_with_clients(state), filter)
}

type JoinKey = (CaseList, ClientList);

fn join_key(state: &AppState) -> JoinKey {
    (
        cases::selectors::select_all(&state.cases),
        clients::selectors::select_all(&state.clients),
    )
}

/// Memoized cross-slice views
#[derive(Debug)]
pub struct AppSelectors {
    /// Cases joined with their clients
    pub cases_with_clients: Selector<AppState, JoinKey, Arc<Vec<CaseRow>>>,
    /// Cases of the selected client
    pub selected_client_cases: Selector<AppState, (CaseList, Option<ClientId>), Arc<Vec<Arc<Case>>>>,
}

impl AppSelectors {
    /// Fresh selectors with empty caches
    #[must_use]
    pub fn new() -> Self {
        Self {
            cases_with_clients: Selector::new(join_key, |(cases, clients): &JoinKey| {
                Arc::new(join(cases, clients))
            }),
            selected_client_cases: Selector::new(
                |s: &AppState| {
                    (
                        cases::selectors::select_all(&s.cases),
                        clients::selectors::select_selected_id(&s.clients),
                    )
                },
                |(cases, selected): &(CaseList, Option<ClientId>)| {
                    Arc::new(selected.as_ref().map_or_else(Vec::new, |id| {
                        cases
                            .iter()
                            .filter(|c| &c.client_id == id)
                            .cloned()
                            .collect()
                    }))
                },
            ),
        }
    }

    /// Memoized [`select_filtered_cases`]
    #[must_use]
    pub fn filtered_cases(filter: CaseFilter) -> Selector<AppState, JoinKey, Arc<Vec<CaseRow>>> {
        Selector::new(join_key, move |(cases, clients): &JoinKey| {
            Arc::new(filter_rows(join(cases, clients), &filter))
        })
    }
}

impl Default for AppSelectors {
    fn default() -> Self {
        Self::new()
    }
}
