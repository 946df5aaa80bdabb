//! In-memory data services
//!
//! Both mocks share one [`MockBackend`], so a case created through
//! [`MockCaseService`] and a client created through [`MockClientService`]
//! live in the same store. Every call sleeps for its configured latency
//! before answering.

use super::{
    CaseBundle, CaseService, ClientService, CreatedCase, Fixtures, LatencyProfile, ServiceResult,
};
use crate::error::ServiceError;
use crate::model::{Case, CaseId, CaseNationality, Client, ClientId, Matter, NewCase, NewClient};
use casedesk_core::environment::{Clock, IdGenerator};
use futures::future::BoxFuture;
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

#[derive(Debug, Default)]
struct BackendData {
    clients: Vec<Client>,
    cases: Vec<Case>,
    nationalities: Vec<CaseNationality>,
}

/// Shared backing store of the mock services
#[derive(Clone, Debug, Default)]
pub struct MockBackend {
    data: Arc<RwLock<BackendData>>,
}

impl MockBackend {
    /// A backend holding `fixtures`
    #[must_use]
    pub fn new(fixtures: Fixtures) -> Self {
        Self {
            data: Arc::new(RwLock::new(BackendData {
                clients: fixtures.clients,
                cases: fixtures.cases,
                nationalities: fixtures.nationalities,
            })),
        }
    }

    /// A backend seeded with [`Fixtures::bundled`]
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Fixture`] if the bundled fixtures do not parse.
    pub fn seeded() -> Result<Self, ServiceError> {
        Ok(Self::new(Fixtures::bundled()?))
    }

    /// A backend with no records
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Snapshot of the stored clients
    #[must_use]
    pub fn clients(&self) -> Vec<Client> {
        self.read(|data| data.clients.clone())
    }

    /// Snapshot of the stored cases
    #[must_use]
    pub fn cases(&self) -> Vec<Case> {
        self.read(|data| data.cases.clone())
    }

    /// Snapshot of the stored nationality records
    #[must_use]
    pub fn nationalities(&self) -> Vec<CaseNationality> {
        self.read(|data| data.nationalities.clone())
    }

    fn read<T>(&self, f: impl FnOnce(&BackendData) -> T) -> T {
        // Writers never panic halfway through an update
        f(&self.data.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn write<T>(&self, f: impl FnOnce(&mut BackendData) -> T) -> T {
        f(&mut self.data.write().unwrap_or_else(PoisonError::into_inner))
    }
}

/// One-shot failures queued for upcoming calls
#[derive(Clone, Debug, Default)]
struct FaultQueue(Arc<Mutex<VecDeque<String>>>);

impl FaultQueue {
    fn push(&self, message: String) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(message);
    }

    fn take(&self) -> Option<String> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }
}

/// Simulates one backend round trip: waits, then takes a queued fault
///
/// A call dropped during the wait leaves the queue untouched.
async fn round_trip(
    faults: &FaultQueue,
    operation: &'static str,
    latency: Duration,
) -> ServiceResult<()> {
    tracing::debug!(operation, ?latency, "Mock backend call");
    metrics::counter!("casedesk.backend.calls", "operation" => operation).increment(1);

    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }

    if let Some(message) = faults.take() {
        tracing::warn!(operation, error = %message, "Injected backend failure");
        metrics::counter!("casedesk.backend.failures", "operation" => operation).increment(1);
        return Err(ServiceError::Unavailable(message));
    }

    Ok(())
}

fn validation_error(missing: &[&str]) -> ServiceError {
    ServiceError::Validation(format!("missing required fields: {}", missing.join(", ")))
}

// ============================================================================
// Clients
// ============================================================================

/// In-memory [`ClientService`]
#[derive(Clone)]
pub struct MockClientService {
    backend: MockBackend,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    latency: LatencyProfile,
    faults: FaultQueue,
}

impl MockClientService {
    /// Create a service over `backend` with the default latency profile
    #[must_use]
    pub fn new(backend: MockBackend, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            backend,
            clock,
            ids,
            latency: LatencyProfile::default(),
            faults: FaultQueue::default(),
        }
    }

    /// Replace the latency profile
    #[must_use]
    pub const fn with_latency(mut self, latency: LatencyProfile) -> Self {
        self.latency = latency;
        self
    }

    /// Make the next call fail with [`ServiceError::Unavailable`]
    ///
    /// Faults queue up: injecting twice fails the next two calls.
    pub fn inject_failure(&self, message: impl Into<String>) {
        self.faults.push(message.into());
    }

    /// The backing store
    #[must_use]
    pub const fn backend(&self) -> &MockBackend {
        &self.backend
    }
}

impl std::fmt::Debug for MockClientService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockClientService")
            .field("backend", &self.backend)
            .field("latency", &self.latency)
            .finish_non_exhaustive()
    }
}

impl ClientService for MockClientService {
    fn fetch_all(&self) -> BoxFuture<'_, ServiceResult<Vec<Client>>> {
        Box::pin(async move {
            round_trip(&self.faults, "clients.fetch_all", self.latency.list).await?;
            Ok(self.backend.clients())
        })
    }

    fn fetch_by_id(&self, id: ClientId) -> BoxFuture<'_, ServiceResult<Option<Client>>> {
        Box::pin(async move {
            round_trip(&self.faults, "clients.fetch_by_id", self.latency.by_id).await?;
            Ok(self
                .backend
                .read(|data| data.clients.iter().find(|c| c.id == id).cloned()))
        })
    }

    fn create(&self, draft: NewClient) -> BoxFuture<'_, ServiceResult<Client>> {
        Box::pin(async move {
            round_trip(&self.faults, "clients.create", self.latency.create).await?;

            let missing = draft.missing_fields();
            if !missing.is_empty() {
                return Err(validation_error(&missing));
            }

            let id = ClientId::new(self.ids.next_id("client"));
            let client = Client::from_draft(id, draft, self.clock.now());
            self.backend.write(|data| data.clients.push(client.clone()));

            tracing::debug!(client_id = %client.id, "Client created");
            Ok(client)
        })
    }

    fn update(&self, client: Client) -> BoxFuture<'_, ServiceResult<Client>> {
        Box::pin(async move {
            round_trip(&self.faults, "clients.update", self.latency.update).await?;

            let mut client = client;
            client.updated_at = self.clock.now();

            self.backend.write(|data| {
                let stored = data
                    .clients
                    .iter_mut()
                    .find(|c| c.id == client.id)
                    .ok_or_else(|| ServiceError::client_not_found(&client.id))?;
                *stored = client.clone();
                Ok(client)
            })
        })
    }

    fn delete(&self, id: ClientId) -> BoxFuture<'_, ServiceResult<()>> {
        Box::pin(async move {
            round_trip(&self.faults, "clients.delete", self.latency.delete).await?;

            self.backend.write(|data| {
                let before = data.clients.len();
                data.clients.retain(|c| c.id != id);
                if data.clients.len() == before {
                    Err(ServiceError::client_not_found(&id))
                } else {
                    tracing::debug!(client_id = %id, "Client deleted");
                    Ok(())
                }
            })
        })
    }
}

// ============================================================================
// Cases
// ============================================================================

/// In-memory [`CaseService`]
#[derive(Clone)]
pub struct MockCaseService {
    backend: MockBackend,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    latency: LatencyProfile,
    faults: FaultQueue,
}

impl MockCaseService {
    /// Create a service over `backend` with the default latency profile
    #[must_use]
    pub fn new(backend: MockBackend, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            backend,
            clock,
            ids,
            latency: LatencyProfile::default(),
            faults: FaultQueue::default(),
        }
    }

    /// Replace the latency profile
    #[must_use]
    pub const fn with_latency(mut self, latency: LatencyProfile) -> Self {
        self.latency = latency;
        self
    }

    /// Make the next call fail with [`ServiceError::Unavailable`]
    pub fn inject_failure(&self, message: impl Into<String>) {
        self.faults.push(message.into());
    }

    /// The backing store
    #[must_use]
    pub const fn backend(&self) -> &MockBackend {
        &self.backend
    }

    fn store_new_case(
        &self,
        draft: NewCase,
        nationality: Option<CaseNationality>,
    ) -> ServiceResult<CreatedCase> {
        let missing = draft.missing_fields();
        if !missing.is_empty() {
            return Err(validation_error(&missing));
        }

        let id = CaseId::new(self.ids.next_id("case"));
        let case = Case::from_draft(id, draft, self.clock.now());

        let nationality = nationality
            .filter(|_| case.matter == Matter::Extranjeria)
            .map(|record| CaseNationality {
                case_id: case.id.clone(),
                ..record
            });

        if let Some(record) = &nationality {
            let errors = record.range_errors();
            if !errors.is_empty() {
                let detail: Vec<String> = errors
                    .into_iter()
                    .map(|(field, reason)| format!("{field} {reason}"))
                    .collect();
                return Err(ServiceError::Validation(detail.join(", ")));
            }
        }

        self.backend.write(|data| {
            data.cases.push(case.clone());
            if let Some(record) = &nationality {
                data.nationalities.push(record.clone());
            }
        });

        tracing::debug!(
            case_id = %case.id,
            with_nationality = nationality.is_some(),
            "Case created"
        );
        Ok(CreatedCase { case, nationality })
    }
}

impl std::fmt::Debug for MockCaseService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockCaseService")
            .field("backend", &self.backend)
            .field("latency", &self.latency)
            .finish_non_exhaustive()
    }
}

impl CaseService for MockCaseService {
    fn fetch_all(&self) -> BoxFuture<'_, ServiceResult<CaseBundle>> {
        Box::pin(async move {
            round_trip(&self.faults, "cases.fetch_all", self.latency.list).await?;
            Ok(self.backend.read(|data| CaseBundle {
                cases: data.cases.clone(),
                nationalities: data.nationalities.clone(),
            }))
        })
    }

    fn fetch_by_client(&self, client_id: ClientId) -> BoxFuture<'_, ServiceResult<CaseBundle>> {
        Box::pin(async move {
            round_trip(&self.faults, "cases.fetch_by_client", self.latency.by_client).await?;
            Ok(self.backend.read(|data| {
                let cases: Vec<Case> = data
                    .cases
                    .iter()
                    .filter(|c| c.client_id == client_id)
                    .cloned()
                    .collect();
                let case_ids: HashSet<&CaseId> = cases.iter().map(|c| &c.id).collect();
                let nationalities = data
                    .nationalities
                    .iter()
                    .filter(|n| case_ids.contains(&n.case_id))
                    .cloned()
                    .collect();
                CaseBundle {
                    cases,
                    nationalities,
                }
            }))
        })
    }

    fn fetch_by_id(&self, id: CaseId) -> BoxFuture<'_, ServiceResult<Option<Case>>> {
        Box::pin(async move {
            round_trip(&self.faults, "cases.fetch_by_id", self.latency.by_id).await?;
            Ok(self
                .backend
                .read(|data| data.cases.iter().find(|c| c.id == id).cloned()))
        })
    }

    fn fetch_nationality(
        &self,
        case_id: CaseId,
    ) -> BoxFuture<'_, ServiceResult<Option<CaseNationality>>> {
        Box::pin(async move {
            round_trip(&self.faults, "cases.fetch_nationality", self.latency.nationality).await?;
            Ok(self.backend.read(|data| {
                data.nationalities
                    .iter()
                    .find(|n| n.case_id == case_id)
                    .cloned()
            }))
        })
    }

    fn create(&self, draft: NewCase) -> BoxFuture<'_, ServiceResult<Case>> {
        Box::pin(async move {
            round_trip(&self.faults, "cases.create", self.latency.create).await?;
            self.store_new_case(draft, None).map(|created| created.case)
        })
    }

    fn create_with_nationality(
        &self,
        draft: NewCase,
        nationality: Option<CaseNationality>,
    ) -> BoxFuture<'_, ServiceResult<CreatedCase>> {
        Box::pin(async move {
            round_trip(
                &self.faults,
                "cases.create_with_nationality",
                self.latency.create_with_nationality,
            )
            .await?;
            self.store_new_case(draft, nationality)
        })
    }

    fn update(&self, case: Case) -> BoxFuture<'_, ServiceResult<Case>> {
        Box::pin(async move {
            round_trip(&self.faults, "cases.update", self.latency.update).await?;

            let mut case = case;
            case.updated_at = self.clock.now();

            self.backend.write(|data| {
                let stored = data
                    .cases
                    .iter_mut()
                    .find(|c| c.id == case.id)
                    .ok_or_else(|| ServiceError::case_not_found(&case.id))?;
                *stored = case.clone();
                Ok(case)
            })
        })
    }
}
