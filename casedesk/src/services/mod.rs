//! Data services behind the effects.
//!
//! [`ClientService`] and [`CaseService`] describe the data API the slices
//! talk to. The only implementations today are the in-memory mocks in
//! [`mock`], which simulate network latency over a shared backing store
//! seeded from [`fixtures`].
//!
//! Methods return boxed futures so the services can be held as
//! `Arc<dyn ClientService>` in an environment and swapped in tests.

use crate::error::ServiceError;
use crate::model::{Case, CaseId, CaseNationality, Client, ClientId, NewCase, NewClient};
use futures::future::BoxFuture;

pub mod fixtures;
pub mod id_generator;
pub mod latency;
pub mod mock;

pub use fixtures::Fixtures;
pub use id_generator::TimestampIdGenerator;
pub use latency::LatencyProfile;
pub use mock::{MockBackend, MockCaseService, MockClientService};

/// Result type of every service call
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Cases together with the nationality records that belong to them
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CaseBundle {
    /// Cases, in backend order
    pub cases: Vec<Case>,
    /// Nationality records of those cases
    pub nationalities: Vec<CaseNationality>,
}

/// A newly created case and its nationality record, if one was kept
#[derive(Clone, Debug, PartialEq)]
pub struct CreatedCase {
    /// The stored case, with id and timestamps assigned
    pub case: Case,
    /// The stored nationality record, bound to `case.id`
    pub nationality: Option<CaseNationality>,
}

/// Data API for clients
pub trait ClientService: Send + Sync {
    /// Every client
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unavailable.
    fn fetch_all(&self) -> BoxFuture<'_, ServiceResult<Vec<Client>>>;

    /// One client, or `None` if no client has this id
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unavailable.
    fn fetch_by_id(&self, id: ClientId) -> BoxFuture<'_, ServiceResult<Option<Client>>>;

    /// Store a new client, assigning its id and timestamps
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] for an incomplete draft, or an
    /// error if the backend is unavailable.
    fn create(&self, draft: NewClient) -> BoxFuture<'_, ServiceResult<Client>>;

    /// Replace a stored client, refreshing `updated_at`
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] for an unknown id, or an error if
    /// the backend is unavailable.
    fn update(&self, client: Client) -> BoxFuture<'_, ServiceResult<Client>>;

    /// Remove a client
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] for an unknown id, or an error if
    /// the backend is unavailable.
    fn delete(&self, id: ClientId) -> BoxFuture<'_, ServiceResult<()>>;
}

/// Data API for cases and their nationality records
pub trait CaseService: Send + Sync {
    /// Every case and every nationality record
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unavailable.
    fn fetch_all(&self) -> BoxFuture<'_, ServiceResult<CaseBundle>>;

    /// Cases of one client and their nationality records
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unavailable.
    fn fetch_by_client(&self, client_id: ClientId) -> BoxFuture<'_, ServiceResult<CaseBundle>>;

    /// One case, or `None` if no case has this id
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unavailable.
    fn fetch_by_id(&self, id: CaseId) -> BoxFuture<'_, ServiceResult<Option<Case>>>;

    /// Nationality record of a case, or `None`
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unavailable.
    fn fetch_nationality(
        &self,
        case_id: CaseId,
    ) -> BoxFuture<'_, ServiceResult<Option<CaseNationality>>>;

    /// Store a new case
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] for an incomplete draft, or an
    /// error if the backend is unavailable.
    fn create(&self, draft: NewCase) -> BoxFuture<'_, ServiceResult<Case>>;

    /// Store a new case with its nationality record
    ///
    /// The record is kept only for [`Matter::Extranjeria`](crate::model::Matter)
    /// cases, and is rebound to the new case id.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] for an incomplete draft or an
    /// out-of-range nationality record, or an error if the backend is
    /// unavailable.
    fn create_with_nationality(
        &self,
        draft: NewCase,
        nationality: Option<CaseNationality>,
    ) -> BoxFuture<'_, ServiceResult<CreatedCase>>;

    /// Replace a stored case, refreshing `updated_at`
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] for an unknown id, or an error if
    /// the backend is unavailable.
    fn update(&self, case: Case) -> BoxFuture<'_, ServiceResult<Case>>;
}
