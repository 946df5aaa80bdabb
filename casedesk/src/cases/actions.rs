//! Actions of the cases slice

use crate::model::{Case, CaseId, CaseNationality, ClientId, NewCase};
use casedesk_macros::Action;

/// Everything that can happen to the case list
///
/// `Load` and `LoadByClient` share one cancellation scope: whichever was
/// dispatched last wins.
#[derive(Action, Clone, Debug, PartialEq)]
#[action(scope = "Cases")]
pub enum CasesAction {
    /// Fetch every case
    #[request]
    Load,

    /// Fetch the cases of one client
    #[request]
    LoadByClient {
        /// Owning client
        client_id: ClientId,
    },

    /// Cases were fetched; replaces the list and the nationality map
    #[success]
    LoadSuccess {
        /// Cases, in backend order
        cases: Vec<Case>,
        /// Nationality records of those cases
        nationalities: Vec<CaseNationality>,
    },

    /// Fetching cases failed
    #[failure]
    LoadFailure {
        /// Human-readable message
        error: String,
    },

    /// Create a case from a form draft
    #[request]
    Add {
        /// Draft without identity
        case: NewCase,
    },

    /// Create a case together with its nationality record
    #[request]
    AddWithNationality {
        /// Draft without identity
        case: NewCase,
        /// Kept only for immigration cases
        nationality: Option<CaseNationality>,
    },

    /// The case was created
    #[success]
    AddSuccess {
        /// Stored case
        case: Case,
        /// Stored nationality record, bound to `case.id`
        nationality: Option<CaseNationality>,
    },

    /// Creating the case failed
    #[failure]
    AddFailure {
        /// Human-readable message
        error: String,
    },

    /// Save changes to an existing case
    #[request]
    Update {
        /// Case with the edited fields
        case: Case,
    },

    /// The changes were saved
    #[success]
    UpdateSuccess {
        /// Stored case
        case: Case,
    },

    /// Saving the changes failed
    #[failure]
    UpdateFailure {
        /// Human-readable message
        error: String,
    },

    /// Mark a case as selected
    Select {
        /// Case to select
        case_id: CaseId,
    },

    /// Clear the selection
    ClearSelection,
}
