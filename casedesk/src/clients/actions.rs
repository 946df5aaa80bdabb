//! Actions of the clients slice

use crate::model::{Client, ClientId, NewClient};
use casedesk_macros::Action;

/// Everything that can happen to the client list
///
/// Each request (`Load`, `Add`, `Update`, `Delete`) resolves to exactly one
/// success or failure action, except a `Load` superseded by a later one.
#[derive(Action, Clone, Debug, PartialEq)]
#[action(scope = "Clients")]
pub enum ClientsAction {
    /// Fetch every client, replacing the list
    #[request]
    Load,

    /// The list was fetched
    #[success]
    LoadSuccess {
        /// Clients, in backend order
        clients: Vec<Client>,
    },

    /// Fetching the list failed
    #[failure]
    LoadFailure {
        /// Human-readable message
        error: String,
    },

    /// Create a client from a form draft
    #[request]
    Add {
        /// Draft without identity
        client: NewClient,
    },

    /// The client was created
    #[success]
    AddSuccess {
        /// Stored client, with id and timestamps
        client: Client,
    },

    /// Creating the client failed
    #[failure]
    AddFailure {
        /// Human-readable message
        error: String,
    },

    /// Save changes to an existing client
    #[request]
    Update {
        /// Client with the edited fields
        client: Client,
    },

    /// The changes were saved
    #[success]
    UpdateSuccess {
        /// Stored client
        client: Client,
    },

    /// Saving the changes failed
    #[failure]
    UpdateFailure {
        /// Human-readable message
        error: String,
    },

    /// Remove a client
    #[request]
    Delete {
        /// Client to remove
        client_id: ClientId,
    },

    /// The client was removed
    #[success]
    DeleteSuccess {
        /// Removed client
        client_id: ClientId,
    },

    /// Removing the client failed
    #[failure]
    DeleteFailure {
        /// Human-readable message
        error: String,
    },

    /// Mark a client as selected
    Select {
        /// Client to select
        client_id: ClientId,
    },

    /// Clear the selection
    ClearSelection,
}
