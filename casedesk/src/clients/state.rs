//! State of the clients slice

use crate::model::{Client, ClientId};
use std::sync::Arc;

/// Shared, immutable client list
pub type ClientList = Arc<Vec<Arc<Client>>>;

/// Client list with request status and selection
///
/// `items` is never mutated in place. Every change swaps in a new `Arc`, so
/// a clone of this state taken earlier keeps seeing the old list and
/// selectors can detect changes by pointer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClientsState {
    /// Clients in insertion order
    pub items: ClientList,
    /// A request is in flight
    pub loading: bool,
    /// Message of the last failed request
    pub error: Option<String>,
    /// Currently selected client
    pub selected_id: Option<ClientId>,
}

impl ClientsState {
    /// Empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Client with this id
    #[must_use]
    pub fn get(&self, id: &ClientId) -> Option<&Arc<Client>> {
        self.items.iter().find(|c| &c.id == id)
    }

    /// Number of clients
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no clients
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
