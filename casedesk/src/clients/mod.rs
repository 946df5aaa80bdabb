//! Clients slice
//!
//! - [`ClientsAction`]: what can happen to the client list
//! - [`ClientsReducer`]: folds actions into [`ClientsState`]
//! - [`ClientSelectors`]: memoized views over the state
//! - [`effects`]: calls into the [`ClientService`](crate::services::ClientService)

pub mod actions;
pub mod effects;
pub mod reducer;
pub mod selectors;
pub mod state;

pub use actions::ClientsAction;
pub use reducer::{ClientsEnvironment, ClientsReducer};
pub use selectors::{ClientFilter, ClientSelectors};
pub use state::{ClientList, ClientsState};
