//! # Casedesk
//!
//! Client and case state store for a legal practice.
//!
//! The state is split into two slices, [`clients`] and [`cases`]. Each slice
//! has an action enum, a reducer, memoized selectors and effects that call
//! the data services in [`services`]. [`app`] scopes both slices into one
//! [`AppState`](app::AppState) run by a
//! [`Store`](casedesk_runtime::Store).
//!
//! ## Example
//!
//! ```ignore
//! use casedesk::app::{build_store, AppAction};
//! use casedesk::clients::ClientsAction;
//! use casedesk::config::Config;
//!
//! let store = build_store(&Config::from_env())?;
//! store
//!     .send_and_wait_for(
//!         AppAction::Clients(ClientsAction::Load),
//!         AppAction::is_terminal,
//!         Duration::from_secs(5),
//!     )
//!     .await?;
//! let count = store.state(|s| s.clients.len()).await;
//! ```

pub mod app;
pub mod cases;
pub mod clients;
pub mod config;
pub mod error;
pub mod model;
pub mod services;

mod outcome;

pub use app::{app_reducer, build_store, AppAction, AppEnvironment, AppState, AppStore};
pub use config::Config;
pub use error::ServiceError;
