//! Effects of the clients slice
//!
//! One constructor per request action. Each returns a future that calls the
//! [`ClientService`](crate::services::ClientService) once and resolves to the
//! matching success or failure action.

use super::{ClientsAction, ClientsEnvironment};
use crate::model::{Client, ClientId, NewClient};
use crate::outcome::settle;
use casedesk_core::{async_effect, cancellable_effect, effect::Effect};
use std::sync::Arc;

/// Cancellation id shared by every client list load
///
/// Starting a load aborts the one in flight; its result is never reduced.
pub const LOAD_EFFECT_ID: &str = "clients.load";

/// Fetch the whole list
pub fn load(env: &ClientsEnvironment) -> Effect<ClientsAction> {
    let service = Arc::clone(&env.service);
    cancellable_effect! {
        id: LOAD_EFFECT_ID,
        async {
            settle(
                "clients.load",
                service.fetch_all().await,
                |clients| ClientsAction::LoadSuccess { clients },
                |error| ClientsAction::LoadFailure { error },
            )
        }
    }
}

/// Create a client
pub fn add(env: &ClientsEnvironment, draft: NewClient) -> Effect<ClientsAction> {
    let service = Arc::clone(&env.service);
    async_effect! {
        settle(
            "clients.add",
            service.create(draft).await,
            |client| ClientsAction::AddSuccess { client },
            |error| ClientsAction::AddFailure { error },
        )
    }
}

/// Save an edited client
pub fn update(env: &ClientsEnvironment, client: Client) -> Effect<ClientsAction> {
    let service = Arc::clone(&env.service);
    async_effect! {
        settle(
            "clients.update",
            service.update(client).await,
            |client| ClientsAction::UpdateSuccess { client },
            |error| ClientsAction::UpdateFailure { error },
        )
    }
}

/// Remove a client
pub fn delete(env: &ClientsEnvironment, client_id: ClientId) -> Effect<ClientsAction> {
    let service = Arc::clone(&env.service);
    async_effect! {
        let result = service.delete(client_id.clone()).await;
        settle(
            "clients.delete",
            result,
            |()| ClientsAction::DeleteSuccess { client_id },
            |error| ClientsAction::DeleteFailure { error },
        )
    }
}
