//! Effects of the cases slice

use super::{CasesAction, CasesEnvironment};
use crate::model::{Case, CaseNationality, ClientId, NewCase};
use crate::outcome::settle;
use crate::services::CaseBundle;
use casedesk_core::{async_effect, cancellable_effect, effect::Effect};
use std::sync::Arc;

/// Cancellation id shared by `Load` and `LoadByClient`
pub const LOAD_EFFECT_ID: &str = "cases.load";

fn loaded(bundle: CaseBundle) -> CasesAction {
    CasesAction::LoadSuccess {
        cases: bundle.cases,
        nationalities: bundle.nationalities,
    }
}

/// Fetch every case
pub fn load(env: &CasesEnvironment) -> Effect<CasesAction> {
    let service = Arc::clone(&env.service);
    cancellable_effect! {
        id: LOAD_EFFECT_ID,
        async {
            settle(
                "cases.load",
                service.fetch_all().await,
                loaded,
                |error| CasesAction::LoadFailure { error },
            )
        }
    }
}

/// Fetch the cases of one client
pub fn load_by_client(env: &CasesEnvironment, client_id: ClientId) -> Effect<CasesAction> {
    let service = Arc::clone(&env.service);
    cancellable_effect! {
        id: LOAD_EFFECT_ID,
        async {
            settle(
                "cases.load_by_client",
                service.fetch_by_client(client_id).await,
                loaded,
                |error| CasesAction::LoadFailure { error },
            )
        }
    }
}

/// Create a case
pub fn add(env: &CasesEnvironment, draft: NewCase) -> Effect<CasesAction> {
    let service = Arc::clone(&env.service);
    async_effect! {
        settle(
            "cases.add",
            service.create(draft).await,
            |case| CasesAction::AddSuccess { case, nationality: None },
            |error| CasesAction::AddFailure { error },
        )
    }
}

/// Create a case with its nationality record
pub fn add_with_nationality(
    env: &CasesEnvironment,
    draft: NewCase,
    nationality: Option<CaseNationality>,
) -> Effect<CasesAction> {
    let service = Arc::clone(&env.service);
    async_effect! {
        settle(
            "cases.add_with_nationality",
            service.create_with_nationality(draft, nationality).await,
            |created| CasesAction::AddSuccess {
                case: created.case,
                nationality: created.nationality,
            },
            |error| CasesAction::AddFailure { error },
        )
    }
}

/// Save an edited case
pub fn update(env: &CasesEnvironment, case: Case) -> Effect<CasesAction> {
    let service = Arc::clone(&env.service);
    async_effect! {
        settle(
            "cases.update",
            service.update(case).await,
            |case| CasesAction::UpdateSuccess { case },
            |error| CasesAction::UpdateFailure { error },
        )
    }
}
