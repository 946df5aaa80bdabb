//! Command-line walkthrough of the casedesk store.
//!
//! Loads the mock clients and cases, opens an immigration case with its
//! nationality record and prints the joined views.
//!
//! # Usage
//!
//! ```bash
//! CASEDESK_LATENCY_SCALE=0.2 RUST_LOG=casedesk=debug cargo run --bin casedesk
//! ```

use anyhow::Context;
use casedesk::app::{build_store, select_client_name, AppAction, AppSelectors, AppStore};
use casedesk::cases::{CaseFilter, CasesAction};
use casedesk::clients::{ClientSelectors, ClientsAction};
use casedesk::model::{CaseId, CaseNationality, ClientId, Matter, NewCase, ResidenceType};
use casedesk::Config;
use futures::StreamExt;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();
    init_tracing(&config);

    info!("=== Casedesk ===");

    let store = build_store(&config).context("failed to set up the mock backend")?;

    // Loading indicator, printed whenever it flips
    let mut loading = Box::pin(store.subscribe(|s| s.clients.loading || s.cases.loading));
    let watcher = tokio::spawn(async move {
        while let Some(busy) = loading.next().await {
            info!(busy, "Loading");
        }
    });

    request(&store, ClientsAction::Load).await?;
    request(&store, CasesAction::Load).await?;

    let clients = ClientSelectors::new();
    let active = store.state(|s| clients.active.select(&s.clients)).await;
    println!("\nClients ({}):", active.len());
    for client in active.iter() {
        println!(
            "  {:<4} {:<28} {:<10} {}",
            client.id,
            client.full_name(),
            client.client_type.label(),
            client.nationality.as_deref().unwrap_or("-"),
        );
    }

    let joined = AppSelectors::new();
    print_cases(&store, &joined).await;

    // Open an immigration case for Ana with her residence details
    let mut nationality = CaseNationality::for_case(CaseId::default());
    nationality.residence_type = Some(ResidenceType::Residencia);
    nationality.residence_start_year = Some(2015);
    let draft = NewCase::open("2025-001", ClientId::from("4"), Matter::Extranjeria)
        .with_notes("Solicitud de nacionalidad por residencia");
    let created = request(
        &store,
        CasesAction::AddWithNationality {
            case: draft,
            nationality: Some(nationality),
        },
    )
    .await?;
    if let AppAction::Cases(CasesAction::AddSuccess { case, nationality }) = created {
        println!(
            "\nOpened {} for {} (nationality record: {})",
            case.case_number,
            store.state(|s| select_client_name(s, &case)).await,
            if nationality.is_some() { "yes" } else { "no" },
        );
    }

    request(
        &store,
        ClientsAction::Select {
            client_id: ClientId::from("4"),
        },
    )
    .await?;
    let selected = store
        .state(|s| joined.selected_client_cases.select(s))
        .await;
    println!("\nCases of the selected client: {}", selected.len());

    let search = AppSelectors::filtered_cases(CaseFilter::new("").with_matter(Matter::Extranjeria));
    let immigration = store.state(|s| search.select(s)).await;
    println!("Immigration cases: {}", immigration.len());

    store
        .shutdown_gracefully()
        .await
        .context("effects still running at shutdown")?;
    drop(store);
    watcher.abort();

    info!("Done");
    Ok(())
}

/// Send an action; for requests, wait until its result has been reduced
async fn request(store: &AppStore, action: impl Into<AppAction>) -> anyhow::Result<AppAction> {
    let action = action.into();
    let label = action.action_type();

    if !is_request(&action) {
        store.send(action.clone()).await?;
        return Ok(action);
    }

    let result = store
        .send_and_wait_for(action, AppAction::is_terminal, REQUEST_TIMEOUT)
        .await
        .with_context(|| format!("{label} did not complete"))?;
    info!(request = label, result = result.action_type(), "Request settled");
    Ok(result)
}

fn is_request(action: &AppAction) -> bool {
    match action {
        AppAction::Clients(action) => action.is_request(),
        AppAction::Cases(action) => action.is_request(),
    }
}

async fn print_cases(store: &AppStore, selectors: &AppSelectors) {
    let rows = store.state(|s| selectors.cases_with_clients.select(s)).await;
    println!("\nCases ({}):", rows.len());
    for row in rows.iter() {
        let nationality = store
            .state(|s| s.cases.nationality(&row.case.id).is_some())
            .await;
        println!(
            "  {:<10} {:<12} {:<14} {:<26}{}",
            row.case.case_number,
            row.case.matter.label(),
            row.case.status.label(),
            row.client_name(),
            if nationality { " [nacionalidad]" } else { "" },
        );
    }
}

fn init_tracing(config: &Config) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
