//! Selector benchmarks
//!
//! Compares memoized selectors against recomputing the view on every read,
//! over a client and case list of realistic office size.
//!
//! Run with: `cargo bench --bench selectors`

#![allow(missing_docs)] // Benchmarks don't need extensive docs
#![allow(clippy::expect_used)] // Benchmarks can use expect for setup

use casedesk::app::{select_filtered_cases, AppSelectors, AppState};
use casedesk::cases::{CaseFilter, CasesState};
use casedesk::clients::{selectors as client_selectors, ClientFilter, ClientSelectors, ClientsState};
use casedesk::model::{CaseId, ClientId};
use casedesk::services::Fixtures;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

/// Fixture records repeated until there are `clients` clients
fn office(clients: usize) -> AppState {
    let fixtures = Fixtures::bundled().expect("bundled fixtures parse");

    let client_items = (0..clients)
        .map(|i| {
            let mut client = fixtures.clients[i % fixtures.clients.len()].clone();
            client.id = ClientId::new(format!("client-{i}"));
            Arc::new(client)
        })
        .collect();
    let case_items = (0..clients * 2)
        .map(|i| {
            let mut case = fixtures.cases[i % fixtures.cases.len()].clone();
            case.id = CaseId::new(format!("case-{i}"));
            case.client_id = ClientId::new(format!("client-{}", i / 2));
            Arc::new(case)
        })
        .collect();

    AppState {
        clients: ClientsState {
            items: Arc::new(client_items),
            ..ClientsState::default()
        },
        cases: CasesState {
            items: Arc::new(case_items),
            ..CasesState::default()
        },
    }
}

fn benchmark_active_clients(c: &mut Criterion) {
    let mut group = c.benchmark_group("active_clients");

    for size in [100, 1_000] {
        let state = office(size);
        let selectors = ClientSelectors::new();

        group.bench_with_input(BenchmarkId::new("memoized", size), &state, |b, state| {
            b.iter(|| black_box(selectors.active.select(black_box(&state.clients))));
        });
        group.bench_with_input(BenchmarkId::new("plain", size), &state, |b, state| {
            b.iter(|| black_box(client_selectors::select_active(black_box(&state.clients))));
        });
    }

    group.finish();
}

fn benchmark_client_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("client_search");
    let state = office(1_000);
    let search = ClientSelectors::search(ClientFilter::new("gonzález"));

    group.bench_function("memoized", |b| {
        b.iter(|| black_box(search.select(black_box(&state.clients))));
    });
    group.bench_function("plain", |b| {
        let filter = ClientFilter::new("gonzález");
        b.iter(|| black_box(filter.apply(black_box(&state.clients.items))));
    });

    group.finish();
}

fn benchmark_case_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("case_join");
    let state = office(500);
    let filter = CaseFilter::new("martínez");
    let memoized = AppSelectors::filtered_cases(filter.clone());
    let selectors = AppSelectors::new();

    group.bench_function("filtered_memoized", |b| {
        b.iter(|| black_box(memoized.select(black_box(&state))));
    });
    group.bench_function("filtered_plain", |b| {
        b.iter(|| black_box(select_filtered_cases(black_box(&state), &filter)));
    });
    group.bench_function("join_memoized", |b| {
        b.iter(|| black_box(selectors.cases_with_clients.select(black_box(&state))));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_active_clients,
    benchmark_client_search,
    benchmark_case_join
);
criterion_main!(benches);
