//! # Casedesk Testing
//!
//! Testing utilities and helpers for the casedesk state store.
//!
//! This crate provides:
//! - Deterministic implementations of Environment traits
//! - A Given-When-Then harness for reducers
//! - Helpers that run effect descriptions without a `Store`
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use casedesk_testing::{test_clock, ReducerTest};
//!
//! ReducerTest::new(ClientsReducer)
//!     .with_env(test_environment())
//!     .given_state(ClientsState::default())
//!     .when_action(ClientsAction::Load)
//!     .then_state(|state| assert!(state.loading))
//!     .run();
//! ```

use casedesk_core::environment::{Clock, IdGenerator};
use chrono::{DateTime, Utc};


/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, IdGenerator, Utc};
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use casedesk_testing::mocks::FixedClock;
    /// use casedesk_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::days(20_089))
    }

    /// Predictable ids: `{prefix}-1`, `{prefix}-2`, ...
    ///
    /// # Example
    ///
    /// ```
    /// use casedesk_testing::mocks::SequentialIdGenerator;
    /// use casedesk_core::environment::IdGenerator;
    ///
    /// let ids = SequentialIdGenerator::new();
    /// assert_eq!(ids.next_id("client"), "client-1");
    /// assert_eq!(ids.next_id("case"), "case-2");
    /// ```
    #[derive(Debug, Default)]
    pub struct SequentialIdGenerator {
        next: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Create a generator starting at 1
        #[must_use]
        pub const fn new() -> Self {
            Self {
                next: AtomicU64::new(0),
            }
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self, prefix: &str) -> String {
            let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
            format!("{prefix}-{n}")
        }
    }
}

/// Test helpers and utilities
pub mod helpers {
    use casedesk_core::effect::Effect;
    use futures::future::{join_all, BoxFuture};
    use futures::FutureExt;

    /// Install a `tracing` subscriber that writes through the test harness
    ///
    /// Honors `RUST_LOG`. Safe to call from every test; only the first call
    /// installs the subscriber.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    /// Execute effect descriptions directly and collect the actions they produce
    ///
    /// Parallel branches are joined, sequential ones awaited in order and
    /// delays honored. Cancellation wrappers are transparent since nothing
    /// else runs concurrently; `Effect::Cancel` produces nothing.
    pub async fn run_effects<A, I>(effects: I) -> Vec<A>
    where
        A: Send + 'static,
        I: IntoIterator<Item = Effect<A>>,
    {
        let mut actions = Vec::new();
        for effect in effects {
            actions.extend(run_effect(effect).await);
        }
        actions
    }

    fn run_effect<A: Send + 'static>(effect: Effect<A>) -> BoxFuture<'static, Vec<A>> {
        async move {
            match effect {
                Effect::None | Effect::Cancel(_) => Vec::new(),
                Effect::Future(fut) => fut.await.into_iter().collect(),
                Effect::Delay { duration, action } => {
                    tokio::time::sleep(duration).await;
                    vec![*action]
                },
                Effect::Parallel(effects) => join_all(effects.into_iter().map(run_effect))
                    .await
                    .into_iter()
                    .flatten()
                    .collect(),
                Effect::Sequential(effects) => {
                    let mut actions = Vec::new();
                    for effect in effects {
                        actions.extend(run_effect(effect).await);
                    }
                    actions
                },
                Effect::Cancellable { effect, .. } => run_effect(*effect).await,
            }
        }
        .boxed()
    }
}

// Re-export commonly used items
pub use helpers::{init_test_tracing, run_effects};
pub use mocks::{test_clock, FixedClock, SequentialIdGenerator};
pub use reducer_test::{assertions, ReducerTest};
