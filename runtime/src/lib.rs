//! # Casedesk Runtime
//!
//! Runtime implementation for the casedesk state store.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to reducers
//! - **Cancellation**: Supersedes in-flight effects that share an [`EffectId`]
//! - **Subscriptions**: Streams of derived views that emit on change
//!
//! ## Example
//!
//! ```ignore
//! use casedesk_runtime::Store;
//! use futures::StreamExt;
//!
//! let store = Store::new(AppState::default(), app_reducer(), environment);
//!
//! // Send an action
//! store.send(AppAction::Clients(ClientsAction::Load)).await?;
//!
//! // Observe a derived view
//! let mut loading = Box::pin(store.subscribe(|s: &AppState| s.clients.loading));
//! while let Some(is_loading) = loading.next().await {
//!     println!("loading: {is_loading}");
//! }
//! ```
//!
//! [`EffectId`]: casedesk_core::effect::EffectId

use casedesk_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use tokio::sync::RwLock;

mod cancellation;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        ///
        /// Some effects were still running when the timeout elapsed.
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for terminal action
        ///
        /// Returned by `send_and_wait_for` when the timeout expires before
        /// a matching action is received.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        ///
        /// The action broadcast channel was closed, typically because the
        /// store is shutting down.
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

use cancellation::{CancelScope, CancellationRegistry};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::watch;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use casedesk_runtime::StoreConfig;
/// use std::time::Duration;
///
/// let config = StoreConfig::default()
///     .with_broadcast_capacity(256)
///     .with_shutdown_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.broadcast_capacity, 256);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Number of effect-produced actions buffered for slow observers
    pub broadcast_capacity: usize,
    /// Default timeout for graceful shutdown
    pub default_shutdown_timeout: Duration,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(broadcast_capacity: usize, default_shutdown_timeout: Duration) -> Self {
        Self {
            broadcast_capacity,
            default_shutdown_timeout,
        }
    }

    /// Set the action broadcast capacity
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }

    /// Set the default shutdown timeout
    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.default_shutdown_timeout = timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 16,
            default_shutdown_timeout: Duration::from_secs(30),
        }
    }
}

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting for the effects started by
/// that action. Effects that are cancelled count as completed.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(ClientsAction::Load).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// // The load has resolved (or was superseded)
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    /// Create a handle together with the tracking used by effect execution
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: Arc::new(tx),
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    ///
    /// Useful for initialization in loops where you need a `last_handle`.
    #[must_use]
    pub fn completed() -> Self {
        let (tx, rx) = watch::channel(());
        let _ = tx.send(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Number of effects still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                break;
            }
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires before all effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: Effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: Arc<watch::Sender<()>>,
}

impl EffectTracking {
    /// Increment the effect counter (effect started)
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement the effect counter (effect completed or aborted)
    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements effect counter on drop
///
/// Runs when the task finishes, panics, or is aborted.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Where a dispatched action came from
enum Origin {
    /// Sent by a caller through [`Store::send`]
    External,
    /// Produced by an effect, possibly under a cancellation scope
    Effect(Option<CancelScope>),
}

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicCounterGuard, AtomicUsize, CancelScope, CancellationRegistry,
        DecrementGuard, Duration, Effect, EffectHandle, EffectTracking, Ordering, Origin,
        Reducer, RwLock, StoreConfig, StoreError,
    };
    use futures::Stream;
    use std::future::Future;
    use tokio::sync::{broadcast, watch};

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop and cancellation)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = Store::new(
    ///     ClientsState::default(),
    ///     ClientsReducer,
    ///     ClientsEnvironment::new(service),
    /// );
    ///
    /// store.send(ClientsAction::Load).await?;
    /// ```
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        config: StoreConfig,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        cancellations: Arc<CancellationRegistry>,
        /// Bumped after every reducer run; drives [`Store::subscribe`].
        revision: Arc<watch::Sender<u64>>,
        /// Action broadcast channel for observing actions produced by effects.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default()`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        ///
        /// # Example
        ///
        /// ```ignore
        /// let config = StoreConfig::default().with_broadcast_capacity(256);
        /// let store = Store::with_config(AppState::default(), app_reducer(), env, config);
        /// ```
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity.max(1));
            let (revision, _) = watch::channel(0);

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                config,
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                cancellations: Arc::new(CancellationRegistry::default()),
                revision: Arc::new(revision),
                action_broadcast,
            }
        }

        /// The configuration this store was created with
        #[must_use]
        pub const fn config(&self) -> &StoreConfig {
            &self.config
        }

        /// Number of effects currently running across all actions
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::Acquire)
        }

        /// Initiate graceful shutdown of the store
        ///
        /// New actions (including those fed back by effects) are rejected;
        /// running effects are given until `timeout` to finish.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before all
        /// pending effects complete.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            metrics::counter!("store.shutdown.initiated").increment(1);

            // Set shutdown flag to reject new actions
            self.shutdown.store(true, Ordering::Release);

            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(20);

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);

                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    metrics::counter!("store.shutdown.completed").increment(1);
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(pending_effects = pending, "Shutdown timeout");
                    metrics::counter!("store.shutdown.timeout").increment(1);
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tracing::debug!(
                    pending_effects = pending,
                    elapsed_ms = start.elapsed().as_millis(),
                    "Waiting for effects to complete"
                );

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Shut down with the configured default timeout
        ///
        /// # Errors
        ///
        /// See [`Store::shutdown`].
        pub async fn shutdown_gracefully(&self) -> Result<(), StoreError> {
            self.shutdown(self.config.default_shutdown_timeout).await
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Starts the returned effects
        /// 4. Effects may produce more actions (feedback loop)
        ///
        /// `send()` returns after starting effect execution, not completion.
        /// Concurrent `send()` calls serialize at the reducer.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        ///
        /// # Example
        ///
        /// ```ignore
        /// let mut handle = store.send(ClientsAction::Load).await?;
        /// handle.wait().await;
        /// ```
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError>
        where
            R: Clone,
            E: Clone,
        {
            self.dispatch(action, Origin::External).await
        }

        /// Send an action and wait for a matching result action
        ///
        /// Subscribes to the action broadcast before sending, so a result
        /// produced immediately is not missed.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: Timeout expired before matching action received
        /// - [`StoreError::ChannelClosed`]: Action broadcast channel closed
        /// - [`StoreError::ShutdownInProgress`]: Store is shutting down
        ///
        /// # Example
        ///
        /// ```ignore
        /// let result = store.send_and_wait_for(
        ///     ClientsAction::Load,
        ///     ClientsAction::is_terminal,
        ///     Duration::from_secs(2),
        /// ).await?;
        /// ```
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            R: Clone,
            E: Clone,
            F: Fn(&A) -> bool,
        {
            // Subscribe BEFORE sending to avoid race condition
            let mut rx = self.action_broadcast.subscribe();

            self.send(action).await?;

            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            // If the terminal action was dropped, the timeout catches it
                            tracing::warn!(skipped, "Action observer lagged");
                        },
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        },
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Subscribe to all actions produced by effects
        ///
        /// Actions sent with [`Store::send`] are not broadcast, and results of
        /// superseded effects never appear. A receiver that falls behind gets
        /// `RecvError::Lagged` and skips ahead.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Observe a derived view of the state
        ///
        /// The returned stream yields the current value of `select`
        /// immediately, then again after each state change that produces a
        /// different value. It ends when every clone of the store is dropped.
        ///
        /// # Example
        ///
        /// ```ignore
        /// let mut items = Box::pin(store.subscribe(move |s| selectors.all.select(s)));
        /// let first = items.next().await;
        /// ```
        pub fn subscribe<T, F>(&self, select: F) -> impl Stream<Item = T> + Send + 'static
        where
            F: Fn(&S) -> T + Send + Sync + 'static,
            T: Clone + PartialEq + Send + 'static,
        {
            let state = Arc::clone(&self.state);
            let mut revisions = self.revision.subscribe();

            async_stream::stream! {
                revisions.borrow_and_update();
                let mut last = {
                    let guard = state.read().await;
                    select(&*guard)
                };
                yield last.clone();

                while revisions.changed().await.is_ok() {
                    let next = {
                        let guard = state.read().await;
                        select(&*guard)
                    };
                    if next != last {
                        last = next.clone();
                        yield next;
                    }
                }
            }
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let client_count = store.state(|s| s.clients.items.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Run the reducer for one action and start its effects
        ///
        /// Effects are started before the write lock is released, so a
        /// superseding effect has replaced its predecessor's generation by the
        /// time any other action is reduced.
        #[tracing::instrument(skip(self, action, origin), name = "store_dispatch")]
        async fn dispatch(&self, action: A, origin: Origin) -> Result<EffectHandle, StoreError>
        where
            R: Clone,
            E: Clone,
        {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            let (handle, tracking) = EffectHandle::new();
            let mut state = self.state.write().await;

            let from_effect = match &origin {
                Origin::External => false,
                Origin::Effect(Some(scope)) if !self.cancellations.is_current(scope) => {
                    tracing::debug!(effect_id = %scope.id, "Discarding result of superseded effect");
                    metrics::counter!("store.effects.discarded").increment(1);
                    return Ok(EffectHandle::completed());
                },
                Origin::Effect(_) => true,
            };

            metrics::counter!("store.commands.total").increment(1);

            let broadcast_copy = from_effect.then(|| action.clone());

            let effects = {
                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                tracing::trace!("Reducer completed, returned {} effects", effects.len());
                effects
            };

            self.revision.send_modify(|revision| *revision = revision.wrapping_add(1));

            if let Some(action) = broadcast_copy {
                // No receivers is fine
                let _ = self.action_broadcast.send(action);
            }

            for effect in effects {
                self.execute_effect(effect, &tracking, None);
            }
            drop(state);

            Ok(handle)
        }

        /// Execute an effect, spawning tasks for anything asynchronous
        ///
        /// `scope` is the cancellation generation inherited from an enclosing
        /// [`Effect::Cancellable`].
        fn execute_effect(
            &self,
            effect: Effect<A>,
            tracking: &EffectTracking,
            scope: Option<&CancelScope>,
        ) where
            R: Clone,
            E: Clone,
        {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Future(fut) => {
                    tracing::trace!("Executing Effect::Future");
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    self.spawn_effect(tracking, scope, fut);
                },
                Effect::Delay { duration, action } => {
                    tracing::trace!("Executing Effect::Delay (duration: {:?})", duration);
                    metrics::counter!("store.effects.executed", "type" => "delay").increment(1);
                    self.spawn_effect(tracking, scope, async move {
                        tokio::time::sleep(duration).await;
                        Some(*action)
                    });
                },
                Effect::Parallel(effects) => {
                    tracing::trace!("Executing Effect::Parallel with {} effects", effects.len());
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                    for effect in effects {
                        self.execute_effect(effect, tracking, scope);
                    }
                },
                Effect::Sequential(effects) => {
                    let effect_count = effects.len();
                    tracing::trace!("Executing Effect::Sequential with {} effects", effect_count);
                    metrics::counter!("store.effects.executed", "type" => "sequential").increment(1);

                    let store = self.clone();
                    let inner_scope = scope.cloned();
                    self.spawn_effect(tracking, scope, async move {
                        for (idx, effect) in effects.into_iter().enumerate() {
                            tracing::trace!("Executing sequential effect {} of {}", idx + 1, effect_count);

                            // Each step gets its own tracking so we can wait on it alone
                            let (mut step, step_tracking) = EffectHandle::new();
                            store.execute_effect(effect, &step_tracking, inner_scope.as_ref());
                            drop(step_tracking);
                            step.wait().await;
                        }
                        None
                    });
                },
                Effect::Cancellable { id, effect } => {
                    let (scope, aborted) = self.cancellations.supersede(id);
                    if aborted > 0 {
                        tracing::debug!(effect_id = %scope.id, aborted, "Superseded in-flight effects");
                        metrics::counter!("store.effects.cancelled").increment(aborted as u64);
                    }
                    metrics::counter!("store.effects.executed", "type" => "cancellable").increment(1);
                    self.execute_effect(*effect, tracking, Some(&scope));
                },
                Effect::Cancel(id) => {
                    let aborted = self.cancellations.cancel(&id);
                    tracing::debug!(effect_id = %id, aborted, "Cancelled effects");
                    metrics::counter!("store.effects.cancelled").increment(aborted as u64);
                },
            }
        }

        /// Spawn a task whose optional result is fed back into the store
        fn spawn_effect<F>(&self, tracking: &EffectTracking, scope: Option<&CancelScope>, task: F)
        where
            F: Future<Output = Option<A>> + Send + 'static,
            R: Clone,
            E: Clone,
        {
            tracking.increment();
            let guard = DecrementGuard(tracking.clone());

            // Track global pending effects for shutdown
            self.pending_effects.fetch_add(1, Ordering::SeqCst);
            let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

            let store = self.clone();
            let feedback_scope = scope.cloned();

            let join = tokio::spawn(async move {
                let _guard = guard;
                let _pending_guard = pending_guard;

                if let Some(action) = task.await {
                    tracing::trace!("Effect produced an action, sending to store");
                    if let Err(error) = store.dispatch(action, Origin::Effect(feedback_scope)).await {
                        tracing::debug!(%error, "Dropped effect result");
                    }
                } else {
                    tracing::trace!("Effect completed with no action");
                }
            });

            if let Some(scope) = scope {
                if !self.cancellations.register(scope, join.abort_handle()) {
                    tracing::trace!(effect_id = %scope.id, "Effect started for a superseded generation");
                }
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                config: self.config.clone(),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                cancellations: Arc::clone(&self.cancellations),
                revision: Arc::clone(&self.revision),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

// Re-export for convenience
pub use store::Store;
