//! # Casedesk Core
//!
//! Core traits and types for the casedesk state store.
//!
//! This crate provides the fundamental abstractions for a unidirectional
//! state container: actions are folded into state by a pure reducer, side
//! effects are returned as descriptions, and read models are derived through
//! memoized selectors.
//!
//! ## Core Concepts
//!
//! - **State**: The slice of data owned by one feature
//! - **Action**: Closed set of intents and results for a feature
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//! - **Selector**: Memoized read projection over state
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - Explicit Effects (no hidden I/O)
//! - Dependency Injection via Environment
//!
//! ## Example
//!
//! ```ignore
//! use casedesk_core::*;
//!
//! #[derive(Clone, Debug, Default)]
//! struct ClientsState {
//!     items: Arc<Vec<Arc<Client>>>,
//!     loading: bool,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum ClientsAction {
//!     Load,
//!     LoadSuccess { clients: Vec<Client> },
//! }
//!
//! impl Reducer for ClientsReducer {
//!     type State = ClientsState;
//!     type Action = ClientsAction;
//!     type Environment = ClientsEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut ClientsState,
//!         action: ClientsAction,
//!         env: &ClientsEnvironment,
//!     ) -> SmallVec<[Effect<ClientsAction>; 4]> {
//!         match action {
//!             ClientsAction::Load => {
//!                 state.loading = true;
//!                 smallvec![load_clients(env.service.clone())]
//!             }
//!             ClientsAction::LoadSuccess { clients } => {
//!                 state.items = Arc::new(clients.into_iter().map(Arc::new).collect());
//!                 state.loading = false;
//!                 SmallVec::new()
//!             }
//!         }
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use smallvec::{smallvec, SmallVec};

pub use effect::{Effect, EffectId};
pub use reducer::Reducer;
pub use selector::{Selector, SelectorKey};

/// Reducer composition utilities
pub mod composition;

/// Declarative macros for effect construction
pub mod effect_macros;

/// Memoized selectors
pub mod selector;

/// Reducer module - The core trait for state transitions
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all state transition logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The slice state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Contract
    ///
    /// Reducers must not panic and must not perform I/O. Shared collections
    /// inside the state should be replaced rather than mutated in place, so
    /// that snapshots handed out earlier stay untouched.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Updates state in place
        /// 2. Returns effect descriptions to be executed by the runtime
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable and cancellable.
pub mod effect {
    use futures::FutureExt;
    use serde::{Deserialize, Serialize};
    use std::fmt;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Arc;
    use std::time::Duration;

    /// Identifier grouping in-flight effects for cancellation.
    ///
    /// Starting a [`Effect::Cancellable`] with an id aborts every effect still
    /// running under the same id.
    ///
    /// # Examples
    ///
    /// ```
    /// use casedesk_core::effect::EffectId;
    ///
    /// let id = EffectId::new("clients.load");
    /// assert_eq!(id.as_str(), "clients.load");
    /// ```
    #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct EffectId(String);

    impl EffectId {
        /// Create a new `EffectId`.
        #[must_use]
        pub fn new(id: impl Into<String>) -> Self {
            Self(id.into())
        }

        /// Get the id as a string slice.
        #[must_use]
        pub fn as_str(&self) -> &str {
            &self.0
        }
    }

    impl fmt::Display for EffectId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<&str> for EffectId {
        fn from(s: &str) -> Self {
            Self(s.to_string())
        }
    }

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),

        /// Run `effect` under `id`, superseding anything still running under that id
        ///
        /// Results of a superseded effect are never fed back.
        Cancellable {
            /// Cancellation group
            id: EffectId,
            /// The wrapped effect
            effect: Box<Effect<Action>>,
        },

        /// Abort every in-flight effect registered under the id
        Cancel(EffectId),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> fmt::Debug for Effect<Action>
    where
        Action: fmt::Debug,
    {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
                Effect::Cancellable { id, effect } => f
                    .debug_struct("Effect::Cancellable")
                    .field("id", id)
                    .field("effect", effect)
                    .finish(),
                Effect::Cancel(id) => f.debug_tuple("Effect::Cancel").field(id).finish(),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Wrap this effect so that it supersedes any in-flight effect with the same id
        ///
        /// # Examples
        ///
        /// ```
        /// use casedesk_core::effect::{Effect, EffectId};
        ///
        /// let effect: Effect<()> = Effect::None.cancellable("clients.load");
        /// assert!(matches!(effect, Effect::Cancellable { ref id, .. } if id == &EffectId::new("clients.load")));
        /// ```
        #[must_use]
        pub fn cancellable(self, id: impl Into<EffectId>) -> Effect<Action> {
            Effect::Cancellable {
                id: id.into(),
                effect: Box::new(self),
            }
        }

        /// Transform the actions produced by this effect
        ///
        /// Used to lift a feature's effects into a parent action type when a
        /// feature reducer is scoped into a larger application state.
        #[must_use]
        pub fn map<B, F>(self, f: F) -> Effect<B>
        where
            F: Fn(Action) -> B + Send + Sync + 'static,
            Action: Send + 'static,
            B: Send + 'static,
        {
            self.map_shared(&Arc::new(f))
        }

        fn map_shared<B, F>(self, f: &Arc<F>) -> Effect<B>
        where
            F: Fn(Action) -> B + Send + Sync + 'static,
            Action: Send + 'static,
            B: Send + 'static,
        {
            match self {
                Effect::None => Effect::None,
                Effect::Parallel(effects) => {
                    Effect::Parallel(effects.into_iter().map(|e| e.map_shared(f)).collect())
                },
                Effect::Sequential(effects) => {
                    Effect::Sequential(effects.into_iter().map(|e| e.map_shared(f)).collect())
                },
                Effect::Delay { duration, action } => Effect::Delay {
                    duration,
                    action: Box::new(f(*action)),
                },
                Effect::Future(fut) => {
                    let f = Arc::clone(f);
                    Effect::Future(Box::pin(
                        fut.map(move |action| action.map(|a| f(a))),
                    ))
                },
                Effect::Cancellable { id, effect } => Effect::Cancellable {
                    id,
                    effect: Box::new(effect.map_shared(f)),
                },
                Effect::Cancel(id) => Effect::Cancel(id),
            }
        }
    }

}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use casedesk_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let before = clock.now();
    /// assert!(clock.now() >= before);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Identifier generation for records created before a real backend assigns ids.
    pub trait IdGenerator: Send + Sync {
        /// Produce a fresh identifier starting with `prefix`.
        fn next_id(&self, prefix: &str) -> String;
    }
}
