//! Reducer composition utilities
//!
//! This module provides utilities for composing reducers:
//! - **`combine_reducers`**: Run multiple reducers on the same state/action
//! - **`scope_reducer`**: Embed a feature reducer into a parent state, action
//!   and environment
//!
//! # Examples
//!
//! ```
//! use casedesk_core::{smallvec, Effect, Reducer, SmallVec};
//! use casedesk_core::composition::{combine_reducers, scope_reducer};
//!
//! #[derive(Clone, Default)]
//! struct CounterState {
//!     count: i32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut Self::State, action: Self::Action, _env: &Self::Environment) -> SmallVec<[Effect<Self::Action>; 4]> {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! #[derive(Clone, Default)]
//! struct AppState {
//!     left: CounterState,
//!     right: CounterState,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum AppAction {
//!     Left(CounterAction),
//!     Right(CounterAction),
//! }
//!
//! let app = combine_reducers(vec![
//!     std::sync::Arc::new(scope_reducer(
//!         CounterReducer,
//!         |s: &mut AppState| &mut s.left,
//!         |a: AppAction| match a { AppAction::Left(a) => Some(a), AppAction::Right(_) => None },
//!         AppAction::Left,
//!         |env: &()| env,
//!     )),
//!     std::sync::Arc::new(scope_reducer(
//!         CounterReducer,
//!         |s: &mut AppState| &mut s.right,
//!         |a: AppAction| match a { AppAction::Right(a) => Some(a), AppAction::Left(_) => None },
//!         AppAction::Right,
//!         |env: &()| env,
//!     )),
//! ]);
//!
//! let mut state = AppState::default();
//! let _ = app.reduce(&mut state, AppAction::Left(CounterAction::Increment), &());
//! assert_eq!(state.left.count, 1);
//! assert_eq!(state.right.count, 0);
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;
use std::sync::Arc;

/// Shared, thread-safe reducer trait object.
pub type SharedReducer<S, A, E> =
    Arc<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in sequence, and all effects are collected and concatenated.
///
/// # Type Parameters
///
/// - `S`: The state type
/// - `A`: The action type
/// - `E`: The environment type
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<SharedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    reducers: Vec<SharedReducer<S, A, E>>,
}

impl<S, A, E> Clone for CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    fn clone(&self) -> Self {
        Self {
            reducers: self.reducers.iter().map(Arc::clone).collect(),
        }
    }
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut all_effects = SmallVec::new();

        for reducer in &self.reducers {
            let effects = reducer.reduce(state, action.clone(), env);
            all_effects.extend(effects);
        }

        all_effects
    }
}

/// Scopes a feature reducer into a parent state, action and environment.
///
/// - `state`: lens from the parent state to the feature state
/// - `extract`: returns the feature action if the parent action belongs to the feature
/// - `embed`: wraps feature actions produced by effects back into the parent type
/// - `environment`: lens from the parent environment to the feature environment
///
/// Parent actions that `extract` rejects leave the parent state untouched and
/// produce no effects.
pub fn scope_reducer<S, SubS, A, SubA, E, SubE, R>(
    reducer: R,
    state: fn(&mut S) -> &mut SubS,
    extract: fn(A) -> Option<SubA>,
    embed: fn(SubA) -> A,
    environment: fn(&E) -> &SubE,
) -> ScopedReducer<S, SubS, A, SubA, E, SubE, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = SubE>,
{
    ScopedReducer {
        reducer,
        state,
        extract,
        embed,
        environment,
    }
}

/// A reducer embedded into a larger state.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, SubS, A, SubA, E, SubE, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = SubE>,
{
    reducer: R,
    state: fn(&mut S) -> &mut SubS,
    extract: fn(A) -> Option<SubA>,
    embed: fn(SubA) -> A,
    environment: fn(&E) -> &SubE,
}

impl<S, SubS, A, SubA, E, SubE, R> Clone for ScopedReducer<S, SubS, A, SubA, E, SubE, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = SubE> + Clone,
{
    fn clone(&self) -> Self {
        Self {
            reducer: self.reducer.clone(),
            state: self.state,
            extract: self.extract,
            embed: self.embed,
            environment: self.environment,
        }
    }
}

impl<S, SubS, A, SubA, E, SubE, R> Reducer for ScopedReducer<S, SubS, A, SubA, E, SubE, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = SubE>,
    A: Send + 'static,
    SubA: Send + 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let Some(action) = (self.extract)(action) else {
            return SmallVec::new();
        };

        let sub_state = (self.state)(state);
        let sub_env = (self.environment)(env);

        self.reducer
            .reduce(sub_state, action, sub_env)
            .into_iter()
            .map(|effect| effect.map(self.embed))
            .collect()
    }
}
