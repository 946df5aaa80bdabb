//! Memoized selectors.
//!
//! A [`Selector`] splits a read projection in two steps:
//!
//! 1. a **key** function that picks the inputs of the view out of the state
//!    (cheap: cloning `Arc`s and ids),
//! 2. a **projector** that derives the view from those inputs.
//!
//! The last key and result are cached. When the next key is the
//! [`same`](SelectorKey::same) as the cached one the projector is skipped and the
//! cached value is returned, so a derived view traverses its collection at most
//! once per state change.
//!
//! `Arc` keys compare by pointer: reducers that swap in a new collection on
//! every change (and leave it alone otherwise) get change detection for free.
//!
//! # Example
//!
//! ```
//! use casedesk_core::selector::Selector;
//! use std::sync::Arc;
//!
//! #[derive(Clone)]
//! struct State {
//!     items: Arc<Vec<u32>>,
//! }
//!
//! let evens = Selector::new(
//!     |s: &State| Arc::clone(&s.items),
//!     |items: &Arc<Vec<u32>>| items.iter().filter(|n| *n % 2 == 0).count(),
//! );
//!
//! let state = State { items: Arc::new(vec![1, 2, 3, 4]) };
//! assert_eq!(evens.select(&state), 2);
//! assert_eq!(evens.select(&state.clone()), 2);
//! assert_eq!(evens.recomputations(), 1);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Input of a memoized selector.
///
/// `same` decides whether a cached result may be reused.
pub trait SelectorKey: Clone + Send + Sync {
    /// Returns true if `other` denotes the same inputs as `self`.
    fn same(&self, other: &Self) -> bool;
}

impl<T: ?Sized + Send + Sync> SelectorKey for Arc<T> {
    fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<K: SelectorKey> SelectorKey for Option<K> {
    fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.same(b),
            (None, None) => true,
            _ => false,
        }
    }
}

macro_rules! impl_selector_key_by_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SelectorKey for $ty {
                fn same(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

impl_selector_key_by_value!(String, bool, u32, u64, usize);

impl<A: SelectorKey, B: SelectorKey> SelectorKey for (A, B) {
    fn same(&self, other: &Self) -> bool {
        self.0.same(&other.0) && self.1.same(&other.1)
    }
}

impl<A: SelectorKey, B: SelectorKey, C: SelectorKey> SelectorKey for (A, B, C) {
    fn same(&self, other: &Self) -> bool {
        self.0.same(&other.0) && self.1.same(&other.1) && self.2.same(&other.2)
    }
}

type KeyFn<S, K> = Box<dyn Fn(&S) -> K + Send + Sync>;
type ProjectFn<K, T> = Box<dyn Fn(&K) -> T + Send + Sync>;

/// Memoized projection from state `S` to view `T` through key `K`.
///
/// Selectors are shared (`Arc<Selector<..>>`) and thread-safe. Compose them by
/// calling a parent selector inside the key function of a child.
pub struct Selector<S, K, T> {
    key: KeyFn<S, K>,
    project: ProjectFn<K, T>,
    cache: Mutex<Option<(K, T)>>,
    recomputations: AtomicUsize,
}

impl<S, K, T> Selector<S, K, T>
where
    K: SelectorKey,
    T: Clone,
{
    /// Create a selector from a key function and a projector.
    pub fn new<KF, PF>(key: KF, project: PF) -> Self
    where
        KF: Fn(&S) -> K + Send + Sync + 'static,
        PF: Fn(&K) -> T + Send + Sync + 'static,
    {
        Self {
            key: Box::new(key),
            project: Box::new(project),
            cache: Mutex::new(None),
            recomputations: AtomicUsize::new(0),
        }
    }

    /// Derive the view for `state`, reusing the cached result when the key is unchanged.
    pub fn select(&self, state: &S) -> T {
        let key = (self.key)(state);

        // Projection is pure, a poisoned cache is still valid
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((cached_key, value)) = cache.as_ref() {
            if cached_key.same(&key) {
                return value.clone();
            }
        }

        let value = (self.project)(&key);
        self.recomputations.fetch_add(1, Ordering::Relaxed);
        *cache = Some((key, value.clone()));
        value
    }

    /// Number of times the projector ran.
    #[must_use]
    pub fn recomputations(&self) -> usize {
        self.recomputations.load(Ordering::Relaxed)
    }

    /// Drop the cached result.
    pub fn reset(&self) {
        *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl<S, K, T> std::fmt::Debug for Selector<S, K, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selector")
            .field("recomputations", &self.recomputations.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
