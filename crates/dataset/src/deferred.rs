//! Explicitly deferred values.
//!
//! A [`Deferred`] holds either a computed value or the computation that
//! produces it. [`Deferred::force`] runs the computation at most once and
//! memoizes the result. Callers force only where a value feeds a decision
//! or an equality test.

use std::cell::LazyCell;

type Thunk<'a, T> = Box<dyn FnOnce() -> T + 'a>;

/// A lazily computed, memoized value.
pub struct Deferred<'a, T> {
    cell: LazyCell<T, Thunk<'a, T>>,
    precomputed: bool,
}

impl<'a, T: 'a> Deferred<'a, T> {
    /// Defer `thunk` until the first call to [`force`](Self::force).
    pub fn new(thunk: impl FnOnce() -> T + 'a) -> Self {
        Self {
            cell: LazyCell::new(Box::new(thunk)),
            precomputed: false,
        }
    }

    /// Wrap an already available value; forcing performs no work.
    pub fn ready(value: T) -> Self {
        Self {
            cell: LazyCell::new(Box::new(move || value)),
            precomputed: true,
        }
    }

    /// Evaluate (once) and borrow the value.
    pub fn force(&self) -> &T {
        LazyCell::force(&self.cell)
    }

    /// Whether the value was supplied up front rather than computed.
    pub fn is_precomputed(&self) -> bool {
        self.precomputed
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Deferred<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deferred")
            .field("precomputed", &self.precomputed)
            .finish_non_exhaustive()
    }
}
