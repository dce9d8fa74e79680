//! Copy-on-attempt handling of the caller's parse context.
//!
//! Every nested automaton or function guard runs against an attempt-scoped
//! view of the context. With a duplicator configured, the attempt works on
//! a private copy that replaces the live context only on commit, so a
//! failed attempt leaves no trace however deeply it was nested.
//!
//! # Example
//!
//! ```rust
//! use tablefsm::context::ContextManager;
//!
//! let manager = ContextManager::<Vec<u8>>::cloning();
//! let mut live = vec![1];
//!
//! let mut attempt = manager.begin(&mut live).unwrap();
//! attempt.context().push(2);
//! attempt.rollback();
//! assert_eq!(live, vec![1]);
//!
//! let mut attempt = manager.begin(&mut live).unwrap();
//! attempt.context().push(3);
//! attempt.commit();
//! assert_eq!(live, vec![1, 3]);
//! ```

pub mod error;

pub use error::ContextError;

use std::fmt;
use std::mem;
use tracing::warn;

/// Produces an independent copy of a context.
pub type Duplicator<C> = Box<dyn Fn(&C) -> Result<C, ContextError> + Send + Sync>;

/// Releases a context value that is no longer live.
pub type Destructor<C> = Box<dyn Fn(C) + Send + Sync>;

/// Policy for isolating attempts from the live context.
pub struct ContextManager<C> {
    duplicator: Option<Duplicator<C>>,
    destructor: Option<Destructor<C>>,
}

impl<C> ContextManager<C> {
    /// Duplicate contexts with `duplicator` before every attempt.
    pub fn new<F>(duplicator: F) -> Self
    where
        F: Fn(&C) -> Result<C, ContextError> + Send + Sync + 'static,
    {
        Self {
            duplicator: Some(Box::new(duplicator)),
            destructor: None,
        }
    }

    /// Share the live context with every attempt.
    ///
    /// Attempts mutate the caller's context directly, so a failed nested
    /// automaton or function guard can leave partial changes behind. Use this
    /// only for contexts that are never mutated, or when the grammar itself
    /// tolerates leftovers from abandoned alternatives.
    pub fn shared() -> Self {
        Self {
            duplicator: None,
            destructor: None,
        }
    }

    /// Duplicate contexts with `Clone`.
    pub fn cloning() -> Self
    where
        C: Clone,
    {
        Self::new(|context: &C| Ok(context.clone()))
    }

    /// Hand every discarded or replaced context to `destructor`.
    pub fn release_with<F>(mut self, destructor: F) -> Self
    where
        F: Fn(C) + Send + Sync + 'static,
    {
        self.destructor = Some(Box::new(destructor));
        self
    }

    /// Whether failed attempts are rolled back.
    pub fn is_transactional(&self) -> bool {
        self.duplicator.is_some()
    }

    /// Open an attempt against `live`.
    ///
    /// Fails only if the duplicator fails; nothing is retained in that case.
    pub fn begin<'a>(&'a self, live: &'a mut C) -> Result<Attempt<'a, C>, ContextError> {
        let draft = match &self.duplicator {
            Some(duplicate) => match duplicate(&*live) {
                Ok(copy) => Some(copy),
                Err(error) => {
                    warn!(%error, "context duplication failed");
                    return Err(error);
                }
            },
            None => None,
        };

        Ok(Attempt {
            manager: self,
            live,
            draft,
        })
    }

    fn release(&self, context: C) {
        match &self.destructor {
            Some(destroy) => destroy(context),
            None => drop(context),
        }
    }
}

impl<C> fmt::Debug for ContextManager<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextManager")
            .field("transactional", &self.is_transactional())
            .field("destructor", &self.destructor.is_some())
            .finish()
    }
}

/// An in-flight attempt against the live context.
///
/// Exactly one of [`commit`](Attempt::commit) or
/// [`rollback`](Attempt::rollback) decides the outcome; dropping the attempt
/// without deciding rolls it back.
pub struct Attempt<'a, C> {
    manager: &'a ContextManager<C>,
    live: &'a mut C,
    draft: Option<C>,
}

impl<C> Attempt<'_, C> {
    /// The context the guard should read and mutate.
    pub fn context(&mut self) -> &mut C {
        match &mut self.draft {
            Some(draft) => draft,
            None => &mut *self.live,
        }
    }

    /// Make the attempt's context the live one.
    pub fn commit(mut self) {
        if let Some(draft) = self.draft.take() {
            let previous = mem::replace(&mut *self.live, draft);
            self.manager.release(previous);
        }
    }

    /// Discard the attempt's context; the live context is unchanged.
    pub fn rollback(mut self) {
        if let Some(draft) = self.draft.take() {
            self.manager.release(draft);
        }
    }
}

impl<C> Drop for Attempt<'_, C> {
    fn drop(&mut self) {
        if let Some(draft) = self.draft.take() {
            self.manager.release(draft);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn cloning_commit_replaces_live() {
        let manager = ContextManager::<Vec<i32>>::cloning();
        let mut live = vec![1];

        let mut attempt = manager.begin(&mut live).unwrap();
        attempt.context().push(2);
        attempt.commit();

        assert_eq!(live, vec![1, 2]);
    }

    #[test]
    fn cloning_rollback_keeps_live() {
        let manager = ContextManager::<Vec<i32>>::cloning();
        let mut live = vec![1];

        let mut attempt = manager.begin(&mut live).unwrap();
        attempt.context().clear();
        attempt.rollback();

        assert_eq!(live, vec![1]);
    }

    #[test]
    fn dropping_an_attempt_rolls_back() {
        let manager = ContextManager::<String>::cloning();
        let mut live = String::from("kept");

        {
            let mut attempt = manager.begin(&mut live).unwrap();
            attempt.context().push_str(" and changed");
        }

        assert_eq!(live, "kept");
    }

    #[test]
    fn shared_attempts_mutate_live_directly() {
        let manager = ContextManager::<Vec<i32>>::shared();
        let mut live = vec![1];

        let mut attempt = manager.begin(&mut live).unwrap();
        attempt.context().push(2);
        attempt.rollback();

        assert!(!manager.is_transactional());
        assert_eq!(live, vec![1, 2]);
    }

    #[test]
    fn duplication_failure_is_reported() {
        let manager = ContextManager::<u8>::new(|_| {
            Err(ContextError::DuplicationFailed("out of slots".to_string()))
        });
        let mut live = 5;

        let result = manager.begin(&mut live);

        assert!(matches!(result, Err(ContextError::DuplicationFailed(_))));
        drop(result);
        assert_eq!(live, 5);
    }

    #[test]
    fn destructor_receives_replaced_and_discarded_values() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&released);
        let manager = ContextManager::<u32>::cloning().release_with(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let mut live = 1;

        let mut attempt = manager.begin(&mut live).unwrap();
        *attempt.context() = 2;
        attempt.commit();

        let attempt = manager.begin(&mut live).unwrap();
        attempt.rollback();

        assert_eq!(live, 2);
        assert_eq!(released.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn shared_manager_never_calls_destructor() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&released);
        let manager = ContextManager::<u32>::shared().release_with(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let mut live = 1;

        let attempt = manager.begin(&mut live).unwrap();
        attempt.commit();

        assert_eq!(released.load(Ordering::SeqCst), 0);
    }
}
