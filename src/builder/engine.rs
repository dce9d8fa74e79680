//! Builder for configuring engines.

use crate::context::{ContextError, ContextManager, Destructor, Duplicator};
use crate::engine::Engine;

/// Builder for constructing engines with a fluent API.
///
/// Without a duplicator the engine shares the live context with every
/// attempt.
pub struct EngineBuilder<C> {
    duplicator: Option<Duplicator<C>>,
    destructor: Option<Destructor<C>>,
    check_tables: bool,
}

impl<C: 'static> EngineBuilder<C> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            duplicator: None,
            destructor: None,
            check_tables: false,
        }
    }

    /// Duplicate the context with `duplicator` before every attempt.
    pub fn duplicator<F>(mut self, duplicator: F) -> Self
    where
        F: Fn(&C) -> Result<C, ContextError> + Send + Sync + 'static,
    {
        self.duplicator = Some(Box::new(duplicator));
        self
    }

    /// Duplicate the context with `Clone`.
    pub fn cloning(self) -> Self
    where
        C: Clone,
    {
        self.duplicator(|context: &C| Ok(context.clone()))
    }

    /// Drop any duplicator and share the live context.
    pub fn shared(mut self) -> Self {
        self.duplicator = None;
        self
    }

    /// Release discarded or replaced contexts through `destructor`.
    pub fn destructor<F>(mut self, destructor: F) -> Self
    where
        F: Fn(C) + Send + Sync + 'static,
    {
        self.destructor = Some(Box::new(destructor));
        self
    }

    /// Validate every reachable table before each run.
    pub fn check_tables(mut self, enabled: bool) -> Self {
        self.check_tables = enabled;
        self
    }

    pub fn build(self) -> Engine<C> {
        let mut contexts = match self.duplicator {
            Some(duplicator) => ContextManager::new(duplicator),
            None => ContextManager::shared(),
        };
        if let Some(destructor) = self.destructor {
            contexts = contexts.release_with(destructor);
        }
        Engine::configured(contexts, self.check_tables)
    }
}

impl<C: 'static> Default for EngineBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}
