//! # Execution strategies: named bundles of thread factories.
//!
//! An [`ExecutionStrategy`] represents one way of obtaining execution
//! threads. Strategies are created when the executive is constructed and are
//! read-only thereafter; configuration selects them by name at build time,
//! not per request.

use std::fmt;
use std::sync::Arc;

use crate::teams::ThreadFactory;

/// Immutable named bundle of thread factories.
#[derive(Clone)]
pub struct ExecutionStrategy {
    name: Arc<str>,
    thread_factories: Vec<Arc<dyn ThreadFactory>>,
}

impl ExecutionStrategy {
    /// Creates a strategy with the given name and ordered factory slots.
    pub fn new(name: impl Into<Arc<str>>, thread_factories: Vec<Arc<dyn ThreadFactory>>) -> Self {
        Self {
            name: name.into(),
            thread_factories,
        }
    }

    /// Returns the strategy name used for selection at configuration time.
    pub fn strategy_name(&self) -> &str {
        &self.name
    }

    /// Returns the ordered thread factory slots.
    pub fn thread_factories(&self) -> &[Arc<dyn ThreadFactory>] {
        &self.thread_factories
    }
}

impl fmt::Debug for ExecutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionStrategy")
            .field("name", &self.name)
            .field("thread_factories", &self.thread_factories.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::teams::NamedThreadFactory;

    #[test]
    fn exposes_name_and_factories() {
        let strategy = ExecutionStrategy::new(
            "cpu-affinity",
            vec![
                Arc::new(NamedThreadFactory::new("cpu-0")) as Arc<dyn ThreadFactory>,
                Arc::new(NamedThreadFactory::new("cpu-1")),
            ],
        );
        assert_eq!(strategy.strategy_name(), "cpu-affinity");
        assert_eq!(strategy.thread_factories().len(), 2);
        assert_eq!(strategy.thread_factories()[0].factory_name(), "cpu-0");
    }

    #[test]
    fn factories_may_be_shared_between_strategies() {
        let shared: Arc<dyn ThreadFactory> = Arc::new(NamedThreadFactory::new("shared"));
        let a = ExecutionStrategy::new("a", vec![Arc::clone(&shared)]);
        let b = ExecutionStrategy::new("b", vec![Arc::clone(&shared)]);
        assert!(Arc::ptr_eq(
            &a.thread_factories()[0],
            &b.thread_factories()[0]
        ));
    }
}
