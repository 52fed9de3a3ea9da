//! # Derived team-source contexts for sub-teams.
//!
//! [`TeamSourceContextWrapper`] derives a child [`TeamSourceContext`] for a
//! sub-team (e.g. an "expiry" or "overflow" team spawned from a primary team)
//! while inheriting naming and sizing policy from a parent
//! [`ExecutiveContext`].
//!
//! ## Rules
//! - The derived name and thread factory are computed **once, eagerly, at
//!   construction**, never lazily per call.
//! - Sizes are derived by applying the supplied calculator to the parent's
//!   corresponding value, which allows policies like "half of the parent's
//!   configured size, minimum 1".
//! - When a [`WorkerEnvironment`] is supplied, every thread the derived
//!   factory spawns first passes its body through the environment wrapper.

use std::sync::Arc;

use crate::exec::ExecutiveContext;
use crate::teams::factory::{EnvironmentThreadFactory, ThreadFactory, WorkerEnvironment};
use crate::teams::source::TeamSourceContext;

/// Derives a per-sub-team [`TeamSourceContext`] from a parent
/// [`ExecutiveContext`].
///
/// ## Example
/// ```
/// use teamvisor::{
///     Config, DefaultExecutive, PooledTeamSource, TeamBuildContext, TeamSourceContext,
///     TeamSourceContextWrapper,
/// };
///
/// let executive = DefaultExecutive::new(Config::default()).unwrap();
/// let source = PooledTeamSource::new();
/// let parent = TeamBuildContext::new("COMET", 8, &source, &executive);
///
/// let expiry = TeamSourceContextWrapper::new(
///     &parent,
///     |size| (size / 2).max(1),
///     Some("expire"),
///     None,
/// );
/// assert_eq!(expiry.team_name(), "COMET-expire");
/// assert_eq!(expiry.team_size(), 4);
/// ```
pub struct TeamSourceContextWrapper<'a> {
    parent: &'a dyn ExecutiveContext,
    team_name: String,
    size_calculator: Box<dyn Fn(usize) -> usize + Send + Sync + 'a>,
    thread_factory: Arc<dyn ThreadFactory>,
}

impl<'a> TeamSourceContextWrapper<'a> {
    /// Derives a child context from `parent`.
    ///
    /// ### Parameters
    /// - `size_calculator`: maps the parent's size to the sub-team's size
    /// - `name_suffix`: appended as `"-{suffix}"` when supplied, else the
    ///   parent's name is used unchanged
    /// - `worker_environment`: optional wrapper installed around every worker
    ///   body the derived factory spawns
    pub fn new(
        parent: &'a dyn ExecutiveContext,
        size_calculator: impl Fn(usize) -> usize + Send + Sync + 'a,
        name_suffix: Option<&str>,
        worker_environment: Option<Arc<dyn WorkerEnvironment>>,
    ) -> Self {
        let team_name = match name_suffix {
            Some(suffix) => format!("{}-{}", parent.team_name(), suffix),
            None => parent.team_name().to_string(),
        };

        let factory = parent.create_thread_factory(&team_name);
        let thread_factory: Arc<dyn ThreadFactory> = match worker_environment {
            Some(environment) => Arc::new(EnvironmentThreadFactory::new(factory, environment)),
            None => factory,
        };

        Self {
            parent,
            team_name,
            size_calculator: Box::new(size_calculator),
            thread_factory,
        }
    }
}

impl TeamSourceContext for TeamSourceContextWrapper<'_> {
    fn team_name(&self) -> &str {
        &self.team_name
    }

    fn team_size(&self) -> usize {
        (self.size_calculator)(self.parent.team_size())
    }

    fn team_size_or(&self, default_size: usize) -> usize {
        (self.size_calculator)(self.parent.team_size_or(default_size))
    }

    fn thread_factory(&self) -> Arc<dyn ThreadFactory> {
        Arc::clone(&self.thread_factory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{Config, DefaultExecutive, TeamBuildContext};
    use crate::teams::factory::WorkerBody;
    use crate::teams::pool::PooledTeamSource;
    use std::sync::Mutex;

    fn fixture() -> (PooledTeamSource, DefaultExecutive) {
        (
            PooledTeamSource::new(),
            DefaultExecutive::new(Config::default()).expect("executive"),
        )
    }

    #[test]
    fn suffix_extends_the_parent_name() {
        let (source, executive) = fixture();
        let parent = TeamBuildContext::new("COMET", 4, &source, &executive);

        let wrapped = TeamSourceContextWrapper::new(&parent, |size| size, Some("expire"), None);
        assert_eq!(wrapped.team_name(), "COMET-expire");
    }

    #[test]
    fn without_suffix_the_name_is_unchanged() {
        let (source, executive) = fixture();
        let parent = TeamBuildContext::new("COMET", 4, &source, &executive);

        let wrapped = TeamSourceContextWrapper::new(&parent, |size| size, None, None);
        assert_eq!(wrapped.team_name(), "COMET");
    }

    #[test]
    fn size_calculator_applies_to_parent_values() {
        let (source, executive) = fixture();
        let parent = TeamBuildContext::new("bulk", 9, &source, &executive);

        let wrapped =
            TeamSourceContextWrapper::new(&parent, |size| (size / 2).max(1), Some("half"), None);
        assert_eq!(wrapped.team_size(), 4);
        assert_eq!(wrapped.team_size_or(3), 4);

        let unsized_parent = TeamBuildContext::new("bulk", 0, &source, &executive);
        let wrapped =
            TeamSourceContextWrapper::new(&unsized_parent, |size| (size / 2).max(1), None, None);
        // Parent size unspecified: the default flows through the calculator.
        assert_eq!(wrapped.team_size_or(6), 3);
    }

    #[test]
    fn thread_factory_is_derived_once() {
        let (source, executive) = fixture();
        let parent = TeamBuildContext::new("io", 2, &source, &executive);

        let wrapped = TeamSourceContextWrapper::new(&parent, |size| size, Some("aux"), None);
        let first = wrapped.thread_factory();
        let second = wrapped.thread_factory();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.factory_name(), "io-aux");
    }

    struct Marker {
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl WorkerEnvironment for Marker {
        fn create_worker_environment(&self, body: WorkerBody) -> WorkerBody {
            let log = Arc::clone(&self.log);
            Box::new(move || {
                log.lock().unwrap().push("env");
                body();
            })
        }
    }

    #[test]
    fn worker_environment_wraps_derived_threads() {
        let (source, executive) = fixture();
        let parent = TeamBuildContext::new("env", 1, &source, &executive);

        let log = Arc::new(Mutex::new(Vec::new()));
        let wrapped = TeamSourceContextWrapper::new(
            &parent,
            |size| size,
            None,
            Some(Arc::new(Marker {
                log: Arc::clone(&log),
            })),
        );

        let body_log = Arc::clone(&log);
        let handle = wrapped
            .thread_factory()
            .spawn_worker(Box::new(move || {
                body_log.lock().unwrap().push("body");
            }))
            .expect("spawn worker");
        handle.join().unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["env", "body"]);
    }
}
