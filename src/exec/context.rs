//! # Contexts supplied to the executive at its lifecycle points.
//!
//! The executive sees three contextual views:
//!
//! - [`ExecutiveContext`] at **team construction** time: the
//!   [`TeamSourceContext`] fields plus the source itself and thread-factory
//!   derivation. [`TeamBuildContext`] is the concrete implementation.
//! - [`ExecutiveStartContext`] at **startup**: the offices about to open.
//! - [`ExecutiveOfficeContext`] when an **office is opened**: the office name
//!   and the default [`OfficeManager`] the executive may hire as-is or wrap.
//!
//! Contexts are value objects borrowed for the duration of the call; they are
//! not retained afterwards.

use std::sync::Arc;

use crate::exec::executive::Executive;
use crate::teams::{TeamSource, TeamSourceContext, ThreadFactory};

/// # Team-construction view handed to a [`TeamOversight`](crate::TeamOversight).
///
/// Extends the narrow [`TeamSourceContext`] boundary with the source being
/// built from and per-name thread-factory derivation (used to spin sub-teams
/// off a primary team, see
/// [`TeamSourceContextWrapper`](crate::TeamSourceContextWrapper)).
pub trait ExecutiveContext: TeamSourceContext {
    /// Returns the team source configuration supplied for this team.
    fn team_source(&self) -> &dyn TeamSource;

    /// Derives a thread factory scoped to `team_name`.
    ///
    /// The executive behind this context may return the same underlying
    /// factory for several logical team names (shared pools) or a distinct
    /// factory per name.
    fn create_thread_factory(&self, team_name: &str) -> Arc<dyn ThreadFactory>;
}

/// Concrete per-team-construction context.
///
/// Borrows its source and executive: the context lives only for the
/// construction call.
pub struct TeamBuildContext<'a> {
    team_name: String,
    team_size: usize,
    team_source: &'a dyn TeamSource,
    executive: &'a dyn Executive,
    thread_factory: Arc<dyn ThreadFactory>,
}

impl<'a> TeamBuildContext<'a> {
    /// Creates a construction context for the named team.
    ///
    /// `team_size` of `0` means unspecified (the source's fallback applies).
    /// The team's own thread factory is derived from the executive here,
    /// once.
    pub fn new(
        team_name: impl Into<String>,
        team_size: usize,
        team_source: &'a dyn TeamSource,
        executive: &'a dyn Executive,
    ) -> Self {
        let team_name = team_name.into();
        let thread_factory = executive.create_thread_factory(&team_name);
        Self {
            team_name,
            team_size,
            team_source,
            executive,
            thread_factory,
        }
    }
}

impl TeamSourceContext for TeamBuildContext<'_> {
    fn team_name(&self) -> &str {
        &self.team_name
    }

    fn team_size(&self) -> usize {
        self.team_size
    }

    fn thread_factory(&self) -> Arc<dyn ThreadFactory> {
        Arc::clone(&self.thread_factory)
    }
}

impl ExecutiveContext for TeamBuildContext<'_> {
    fn team_source(&self) -> &dyn TeamSource {
        self.team_source
    }

    fn create_thread_factory(&self, team_name: &str) -> Arc<dyn ThreadFactory> {
        self.executive.create_thread_factory(team_name)
    }
}

/// Startup-time view handed to
/// [`Executive::start_managing`](crate::Executive::start_managing).
pub struct ExecutiveStartContext<'a> {
    office_names: &'a [String],
}

impl<'a> ExecutiveStartContext<'a> {
    /// Creates the startup context over the offices about to open.
    pub fn new(office_names: &'a [String]) -> Self {
        Self { office_names }
    }

    /// Returns the names of the offices about to open.
    pub fn office_names(&self) -> &[String] {
        self.office_names
    }
}

/// # Periodic upkeep hook for one office.
///
/// The office supplies a default manager; the executive hires it unchanged or
/// wraps it (e.g. to run upkeep on a particular team or schedule).
pub trait OfficeManager: Send + Sync {
    /// Returns the name of the managed office.
    fn office_name(&self) -> &str;

    /// Runs one round of periodic office upkeep.
    fn run_upkeep(&self);
}

/// Per-office view handed to
/// [`Executive::manage_office`](crate::Executive::manage_office).
pub struct ExecutiveOfficeContext<'a> {
    office_name: &'a str,
    default_manager: Arc<dyn OfficeManager>,
}

impl<'a> ExecutiveOfficeContext<'a> {
    /// Creates the office context with the office's default manager.
    pub fn new(office_name: &'a str, default_manager: Arc<dyn OfficeManager>) -> Self {
        Self {
            office_name,
            default_manager,
        }
    }

    /// Returns the name of the office being opened.
    pub fn office_name(&self) -> &str {
        self.office_name
    }

    /// Hands out the office's default manager.
    pub fn hire_office_manager(&self) -> Arc<dyn OfficeManager> {
        Arc::clone(&self.default_manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::executive::{Config, DefaultExecutive};
    use crate::teams::PooledTeamSource;

    #[test]
    fn build_context_exposes_contracted_fields() {
        let source = PooledTeamSource::new();
        let executive = DefaultExecutive::new(Config::default()).expect("executive");
        let context = TeamBuildContext::new("web", 4, &source, &executive);

        assert_eq!(context.team_name(), "web");
        assert_eq!(context.team_size(), 4);
        assert_eq!(context.team_size_or(9), 4);
        assert_eq!(context.thread_factory().factory_name(), "web");
    }

    #[test]
    fn unspecified_size_uses_the_default() {
        let source = PooledTeamSource::new();
        let executive = DefaultExecutive::new(Config::default()).expect("executive");
        let context = TeamBuildContext::new("web", 0, &source, &executive);

        assert_eq!(context.team_size(), 0);
        assert_eq!(context.team_size_or(9), 9);
    }

    #[test]
    fn derived_factories_are_scoped_to_the_requested_name() {
        let source = PooledTeamSource::new();
        let executive = DefaultExecutive::new(Config::default()).expect("executive");
        let context = TeamBuildContext::new("web", 2, &source, &executive);

        let derived = context.create_thread_factory("web-expire");
        assert_eq!(derived.factory_name(), "web-expire");
    }

    struct UpkeepCounter {
        name: &'static str,
        count: std::sync::atomic::AtomicUsize,
    }

    impl OfficeManager for UpkeepCounter {
        fn office_name(&self) -> &str {
            self.name
        }

        fn run_upkeep(&self) {
            self.count.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        }
    }

    #[test]
    fn office_context_hires_the_default_manager() {
        let default = Arc::new(UpkeepCounter {
            name: "billing",
            count: std::sync::atomic::AtomicUsize::new(0),
        });
        let context = ExecutiveOfficeContext::new("billing", default.clone());

        assert_eq!(context.office_name(), "billing");
        let hired = context.hire_office_manager();
        hired.run_upkeep();
        assert_eq!(default.count.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn start_context_lists_offices() {
        let offices = vec!["billing".to_string(), "shipping".to_string()];
        let context = ExecutiveStartContext::new(&offices);
        assert_eq!(context.office_names(), &offices[..]);
    }
}
