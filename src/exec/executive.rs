//! # Executive: top-level scheduling authority.
//!
//! The [`Executive`] decides how process identity is issued, how managed
//! executions run, and which execution strategies and team oversights are
//! available to configuration. It is configuration-time machinery: it shapes
//! pool topology once; per-request execution then proceeds on whichever team
//! a function is assigned to.
//!
//! ## High-level architecture
//! ```text
//! Configuration layer (external)
//!   │
//!   ├── manage_execution(execution) ──► ProcessManager
//!   │        (synchronous passthrough on the calling thread by default)
//!   │
//!   ├── team_oversights()[name] ──► TeamOversight::create_team(ctx)
//!   │        │                           │
//!   │        └── default: empty          └── TeamSource::create_team(ctx)
//!   │
//!   ├── execution_strategies() ──► named ThreadFactory bundles
//!   │
//!   └── background_scheduler() ──► delayed jobs off process threads
//! ```
//!
//! [`DefaultExecutive`] is the provided implementation: a single `"default"`
//! strategy, a [`TimerThread`] scheduler, an owned event [`Bus`], and a
//! `manage_execution` interception that publishes process lifecycle events
//! around the synchronous passthrough.

use std::sync::Arc;

use crate::error::ExecutiveError;
use crate::events::{Bus, Event, EventKind};
use crate::exec::background::{BackgroundScheduler, TimerThread};
use crate::exec::context::{ExecutiveOfficeContext, ExecutiveStartContext, OfficeManager};
use crate::exec::oversight::TeamOversight;
use crate::exec::process::{Execution, ProcessIdentifier, ProcessManager};
use crate::exec::strategy::ExecutionStrategy;
use crate::teams::{NamedThreadFactory, ThreadFactory};

/// Global configuration for an executive.
///
/// ## Field semantics
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped)
/// - `thread_name_prefix`: name under which the default execution strategy's
///   threads are spawned
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` messages
    /// will skip older items. Minimum value is 1 (enforced by the bus).
    pub bus_capacity: usize,

    /// Thread name prefix for the default execution strategy.
    pub thread_name_prefix: String,
}

impl Config {
    /// Returns the bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `bus_capacity = 1024`
    /// - `thread_name_prefix = "execution"`
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            thread_name_prefix: "execution".to_string(),
        }
    }
}

/// # Top-level policy for process identity and team construction.
///
/// All methods have defaults except [`Executive::execution_strategies`]:
/// identifier allocation, synchronous execution passthrough, no oversights,
/// a fresh thread factory per team name, and no background scheduler.
///
/// Separating the executive (global scheduling policy) from
/// [`TeamOversight`] (per-team construction policy) from
/// [`TeamSource`](crate::TeamSource) (concrete pool implementation) lets an
/// operator swap thread-pool strategy without touching call sites that only
/// depend on [`Team`](crate::Team).
pub trait Executive: Send + Sync {
    /// Issues a fresh process identifier.
    ///
    /// Must never return a previously issued identifier.
    fn create_process_identifier(&self) -> ProcessIdentifier {
        ProcessIdentifier::allocate()
    }

    /// Runs the given unit of work and returns its process manager.
    ///
    /// The default executes on the calling thread and hands back whatever
    /// manager the execution produced. Implementations may intercept (e.g.
    /// to track executions for cancellation or publish lifecycle events).
    fn manage_execution(
        &self,
        execution: Box<dyn Execution>,
    ) -> Result<ProcessManager, ExecutiveError> {
        execution.execute()
    }

    /// Returns the fixed set of named thread-factory bundles available for
    /// manual strategy selection. Queried at configuration/build time.
    fn execution_strategies(&self) -> &[ExecutionStrategy];

    /// Returns the named team-construction policies configuration may select
    /// by name. Default: none (construction falls through to the source).
    fn team_oversights(&self) -> &[Arc<dyn TeamOversight>] {
        &[]
    }

    /// Looks up an oversight by name.
    fn team_oversight(&self, name: &str) -> Option<&Arc<dyn TeamOversight>> {
        self.team_oversights()
            .iter()
            .find(|oversight| oversight.name() == name)
    }

    /// Derives a thread factory scoped to `team_name`.
    ///
    /// The default returns a distinct factory per name, which tracks
    /// thread-to-team identity through thread names. An executive wanting
    /// shared pools may return the same underlying factory for several
    /// logical names.
    fn create_thread_factory(&self, team_name: &str) -> Arc<dyn ThreadFactory> {
        Arc::new(NamedThreadFactory::new(team_name))
    }

    /// Called once before the offices open.
    fn start_managing(&self, _context: &ExecutiveStartContext<'_>) -> Result<(), ExecutiveError> {
        Ok(())
    }

    /// Called as each office opens; returns the office manager to use.
    ///
    /// The default hires the office's own manager unchanged.
    fn manage_office(&self, context: &ExecutiveOfficeContext<'_>) -> Arc<dyn OfficeManager> {
        context.hire_office_manager()
    }

    /// Returns the background scheduler, when this executive provides one.
    fn background_scheduler(&self) -> Option<&dyn BackgroundScheduler> {
        None
    }
}

/// Provided [`Executive`] implementation.
///
/// ## Example
/// ```
/// use teamvisor::{Config, DefaultExecutive, Executive, ExecutionFn, ProcessManager};
///
/// let executive = DefaultExecutive::new(Config::default()).unwrap();
/// let id = executive.create_process_identifier();
/// let manager = executive
///     .manage_execution(ExecutionFn::boxed(move || Ok(ProcessManager::new(id))))
///     .unwrap();
/// assert!(!manager.is_cancellation_requested());
/// ```
pub struct DefaultExecutive {
    strategies: Vec<ExecutionStrategy>,
    scheduler: TimerThread,
    bus: Bus,
}

impl DefaultExecutive {
    /// The name of the single strategy a default executive exposes.
    pub const DEFAULT_STRATEGY: &'static str = "default";

    /// Creates the executive: one default strategy, a timer thread, and an
    /// owned event bus.
    pub fn new(config: Config) -> Result<Self, ExecutiveError> {
        let bus = Bus::new(config.bus_capacity_clamped());
        let scheduler =
            TimerThread::spawn(Some(bus.clone())).map_err(|e| ExecutiveError::Startup {
                reason: e.to_string(),
            })?;

        let strategies = vec![ExecutionStrategy::new(
            Self::DEFAULT_STRATEGY,
            vec![Arc::new(NamedThreadFactory::new(
                config.thread_name_prefix.as_str(),
            )) as Arc<dyn ThreadFactory>],
        )];

        Ok(Self {
            strategies,
            scheduler,
            bus,
        })
    }

    /// Returns the bus this executive publishes lifecycle events to.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }
}

impl Executive for DefaultExecutive {
    fn manage_execution(
        &self,
        execution: Box<dyn Execution>,
    ) -> Result<ProcessManager, ExecutiveError> {
        self.bus.publish(Event::now(EventKind::ProcessStarting));
        match execution.execute() {
            Ok(manager) => {
                self.bus.publish(
                    Event::now(EventKind::ProcessManaged)
                        .with_process(manager.process_identifier().to_string()),
                );
                Ok(manager)
            }
            Err(e) => {
                self.bus
                    .publish(Event::now(EventKind::ProcessFailed).with_error(e.to_string()));
                Err(e)
            }
        }
    }

    fn execution_strategies(&self) -> &[ExecutionStrategy] {
        &self.strategies
    }

    fn background_scheduler(&self) -> Option<&dyn BackgroundScheduler> {
        Some(&self.scheduler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::process::ExecutionFn;
    use std::time::Duration;

    #[test]
    fn default_passthrough_runs_on_the_calling_thread() {
        struct Bare;
        impl Executive for Bare {
            fn execution_strategies(&self) -> &[ExecutionStrategy] {
                &[]
            }
        }

        let executive = Bare;
        let caller = std::thread::current().id();
        let manager = executive
            .manage_execution(ExecutionFn::boxed(move || {
                assert_eq!(std::thread::current().id(), caller);
                Ok(ProcessManager::new(ProcessIdentifier::allocate()))
            }))
            .expect("execution succeeds");
        assert!(!manager.is_cancellation_requested());
    }

    #[test]
    fn default_executive_exposes_one_strategy_and_no_oversights() {
        let executive = DefaultExecutive::new(Config::default()).expect("executive");
        let strategies = executive.execution_strategies();
        assert_eq!(strategies.len(), 1);
        assert_eq!(
            strategies[0].strategy_name(),
            DefaultExecutive::DEFAULT_STRATEGY
        );
        assert!(executive.team_oversights().is_empty());
        assert!(executive.team_oversight("anything").is_none());
    }

    #[test]
    fn identifiers_from_the_trait_default_are_unique() {
        let executive = DefaultExecutive::new(Config::default()).expect("executive");
        let a = executive.create_process_identifier();
        let b = executive.create_process_identifier();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn thread_factories_are_scoped_per_name_by_default() {
        let executive = DefaultExecutive::new(Config::default()).expect("executive");
        let web = executive.create_thread_factory("web");
        let batch = executive.create_thread_factory("batch");
        assert_eq!(web.factory_name(), "web");
        assert_eq!(batch.factory_name(), "batch");
    }

    #[test]
    fn managed_executions_publish_lifecycle_events() {
        let executive = DefaultExecutive::new(Config::default()).expect("executive");
        let mut rx = executive.bus().subscribe();

        let id = executive.create_process_identifier();
        let rendered = id.to_string();
        executive
            .manage_execution(ExecutionFn::boxed(move || Ok(ProcessManager::new(id))))
            .expect("execution succeeds");

        let starting = rx.try_recv().expect("ProcessStarting");
        assert_eq!(starting.kind, EventKind::ProcessStarting);
        let managed = rx.try_recv().expect("ProcessManaged");
        assert_eq!(managed.kind, EventKind::ProcessManaged);
        assert_eq!(managed.process.as_deref(), Some(rendered.as_str()));
    }

    #[test]
    fn failed_executions_publish_and_propagate() {
        let executive = DefaultExecutive::new(Config::default()).expect("executive");
        let mut rx = executive.bus().subscribe();

        let err = executive
            .manage_execution(ExecutionFn::boxed(|| {
                Err(ExecutiveError::ExecutionFailed {
                    reason: "boom".to_string(),
                })
            }))
            .expect_err("failure propagates");
        assert_eq!(err.as_label(), "execution_failed");

        assert_eq!(rx.try_recv().unwrap().kind, EventKind::ProcessStarting);
        let failed = rx.try_recv().expect("ProcessFailed");
        assert_eq!(failed.kind, EventKind::ProcessFailed);
        assert!(failed.error.as_deref().unwrap_or_default().contains("boom"));
    }

    #[test]
    fn background_scheduler_is_exposed() {
        let executive = DefaultExecutive::new(Config::default()).expect("executive");
        let scheduler = executive.background_scheduler().expect("scheduler");

        let (tx, rx) = std::sync::mpsc::channel();
        scheduler.schedule(
            Duration::from_millis(5),
            Box::new(move || tx.send(()).unwrap()),
        );
        rx.recv_timeout(Duration::from_secs(5))
            .expect("background job ran");
    }

    #[test]
    fn start_and_office_hooks_default_to_passthrough() {
        let executive = DefaultExecutive::new(Config::default()).expect("executive");

        let offices = vec!["billing".to_string()];
        executive
            .start_managing(&ExecutiveStartContext::new(&offices))
            .expect("start accepted");

        struct Idle;
        impl OfficeManager for Idle {
            fn office_name(&self) -> &str {
                "billing"
            }
            fn run_upkeep(&self) {}
        }

        let manager =
            executive.manage_office(&ExecutiveOfficeContext::new("billing", Arc::new(Idle)));
        assert_eq!(manager.office_name(), "billing");
    }
}
