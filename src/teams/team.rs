//! # Team abstraction: a named worker pool executing units of work.
//!
//! A [`Team`] owns a set of worker threads and a queue of [`Job`]s. Teams are
//! produced by a [`TeamSource`](crate::TeamSource) (usually through a
//! [`TeamOversight`](crate::TeamOversight)) at configuration time and driven
//! by whichever component registered them.
//!
//! ## Lifecycle
//! ```text
//! create_team() ──► start_working() ──► assign_job()* ──► stop_working()
//!                        │                                     │
//!                        └─ spawns workers                     └─ closes the
//!                           via ThreadFactory                     queue, drains
//!                                                                 it, joins
//! ```
//!
//! ## Rules
//! - `assign_job` on a team that is not running fails with
//!   [`ExecutiveError::TeamNotRunning`](crate::ExecutiveError).
//! - `stop_working` never drops accepted work: queued jobs run before the
//!   workers exit.

use crate::error::ExecutiveError;

/// A unit of work assigned to a team.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Owned handle to a team, as returned by team construction.
pub type TeamRef = Box<dyn Team>;

/// # A named worker pool.
///
/// Implementations decide worker topology (fixed pool, composite,
/// thread-per-job, ...). Callers interact only through this boundary; the
/// name/size/thread-factory used to build the pool come from the
/// [`TeamSourceContext`](crate::TeamSourceContext) it was constructed with.
pub trait Team: Send + Sync + std::fmt::Debug {
    /// Returns the stable team name.
    fn team_name(&self) -> &str;

    /// Spawns the team's workers. Idempotent while running; fails once the
    /// team has been stopped.
    fn start_working(&self) -> Result<(), ExecutiveError>;

    /// Queues a job for execution on one of the team's workers.
    fn assign_job(&self, job: Job) -> Result<(), ExecutiveError>;

    /// Stops accepting work, drains the queue, and joins all workers.
    fn stop_working(&self);
}
