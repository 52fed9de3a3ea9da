//! # Fixed-size worker-pool team.
//!
//! [`PooledTeamSource`] is the default [`TeamSource`]: it builds a
//! [`PooledTeam`] whose workers are spawned through the context's
//! [`ThreadFactory`](crate::ThreadFactory) and pull jobs from a shared queue.
//!
//! ## Architecture
//! ```text
//! assign_job(job)
//!     │
//!     ▼
//! [unbounded queue] ──► worker 0 ──► job() ── panic → WorkerPanicked event
//!                  ├──► worker 1 ──► job()
//!                  └──► worker N ──► job()
//!
//! stop_working():
//!   close queue ──► workers drain remaining jobs ──► workers exit ──► join
//! ```
//!
//! ## Rules
//! - Workers take jobs one at a time from a shared receiver; an idle pool
//!   parks in `blocking_recv`, not in a spin loop.
//! - A panicking job never kills its worker: the panic is caught, reported
//!   as [`EventKind::WorkerPanicked`], and the worker continues.
//! - `stop_working` drains accepted jobs before joining; only jobs assigned
//!   **after** stop are rejected.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use tokio::sync::mpsc;

use crate::error::ExecutiveError;
use crate::events::{Bus, Event, EventKind};
use crate::teams::factory::ThreadFactory;
use crate::teams::source::{TeamSource, TeamSourceContext};
use crate::teams::team::{Job, Team, TeamRef};

/// Builds [`PooledTeam`]s from construction contexts.
///
/// The pool size comes from the context; when the context leaves it
/// unspecified, the source's fallback size applies (available parallelism by
/// default).
pub struct PooledTeamSource {
    fallback_size: usize,
    bus: Option<Bus>,
}

impl PooledTeamSource {
    /// Creates a source whose fallback size is the host's available
    /// parallelism.
    pub fn new() -> Self {
        let fallback_size = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            fallback_size,
            bus: None,
        }
    }

    /// Overrides the size used when a context leaves the team size
    /// unspecified.
    pub fn with_fallback_size(mut self, fallback_size: usize) -> Self {
        self.fallback_size = fallback_size.max(1);
        self
    }

    /// Publishes team lifecycle events to the given bus.
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }
}

impl Default for PooledTeamSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TeamSource for PooledTeamSource {
    fn create_team(&self, context: &dyn TeamSourceContext) -> Result<TeamRef, ExecutiveError> {
        let size = context.team_size_or(self.fallback_size).max(1);
        Ok(Box::new(PooledTeam::new(
            context.team_name(),
            size,
            context.thread_factory(),
            self.bus.clone(),
        )))
    }
}

/// Lifecycle phase of a pooled team.
#[derive(Clone, Copy, PartialEq, Eq)]
enum PoolPhase {
    Created,
    Running,
    Stopped,
}

struct PoolInner {
    phase: PoolPhase,
    queue: Option<mpsc::UnboundedSender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

/// Fixed-size worker pool executing assigned jobs in FIFO order.
pub struct PooledTeam {
    name: Arc<str>,
    size: usize,
    factory: Arc<dyn ThreadFactory>,
    bus: Option<Bus>,
    inner: Mutex<PoolInner>,
}

impl PooledTeam {
    /// Creates a pool of `size` workers spawned through `factory`.
    ///
    /// Workers are not spawned until [`Team::start_working`].
    pub fn new(
        name: impl Into<Arc<str>>,
        size: usize,
        factory: Arc<dyn ThreadFactory>,
        bus: Option<Bus>,
    ) -> Self {
        Self {
            name: name.into(),
            size: size.max(1),
            factory,
            bus,
            inner: Mutex::new(PoolInner {
                phase: PoolPhase::Created,
                queue: None,
                workers: Vec::new(),
            }),
        }
    }

    fn publish(&self, event: Event) {
        if let Some(bus) = &self.bus {
            bus.publish(event);
        }
    }

    fn lock_inner(&self) -> std::sync::MutexGuard<'_, PoolInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// One worker: take a job, run it isolated, repeat until the queue closes.
fn worker_loop(
    index: u32,
    receiver: Arc<Mutex<mpsc::UnboundedReceiver<Job>>>,
    team: Arc<str>,
    bus: Option<Bus>,
) {
    loop {
        let job = {
            let mut rx = receiver.lock().unwrap_or_else(|e| e.into_inner());
            rx.blocking_recv()
        };
        let Some(job) = job else { break };

        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
            if let Some(bus) = &bus {
                bus.publish(
                    Event::now(EventKind::WorkerPanicked)
                        .with_team(Arc::clone(&team))
                        .with_worker(index),
                );
            }
        }
    }
}

impl std::fmt::Debug for PooledTeam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledTeam")
            .field("name", &self.name)
            .field("size", &self.size)
            .finish()
    }
}

impl Team for PooledTeam {
    fn team_name(&self) -> &str {
        &self.name
    }

    fn start_working(&self) -> Result<(), ExecutiveError> {
        let mut inner = self.lock_inner();
        match inner.phase {
            PoolPhase::Running => return Ok(()),
            PoolPhase::Stopped => {
                return Err(ExecutiveError::TeamNotRunning {
                    team: self.name.to_string(),
                });
            }
            PoolPhase::Created => {}
        }

        let (tx, rx) = mpsc::unbounded_channel::<Job>();
        let receiver = Arc::new(Mutex::new(rx));

        let mut workers = Vec::with_capacity(self.size);
        for index in 0..self.size {
            let receiver = Arc::clone(&receiver);
            let team = Arc::clone(&self.name);
            let bus = self.bus.clone();
            let spawned = self
                .factory
                .spawn_worker(Box::new(move || worker_loop(index as u32, receiver, team, bus)));

            match spawned {
                Ok(handle) => workers.push(handle),
                Err(e) => {
                    // Roll back: close the queue so already spawned workers exit.
                    drop(tx);
                    for handle in workers {
                        let _ = handle.join();
                    }
                    inner.phase = PoolPhase::Stopped;
                    return Err(ExecutiveError::TeamBuild {
                        team: self.name.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        inner.queue = Some(tx);
        inner.workers = workers;
        inner.phase = PoolPhase::Running;
        drop(inner);

        self.publish(Event::now(EventKind::TeamStarted).with_team(Arc::clone(&self.name)));
        Ok(())
    }

    fn assign_job(&self, job: Job) -> Result<(), ExecutiveError> {
        let inner = self.lock_inner();
        let accepted = match (&inner.phase, &inner.queue) {
            (PoolPhase::Running, Some(queue)) => queue.send(job).is_ok(),
            _ => false,
        };
        drop(inner);

        if accepted {
            Ok(())
        } else {
            self.publish(Event::now(EventKind::JobRejected).with_team(Arc::clone(&self.name)));
            Err(ExecutiveError::TeamNotRunning {
                team: self.name.to_string(),
            })
        }
    }

    fn stop_working(&self) {
        let (was_running, queue, workers) = {
            let mut inner = self.lock_inner();
            let was_running = inner.phase == PoolPhase::Running;
            inner.phase = PoolPhase::Stopped;
            (
                was_running,
                inner.queue.take(),
                std::mem::take(&mut inner.workers),
            )
        };

        // Closing the queue lets workers drain remaining jobs and exit.
        drop(queue);
        for handle in workers {
            let _ = handle.join();
        }

        if was_running {
            self.publish(Event::now(EventKind::TeamStopped).with_team(Arc::clone(&self.name)));
        }
    }
}

impl Drop for PooledTeam {
    fn drop(&mut self) {
        self.stop_working();
    }
}
