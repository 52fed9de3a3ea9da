//! # Thread spawning: factories and worker environments.
//!
//! Teams never call [`std::thread::spawn`] directly; they go through a
//! [`ThreadFactory`] obtained from their construction context. This keeps
//! thread naming, counting, and per-thread environment setup a policy of the
//! executive rather than of each pool implementation.
//!
//! [`WorkerEnvironment`] decorates a worker body before the thread runs it,
//! e.g. to install thread-local state the jobs executed on that worker
//! expect. [`EnvironmentThreadFactory`] applies such a wrapper to every
//! thread an inner factory spawns.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

/// The body a worker thread runs to completion.
pub type WorkerBody = Box<dyn FnOnce() + Send + 'static>;

/// # Spawns the OS threads backing a team.
///
/// An executive may hand out a distinct factory per team name (the default,
/// which tracks thread-to-team identity through thread names) or one shared
/// factory for several names (shared pools).
pub trait ThreadFactory: Send + Sync {
    /// Returns the name this factory spawns threads under.
    fn factory_name(&self) -> &str;

    /// Spawns one worker thread running `body`.
    fn spawn_worker(&self, body: WorkerBody) -> io::Result<JoinHandle<()>>;
}

/// # Wraps a worker body with per-thread environment setup.
///
/// The wrapper runs on the worker thread itself, before (and around) the
/// original body, so it can install thread-locals and tear them down when the
/// worker exits.
pub trait WorkerEnvironment: Send + Sync {
    /// Returns the body the thread should actually run.
    fn create_worker_environment(&self, body: WorkerBody) -> WorkerBody;
}

/// Thread factory naming workers `"{name}-{n}"` with a per-factory counter.
pub struct NamedThreadFactory {
    name: Arc<str>,
    counter: AtomicUsize,
}

impl NamedThreadFactory {
    /// Creates a factory spawning threads under the given name.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            counter: AtomicUsize::new(0),
        }
    }
}

impl ThreadFactory for NamedThreadFactory {
    fn factory_name(&self) -> &str {
        &self.name
    }

    fn spawn_worker(&self, body: WorkerBody) -> io::Result<JoinHandle<()>> {
        let index = self.counter.fetch_add(1, Ordering::Relaxed);
        thread::Builder::new()
            .name(format!("{}-{}", self.name, index))
            .spawn(body)
    }
}

/// Decorates another factory so every spawned body first passes through a
/// [`WorkerEnvironment`].
pub struct EnvironmentThreadFactory {
    inner: Arc<dyn ThreadFactory>,
    environment: Arc<dyn WorkerEnvironment>,
}

impl EnvironmentThreadFactory {
    /// Wraps `inner` with `environment`.
    pub fn new(inner: Arc<dyn ThreadFactory>, environment: Arc<dyn WorkerEnvironment>) -> Self {
        Self { inner, environment }
    }
}

impl ThreadFactory for EnvironmentThreadFactory {
    fn factory_name(&self) -> &str {
        self.inner.factory_name()
    }

    fn spawn_worker(&self, body: WorkerBody) -> io::Result<JoinHandle<()>> {
        self.inner
            .spawn_worker(self.environment.create_worker_environment(body))
    }
}
