//! # Process identity and the managed-execution boundary.
//!
//! A [`ProcessIdentifier`] is an opaque token naming one running unit of
//! work; [`ProcessManager`] is the handle an [`Executive`](crate::Executive)
//! returns for it, through which cancellation of the whole process may be
//! requested. [`Execution`] is the unit-of-work boundary itself, with
//! [`ExecutionFn`] as the closure-backed convenience implementation.
//!
//! ## Identity rules
//! - Identifiers are issued from a global monotonic counter; an already
//!   issued identifier is never issued again.
//! - An identifier equals itself and its clones (they denote the same
//!   process); two separately issued identifiers are never equal.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;

use crate::error::ExecutiveError;

/// Global counter backing process identifier issuance.
static PROCESS_SEQ: AtomicU64 = AtomicU64::new(1);

/// Opaque identity token for one running unit of work.
///
/// ## Example
/// ```
/// use teamvisor::ProcessIdentifier;
///
/// let a = ProcessIdentifier::allocate();
/// let b = ProcessIdentifier::allocate();
/// assert_eq!(a, a.clone());
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcessIdentifier(u64);

impl ProcessIdentifier {
    /// Issues a fresh identifier. Never returns a previously issued value.
    pub fn allocate() -> Self {
        Self(PROCESS_SEQ.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ProcessIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "process-{}", self.0)
    }
}

/// Handle to an in-flight (or completed) managed process.
///
/// Cloning yields another handle to the same process: cancellation requested
/// through any clone is observed by all of them.
#[derive(Debug, Clone)]
pub struct ProcessManager {
    id: ProcessIdentifier,
    cancel: CancellationToken,
}

impl ProcessManager {
    /// Creates a manager for the process named by `id`.
    pub fn new(id: ProcessIdentifier) -> Self {
        Self {
            id,
            cancel: CancellationToken::new(),
        }
    }

    /// Returns the identity of the managed process.
    pub fn process_identifier(&self) -> &ProcessIdentifier {
        &self.id
    }

    /// Requests cancellation of the whole process.
    ///
    /// Cancellation is cooperative: the process observes it through
    /// [`ProcessManager::cancellation_token`] at its own safe points.
    pub fn request_cancellation(&self) {
        self.cancel.cancel();
    }

    /// Returns whether cancellation has been requested.
    pub fn is_cancellation_requested(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Returns the token process-internal code can watch for cancellation.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }
}

/// # A unit of work handed to [`Executive::manage_execution`](crate::Executive::manage_execution).
///
/// The execution runs to completion (creating its own process identity and
/// manager along the way) and returns the [`ProcessManager`] representing the
/// process it started.
pub trait Execution: Send {
    /// Runs the unit of work.
    fn execute(self: Box<Self>) -> Result<ProcessManager, ExecutiveError>;
}

/// Closure-backed [`Execution`].
///
/// ## Example
/// ```
/// use teamvisor::{Execution, ExecutionFn, ProcessIdentifier, ProcessManager};
///
/// let id = ProcessIdentifier::allocate();
/// let execution = ExecutionFn::boxed(move || Ok(ProcessManager::new(id)));
/// let manager = execution.execute().unwrap();
/// assert!(!manager.is_cancellation_requested());
/// ```
pub struct ExecutionFn<F> {
    f: F,
}

impl<F> ExecutionFn<F>
where
    F: FnOnce() -> Result<ProcessManager, ExecutiveError> + Send,
{
    /// Creates a new closure-backed execution.
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the execution and returns it boxed, ready for
    /// [`Executive::manage_execution`](crate::Executive::manage_execution).
    pub fn boxed(f: F) -> Box<Self> {
        Box::new(Self::new(f))
    }
}

impl<F> Execution for ExecutionFn<F>
where
    F: FnOnce() -> Result<ProcessManager, ExecutiveError> + Send,
{
    fn execute(self: Box<Self>) -> Result<ProcessManager, ExecutiveError> {
        (self.f)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn identifiers_are_never_reissued() {
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(ProcessIdentifier::allocate()));
        }
    }

    #[test]
    fn identifier_equals_itself_and_its_clones() {
        let id = ProcessIdentifier::allocate();
        assert_eq!(id, id);
        assert_eq!(id, id.clone());
    }

    #[test]
    fn separately_issued_identifiers_differ() {
        assert_ne!(ProcessIdentifier::allocate(), ProcessIdentifier::allocate());
    }

    #[test]
    fn cancellation_is_shared_across_clones() {
        let manager = ProcessManager::new(ProcessIdentifier::allocate());
        let other = manager.clone();
        assert!(!other.is_cancellation_requested());

        manager.request_cancellation();
        assert!(other.is_cancellation_requested());
        assert!(other.cancellation_token().is_cancelled());
    }

    #[test]
    fn execution_fn_runs_the_closure() {
        let id = ProcessIdentifier::allocate();
        let expected = id.clone();
        let manager = ExecutionFn::boxed(move || Ok(ProcessManager::new(id)))
            .execute()
            .expect("execution succeeds");
        assert_eq!(manager.process_identifier(), &expected);
    }
}
