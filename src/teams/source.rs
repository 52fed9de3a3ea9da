//! # Team construction boundary.
//!
//! A [`TeamSource`] is the concrete pool implementation supplied by
//! configuration; it is handed a [`TeamSourceContext`] and must return a
//! working [`Team`](crate::Team). Name, size, and thread factory are the only
//! contracted fields at this boundary.
//!
//! The richer [`ExecutiveContext`](crate::ExecutiveContext) (which adds the
//! source itself and factory derivation) is what a
//! [`TeamOversight`](crate::TeamOversight) receives; it narrows to this trait
//! when delegating to the source.

use std::sync::Arc;

use crate::error::ExecutiveError;
use crate::teams::factory::ThreadFactory;
use crate::teams::team::TeamRef;

/// # Produces teams from construction contexts.
///
/// Any failure during construction propagates to the caller, which reports it
/// as a configuration/build-time issue, never as a runtime request failure.
pub trait TeamSource: Send + Sync {
    /// Constructs a team for the given context.
    fn create_team(&self, context: &dyn TeamSourceContext) -> Result<TeamRef, ExecutiveError>;
}

/// # Per-team-construction view handed to a [`TeamSource`].
///
/// Contexts are request-scoped value objects: they are not retained beyond
/// the construction call (implementations typically borrow their inputs).
///
/// ## Sentinel values
/// - `team_size() == 0` → size unspecified; sources fall back to their own
///   default (or use [`TeamSourceContext::team_size_or`]).
pub trait TeamSourceContext {
    /// Returns the name the team is being constructed under.
    fn team_name(&self) -> &str;

    /// Returns the configured team size (`0` = unspecified).
    fn team_size(&self) -> usize;

    /// Returns the configured team size, or `default_size` when unspecified.
    fn team_size_or(&self, default_size: usize) -> usize {
        match self.team_size() {
            0 => default_size,
            size => size,
        }
    }

    /// Returns the thread factory the team's workers must be spawned through.
    fn thread_factory(&self) -> Arc<dyn ThreadFactory>;
}
