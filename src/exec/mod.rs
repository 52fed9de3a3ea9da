//! Execution core: executives, process identity, strategies, oversight,
//! contexts, and background scheduling.
//!
//! The public API from this module centers on the [`Executive`] trait and the
//! provided [`DefaultExecutive`].
//!
//! Internal modules:
//! - [`process`]: process identifiers, managers, and the execution boundary;
//! - [`strategy`]: named thread-factory bundles;
//! - [`oversight`]: pluggable team-construction policy;
//! - [`context`]: lifecycle context objects;
//! - [`background`]: delayed-job scheduling off process threads;
//! - [`executive`]: the policy trait and default implementation.

pub(crate) mod background;
pub(crate) mod context;
pub(crate) mod executive;
pub(crate) mod oversight;
pub(crate) mod process;
pub(crate) mod strategy;

pub use background::{BackgroundJob, BackgroundScheduler, TimerThread};
pub use context::{
    ExecutiveContext, ExecutiveOfficeContext, ExecutiveStartContext, OfficeManager,
    TeamBuildContext,
};
pub use executive::{Config, DefaultExecutive, Executive};
pub use oversight::{CompositeTeam, DirectOversight, SplitOversight, TeamOversight};
pub use process::{Execution, ExecutionFn, ProcessIdentifier, ProcessManager};
pub use strategy::ExecutionStrategy;
