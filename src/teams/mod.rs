//! Teams: worker pools, their construction boundary, and thread plumbing.
//!
//! A [`TeamSource`] turns a [`TeamSourceContext`] into a running [`Team`].
//! Thread creation goes through [`ThreadFactory`] so naming and per-thread
//! environment setup stay an executive policy; [`TeamSourceContextWrapper`]
//! derives sub-team contexts from a parent construction context.
//!
//! [`PooledTeamSource`]/[`PooledTeam`] provide the default fixed-size pool.

mod factory;
mod pool;
mod source;
mod team;
mod wrapper;

pub use factory::{
    EnvironmentThreadFactory, NamedThreadFactory, ThreadFactory, WorkerBody, WorkerEnvironment,
};
pub use pool::{PooledTeam, PooledTeamSource};
pub use source::{TeamSource, TeamSourceContext};
pub use team::{Job, Team, TeamRef};
pub use wrapper::TeamSourceContextWrapper;
