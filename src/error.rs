//! Error types used by the teamvisor execution core and stream core.
//!
//! This module defines two main error enums:
//!
//! - [`ExecutiveError`] — failures raised while constructing or driving the
//!   execution machinery (teams, executives, processes).
//! - [`StreamError`] — protocol violations against a server input stream.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for
//! logging/metrics.
//!
//! Note that a read finding no data on a still-receiving stream is **not** an
//! error: it is reported as [`ReadResult::Pending`](crate::ReadResult) so the
//! scheduling layer can park the logical task and retry later.

use thiserror::Error;

/// # Errors produced by the execution core.
///
/// These represent failures in team/executive construction (configuration
/// time) or misuse of a team's lifecycle (assigning work to a team that is
/// not running). Construction failures propagate to the caller and are
/// reported as build-time issues, never retried automatically.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ExecutiveError {
    /// A team source failed while constructing a team.
    #[error("building team {team} failed: {reason}")]
    TeamBuild {
        /// Name of the team being constructed.
        team: String,
        /// Underlying failure description.
        reason: String,
    },

    /// A job was assigned to a team that has not been started or has
    /// already been stopped.
    #[error("team {team} is not running")]
    TeamNotRunning {
        /// Name of the rejecting team.
        team: String,
    },

    /// A managed execution failed.
    #[error("execution failed: {reason}")]
    ExecutionFailed {
        /// Underlying failure description.
        reason: String,
    },

    /// The executive could not be brought up.
    #[error("executive startup failed: {reason}")]
    Startup {
        /// Underlying failure description.
        reason: String,
    },
}

impl ExecutiveError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use teamvisor::ExecutiveError;
    ///
    /// let err = ExecutiveError::TeamNotRunning { team: "web".into() };
    /// assert_eq!(err.as_label(), "team_not_running");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ExecutiveError::TeamBuild { .. } => "team_build_failed",
            ExecutiveError::TeamNotRunning { .. } => "team_not_running",
            ExecutiveError::ExecutionFailed { .. } => "execution_failed",
            ExecutiveError::Startup { .. } => "executive_startup_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ExecutiveError::TeamBuild { team, reason } => {
                format!("team build failed: team={team} reason={reason}")
            }
            ExecutiveError::TeamNotRunning { team } => format!("team not running: team={team}"),
            ExecutiveError::ExecutionFailed { reason } => format!("execution failed: {reason}"),
            ExecutiveError::Startup { reason } => format!("startup failed: {reason}"),
        }
    }
}

/// # Protocol violations against a server input stream.
///
/// These are programming errors local to the integrating component; they fail
/// immediately so the defect is caught during development. Transient "no data
/// yet" and terminal end-of-stream are **not** errors — see
/// [`ReadResult`](crate::ReadResult) and [`Availability`](crate::Availability).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StreamError {
    /// `input_data` was called after a previous call already marked the
    /// stream complete.
    #[error("no further input allowed: stream already complete")]
    InputAfterEnd,

    /// `export_state` was called while the stream is still receiving data.
    #[error("stream state not available: data not yet complete")]
    StateIncomplete,
}

impl StreamError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use teamvisor::StreamError;
    ///
    /// assert_eq!(StreamError::InputAfterEnd.as_label(), "stream_input_after_end");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            StreamError::InputAfterEnd => "stream_input_after_end",
            StreamError::StateIncomplete => "stream_state_incomplete",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            StreamError::InputAfterEnd => "input after stream completion".to_string(),
            StreamError::StateIncomplete => "state exported before completion".to_string(),
        }
    }
}
