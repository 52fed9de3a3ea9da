//! # Team oversight: pluggable team-construction policy.
//!
//! A [`TeamOversight`] decides how to materialize a [`Team`](crate::Team)
//! from a [`TeamSource`](crate::TeamSource). The default policy delegates to
//! the source directly; an overriding policy may construct several underlying
//! teams and return a composite that load-balances across them.
//!
//! ```text
//! DirectOversight:
//!   create_team(ctx) ──► ctx.team_source().create_team(ctx)
//!
//! SplitOversight (parts = 3):
//!   create_team(ctx) ──► wrapper "-0" ──► sub-team 0 ─┐
//!                    ──► wrapper "-1" ──► sub-team 1 ─┼──► CompositeTeam
//!                    ──► wrapper "-2" ──► sub-team 2 ─┘    (round-robin)
//! ```
//!
//! Any construction failure propagates to the caller as a
//! configuration/build-time issue; nothing is swallowed or retried.

use std::borrow::Cow;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::ExecutiveError;
use crate::exec::context::ExecutiveContext;
use crate::teams::{Job, Team, TeamRef, TeamSourceContextWrapper};

/// # Policy for constructing a team from a source.
///
/// Oversights are selected by name at configuration time from
/// [`Executive::team_oversights`](crate::Executive::team_oversights); they
/// are stateless beyond their name.
pub trait TeamOversight: Send + Sync {
    /// Returns the name this oversight is selected by.
    fn name(&self) -> &str;

    /// Constructs a team for the given context.
    ///
    /// The default delegates to the context's source unchanged.
    fn create_team(&self, context: &dyn ExecutiveContext) -> Result<TeamRef, ExecutiveError> {
        context.team_source().create_team(context)
    }
}

/// Oversight that builds the team exactly as the source would.
pub struct DirectOversight {
    name: Cow<'static, str>,
}

impl DirectOversight {
    /// Creates a named passthrough oversight.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self { name: name.into() }
    }
}

impl TeamOversight for DirectOversight {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Oversight splitting one configured team into several smaller sub-teams
/// behind a round-robin [`CompositeTeam`].
///
/// Sub-teams are named `"{team}-{index}"` and sized by dividing the parent's
/// configured size (minimum 1 per part; an unspecified parent size stays
/// unspecified so the source's fallback applies per part).
pub struct SplitOversight {
    name: Cow<'static, str>,
    parts: usize,
}

impl SplitOversight {
    /// Creates a split oversight producing `parts` sub-teams (minimum 1).
    pub fn new(name: impl Into<Cow<'static, str>>, parts: usize) -> Self {
        Self {
            name: name.into(),
            parts: parts.max(1),
        }
    }
}

impl TeamOversight for SplitOversight {
    fn name(&self) -> &str {
        &self.name
    }

    fn create_team(&self, context: &dyn ExecutiveContext) -> Result<TeamRef, ExecutiveError> {
        let parts = self.parts;
        let mut teams = Vec::with_capacity(parts);
        for index in 0..parts {
            let suffix = index.to_string();
            let wrapped = TeamSourceContextWrapper::new(
                context,
                move |size| {
                    if size == 0 {
                        0
                    } else {
                        (size / parts).max(1)
                    }
                },
                Some(&suffix),
                None,
            );
            teams.push(context.team_source().create_team(&wrapped)?);
        }
        Ok(Box::new(CompositeTeam::new(
            context.team_name().to_string(),
            teams,
        )))
    }
}

/// Team facade distributing jobs round-robin across underlying teams.
pub struct CompositeTeam {
    name: String,
    teams: Vec<TeamRef>,
    next: AtomicUsize,
}

impl CompositeTeam {
    /// Creates a composite over the given (non-empty) underlying teams.
    pub fn new(name: String, teams: Vec<TeamRef>) -> Self {
        Self {
            name,
            teams,
            next: AtomicUsize::new(0),
        }
    }
}

impl std::fmt::Debug for CompositeTeam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeTeam")
            .field("name", &self.name)
            .field("teams", &self.teams)
            .finish()
    }
}

impl Team for CompositeTeam {
    fn team_name(&self) -> &str {
        &self.name
    }

    fn start_working(&self) -> Result<(), ExecutiveError> {
        for team in &self.teams {
            team.start_working()?;
        }
        Ok(())
    }

    fn assign_job(&self, job: Job) -> Result<(), ExecutiveError> {
        if self.teams.is_empty() {
            return Err(ExecutiveError::TeamNotRunning {
                team: self.name.clone(),
            });
        }
        let index = self.next.fetch_add(1, Ordering::Relaxed) % self.teams.len();
        self.teams[index].assign_job(job)
    }

    fn stop_working(&self) {
        for team in &self.teams {
            team.stop_working();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::context::TeamBuildContext;
    use crate::exec::executive::{Config, DefaultExecutive};
    use crate::teams::{PooledTeamSource, TeamSource, TeamSourceContext};
    use std::collections::HashSet;
    use std::sync::mpsc;

    #[test]
    fn direct_oversight_delegates_to_the_source() {
        let source = PooledTeamSource::new();
        let executive = DefaultExecutive::new(Config::default()).expect("executive");
        let context = TeamBuildContext::new("direct", 1, &source, &executive);

        let oversight = DirectOversight::new("direct");
        assert_eq!(oversight.name(), "direct");

        let team = oversight.create_team(&context).expect("create team");
        assert_eq!(team.team_name(), "direct");
        team.start_working().expect("start");

        let (tx, rx) = mpsc::channel();
        team.assign_job(Box::new(move || tx.send(()).unwrap()))
            .expect("assign");
        rx.recv().expect("job ran");
        team.stop_working();
    }

    #[test]
    fn split_oversight_distributes_across_sub_teams() {
        let source = PooledTeamSource::new();
        let executive = DefaultExecutive::new(Config::default()).expect("executive");
        let context = TeamBuildContext::new("alpha", 2, &source, &executive);

        let team = SplitOversight::new("split", 2)
            .create_team(&context)
            .expect("create composite");
        assert_eq!(team.team_name(), "alpha");
        team.start_working().expect("start");

        let (tx, rx) = mpsc::channel();
        for _ in 0..8 {
            let tx = tx.clone();
            team.assign_job(Box::new(move || {
                let name = std::thread::current()
                    .name()
                    .unwrap_or_default()
                    .to_string();
                tx.send(name).unwrap();
            }))
            .expect("assign");
        }

        let mut prefixes = HashSet::new();
        for _ in 0..8 {
            let name = rx.recv().expect("job ran");
            // Worker threads are named "{sub-team}-{worker}".
            assert!(name.starts_with("alpha-"), "unexpected thread name {name}");
            let prefix: String = name.rsplitn(2, '-').nth(1).unwrap_or_default().to_string();
            prefixes.insert(prefix);
        }
        team.stop_working();

        let expected: HashSet<String> = ["alpha-0".to_string(), "alpha-1".to_string()]
            .into_iter()
            .collect();
        assert_eq!(prefixes, expected);
    }

    struct FailingSource;

    impl TeamSource for FailingSource {
        fn create_team(
            &self,
            context: &dyn TeamSourceContext,
        ) -> Result<TeamRef, ExecutiveError> {
            Err(ExecutiveError::TeamBuild {
                team: context.team_name().to_string(),
                reason: "source refused".to_string(),
            })
        }
    }

    #[test]
    fn construction_failures_propagate() {
        let source = FailingSource;
        let executive = DefaultExecutive::new(Config::default()).expect("executive");
        let context = TeamBuildContext::new("broken", 1, &source, &executive);

        let err = SplitOversight::new("split", 2)
            .create_team(&context)
            .expect_err("failure propagates");
        assert_eq!(err.as_label(), "team_build_failed");
    }
}
