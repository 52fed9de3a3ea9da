//! # teamvisor
//!
//! **Teamvisor** is the managed execution core of an application server:
//! pluggable executives, supervised worker-pool teams, and buffered server
//! input streaming with cooperative backpressure.
//!
//! It provides the primitives a configuration/compiler layer needs to turn
//! declarative team definitions into running worker pools, to hand units of
//! work to a scheduling authority, and to feed inbound socket bytes to
//! consumers without blocking I/O threads. The crate is designed as a
//! building block for higher-level server frameworks.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌───────────────────────────────────────────────────────────────┐
//!     │  Executive (scheduling authority)                             │
//!     │  - create_process_identifier() → ProcessIdentifier            │
//!     │  - manage_execution(Execution) → ProcessManager               │
//!     │  - execution_strategies() / team_oversights()                 │
//!     │  - create_thread_factory(name) / background_scheduler()       │
//!     └──────┬───────────────────────┬────────────────────────┬──────┘
//!            ▼                       ▼                        ▼
//!     ┌──────────────┐      ┌─────────────────┐      ┌──────────────────┐
//!     │ TeamOversight│      │ ExecutionStrategy│     │ BackgroundSched. │
//!     │ (construction│      │ (named factory   │     │ (TimerThread:    │
//!     │  policy)     │      │  bundles)        │     │  delayed jobs)   │
//!     └──────┬───────┘      └─────────────────┘      └──────────────────┘
//!            ▼
//!     ┌──────────────┐   ExecutiveContext    ┌──────────────────────────┐
//!     │  TeamSource  │ ◄──(name, size,────── │ TeamBuildContext /       │
//!     │ (pool impl)  │    thread factory)    │ TeamSourceContextWrapper │
//!     └──────┬───────┘                       └──────────────────────────┘
//!            ▼
//!     ┌──────────────┐    assign_job()   ┌────────────────────────────┐
//!     │     Team     │ ◄──────────────── │ workers via ThreadFactory  │
//!     │ (worker pool)│                   │ (+ WorkerEnvironment wrap) │
//!     └──────────────┘                   └────────────────────────────┘
//!
//!     Events: teams/executive/timer ── publish ──► Bus ──► SubscriberSet
//! ```
//!
//! ### Stream core
//! ```text
//! network thread ── input_data(bytes, further) ──► ServerInputStream
//!                                                     │
//!            ┌────────────────────────────────────────┤
//!            ▼                                        ▼
//!     primary cursor (consuming)          browse cursors (non-destructive)
//!     read() → Byte | Pending | EndOfStream     independent positions
//!     available() → Bytes(n) | EndOfStream      same chunk chain
//!
//!     export_state() once complete → StreamMomento (serde) → from_momento()
//! ```
//!
//! ### Team lifecycle
//! ```text
//! TeamSource::create_team(ctx)        (directly or through a TeamOversight)
//!   │
//!   ├─► start_working()   spawn workers through ctx.thread_factory()
//!   ├─► assign_job()*     FIFO queue, panic-isolated execution
//!   └─► stop_working()    close queue → drain → join workers
//! ```
//!
//! ## Features
//! | Area            | Description                                                   | Key types / traits                          |
//! |-----------------|---------------------------------------------------------------|---------------------------------------------|
//! | **Executives**  | Process identity, managed execution, strategy/oversight sets. | [`Executive`], [`DefaultExecutive`]         |
//! | **Teams**       | Worker pools and their construction boundary.                 | [`Team`], [`TeamSource`], [`PooledTeam`]    |
//! | **Threading**   | Factory-based spawning with environment wrapping.             | [`ThreadFactory`], [`WorkerEnvironment`]    |
//! | **Streaming**   | Buffered input with browse cursors and momento export.        | [`ServerInputStream`], [`BrowseInputStream`]|
//! | **Scheduling**  | Delayed jobs outside process-scoped threads.                  | [`BackgroundScheduler`], [`TimerThread`]    |
//! | **Events**      | Lifecycle observability with subscriber fan-out.              | [`Bus`], [`Event`], [`Subscribe`]           |
//! | **Errors**      | Typed errors for construction and stream misuse.              | [`ExecutiveError`], [`StreamError`]         |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use teamvisor::{
//!     Availability, Config, DefaultExecutive, Executive, ExecutionFn, PooledTeamSource,
//!     ProcessManager, ReadResult, ServerInputStream, TeamBuildContext, TeamSource,
//! };
//!
//! fn main() -> Result<(), teamvisor::ExecutiveError> {
//!     let executive = DefaultExecutive::new(Config::default())?;
//!
//!     // Build a team the way a configuration layer would.
//!     let source = PooledTeamSource::new().with_bus(executive.bus().clone());
//!     let context = TeamBuildContext::new("web", 2, &source, &executive);
//!     let team = source.create_team(&context)?;
//!     team.start_working()?;
//!     team.assign_job(Box::new(|| {
//!         // runs on a "web-N" worker thread
//!     }))?;
//!     team.stop_working();
//!
//!     // Hand a unit of work to the executive.
//!     let id = executive.create_process_identifier();
//!     let manager =
//!         executive.manage_execution(ExecutionFn::boxed(move || Ok(ProcessManager::new(id))))?;
//!     assert!(!manager.is_cancellation_requested());
//!
//!     // Feed request bytes in as they arrive; read without ever blocking.
//!     let stream = ServerInputStream::new();
//!     stream.input_data(Some(&[10, 20]), true).expect("receiving");
//!     assert_eq!(stream.read(), ReadResult::Byte(10));
//!     assert_eq!(stream.read(), ReadResult::Byte(20));
//!     assert_eq!(stream.read(), ReadResult::Pending);
//!     stream.input_data(None, false).expect("terminal");
//!     assert_eq!(stream.available(), Availability::EndOfStream);
//!     Ok(())
//! }
//! ```

mod error;
mod events;
mod exec;
mod stream;
mod subscribers;
mod teams;

// ---- Public re-exports ----

pub use error::{ExecutiveError, StreamError};
pub use events::{Bus, Event, EventKind};
pub use exec::{
    BackgroundJob, BackgroundScheduler, CompositeTeam, Config, DefaultExecutive, DirectOversight,
    Execution, ExecutionFn, ExecutionStrategy, Executive, ExecutiveContext, ExecutiveOfficeContext,
    ExecutiveStartContext, OfficeManager, ProcessIdentifier, ProcessManager, SplitOversight,
    TeamBuildContext, TeamOversight, TimerThread,
};
pub use stream::{Availability, BrowseInputStream, ReadResult, ServerInputStream, StreamMomento};
pub use subscribers::{Subscribe, SubscriberSet};
pub use teams::{
    EnvironmentThreadFactory, Job, NamedThreadFactory, PooledTeam, PooledTeamSource, Team, TeamRef,
    TeamSource, TeamSourceContext, TeamSourceContextWrapper, ThreadFactory, WorkerBody,
    WorkerEnvironment,
};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
