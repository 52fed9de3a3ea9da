//! Build a team through the executive machinery and service a few jobs.
//!
//! Run with: `cargo run --example basic_team`

use teamvisor::{
    Config, DefaultExecutive, DirectOversight, PooledTeamSource, TeamBuildContext, TeamOversight,
};

fn main() -> Result<(), teamvisor::ExecutiveError> {
    let executive = DefaultExecutive::new(Config::default())?;

    // A configuration layer would drive this: source + context → team.
    let source = PooledTeamSource::new().with_bus(executive.bus().clone());
    let context = TeamBuildContext::new("web", 4, &source, &executive);
    let team = DirectOversight::new("direct").create_team(&context)?;
    team.start_working()?;

    let (tx, rx) = std::sync::mpsc::channel();
    for request in 0..8 {
        let tx = tx.clone();
        team.assign_job(Box::new(move || {
            let worker = std::thread::current()
                .name()
                .unwrap_or_default()
                .to_string();
            tx.send((request, worker)).unwrap();
        }))?;
    }
    drop(tx);

    while let Ok((request, worker)) = rx.recv() {
        println!("request {request} serviced by {worker}");
    }

    team.stop_working();
    Ok(())
}
