//! reroute - reassign stranded paratransit ride requests.
//!
//! Reads a day schedule, runs one rescheduling pass, prints the per-request
//! report as JSON on stdout. Logs go to stderr.

mod cli;

use std::fs::File;
use std::io::{BufReader, BufWriter};

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use paratransit_reroute::config::RerouteConfig;
use paratransit_reroute::error::Result;
use paratransit_reroute::extract::{self, Breakdown};
use paratransit_reroute::haversine::HaversineRouter;
use paratransit_reroute::options::Rescheduler;
use paratransit_reroute::osrm::OsrmClient;
use paratransit_reroute::routing::RoutingClient;
use paratransit_reroute::schedule::{DaySchedule, ScheduleRecord};
use paratransit_reroute::time::{seconds_to_hhmm, time_to_seconds};
use paratransit_reroute::traits::{RoutingOracle, UnlimitedCapacity};

use crate::cli::{Cli, Command};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,paratransit_reroute=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RerouteConfig::from_path(path)?,
        None => RerouteConfig::default(),
    };

    let records: Vec<ScheduleRecord> = serde_json::from_reader(BufReader::new(File::open(&cli.schedule)?))?;
    let schedule = DaySchedule::new(records);
    info!(records = schedule.len(), runs = schedule.runs().len(), "day schedule loaded");

    let oracle: Box<dyn RoutingOracle> = if cli.offline {
        info!("using straight-line travel estimates");
        Box::new(HaversineRouter::default())
    } else {
        info!(base_url = %config.osrm.base_url, "using OSRM");
        Box::new(OsrmClient::new(config.osrm.clone())?)
    };
    let client = RoutingClient::new(oracle, config.max_concurrency)?;
    let rescheduler = Rescheduler::new(&client, &config, &UnlimitedCapacity);

    let (requests, provider) = match &cli.command {
        Command::BrokenRun {
            run,
            cutoff,
            stranded_at,
            provider,
        } => {
            let breakdown = Breakdown {
                run: run.clone(),
                cutoff: time_to_seconds(cutoff)?,
                stranded_at: *stranded_at,
            };
            info!(
                run = %breakdown.run,
                cutoff = %seconds_to_hhmm(breakdown.cutoff),
                stranded = breakdown.stranded_at.is_some(),
                "rescheduling broken run"
            );
            (extract::from_broken_run(&schedule, &breakdown, &config), *provider)
        }
        Command::Bookings { ids } => (extract::from_booking_ids(&schedule, ids)?, None),
    };

    let new_vehicle_cost = provider.and_then(|code| {
        match rescheduler.new_vehicle_for(&schedule, &requests, code) {
            Ok(cost) => cost,
            Err(err) => {
                warn!(provider = code, error = %err, "could not price a new vehicle");
                None
            }
        }
    });

    let mut pass = rescheduler.run(schedule, requests);
    pass.report.new_vehicle_cost = new_vehicle_cost;

    serde_json::to_writer_pretty(std::io::stdout().lock(), &pass.report)?;
    println!();

    if let Some(path) = &cli.write_schedule {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &pass.schedule.records_in_order())?;
        info!(path = %path.display(), "updated schedule written");
    }

    Ok(())
}
