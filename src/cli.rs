//! CLI argument parsing for the reroute binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use paratransit_reroute::LatLng;

#[derive(Parser)]
#[command(name = "reroute", about = "Reassign ride requests stranded by a broken paratransit run")]
pub struct Cli {
    /// Day schedule: JSON array of schedule records in schedule order
    #[arg(long)]
    pub schedule: PathBuf,

    /// JSON config file overriding the defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Estimate travel with straight-line distance instead of OSRM
    #[arg(long)]
    pub offline: bool,

    /// Write the updated day schedule to this file
    #[arg(long)]
    pub write_schedule: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Reschedule every booking still pending on a broken run
    BrokenRun {
        #[arg(long)]
        run: String,
        /// Rescheduling starts at this time of day (HH:MM)
        #[arg(long)]
        cutoff: String,
        /// Breakdown location as "lat,lng"; passengers on board are re-picked up there
        #[arg(long, value_parser = parse_lat_lng)]
        stranded_at: Option<LatLng>,
        /// Price a replacement vehicle from this provider
        #[arg(long)]
        provider: Option<u32>,
    },
    /// Reschedule bookings flagged by a dispatcher
    Bookings {
        /// Comma-separated booking ids
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<u64>,
    },
}

fn parse_lat_lng(value: &str) -> Result<LatLng, String> {
    let (lat, lng) = value
        .split_once(',')
        .ok_or_else(|| format!("expected \"lat,lng\", got `{value}`"))?;
    let lat = lat.trim().parse::<f64>().map_err(|err| err.to_string())?;
    let lng = lng.trim().parse::<f64>().map_err(|err| err.to_string())?;
    Ok((lat, lng))
}
