//! Error kinds for the rescheduling pass.

use thiserror::Error;

use crate::LatLng;

#[derive(Debug, Error)]
pub enum RerouteError {
    #[error("time `{0}` is not in HH:MM format")]
    InvalidTimeFormat(String),

    #[error("time `{0}` is out of range (hour must be <= 24, minute <= 59)")]
    InvalidTimeValue(String),

    #[error("unknown provider code {0}")]
    InvalidProvider(u32),

    #[error("booking {0} is not in the day schedule")]
    UnknownBooking(u64),

    #[error("booking {booking_id} has {records} schedule records, expected a pickup and a dropoff")]
    IncompleteBooking { booking_id: u64, records: usize },

    #[error("run {0} is not in the day schedule")]
    RunNotFound(String),

    #[error("run {0} has no depot-return stop")]
    MalformedRun(String),

    #[error("insertion position {0} is not in the day schedule")]
    PositionOutOfRange(usize),

    #[error("no route found between {from:?} and {to:?}")]
    NoRoute { from: LatLng, to: LatLng },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, RerouteError>;
