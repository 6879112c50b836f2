//! Ranking insertion options against the fallbacks, and the rescheduling
//! pass that commits them one request at a time.

use rayon::prelude::*;
use serde::Serialize;

use crate::candidates::nearby_runs;
use crate::config::RerouteConfig;
use crate::cost::{TaxiCost, new_vehicle_cost, taxi_cost};
use crate::error::Result;
use crate::extract::UnroutedRequest;
use crate::feasibility::{InsertionCandidate, evaluate};
use crate::mutate::apply_insertion;
use crate::routing::{RoutingClient, UNROUTABLE_SECONDS};
use crate::schedule::DaySchedule;
use crate::traits::{CapacityChecker, RoutingOracle};

/// An insertion candidate with the figures a dispatcher reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedOption {
    #[serde(flatten)]
    pub candidate: InsertionCandidate,
    pub pickup_after_stop: usize,
    pub dropoff_after_stop: usize,
    pub delay_cost: f64,
}

impl RankedOption {
    fn new(candidate: InsertionCandidate, config: &RerouteConfig) -> Self {
        let (pickup_after_stop, dropoff_after_stop) = candidate.stop_numbers();
        let delay_cost = delay_cost(&candidate, config);
        Self {
            candidate,
            pickup_after_stop,
            dropoff_after_stop,
            delay_cost,
        }
    }
}

/// Cost of an insertion to the fleet: added route hours plus a penalty per
/// newly broken window.
pub fn delay_cost(candidate: &InsertionCandidate, config: &RerouteConfig) -> f64 {
    candidate.additional_time as f64 / 3600.0 * config.bus_delay_cost_per_hour
        + candidate.additional_broken_windows as f64 * config.broken_window_penalty
}

/// Order candidates by fewest newly broken windows, then least added time.
pub fn rank(candidates: &mut [InsertionCandidate]) {
    candidates.sort_by(|a, b| {
        (a.additional_broken_windows, a.additional_time, &a.run)
            .cmp(&(b.additional_broken_windows, b.additional_time, &b.run))
    });
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestOptions {
    pub booking_id: u64,
    pub candidates: Vec<RankedOption>,
    pub taxi: TaxiCost,
}

/// What happens to a request at the end of the pass.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Disposition {
    Bus(RankedOption),
    Taxi { fare: f64 },
    Unassigned,
}

impl Disposition {
    pub fn label(&self) -> &'static str {
        match self {
            Disposition::Bus(_) => "bus",
            Disposition::Taxi { .. } => "taxi",
            Disposition::Unassigned => "unassigned",
        }
    }
}

/// The best bus option when it costs no more than the taxi, else the taxi.
pub fn preferred_option(options: &RequestOptions) -> Disposition {
    let taxi = options.taxi.comparable();
    match (options.candidates.first(), options.taxi) {
        (Some(best), _) if best.delay_cost <= taxi => Disposition::Bus(best.clone()),
        (_, TaxiCost::Fare(fare)) => Disposition::Taxi { fare },
        _ => Disposition::Unassigned,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestOutcome {
    pub request: UnroutedRequest,
    pub options: RequestOptions,
    pub disposition: Disposition,
}

/// Per-request results of a pass, for the reporting collaborator.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RescheduleReport {
    pub outcomes: Vec<RequestOutcome>,
    /// Cost of one new vehicle serving the whole broken run instead.
    pub new_vehicle_cost: Option<f64>,
}

pub struct ReschedulePass {
    pub schedule: DaySchedule,
    pub report: RescheduleReport,
}

pub struct Rescheduler<'a, R, C> {
    client: &'a RoutingClient<R>,
    config: &'a RerouteConfig,
    capacity: &'a C,
}

impl<'a, R, C> Rescheduler<'a, R, C>
where
    R: RoutingOracle,
    C: CapacityChecker,
{
    pub fn new(client: &'a RoutingClient<R>, config: &'a RerouteConfig, capacity: &'a C) -> Self {
        Self {
            client,
            config,
            capacity,
        }
    }

    /// Evaluate every nearby run for `request` against `schedule`, in parallel.
    pub fn options_for(&self, schedule: &DaySchedule, request: &UnroutedRequest) -> RequestOptions {
        let runs = nearby_runs(schedule, request, &self.config.radius);

        let mut candidates: Vec<InsertionCandidate> = runs
            .par_iter()
            .filter_map(|run| {
                let route = match schedule.route_slice(run, None) {
                    Ok(route) => route,
                    Err(err) => {
                        tracing::warn!(%run, error = %err, "skipping candidate run");
                        return None;
                    }
                };
                let candidate = evaluate(&route, request, self.client, self.config)?;
                if candidate.additional_time >= UNROUTABLE_SECONDS {
                    tracing::debug!(%run, booking_id = request.booking_id, "only unroutable detours");
                    return None;
                }
                if !self.capacity.approves(&route, &candidate, request) {
                    tracing::debug!(%run, booking_id = request.booking_id, "rejected by capacity check");
                    return None;
                }
                Some(candidate)
            })
            .collect();
        rank(&mut candidates);

        RequestOptions {
            booking_id: request.booking_id,
            candidates: candidates
                .into_iter()
                .map(|candidate| RankedOption::new(candidate, self.config))
                .collect(),
            taxi: taxi_cost(request, self.client, self.config),
        }
    }

    /// Decide every request in ascending pickup-window start, committing each
    /// bus insertion before the next request is evaluated.
    pub fn run(&self, schedule: DaySchedule, mut requests: Vec<UnroutedRequest>) -> ReschedulePass {
        requests.sort_by_key(|request| request.pickup_window.0);

        let mut schedule = schedule;
        let mut outcomes = Vec::with_capacity(requests.len());
        for mut request in requests {
            let options = self.options_for(&schedule, &request);
            let mut disposition = preferred_option(&options);

            if let Disposition::Bus(option) = &disposition {
                match apply_insertion(&schedule, &option.candidate, &request) {
                    Ok(applied) => {
                        request.pickup_insert = applied.schedule.get(applied.pickup_record).eta;
                        request.dropoff_insert = applied.schedule.get(applied.dropoff_record).eta;
                        request.pickup_record = Some(applied.pickup_record);
                        schedule = applied.schedule;
                    }
                    Err(err) => {
                        tracing::error!(booking_id = request.booking_id, error = %err, "commit failed");
                        disposition = Disposition::Unassigned;
                    }
                }
            }

            tracing::info!(
                booking_id = request.booking_id,
                options = options.candidates.len(),
                disposition = disposition.label(),
                "request decided"
            );
            outcomes.push(RequestOutcome {
                request,
                options,
                disposition,
            });
        }

        ReschedulePass {
            schedule,
            report: RescheduleReport {
                outcomes,
                new_vehicle_cost: None,
            },
        }
    }

    /// Cost of a new vehicle from `provider_code` covering what is left of
    /// the requests' origin run, from the earliest pending pickup onward.
    /// `None` when there is nothing left to cover.
    pub fn new_vehicle_for(
        &self,
        schedule: &DaySchedule,
        requests: &[UnroutedRequest],
        provider_code: u32,
    ) -> Result<Option<f64>> {
        let Some(run) = requests.first().map(|request| request.origin_run.as_str()) else {
            return Ok(None);
        };
        let from_position = requests
            .iter()
            .filter_map(|request| request.pickup_record)
            .filter_map(|id| schedule.position_of(id))
            .min();
        let route = schedule.route_slice(run, from_position)?;
        new_vehicle_cost(&route, provider_code, self.client, self.config).map(Some)
    }
}
