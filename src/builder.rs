//! Schedule building: route optimization, day-count planning, and
//! work-hours fitting wired into one entry point.
//!
//! `build_schedule` is a pure function over its request; the caller owns
//! fetching travel data up front (see `matrix::MatrixClient`) and
//! persisting the returned aggregate.

use crate::clock;
use crate::error::ScheduleError;
use crate::fitter::{self, FitterConfig};
use crate::haversine::{self, HaversineMatrix};
use crate::matrix::DistanceMatrix;
use crate::route::{self, RouteNode};
use crate::types::{
    Accommodation, DurationMode, Location, Meal, OptimizationType, ProjectConfig, RestStop,
    Schedule, TimeSlot, Transport,
};

/// Inter-location travel assumed when no transport config exists and no
/// travel data is available.
pub const DEFAULT_TRAVEL_BUFFER_MIN: u32 = 10;

const DEFAULT_EARLY_MORNING_START: &str = "05:00";
const DEFAULT_NIGHT_SHOOTING_END: &str = "22:00";

/// Weights for the balanced cost view: travel minutes vs kilometers.
const BALANCED_DURATION_WEIGHT: f64 = 0.6;
const BALANCED_DISTANCE_WEIGHT: f64 = 0.4;

/// Everything one generation run needs. All borrowed; nothing is mutated.
#[derive(Debug, Clone)]
pub struct ScheduleRequest<'a> {
    pub locations: &'a [Location],
    pub config: &'a ProjectConfig,
    pub accommodations: &'a [Accommodation],
    pub meals: &'a [Meal],
    pub rest_stops: &'a [RestStop],
    pub transports: &'a [Transport],
    /// Precomputed travel matrix indexed by `locations` order, if any.
    pub distance_matrix: Option<&'a DistanceMatrix>,
    pub optimization: OptimizationType,
}

/// Generate a complete schedule: optimize the visiting order (unless the
/// caller opted out), fit the ordered queue into working days, and
/// assemble the aggregate with travel totals and exclusions.
pub fn build_schedule(req: &ScheduleRequest) -> Result<Schedule, ScheduleError> {
    if req.locations.is_empty() {
        return Err(ScheduleError::NoLocations);
    }

    let work_start_min = clock::to_minutes(&req.config.work_start_time)?;
    let work_end_min = clock::to_minutes(&req.config.work_end_time)?;
    let early_morning_start_min = if req.config.allow_early_morning {
        Some(clock::to_minutes(
            req.config
                .early_morning_start
                .as_deref()
                .unwrap_or(DEFAULT_EARLY_MORNING_START),
        )?)
    } else {
        None
    };
    let night_shooting_end_min = if req.config.allow_night_shooting {
        Some(clock::to_minutes(
            req.config
                .night_shooting_end
                .as_deref()
                .unwrap_or(DEFAULT_NIGHT_SHOOTING_END),
        )?)
    } else {
        None
    };

    let travel_buffer_min = req
        .transports
        .first()
        .map(|t| t.default_travel_buffer)
        .unwrap_or(DEFAULT_TRAVEL_BUFFER_MIN);

    // A matrix that does not match the location count cannot be trusted;
    // degrade to estimates rather than misindexing it.
    let matrix = req.distance_matrix.filter(|m| {
        if m.len() == req.locations.len() {
            true
        } else {
            tracing::warn!(
                matrix = m.len(),
                locations = req.locations.len(),
                "distance matrix size mismatch, ignoring it"
            );
            false
        }
    });

    // Caller-supplied order is the default sequence and the optimizer's
    // starting point.
    let mut ordered: Vec<usize> = (0..req.locations.len()).collect();
    ordered.sort_by_key(|&i| (req.locations[i].order, i));

    if req.optimization != OptimizationType::None {
        ordered = optimize_order(req, matrix, ordered);
    }

    let planned_days = match req.config.duration_mode {
        DurationMode::Fixed => match (req.config.start_date, req.config.end_date) {
            (Some(start), Some(end)) => ((end - start).num_days().max(0) as u32) + 1,
            _ => 1,
        },
        DurationMode::Auto => {
            let daily_window = work_end_min.saturating_sub(work_start_min).max(1);
            let total: u32 = ordered
                .iter()
                .map(|&i| clock::location_total_minutes(&req.locations[i]) + travel_buffer_min)
                .sum();
            total.div_ceil(daily_window).max(1)
        }
    };

    let fitter_config = FitterConfig {
        work_start_min,
        work_end_min,
        early_morning_start_min,
        night_shooting_end_min,
        travel_buffer_min,
        duration_mode: req.config.duration_mode,
        planned_days,
        start_date: req.config.start_date,
        departure: req.config.departure_coords(),
    };

    let outcome = fitter::fit_work_hours(
        req.locations,
        &ordered,
        matrix,
        req.accommodations,
        req.meals,
        &fitter_config,
    )?;

    tracing::info!(
        total_days = outcome.total_days,
        items = outcome.items.len(),
        excluded = outcome.excluded.len(),
        overtime = outcome.has_overtime_warning,
        "schedule generated"
    );

    Ok(Schedule {
        total_days: outcome.total_days,
        items: outcome.items,
        excluded_locations: outcome.excluded,
        total_distance_km: outcome.total_distance_km,
        total_duration_min: outcome.total_duration_min,
        has_overtime_warning: outcome.has_overtime_warning,
    })
}

/// Run the route optimizer over the caller-ordered locations and return
/// the improved order (as indices into the original location slice).
///
/// The cost view depends on the requested optimization: travel minutes,
/// kilometers, or a 60/40 blend. Without an external matrix a
/// straight-line matrix is synthesized; without enough coordinates the
/// caller order stands.
fn optimize_order(
    req: &ScheduleRequest,
    matrix: Option<&DistanceMatrix>,
    ordered: Vec<usize>,
) -> Vec<usize> {
    let locations = req.locations;
    let with_coords = locations.iter().filter(|l| l.coords().is_some()).count();
    if matrix.is_none() && with_coords < 2 {
        tracing::debug!(with_coords, "too few coordinates, keeping caller order");
        return ordered;
    }

    let synthesized;
    let source: &DistanceMatrix = match matrix {
        Some(matrix) => matrix,
        None => {
            let coords: Vec<_> = locations.iter().map(Location::coords).collect();
            synthesized = HaversineMatrix::default().matrix_for(&coords);
            &synthesized
        }
    };

    let view = |from: usize, to: usize| -> Option<f64> {
        blend(
            req.optimization,
            source.duration_min(from, to),
            source.distance_km(from, to),
        )
    };

    // A departure point becomes a synthetic node pinned to the front so
    // the route always leaves from it.
    let departure = req.config.departure_coords();
    let offset = usize::from(departure.is_some());
    let mut nodes: Vec<RouteNode> = Vec::with_capacity(ordered.len() + offset);
    if departure.is_some() {
        nodes.push(RouteNode::new(TimeSlot::EarlyMorning));
    }
    nodes.extend(ordered.iter().map(|&i| RouteNode::from(&locations[i])));

    let n = nodes.len();
    let mut costs = vec![vec![None; n]; n];
    for a in 0..n {
        for b in 0..n {
            if a == b {
                continue;
            }
            costs[a][b] = if a >= offset && b >= offset {
                view(ordered[a - offset], ordered[b - offset])
            } else {
                // A leg touching the departure node is always estimated
                // straight-line.
                let from = position_coords(a, offset, departure, &ordered, locations);
                let to = position_coords(b, offset, departure, &ordered, locations);
                let km = haversine::distance_km(from, to);
                let minutes = km / haversine::DEFAULT_SPEED_KMH * 60.0;
                blend(req.optimization, Some(minutes), Some(km))
            };
        }
    }

    let result = route::optimize_route(&nodes, &costs, departure.map(|_| 0), None);
    tracing::debug!(total_cost = result.total_cost, "route optimized");

    result
        .route
        .iter()
        .filter(|&&pos| pos >= offset)
        .map(|&pos| ordered[pos - offset])
        .collect()
}

fn blend(
    optimization: OptimizationType,
    duration_min: Option<f64>,
    distance_km: Option<f64>,
) -> Option<f64> {
    match optimization {
        OptimizationType::ShortestTime => duration_min,
        OptimizationType::ShortestDistance => distance_km,
        OptimizationType::Balanced | OptimizationType::None => {
            match (duration_min, distance_km) {
                (Some(min), Some(km)) => {
                    Some(BALANCED_DURATION_WEIGHT * min + BALANCED_DISTANCE_WEIGHT * km)
                }
                _ => None,
            }
        }
    }
}

fn position_coords(
    pos: usize,
    offset: usize,
    departure: Option<(f64, f64)>,
    ordered: &[usize],
    locations: &[Location],
) -> Option<(f64, f64)> {
    if pos < offset {
        departure
    } else {
        locations[ordered[pos - offset]].coords()
    }
}
