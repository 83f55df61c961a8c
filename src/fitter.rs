//! Work-hours fitting: lays an ordered location queue into day-bounded
//! working windows.
//!
//! Each day runs through the same phases: early-morning block, normal
//! window with carry-over to the next day, automatic lunch insertion,
//! night block, then accommodation check-in. Scheduling never hard-fails
//! on unschedulable input; locations that cannot be placed come back in
//! the exclusion list with a reason, and overflow is reported through the
//! overtime flag.

use std::collections::VecDeque;

use chrono::{Duration, NaiveDate};

use crate::clock;
use crate::error::ScheduleError;
use crate::haversine;
use crate::matrix::DistanceMatrix;
use crate::meal;
use crate::types::{
    Accommodation, DurationMode, ExcludedLocation, ExclusionReason, ItemKind, Location, Meal,
    Priority, ScheduleItem,
};

#[derive(Debug, Clone)]
pub struct FitterConfig {
    pub work_start_min: u32,
    pub work_end_min: u32,
    /// Set only when early-morning shooting is allowed.
    pub early_morning_start_min: Option<u32>,
    /// Set only when night shooting is allowed.
    pub night_shooting_end_min: Option<u32>,
    /// Travel fallback when neither matrix nor coordinates help.
    pub travel_buffer_min: u32,
    pub duration_mode: DurationMode,
    /// Configured day span (fixed) or the initial estimate (auto).
    pub planned_days: u32,
    pub start_date: Option<NaiveDate>,
    /// Departure point for day-1 travel estimation.
    pub departure: Option<(f64, f64)>,
}

#[derive(Debug, Clone)]
pub struct FitOutcome {
    pub items: Vec<ScheduleItem>,
    pub excluded: Vec<ExcludedLocation>,
    pub total_days: u32,
    pub total_distance_km: f64,
    pub total_duration_min: u32,
    pub has_overtime_warning: bool,
}

/// Fit `ordered` (indices into `locations`) into day timetables.
///
/// In fixed mode the realized day count always equals `planned_days` and
/// overflow work is excluded by priority; in auto mode days are added
/// until the queue drains and nothing is ever excluded.
pub fn fit_work_hours(
    locations: &[Location],
    ordered: &[usize],
    matrix: Option<&DistanceMatrix>,
    accommodations: &[Accommodation],
    meals: &[Meal],
    config: &FitterConfig,
) -> Result<FitOutcome, ScheduleError> {
    // Partition by slot group. Slots whose window is disabled fall back
    // to the normal queue instead of being dropped.
    let mut early: VecDeque<usize> = VecDeque::new();
    let mut normal: VecDeque<usize> = VecDeque::new();
    let mut night: VecDeque<usize> = VecDeque::new();
    for &idx in ordered {
        match locations[idx].time_slot.group() {
            0 if config.early_morning_start_min.is_some() => early.push_back(idx),
            2 if config.night_shooting_end_min.is_some() => night.push_back(idx),
            _ => normal.push_back(idx),
        }
    }

    let fixed = config.duration_mode == DurationMode::Fixed;
    let mut total_days = config.planned_days.max(1);
    let mut items: Vec<ScheduleItem> = Vec::new();
    let mut excluded: Vec<ExcludedLocation> = Vec::new();
    let mut overtime = false;
    let mut total_distance_km = 0.0f64;
    let mut total_duration_min = 0u32;
    let mut prev_loc: Option<usize> = None;

    let mut day = 1u32;
    loop {
        let date = config
            .start_date
            .map(|start| start + Duration::days(i64::from(day) - 1));
        let is_final_fixed_day = fixed && day == total_days;
        let mut day_items: Vec<ScheduleItem> = Vec::new();

        // Day start: checkout time of the previous night's accommodation,
        // else the normal work start.
        let mut cursor = if day > 1 {
            match accommodations
                .get(day as usize - 2)
                .and_then(|acc| acc.check_out_time.as_deref())
            {
                Some(checkout) => clock::to_minutes(checkout)?,
                None => config.work_start_min,
            }
        } else {
            config.work_start_min
        };

        // Phase A: early-morning block. The optimizer puts the whole
        // group at the head of the queue, so it drains on day 1. These
        // items sit outside the normal window on purpose and never count
        // against the overtime check.
        if let Some(early_start) = config.early_morning_start_min {
            if !early.is_empty() {
                cursor = early_start;
                while let Some(idx) = early.pop_front() {
                    let loc = &locations[idx];
                    cursor = emit_location_block(&mut day_items, day, date, cursor, loc, false);
                    prev_loc = Some(idx);
                }
                // Wait for the normal window to open.
                cursor = cursor.max(config.work_start_min);
            }
        }

        // Phase B: normal window.
        while let Some(&idx) = normal.front() {
            let loc = &locations[idx];
            let (travel_min, travel_km) = travel_between(
                matrix,
                locations,
                prev_loc,
                idx,
                config.departure,
                day,
                config.travel_buffer_min,
            );
            let meal_min = if loc.has_meal { loc.meal_duration_min } else { 0 };
            let footprint = travel_min + clock::location_total_minutes(loc) + meal_min;
            let overflows = cursor + footprint > config.work_end_min;

            if overflows {
                let day_has_shooting = day_items.iter().any(|item| item.kind.is_shooting());
                if !day_has_shooting {
                    // A day is never left empty while work remains.
                    overtime = true;
                } else if is_final_fixed_day {
                    match loc.priority {
                        // Required work is never excluded; push past the
                        // window and flag it.
                        Priority::Required => overtime = true,
                        Priority::High => {
                            normal.pop_front();
                            exclude(&mut excluded, loc, ExclusionReason::DayLimitExceeded);
                            continue;
                        }
                        Priority::Medium => {
                            normal.pop_front();
                            exclude(&mut excluded, loc, ExclusionReason::InsufficientHours);
                            continue;
                        }
                        Priority::Low => {
                            normal.pop_front();
                            exclude(&mut excluded, loc, ExclusionReason::LowPriority);
                            continue;
                        }
                    }
                } else if fixed
                    && matches!(loc.priority, Priority::Medium | Priority::Low)
                {
                    // Fixed span: low-value work makes room instead of
                    // pushing everything behind it to the next day.
                    normal.pop_front();
                    let reason = if loc.priority == Priority::Medium {
                        ExclusionReason::InsufficientHours
                    } else {
                        ExclusionReason::LowPriority
                    };
                    exclude(&mut excluded, loc, reason);
                    continue;
                } else {
                    // Carry this location and everything behind it.
                    tracing::debug!(day, remaining = normal.len(), "carrying queue to next day");
                    break;
                }
            }

            normal.pop_front();

            if travel_min > 0 {
                push_item(
                    &mut day_items,
                    day,
                    date,
                    cursor,
                    travel_min,
                    ItemKind::Transport {
                        travel_min,
                        travel_km,
                    },
                    None,
                    format!("Travel to {}", loc.name),
                    None,
                );
                cursor += travel_min;
                total_duration_min += travel_min;
                total_distance_km += travel_km.unwrap_or(0.0);
            }

            cursor = emit_normal_block(&mut day_items, day, date, cursor, loc, config.work_end_min);
            prev_loc = Some(idx);
        }

        // Phase C: lunch over the daytime items, before any evening work
        // is emitted. Night and check-in items would otherwise mask the
        // lunch window on a day whose daytime work ends before 13:00.
        if !day_items.is_empty() {
            meal::insert_auto_meal(&mut day_items, day, date, meals, meal::DEFAULT_LUNCH_NAME);
            if let Some(end) = day_items.iter().map(|item| item.end_min).max() {
                cursor = cursor.max(end);
            }
        }

        // Phase D: night block, after the normal window closes.
        if config.night_shooting_end_min.is_some() {
            while let Some(idx) = night.pop_front() {
                let loc = &locations[idx];
                let (travel_min, travel_km) = travel_between(
                    matrix,
                    locations,
                    prev_loc,
                    idx,
                    config.departure,
                    day,
                    config.travel_buffer_min,
                );

                let mut start = (cursor + travel_min).max(config.work_end_min);
                if let Some(slot_start) = loc.time_slot_start.as_deref() {
                    start = start.max(clock::to_minutes(slot_start)?);
                }

                if travel_min > 0 {
                    push_item(
                        &mut day_items,
                        day,
                        date,
                        start - travel_min,
                        travel_min,
                        ItemKind::Transport {
                            travel_min,
                            travel_km,
                        },
                        None,
                        format!("Travel to {}", loc.name),
                        None,
                    );
                    total_duration_min += travel_min;
                    total_distance_km += travel_km.unwrap_or(0.0);
                }

                cursor = start;
                if loc.buffer_before > 0 {
                    push_item(
                        &mut day_items,
                        day,
                        date,
                        cursor,
                        loc.buffer_before,
                        ItemKind::Buffer,
                        None,
                        format!("{} setup", loc.name),
                        None,
                    );
                    cursor += loc.buffer_before;
                }
                push_item(
                    &mut day_items,
                    day,
                    date,
                    cursor,
                    loc.shooting_duration,
                    ItemKind::Shooting {
                        buffer_before_min: loc.buffer_before,
                        buffer_after_min: loc.buffer_after,
                        includes_meal: false,
                        // Night work is intentionally outside the normal
                        // window, so it is not flagged.
                        outside_work_hours: false,
                    },
                    Some(loc.id),
                    loc.name.clone(),
                    loc.address.clone(),
                );
                cursor += loc.shooting_duration;
                if let Some(night_end) = config.night_shooting_end_min {
                    if cursor > night_end {
                        overtime = true;
                    }
                }
                if loc.buffer_after > 0 {
                    push_item(
                        &mut day_items,
                        day,
                        date,
                        cursor,
                        loc.buffer_after,
                        ItemKind::Buffer,
                        None,
                        format!("{} teardown", loc.name),
                        None,
                    );
                    cursor += loc.buffer_after;
                }
                prev_loc = Some(idx);
            }
        }

        let work_remains = !normal.is_empty();
        let last_day = if fixed {
            day == total_days
        } else {
            !work_remains
        };

        if !day_items.is_empty() {
            // Phase E: accommodation check-in on every night but the last.
            if !last_day {
                if let Some(acc) = accommodations.get(day as usize - 1) {
                    let mut start = cursor;
                    if let Some(check_in) = acc.check_in_time.as_deref() {
                        start = start.max(clock::to_minutes(check_in)?);
                    }
                    push_item(
                        &mut day_items,
                        day,
                        date,
                        start,
                        0,
                        ItemKind::Accommodation,
                        Some(acc.id),
                        acc.name.clone(),
                        acc.address.clone(),
                    );
                }
            }

            // Final ordering.
            day_items.sort_by_key(|item| item.start_min);
            for (pos, item) in day_items.iter_mut().enumerate() {
                item.order = pos as u32;
            }
            items.extend(day_items);
        }

        if fixed {
            if day == total_days {
                // Day span exhausted: everything still queued is out.
                while let Some(idx) = normal.pop_front() {
                    exclude(
                        &mut excluded,
                        &locations[idx],
                        ExclusionReason::DayLimitExceeded,
                    );
                }
                break;
            }
        } else {
            if !work_remains {
                total_days = day;
                break;
            }
            if day == total_days {
                total_days += 1;
                tracing::debug!(total_days, "extending schedule by one day");
            }
        }

        day += 1;
    }

    Ok(FitOutcome {
        items,
        excluded,
        total_days,
        total_distance_km,
        total_duration_min,
        has_overtime_warning: overtime,
    })
}

/// Travel from the previously scheduled location to `next`: matrix cell
/// by original input index, else straight-line estimate, else the default
/// buffer. The day's first leg only has travel when a departure point is
/// configured (day 1).
fn travel_between(
    matrix: Option<&DistanceMatrix>,
    locations: &[Location],
    prev: Option<usize>,
    next: usize,
    departure: Option<(f64, f64)>,
    day: u32,
    default_min: u32,
) -> (u32, Option<f64>) {
    let to = &locations[next];
    match prev {
        Some(from_idx) => {
            if let Some(matrix) = matrix {
                if let Some(minutes) = matrix.duration_min(from_idx, next) {
                    return (minutes.round() as u32, matrix.distance_km(from_idx, next));
                }
            }
            match (locations[from_idx].coords(), to.coords()) {
                (Some(from), Some(to)) => {
                    let km = haversine::haversine_km(from, to);
                    (
                        haversine::travel_minutes(km, haversine::DEFAULT_SPEED_KMH),
                        Some(km),
                    )
                }
                _ => (default_min, None),
            }
        }
        None => {
            if day == 1 {
                if let (Some(dep), Some(dst)) = (departure, to.coords()) {
                    let km = haversine::haversine_km(dep, dst);
                    return (
                        haversine::travel_minutes(km, haversine::DEFAULT_SPEED_KMH),
                        Some(km),
                    );
                }
            }
            (0, None)
        }
    }
}

/// Emit setup / shooting / teardown for an early-morning location.
fn emit_location_block(
    day_items: &mut Vec<ScheduleItem>,
    day: u32,
    date: Option<NaiveDate>,
    mut cursor: u32,
    loc: &Location,
    outside_work_hours: bool,
) -> u32 {
    if loc.buffer_before > 0 {
        push_item(
            day_items,
            day,
            date,
            cursor,
            loc.buffer_before,
            ItemKind::Buffer,
            None,
            format!("{} setup", loc.name),
            None,
        );
        cursor += loc.buffer_before;
    }
    push_item(
        day_items,
        day,
        date,
        cursor,
        loc.shooting_duration,
        ItemKind::Shooting {
            buffer_before_min: loc.buffer_before,
            buffer_after_min: loc.buffer_after,
            includes_meal: false,
            outside_work_hours,
        },
        Some(loc.id),
        loc.name.clone(),
        loc.address.clone(),
    );
    cursor += loc.shooting_duration;
    if loc.buffer_after > 0 {
        push_item(
            day_items,
            day,
            date,
            cursor,
            loc.buffer_after,
            ItemKind::Buffer,
            None,
            format!("{} teardown", loc.name),
            None,
        );
        cursor += loc.buffer_after;
    }
    cursor
}

/// Emit setup / shooting / meal / teardown for a normal-window location.
fn emit_normal_block(
    day_items: &mut Vec<ScheduleItem>,
    day: u32,
    date: Option<NaiveDate>,
    mut cursor: u32,
    loc: &Location,
    work_end_min: u32,
) -> u32 {
    if loc.buffer_before > 0 {
        push_item(
            day_items,
            day,
            date,
            cursor,
            loc.buffer_before,
            ItemKind::Buffer,
            None,
            format!("{} setup", loc.name),
            None,
        );
        cursor += loc.buffer_before;
    }

    let outside = cursor + loc.shooting_duration > work_end_min;
    push_item(
        day_items,
        day,
        date,
        cursor,
        loc.shooting_duration,
        ItemKind::Shooting {
            buffer_before_min: loc.buffer_before,
            buffer_after_min: loc.buffer_after,
            includes_meal: loc.has_meal,
            outside_work_hours: outside,
        },
        Some(loc.id),
        loc.name.clone(),
        loc.address.clone(),
    );
    cursor += loc.shooting_duration;

    if loc.has_meal && loc.meal_duration_min > 0 {
        push_item(
            day_items,
            day,
            date,
            cursor,
            loc.meal_duration_min,
            ItemKind::Meal,
            None,
            format!("Meal ({})", loc.name),
            loc.address.clone(),
        );
        cursor += loc.meal_duration_min;
    }

    if loc.buffer_after > 0 {
        push_item(
            day_items,
            day,
            date,
            cursor,
            loc.buffer_after,
            ItemKind::Buffer,
            None,
            format!("{} teardown", loc.name),
            None,
        );
        cursor += loc.buffer_after;
    }

    cursor
}

fn push_item(
    list: &mut Vec<ScheduleItem>,
    day: u32,
    date: Option<NaiveDate>,
    start_min: u32,
    duration: u32,
    kind: ItemKind,
    ref_id: Option<uuid::Uuid>,
    name: String,
    address: Option<String>,
) {
    list.push(ScheduleItem {
        day,
        date,
        start_min,
        end_min: start_min + duration,
        kind,
        ref_id,
        name,
        address,
        order: list.len() as u32,
    });
}

fn exclude(excluded: &mut Vec<ExcludedLocation>, loc: &Location, reason: ExclusionReason) {
    tracing::debug!(location = %loc.name, ?reason, "excluding location");
    excluded.push(ExcludedLocation {
        location_id: loc.id,
        name: loc.name.clone(),
        priority: loc.priority,
        reason,
    });
}
