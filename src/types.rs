//! Domain records consumed and produced by the scheduling core.
//!
//! These are plain in-memory values. Persistence, auth, and rendering live
//! with the caller; the core never mutates its inputs and never assigns
//! ids or timestamps of its own.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock;

/// Scheduling priority of a location. `Required` locations are never
/// excluded from a generated schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Required,
    High,
    Medium,
    Low,
}

/// Intended time-of-day category for a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSlot {
    Normal,
    EarlyMorning,
    Night,
    Flexible,
}

impl TimeSlot {
    /// Precedence group for route ordering: early-morning work comes
    /// first, night work last, everything else in between.
    pub fn group(self) -> u8 {
        match self {
            TimeSlot::EarlyMorning => 0,
            TimeSlot::Normal | TimeSlot::Flexible => 1,
            TimeSlot::Night => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

/// A shooting location to place on the schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Required activity length in minutes (>= 1).
    pub shooting_duration: u32,
    /// Setup time in minutes before shooting starts.
    pub buffer_before: u32,
    /// Teardown time in minutes after shooting ends.
    pub buffer_after: u32,
    /// The visit doubles as a meal (e.g. shooting at a restaurant).
    pub has_meal: bool,
    pub meal_type: Option<MealType>,
    pub meal_duration_min: u32,
    pub priority: Priority,
    pub time_slot: TimeSlot,
    /// Explicit earliest clock time for the slot, "HH:MM".
    pub time_slot_start: Option<String>,
    pub time_slot_end: Option<String>,
    /// Caller-supplied tie-break for default sequencing.
    pub order: i32,
}

impl Location {
    pub fn coords(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }
}

/// How the number of shooting days is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationMode {
    /// `start_date`..=`end_date` bound the day count; low-priority work
    /// that does not fit is excluded.
    Fixed,
    /// Days are allocated until every location is placed.
    Auto,
}

/// Project-level scheduling parameters. Owned by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub duration_mode: DurationMode,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Normal working window, "HH:MM".
    pub work_start_time: String,
    pub work_end_time: String,
    pub allow_early_morning: bool,
    pub early_morning_start: Option<String>,
    pub allow_night_shooting: bool,
    pub night_shooting_end: Option<String>,
    /// Departure point for day-1 travel estimation.
    pub departure_lat: Option<f64>,
    pub departure_lng: Option<f64>,
}

impl ProjectConfig {
    pub fn departure_coords(&self) -> Option<(f64, f64)> {
        match (self.departure_lat, self.departure_lng) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }
}

/// Overnight stay between shooting days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Accommodation {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
}

/// A pre-registered meal stop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub meal_type: MealType,
    pub duration: u32,
}

/// A pre-registered rest stop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestStop {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub duration: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Car,
    Train,
    Bus,
    Walk,
    Other,
}

/// Transport configuration; the first entry's default buffer is used for
/// gaps where no travel data exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transport {
    pub id: Uuid,
    pub mode: TransportMode,
    pub default_travel_buffer: u32,
}

/// What a schedule item is, with the metadata that applies to that kind
/// and nothing else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemKind {
    Shooting {
        buffer_before_min: u32,
        buffer_after_min: u32,
        includes_meal: bool,
        outside_work_hours: bool,
    },
    Transport {
        travel_min: u32,
        travel_km: Option<f64>,
    },
    Buffer,
    Meal,
    /// Lunch block synthesized by the auto-meal inserter.
    AutoMeal,
    Accommodation,
    Rest,
}

impl ItemKind {
    pub fn is_shooting(&self) -> bool {
        matches!(self, ItemKind::Shooting { .. })
    }

    pub fn is_meal(&self) -> bool {
        matches!(self, ItemKind::Meal | ItemKind::AutoMeal)
    }
}

/// One row of a generated day timetable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleItem {
    /// 1-based day number.
    pub day: u32,
    /// Concrete date, when the project start date is known.
    pub date: Option<NaiveDate>,
    /// Minutes from midnight; `end_min >= start_min`, same day.
    pub start_min: u32,
    pub end_min: u32,
    pub kind: ItemKind,
    /// Originating Location/Meal/Accommodation, if any.
    pub ref_id: Option<Uuid>,
    pub name: String,
    pub address: Option<String>,
    /// Position within the day.
    pub order: u32,
}

impl ScheduleItem {
    pub fn start_time(&self) -> String {
        clock::to_clock(self.start_min)
    }

    pub fn end_time(&self) -> String {
        clock::to_clock(self.end_min)
    }
}

/// Why a location was left off the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    /// The fixed working window had no room left that day.
    InsufficientHours,
    /// Dropped in favor of higher-priority work. Only produced when
    /// low-priority work overflows a fixed window; medium-priority
    /// overflow reports `InsufficientHours` instead.
    LowPriority,
    /// The fixed day span ran out before the location's turn.
    DayLimitExceeded,
    /// No travel data and no way to estimate a route to the location.
    Unreachable,
}

/// A location deliberately omitted from the generated schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExcludedLocation {
    pub location_id: Uuid,
    pub name: String,
    pub priority: Priority,
    pub reason: ExclusionReason,
}

/// Which cost the route optimizer minimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationType {
    /// Keep the caller-supplied order; skip route optimization.
    None,
    ShortestTime,
    ShortestDistance,
    /// 60/40 blend of travel minutes and kilometers.
    Balanced,
}

/// The aggregate produced by one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub total_days: u32,
    /// All items, ordered by (day, start time).
    pub items: Vec<ScheduleItem>,
    pub excluded_locations: Vec<ExcludedLocation>,
    /// Aggregate travel distance over known legs.
    pub total_distance_km: f64,
    /// Aggregate travel time in minutes.
    pub total_duration_min: u32,
    pub has_overtime_warning: bool,
}

impl Schedule {
    /// Items belonging to one day, in timetable order.
    pub fn items_for_day(&self, day: u32) -> impl Iterator<Item = &ScheduleItem> {
        self.items.iter().filter(move |item| item.day == day)
    }
}
