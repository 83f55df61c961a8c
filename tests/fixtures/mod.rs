//! Test fixtures for shotplan.
//!
//! Provides realistic test data including:
//! - Real Tokyo-area shooting locations (from OpenStreetMap)
//! - Builders for locations and project configuration
#![allow(dead_code)]

pub mod tokyo_locations;

pub use tokyo_locations::*;

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use uuid::Uuid;

use shotplan::types::{DurationMode, Location, Priority, ProjectConfig, TimeSlot};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Deterministic id for test records; never collides within one binary.
pub fn fresh_id() -> Uuid {
    Uuid::from_u128(u128::from(NEXT_ID.fetch_add(1, Ordering::Relaxed)))
}

/// Start building a location with sensible defaults: one hour of
/// shooting, no buffers, normal slot, required priority, no coordinates.
pub fn location(name: &str) -> LocationBuilder {
    LocationBuilder {
        inner: Location {
            id: fresh_id(),
            name: name.to_string(),
            address: None,
            lat: None,
            lng: None,
            shooting_duration: 60,
            buffer_before: 0,
            buffer_after: 0,
            has_meal: false,
            meal_type: None,
            meal_duration_min: 0,
            priority: Priority::Required,
            time_slot: TimeSlot::Normal,
            time_slot_start: None,
            time_slot_end: None,
            order: 0,
        },
    }
}

/// Builder for test locations.
#[derive(Clone, Debug)]
pub struct LocationBuilder {
    inner: Location,
}

impl LocationBuilder {
    pub fn coords(mut self, lat: f64, lng: f64) -> Self {
        self.inner.lat = Some(lat);
        self.inner.lng = Some(lng);
        self
    }

    pub fn at(self, spot: &Spot) -> Self {
        self.coords(spot.lat, spot.lng)
    }

    pub fn duration(mut self, minutes: u32) -> Self {
        self.inner.shooting_duration = minutes;
        self
    }

    pub fn buffers(mut self, before: u32, after: u32) -> Self {
        self.inner.buffer_before = before;
        self.inner.buffer_after = after;
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.inner.priority = priority;
        self
    }

    pub fn slot(mut self, slot: TimeSlot) -> Self {
        self.inner.time_slot = slot;
        self
    }

    pub fn slot_start(mut self, time: &str) -> Self {
        self.inner.time_slot_start = Some(time.to_string());
        self
    }

    pub fn with_meal(mut self, minutes: u32) -> Self {
        self.inner.has_meal = true;
        self.inner.meal_duration_min = minutes;
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.inner.order = order;
        self
    }

    pub fn build(self) -> Location {
        self.inner
    }
}

/// Project config with a 09:00-18:00 window and no extended slots.
pub fn project(mode: DurationMode) -> ProjectConfig {
    ProjectConfig {
        duration_mode: mode,
        start_date: None,
        end_date: None,
        work_start_time: "09:00".to_string(),
        work_end_time: "18:00".to_string(),
        allow_early_morning: false,
        early_morning_start: None,
        allow_night_shooting: false,
        night_shooting_end: None,
        departure_lat: None,
        departure_lng: None,
    }
}

/// Fixed-span project over `start..=end`.
pub fn fixed_project(start: NaiveDate, end: NaiveDate) -> ProjectConfig {
    let mut config = project(DurationMode::Fixed);
    config.start_date = Some(start);
    config.end_date = Some(end);
    config
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}
