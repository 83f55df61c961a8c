//! shotplan: schedule-generation core for multi-day shooting trips.
//!
//! Takes registered locations and project working-hour configuration,
//! orders the visits (nearest-neighbor + 2-opt, constrained by
//! time-of-day slots), and fits them into per-day timetables with travel
//! legs, buffers, automatic lunch blocks, and an explicit list of
//! locations that did not fit. Entry points: `builder::build_schedule`
//! and `route::optimize_route`.

pub mod builder;
pub mod clock;
pub mod error;
pub mod fitter;
pub mod haversine;
pub mod matrix;
pub mod meal;
pub mod route;
pub mod types;
