//! Error taxonomy for the scheduling core.
//!
//! Only structurally invalid input is an error. Unschedulable locations,
//! unknown travel data, and overtime are regular output (exclusion lists
//! and flags), not error conditions.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The caller supplied an empty location list.
    #[error("no locations to schedule")]
    NoLocations,

    /// A clock string was not of the form "HH:MM" with in-range fields.
    #[error("invalid clock time '{0}', expected \"HH:MM\"")]
    InvalidClock(String),

    /// Duration and distance matrices disagree in shape, or a matrix is
    /// not square.
    #[error("distance matrix shape mismatch: expected {expected}x{expected}, got {rows}x{cols}")]
    MatrixShape {
        expected: usize,
        rows: usize,
        cols: usize,
    },
}
