//! Travel duration/distance matrices.
//!
//! A [`DistanceMatrix`] holds two equally-shaped square tables indexed by
//! the *input* location order: travel minutes and kilometers from location
//! i to location j. Unknown cells are `None`; providers that encode
//! "unknown" as a negative number go through [`DistanceMatrix::from_raw`],
//! which normalizes them.

use serde::Deserialize;

use crate::error::ScheduleError;

#[derive(Debug, Clone, Default)]
pub struct DistanceMatrix {
    duration_min: Vec<Vec<Option<f64>>>,
    distance_km: Vec<Vec<Option<f64>>>,
}

impl DistanceMatrix {
    /// An all-unknown matrix for `n` locations.
    pub fn unknown(n: usize) -> Self {
        Self {
            duration_min: vec![vec![None; n]; n],
            distance_km: vec![vec![None; n]; n],
        }
    }

    /// Build from raw provider tables. Negative cells mean "unknown" and
    /// become `None`. Both tables must be square and equally shaped.
    pub fn from_raw(
        duration_min: Vec<Vec<f64>>,
        distance_km: Vec<Vec<f64>>,
    ) -> Result<Self, ScheduleError> {
        let n = duration_min.len();
        check_shape(&duration_min, n)?;
        check_shape(&distance_km, n)?;
        if distance_km.len() != n {
            return Err(ScheduleError::MatrixShape {
                expected: n,
                rows: distance_km.len(),
                cols: distance_km.first().map(Vec::len).unwrap_or(0),
            });
        }

        Ok(Self {
            duration_min: duration_min.into_iter().map(normalize_row).collect(),
            distance_km: distance_km.into_iter().map(normalize_row).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.duration_min.len()
    }

    pub fn is_empty(&self) -> bool {
        self.duration_min.is_empty()
    }

    /// Travel minutes from location `from` to location `to`, if known.
    /// Out-of-range indices read as unknown.
    pub fn duration_min(&self, from: usize, to: usize) -> Option<f64> {
        *self.duration_min.get(from)?.get(to)?
    }

    /// Travel kilometers from location `from` to location `to`, if known.
    pub fn distance_km(&self, from: usize, to: usize) -> Option<f64> {
        *self.distance_km.get(from)?.get(to)?
    }

    pub fn set(&mut self, from: usize, to: usize, minutes: Option<f64>, km: Option<f64>) {
        if from < self.len() && to < self.len() {
            self.duration_min[from][to] = minutes;
            self.distance_km[from][to] = km;
        }
    }
}

fn check_shape(table: &[Vec<f64>], n: usize) -> Result<(), ScheduleError> {
    for row in table {
        if row.len() != n {
            return Err(ScheduleError::MatrixShape {
                expected: n,
                rows: table.len(),
                cols: row.len(),
            });
        }
    }
    Ok(())
}

fn normalize_row(row: Vec<f64>) -> Vec<Option<f64>> {
    row.into_iter()
        .map(|value| if value < 0.0 { None } else { Some(value) })
        .collect()
}

/// Configuration for an OSRM-style table endpoint.
#[derive(Debug, Clone)]
pub struct MatrixConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Blocking HTTP client for fetching a [`DistanceMatrix`] from a routing
/// service. The orchestrating caller fetches once, up front; any failure
/// degrades to "no matrix" and the engine falls back to straight-line
/// estimates.
#[derive(Debug, Clone)]
pub struct MatrixClient {
    config: MatrixConfig,
    client: reqwest::blocking::Client,
}

impl MatrixClient {
    pub fn new(config: MatrixConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Fetch the duration/distance table for the given coordinates
    /// (lat, lng). Returns `None` on any transport or decode failure.
    pub fn table_for(&self, locations: &[(f64, f64)]) -> Option<DistanceMatrix> {
        if locations.is_empty() {
            return None;
        }

        let coords = locations
            .iter()
            .map(|(lat, lng)| format!("{:.6},{:.6}", lng, lat))
            .collect::<Vec<_>>()
            .join(";");

        let url = format!(
            "{}/table/v1/{}/{}?annotations=duration,distance",
            self.config.base_url, self.config.profile, coords
        );

        let response = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<TableResponse>());

        let body = match response {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(error = %err, "matrix fetch failed, continuing without travel data");
                return None;
            }
        };

        let n = locations.len();
        let durations = body.durations?;
        let distances = body.distances?;
        if durations.len() != n || distances.len() != n {
            tracing::warn!(
                expected = n,
                got = durations.len(),
                "matrix response has wrong shape, ignoring it"
            );
            return None;
        }

        let mut matrix = DistanceMatrix::unknown(n);
        for (i, (duration_row, distance_row)) in durations.iter().zip(&distances).enumerate() {
            for j in 0..n {
                // Service cells are seconds and meters; store minutes and km.
                let minutes = duration_row.get(j).copied().flatten().map(|s| s / 60.0);
                let km = distance_row.get(j).copied().flatten().map(|m| m / 1000.0);
                matrix.set(i, j, minutes, km);
            }
        }

        Some(matrix)
    }
}

#[derive(Debug, Deserialize)]
struct TableResponse {
    durations: Option<Vec<Vec<Option<f64>>>>,
    distances: Option<Vec<Vec<Option<f64>>>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_maps_negatives_to_unknown() {
        let matrix = DistanceMatrix::from_raw(
            vec![vec![0.0, 12.0], vec![-1.0, 0.0]],
            vec![vec![0.0, 8.5], vec![-1.0, 0.0]],
        )
        .unwrap();

        assert_eq!(matrix.duration_min(0, 1), Some(12.0));
        assert_eq!(matrix.duration_min(1, 0), None);
        assert_eq!(matrix.distance_km(0, 1), Some(8.5));
        assert_eq!(matrix.distance_km(1, 0), None);
    }

    #[test]
    fn from_raw_rejects_ragged_tables() {
        let result = DistanceMatrix::from_raw(
            vec![vec![0.0, 1.0], vec![1.0]],
            vec![vec![0.0, 1.0], vec![1.0, 0.0]],
        );
        assert!(result.is_err());
    }

    #[test]
    fn out_of_range_reads_as_unknown() {
        let matrix = DistanceMatrix::unknown(2);
        assert_eq!(matrix.duration_min(0, 5), None);
        assert_eq!(matrix.duration_min(5, 0), None);
    }
}
