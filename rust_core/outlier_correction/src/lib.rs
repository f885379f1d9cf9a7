//! outlier_correction
//!
//! Rolling z-score outlier detection and neighbour-average correction for a single
//! numeric series.
//!
//! A centred window of `window` samples cannot score the first and last `window / 2`
//! points, so detection runs three passes: a head pass over the first `window / 2`
//! points scored against themselves, the centred rolling pass, and a tail pass over the
//! last `window / 2` points. Flags are concatenated in that order, duplicates included,
//! and then corrected one by one in that same order.

pub mod scoring;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use series_common::{Result, SeriesError, Table, TimeSeries};

use crate::scoring::{rolling_zscore, sample_std, zscore};

/// How flagged points are replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FillMethod {
    /// Mean of the positional neighbours in the series being corrected.
    Average,
    /// Any other name. Detection still runs; values are left untouched.
    Other(String),
}

impl From<&str> for FillMethod {
    fn from(s: &str) -> Self {
        match s {
            "average" => FillMethod::Average,
            other => FillMethod::Other(other.to_string()),
        }
    }
}

impl From<String> for FillMethod {
    fn from(s: String) -> Self {
        FillMethod::from(s.as_str())
    }
}

impl From<FillMethod> for String {
    fn from(f: FillMethod) -> Self {
        match f {
            FillMethod::Average => "average".to_string(),
            FillMethod::Other(s) => s,
        }
    }
}

/// What to do when a flagged point is the first or last sample and has only one neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Fail the whole correction with [`SeriesError::BoundaryCorrection`].
    #[default]
    Error,
    /// Leave the boundary value as it is.
    Skip,
    /// Copy the single existing neighbour.
    Clamp,
}

/// Corrector parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectorParams {
    pub window: usize,         // samples in the centred window
    pub threshold_abs: f64,    // |z| >= threshold_abs is an outlier
    pub fill: FillMethod,
    pub boundary: BoundaryPolicy,
}

impl Default for CorrectorParams {
    fn default() -> Self {
        CorrectorParams {
            window: 20,
            threshold_abs: 2.5,
            fill: FillMethod::Average,
            boundary: BoundaryPolicy::Error,
        }
    }
}

impl CorrectorParams {
    pub fn validate(&self) -> Result<()> {
        if self.window < 2 {
            return Err(SeriesError::Configuration(format!("window must be >= 2, got {}", self.window)));
        }
        if !(self.threshold_abs.is_finite() && self.threshold_abs > 0.0) {
            return Err(SeriesError::Configuration(format!(
                "threshold_abs must be positive, got {}",
                self.threshold_abs
            )));
        }
        Ok(())
    }
}

/// Whether the corrected series in a report actually had fills applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FillStatus {
    Applied,
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierReport<K> {
    pub corrected: TimeSeries<K>,
    /// Flagged timestamps in head, rolling, tail order. May repeat.
    pub flagged: Vec<K>,
    pub fill: FillStatus,
}

impl<K> OutlierReport<K> {
    /// Corrected series and flags, or `UnsupportedFill` if no correction was applied.
    pub fn into_corrected(self) -> Result<(TimeSeries<K>, Vec<K>)> {
        match self.fill {
            FillStatus::Applied => Ok((self.corrected, self.flagged)),
            FillStatus::Unsupported(name) => Err(SeriesError::UnsupportedFill(name)),
        }
    }
}

fn flag_subseries(values: &[f64], offset: usize, threshold_abs: f64, out: &mut Vec<usize>) {
    if values.len() < 2 || sample_std(values) == 0.0 {
        return;
    }
    out.extend(
        zscore(values)
            .iter()
            .enumerate()
            .filter(|(_, z)| z.abs() >= threshold_abs)
            .map(|(i, _)| offset + i),
    );
}

/// Positions flagged by the head, rolling and tail passes, in that order.
pub fn detect_positions(values: &[f64], params: &CorrectorParams) -> Result<Vec<usize>> {
    params.validate()?;
    Ok(flag_positions(values, params))
}

// params must already be validated
fn flag_positions(values: &[f64], params: &CorrectorParams) -> Vec<usize> {
    let n = values.len();
    let half = (params.window / 2).min(n);
    let mut flagged = Vec::new();

    flag_subseries(&values[..half], 0, params.threshold_abs, &mut flagged);
    let head = flagged.len();

    flagged.extend(
        rolling_zscore(values, params.window)
            .into_iter()
            .enumerate()
            .filter_map(|(i, z)| z.filter(|z| z.abs() >= params.threshold_abs).map(|_| i)),
    );
    let rolling = flagged.len() - head;

    flag_subseries(&values[n - half..], n - half, params.threshold_abs, &mut flagged);
    debug!(
        "detection: head={} rolling={} tail={}",
        head,
        rolling,
        flagged.len() - head - rolling
    );
    flagged
}

/// Replace each flagged position, in the given order, with the mean of its current
/// left and right neighbours.
///
/// The series is mutated as it goes, so a point whose neighbour was corrected earlier
/// in `positions` averages against the corrected value. With adjacent outliers the
/// result therefore depends on the order of `positions`, and a repeated position is
/// averaged again. Boundary positions are handled according to `boundary`.
///
/// Any position outside `values` fails with `PositionOutOfRange` before anything is
/// written, whatever the boundary policy.
pub fn fill_average_in_place(values: &mut [f64], positions: &[usize], boundary: BoundaryPolicy) -> Result<()> {
    let n = values.len();
    if let Some(&pos) = positions.iter().find(|&&p| p >= n) {
        return Err(SeriesError::PositionOutOfRange { position: pos, len: n });
    }
    for &pos in positions {
        let left = pos.checked_sub(1);
        let right = Some(pos + 1).filter(|&r| r < n);
        let filled = match (left, right) {
            (Some(l), Some(r)) => (values[l] + values[r]) / 2.0,
            (l, r) => match boundary {
                BoundaryPolicy::Error => return Err(SeriesError::BoundaryCorrection { position: pos, len: n }),
                BoundaryPolicy::Skip => continue,
                BoundaryPolicy::Clamp => match l.or(r) {
                    Some(nb) => values[nb],
                    None => continue,
                },
            },
        };
        values[pos] = filled;
    }
    Ok(())
}

/// Detect outliers in `series` and return a corrected copy with the flagged timestamps.
pub fn correct<K: Clone>(series: &TimeSeries<K>, params: &CorrectorParams) -> Result<OutlierReport<K>> {
    params.validate()?;
    correct_validated(series, params)
}

fn correct_validated<K: Clone>(series: &TimeSeries<K>, params: &CorrectorParams) -> Result<OutlierReport<K>> {
    let positions = flag_positions(series.values(), params);
    let flagged: Vec<K> = positions.iter().map(|&p| series.index()[p].clone()).collect();

    let mut corrected = series.clone();
    let fill = match &params.fill {
        FillMethod::Average => {
            fill_average_in_place(corrected.values_mut(), &positions, params.boundary)?;
            FillStatus::Applied
        }
        FillMethod::Other(name) => {
            warn!("fill method '{}' is not supported, returning series uncorrected", name);
            FillStatus::Unsupported(name.clone())
        }
    };
    info!("flagged {} outliers in {} samples", flagged.len(), series.len());
    Ok(OutlierReport { corrected, flagged, fill })
}

/// Run [`correct`] on every column of `table`, in column order.
pub fn correct_table<K: Clone>(table: &Table<K>, params: &CorrectorParams) -> Result<Vec<(String, OutlierReport<K>)>> {
    params.validate()?;
    table
        .columns()
        .iter()
        .map(|c| Ok((c.name.clone(), correct_validated(&c.series, params)?)))
        .collect()
}
