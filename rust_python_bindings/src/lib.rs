use chrono::NaiveDate;
use episodes::{segment_series, segment_table, Episode};
use log::info;
use outlier_correction::{correct as correct_series, BoundaryPolicy, CorrectorParams, FillMethod};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use serde::Serialize;
use series_common::{FramePayload, SeriesError, Table, TimeSeries};
use thiserror::Error;

/// Error wrapper for Python
#[derive(Error, Debug)]
enum PySeriesError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Series(#[from] SeriesError),
}

impl From<PySeriesError> for PyErr {
    fn from(e: PySeriesError) -> PyErr {
        PyValueError::new_err(e.to_string())
    }
}

#[derive(Serialize)]
struct NamedEpisodes<'a> {
    name: &'a str,
    episodes: &'a [Episode<NaiveDate>],
}

fn parse_json<T: serde::de::DeserializeOwned>(json_str: &str) -> Result<T, PySeriesError> {
    serde_json::from_str(json_str).map_err(|e| PySeriesError::InvalidInput(format!("invalid json: {}", e)))
}

fn to_json<T: Serialize>(v: &T) -> Result<String, PySeriesError> {
    serde_json::to_string(v).map_err(|e| PySeriesError::Series(e.into()))
}

/// parse_series(json_str: str) -> str
/// Input: {"index": ["2020-12-14", ...], "values": [...]}
/// Returns a JSON array of episodes, each {"series": {"index": [...], "values": [...]}, "terminated": bool}
#[pyfunction]
fn parse_series(json_str: &str) -> PyResult<String> {
    let series: TimeSeries<NaiveDate> = parse_json(json_str)?;
    let eps = segment_series(&series);
    Ok(to_json(&eps)?)
}

/// parse_df(json_str: str) -> str
/// Input: {"index": [...], "columns": [{"name": "000001", "values": [...]}, ...]}
/// Returns [{"name": ..., "episodes": [...]}, ...] in column order.
#[pyfunction]
fn parse_df(json_str: &str) -> PyResult<String> {
    let frame: FramePayload<NaiveDate> = parse_json(json_str)?;
    let table = Table::try_from(frame).map_err(PySeriesError::from)?;
    let result = segment_table(&table);
    let out: Vec<NamedEpisodes> = result
        .iter()
        .map(|(name, episodes)| NamedEpisodes { name, episodes })
        .collect();
    Ok(to_json(&out)?)
}

/// correct(json_str: str, window: int = 20, threshold_abs: float = 2.5, fill: str = "average", boundary: str = "error") -> str
/// Input is a single series payload. Returns {"corrected": {...}, "flagged": [...], "fill": ...}
#[pyfunction]
#[pyo3(signature = (json_str, window = 20, threshold_abs = 2.5, fill = "average", boundary = "error"))]
fn correct(json_str: &str, window: usize, threshold_abs: f64, fill: &str, boundary: &str) -> PyResult<String> {
    let series: TimeSeries<NaiveDate> = parse_json(json_str)?;
    let boundary: BoundaryPolicy = serde_json::from_value(serde_json::Value::String(boundary.to_string()))
        .map_err(|_| PySeriesError::InvalidInput(format!("unknown boundary policy: {}", boundary)))?;
    let params = CorrectorParams { window, threshold_abs, fill: FillMethod::from(fill), boundary };
    let report = correct_series(&series, &params).map_err(PySeriesError::from)?;
    Ok(to_json(&report)?)
}

/// Python module
#[pymodule]
fn series_py(_py: Python, m: &PyModule) -> PyResult<()> {
    let _ = env_logger::try_init();
    info!("series_py loaded");
    m.add_function(wrap_pyfunction!(parse_series, m)?)?;
    m.add_function(wrap_pyfunction!(parse_df, m)?)?;
    m.add_function(wrap_pyfunction!(correct, m)?)?;
    Ok(())
}

