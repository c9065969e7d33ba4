use numpy::IntoPyArray;
use pyo3::create_exception;
use pyo3::exceptions::{PyKeyError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;
use tracing_subscriber::EnvFilter;

use crate::config::{TransformConfig, DEFAULT_DENOMINATOR};
use crate::error::SeriesError;
use crate::format;
use crate::parse::{self, ParseMode, ParseOptions, ParseWarning};
use crate::profile::ProfileBook;
use crate::segment::{self, Segment, SegmentColumns};

create_exception!(et_segments, InvalidValueError, PyValueError);

impl From<SeriesError> for PyErr {
    fn from(err: SeriesError) -> PyErr {
        match err {
            SeriesError::InvalidValue(token) => InvalidValueError::new_err(token),
            other => PyValueError::new_err(other.to_string()),
        }
    }
}

#[pymethods]
impl Segment {
    fn to_dict(&self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        let d = PyDict::new_bound(py);
        d.set_item("index", self.index)?;
        d.set_item("from_value", self.from_value)?;
        d.set_item("to_value", self.to_value)?;
        d.set_item("percent_delta", self.percent_delta)?;
        d.set_item("T", self.t)?;
        d.set_item("E", self.e)?;
        Ok(d.unbind())
    }

    fn __repr__(&self) -> String {
        let line = format::format_segments(std::slice::from_ref(self));
        format!("Segment({line})")
    }
}

#[pyclass(name = "ParsedSeries", module = "et_segments")]
#[derive(Clone, Debug)]
pub struct PyParsedSeries {
    #[pyo3(get)]
    pub values: Vec<f64>,
    #[pyo3(get)]
    pub truncated: bool,
    #[pyo3(get)]
    pub dropped: usize,
}

impl PyParsedSeries {
    fn new(values: Vec<f64>, warning: Option<ParseWarning>) -> Self {
        let dropped = match warning {
            Some(ParseWarning::Truncated { dropped, .. }) => dropped,
            None => 0,
        };
        Self {
            values,
            truncated: warning.is_some(),
            dropped,
        }
    }
}

#[pymethods]
impl PyParsedSeries {
    fn __len__(&self) -> usize {
        self.values.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "ParsedSeries([{}], truncated={})",
            format::format_one_line(&self.values),
            if self.truncated { "True" } else { "False" }
        )
    }
}

#[pyfunction]
#[pyo3(signature = (text=None, mode="permissive", max_points=None))]
fn parse_series(text: Option<&str>, mode: &str, max_points: Option<usize>) -> PyResult<PyParsedSeries> {
    let options = ParseOptions {
        mode: mode.parse::<ParseMode>()?,
        max_points,
    };
    let parsed = parse::parse_series(text.unwrap_or(""), options)?;
    Ok(PyParsedSeries::new(parsed.values.into_vec(), parsed.warning))
}

#[pyfunction]
#[pyo3(signature = (raw, denominator=DEFAULT_DENOMINATOR, include_e=false))]
fn compute_segments(raw: Vec<f64>, denominator: f64, include_e: bool) -> Vec<Segment> {
    segment::compute_segments(&raw, denominator, include_e)
}

#[pyfunction]
fn format_segments(segments: Vec<Segment>) -> String {
    format::format_segments(&segments)
}

#[pyfunction]
fn format_one_line(values: Vec<f64>) -> String {
    format::format_one_line(&values)
}

/// Chart feed: `index`, `percent_delta`, `T` and (when derived) `E` as numpy arrays.
#[pyfunction]
fn segment_columns(py: Python<'_>, segments: Vec<Segment>) -> PyResult<Py<PyDict>> {
    let cols = SegmentColumns::from_segments(&segments);
    let d = PyDict::new_bound(py);
    d.set_item("index", cols.index.into_pyarray_bound(py))?;
    d.set_item("percent_delta", cols.percent_delta.into_pyarray_bound(py))?;
    d.set_item("T", cols.t.into_pyarray_bound(py))?;
    match cols.e {
        Some(e) => d.set_item("E", e.into_pyarray_bound(py))?,
        None => d.set_item("E", py.None())?,
    }
    Ok(d.unbind())
}

#[pyclass(name = "ProfileBook", module = "et_segments")]
pub struct PyProfileBook {
    inner: ProfileBook,
}

#[pymethods]
impl PyProfileBook {
    #[new]
    #[pyo3(signature = (config=None))]
    fn new(config: Option<&Bound<'_, PyDict>>) -> PyResult<Self> {
        let cfg = match config {
            Some(d) => config_from_dict(d)?,
            None => TransformConfig::default(),
        };
        Ok(Self {
            inner: ProfileBook::new(cfg),
        })
    }

    #[getter]
    fn denominator(&self) -> f64 {
        self.inner.config().denominator
    }

    #[getter]
    fn parse_mode(&self) -> &'static str {
        self.inner.config().parse_mode.as_str()
    }

    fn configure(&mut self, config: &Bound<'_, PyDict>) -> PyResult<()> {
        self.inner.set_config(config_from_dict(config)?);
        Ok(())
    }

    fn compute(&mut self, name: &str, raw: Vec<f64>) -> PyResult<Vec<Segment>> {
        Ok(self.inner.compute(name, raw)?.segments.clone())
    }

    fn compute_text(&mut self, name: &str, text: &str) -> PyResult<(Vec<Segment>, bool)> {
        let (state, warning) = self.inner.compute_text(name, text)?;
        Ok((state.segments.clone(), warning.is_some()))
    }

    fn raw_values(&self, name: &str) -> PyResult<Vec<f64>> {
        self.inner
            .get(name)
            .map(|s| s.raw_values.to_vec())
            .ok_or_else(|| PyKeyError::new_err(name.to_string()))
    }

    fn segments(&self, name: &str) -> PyResult<Vec<Segment>> {
        self.inner
            .get(name)
            .map(|s| s.segments.clone())
            .ok_or_else(|| PyKeyError::new_err(name.to_string()))
    }

    fn names(&self) -> Vec<String> {
        self.inner.names()
    }

    fn remove(&mut self, name: &str) -> bool {
        self.inner.remove(name).is_some()
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    fn snapshot(&self) -> PyResult<String> {
        Ok(self.inner.to_json()?)
    }

    #[staticmethod]
    fn restore(snapshot: &str) -> PyResult<Self> {
        Ok(Self {
            inner: ProfileBook::from_json(snapshot)?,
        })
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }
}

/// Install a stderr `tracing` subscriber. Returns `False` if one is already set.
#[pyfunction]
#[pyo3(signature = (filter="info"))]
fn init_logging(filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

fn config_from_dict(d: &Bound<'_, PyDict>) -> PyResult<TransformConfig> {
    let mode = match d.get_item("ET_PARSE_MODE")? {
        Some(v) if !v.is_none() => Some(v.extract::<String>()?),
        _ => None,
    };
    let max_points = match d.get_item("ET_MAX_POINTS")? {
        Some(v) if !v.is_none() => Some(v.extract::<usize>()?),
        _ => None,
    };

    Ok(TransformConfig::from_settings(
        mode.as_deref(),
        max_points,
        dict_f64(d, "ET_DENOMINATOR"),
        dict_bool(d, "ET_INCLUDE_E"),
    )?)
}

fn dict_f64(d: &Bound<'_, PyDict>, key: &str) -> Option<f64> {
    match d.get_item(key) {
        Ok(Some(v)) => v.extract::<f64>().ok(),
        _ => None,
    }
}

fn dict_bool(d: &Bound<'_, PyDict>, key: &str) -> Option<bool> {
    match d.get_item(key) {
        Ok(Some(v)) => v.extract::<bool>().ok(),
        _ => None,
    }
}

pub(crate) fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add("InvalidValueError", m.py().get_type_bound::<InvalidValueError>())?;
    m.add("DEFAULT_DENOMINATOR", DEFAULT_DENOMINATOR)?;
    m.add("DEFAULT_MAX_POINTS", parse::DEFAULT_MAX_POINTS)?;

    m.add_class::<Segment>()?;
    m.add_class::<PyParsedSeries>()?;
    m.add_class::<PyProfileBook>()?;

    m.add_function(wrap_pyfunction!(parse_series, m)?)?;
    m.add_function(wrap_pyfunction!(compute_segments, m)?)?;
    m.add_function(wrap_pyfunction!(format_segments, m)?)?;
    m.add_function(wrap_pyfunction!(format_one_line, m)?)?;
    m.add_function(wrap_pyfunction!(segment_columns, m)?)?;
    m.add_function(wrap_pyfunction!(init_logging, m)?)?;
    Ok(())
}
