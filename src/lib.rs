//! Segment metrics for short measurement series (HRV, VO₂, ...).
//!
//! Pasted text is parsed into a [`RawSeries`]; each consecutive pair of
//! points becomes a [`Segment`] carrying the percentage change, its
//! normalized value `T = %Δ / denominator` and optionally `E = 1 - T²`.
//!
//! With the `python` feature the same operations are exported as the
//! `et_segments` extension module.

#[cfg(feature = "python")]
mod bindings;
mod config;
mod error;
mod format;
pub mod math;
mod parse;
mod profile;
mod segment;

pub use config::{TransformConfig, DEFAULT_DENOMINATOR};
pub use error::{Result, SeriesError};
pub use format::{format_one_line, format_segments, general};
pub use parse::{
    parse_series, ParseMode, ParseOptions, ParseWarning, ParsedSeries, RawSeries,
    DEFAULT_MAX_POINTS,
};
pub use profile::{ProfileBook, ProfileState, MIN_POINTS};
pub use segment::{compute_segments, compute_with, Segment, SegmentColumns};

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn et_segments(m: &Bound<'_, PyModule>) -> PyResult<()> {
    bindings::register(m)
}
