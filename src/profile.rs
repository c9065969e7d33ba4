//! Per-tab state for the presentation layer.
//!
//! Each named profile (HRV, VO₂, ...) keeps the raw values and the segments
//! last computed from them. This is where "need at least two points",
//! "denominator must be positive" and "every stored value is finite" are
//! enforced; the transform underneath accepts anything.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TransformConfig;
use crate::error::{Result, SeriesError};
use crate::parse::{parse_series, ParseWarning, RawSeries};
use crate::segment::{compute_with, Segment};

pub const MIN_POINTS: usize = 2;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileState {
    pub raw_values: RawSeries,
    pub segments: Vec<Segment>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileBook {
    config: TransformConfig,
    profiles: BTreeMap<String, ProfileState>,
}

impl ProfileBook {
    pub fn new(config: TransformConfig) -> Self {
        Self {
            config,
            profiles: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Applies to later computations only; stored states keep the segments
    /// they were computed with.
    pub fn set_config(&mut self, config: TransformConfig) {
        self.config = config;
    }

    /// Recompute `name` from `raw`, replacing whatever it held before.
    ///
    /// On error the previous state of `name` is left untouched.
    pub fn compute(&mut self, name: &str, raw: impl Into<RawSeries>) -> Result<&ProfileState> {
        let raw = raw.into();
        self.config.validate()?;
        if raw.len() < MIN_POINTS {
            return Err(SeriesError::InsufficientPoints {
                required: MIN_POINTS,
                actual: raw.len(),
            });
        }
        if let Some((i, v)) = raw.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(SeriesError::NonFiniteValue {
                position: i + 1,
                value: *v,
            });
        }

        let segments = compute_with(&raw, &self.config);
        if let Some(s) = segments.iter().find(|s| !s.is_finite()) {
            return Err(SeriesError::NonFiniteMetric { index: s.index });
        }
        debug!(profile = name, segments = segments.len(), "profile recomputed");

        let state = ProfileState {
            raw_values: raw,
            segments,
        };
        self.profiles.insert(name.to_string(), state);
        Ok(&self.profiles[name])
    }

    /// Parse `text` with the book's parse options, then [`compute`](Self::compute).
    pub fn compute_text(
        &mut self,
        name: &str,
        text: &str,
    ) -> Result<(&ProfileState, Option<ParseWarning>)> {
        let parsed = parse_series(text, self.config.parse_options())?;
        let warning = parsed.warning;
        let state = self.compute(name, parsed.values)?;
        Ok((state, warning))
    }

    pub fn get(&self, name: &str) -> Option<&ProfileState> {
        self.profiles.get(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }

    pub fn remove(&mut self, name: &str) -> Option<ProfileState> {
        self.profiles.remove(name)
    }

    pub fn clear(&mut self) {
        self.profiles.clear();
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// JSON has no encoding for non-finite floats, so a book whose
    /// denominator is not a valid one cannot be snapshotted.
    pub fn to_json(&self) -> Result<String> {
        self.config.validate()?;
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
