use serde::{Deserialize, Serialize};

use crate::error::{Result, SeriesError};
use crate::parse::{ParseMode, ParseOptions};

pub const DEFAULT_DENOMINATOR: f64 = 80.0;

/// One configuration for every page variant: parse policy, point cap,
/// T denominator and whether E is derived.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    pub parse_mode: ParseMode,
    pub max_points: Option<usize>,
    pub denominator: f64,
    pub include_e: bool,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            parse_mode: ParseMode::Permissive,
            max_points: None,
            denominator: DEFAULT_DENOMINATOR,
            include_e: false,
        }
    }
}

impl TransformConfig {
    pub fn with_parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = mode;
        self
    }

    pub fn with_max_points(mut self, max_points: Option<usize>) -> Self {
        self.max_points = max_points;
        self
    }

    pub fn with_denominator(mut self, denominator: f64) -> Self {
        self.denominator = denominator;
        self
    }

    pub fn with_e(mut self, include_e: bool) -> Self {
        self.include_e = include_e;
        self
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            mode: self.parse_mode,
            max_points: self.max_points,
        }
    }

    /// Build from loosely typed settings such as a Python config dict.
    ///
    /// Missing entries keep their defaults and a point cap of zero is raised
    /// to one. The result is validated.
    pub fn from_settings(
        parse_mode: Option<&str>,
        max_points: Option<usize>,
        denominator: Option<f64>,
        include_e: Option<bool>,
    ) -> Result<Self> {
        let defaults = Self::default();
        let mode = match parse_mode {
            Some(s) => s.parse::<ParseMode>()?,
            None => defaults.parse_mode,
        };
        let cfg = Self {
            parse_mode: mode,
            max_points: max_points.map(|n| n.max(1)).or(defaults.max_points),
            denominator: denominator.unwrap_or(defaults.denominator),
            include_e: include_e.unwrap_or(defaults.include_e),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject denominators that cannot scale a percentage delta.
    pub fn validate(&self) -> Result<()> {
        if !self.denominator.is_finite() || self.denominator <= 0.0 {
            return Err(SeriesError::InvalidDenominator(self.denominator));
        }
        Ok(())
    }
}
