//! Free-form numeric text to [`RawSeries`].
//!
//! Tokens are separated by any run of commas, semicolons or whitespace.
//! What happens to a token that is not a number depends on [`ParseMode`].

use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, SeriesError};

/// Point cap used by the single-series pages.
pub const DEFAULT_MAX_POINTS: usize = 10;

/// Ordered raw measurements. Read-only once parsed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawSeries(Vec<f64>);

impl RawSeries {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }
}

impl Deref for RawSeries {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for RawSeries {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl From<&[f64]> for RawSeries {
    fn from(values: &[f64]) -> Self {
        Self(values.to_vec())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Unparseable tokens are dropped.
    #[default]
    Permissive,
    /// The first unparseable token fails the whole parse.
    Strict,
}

impl ParseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMode::Permissive => "permissive",
            ParseMode::Strict => "strict",
        }
    }
}

impl FromStr for ParseMode {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(ParseMode::Permissive),
            "strict" => Ok(ParseMode::Strict),
            _ => Err(SeriesError::UnknownParseMode(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub mode: ParseMode,
    pub max_points: Option<usize>,
}

impl ParseOptions {
    pub fn permissive() -> Self {
        Self {
            mode: ParseMode::Permissive,
            max_points: None,
        }
    }

    pub fn strict() -> Self {
        Self {
            mode: ParseMode::Strict,
            max_points: None,
        }
    }

    pub fn with_max_points(mut self, max_points: usize) -> Self {
        self.max_points = Some(max_points);
        self
    }
}

/// Non-fatal conditions noticed while parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseWarning {
    Truncated { kept: usize, dropped: usize },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedSeries {
    pub values: RawSeries,
    pub warning: Option<ParseWarning>,
}

impl ParsedSeries {
    pub fn is_truncated(&self) -> bool {
        matches!(self.warning, Some(ParseWarning::Truncated { .. }))
    }
}

fn is_separator(c: char) -> bool {
    c == ',' || c == ';' || c.is_whitespace()
}

fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_separator).filter(|t| !t.is_empty())
}

/// Parse `text` into a raw series.
///
/// Strict mode validates every token before any value is returned, so an
/// invalid token past the point cap still fails the parse.
pub fn parse_series(text: &str, options: ParseOptions) -> Result<ParsedSeries> {
    let mut values = Vec::new();
    let mut skipped = 0usize;

    for token in tokens(text) {
        match token.parse::<f64>() {
            Ok(v) => values.push(v),
            Err(_) => match options.mode {
                ParseMode::Strict => return Err(SeriesError::InvalidValue(token.to_string())),
                ParseMode::Permissive => skipped += 1,
            },
        }
    }

    if skipped > 0 {
        debug!(skipped, "dropped non-numeric tokens");
    }

    let mut warning = None;
    if let Some(cap) = options.max_points {
        if values.len() > cap {
            let dropped = values.len() - cap;
            values.truncate(cap);
            warn!(kept = cap, dropped, "series truncated to point cap");
            warning = Some(ParseWarning::Truncated { kept: cap, dropped });
        }
    }

    Ok(ParsedSeries {
        values: RawSeries(values),
        warning,
    })
}
