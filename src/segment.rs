use ndarray::Array1;
#[cfg(feature = "python")]
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TransformConfig;
use crate::math::delta::{normalized, percent_delta, stability};

/// Transition between raw points `index - 1` and `index`.
#[cfg_attr(feature = "python", pyclass(module = "et_segments", get_all, frozen))]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub index: usize,
    pub from_value: f64,
    pub to_value: f64,
    pub percent_delta: f64,
    pub t: f64,
    pub e: Option<f64>,
}

impl Segment {
    pub fn is_finite(&self) -> bool {
        self.from_value.is_finite()
            && self.to_value.is_finite()
            && self.percent_delta.is_finite()
            && self.t.is_finite()
            && self.e.map_or(true, f64::is_finite)
    }
}

/// Derive one segment per consecutive pair of `raw`.
///
/// Fewer than two points is not an error: the result is simply empty.
/// `denominator` is used as given; callers that need a positive value
/// check it before getting here (see [`TransformConfig::validate`]).
pub fn compute_segments(raw: &[f64], denominator: f64, include_e: bool) -> Vec<Segment> {
    if raw.len() < 2 {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(raw.len() - 1);
    for (i, pair) in raw.windows(2).enumerate() {
        let (a, b) = (pair[0], pair[1]);
        let pct = percent_delta(a, b);
        let t = normalized(pct, denominator);
        out.push(Segment {
            index: i + 1,
            from_value: a,
            to_value: b,
            percent_delta: pct,
            t,
            e: include_e.then(|| stability(t)),
        });
    }

    debug!(points = raw.len(), segments = out.len(), denominator, "computed segments");
    out
}

pub fn compute_with(raw: &[f64], cfg: &TransformConfig) -> Vec<Segment> {
    compute_segments(raw, cfg.denominator, cfg.include_e)
}

/// Column-major view of a segment list, one array per chart line.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentColumns {
    pub index: Array1<f64>,
    pub percent_delta: Array1<f64>,
    pub t: Array1<f64>,
    pub e: Option<Array1<f64>>,
}

impl SegmentColumns {
    /// `e` is present only when every segment carries an E value.
    pub fn from_segments(segments: &[Segment]) -> Self {
        let index = segments.iter().map(|s| s.index as f64).collect();
        let percent_delta = segments.iter().map(|s| s.percent_delta).collect();
        let t = segments.iter().map(|s| s.t).collect();
        let e = if !segments.is_empty() && segments.iter().all(|s| s.e.is_some()) {
            Some(segments.iter().filter_map(|s| s.e).collect())
        } else {
            None
        };

        Self {
            index,
            percent_delta,
            t,
            e,
        }
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn hrv_example() {
        let segs = compute_segments(&[25.0, 30.0, 35.0, 40.0], 80.0, false);
        assert_eq!(segs.len(), 3);

        assert_eq!(segs[0].index, 1);
        assert_eq!((segs[0].from_value, segs[0].to_value), (25.0, 30.0));
        assert_eq!(segs[0].percent_delta, 20.0);
        assert_eq!(segs[0].t, 0.25);

        assert_eq!(segs[1].index, 2);
        assert_relative_eq!(segs[1].percent_delta, 16.666_666_7, epsilon = 1e-6);
        assert_relative_eq!(segs[1].t, 0.208_333_3, epsilon = 1e-6);

        assert_eq!(segs[2].index, 3);
        assert_relative_eq!(segs[2].percent_delta, 14.285_714_3, epsilon = 1e-6);
        assert_relative_eq!(segs[2].t, 0.178_571_4, epsilon = 1e-6);

        assert!(segs.iter().all(|s| s.e.is_none()));
    }

    #[test]
    fn zero_start_segment() {
        let segs = compute_segments(&[0.0, 5.0], 80.0, true);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].percent_delta, 0.0);
        assert_eq!(segs[0].t, 0.0);
        assert_eq!(segs[0].e, Some(1.0));
    }

    #[test]
    fn non_finite_inputs_flow_through() {
        let segs = compute_segments(&[25.0, f64::INFINITY, 5.0], 80.0, false);
        assert!(segs[0].t.is_infinite());
        assert!(segs[1].percent_delta.is_nan());
        assert!(!segs[0].is_finite());
        assert!(compute_segments(&[25.0, 30.0], 80.0, true)[0].is_finite());
    }

    #[test]
    fn short_series_yield_nothing() {
        assert!(compute_segments(&[], 80.0, true).is_empty());
        assert!(compute_segments(&[42.0], 80.0, true).is_empty());
    }

    #[test]
    fn e_is_exactly_one_minus_t_squared() {
        let raw = [12.0, 15.0, 18.0, 22.0, 28.0, 35.0, 40.0, 38.0, 30.0, 22.0, 16.0];
        let segs = compute_segments(&raw, 20.0, true);
        assert_eq!(segs.len(), raw.len() - 1);
        for s in &segs {
            let e = s.e.unwrap();
            assert_eq!(e, 1.0 - s.t * s.t);
            assert!(e <= 1.0);
        }
        // 28 -> 35 is +25%, T = 1.25 with denominator 20
        assert!(segs[4].e.unwrap() < 0.0);
    }

    #[test]
    fn compute_with_uses_config() {
        let cfg = TransformConfig::default().with_denominator(10.0).with_e(true);
        let segs = compute_with(&[10.0, 11.0], &cfg);
        assert_relative_eq!(segs[0].t, 1.0, epsilon = 1e-12);
        assert!(segs[0].e.is_some());
    }

    #[test]
    fn columns_follow_segments() {
        let segs = compute_segments(&[25.0, 30.0, 35.0], 80.0, false);
        let cols = SegmentColumns::from_segments(&segs);
        assert_eq!(cols.len(), 2);
        assert_eq!(cols.index.to_vec(), vec![1.0, 2.0]);
        assert_eq!(cols.t[0], 0.25);
        assert!(cols.e.is_none());

        let with_e = SegmentColumns::from_segments(&compute_segments(&[25.0, 30.0], 80.0, true));
        assert_eq!(with_e.e.map(|e| e.to_vec()), Some(vec![1.0 - 0.0625]));

        assert!(SegmentColumns::from_segments(&[]).is_empty());
    }
}
