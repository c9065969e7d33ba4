/// Percentage change from `from` to `to`.
///
/// A zero starting point yields `0.0` rather than an infinity or NaN. The
/// check is exact equality; there is no tolerance band around zero.
pub fn percent_delta(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        0.0
    } else {
        100.0 * (to - from) / from
    }
}

pub fn normalized(percent_delta: f64, denominator: f64) -> f64 {
    percent_delta / denominator
}

/// `1 - t^2`: equals 1 at no change, negative once `|t| > 1`.
pub fn stability(t: f64) -> f64 {
    1.0 - t * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn percent_delta_basic() {
        assert_eq!(percent_delta(25.0, 30.0), 20.0);
        assert_eq!(percent_delta(40.0, 30.0), -25.0);
        assert_relative_eq!(percent_delta(30.0, 35.0), 16.666_666_666_666_668, epsilon = 1e-12);
    }

    #[test]
    fn zero_start_is_guarded() {
        assert_eq!(percent_delta(0.0, 5.0), 0.0);
        assert_eq!(percent_delta(-0.0, 5.0), 0.0);
        assert_eq!(percent_delta(0.0, 0.0), 0.0);
    }

    #[test]
    fn tiny_start_is_not_guarded() {
        let v = percent_delta(1e-300, 1.0);
        assert!(v.is_infinite() || v > 1e300);
    }

    #[test]
    fn stability_sign() {
        assert_eq!(stability(0.0), 1.0);
        assert_eq!(stability(1.0), 0.0);
        assert!(stability(1.5) < 0.0);
        assert!(stability(-1.5) < 0.0);
    }
}
