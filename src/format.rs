//! Text renderings of series and segments.

use std::fmt::Write;

use crate::segment::Segment;

const SIG_DIGITS: usize = 6;

/// `printf`-style `%g`: `precision` significant digits, trailing zeros
/// stripped, scientific notation when the exponent is below -4 or at least
/// `precision`.
pub fn general(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let p = precision.max(1);
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Exponent after rounding to p significant digits.
    let sci = format!("{:.*e}", p - 1, value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exp < -4 || exp >= p as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", strip_zeros(mantissa), sign, exp.abs())
    } else {
        let decimals = (p as i32 - 1 - exp).max(0) as usize;
        strip_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn strip_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

fn signed_general(value: f64, precision: usize) -> String {
    let body = general(value, precision);
    if body.starts_with('-') {
        body
    } else {
        format!("+{body}")
    }
}

fn signed_fixed(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        return "+nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+inf" } else { "-inf" }.to_string();
    }
    format!("{:+.*}", decimals, value)
}

/// `v1, v2, v3` with six significant digits per value.
pub fn format_one_line(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| general(*v, SIG_DIGITS))
        .collect::<Vec<_>>()
        .join(", ")
}

/// One line per segment:
/// `Seg 01: 25 → 30 | %Δ=+20.000% | T=+0.25`, plus ` | E=...` when E was
/// derived.
pub fn format_segments(segments: &[Segment]) -> String {
    let mut out = String::new();
    for (n, s) in segments.iter().enumerate() {
        if n > 0 {
            out.push('\n');
        }
        let _ = write!(
            out,
            "Seg {:02}: {} → {} | %Δ={}% | T={}",
            s.index,
            general(s.from_value, SIG_DIGITS),
            general(s.to_value, SIG_DIGITS),
            signed_fixed(s.percent_delta, 3),
            signed_general(s.t, SIG_DIGITS),
        );
        if let Some(e) = s.e {
            let _ = write!(out, " | E={}", general(e, SIG_DIGITS));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::compute_segments;

    #[test]
    fn general_matches_printf_g() {
        let cases = [
            (25.0, "25"),
            (0.25, "0.25"),
            (-2.5, "-2.5"),
            (0.208_333_333_333, "0.208333"),
            (123_456.0, "123456"),
            (1_234_567.0, "1.23457e+06"),
            (999_999.5, "1e+06"),
            (0.0001, "0.0001"),
            (0.000_012_345, "1.2345e-05"),
            (1e100, "1e+100"),
            (100.0, "100"),
            (0.0, "0"),
        ];
        for (v, want) in cases {
            assert_eq!(general(v, 6), want, "formatting {v}");
        }
    }

    #[test]
    fn general_non_finite() {
        assert_eq!(general(f64::NAN, 6), "nan");
        assert_eq!(general(f64::INFINITY, 6), "inf");
        assert_eq!(general(f64::NEG_INFINITY, 6), "-inf");
    }

    #[test]
    fn one_line_echo() {
        assert_eq!(format_one_line(&[25.0, 30.0, 35.5]), "25, 30, 35.5");
        assert_eq!(format_one_line(&[]), "");
        assert_eq!(format_one_line(&[1.0 / 3.0]), "0.333333");
    }

    #[test]
    fn segment_lines() {
        let segs = compute_segments(&[25.0, 30.0, 35.0, 40.0], 80.0, false);
        let text = format_segments(&segs);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Seg 01: 25 → 30 | %Δ=+20.000% | T=+0.25",
                "Seg 02: 30 → 35 | %Δ=+16.667% | T=+0.208333",
                "Seg 03: 35 → 40 | %Δ=+14.286% | T=+0.178571",
            ]
        );
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn segment_lines_with_e_and_negative_delta() {
        let segs = compute_segments(&[40.0, 30.0], 80.0, true);
        assert_eq!(
            format_segments(&segs),
            "Seg 01: 40 → 30 | %Δ=-25.000% | T=-0.3125 | E=0.902344"
        );
    }

    #[test]
    fn zero_delta_is_signed_positive() {
        let segs = compute_segments(&[0.0, 5.0], 80.0, false);
        assert_eq!(format_segments(&segs), "Seg 01: 0 → 5 | %Δ=+0.000% | T=+0");
    }

    #[test]
    fn nan_fields_carry_a_plus_sign() {
        let segs = compute_segments(&[f64::INFINITY, 5.0], 80.0, false);
        assert_eq!(
            format_segments(&segs),
            "Seg 01: inf → 5 | %Δ=+nan% | T=+nan"
        );
    }

    #[test]
    fn formatting_is_idempotent() {
        let segs = compute_segments(&[12.0, 15.0, 18.0, 0.0, 4.0], 80.0, true);
        assert_eq!(format_segments(&segs), format_segments(&segs));
        assert_eq!(format_segments(&[]), "");
    }
}
