#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Fantasy point metrics derived from season counting stats.
//!
//! | Metric | Formula | Precision |
//! |---|---|---|
//! | `FP` | `PTS + TRB + AST + STL + BLK − TOV − PF` | truncated to an integer |
//! | `FPPG` | `FP / G` | 1 decimal |
//! | `FPPM` | `FP / MP` | 2 decimals |
//! | `MPG` | `MP / G` | 1 decimal |
//! | `FPR` | `FP² / (G × MP)` | 1 decimal |
//!
//! Rounding is half-to-even on the scaled value. A rate whose denominator
//! is zero is reported as `0.0`.

use hoops_models::{FantasyMetrics, StatTotals};

/// Computes the fantasy metrics for one player's totals.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn compute(totals: &StatTotals) -> FantasyMetrics {
    let raw = totals.pts + totals.trb + totals.ast + totals.stl + totals.blk
        - totals.tov
        - totals.pf;
    let fp = raw.trunc() as i64;
    #[allow(clippy::cast_precision_loss)]
    let fp_f = fp as f64;

    FantasyMetrics {
        fp,
        fppg: round_to(ratio(fp_f, totals.g, "FPPG"), 1),
        fppm: round_to(ratio(fp_f, totals.mp, "FPPM"), 2),
        mpg: round_to(ratio(totals.mp, totals.g, "MPG"), 1),
        fpr: round_to(ratio(fp_f * fp_f, totals.g * totals.mp, "FPR"), 1),
    }
}

/// Parses a stat cell, returning `None` for blanks and non-numeric text.
#[must_use]
pub fn parse_stat(cell: &str) -> Option<f64> {
    cell.trim()
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Parses a stat cell, falling back to `0.0` when it is not a number.
#[must_use]
pub fn coerce_stat(cell: &str) -> f64 {
    parse_stat(cell).unwrap_or_else(|| {
        if !cell.trim().is_empty() {
            log::debug!("Non-numeric stat value {cell:?}, using 0");
        }
        0.0
    })
}

fn ratio(numerator: f64, denominator: f64, metric: &str) -> f64 {
    if denominator == 0.0 {
        log::debug!("{metric}: zero denominator, reporting 0");
        return 0.0;
    }
    numerator / denominator
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals() -> StatTotals {
        StatTotals {
            pts: 500.0,
            trb: 300.0,
            ast: 200.0,
            stl: 50.0,
            blk: 20.0,
            tov: 100.0,
            pf: 150.0,
            g: 50.0,
            mp: 1500.0,
        }
    }

    #[test]
    fn computes_reference_line() {
        let metrics = compute(&totals());
        assert_eq!(metrics.fp, 820);
        assert!((metrics.fppg - 16.4).abs() < 1e-9);
        assert!((metrics.fppm - 0.55).abs() < 1e-9);
        assert!((metrics.mpg - 30.0).abs() < 1e-9);
        assert!((metrics.fpr - 9.0).abs() < 1e-9);
    }

    #[test]
    fn truncates_fantasy_points_toward_zero() {
        let mut t = totals();
        t.pts = 500.7;
        assert_eq!(compute(&t).fp, 820);

        let negative = StatTotals {
            tov: 2.5,
            g: 1.0,
            mp: 4.0,
            ..StatTotals::default()
        };
        assert_eq!(compute(&negative).fp, -2);
    }

    #[test]
    fn zero_games_reports_zero_rates() {
        let t = StatTotals {
            pts: 10.0,
            ..StatTotals::default()
        };
        let metrics = compute(&t);
        assert_eq!(metrics.fp, 10);
        assert!(metrics.fppg.abs() < f64::EPSILON);
        assert!(metrics.fppm.abs() < f64::EPSILON);
        assert!(metrics.mpg.abs() < f64::EPSILON);
        assert!(metrics.fpr.abs() < f64::EPSILON);
    }

    #[test]
    fn rounds_half_to_even() {
        assert!((round_to(0.125, 2) - 0.12).abs() < 1e-9);
        assert!((round_to(2.5, 0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn coerces_non_numeric_cells_to_zero() {
        assert!((coerce_stat("1,234") - 1234.0).abs() < f64::EPSILON);
        assert!((coerce_stat(" 12.5 ") - 12.5).abs() < f64::EPSILON);
        assert!(coerce_stat("").abs() < f64::EPSILON);
        assert!(coerce_stat("N/A").abs() < f64::EPSILON);
        assert!(coerce_stat("NaN").abs() < f64::EPSILON);
    }
}
