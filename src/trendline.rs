//! Ordinary least squares trendline over paired samples.
//!
//! The fit is the closed-form two-parameter solution:
//!
//! ```text
//! m = (n·Σxy − Σx·Σy) / (n·Σx² − (Σx)²)
//! b = (Σy − m·Σx) / n
//! ```
//!
//! The result is clipped to the observed x-range and returned as two
//! endpoints, ready to be drawn as a line segment.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum TrendlineError {
    /// No samples at all.
    EmptyInput,
    /// `x` and `y` differ in length.
    LengthMismatch { x_len: usize, y_len: usize },
    /// Fewer than two samples, zero variance in `x`, or a non-finite fit.
    DegenerateInput(String),
}

impl Display for TrendlineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "trendline input is empty"),
            Self::LengthMismatch { x_len, y_len } => {
                write!(f, "length mismatch: x has {x_len} samples, y has {y_len}")
            }
            Self::DegenerateInput(reason) => write!(f, "degenerate trendline input: {reason}"),
        }
    }
}

impl Error for TrendlineError {}

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Fitted line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LineFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit plus the segment endpoints at min(x) and max(x).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trendline {
    pub fit: LineFit,
    pub start: Point,
    pub end: Point,
}

impl Trendline {
    pub fn xs(&self) -> [f64; 2] {
        [self.start.x, self.end.x]
    }

    pub fn ys(&self) -> [f64; 2] {
        [self.start.y, self.end.y]
    }
}

// =============================================================================
// Estimator
// =============================================================================

/// Fit slope and intercept without computing endpoints.
pub fn fit_line(x: &[f64], y: &[f64]) -> Result<LineFit, TrendlineError> {
    fit_with_range(x, y).map(|(fit, _, _)| fit)
}

/// Fit a line and clip it to the observed x-range.
pub fn trendline(x: &[f64], y: &[f64]) -> Result<Trendline, TrendlineError> {
    let (fit, min_x, max_x) = fit_with_range(x, y)?;

    Ok(Trendline {
        fit,
        start: Point { x: min_x, y: fit.predict(min_x) },
        end: Point { x: max_x, y: fit.predict(max_x) },
    })
}

/// Single pass over the samples: sums for the fit plus the x-range.
fn fit_with_range(x: &[f64], y: &[f64]) -> Result<(LineFit, f64, f64), TrendlineError> {
    if x.is_empty() && y.is_empty() {
        return Err(TrendlineError::EmptyInput);
    }
    if x.len() != y.len() {
        return Err(TrendlineError::LengthMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    let n = x.len();
    if n < 2 {
        return Err(TrendlineError::DegenerateInput(format!(
            "need at least 2 samples, got {n}"
        )));
    }

    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0, 0.0, 0.0, 0.0);
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    for (&xi, &yi) in x.iter().zip(y) {
        sum_x += xi;
        sum_y += yi;
        sum_xy += xi * yi;
        sum_xx += xi * xi;
        min_x = min_x.min(xi);
        max_x = max_x.max(xi);
    }

    // Rounding in n·Σx² − (Σx)² can leave a residue for identical x values,
    // so the range is checked directly.
    let nf = n as f64;
    let denom = nf * sum_xx - sum_x * sum_x;
    if min_x == max_x || denom == 0.0 {
        return Err(TrendlineError::DegenerateInput(
            "x values have zero variance".to_string(),
        ));
    }

    let slope = (nf * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / nf;
    if !slope.is_finite() || !intercept.is_finite() {
        return Err(TrendlineError::DegenerateInput(
            "fit is not finite".to_string(),
        ));
    }

    Ok((LineFit { slope, intercept }, min_x, max_x))
}
