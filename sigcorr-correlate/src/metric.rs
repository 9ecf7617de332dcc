//! Pairwise similarity between two bin vectors.
//!
//! Missing bins are `NaN`. Both metrics only look at positions where neither
//! vector is missing; a correlation that cannot be defined (fewer than two
//! valid pairs, or no variance on one side) is `NaN` rather than an error.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CorrelateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMetric {
    #[default]
    Pearson,
    Spearman,
}

impl CorrelationMetric {
    pub const ALL: [CorrelationMetric; 2] = [CorrelationMetric::Pearson, CorrelationMetric::Spearman];

    ///
    /// Resolve a metric from its name, ignoring case.
    ///
    pub fn from_name(name: &str) -> Result<Self, CorrelateError> {
        Self::ALL
            .into_iter()
            .find(|metric| metric.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| CorrelateError::UnsupportedMetric(name.to_string()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            CorrelationMetric::Pearson => "pearson",
            CorrelationMetric::Spearman => "spearman",
        }
    }

    pub fn correlate(&self, x: &[f64], y: &[f64]) -> f64 {
        match self {
            CorrelationMetric::Pearson => pearson(x, y),
            CorrelationMetric::Spearman => spearman(x, y),
        }
    }
}

impl FromStr for CorrelationMetric {
    type Err = CorrelateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CorrelationMetric::from_name(s)
    }
}

impl Display for CorrelationMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Positions where both inputs carry a value.
fn complete_pairs(x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>) {
    debug_assert_eq!(x.len(), y.len());
    x.iter()
        .zip(y.iter())
        .filter(|(a, b)| !a.is_nan() && !b.is_nan())
        .map(|(a, b)| (*a, *b))
        .unzip()
}

/// All values equal. Compared exactly, before any rounding from the mean.
fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Product-moment correlation of already-paired values.
fn pearson_complete(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    if n < 2 || is_constant(x) || is_constant(y) {
        return f64::NAN;
    }

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in x.iter().zip(y.iter()) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }

    (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0)
}

///
/// Pearson correlation over the paired non-missing entries of `x` and `y`.
///
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let (x, y) = complete_pairs(x, y);
    pearson_complete(&x, &y)
}

///
/// Spearman rank correlation: Pearson on the average ranks of the paired
/// non-missing entries.
///
pub fn spearman(x: &[f64], y: &[f64]) -> f64 {
    let (x, y) = complete_pairs(x, y);
    pearson_complete(&rank_data(&x), &rank_data(&y))
}

///
/// 1-based ranks of `values`; tied values share the mean of their ranks.
///
pub fn rank_data(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        // positions i..=j hold ranks i+1..=j+1
        let rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = rank;
        }
        i = j + 1;
    }

    ranks
}
