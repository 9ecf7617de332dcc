use std::fmt::{self, Display};

use ndarray::Array2;

use crate::format::MatrixFormatter;
use crate::metric::CorrelationMetric;

///
/// Symmetric N×N correlation matrix with one label per track.
///
/// The diagonal is 1.0 by construction; off-diagonal cells hold the metric
/// value of the pair or `NaN` when it is undefined.
///
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    metric: CorrelationMetric,
    labels: Vec<String>,
    values: Array2<f64>,
}

impl CorrelationMatrix {
    pub(crate) fn new(metric: CorrelationMetric, labels: Vec<String>, values: Array2<f64>) -> Self {
        debug_assert_eq!(values.dim(), (labels.len(), labels.len()));
        CorrelationMatrix {
            metric,
            labels,
            values,
        }
    }

    pub fn metric(&self) -> CorrelationMetric {
        self.metric
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[[i, j]]
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Whether `m[i][j]` and `m[j][i]` agree everywhere (`NaN` matches `NaN`).
    pub fn is_symmetric(&self) -> bool {
        let n = self.len();
        (0..n).all(|i| {
            (0..n).all(|j| {
                let a = self.values[[i, j]];
                let b = self.values[[j, i]];
                a == b || (a.is_nan() && b.is_nan())
            })
        })
    }
}

impl Display for CorrelationMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", MatrixFormatter::new().render(self))
    }
}
