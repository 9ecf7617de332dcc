use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::builder::CorrelationMatrixBuilder;
use crate::errors::{CorrelateError, CorrelateResult};
use crate::format::MatrixFormatter;
use crate::metric::CorrelationMetric;

pub const DEFAULT_WINDOW_SIZE: u32 = 100;
pub const DEFAULT_METRIC: &str = "pearson";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

///
/// Everything a correlation run needs besides the tracks themselves.
///
/// ```toml
/// window_size = 500
/// metric = "spearman"
/// threads = 4
/// precision = 4
/// ```
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CorrelateConfig {
    /// Width of each bin in base pairs.
    pub window_size: u32,
    /// `pearson` or `spearman`, any case.
    pub metric: String,
    /// Worker threads for the pairwise loop. 1 keeps the run sequential.
    pub threads: usize,
    /// Decimal places when rendering the matrix.
    pub precision: Option<usize>,
    /// Show a progress bar over track pairs.
    pub progress: bool,
}

impl Default for CorrelateConfig {
    fn default() -> Self {
        CorrelateConfig {
            window_size: DEFAULT_WINDOW_SIZE,
            metric: DEFAULT_METRIC.to_string(),
            threads: 1,
            precision: None,
            progress: false,
        }
    }
}

impl CorrelateConfig {
    pub fn metric(&self) -> CorrelateResult<CorrelationMetric> {
        CorrelationMetric::from_name(&self.metric)
    }

    ///
    /// Check every value without touching any track.
    ///
    pub fn validate(&self) -> CorrelateResult<()> {
        self.metric()?;
        if self.window_size == 0 {
            return Err(CorrelateError::InvalidWindowSize(self.window_size));
        }
        Ok(())
    }

    pub fn builder(&self) -> CorrelateResult<CorrelationMatrixBuilder> {
        self.validate()?;
        Ok(CorrelationMatrixBuilder::new(self.metric()?)
            .with_window_size(self.window_size)
            .with_threads(self.threads)
            .with_progress(self.progress))
    }

    pub fn formatter(&self) -> MatrixFormatter {
        MatrixFormatter::new().with_precision(self.precision)
    }
}

impl TryFrom<&Path> for CorrelateConfig {
    type Error = ConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let config = toml::from_str(&toml_str)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::io::Write;

    #[rstest]
    fn test_defaults() {
        let config = CorrelateConfig::default();
        assert_eq!(config.window_size, 100);
        assert_eq!(config.metric().unwrap(), CorrelationMetric::Pearson);
        assert_eq!(config.threads, 1);
        assert!(config.validate().is_ok());
    }

    #[rstest]
    fn test_try_from_toml_fills_missing_with_defaults() {
        let mut f = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(f, "metric = \"Spearman\"").unwrap();
        writeln!(f, "precision = 3").unwrap();
        f.flush().unwrap();

        let config = CorrelateConfig::try_from(f.path()).unwrap();
        assert_eq!(config.metric().unwrap(), CorrelationMetric::Spearman);
        assert_eq!(config.window_size, DEFAULT_WINDOW_SIZE);
        assert_eq!(config.precision, Some(3));
    }

    #[rstest]
    fn test_try_from_toml_rejects_unknown_keys() {
        let mut f = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(f, "windowsize = 5").unwrap();
        f.flush().unwrap();

        assert!(matches!(
            CorrelateConfig::try_from(f.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[rstest]
    fn test_validate() {
        let config = CorrelateConfig {
            window_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CorrelateError::InvalidWindowSize(0))
        ));

        let config = CorrelateConfig {
            metric: "cosine".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.builder(),
            Err(CorrelateError::UnsupportedMetric(_))
        ));
    }
}
