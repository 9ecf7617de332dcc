//! # Pairwise correlation of genome signal tracks
//!
//! Resolves the coordinate space shared by a set of [`SignalTrack`]s, reduces
//! every track to a vector of per-bin mean signal over fixed-size windows, and
//! correlates each pair with Pearson or Spearman.
//!
//! ```
//! use sigcorr_core::models::MemoryTrack;
//! use sigcorr_correlate::{CorrelateConfig, correlate};
//!
//! let a = MemoryTrack::from_values("a", "chr1", 1, &[1.0, 2.0, 3.0, 4.0]);
//! let b = MemoryTrack::from_values("b", "chr1", 1, &[2.0, 4.0, 6.0, 8.0]);
//!
//! let config = CorrelateConfig { window_size: 1, ..Default::default() };
//! let matrix = correlate(&mut [a, b], &config).unwrap();
//! assert!((matrix.get(0, 1) - 1.0).abs() < 1e-12);
//! ```
pub mod binner;
pub mod builder;
pub mod config;
pub mod errors;
pub mod format;
pub mod layout;
pub mod matrix;
pub mod metric;

pub use builder::CorrelationMatrixBuilder;
pub use config::CorrelateConfig;
pub use errors::{CorrelateError, CorrelateResult};
pub use format::MatrixFormatter;
pub use layout::BinLayout;
pub use matrix::CorrelationMatrix;
pub use metric::CorrelationMetric;

use sigcorr_core::SignalTrack;

///
/// Correlate every pair of `tracks` using the settings in `config`.
///
pub fn correlate<T: SignalTrack + Send>(
    tracks: &mut [T],
    config: &CorrelateConfig,
) -> CorrelateResult<CorrelationMatrix> {
    config.builder()?.build(tracks)
}
