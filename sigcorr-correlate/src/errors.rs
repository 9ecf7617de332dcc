use thiserror::Error;

use sigcorr_core::TrackError;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum CorrelateError {
    #[error("Cannot correlate < 2 input tracks (got {0})")]
    InsufficientInputs(usize),

    #[error("Unknown correlation metric: {0}. Options are pearson, spearman")]
    UnsupportedMetric(String),

    #[error("No chromosomes are common to all input tracks")]
    NoCommonChromosomes,

    #[error("Error getting data for {chrom} from track {track}: {source}")]
    TrackQueryFailed {
        track: String,
        chrom: String,
        #[source]
        source: TrackError,
    },

    #[error("Window size must be a positive integer (got {0})")]
    InvalidWindowSize(u32),

    #[error("Failed to build worker thread pool: {0}")]
    ThreadPool(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CorrelateError {
    pub fn track_query(track: &str, chrom: &str, source: TrackError) -> Self {
        CorrelateError::TrackQueryFailed {
            track: track.to_string(),
            chrom: chrom.to_string(),
            source,
        }
    }
}

pub type CorrelateResult<T> = std::result::Result<T, CorrelateError>;
