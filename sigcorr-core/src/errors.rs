use thiserror::Error;

/// Data-access faults raised by a [`SignalTrack`](crate::SignalTrack).
#[derive(Error, Debug)]
pub enum TrackError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Malformed record at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Chromosome not present in track: {0}")]
    UnknownChromosome(String),

    #[error("Unsupported track format: {0}")]
    UnsupportedFormat(String),

    #[error("BigWig error: {0}")]
    BigWig(String),

    #[error("No signal records found in track: {0}")]
    EmptyTrack(String),
}

impl TrackError {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        TrackError::Parse {
            line,
            message: message.into(),
        }
    }
}
