//! # File-backed signal tracks.
//!
//! Readers for the common genome-signal formats, each exposed as a
//! [`SignalTrack`](sigcorr_core::SignalTrack):
//!
//! - bedGraph (`.bg`, `.bedgraph`), optionally gzip-compressed
//! - wiggle (`.wig`) with `fixedStep` and `variableStep` sections, optionally gzip-compressed
//! - bigWig (`.bw`, `.bigwig`), behind the `bigwig` feature
//!
//! Text formats are indexed with one streaming pass on open and re-read from disk
//! on every query, so the memory held by a track does not grow with its size.
//!
pub mod bedgraph;
#[cfg(feature = "bigwig")]
pub mod bigwig;
pub mod index;
pub mod text;
pub mod utils;
pub mod wig;

use std::path::Path;

use sigcorr_core::{SignalTrack, TrackError};

// re-expose readers
pub use bedgraph::BedGraphTrack;
#[cfg(feature = "bigwig")]
pub use bigwig::BigWigTrack;
pub use utils::{FileType, get_file_info};
pub use wig::WigTrack;

///
/// Open a track file, picking the reader from its extension.
///
/// # Arguments
/// - path: path to a bedGraph, wiggle or bigWig file
///
pub fn open_track<P: AsRef<Path>>(path: P) -> Result<Box<dyn SignalTrack + Send>, TrackError> {
    let path = path.as_ref();
    let info = get_file_info(path);

    let track: Box<dyn SignalTrack + Send> = match info.file_type {
        FileType::BEDGRAPH => Box::new(BedGraphTrack::open(path)?),
        FileType::WIG => Box::new(WigTrack::open(path)?),
        #[cfg(feature = "bigwig")]
        FileType::BIGWIG => Box::new(BigWigTrack::open(path)?),
        #[cfg(not(feature = "bigwig"))]
        FileType::BIGWIG => {
            return Err(TrackError::UnsupportedFormat(format!(
                "{} (bigWig support not compiled in)",
                path.display()
            )));
        }
        FileType::UNKNOWN => {
            return Err(TrackError::UnsupportedFormat(path.display().to_string()));
        }
    };

    log::debug!("Initialized track {}", track.label());
    Ok(track)
}
