//! Core models for sigcorr.
//!
//! This crate holds the pieces every other sigcorr crate agrees on: a single
//! signal record, the coordinate extent of a chromosome, and the [`SignalTrack`]
//! trait through which the correlation engine reads genome-wide signal. File
//! readers live in `sigcorr-io`; anything implementing [`SignalTrack`] can be
//! fed to the engine.
//!
//! All positions are inclusive, 1-based base coordinates.
//!
//! ```rust
//! use sigcorr_core::models::{MemoryTrack, SignalRecord};
//! use sigcorr_core::SignalTrack;
//!
//! let mut track = MemoryTrack::new("a.bedGraph");
//! track.push("chr1", SignalRecord::new(1, 100, 2.5));
//! track.push("chr1", SignalRecord::new(201, 300, 1.0));
//!
//! assert_eq!(track.chromosomes(), vec!["chr1".to_string()]);
//! assert_eq!(track.chrom_start("chr1").unwrap(), 1);
//! assert_eq!(track.chrom_stop("chr1").unwrap(), 300);
//! ```
pub mod errors;
pub mod models;
pub mod traits;

// re-export for cleaner imports
pub use self::errors::TrackError;
pub use self::traits::{RecordIter, SignalTrack};
