//! Reduce a track to one value per bin.
//!
//! A bin's value is the mean of the signal over the bases inside it that are
//! covered by at least one record. Bins without any covered base are missing
//! (`NaN`), never zero, so uncovered windows do not pull correlations down.
//!
//! Each record adds `value * overlap` and `overlap` to every bin it touches,
//! which gives the same result as visiting each covered base separately.

use sigcorr_core::SignalTrack;
use sigcorr_core::models::SignalRecord;

use crate::errors::{CorrelateError, CorrelateResult};
use crate::layout::{BinLayout, ChromBins};

/// Per-bin means of one track, concatenated in layout order.
pub type BinVector = Vec<f64>;

struct BinAccumulator {
    sums: Vec<f64>,
    counts: Vec<u64>,
}

impl BinAccumulator {
    fn new(n_bins: usize) -> Self {
        BinAccumulator {
            sums: vec![0.0; n_bins],
            counts: vec![0; n_bins],
        }
    }

    ///
    /// Spread `record` over the bins of `chrom`, clipped to the chromosome's
    /// extent.
    ///
    fn add(&mut self, chrom: &ChromBins, window_size: u32, record: &SignalRecord) {
        let extent = &chrom.extent;
        let start = record.start.max(extent.start);
        let end = record.end.min(extent.stop);
        if start > end {
            return;
        }

        let window = u64::from(window_size);
        let first = chrom.bin_of(start, window_size);
        let last = chrom.bin_of(end, window_size);

        for bin in first..=last {
            let local = (bin - chrom.offset) as u64;
            let bin_start = u64::from(extent.start) + local * window;
            let bin_end = bin_start + window - 1;

            let overlap = bin_end.min(u64::from(end)) - bin_start.max(u64::from(start)) + 1;
            self.sums[bin] += record.value * overlap as f64;
            self.counts[bin] += overlap;
        }
    }

    fn finish(self) -> BinVector {
        self.sums
            .into_iter()
            .zip(self.counts)
            .map(|(sum, count)| if count > 0 { sum / count as f64 } else { f64::NAN })
            .collect()
    }
}

///
/// Bin one track over the whole layout.
///
/// Any data-access fault aborts binning and is reported as
/// [`CorrelateError::TrackQueryFailed`]. Records whose value is `NaN` are
/// treated as not covering anything.
///
pub fn bin_track<T: SignalTrack + ?Sized>(track: &mut T, layout: &BinLayout) -> CorrelateResult<BinVector> {
    let label = track.label().to_string();
    let mut acc = BinAccumulator::new(layout.total_bins());

    for chrom in layout.chroms() {
        let name = &chrom.extent.chrom;
        let records = track
            .query(name, chrom.extent.start, chrom.extent.stop)
            .map_err(|e| CorrelateError::track_query(&label, name, e))?;

        for record in records {
            let record = record.map_err(|e| CorrelateError::track_query(&label, name, e))?;
            if record.value.is_nan() {
                continue;
            }
            acc.add(chrom, layout.window_size(), &record);
        }
    }

    Ok(acc.finish())
}
