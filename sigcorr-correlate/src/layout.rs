//! The common coordinate space of a set of tracks.
//!
//! Only chromosomes reported by every track take part in a run. Each of them
//! spans the union of the tracks' covered ranges and is tiled with fixed-width
//! bins; the per-chromosome bins are concatenated, in a fixed order, into the
//! global layout shared by every bin vector of the run.

use std::collections::HashSet;

use sigcorr_core::SignalTrack;
use sigcorr_core::models::ChromExtent;

use crate::errors::{CorrelateError, CorrelateResult};

/// Bins of one chromosome within the global layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromBins {
    pub extent: ChromExtent,
    pub n_bins: usize,
    /// Index of this chromosome's first bin in the bin vector.
    pub offset: usize,
}

impl ChromBins {
    /// Global index of the bin holding `pos`. `pos` must lie within the extent.
    pub fn bin_of(&self, pos: u32, window_size: u32) -> usize {
        self.offset + ((pos - self.extent.start) / window_size) as usize
    }
}

///
/// Fixed bin layout of one correlation run. Built once and never modified.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinLayout {
    window_size: u32,
    chroms: Vec<ChromBins>,
    total_bins: usize,
}

impl BinLayout {
    ///
    /// Tile the given extents, in order, with windows of `window_size` bp.
    ///
    pub fn new(extents: Vec<ChromExtent>, window_size: u32) -> CorrelateResult<Self> {
        if window_size == 0 {
            return Err(CorrelateError::InvalidWindowSize(window_size));
        }
        if extents.is_empty() {
            return Err(CorrelateError::NoCommonChromosomes);
        }

        let mut offset = 0;
        let chroms = extents
            .into_iter()
            .map(|extent| {
                let n_bins = extent.n_bins(window_size);
                log::debug!("{} tiled with {} bins", extent, n_bins);
                let bins = ChromBins {
                    extent,
                    n_bins,
                    offset,
                };
                offset += n_bins;
                bins
            })
            .collect();

        Ok(BinLayout {
            window_size,
            chroms,
            total_bins: offset,
        })
    }

    ///
    /// Resolve the common coordinate space of `tracks`.
    ///
    /// Chromosome order follows the first track, filtered to those present in
    /// every track. For each common chromosome the extent runs from the smallest
    /// reported start to the largest reported stop.
    ///
    pub fn resolve<T: SignalTrack>(tracks: &[T], window_size: u32) -> CorrelateResult<Self> {
        if tracks.len() < 2 {
            return Err(CorrelateError::InsufficientInputs(tracks.len()));
        }
        if window_size == 0 {
            return Err(CorrelateError::InvalidWindowSize(window_size));
        }

        let chromosomes = common_chromosomes(tracks);
        let mut extents = Vec::with_capacity(chromosomes.len());
        for chrom in chromosomes {
            let mut start = u32::MAX;
            let mut stop = u32::MIN;
            for track in tracks {
                let track_start = track
                    .chrom_start(&chrom)
                    .map_err(|e| CorrelateError::track_query(track.label(), &chrom, e))?;
                let track_stop = track
                    .chrom_stop(&chrom)
                    .map_err(|e| CorrelateError::track_query(track.label(), &chrom, e))?;
                start = start.min(track_start);
                stop = stop.max(track_stop);
            }
            extents.push(ChromExtent::new(chrom, start, stop));
        }

        let layout = BinLayout::new(extents, window_size)?;
        log::debug!(
            "Total number of bins for all chromosomes = {}",
            layout.total_bins()
        );
        Ok(layout)
    }

    pub fn window_size(&self) -> u32 {
        self.window_size
    }

    pub fn chroms(&self) -> &[ChromBins] {
        &self.chroms
    }

    pub fn total_bins(&self) -> usize {
        self.total_bins
    }
}

///
/// Chromosomes reported by every track, in the first track's order.
///
pub fn common_chromosomes<T: SignalTrack>(tracks: &[T]) -> Vec<String> {
    let Some((first, rest)) = tracks.split_first() else {
        return Vec::new();
    };

    let others: Vec<HashSet<String>> = rest
        .iter()
        .map(|t| t.chromosomes().into_iter().collect())
        .collect();

    let mut common = Vec::new();
    let mut seen = HashSet::new();
    for chrom in first.chromosomes() {
        if !seen.insert(chrom.clone()) {
            continue;
        }
        if others.iter().all(|set| set.contains(&chrom)) {
            common.push(chrom);
        } else {
            log::warn!(
                "Skipping chromosome {} because it is not present in all tracks",
                chrom
            );
        }
    }

    for (track, set) in rest.iter().zip(others.iter()) {
        for chrom in set.iter().filter(|c| !seen.contains(*c)) {
            log::warn!(
                "Skipping chromosome {} from {} because it is not present in all tracks",
                chrom,
                track.label()
            );
        }
    }

    common
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use sigcorr_core::models::MemoryTrack;

    #[fixture]
    fn tracks() -> Vec<MemoryTrack> {
        vec![
            MemoryTrack::new("a")
                .with_record("chr2", 100, 500, 1.0)
                .with_record("chr1", 11, 250, 1.0)
                .with_record("chrM", 1, 50, 1.0),
            MemoryTrack::new("b")
                .with_record("chr1", 1, 180, 1.0)
                .with_record("chr2", 300, 1000, 1.0)
                .with_record("chrY", 1, 50, 1.0),
        ]
    }

    #[rstest]
    fn test_common_chromosomes_follow_first_track(tracks: Vec<MemoryTrack>) {
        assert_eq!(common_chromosomes(&tracks), vec!["chr2", "chr1"]);
    }

    #[rstest]
    fn test_resolve_takes_union_extent(tracks: Vec<MemoryTrack>) {
        let layout = BinLayout::resolve(&tracks, 100).unwrap();

        let chroms = layout.chroms();
        assert_eq!(chroms.len(), 2);
        assert_eq!(chroms[0].extent, ChromExtent::new("chr2", 100, 1000));
        assert_eq!(chroms[0].n_bins, 10); // 901 bp
        assert_eq!(chroms[0].offset, 0);
        assert_eq!(chroms[1].extent, ChromExtent::new("chr1", 1, 250));
        assert_eq!(chroms[1].n_bins, 3);
        assert_eq!(chroms[1].offset, 10);
        assert_eq!(layout.total_bins(), 13);
    }

    #[rstest]
    fn test_resolve_is_deterministic(tracks: Vec<MemoryTrack>) {
        assert_eq!(
            BinLayout::resolve(&tracks, 50).unwrap(),
            BinLayout::resolve(&tracks, 50).unwrap()
        );
    }

    #[rstest]
    fn test_insufficient_inputs() {
        let one = vec![MemoryTrack::new("a").with_record("chr1", 1, 10, 1.0)];
        assert!(matches!(
            BinLayout::resolve(&one, 100),
            Err(CorrelateError::InsufficientInputs(1))
        ));

        let none: Vec<MemoryTrack> = vec![];
        assert!(matches!(
            BinLayout::resolve(&none, 100),
            Err(CorrelateError::InsufficientInputs(0))
        ));
    }

    #[rstest]
    fn test_two_tracks_are_sufficient() {
        let two = vec![
            MemoryTrack::new("a").with_record("chr1", 1, 10, 1.0),
            MemoryTrack::new("b").with_record("chr1", 1, 10, 1.0),
        ];
        assert!(BinLayout::resolve(&two, 100).is_ok());
    }

    #[rstest]
    fn test_disjoint_chromosomes() {
        let tracks = vec![
            MemoryTrack::new("a").with_record("chr1", 1, 10, 1.0),
            MemoryTrack::new("b").with_record("chr2", 1, 10, 1.0),
        ];
        assert!(matches!(
            BinLayout::resolve(&tracks, 100),
            Err(CorrelateError::NoCommonChromosomes)
        ));
    }

    #[rstest]
    fn test_zero_window_rejected(tracks: Vec<MemoryTrack>) {
        assert!(matches!(
            BinLayout::resolve(&tracks, 0),
            Err(CorrelateError::InvalidWindowSize(0))
        ));
    }

    #[rstest]
    #[case(1, 0)]
    #[case(100, 0)]
    #[case(101, 1)]
    #[case(250, 2)]
    fn test_bin_of(#[case] pos: u32, #[case] expected: usize) {
        let layout = BinLayout::new(
            vec![
                ChromExtent::new("chr2", 1, 50),
                ChromExtent::new("chr1", 1, 250),
            ],
            100,
        )
        .unwrap();
        let chr1 = &layout.chroms()[1];
        assert_eq!(chr1.offset, 1);
        assert_eq!(chr1.bin_of(pos, layout.window_size()), expected + 1);
    }
}
