//! Pairwise correlation of N tracks with bounded memory.
//!
//! For every outer track `i` its bin vector is computed once; every later track
//! `j` is then binned afresh and correlated against it. A sequential run never
//! holds more than two bin vectors at a time, whatever the number of tracks.
//!
//! With more than one thread the inner loop runs on a rayon pool. Each work
//! item owns a different track, so no track is queried concurrently, and the
//! bound becomes one vector for `i` plus one per worker.

use indicatif::ProgressBar;
use ndarray::Array2;
use rayon::prelude::*;

use sigcorr_core::SignalTrack;

use crate::binner::{BinVector, bin_track};
use crate::config::DEFAULT_WINDOW_SIZE;
use crate::errors::{CorrelateError, CorrelateResult};
use crate::layout::BinLayout;
use crate::matrix::CorrelationMatrix;
use crate::metric::CorrelationMetric;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelationMatrixBuilder {
    metric: CorrelationMetric,
    window_size: u32,
    threads: usize,
    progress: bool,
}

impl Default for CorrelationMatrixBuilder {
    fn default() -> Self {
        CorrelationMatrixBuilder::new(CorrelationMetric::default())
    }
}

impl CorrelationMatrixBuilder {
    pub fn new(metric: CorrelationMetric) -> Self {
        CorrelationMatrixBuilder {
            metric,
            window_size: DEFAULT_WINDOW_SIZE,
            threads: 1,
            progress: false,
        }
    }

    pub fn with_window_size(mut self, window_size: u32) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    ///
    /// Resolve the coordinate space of `tracks` and correlate every pair.
    ///
    /// Fails without producing any matrix if fewer than two tracks are given,
    /// no chromosome is shared by all tracks, or any track query fails.
    ///
    pub fn build<T: SignalTrack + Send>(&self, tracks: &mut [T]) -> CorrelateResult<CorrelationMatrix> {
        let layout = BinLayout::resolve(tracks, self.window_size)?;
        self.build_with_layout(tracks, &layout)
    }

    ///
    /// Correlate every pair of `tracks` over an already resolved layout.
    ///
    pub fn build_with_layout<T: SignalTrack + Send>(
        &self,
        tracks: &mut [T],
        layout: &BinLayout,
    ) -> CorrelateResult<CorrelationMatrix> {
        let n = tracks.len();
        if n < 2 {
            return Err(CorrelateError::InsufficientInputs(n));
        }

        let labels: Vec<String> = tracks.iter().map(|t| t.label().to_string()).collect();
        let mut values = Array2::<f64>::eye(n);

        let pool = if self.threads > 1 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(self.threads)
                    .build()
                    .map_err(|e| CorrelateError::ThreadPool(e.to_string()))?,
            )
        } else {
            None
        };

        let bar = if self.progress {
            ProgressBar::new((n * (n - 1) / 2) as u64)
        } else {
            ProgressBar::hidden()
        };

        let metric = self.metric;
        for i in 0..n - 1 {
            log::debug!("Loading data from track {} ({})", i, labels[i]);
            let (head, rest) = tracks.split_at_mut(i + 1);
            let bins_i = bin_track(&mut head[i], layout)?;

            let correlate_with = |j_offset: usize, track: &mut T| -> CorrelateResult<f64> {
                let j = i + 1 + j_offset;
                log::debug!("Loading data from track {} ({})", j, track.label());
                let bins_j: BinVector = bin_track(track, layout)?;

                log::debug!("Correlating ({},{})", i, j);
                let r = metric.correlate(&bins_i, &bins_j);
                bar.inc(1);
                Ok(r)
            };

            let row: Vec<f64> = match &pool {
                Some(pool) => pool.install(|| {
                    rest.par_iter_mut()
                        .enumerate()
                        .map(|(k, track)| correlate_with(k, track))
                        .collect::<CorrelateResult<Vec<f64>>>()
                })?,
                None => rest
                    .iter_mut()
                    .enumerate()
                    .map(|(k, track)| correlate_with(k, track))
                    .collect::<CorrelateResult<Vec<f64>>>()?,
            };

            for (k, r) in row.into_iter().enumerate() {
                let j = i + 1 + k;
                values[[i, j]] = r;
                values[[j, i]] = r;
            }
        }
        bar.finish_and_clear();

        Ok(CorrelationMatrix::new(metric, labels, values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use sigcorr_core::models::MemoryTrack;
    use sigcorr_core::{RecordIter, TrackError};

    fn ramp(label: &str, f: impl Fn(f64) -> f64) -> MemoryTrack {
        let values: Vec<f64> = (0..300).map(|p| f(p as f64)).collect();
        MemoryTrack::from_values(label, "chr1", 1, &values)
    }

    #[fixture]
    fn tracks() -> Vec<MemoryTrack> {
        vec![
            ramp("up", |p| p),
            ramp("scaled", |p| 2.0 * p + 3.0),
            ramp("down", |p| -p),
            ramp("wave", |p| (p / 20.0).sin()),
        ]
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    fn test_matrix_is_symmetric_with_unit_diagonal(mut tracks: Vec<MemoryTrack>, #[case] threads: usize) {
        let matrix = CorrelationMatrixBuilder::new(CorrelationMetric::Pearson)
            .with_window_size(25)
            .with_threads(threads)
            .build(&mut tracks)
            .unwrap();

        assert_eq!(matrix.len(), 4);
        assert!(matrix.is_symmetric());
        for i in 0..4 {
            assert_eq!(matrix.get(i, i), 1.0);
        }
        assert!((matrix.get(0, 1) - 1.0).abs() < 1e-9);
        assert!((matrix.get(0, 2) + 1.0).abs() < 1e-9);
        assert_eq!(matrix.labels(), &["up", "scaled", "down", "wave"]);
    }

    #[rstest]
    fn test_parallel_matches_sequential(mut tracks: Vec<MemoryTrack>) {
        let builder = CorrelationMatrixBuilder::new(CorrelationMetric::Spearman).with_window_size(10);
        let sequential = builder.build(&mut tracks).unwrap();
        let parallel = builder.with_threads(4).build(&mut tracks).unwrap();
        assert_eq!(sequential.values(), parallel.values());
    }

    #[rstest]
    fn test_single_track_is_rejected() {
        let mut tracks = vec![ramp("only", |p| p)];
        let result = CorrelationMatrixBuilder::default().build(&mut tracks);
        assert!(matches!(result, Err(CorrelateError::InsufficientInputs(1))));
    }

    /// Counts how many times each track is binned.
    struct CountingTrack {
        inner: MemoryTrack,
        queries: usize,
    }

    impl SignalTrack for CountingTrack {
        fn label(&self) -> &str {
            self.inner.label()
        }
        fn chromosomes(&self) -> Vec<String> {
            self.inner.chromosomes()
        }
        fn chrom_start(&self, chrom: &str) -> Result<u32, TrackError> {
            self.inner.chrom_start(chrom)
        }
        fn chrom_stop(&self, chrom: &str) -> Result<u32, TrackError> {
            self.inner.chrom_stop(chrom)
        }
        fn query(&mut self, chrom: &str, start: u32, stop: u32) -> Result<RecordIter<'_>, TrackError> {
            self.queries += 1;
            self.inner.query(chrom, start, stop)
        }
    }

    #[rstest]
    fn test_outer_track_binned_once_inner_tracks_rebinned(tracks: Vec<MemoryTrack>) {
        let mut counting: Vec<CountingTrack> = tracks
            .into_iter()
            .map(|inner| CountingTrack { inner, queries: 0 })
            .collect();

        CorrelationMatrixBuilder::default()
            .build(&mut counting)
            .unwrap();

        // track k is binned once as outer track (if k < n-1) and once per earlier track
        let queries: Vec<usize> = counting.iter().map(|t| t.queries).collect();
        assert_eq!(queries, vec![1, 2, 3, 3]);
    }

    struct BrokenTrack;

    impl SignalTrack for BrokenTrack {
        fn label(&self) -> &str {
            "broken"
        }
        fn chromosomes(&self) -> Vec<String> {
            vec!["chr1".to_string()]
        }
        fn chrom_start(&self, _chrom: &str) -> Result<u32, TrackError> {
            Ok(1)
        }
        fn chrom_stop(&self, _chrom: &str) -> Result<u32, TrackError> {
            Ok(300)
        }
        fn query(&mut self, _chrom: &str, _start: u32, _stop: u32) -> Result<RecordIter<'_>, TrackError> {
            Err(TrackError::Io(std::io::Error::other("disk went away")))
        }
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    fn test_track_failure_aborts_run(#[case] threads: usize) {
        let mut tracks: Vec<Box<dyn SignalTrack + Send>> = vec![
            Box::new(ramp("ok", |p| p)),
            Box::new(ramp("ok2", |p| p * p)),
            Box::new(BrokenTrack),
        ];
        let result = CorrelationMatrixBuilder::default()
            .with_threads(threads)
            .build(&mut tracks);

        match result {
            Err(CorrelateError::TrackQueryFailed { track, .. }) => assert_eq!(track, "broken"),
            other => panic!("expected TrackQueryFailed, got {:?}", other.map(|m| m.to_string())),
        }
    }
}
