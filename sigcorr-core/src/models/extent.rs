use std::fmt::{self, Display};

///
/// Union coordinate range of a chromosome across a set of tracks.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChromExtent {
    pub chrom: String,
    pub start: u32,
    pub stop: u32,
}

impl ChromExtent {
    pub fn new(chrom: impl Into<String>, start: u32, stop: u32) -> Self {
        ChromExtent {
            chrom: chrom.into(),
            start,
            stop,
        }
    }

    /// Number of bases in the extent, both ends included.
    pub fn n_bases(&self) -> u64 {
        u64::from(self.stop) - u64::from(self.start) + 1
    }

    /// Number of fixed-width windows needed to tile the extent.
    pub fn n_bins(&self, window_size: u32) -> usize {
        self.n_bases().div_ceil(u64::from(window_size)) as usize
    }
}

impl Display for ChromExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case(1, 300, 100, 3)]
    #[case(1, 301, 100, 4)]
    #[case(0, 299, 100, 3)]
    #[case(7, 7, 100, 1)]
    #[case(1, 10, 1, 10)]
    fn test_n_bins(#[case] start: u32, #[case] stop: u32, #[case] window: u32, #[case] expected: usize) {
        let extent = ChromExtent::new("chr1", start, stop);
        assert_eq!(extent.n_bins(window), expected);
    }

    #[rstest]
    fn test_display() {
        assert_eq!(ChromExtent::new("chrX", 10, 20).to_string(), "chrX:10-20");
    }
}
