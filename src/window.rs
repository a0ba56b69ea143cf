use std::cmp::min;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum WindowError {
    #[error("invalid interval {chrom}:{start}-{end} (start must be < end)")]
    InvalidInterval { chrom: Box<str>, start: u64, end: u64 },
}

///
/// 0-based, half-open genomic interval `[start, end)`, optionally
/// named (BED column 4)
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenomicInterval {
    pub chrom: Box<str>,
    pub start: u64,
    pub end: u64,
    pub name: Option<Box<str>>,
}

impl GenomicInterval {
    pub fn new(chrom: &str, start: u64, end: u64) -> Result<Self, WindowError> {
        if start >= end {
            return Err(WindowError::InvalidInterval {
                chrom: chrom.into(),
                start,
                end,
            });
        }
        Ok(GenomicInterval {
            chrom: chrom.into(),
            start,
            end,
            name: None,
        })
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = match name {
            "" => None,
            x => Some(x.into()),
        };
        self
    }

    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// File-friendly label: `chrom_start_end[_name]`
    pub fn label(&self) -> Box<str> {
        match &self.name {
            Some(name) => format!("{}_{}_{}_{}", self.chrom, self.start, self.end, name),
            None => format!("{}_{}_{}", self.chrom, self.start, self.end),
        }
        .into_boxed_str()
    }

    /// 1-based inclusive `chrom:from-to`, as samtools expects
    pub fn to_region_string(&self) -> String {
        format!("{}:{}-{}", self.chrom, self.start + 1, self.end)
    }
}

impl std::fmt::Display for GenomicInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
    }
}

/// A slice of an interval over which counts are averaged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub chrom: Box<str>,
    pub start: u64,
    pub end: u64,
}

impl Window {
    pub fn width(&self) -> u64 {
        self.end - self.start
    }

    pub fn contains(&self, chrom: &str, pos: u64) -> bool {
        self.chrom.as_ref() == chrom && self.start <= pos && pos < self.end
    }
}

/// Split an interval into `nwin` contiguous windows of (nearly) equal
/// width. Intervals no longer than `nwin` get one window per base.
///
/// With `L = len % nwin` left over, the first `L` windows are one
/// base wider than the rest. `nwin == 0` is read as one window.
pub fn make_windows(interval: &GenomicInterval, nwin: usize) -> Vec<Window> {
    if interval.is_empty() {
        return vec![];
    }

    let len = interval.len();
    let nn = min(nwin.max(1) as u64, len);

    let width = len / nn;
    let rem = len % nn;

    let mut ret = Vec::with_capacity(nn as usize);
    let mut lb = interval.start;
    for j in 0..nn {
        let ub = lb + width + if j < rem { 1 } else { 0 };
        ret.push(Window {
            chrom: interval.chrom.clone(),
            start: lb,
            end: ub,
        });
        lb = ub;
    }
    debug_assert_eq!(lb, interval.end);
    ret
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn widths(ww: &[Window]) -> Vec<u64> {
        ww.iter().map(|w| w.width()).collect()
    }

    #[test]
    fn short_interval_one_window_per_base() {
        let iv = GenomicInterval::new("chr1", 10, 15).unwrap();
        let ww = make_windows(&iv, 1000);
        assert_eq!(ww.len(), 5);
        assert_eq!(ww[0].start, 10);
        assert_eq!(ww[4].end, 15);
        assert!(widths(&ww).iter().all(|&w| w == 1));
    }

    #[test]
    fn remainder_goes_to_leading_windows() {
        let iv = GenomicInterval::new("chr1", 0, 10).unwrap();
        assert_eq!(widths(&make_windows(&iv, 3)), vec![4, 3, 3]);
        assert_eq!(widths(&make_windows(&iv, 4)), vec![3, 3, 2, 2]);
        assert_eq!(widths(&make_windows(&iv, 0)), vec![10]);
    }

    #[test]
    fn labels_and_region_strings() {
        let iv = GenomicInterval::new("chrX", 0, 100).unwrap();
        assert_eq!(iv.label().as_ref(), "chrX_0_100");
        assert_eq!(iv.to_region_string(), "chrX:1-100");
        let iv = iv.with_name("ACTB");
        assert_eq!(iv.label().as_ref(), "chrX_0_100_ACTB");
        assert!(GenomicInterval::new("chrX", 5, 5).is_err());
    }

    proptest! {
        #[test]
        fn windows_partition_the_interval(start in 0u64..1_000_000, len in 1u64..50_000, nwin in 0usize..3_000) {
            let iv = GenomicInterval::new("chr1", start, start + len).unwrap();
            let ww = make_windows(&iv, nwin);

            prop_assert_eq!(ww.len() as u64, (nwin.max(1) as u64).min(len));
            prop_assert_eq!(ww.first().unwrap().start, iv.start);
            prop_assert_eq!(ww.last().unwrap().end, iv.end);
            prop_assert_eq!(widths(&ww).iter().sum::<u64>(), len);

            for pair in ww.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
            }

            let wmax = ww.iter().map(|w| w.width()).max().unwrap();
            let wmin = ww.iter().map(|w| w.width()).min().unwrap();
            prop_assert!(wmin >= 1);
            prop_assert!(wmax - wmin <= 1);
        }
    }
}
