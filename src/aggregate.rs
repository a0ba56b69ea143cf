use crate::track::CoverageRow;
use crate::window::Window;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AggregateError {
    /// Windowing and position rows disagree
    #[error("window {chrom}:{start}-{end} received no positions")]
    EmptyWindow { chrom: Box<str>, start: u64, end: u64 },

    #[error("position {chrom}:{pos} falls outside every window")]
    UnassignedPosition { chrom: Box<str>, pos: u64 },

    #[error("row {chrom}:{pos} has {found} values, expected {expected}")]
    WidthMismatch {
        chrom: Box<str>,
        pos: u64,
        expected: usize,
        found: usize,
    },
}

///
/// Streaming mean of coverage rows by window. Rows are folded into
/// per-window running sums as they arrive, so memory stays at
/// `windows x columns` however long the region is.
///
pub struct WindowAggregator {
    windows: Vec<Window>,
    ncol: usize,
    sums: Vec<f64>,
    nobs: Vec<u64>,
    ref_bases: Vec<Option<char>>,
    skip_empty: bool,
}

impl WindowAggregator {
    /// * `windows` - sorted, non-overlapping (see [`crate::window::make_windows`])
    /// * `ncol` - number of values per row
    pub fn new(windows: Vec<Window>, ncol: usize) -> Self {
        let nwin = windows.len();
        WindowAggregator {
            windows,
            ncol,
            sums: vec![0_f64; nwin * ncol],
            nobs: vec![0; nwin],
            ref_bases: vec![None; nwin],
            skip_empty: false,
        }
    }

    /// Leave windows without positions out of the output instead of
    /// failing
    pub fn skip_empty(mut self, skip: bool) -> Self {
        self.skip_empty = skip;
        self
    }

    pub fn num_windows(&self) -> usize {
        self.windows.len()
    }

    /// Number of rows folded in so far
    pub fn num_positions(&self) -> u64 {
        self.nobs.iter().sum()
    }

    fn locate(&self, chrom: &str, pos: u64) -> Option<usize> {
        let j = self.windows.partition_point(|w| w.end <= pos);
        self.windows
            .get(j)
            .filter(|w| w.contains(chrom, pos))
            .map(|_| j)
    }

    pub fn push(&mut self, row: &CoverageRow) -> Result<(), AggregateError> {
        if row.values.len() != self.ncol {
            return Err(AggregateError::WidthMismatch {
                chrom: row.chrom.clone(),
                pos: row.start,
                expected: self.ncol,
                found: row.values.len(),
            });
        }

        let j = self.locate(&row.chrom, row.start).ok_or_else(|| {
            AggregateError::UnassignedPosition {
                chrom: row.chrom.clone(),
                pos: row.start,
            }
        })?;

        let sums = &mut self.sums[j * self.ncol..(j + 1) * self.ncol];
        for (s, v) in sums.iter_mut().zip(row.values.iter()) {
            *s += v;
        }
        self.nobs[j] += 1;

        // keep the reference base only while all positions agree
        self.ref_bases[j] = match self.ref_bases[j] {
            None => Some(row.ref_base),
            Some(b) if b == row.ref_base => Some(b),
            Some(_) => Some('N'),
        };
        Ok(())
    }

    pub fn push_all<'a, I>(&mut self, rows: I) -> Result<(), AggregateError>
    where
        I: IntoIterator<Item = &'a CoverageRow>,
    {
        for row in rows {
            self.push(row)?;
        }
        Ok(())
    }

    /// One row per window holding the mean of every column
    pub fn finish(self) -> Result<Vec<CoverageRow>, AggregateError> {
        let mut ret = Vec::with_capacity(self.windows.len());

        for (j, w) in self.windows.into_iter().enumerate() {
            let n = self.nobs[j];
            if n == 0 {
                if self.skip_empty {
                    continue;
                }
                return Err(AggregateError::EmptyWindow {
                    chrom: w.chrom,
                    start: w.start,
                    end: w.end,
                });
            }

            let denom = cast::f64(n);
            let values = self.sums[j * self.ncol..(j + 1) * self.ncol]
                .iter()
                .map(|s| s / denom)
                .collect();

            ret.push(CoverageRow {
                chrom: w.chrom,
                start: w.start,
                end: w.end,
                ref_base: self.ref_bases[j].unwrap_or('N'),
                values,
            });
        }
        Ok(ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::{make_windows, GenomicInterval};
    use proptest::prelude::*;

    fn row(pos: u64, ref_base: char, values: Vec<f64>) -> CoverageRow {
        CoverageRow {
            chrom: "chr1".into(),
            start: pos,
            end: pos + 1,
            ref_base,
            values,
        }
    }

    #[test]
    fn mean_depth_of_a_window() {
        let iv = GenomicInterval::new("chr1", 100, 103).unwrap();
        let mut agg = WindowAggregator::new(make_windows(&iv, 1), 1);
        for (p, d) in [(100, 10.0), (101, 20.0), (102, 30.0)] {
            agg.push(&row(p, 'A', vec![d])).unwrap();
        }
        let out = agg.finish().unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].values, vec![20.0]);
        assert_eq!((out[0].start, out[0].end), (100, 103));
    }

    #[test]
    fn mixed_reference_bases_become_n() {
        let iv = GenomicInterval::new("chr1", 0, 4).unwrap();
        let mut agg = WindowAggregator::new(make_windows(&iv, 2), 1);
        agg.push_all(&[
            row(0, 'A', vec![1.0]),
            row(1, 'A', vec![1.0]),
            row(2, 'C', vec![1.0]),
            row(3, 'G', vec![1.0]),
        ])
        .unwrap();
        let out = agg.finish().unwrap();
        assert_eq!(out[0].ref_base, 'A');
        assert_eq!(out[1].ref_base, 'N');
    }

    #[test]
    fn empty_window_is_an_error_unless_skipped() {
        let iv = GenomicInterval::new("chr1", 0, 4).unwrap();
        let rows = [row(0, 'A', vec![2.0]), row(1, 'A', vec![4.0])];

        let mut agg = WindowAggregator::new(make_windows(&iv, 2), 1);
        agg.push_all(&rows).unwrap();
        assert_eq!(
            agg.finish(),
            Err(AggregateError::EmptyWindow {
                chrom: "chr1".into(),
                start: 2,
                end: 4
            })
        );

        let mut agg = WindowAggregator::new(make_windows(&iv, 2), 1).skip_empty(true);
        agg.push_all(&rows).unwrap();
        let out = agg.finish().unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].values, vec![3.0]);
    }

    #[test]
    fn positions_outside_windows_are_rejected() {
        let iv = GenomicInterval::new("chr1", 10, 20).unwrap();
        let mut agg = WindowAggregator::new(make_windows(&iv, 5), 2);
        assert!(matches!(
            agg.push(&row(20, 'A', vec![0.0, 0.0])),
            Err(AggregateError::UnassignedPosition { pos: 20, .. })
        ));
        assert!(matches!(
            agg.push(&row(9, 'A', vec![0.0, 0.0])),
            Err(AggregateError::UnassignedPosition { pos: 9, .. })
        ));
        let mut other = row(12, 'A', vec![0.0, 0.0]);
        other.chrom = "chr2".into();
        assert!(agg.push(&other).is_err());
        assert!(matches!(
            agg.push(&row(12, 'A', vec![0.0])),
            Err(AggregateError::WidthMismatch { expected: 2, found: 1, .. })
        ));
        assert_eq!(agg.num_positions(), 0);
    }

    proptest! {
        #[test]
        fn unit_windows_reproduce_positions(depths in proptest::collection::vec(0u32..500, 1..200)) {
            let len = depths.len() as u64;
            let iv = GenomicInterval::new("chr1", 1_000, 1_000 + len).unwrap();
            let rows: Vec<_> = depths
                .iter()
                .enumerate()
                .map(|(i, &d)| row(1_000 + i as u64, 'T', vec![d as f64, (d / 2) as f64]))
                .collect();

            let mut agg = WindowAggregator::new(make_windows(&iv, depths.len()), 2);
            agg.push_all(&rows).unwrap();
            prop_assert_eq!(agg.finish().unwrap(), rows);
        }

        #[test]
        fn window_mean_matches_sum_over_width(depths in proptest::collection::vec(0u32..500, 1..300), nwin in 1usize..20) {
            let len = depths.len() as u64;
            let iv = GenomicInterval::new("chr1", 0, len).unwrap();
            let windows = make_windows(&iv, nwin);

            let mut agg = WindowAggregator::new(windows.clone(), 1);
            for (i, &d) in depths.iter().enumerate() {
                agg.push(&row(i as u64, 'A', vec![d as f64])).unwrap();
            }
            let out = agg.finish().unwrap();
            prop_assert_eq!(out.len(), windows.len());

            for (w, r) in windows.iter().zip(out.iter()) {
                let sum: u32 = depths[w.start as usize..w.end as usize].iter().sum();
                let expected = sum as f64 / w.width() as f64;
                prop_assert!((r.values[0] - expected).abs() < 1e-9);
            }
        }
    }
}
