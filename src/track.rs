use crate::util::bam::BamSample;
use crate::window::GenomicInterval;
use std::io::{self, Write};

/// Count columns carried for every sample, in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Depth,
    A,
    C,
    G,
    T,
    N,
    Total,
}

pub const NUM_METRICS: usize = 7;

impl Metric {
    pub const ALL: [Metric; NUM_METRICS] = [
        Metric::Depth,
        Metric::A,
        Metric::C,
        Metric::G,
        Metric::T,
        Metric::N,
        Metric::Total,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Depth => "depth",
            Metric::A => "A",
            Metric::C => "C",
            Metric::G => "G",
            Metric::T => "T",
            Metric::N => "N",
            Metric::Total => "total",
        }
    }

    fn offset(&self) -> usize {
        Metric::ALL
            .iter()
            .position(|m| m == self)
            .unwrap_or_default()
    }
}

///
/// One row of a coverage track. A row covers either a single
/// position (pileup) or a window (aggregated). `values` are laid out
/// metric by metric: all samples' depth, then all samples' A, ...
///
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageRow {
    pub chrom: Box<str>,
    pub start: u64,
    pub end: u64,
    pub ref_base: char,
    pub values: Vec<f64>,
}

impl CoverageRow {
    /// All-zero position row used when the pileup tool reports nothing
    /// for a whole region
    pub fn dummy(interval: &GenomicInterval, nsamples: usize) -> Self {
        CoverageRow {
            chrom: interval.chrom.clone(),
            start: interval.start,
            end: interval.start + 1,
            ref_base: 'N',
            values: vec![0_f64; NUM_METRICS * nsamples],
        }
    }

    pub fn nsamples(&self) -> usize {
        self.values.len() / NUM_METRICS
    }

    pub fn value(&self, metric: Metric, sample: usize) -> Option<f64> {
        let nn = self.nsamples();
        if sample >= nn {
            return None;
        }
        self.values.get(metric.offset() * nn + sample).copied()
    }
}

/// Header line of a track file
pub fn write_header<W: Write + ?Sized>(out: &mut W, samples: &[BamSample]) -> io::Result<()> {
    out.write_all(b"#chrom\tstart\tend\tref\tname\tscore")?;
    for m in Metric::ALL {
        for s in samples {
            write!(out, "\t{}.{}", s.name, m.label())?;
        }
    }
    out.write_all(b"\n")
}

/// BED-like row: chrom, start, end, ref, `.`, `.`, values...
pub fn write_row<W: Write + ?Sized>(out: &mut W, row: &CoverageRow) -> io::Result<()> {
    write!(
        out,
        "{}\t{}\t{}\t{}\t.\t.",
        row.chrom, row.start, row.end, row.ref_base
    )?;
    for v in row.values.iter() {
        write!(out, "\t{}", v)?;
    }
    out.write_all(b"\n")
}
