use super::tally::tally_bases;
use super::PileupError;
use crate::track::{CoverageRow, Metric, NUM_METRICS};
use crate::util::dna::{Dna, DnaBaseCount};

const SEP: char = '\t';
const NUM_SITE_FIELDS: usize = 3;
const NUM_SAMPLE_FIELDS: usize = 3;

/// Depth and base calls of one sample at one position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SampleCall {
    pub depth: u32,
    pub bases: DnaBaseCount,
}

impl SampleCall {
    fn metric(&self, m: Metric) -> u32 {
        match m {
            Metric::Depth => self.depth,
            Metric::A => self.bases.get(Dna::A),
            Metric::C => self.bases.get(Dna::C),
            Metric::G => self.bases.get(Dna::G),
            Metric::T => self.bases.get(Dna::T),
            Metric::N => self.bases.get(Dna::N),
            Metric::Total => self.bases.total(),
        }
    }
}

/// One mpileup line. `calls` follow the sample order of the parser
/// that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct PileupRecord {
    pub chrom: Box<str>,
    /// 1-based
    pub pos: u64,
    pub ref_base: char,
    pub calls: Vec<SampleCall>,
}

impl PileupRecord {
    /// Flatten into a 0-based, single-position track row
    pub fn into_row(self) -> CoverageRow {
        let mut values = Vec::with_capacity(NUM_METRICS * self.calls.len());
        for m in Metric::ALL {
            values.extend(self.calls.iter().map(|c| c.metric(m) as f64));
        }
        CoverageRow {
            chrom: self.chrom,
            start: self.pos - 1,
            end: self.pos,
            ref_base: self.ref_base,
            values,
        }
    }
}

///
/// Parse mpileup lines against a fixed sample order. Keeps a line
/// counter so that errors point back into the stream.
///
pub struct PileupParser {
    samples: Vec<Box<str>>,
    line: usize,
}

impl PileupParser {
    /// * `samples` - sample labels in the same order as the BAM files
    ///   handed to the pileup tool
    pub fn new(samples: Vec<Box<str>>) -> Self {
        PileupParser { samples, line: 0 }
    }

    pub fn nsamples(&self) -> usize {
        self.samples.len()
    }

    /// Number of lines seen so far
    pub fn lines_read(&self) -> usize {
        self.line
    }

    pub fn parse(&mut self, line: &str) -> Result<PileupRecord, PileupError> {
        self.line += 1;

        let words: Vec<&str> = line.trim_end_matches(['\n', '\r']).split(SEP).collect();
        let expected = NUM_SITE_FIELDS + NUM_SAMPLE_FIELDS * self.samples.len();

        if words.len() != expected {
            return Err(PileupError::MalformedRecord {
                line: self.line,
                expected,
                found: words.len(),
            });
        }

        let pos: u64 = match words[1].parse() {
            Ok(p) if p > 0 => p,
            _ => return Err(self.invalid("position", words[1], ".")),
        };

        let ref_base = words[2];
        let mut calls = Vec::with_capacity(self.samples.len());

        for (s, block) in words[NUM_SITE_FIELDS..]
            .chunks_exact(NUM_SAMPLE_FIELDS)
            .enumerate()
        {
            // [depth, bases, qualities]
            let depth: u32 = block[0]
                .parse()
                .map_err(|_| self.invalid("depth", block[0], &self.samples[s]))?;
            let bases = tally_bases(block[1], ref_base).map_err(|e| {
                PileupError::UndefinedFoldTarget {
                    line: self.line,
                    sample: self.samples[s].clone(),
                    base: e.base,
                }
            })?;
            calls.push(SampleCall { depth, bases });
        }

        Ok(PileupRecord {
            chrom: words[0].into(),
            pos,
            ref_base: ref_base.chars().next().unwrap_or('N').to_ascii_uppercase(),
            calls,
        })
    }

    fn invalid(&self, field: &'static str, value: &str, sample: &str) -> PileupError {
        PileupError::InvalidField {
            line: self.line,
            field,
            value: value.into(),
            sample: sample.into(),
        }
    }
}
