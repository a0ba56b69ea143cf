use crate::aggregate::WindowAggregator;
use crate::normalize::LibrarySizes;
use crate::pileup::record::PileupParser;
use crate::track::{self, CoverageRow, NUM_METRICS};
use crate::util::bam::BamSample;
use crate::window::{make_windows, GenomicInterval};

use anyhow::{self, Context};
use std::io::{BufRead, Write};

/// Aggregated coverage of one region
#[derive(Debug, Clone, PartialEq)]
pub struct RegionTrack {
    pub rows: Vec<CoverageRow>,
    /// pileup positions seen
    pub npositions: u64,
    /// true if the region had no pileup output and a zero row stood in
    pub dummy: bool,
}

///
/// Pileup text to windowed coverage for one region at a time:
/// parse each line, optionally rescale to reads per million, and fold
/// it into its window.
///
pub struct RegionPipeline<'a> {
    samples: &'a [BamSample],
    nwinds: usize,
    lib_sizes: Option<&'a LibrarySizes>,
    skip_empty: bool,
}

impl<'a> RegionPipeline<'a> {
    pub fn new(samples: &'a [BamSample], nwinds: usize) -> Self {
        RegionPipeline {
            samples,
            nwinds,
            lib_sizes: None,
            skip_empty: false,
        }
    }

    pub fn with_library_sizes(mut self, lib_sizes: &'a LibrarySizes) -> Self {
        self.lib_sizes = Some(lib_sizes);
        self
    }

    pub fn skip_empty_windows(mut self, skip: bool) -> Self {
        self.skip_empty = skip;
        self
    }

    fn ncol(&self) -> usize {
        NUM_METRICS * self.samples.len()
    }

    /// Run over one region.
    ///
    /// * `region` - interval the pileup was restricted to
    /// * `input` - pileup lines
    /// * `raw_sink` - receives every per-position row, if given
    pub fn run(
        &self,
        region: &GenomicInterval,
        input: &mut dyn BufRead,
        mut raw_sink: Option<&mut dyn Write>,
    ) -> anyhow::Result<RegionTrack> {
        let mut parser = PileupParser::new(self.samples.iter().map(|s| s.name.clone()).collect());

        let windows = make_windows(region, self.nwinds);
        let mut agg = WindowAggregator::new(windows, self.ncol()).skip_empty(self.skip_empty);

        let mut line = String::new();
        loop {
            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            if line.trim().is_empty() {
                continue;
            }

            let mut row = parser.parse(&line)?.into_row();

            if let Some(libs) = self.lib_sizes {
                libs.normalize(&mut row)
                    .with_context(|| format!("line {}", parser.lines_read()))?;
            }

            if let Some(sink) = raw_sink.as_deref_mut() {
                track::write_row(sink, &row)?;
            }

            agg.push(&row)
                .with_context(|| format!("line {}", parser.lines_read()))?;
        }

        let npositions = agg.num_positions();

        if npositions > 0 {
            return Ok(RegionTrack {
                rows: agg.finish()?,
                npositions,
                dummy: false,
            });
        }

        // Nothing came out of the pileup: stand in a single zero row
        // so the region still shows up downstream.
        log::warn!("no pileup output for {}; using an empty row", region);

        let row = CoverageRow::dummy(region, self.samples.len());
        if let Some(sink) = raw_sink.as_deref_mut() {
            track::write_row(sink, &row)?;
        }

        let span = GenomicInterval::new(&region.chrom, row.start, row.end)?;
        let mut agg = WindowAggregator::new(make_windows(&span, 1), self.ncol());
        agg.push(&row)?;

        Ok(RegionTrack {
            rows: agg.finish()?,
            npositions: 0,
            dummy: true,
        })
    }
}
