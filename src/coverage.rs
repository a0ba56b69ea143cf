pub mod pipeline;

use crate::normalize::LibrarySizes;
use crate::pileup::mpileup::Mpileup;
use crate::render::{CommandRenderer, RenderJob, Renderer};
use crate::track;
use crate::util::bam::{library_sizes, BamSample};
use crate::util::file::{create_buf_writer, open_buf_reader};
use crate::util::misc::{make_samples, unique_in_order};
use crate::window::GenomicInterval;

use anyhow::{self, Context};
use bio::io::bed;
use clap::Args;
use std::io::Write;
use std::path::Path;

use pipeline::RegionPipeline;

#[derive(Args, Debug)]
pub struct CoverageArgs {
    /// BAM files, sorted and indexed (repeats are dropped)
    #[arg(short = 'i', long, required = true, num_args = 1..)]
    pub ibam: Vec<Box<str>>,

    /// BED file with the regions to process
    #[arg(short, long)]
    pub bed: Box<str>,

    /// reference FASTA (reference bases in the pileup)
    #[arg(short, long)]
    pub fasta: Option<Box<str>>,

    /// samtools executable
    #[arg(long, default_value = "samtools")]
    pub samtools: Box<str>,

    /// output directory
    #[arg(short = 'd', long, default_value = ".")]
    pub outdir: Box<str>,

    /// normalize counts to reads per million
    #[arg(long)]
    pub rpm: bool,

    /// maximum number of windows per region
    #[arg(short = 'w', long, default_value_t = 1000)]
    pub nwinds: usize,

    /// widest region (bp) shown at base resolution; raises --nwinds
    /// when larger
    #[arg(short = 'm', long, default_value_t = 100)]
    pub maxres: usize,

    /// sample names (default: BAM file names), recycled
    #[arg(long, num_args = 1..)]
    pub names: Vec<Box<str>>,

    /// drop windows without pileup positions instead of failing
    #[arg(long)]
    pub skip_empty_windows: bool,

    /// also write per-position rows (<region>.mpileup.bed.txt)
    #[arg(long)]
    pub keep_pileup: bool,

    /// program drawing each region's track
    #[arg(long)]
    pub renderer: Option<Box<str>>,
}

impl CoverageArgs {
    /// `--nwinds` never goes below `--maxres`
    pub fn num_windows(&self) -> usize {
        self.nwinds.max(self.maxres)
    }
}

/// Read the regions of a (possibly bgzipped) BED file
pub fn read_regions(bed_file: &str) -> anyhow::Result<Vec<GenomicInterval>> {
    let mut reader = bed::Reader::new(open_buf_reader(bed_file)?);
    let mut ret = vec![];
    for (i, rec) in reader.records().enumerate() {
        let rec = rec.with_context(|| format!("{}: bad BED record {}", bed_file, i + 1))?;
        let interval = GenomicInterval::new(rec.chrom(), rec.start(), rec.end())
            .with_context(|| format!("{}: record {}", bed_file, i + 1))?;
        ret.push(interval.with_name(rec.name().unwrap_or("")));
    }
    Ok(ret)
}

pub fn run_coverage(args: &CoverageArgs) -> anyhow::Result<()> {
    let bams = unique_in_order(&args.ibam);
    let samples: Vec<BamSample> = make_samples(&bams, &args.names);

    log::info!(
        "Files to analyze ({} found): {}",
        samples.len(),
        bams.join(", ")
    );

    let outdir = Path::new(args.outdir.as_ref());
    std::fs::create_dir_all(outdir)
        .with_context(|| format!("failed to create {}", outdir.display()))?;

    let lib_sizes = if args.rpm {
        let sizes = library_sizes(&samples)?;
        log::info!(
            "Library sizes: {}",
            sizes
                .iter()
                .map(|x| x.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Some(LibrarySizes::new(sizes))
    } else {
        None
    };

    let mut pipe =
        RegionPipeline::new(&samples, args.num_windows()).skip_empty_windows(args.skip_empty_windows);
    if let Some(libs) = lib_sizes.as_ref() {
        pipe = pipe.with_library_sizes(libs);
    }

    let mpileup = Mpileup::new(&args.samtools, args.fasta.as_deref(), &samples);
    let renderer = args.renderer.as_deref().map(CommandRenderer::new);
    let regions = read_regions(&args.bed)?;

    for region in regions.iter() {
        let label = region.label();
        log::info!("Processing: {} ({})", region, label);

        // raw rows go to a `.part` file, renamed once the region is done
        let raw_file = outdir.join(format!("{}.mpileup.bed.txt", label));
        let raw_part = outdir.join(format!("{}.mpileup.bed.txt.part", label));
        let mut raw_sink = match args.keep_pileup {
            true => Some(create_buf_writer(&raw_part)?),
            false => None,
        };

        let result = mpileup
            .stream(region, |input| {
                let sink = raw_sink.as_mut().map(|w| &mut **w as &mut dyn Write);
                pipe.run(region, input, sink)
            })
            .with_context(|| format!("failed to process region {}", label));

        let result = match (result, raw_sink) {
            (Ok(x), Some(mut sink)) => {
                sink.flush()?;
                drop(sink);
                std::fs::rename(&raw_part, &raw_file)
                    .with_context(|| format!("failed to move {}", raw_part.display()))?;
                log::info!("Wrote {}", raw_file.display());
                x
            }
            (Ok(x), None) => x,
            (Err(e), sink) => {
                if sink.is_some() {
                    drop(sink);
                    if let Err(rm) = std::fs::remove_file(&raw_part) {
                        log::warn!("could not remove {}: {}", raw_part.display(), rm);
                    }
                }
                return Err(e);
            }
        };

        log::debug!(
            "{}: {} positions into {} rows",
            label,
            result.npositions,
            result.rows.len()
        );

        let track_file = outdir.join(format!("{}.grp.bed.txt", label));
        write_track(&track_file, &samples, &result.rows)?;
        log::info!("Wrote {}", track_file.display());

        if let Some(renderer) = renderer.as_ref() {
            let job = RenderJob {
                name: label.clone(),
                track: track_file,
                out: outdir.join(format!("{}.pdf", label)),
                ylab: RenderJob::ylab_for(args.rpm),
                xlim: (region.start, region.end),
            };
            renderer.render(&job)?;
        }
    }

    Ok(())
}

/// Header plus one line per window. The file is only created once the
/// region's rows are complete.
pub fn write_track(
    track_file: &Path,
    samples: &[BamSample],
    rows: &[track::CoverageRow],
) -> anyhow::Result<()> {
    let mut out = create_buf_writer(track_file)?;
    track::write_header(&mut out, samples)?;
    for row in rows {
        track::write_row(&mut out, row)?;
    }
    out.flush()?;
    Ok(())
}
