use anyhow::{self, Context};
use rayon::prelude::*;
use rust_htslib::bam;
use std::path::Path;
use std::thread;

/// BAM file sample: input path plus the label used in track headers
///
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct BamSample {
    pub path: Box<str>,
    pub name: Box<str>,
}

impl BamSample {
    /// Label defaults to the file name with directories and the
    /// `.bam` extension stripped
    pub fn from_path(path: &str) -> Self {
        let name = Path::new(path)
            .file_name()
            .and_then(|x| x.to_str())
            .map(|x| x.strip_suffix(".bam").unwrap_or(x))
            .unwrap_or(path);
        BamSample {
            path: path.into(),
            name: name.into(),
        }
    }

    pub fn with_name(path: &str, name: &str) -> Self {
        BamSample {
            path: path.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for BamSample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Check random access BAM index, building `<bam>.bai` when missing
///
pub fn check_bam_index(
    bam_file_name: &str,
    idx_file_name: Option<&str>,
) -> anyhow::Result<Box<str>> {
    let idx_file = match idx_file_name {
        Some(x) => String::from(x),
        None => format!("{}.bai", bam_file_name),
    };

    if Path::new(&idx_file).exists() {
        return Ok(idx_file.into_boxed_str());
    }

    let ncore = thread::available_parallelism()
        .map(|x| x.get())
        .unwrap_or(1);

    log::info!(
        "Creating a new index file {} using {} cores",
        &idx_file,
        &ncore
    );

    bam::index::build(
        bam_file_name,
        Some(&idx_file),
        bam::index::Type::Bai,
        ncore as u32,
    )
    .with_context(|| format!("failed to build index for: {}", bam_file_name))?;

    Ok(idx_file.into_boxed_str())
}

/// Total number of mapped reads according to the index statistics
/// (the sum of the `mapped` column of `samtools idxstats`)
///
pub fn library_size(bam_file_name: &str) -> anyhow::Result<u64> {
    let idx_file = check_bam_index(bam_file_name, None)?;

    let mut reader = bam::IndexedReader::from_path_and_index(bam_file_name, &*idx_file)
        .with_context(|| format!("failed to create indexed reader: {}", bam_file_name))?;

    // (tid, length, mapped, unmapped)
    let stats = reader
        .index_stats()
        .with_context(|| format!("failed to read index statistics: {}", bam_file_name))?;

    Ok(stats.iter().map(|(_, _, mapped, _)| *mapped).sum())
}

/// Library sizes of all the samples, in the same order
///
pub fn library_sizes(samples: &[BamSample]) -> anyhow::Result<Vec<u64>> {
    samples
        .par_iter()
        .map(|s| library_size(s.path.as_ref()))
        .collect()
}
