use crate::track::CoverageRow;
use thiserror::Error;

const PER_MILLION: f64 = 1_000_000_f64;

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    /// The value layout does not line up with the libraries
    #[error("{values} values cannot be split over {libraries} library sizes")]
    SizeMismatch { values: usize, libraries: usize },

    #[error("library {index} has no mapped reads")]
    EmptyLibrary { index: usize },
}

/// Reads per million. Library sizes are recycled over `raw`, so for
/// metric-major rows the i-th value is divided by the size of sample
/// `i mod nsamples`.
///
/// ```text
/// raw      = [10,     500,     100,     500]
/// libsize  = [10000,  50000]
/// rpm      = [1000.0, 10000.0, 10000.0, 10000.0]
/// ```
pub fn rpm(raw: &[f64], lib_sizes: &[u64]) -> Result<Vec<f64>, NormalizeError> {
    let nlib = lib_sizes.len();
    if nlib == 0 || raw.len() % nlib != 0 {
        return Err(NormalizeError::SizeMismatch {
            values: raw.len(),
            libraries: nlib,
        });
    }

    if let Some(index) = lib_sizes.iter().position(|&s| s == 0) {
        return Err(NormalizeError::EmptyLibrary { index });
    }

    Ok(raw
        .iter()
        .zip(lib_sizes.iter().cycle())
        .map(|(&r, &s)| r / cast::f64(s) * PER_MILLION)
        .collect())
}

/// Library sizes of a run, one per sample
#[derive(Debug, Clone, PartialEq)]
pub struct LibrarySizes {
    sizes: Vec<u64>,
}

impl LibrarySizes {
    pub fn new(sizes: Vec<u64>) -> Self {
        LibrarySizes { sizes }
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.sizes
    }

    /// Rescale all values of a row in place
    pub fn normalize(&self, row: &mut CoverageRow) -> Result<(), NormalizeError> {
        row.values = rpm(&row.values, &self.sizes)?;
        Ok(())
    }
}
