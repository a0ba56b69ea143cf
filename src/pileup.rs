pub mod mpileup;
pub mod record;
pub mod tally;

use thiserror::Error;

/// Problems found while reading pileup text
#[derive(Debug, Error, PartialEq)]
pub enum PileupError {
    /// Column count does not match `3 + 3 * samples`
    #[error("malformed pileup record at line {line}: expected {expected} columns, found {found}")]
    MalformedRecord {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A numeric column could not be parsed
    #[error("invalid {field} `{value}` at line {line} (sample: {sample})")]
    InvalidField {
        line: usize,
        field: &'static str,
        value: Box<str>,
        sample: Box<str>,
    },

    /// Reference base has no bucket to receive `.`/`,` matches
    #[error("reference base `{base}` is not one of A/C/G/T/N at line {line} (sample: {sample})")]
    UndefinedFoldTarget {
        line: usize,
        sample: Box<str>,
        base: Box<str>,
    },
}

/// Reference base outside `A/C/G/T/N`, before the parser adds where it
/// was found
#[derive(Debug, Error, PartialEq)]
#[error("reference base `{base}` is not one of A/C/G/T/N")]
pub struct UnknownReference {
    pub base: Box<str>,
}
