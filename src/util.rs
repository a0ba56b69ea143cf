pub mod bam;
pub mod dna;
pub mod file;
pub mod misc;
