//! Windowed coverage tracks from samtools mpileup output, and a
//! summary filter for rseg domain calls.

pub mod aggregate;
pub mod coverage;
pub mod domains;
pub mod normalize;
pub mod pileup;
pub mod render;
pub mod track;
pub mod util;
pub mod window;
