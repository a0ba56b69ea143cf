use anyhow::{self, Context};

use rust_htslib::bgzf;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

///
/// Open a (possibly bgzipped) text file for line-by-line streaming
///
pub fn open_buf_reader(input_file: &str) -> anyhow::Result<Box<dyn BufRead>> {
    let buf: Box<dyn BufRead> = match Path::new(input_file).extension().and_then(|x| x.to_str()) {
        Some("gz") | Some("bgz") => {
            let _file = bgzf::Reader::from_path(input_file)
                .with_context(|| format!("failed to open bgzf file: {}", input_file))?;
            Box::new(BufReader::new(_file))
        }

        _ => {
            let _file = File::open(input_file)
                .with_context(|| format!("failed to open file: {}", input_file))?;
            Box::new(BufReader::new(_file))
        }
    };
    Ok(buf)
}

///
/// Create a buffered writer, truncating an existing file
///
pub fn create_buf_writer<P: AsRef<Path>>(output_file: P) -> anyhow::Result<Box<dyn Write>> {
    let path = output_file.as_ref();
    let _file = File::create(path)
        .with_context(|| format!("failed to create file: {}", path.display()))?;
    Ok(Box::new(BufWriter::new(_file)))
}
