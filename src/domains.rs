pub mod summary;

use crate::util::file::{create_buf_writer, open_buf_reader};
use summary::{Domain, DomainSummary};

use anyhow::{self, Context};
use clap::Args;
use std::io::{BufRead, Write};

#[derive(Args, Debug)]
pub struct DomainArgs {
    /// rseg/rseg-diff domains file (*.domains.bed)
    pub input: Box<str>,

    /// enriched domains output (default: *.enriched.bed next to the input)
    #[arg(short, long)]
    pub output: Option<Box<str>>,
}

/// `x.domains.bed` -> `x.enriched.bed`; other names get
/// `.enriched.bed` appended
pub fn enriched_file_name(input: &str) -> String {
    match input.strip_suffix("domains.bed") {
        Some(stem) => format!("{}enriched.bed", stem),
        None => format!("{}.enriched.bed", input),
    }
}

/// Copy enriched domains from `input` to `output` and summarize the
/// whole file in one pass
pub fn filter_enriched(input: &mut dyn BufRead, output: &mut dyn Write) -> anyhow::Result<DomainSummary> {
    let mut summary = DomainSummary::new();

    for (i, line) in input.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let domain = Domain::parse(line, i + 1)?;
        if domain.is_enriched() {
            output.write_all(line.as_bytes())?;
            output.write_all(b"\n")?;
        }
        summary.push(&domain);
    }

    Ok(summary)
}

pub fn run_domains(args: &DomainArgs) -> anyhow::Result<()> {
    let output_file = match &args.output {
        Some(x) => x.to_string(),
        None => enriched_file_name(&args.input),
    };

    let mut input = open_buf_reader(&args.input)?;
    let mut output = create_buf_writer(&output_file)?;

    let summary = filter_enriched(&mut input, &mut output)
        .with_context(|| format!("failed to parse {}", args.input))?;
    output.flush()?;

    log::info!(
        "{} enriched domains written to {}",
        summary.num_enriched(),
        output_file
    );

    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();
    writeln!(stdout, "{}", summary.report(&args.input))?;
    Ok(())
}
