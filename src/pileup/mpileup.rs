use crate::util::bam::BamSample;
use crate::window::GenomicInterval;

use anyhow::{self, Context};
use std::io::{BufRead, BufReader, Read};
use std::process::{Command, Stdio};

/// Maximum per-file depth handed to `samtools mpileup -d`
const MAX_DEPTH: u64 = 10_000_000;

///
/// `samtools mpileup` over a fixed list of BAM files. The output of
/// each region is streamed, never collected in memory.
///
pub struct Mpileup {
    program: Box<str>,
    fasta: Option<Box<str>>,
    bams: Vec<Box<str>>,
}

impl Mpileup {
    /// * `program` - samtools executable (path or name on `PATH`)
    /// * `fasta` - reference for the 3rd column (otherwise `N`)
    pub fn new(program: &str, fasta: Option<&str>, samples: &[BamSample]) -> Self {
        Mpileup {
            program: program.into(),
            fasta: fasta.map(|x| x.into()),
            bams: samples.iter().map(|s| s.path.clone()).collect(),
        }
    }

    /// Every position of the region, zero-depth ones included,
    /// without BAQ and base-quality filtering
    pub fn command(&self, region: &GenomicInterval) -> Command {
        let mut cmd = Command::new(self.program.as_ref());
        cmd.arg("mpileup")
            .arg("-a")
            .arg("-B")
            .arg("-Q")
            .arg("0")
            .arg("-d")
            .arg(MAX_DEPTH.to_string());
        if let Some(fasta) = &self.fasta {
            cmd.arg("-f").arg(fasta.as_ref());
        }
        cmd.arg("-r").arg(region.to_region_string());
        cmd.args(self.bams.iter().map(|b| b.as_ref()));
        cmd
    }

    /// Run the pileup over `region` and feed its stdout to `visit`.
    /// The child is killed if `visit` fails; a non-zero exit status
    /// is reported with the tool's stderr, which is collected on its
    /// own thread so a noisy child cannot stall on a full pipe.
    pub fn stream<T, F>(&self, region: &GenomicInterval, visit: F) -> anyhow::Result<T>
    where
        F: FnOnce(&mut dyn BufRead) -> anyhow::Result<T>,
    {
        let mut cmd = self.command(region);
        log::debug!("{:?}", cmd);

        let mut child = cmd
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to run {}", self.program))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow::anyhow!("no stdout from {}", self.program))?;

        let stderr_pipe = child.stderr.take();
        let stderr_thread = std::thread::spawn(move || {
            let mut buf = String::new();
            if let Some(mut err) = stderr_pipe {
                let _ = err.read_to_string(&mut buf);
            }
            buf
        });

        let mut reader = BufReader::new(stdout);

        let ret = match visit(&mut reader) {
            Ok(x) => x,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e);
            }
        };

        // drain whatever the visitor left behind before waiting
        std::io::copy(&mut reader, &mut std::io::sink())?;

        let status = child.wait()?;
        let stderr = stderr_thread.join().unwrap_or_default();
        if !status.success() {
            anyhow::bail!(
                "{} mpileup failed on {} ({}): {}",
                self.program,
                region,
                status,
                stderr.trim()
            );
        }
        Ok(ret)
    }
}
