use anyhow::{self, Context};
use std::path::PathBuf;
use std::process::Command;

/// Everything a plotting backend needs to draw one region
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    pub name: Box<str>,
    /// aggregated track file
    pub track: PathBuf,
    /// figure to produce
    pub out: PathBuf,
    pub ylab: &'static str,
    pub xlim: (u64, u64),
}

impl RenderJob {
    pub fn ylab_for(rpm: bool) -> &'static str {
        if rpm {
            "Reads per million"
        } else {
            "Read count"
        }
    }
}

pub trait Renderer {
    fn render(&self, job: &RenderJob) -> anyhow::Result<()>;
}

///
/// Hands a [`RenderJob`] to an external program as named arguments:
///
/// ```text
/// <program> --track <file> --out <file> --name <label> --ylab <text> --xlim <start> <end>
/// ```
pub struct CommandRenderer {
    program: Box<str>,
}

impl CommandRenderer {
    pub fn new(program: &str) -> Self {
        CommandRenderer {
            program: program.into(),
        }
    }

    pub fn command(&self, job: &RenderJob) -> Command {
        let mut cmd = Command::new(self.program.as_ref());
        cmd.arg("--track")
            .arg(&job.track)
            .arg("--out")
            .arg(&job.out)
            .arg("--name")
            .arg(job.name.as_ref())
            .arg("--ylab")
            .arg(job.ylab)
            .arg("--xlim")
            .arg(job.xlim.0.to_string())
            .arg(job.xlim.1.to_string());
        cmd
    }
}

impl Renderer for CommandRenderer {
    fn render(&self, job: &RenderJob) -> anyhow::Result<()> {
        let output = self
            .command(job)
            .output()
            .with_context(|| format!("failed to run renderer {}", self.program))?;

        log::debug!("{}", String::from_utf8_lossy(&output.stdout).trim_end());

        if !output.status.success() {
            anyhow::bail!(
                "renderer {} failed on {} ({}): {}",
                self.program,
                job.name,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }
}
