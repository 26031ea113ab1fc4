use crate::utils::config::ConverterConfig;
use crate::utils::discovery::{BatchError, ConversionJob};
use indexmap::IndexMap;
use std::borrow::Cow;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

pub const ANNOUNCE_PREFIX: &str = ">>> ";

/// A converter invocation as an explicit argument list. Standard output goes to `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionCommand {
    pub program: String,
    pub args: Vec<String>,
    pub target: String,
}

impl fmt::Display for ConversionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell_quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(arg))?;
        }
        write!(f, " > {}", shell_quote(&self.target))
    }
}

// Display only; the process never sees a shell string.
fn shell_quote(word: &str) -> Cow<'_, str> {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ',' | '/' | ':' | '=' | '@' | '+' | '%'));

    if safe {
        Cow::Borrowed(word)
    } else {
        Cow::Owned(format!("'{}'", word.replace('\'', "'\\''")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Converted,
    /// `code` is `None` when the converter was killed by a signal.
    Failed { code: Option<i32> },
    NotLaunched { reason: String },
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Converted)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub attempted: usize,
    pub converted: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn record(&mut self, outcome: &JobOutcome) {
        self.attempted += 1;
        if outcome.is_success() {
            self.converted += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// Runs conversion jobs one at a time inside `dir`.
pub struct BatchRunner<'a> {
    dir: &'a Path,
    config: &'a ConverterConfig,
}

impl<'a> BatchRunner<'a> {
    pub fn new(dir: &'a Path, config: &'a ConverterConfig) -> Self {
        Self { dir, config }
    }

    pub fn announce<W: Write>(&self, job: &ConversionJob, out: &mut W) -> Result<ConversionCommand, BatchError> {
        let command = job.command(self.config);
        writeln!(out, "{}{}", ANNOUNCE_PREFIX, command)?;
        Ok(command)
    }

    /// Announces and runs every job in order. A failing job is logged and
    /// counted; it never stops the rest of the batch. Only a failure to write
    /// an announcement is returned as an error.
    pub fn run<W: Write>(&self, jobs: &IndexMap<String, ConversionJob>, out: &mut W) -> Result<BatchSummary, BatchError> {
        let mut summary = BatchSummary::default();

        for job in jobs.values() {
            let command = self.announce(job, out)?;
            out.flush()?;

            let outcome = self.execute(job, &command);
            match &outcome {
                JobOutcome::Converted => {
                    debug!(source = %job.source_name, base = %job.base_name, target = %job.target_name, "converted");
                }
                JobOutcome::Failed { code } => {
                    warn!(source = %job.source_name, status = ?code, "converter exited unsuccessfully");
                }
                JobOutcome::NotLaunched { reason } => {
                    warn!(source = %job.source_name, %reason, "converter could not be launched");
                }
            }
            summary.record(&outcome);
        }

        info!(
            attempted = summary.attempted,
            converted = summary.converted,
            failed = summary.failed,
            "batch finished"
        );
        Ok(summary)
    }

    fn execute(&self, job: &ConversionJob, command: &ConversionCommand) -> JobOutcome {
        if job.overwrites_source() {
            return JobOutcome::NotLaunched {
                reason: format!("target {} is the source file", job.target_name),
            };
        }

        // Created before spawning so a missing converter still leaves an empty target.
        let target_path = self.dir.join(&command.target);
        let stdout = match File::create(&target_path) {
            Ok(file) => file,
            Err(e) => {
                return JobOutcome::NotLaunched {
                    reason: format!("cannot create {}: {}", target_path.display(), e),
                }
            }
        };

        let status = Command::new(&command.program)
            .args(&command.args)
            .current_dir(self.dir)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .status();

        match status {
            Ok(status) if status.success() => JobOutcome::Converted,
            Ok(status) => JobOutcome::Failed { code: status.code() },
            Err(e) => JobOutcome::NotLaunched {
                reason: format!("{}: {}", command.program, e),
            },
        }
    }
}
