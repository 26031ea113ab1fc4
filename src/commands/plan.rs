use crate::utils::{discover_jobs, BatchRunner, ConverterConfig};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Prints the commands `build` would run without spawning anything.
pub fn plan<W: Write>(dir: &Path, config: &ConverterConfig, out: &mut W) -> Result<(), Box<dyn std::error::Error>> {
    let jobs = discover_jobs(dir, config)?;
    let runner = BatchRunner::new(dir, config);

    for job in jobs.values() {
        runner.announce(job, out)?;
    }

    info!(planned = jobs.len(), "dry run, nothing executed");
    Ok(())
}
