use crate::utils::{discover_jobs, BatchRunner, BatchSummary, ConverterConfig};
use std::io::Write;
use std::path::Path;
use tracing::info;

pub fn build<W: Write>(dir: &Path, config: &ConverterConfig, out: &mut W) -> Result<BatchSummary, Box<dyn std::error::Error>> {
    let jobs = discover_jobs(dir, config)?;
    if jobs.is_empty() {
        info!(dir = %dir.display(), extension = %config.source_extension, "no matching files");
        return Ok(BatchSummary::default());
    }

    Ok(BatchRunner::new(dir, config).run(&jobs, out)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_build_without_matches_prints_nothing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("readme.txt"), "plain\n").unwrap();
        let mut out = Vec::new();

        let summary = build(dir.path(), &ConverterConfig::default(), &mut out).unwrap();

        assert_eq!(summary, BatchSummary::default());
        assert!(out.is_empty());
    }

    #[test]
    fn test_build_rejects_missing_directory() {
        let dir = TempDir::new().unwrap();
        let mut out = Vec::new();

        assert!(build(&dir.path().join("missing"), &ConverterConfig::default(), &mut out).is_err());
        assert!(out.is_empty());
    }
}
