use crate::utils::config::ConverterConfig;
use crate::utils::runner::ConversionCommand;
use globset::{GlobBuilder, GlobMatcher};
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid file pattern: {0}")]
    PatternError(#[from] globset::Error),
    #[error("Invalid config file: {0}")]
    ConfigError(#[from] toml::de::Error),
    #[error("Invalid extension: '{0}'")]
    InvalidExtension(String),
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

/// One source-file-to-target-file conversion attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub source_name: String,
    pub base_name: String,
    pub target_name: String,
}

impl ConversionJob {
    /// Derives base and target names by stripping the located `.{source_extension}`
    /// suffix. Returns `None` if the suffix is absent, nothing precedes it, or
    /// the target would name the source itself.
    pub fn from_source_name(source_name: &str, source_extension: &str, target_extension: &str) -> Option<Self> {
        let suffix = format!(".{}", source_extension);
        let base_name = source_name.strip_suffix(suffix.as_str())?;
        if base_name.is_empty() {
            return None;
        }

        let job = Self {
            source_name: source_name.to_string(),
            base_name: base_name.to_string(),
            target_name: format!("{}.{}", base_name, target_extension),
        };
        if job.overwrites_source() {
            return None;
        }
        Some(job)
    }

    pub fn overwrites_source(&self) -> bool {
        self.target_name.eq_ignore_ascii_case(&self.source_name)
    }

    pub fn command(&self, config: &ConverterConfig) -> ConversionCommand {
        let mut args = Vec::new();
        if let Some(template) = &config.template {
            args.push("--template".to_string());
            args.push(template.clone());
        }
        args.push(self.source_name.clone());

        ConversionCommand {
            program: config.program.clone(),
            args,
            target: self.target_name.clone(),
        }
    }
}

pub fn source_matcher(source_extension: &str) -> Result<GlobMatcher, BatchError> {
    let glob = GlobBuilder::new(&format!("*.{}", globset::escape(source_extension)))
        .literal_separator(true)
        .build()?;
    Ok(glob.compile_matcher())
}

/// Lists `dir` once (non-recursive) and returns one job per matching entry,
/// keyed by source name in byte-wise name order.
///
/// Entries are matched on name alone: hidden files, symlinks and directories
/// are selected the same way regular files are.
pub fn discover_jobs(dir: &Path, config: &ConverterConfig) -> Result<IndexMap<String, ConversionJob>, BatchError> {
    if !dir.is_dir() {
        return Err(BatchError::NotADirectory(dir.to_path_buf()));
    }

    let matcher = source_matcher(&config.source_extension)?;
    let mut names = Vec::new();

    for entry in fs::read_dir(dir)? {
        let file_name = entry?.file_name();
        let Some(name) = file_name.to_str() else {
            debug!(name = ?file_name, "skipping non UTF-8 file name");
            continue;
        };
        if matcher.is_match(name) {
            names.push(name.to_string());
        }
    }

    names.sort();

    let mut jobs = IndexMap::new();
    for name in names {
        match ConversionJob::from_source_name(&name, &config.source_extension, &config.target_extension) {
            Some(job) => {
                jobs.insert(name, job);
            }
            None => debug!(source = %name, "skipping file with no usable target name"),
        }
    }

    debug!(dir = %dir.display(), count = jobs.len(), "discovered conversion jobs");
    Ok(jobs)
}
