use crate::cli::ConverterArgs;
use crate::utils::discovery::BatchError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Settings for the external converter. Every field may be left out of the
/// config file; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterConfig {
    pub program: String,
    /// Passed as `--template <file>`. An empty string disables it.
    pub template: Option<String>,
    pub source_extension: String,
    pub target_extension: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program: "kramdown".to_string(),
            template: Some("basic.erb".to_string()),
            source_extension: "md".to_string(),
            target_extension: "html".to_string(),
        }
    }
}

impl ConverterConfig {
    pub fn from_toml(content: &str) -> Result<Self, BatchError> {
        let config: Self = toml::from_str(content)?;
        config.normalized()
    }

    pub fn from_file(path: &Path) -> Result<Self, BatchError> {
        let content = fs::read_to_string(path)?;
        debug!(path = %path.display(), "loaded converter config");
        Self::from_toml(&content)
    }

    /// Resolves defaults, then the optional config file, then command-line flags.
    pub fn load(config_path: Option<&Path>, args: &ConverterArgs) -> Result<Self, BatchError> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(program) = &args.converter {
            config.program = program.clone();
        }
        if args.no_template {
            config.template = None;
        } else if let Some(template) = &args.template {
            config.template = Some(template.clone());
        }
        if let Some(extension) = &args.extension {
            config.source_extension = extension.clone();
        }
        if let Some(extension) = &args.output_extension {
            config.target_extension = extension.clone();
        }

        config.normalized()
    }

    fn normalized(mut self) -> Result<Self, BatchError> {
        self.source_extension = normalize_extension(&self.source_extension)?;
        self.target_extension = normalize_extension(&self.target_extension)?;
        // Equal extensions would make every target its own source.
        if self.source_extension.eq_ignore_ascii_case(&self.target_extension) {
            return Err(BatchError::InvalidExtension(format!(
                "{} (same as the output extension)",
                self.target_extension
            )));
        }
        if self.template.as_deref().is_some_and(str::is_empty) {
            self.template = None;
        }
        Ok(self)
    }
}

fn normalize_extension(extension: &str) -> Result<String, BatchError> {
    let trimmed = extension.strip_prefix('.').unwrap_or(extension);
    if trimmed.is_empty() || trimmed.contains(['/', '\\']) {
        return Err(BatchError::InvalidExtension(extension.to_string()));
    }
    Ok(trimmed.to_string())
}
