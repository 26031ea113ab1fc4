use clap::Parser;
use std::io::{self, Write};
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod utils;

use cli::{Cli, Commands, ConverterArgs};
use utils::ConverterConfig;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    dispatch(cli, Path::new("."), &mut out)
}

/// Without a subcommand the batch runs in `default_dir`, like `build .`.
fn dispatch<W: Write>(cli: Cli, default_dir: &Path, out: &mut W) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = cli.config.as_deref();

    match &cli.command {
        Some(Commands::Build { dir, converter }) => {
            commands::build(dir, &ConverterConfig::load(config_path, converter)?, out)?;
            Ok(())
        }
        Some(Commands::Plan { dir, converter }) => {
            commands::plan(dir, &ConverterConfig::load(config_path, converter)?, out)
        }
        None => {
            let config = ConverterConfig::load(config_path, &ConverterArgs::default())?;
            commands::build(default_dir, &config, out)?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn docs_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("intro.md"), "# Intro\n").unwrap();
        fs::write(dir.path().join("notes.md"), "* note\n").unwrap();
        fs::write(dir.path().join("readme.txt"), "plain\n").unwrap();
        dir
    }

    #[cfg(unix)]
    #[test]
    fn test_no_subcommand_builds_default_dir() {
        let dir = docs_dir();
        let config_dir = TempDir::new().unwrap();
        let config_path = config_dir.path().join("docbatch.toml");
        fs::write(&config_path, "program = \"cat\"\ntemplate = \"\"\n").unwrap();

        let cli = Cli::try_parse_from(["docbatch", "--config", config_path.to_str().unwrap()]).unwrap();
        let mut out = Vec::new();
        dispatch(cli, dir.path(), &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            ">>> cat intro.md > intro.html\n>>> cat notes.md > notes.html\n"
        );
        assert_eq!(fs::read_to_string(dir.path().join("intro.html")).unwrap(), "# Intro\n");
        assert_eq!(fs::read_to_string(dir.path().join("notes.html")).unwrap(), "* note\n");
        assert!(!dir.path().join("readme.html").exists());
    }

    #[test]
    fn test_plan_subcommand_ignores_default_dir() {
        let dir = docs_dir();
        let elsewhere = TempDir::new().unwrap();

        let cli = Cli::try_parse_from(["docbatch", "plan", dir.path().to_str().unwrap()]).unwrap();
        let mut out = Vec::new();
        dispatch(cli, elsewhere.path(), &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);
        assert!(!dir.path().join("intro.html").exists());
    }

    #[test]
    fn test_matching_extensions_fail_before_any_output() {
        let dir = docs_dir();
        let cli = Cli::try_parse_from(["docbatch", "build", dir.path().to_str().unwrap(), "--extension", "html"]).unwrap();
        let mut out = Vec::new();

        assert!(dispatch(cli, dir.path(), &mut out).is_err());
        assert!(out.is_empty());
    }
}
