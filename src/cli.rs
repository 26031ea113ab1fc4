use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "docbatch",
    about = "📄 Batch-convert every Markdown file in a directory to HTML with an external converter.",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML file with converter settings
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the converter on every matching file
    Build {
        #[arg(value_name = "DIR", default_value = ".")]
        dir: PathBuf,
        #[command(flatten)]
        converter: ConverterArgs,
    },
    /// Print the commands `build` would run
    Plan {
        #[arg(value_name = "DIR", default_value = ".")]
        dir: PathBuf,
        #[command(flatten)]
        converter: ConverterArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ConverterArgs {
    /// Converter program [default: kramdown]
    #[arg(long, value_name = "PROGRAM")]
    pub converter: Option<String>,

    /// Template passed as `--template` [default: basic.erb]
    #[arg(long, value_name = "FILE", conflicts_with = "no_template")]
    pub template: Option<String>,

    #[arg(long)]
    pub no_template: bool,

    /// Source file extension [default: md]
    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Output file extension [default: html]
    #[arg(long, value_name = "EXT")]
    pub output_extension: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::try_parse_from(["docbatch"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_global_options_without_subcommand() {
        let cli = Cli::try_parse_from(["docbatch", "--config", "docbatch.toml", "-v"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("docbatch.toml")));
    }

    #[test]
    fn test_build_defaults_to_current_dir() {
        let cli = Cli::try_parse_from(["docbatch", "build"]).unwrap();
        match cli.command {
            Some(Commands::Build { dir, converter }) => {
                assert_eq!(dir, PathBuf::from("."));
                assert!(converter.converter.is_none());
                assert!(!converter.no_template);
            }
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn test_plan_with_options() {
        let cli = Cli::try_parse_from([
            "docbatch", "plan", "docs", "--converter", "pandoc", "--no-template", "--extension", "markdown", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Plan { dir, converter }) => {
                assert_eq!(dir, PathBuf::from("docs"));
                assert_eq!(converter.converter.as_deref(), Some("pandoc"));
                assert!(converter.no_template);
                assert_eq!(converter.extension.as_deref(), Some("markdown"));
            }
            _ => panic!("expected plan"),
        }
    }

    #[test]
    fn test_template_conflicts_with_no_template() {
        assert!(Cli::try_parse_from(["docbatch", "build", "--template", "a.erb", "--no-template"]).is_err());
    }
}
