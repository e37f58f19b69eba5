//! Main CLI application structure

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use super::commands::{self, Request};
use super::output::{Output, OutputFormat};
use crate::storage::{Config, FeatureStore};

#[derive(Parser)]
#[command(name = "garden-feat")]
#[command(author, version, about = "Resolve feature selections for image builds")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Directory containing the feature descriptors
    #[arg(long, short = 'd', global = true, env = "GARDEN_FEAT_DIR")]
    pub feature_dir: Option<PathBuf>,

    /// Selected features (comma separated)
    #[arg(long, short = 'f', global = true, value_delimiter = ',')]
    pub features: Vec<String>,

    /// Features to skip while resolving (comma separated)
    #[arg(long, short = 'i', global = true, value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Configuration file
    #[arg(long, global = true, env = "GARDEN_FEAT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the canonical name of the selection
    Cname,

    /// Print every feature the selection resolves to
    Features,

    /// Print the platform and element features of the selection
    Elements,

    /// Print the flag features of the selection
    Flags,

    /// Print the platform of the selection
    Platform,

    /// Print the ignored features the selection reaches
    Ignore,

    /// Print the merged parameters of the selection as shell variables
    Params {
        /// Dotted paths to keep (all parameters when omitted)
        paths: Vec<String>,
    },
}

impl Commands {
    /// Name used to prefix error messages
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Cname => "cname",
            Commands::Features => "features",
            Commands::Elements => "elements",
            Commands::Flags => "flags",
            Commands::Platform => "platform",
            Commands::Ignore => "ignore",
            Commands::Params { .. } => "params",
        }
    }
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);
    let name = cli.command.name();

    output.verbose("garden-feat starting");

    let config = Config::load(cli.config.as_deref()).context(name)?;
    let feature_dir = config.feature_dir(cli.feature_dir.as_deref());
    output.verbose_ctx("load", &format!("Feature directory: {}", feature_dir.display()));

    let catalog = FeatureStore::new(&feature_dir).load().context(name)?;
    output.verbose_ctx("load", &format!("Loaded {} features", catalog.len()));

    let ignored: BTreeSet<String> = config
        .ignore
        .iter()
        .chain(&cli.ignore)
        .filter(|s| !s.is_empty())
        .cloned()
        .collect();
    let features: Vec<String> = cli.features.into_iter().filter(|s| !s.is_empty()).collect();

    let request = Request {
        catalog,
        features,
        ignored,
    };

    match cli.command {
        Commands::Cname => commands::cname(&request, &output)?,
        Commands::Features => commands::features(&request, &output)?,
        Commands::Elements => commands::elements(&request, &output)?,
        Commands::Flags => commands::flags(&request, &output)?,
        Commands::Platform => commands::platform(&request, &output)?,
        Commands::Ignore => commands::ignore(&request, &output)?,
        Commands::Params { paths } => commands::params(&request, &output, &paths)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn lists_split_on_commas_and_repeat() {
        let cli = Cli::try_parse_from([
            "garden-feat",
            "--features",
            "kvm,server",
            "-f",
            "_prod",
            "-i",
            "cloud",
            "cname",
        ])
        .unwrap();

        assert_eq!(cli.features, vec!["kvm", "server", "_prod"]);
        assert_eq!(cli.ignore, vec!["cloud"]);
        assert_eq!(cli.command.name(), "cname");
    }

    #[test]
    fn global_options_after_command() {
        let cli = Cli::try_parse_from([
            "garden-feat",
            "params",
            "boot.mode",
            "--format",
            "json",
            "-f",
            "kvm",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.features, vec!["kvm"]);
        match cli.command {
            Commands::Params { paths } => assert_eq!(paths, vec!["boot.mode"]),
            _ => panic!("expected params"),
        }
    }

    #[test]
    fn command_is_required() {
        assert!(Cli::try_parse_from(["garden-feat", "-f", "kvm"]).is_err());
    }
}
