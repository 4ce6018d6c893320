//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Rated capacities and smoothed power curves for turbines and solar panels.
#[derive(Debug, Parser)]
#[command(name = "atlas-resource", version)]
pub struct Cli {
    /// Run configuration (TOML).
    #[arg(long, global = true, conflicts_with = "preset")]
    pub config: Option<PathBuf>,

    /// Built-in configuration preset (andresen2015, none, sharp).
    #[arg(long, global = true)]
    pub preset: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the rated capacity of one turbine or panel.
    Capacity(CapacityArgs),
    /// Smooth a turbine power curve.
    Smooth(SmoothArgs),
    /// List the turbines and panels in the resource directories.
    List,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct CapacityArgs {
    /// Turbine name from the registry, or path to a turbine YAML file.
    #[arg(long)]
    pub turbine: Option<String>,

    /// Panel name from the registry, or path to a panel YAML file.
    #[arg(long)]
    pub panel: Option<String>,
}

#[derive(Debug, Args)]
pub struct SmoothArgs {
    /// Turbine name from the registry, or path to a turbine YAML file.
    #[arg(long, required = true, num_args = 1..)]
    pub turbine: Vec<String>,

    /// Override fleet availability.
    #[arg(long)]
    pub eta: Option<f64>,

    /// Override kernel mean offset (m/s).
    #[arg(long, allow_hyphen_values = true)]
    pub delta_v: Option<f64>,

    /// Override kernel standard deviation (m/s).
    #[arg(long)]
    pub sigma: Option<f64>,

    /// Worker threads used when smoothing several turbines.
    #[arg(long, default_value_t = 1)]
    pub workers: usize,

    /// Write the smoothed curve to CSV (single turbine only).
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Treat an oversmoothing diagnostic as an error.
    #[arg(long)]
    pub strict: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("atlas-resource").chain(args.iter().copied()))
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn supports_capacity_turbine() {
        let cli = parse(&["capacity", "--turbine", "generic_3mw"]);
        assert!(cli.is_ok(), "{:?}", cli.err());
        match cli.ok().map(|c| c.command) {
            Some(Command::Capacity(args)) => {
                assert_eq!(args.turbine.as_deref(), Some("generic_3mw"));
                assert!(args.panel.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn capacity_needs_exactly_one_source() {
        assert!(parse(&["capacity"]).is_err());
        assert!(parse(&["capacity", "--turbine", "a", "--panel", "b"]).is_err());
    }

    #[test]
    fn smooth_accepts_overrides() {
        let cli = parse(&[
            "smooth",
            "--turbine",
            "t.yaml",
            "--sigma",
            "1.5",
            "--delta-v",
            "-0.5",
            "--preset",
            "sharp",
        ]);
        assert!(cli.is_ok(), "{:?}", cli.err());
        let cli = cli.ok();
        assert_eq!(
            cli.as_ref().and_then(|c| c.preset.as_deref()),
            Some("sharp")
        );
        match cli.map(|c| c.command) {
            Some(Command::Smooth(args)) => {
                assert_eq!(args.turbine, vec!["t.yaml".to_string()]);
                assert_eq!(args.sigma, Some(1.5));
                assert_eq!(args.delta_v, Some(-0.5));
                assert_eq!(args.workers, 1);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn config_and_preset_are_mutually_exclusive() {
        assert!(parse(&["--config", "run.toml", "--preset", "none", "list"]).is_err());
    }
}
