//! # Ascent Engine
//!
//! Headless runner for the Ascent player controller.
//!
//! Usage:
//! - `ascent [CONFIG]` runs the scripted simulation described by `CONFIG`
//!   (default `ascent.toml`, built-in defaults when missing)
//! - `ascent --write-config [PATH]` writes the default configuration

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod config;
mod sim;
mod timing;

use std::path::PathBuf;

use anyhow::Result;
use ascent_gameplay::LocomotionState;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{SimConfig, CONFIG_FILE};
use crate::sim::Simulation;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "ascent",
    about = "Headless runner for the Ascent player controller",
    version
)]
struct Cli {
    /// Simulation config file (default: ascent.toml)
    config: Option<PathBuf>,

    /// Write the default configuration and exit (default path: ascent.toml)
    #[arg(long, value_name = "PATH", num_args = 0..=1, conflicts_with = "config")]
    write_config: Option<Option<PathBuf>>,
}

impl Cli {
    fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
    }
}

/// Main entry point.
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("ascent_engine=info".parse()?)
                .add_directive("ascent_gameplay=info".parse()?),
        )
        .init();

    info!("Ascent starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    if let Some(target) = cli.write_config {
        let path = target.unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
        SimConfig::default().save_to(&path)?;
        return Ok(());
    }

    let mut config = SimConfig::load_from(cli.config_path());
    config.validate();

    let report = Simulation::new(config).run()?;
    info!(
        ticks = report.ticks,
        final_state = ?report.final_state,
        jumps = report.jumps_accepted,
        climbs = report.entries(LocomotionState::Climb),
        hits = report.hits,
        target_destroyed = report.target_destroyed,
        "Simulation complete"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["ascent"]).expect("should parse");
        assert_eq!(cli.config, None);
        assert_eq!(cli.write_config, None);
        assert_eq!(cli.config_path(), PathBuf::from(CONFIG_FILE));
    }

    #[test]
    fn test_cli_config_path() {
        let cli = Cli::try_parse_from(["ascent", "arena.toml"]).expect("should parse");
        assert_eq!(cli.config_path(), PathBuf::from("arena.toml"));
    }

    #[test]
    fn test_cli_write_config() {
        let cli = Cli::try_parse_from(["ascent", "--write-config"]).expect("should parse");
        assert_eq!(cli.write_config, Some(None));

        let cli =
            Cli::try_parse_from(["ascent", "--write-config", "out.toml"]).expect("should parse");
        assert_eq!(cli.write_config, Some(Some(PathBuf::from("out.toml"))));
    }

    #[test]
    fn test_cli_rejects_unknown_flags() {
        let err = Cli::try_parse_from(["ascent", "--write-cfg"]).expect_err("should fail");
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);

        assert!(Cli::try_parse_from(["ascent", "a.toml", "b.toml"]).is_err());
    }

    #[test]
    fn test_cli_help_does_not_run() {
        let err = Cli::try_parse_from(["ascent", "--help"]).expect_err("help exits early");
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
