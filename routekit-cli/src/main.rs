//! RouteKit CLI - Command-line interface
//!
//! This binary provides a command-line interface to the RouteKit library:
//! resolving routes against OpenRouteService and managing the config file.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::route::RouteArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "routekit")]
#[command(version = routekit::VERSION)]
#[command(about = "Multi-modal route resolution over OpenRouteService", long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a route between two points
    Route(RouteArgs),

    /// View or modify configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Config(command) => commands::config::run(command),
        Commands::Route(args) => {
            let runner = CliRunner::with_debug(cli.debug)?;
            let runtime = tokio::runtime::Runtime::new().map_err(CliError::Runtime)?;
            runtime.block_on(commands::route::run(&runner, args))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use routekit::route::TravelMode;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_route_command() {
        let cli = Cli::try_parse_from([
            "routekit",
            "route",
            "--from",
            "55.751244,37.618423",
            "--to",
            "55.761244,37.628423",
            "--mode",
            "walking",
        ])
        .unwrap();

        match cli.command {
            Commands::Route(args) => {
                assert_eq!(args.mode, TravelMode::Walking);
                assert_eq!(args.from.latitude, 55.751244);
                assert!(!args.all_modes);
                assert!(args.waypoints.is_empty());
            }
            _ => panic!("expected route command"),
        }
    }

    #[test]
    fn test_parse_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "routekit",
            "route",
            "--from",
            "-33.8688,151.2093",
            "--to",
            "-33.8568,151.2153",
            "--all-modes",
        ])
        .unwrap();

        match cli.command {
            Commands::Route(args) => {
                assert_eq!(args.from.latitude, -33.8688);
                assert!(args.all_modes);
            }
            _ => panic!("expected route command"),
        }
    }

    #[test]
    fn test_rejects_unknown_mode() {
        let result = Cli::try_parse_from([
            "routekit", "route", "--from", "1,1", "--to", "2,2", "--mode", "teleport",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_config_set() {
        let cli =
            Cli::try_parse_from(["routekit", "config", "set", "cache.ttl_secs", "600"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigCommands::Set { .. })
        ));
    }
}
