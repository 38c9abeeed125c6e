//! CLI argument definitions.

use clap::{Parser, Subcommand};

/// Salon Booking API - salons, staff, counters and appointment booking
#[derive(Parser, Debug)]
#[command(name = "salon-booking-api")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),
}

/// Overrides for the configured bind address
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Skip creating the default admin account
    #[arg(long)]
    pub no_seed: bool,
}

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Drop every table and re-run all migrations
    Fresh,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_overrides_are_optional() {
        let cli = Cli::try_parse_from(["salon-booking-api", "serve"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert!(args.host.is_none());
                assert!(args.port.is_none());
                assert!(!args.no_seed);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn migrate_takes_an_action() {
        let cli = Cli::try_parse_from(["salon-booking-api", "-v", "migrate", "fresh"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Migrate(MigrateArgs {
                action: MigrateAction::Fresh
            })
        ));
        assert!(Cli::try_parse_from(["salon-booking-api", "migrate"]).is_err());
    }
}
