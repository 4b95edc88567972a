use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{CommandFactory, Parser, Subcommand};
use riksfx::core::Currency;
use riksfx::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the latest exchange rate for a currency pair
    Rate {
        /// Currency to convert from (SEK, EUR, USD)
        from: Currency,
        /// Currency to convert to (SEK, EUR, USD)
        to: Currency,
        /// Resolve as of this RFC 3339 instant instead of now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
        /// Skip the local rate store
        #[arg(long)]
        no_cache: bool,
    },
    /// List supported currencies
    Currencies,
}

impl From<Commands> for riksfx::AppCommand {
    fn from(cmd: Commands) -> riksfx::AppCommand {
        match cmd {
            Commands::Rate {
                from,
                to,
                at,
                no_cache,
            } => riksfx::AppCommand::Rate {
                from,
                to,
                at,
                no_cache,
            },
            Commands::Currencies => riksfx::AppCommand::Currencies,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => riksfx::cli::setup::setup(),
        Some(cmd) => riksfx::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
