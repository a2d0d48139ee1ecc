use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod catalog;
mod commands;
mod input;

#[derive(Parser)]
#[command(name = "erpcal-cli", version, about = "Calendar to ERP document tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Build ERP documents from form values
    Map {
        #[command(subcommand)]
        action: commands::map::MapAction,
    },
    /// Leave day counts and permissions
    Leave {
        #[command(subcommand)]
        action: commands::leave::LeaveAction,
    },
    /// Doctor visit state and location submission
    Visit {
        #[command(subcommand)]
        action: commands::visit::VisitAction,
    },
    /// Offline and remote query definitions
    Queries {
        #[command(subcommand)]
        action: commands::queries::QueriesAction,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Config { action } => commands::config::run(action),
        Commands::Map { action } => commands::map::run(action),
        Commands::Leave { action } => commands::leave::run(action),
        Commands::Visit { action } => commands::visit::run(action).await,
        Commands::Queries { action } => commands::queries::run(action).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
