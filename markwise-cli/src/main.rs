use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "markwise", about = "Semantic grading for quiz answers")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Store the model provider API key
    Auth(commands::auth::AuthArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
    /// Grade one answer against a question bank file
    Evaluate(commands::evaluate::EvaluateArgs),
    /// Run the markwise server
    Serve(commands::serve::ServeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Auth(args) => commands::auth::run(args),
        Commands::Config(args) => commands::config::run(args),
        Commands::Evaluate(args) => commands::evaluate::run(args).await,
        Commands::Serve(args) => commands::serve::run(args).await,
    }
}
