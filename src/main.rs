use anyhow::Result;
use clap::Parser;
use morph::cli::{display_error_and_exit, App, CliError, Cli, Commands};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "morph=debug" } else { "morph=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs go to stderr so they never interleave with the board on stdout
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut app = App::new(cli.api_url)?;
    info!("Using bot service at {}", app.config.api_url);

    match cli.command {
        Commands::Play { side } => app.handle_play(side).await,
        Commands::Health => app.handle_health().await,
        Commands::Guest { command } => app.handle_guest(command),
        Commands::Config { command } => app.handle_config(command),
        Commands::Tune(args) => app.handle_tune(args).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        debug!("Command failed: {:#}", e);
        display_error_and_exit(CliError::from(e), 1);
    }
}
