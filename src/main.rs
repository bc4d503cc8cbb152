use clap::Parser;
use karaoke_sync_lib::bootstrap::{init_tracing_subscriber, resolve_config, wire};
use karaoke_sync_lib::cli::{self, Cli};
use tracing::{error, info_span, Instrument};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = resolve_config(cli.config.clone())?;

    if let Err(err) = init_tracing_subscriber(&config.logging) {
        eprintln!("Failed to initialize tracing: {err:#}");
    }

    let app = wire(config)?;
    let span = info_span!("cli.command", store = %app.config.store.base_url);
    let result = cli::run(cli.command, &app).instrument(span).await;

    if let Err(err) = &result {
        error!(error = %format!("{err:#}"), "command failed");
    }
    result
}
