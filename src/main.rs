use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use resumebot::api::ApiServer;
use resumebot::{Config, db};

/// Resumebot - Telegram webhook responder for a personal resume card
#[derive(Parser)]
#[command(name = "resumebot", version, about)]
struct Cli {
    /// Port to listen on
    #[arg(long, env = "RESUMEBOT_PORT", default_value = "8080")]
    port: u16,

    /// Path to the SQLite database file
    #[arg(long, env = "RESUMEBOT_DB", default_value = "resumebot.db")]
    db: PathBuf,

    /// Webhook secret token (the value passed as secret_token to setWebhook)
    #[arg(long, env = "TELEGRAM_WEBHOOK_SECRET", hide_env_values = true)]
    webhook_secret: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,resumebot=info",
        1 => "info,resumebot=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::new(cli.port, cli.db, cli.webhook_secret);
    let db = db::init(&config.db_path)?;

    ApiServer::new(&config, db).run().await?;
    Ok(())
}
