use std::{path::PathBuf, sync::Arc};

use {
    anyhow::Context,
    clap::Parser,
    tokio_util::sync::CancellationToken,
    tracing::{info, warn},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    uploader_config::{CONFIG_PATH_ENV, ConfigStore, DEFAULT_CONFIG_PATH},
    uploader_storage::PgStore,
    uploader_telegram::{Dispatcher, TelegramTransport, bot},
};

#[derive(Parser)]
#[command(name = "uploader", about = "Telegram uploader bot", version)]
struct Cli {
    /// Config file (YAML, TOML or JSON, chosen by extension).
    #[arg(long, env = CONFIG_PATH_ENV, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Cancel `cancel` on Ctrl+C or, on Unix, SIGTERM.
async fn cancel_on_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            },
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            },
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received");
    cancel.cancel();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config.display(),
        "uploader starting"
    );

    let config = ConfigStore::open(cli.config.clone())
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;
    let config = Arc::new(config);
    let snapshot = config.read();

    let store = PgStore::connect(&snapshot.database_url())
        .await
        .context("failed to connect to database")?;
    let store = Arc::new(store);

    let bot = bot::connect(&snapshot)
        .await
        .context("failed to connect to telegram")?;

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_signal(cancel.clone()));

    let updates = bot::spawn_polling(bot.clone(), cancel.clone());
    let dispatcher = Dispatcher::new(
        Arc::new(TelegramTransport::new(bot)),
        config,
        store.clone(),
        store,
        cancel.clone(),
    );

    let result = dispatcher.run(updates).await;
    cancel.cancel();
    result.context("dispatcher stopped")?;

    info!("uploader stopped");
    Ok(())
}
