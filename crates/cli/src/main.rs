mod notification_commands;

use std::path::PathBuf;

use {
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "pdnotify", about = "pdnotify: PagerDuty notification channel host")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Only look for pdnotify.{toml,yaml,yml,json} in this directory.
    #[arg(long, global = true, env = "PDNOTIFY_CONFIG_DIR")]
    config_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered notification types with their default config.
    Types,
    /// Validate and normalize a notification config document.
    Validate {
        /// Config document (json, toml or yaml).
        file: PathBuf,
        /// Notification type, when the document carries no `type` tag.
        #[arg(long = "type")]
        type_id: Option<String>,
    },
    /// Print the PagerDuty trigger message for an event, without sending it.
    Payload {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        event: PathBuf,
    },
    /// Send the PagerDuty trigger message for an event.
    Send {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        event: PathBuf,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    // Logs go to stderr so command output stays machine-readable.
    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    if let Some(dir) = cli.config_dir.clone() {
        pdnotify_config::set_config_dir(dir);
    }
    let config = pdnotify_config::discover_and_load();
    info!(
        version = env!("CARGO_PKG_VERSION"),
        api_url = %config.pagerduty.api_url,
        "pdnotify starting"
    );

    let registry = notification_commands::build_registry(&config)?;
    let out = &mut std::io::stdout().lock();

    match cli.command {
        Commands::Types => notification_commands::types(&registry, out),
        Commands::Validate { file, type_id } => {
            notification_commands::validate(&registry, &file, type_id.as_deref(), out)
        },
        Commands::Payload { config, event } => notification_commands::payload(&config, &event, out),
        Commands::Send {
            config: notification,
            event,
        } => notification_commands::send(&config, &notification, &event, out).await,
    }
}
