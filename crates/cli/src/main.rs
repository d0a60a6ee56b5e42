use std::path::PathBuf;

use {
    bridge_config::{BridgeConfig, Severity, ValidationResult},
    clap::{Parser, Subcommand},
    tracing::{info, warn},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "bridge", about = "LINE to Discord relay with optional advice", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file (default: ./bridge.toml, then the user config dir).
    #[arg(long, short, global = true, env = "BRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind to (overrides config value).
    #[arg(long, global = true)]
    bind: Option<String>,

    /// Port to listen on (overrides config value and PORT).
    #[arg(long, global = true)]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bridge (default when no subcommand is provided).
    Serve,
    /// Validate the effective configuration and exit.
    Check,
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

/// File, then environment, then command-line flags.
fn effective_config(cli: &Cli) -> anyhow::Result<BridgeConfig> {
    let mut config = bridge_config::discover_and_load(cli.config.as_deref())?;
    bridge_config::apply_env_overrides(&mut config)?;
    if let Some(bind) = &cli.bind {
        config.server.bind = bind.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    Ok(config)
}

fn log_warnings(result: &ValidationResult) {
    for diagnostic in result.warnings() {
        warn!(path = diagnostic.path, "{}", diagnostic.message);
    }
}

fn print_diagnostics(result: &ValidationResult) {
    if result.diagnostics.is_empty() {
        println!("config ok");
        return;
    }
    for diagnostic in &result.diagnostics {
        let label = match diagnostic.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        println!("{label}: {diagnostic}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "line-discord bridge starting");

    let config = effective_config(&cli)?;
    let result = bridge_config::validate(&config);

    match cli.command {
        None | Some(Commands::Serve) => {
            log_warnings(&result);
            result.into_result()?;
            bridge_gateway::run(config).await
        },
        Some(Commands::Check) => {
            print_diagnostics(&result);
            Ok(result.into_result()?)
        },
    }
}
