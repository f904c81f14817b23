//! warmpoold — warm pool target daemon and tooling.
//!
//! # Usage
//!
//! ```text
//! warmpoold target 0,3,-1,0,...          # evaluate an explicit histogram
//! warmpoold replay --trace events.jsonl   # replay a recorded trace
//! warmpoold watch --scope node-a          # read alloc/release lines from stdin
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use warmpool_core::WarmPoolConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "warmpoold",
    about = "Adaptive warm pool sizing",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Path to warmpool.toml (defaults apply when omitted).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the warm target for an explicit hourly histogram.
    ///
    /// Values are comma-separated, most recent hour first.
    Target {
        #[arg(value_delimiter = ',', allow_hyphen_values = true, required = true)]
        net: Vec<i64>,
    },
    /// Replay a JSON-lines event trace and report the resulting state.
    Replay {
        /// Trace file, one {"at": ..., "op": "allocate"|"release"} per line.
        #[arg(short, long)]
        trace: PathBuf,
        /// In-use count before the first event.
        #[arg(long, default_value = "0")]
        initial_in_use: u64,
        /// Evaluate at this RFC 3339 instant instead of the last event time.
        #[arg(long)]
        at: Option<chrono::DateTime<chrono::Utc>>,
        /// Output format: text, json, or prometheus.
        #[arg(short, long, default_value = "text")]
        format: String,
        /// Scope label for prometheus output.
        #[arg(long, default_value = "default")]
        scope: String,
    },
    /// Read "alloc"/"release" lines from stdin and print resize decisions.
    Watch {
        /// In-use count at startup.
        #[arg(long, default_value = "0")]
        initial_in_use: u64,
        /// Scope label for prometheus output.
        #[arg(long, default_value = "default")]
        scope: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new("info,warmpool=debug"))?,
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Target { net } => commands::target::run(&config, &net),
        Commands::Replay {
            trace,
            initial_in_use,
            at,
            format,
            scope,
        } => commands::replay::run(&config, &trace, initial_in_use, at, &format, &scope),
        Commands::Watch {
            initial_in_use,
            scope,
        } => commands::watch::run(&config, initial_in_use, &scope).await,
    }
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<WarmPoolConfig> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// Read the config file, if any, then layer overrides from `lookup` on top.
fn load_config_with<F>(path: Option<&std::path::Path>, lookup: F) -> anyhow::Result<WarmPoolConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => WarmPoolConfig::from_file(path)?,
        None => WarmPoolConfig::default(),
    };
    config.apply_overrides_from(lookup)?;
    Ok(config)
}
