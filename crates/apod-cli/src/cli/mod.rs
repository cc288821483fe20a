//! CLI for the APOD feed client.

mod commands;

use anyhow::Result;
use apod_core::{config, CancellationToken, FeedClient, SdkConfig};
use clap::{Args, Parser, Subcommand};

use commands::{run_random, run_range, run_today};

/// Top-level CLI for the APOD feed client.
#[derive(Debug, Parser)]
#[command(name = "apod")]
#[command(about = "APOD: fetch Astronomy Picture of the Day entries as JSON", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Per-invocation overrides of `config.toml`.
#[derive(Debug, Default, Args)]
pub struct Overrides {
    /// API key (default: from config, else DEMO_KEY).
    #[arg(long, global = true, value_name = "KEY")]
    pub api_key: Option<String>,
    /// Retries after the first attempt.
    #[arg(long, global = true, value_name = "N")]
    pub retries: Option<u32>,
    /// Fixed delay between attempts, in milliseconds.
    #[arg(long, global = true, value_name = "MS")]
    pub retry_delay_ms: Option<u64>,
    /// Feed endpoint URL.
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,
}

impl Overrides {
    pub fn apply(self, mut cfg: SdkConfig) -> SdkConfig {
        if let Some(key) = self.api_key {
            cfg.api_key = key;
        }
        if let Some(n) = self.retries {
            cfg.retries = n;
        }
        if let Some(ms) = self.retry_delay_ms {
            cfg.retry_delay_ms = ms;
        }
        if let Some(url) = self.base_url {
            cfg.base_url = url;
        }
        cfg
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch one entry (today's unless --date is given).
    Today {
        /// Calendar date, YYYY-MM-DD.
        #[arg(long)]
        date: Option<String>,
    },

    /// Fetch randomly chosen entries.
    Random {
        /// Number of entries to request.
        #[arg(long, default_value_t = 1)]
        count: u32,
    },

    /// Fetch every entry between two dates, inclusive.
    Range {
        /// First date, YYYY-MM-DD.
        start: String,
        /// Last date, YYYY-MM-DD.
        end: String,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        let cfg = match config::load_or_init() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("config unavailable ({:#}); using defaults", e);
                SdkConfig::default()
            }
        };
        let cfg = cli.overrides.apply(cfg);
        tracing::debug!(
            retries = cfg.retries,
            retry_delay_ms = cfg.retry_delay_ms,
            base_url = %cfg.base_url,
            "loaded config"
        );

        let client = FeedClient::new(cfg)?;
        let cancel = cancel_on_ctrl_c();

        match cli.command {
            CliCommand::Today { date } => run_today(&client, date.as_deref(), &cancel).await?,
            CliCommand::Random { count } => run_random(&client, count, &cancel).await?,
            CliCommand::Range { start, end } => run_range(&client, &start, &end, &cancel).await?,
        }

        Ok(())
    }
}

/// Token that fires on the first Ctrl-C.
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let fire = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received; cancelling request");
            fire.cancel();
        }
    });
    token
}

#[cfg(test)]
mod tests;
