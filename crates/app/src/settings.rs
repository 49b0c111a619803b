//! Settings come from an optional TOML file, then `SPENDSYNC_*` environment
//! variables, then command line flags, each layer overriding the previous.

use std::{path::PathBuf, time::Duration};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/spendsync.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server_url: String,
    /// Directory holding the persisted store.
    pub data_dir: PathBuf,
    pub level: String,
    pub fetch_interval_secs: u64,
    pub upload_retry_secs: u64,
    pub request_timeout_secs: u64,
    pub read_lag_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:3000".to_string(),
            data_dir: PathBuf::from("data"),
            level: "info".to_string(),
            fetch_interval_secs: 60,
            upload_retry_secs: 30,
            request_timeout_secs: 10,
            read_lag_secs: 15,
        }
    }
}

impl Settings {
    pub fn fetch_interval(&self) -> Duration {
        Duration::from_secs(self.fetch_interval_secs)
    }

    pub fn upload_retry(&self) -> Duration {
        Duration::from_secs(self.upload_retry_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn read_lag(&self) -> Duration {
        Duration::from_secs(self.read_lag_secs)
    }

    /// Sync periods of zero are refused.
    pub fn validate(&self) -> Result<()> {
        if self.fetch_interval_secs == 0 {
            return Err(AppError::InvalidSetting("fetch_interval_secs"));
        }
        if self.upload_retry_secs == 0 {
            return Err(AppError::InvalidSetting("upload_retry_secs"));
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
#[command(name = "spendsync")]
#[command(about = "Offline budget spendings kept in sync with the budget server")]
pub struct Cli {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    config: Option<String>,
    /// Override server URL (e.g. http://127.0.0.1:3000).
    #[arg(long, global = true)]
    server_url: Option<String>,
    /// Override the store directory.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the stored budgets.
    Budgets,
    /// Show the spendings of the given budgets (all when none given).
    List {
        #[arg(long = "budget")]
        budgets: Vec<i64>,
    },
    /// Record a new spending.
    Add(AddArgs),
    /// Change an existing spending.
    Edit(EditArgs),
    /// Delete a spending.
    Delete {
        #[arg(long)]
        budget: i64,
        #[arg(long)]
        id: String,
    },
    /// Fetch the server snapshot once.
    Fetch,
    /// Upload queued changes once.
    Push,
    /// Show the conflicted versions.
    Conflicts {
        /// Forget every logged conflict.
        #[arg(long, conflicts_with = "dismiss")]
        clear: bool,
        /// Forget the logged conflict of one version.
        #[arg(long, value_name = "VERSION")]
        dismiss: Option<String>,
    },
    /// Keep fetching and uploading until interrupted.
    Sync,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long)]
    pub budget: i64,
    /// Amount in major units, `.` or `,` as decimal separator.
    #[arg(long, allow_hyphen_values = true)]
    pub amount: String,
    #[arg(long)]
    pub description: String,
    /// Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    #[arg(long)]
    pub budget: i64,
    #[arg(long)]
    pub id: String,
    #[arg(long, allow_hyphen_values = true)]
    pub amount: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

pub fn load() -> Result<(Settings, Command)> {
    let args = Cli::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("SPENDSYNC").try_parsing(true));
    let mut settings: Settings = builder.build()?.try_deserialize()?;

    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    if let Some(data_dir) = args.data_dir {
        settings.data_dir = data_dir;
    }
    if let Some(level) = args.level {
        settings.level = level;
    }

    settings.validate()?;
    Ok((settings, args.command))
}
