use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveTime;
use chrono_tz::Tz;
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub team: TeamConfig,
    pub schedule: ScheduleConfig,
    pub upstream: UpstreamConfig,
    pub delivery: DeliveryConfig,
    pub command: CommandConfig,
    pub monitoring: MonitoringConfig,
}

/// The single tracked entity.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamConfig {
    pub id: u64,
    /// Name exactly as the upstream API spells it.
    pub name: String,
    /// Short name used in message text.
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    pub timezone: Tz,
    #[serde(deserialize_with = "deserialize_hh_mm")]
    pub daily_digest_time: NaiveTime,
    /// Post the "no fixture found" digest when nothing is scheduled.
    pub digest_when_absent: bool,
    /// Seconds past each minute boundary at which the kickoff watch fires.
    #[serde(default = "default_watch_offset")]
    pub kickoff_watch_offset_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryConfig {
    /// Name of the channel that receives digests and kickoff alerts.
    pub channel: String,
    pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandConfig {
    pub enabled: bool,
    pub token: String,
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

fn default_watch_offset() -> u64 {
    1
}

fn deserialize_hh_mm<'de, D>(deserializer: D) -> std::result::Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    NaiveTime::parse_from_str(&raw, "%H:%M").map_err(serde::de::Error::custom)
}

/// Prefix of the environment variables holding one webhook URL per channel,
/// e.g. `DISCORD_WEBHOOK_GERAL` for the channel `geral`.
pub const WEBHOOK_ENV_PREFIX: &str = "DISCORD_WEBHOOK_";

/// Secrets loaded exclusively from environment variables.
/// Not serializable, not stored in config files.
pub struct Secrets {
    /// Webhook URL per lowercase channel name.
    pub webhooks: HashMap<String, SecretString>,
}

impl Secrets {
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let webhooks = vars
            .into_iter()
            .filter_map(|(key, value)| {
                let channel = key.strip_prefix(WEBHOOK_ENV_PREFIX)?;
                if channel.is_empty() || value.trim().is_empty() {
                    return None;
                }
                Some((channel.to_lowercase(), SecretString::from(value)))
            })
            .collect();

        Self { webhooks }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, overlaying environment variables for secrets.
    pub fn load(config_path: &Path) -> Result<(Self, Secrets)> {
        dotenvy::dotenv().ok();

        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config = Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        let secrets = Secrets::from_env();

        Ok((config, secrets))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        anyhow::ensure!(
            !config.command.token.trim().is_empty(),
            "command.token must not be empty"
        );
        anyhow::ensure!(
            config.schedule.kickoff_watch_offset_seconds < 60,
            "schedule.kickoff_watch_offset_seconds must be below 60"
        );
        Ok(config)
    }
}
