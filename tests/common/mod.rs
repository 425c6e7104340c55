//! Shared fakes for the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::America::Sao_Paulo;

use fixture_notifier::config::AppConfig;
use fixture_notifier::data::{FetchError, Fixture, FixtureSource};
use fixture_notifier::delivery::{Channel, DeliveryError};
use fixture_notifier::monitoring::health::HealthState;
use fixture_notifier::scheduler::Notifier;

pub const TEST_CONFIG: &str = r#"
[team]
id = 1
name = "Tracked FC"
display_name = "Tracked"

[schedule]
timezone = "America/Sao_Paulo"
daily_digest_time = "12:00"
digest_when_absent = true

[upstream]
base_url = "http://127.0.0.1:1"
timeout_seconds = 1
user_agent = "fixture-notifier-tests"

[delivery]
channel = "geral"
username = "Fixture Notifier"

[command]
enabled = true
token = "!next"
bind = "127.0.0.1"
port = 0

[monitoring]
log_level = "debug"
log_format = "pretty"
"#;

pub fn test_config() -> AppConfig {
    AppConfig::from_toml(TEST_CONFIG).expect("test config should parse")
}

/// Instant at the given São Paulo wall-clock time.
pub fn sao_paulo(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Sao_Paulo
        .with_ymd_and_hms(y, m, d, h, min, s)
        .single()
        .unwrap()
        .with_timezone(&Utc)
}

pub fn fixture_at(kickoff: DateTime<Utc>) -> Fixture {
    Fixture {
        tournament_name: "League A".to_string(),
        home_team: "Tracked FC".to_string(),
        away_team: "Rival FC".to_string(),
        home_team_id: Some(1),
        away_team_id: Some(2),
        venue: "City Arena".to_string(),
        kickoff,
    }
}

/// What the fake upstream answers.
#[derive(Clone)]
pub enum Upstream {
    Scheduled(Fixture),
    Empty,
    Down,
}

pub struct StaticSource {
    answer: Mutex<Upstream>,
}

impl StaticSource {
    pub fn new(answer: Upstream) -> Self {
        Self {
            answer: Mutex::new(answer),
        }
    }

    pub fn set(&self, answer: Upstream) {
        *self.answer.lock().unwrap() = answer;
    }
}

#[async_trait]
impl FixtureSource for StaticSource {
    async fn next_fixture(&self, _team_id: u64) -> Result<Option<Fixture>, FetchError> {
        match self.answer.lock().unwrap().clone() {
            Upstream::Scheduled(fixture) => Ok(Some(fixture)),
            Upstream::Empty => Ok(None),
            Upstream::Down => Err(FetchError::UpstreamUnavailable("timed out".to_string())),
        }
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Records every delivered message; knows only the channels it was given.
pub struct RecordingChannel {
    known: Vec<String>,
    pub sent: Mutex<Vec<(String, String)>>,
}

impl RecordingChannel {
    pub fn new(known: &[&str]) -> Self {
        Self {
            known: known.iter().map(|c| c.to_string()).collect(),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn messages(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Channel for RecordingChannel {
    async fn deliver(&self, channel: &str, text: &str) -> Result<(), DeliveryError> {
        if !self.known.iter().any(|c| c == channel) {
            return Err(DeliveryError::ChannelUnresolved(channel.to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((channel.to_string(), text.to_string()));
        Ok(())
    }
}

pub fn notifier_with(
    config: &AppConfig,
    source: Arc<StaticSource>,
    channel: Arc<RecordingChannel>,
) -> Notifier {
    Notifier::new(config, source, channel, HealthState::new())
}
