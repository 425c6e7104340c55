//! SofaScore fixture source.
//!
//! Reads the "next events" list for a team and keeps only the first entry,
//! which is the team's next scheduled match.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::config::UpstreamConfig;
use crate::data::{FetchError, Fixture, FixtureSource, VENUE_UNSPECIFIED};

pub struct SofaScoreSource {
    client: reqwest::Client,
    base_url: String,
}

impl SofaScoreSource {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn next_events_url(&self, team_id: u64) -> String {
        format!("{}/team/{team_id}/events/next/0", self.base_url)
    }
}

#[async_trait]
impl FixtureSource for SofaScoreSource {
    async fn next_fixture(&self, team_id: u64) -> Result<Option<Fixture>, FetchError> {
        let url = self.next_events_url(team_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::UpstreamUnavailable(e.to_string()))?;

        let status = response.status();
        // SofaScore answers 404 for teams with nothing scheduled.
        if status == StatusCode::NOT_FOUND {
            debug!(team_id, "Upstream returned 404 for next events");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(FetchError::UpstreamUnavailable(format!(
                "{url} returned {status}"
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::UpstreamUnavailable(e.to_string()))?;
        let parsed: NextEventsResponse = serde_json::from_slice(&body)
            .map_err(|e| FetchError::UpstreamMalformed(e.to_string()))?;

        parsed
            .events
            .into_iter()
            .next()
            .map(SofaEvent::into_fixture)
            .transpose()
    }

    fn name(&self) -> &str {
        "sofascore"
    }
}

// --- SofaScore API Response Types ---

#[derive(Debug, Deserialize)]
struct NextEventsResponse {
    #[serde(default)]
    events: Vec<SofaEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SofaEvent {
    tournament: SofaNamed,
    home_team: SofaTeam,
    away_team: SofaTeam,
    venue: Option<SofaVenue>,
    start_timestamp: i64,
}

#[derive(Debug, Deserialize)]
struct SofaTeam {
    id: Option<u64>,
    name: String,
}

#[derive(Debug, Deserialize)]
struct SofaVenue {
    stadium: Option<SofaNamed>,
    name: Option<String>,
    city: Option<SofaNamed>,
}

#[derive(Debug, Deserialize)]
struct SofaNamed {
    name: String,
}

impl SofaVenue {
    fn display(self) -> Option<String> {
        self.stadium
            .map(|s| s.name)
            .or(self.name)
            .or(self.city.map(|c| c.name))
            .filter(|v| !v.trim().is_empty())
    }
}

impl SofaEvent {
    fn into_fixture(self) -> Result<Fixture, FetchError> {
        let kickoff = DateTime::<Utc>::from_timestamp(self.start_timestamp, 0).ok_or_else(|| {
            FetchError::UpstreamMalformed(format!(
                "startTimestamp out of range: {}",
                self.start_timestamp
            ))
        })?;

        Ok(Fixture {
            tournament_name: self.tournament.name,
            home_team: self.home_team.name,
            away_team: self.away_team.name,
            home_team_id: self.home_team.id,
            away_team_id: self.away_team.id,
            venue: self
                .venue
                .and_then(SofaVenue::display)
                .unwrap_or_else(|| VENUE_UNSPECIFIED.to_string()),
            kickoff,
        })
    }
}
