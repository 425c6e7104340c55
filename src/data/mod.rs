pub mod sofascore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Venue text used when the upstream leaves the venue out.
pub const VENUE_UNSPECIFIED: &str = "Venue not announced";

/// The next scheduled match of the tracked team.
///
/// Built fresh on every fetch and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub tournament_name: String,
    pub home_team: String,
    pub away_team: String,
    pub home_team_id: Option<u64>,
    pub away_team_id: Option<u64>,
    pub venue: String,
    /// Absolute kickoff instant; doubles as the fixture's identity for
    /// kickoff-alert de-duplication.
    pub kickoff: DateTime<Utc>,
}

impl Fixture {
    /// Whichever side is not the tracked team.
    ///
    /// Team ids win over names; when neither matches, the away side is
    /// assumed to be the opponent.
    pub fn opponent(&self, team_id: u64, team_name: &str) -> &str {
        if self.home_team_id == Some(team_id) {
            return &self.away_team;
        }
        if self.away_team_id == Some(team_id) {
            return &self.home_team;
        }
        if self.away_team.eq_ignore_ascii_case(team_name) {
            &self.home_team
        } else {
            &self.away_team
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    /// Network failure, timeout or a non-success HTTP status.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    /// The upstream answered but the body did not have the expected shape.
    #[error("upstream response malformed: {0}")]
    UpstreamMalformed(String),
}

/// Source of the tracked team's next fixture.
#[async_trait]
pub trait FixtureSource: Send + Sync {
    /// Fetch the next fixture for `team_id`.
    ///
    /// `Ok(None)` means the upstream answered and nothing is scheduled.
    async fn next_fixture(&self, team_id: u64) -> Result<Option<Fixture>, FetchError>;

    /// Human-readable name of this source.
    fn name(&self) -> &str;
}
