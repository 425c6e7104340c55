use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::data::Fixture;
use crate::engine::classifier::TemporalClassification;

/// What a trigger firing resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationDecision {
    DailyDigestToday,
    DailyDigestUpcoming,
    DailyDigestNone,
    KickoffAlert,
    OnDemandToday,
    OnDemandUpcoming,
    OnDemandNone,
}

impl NotificationDecision {
    /// Whether rendering this decision needs a fixture.
    pub fn has_fixture(self) -> bool {
        !matches!(self, Self::DailyDigestNone | Self::OnDemandNone)
    }
}

impl std::fmt::Display for NotificationDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DailyDigestToday => write!(f, "DAILY_DIGEST_TODAY"),
            Self::DailyDigestUpcoming => write!(f, "DAILY_DIGEST_UPCOMING"),
            Self::DailyDigestNone => write!(f, "DAILY_DIGEST_NONE"),
            Self::KickoffAlert => write!(f, "KICKOFF_ALERT"),
            Self::OnDemandToday => write!(f, "ON_DEMAND_TODAY"),
            Self::OnDemandUpcoming => write!(f, "ON_DEMAND_UPCOMING"),
            Self::OnDemandNone => write!(f, "ON_DEMAND_NONE"),
        }
    }
}

/// The three ways a notification can be requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    DailyDigest,
    KickoffWatch,
    OnDemand,
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DailyDigest => write!(f, "daily_digest"),
            Self::KickoffWatch => write!(f, "kickoff_watch"),
            Self::OnDemand => write!(f, "on_demand"),
        }
    }
}

/// Daily digest policy. `None` means no fixture (absent or fetch failed).
pub fn digest_decision(classification: Option<&TemporalClassification>) -> NotificationDecision {
    match classification {
        None => NotificationDecision::DailyDigestNone,
        Some(c) if c.is_today => NotificationDecision::DailyDigestToday,
        Some(_) => NotificationDecision::DailyDigestUpcoming,
    }
}

/// On-demand policy: the digest policy with its own variants.
pub fn on_demand_decision(classification: Option<&TemporalClassification>) -> NotificationDecision {
    match digest_decision(classification) {
        NotificationDecision::DailyDigestToday => NotificationDecision::OnDemandToday,
        NotificationDecision::DailyDigestUpcoming => NotificationDecision::OnDemandUpcoming,
        _ => NotificationDecision::OnDemandNone,
    }
}

/// Kickoff-watch state: remembers the kickoff instant of the last fixture
/// that was alerted so the same kickoff is announced at most once.
#[derive(Debug, Default)]
pub struct KickoffGuard {
    last_alerted_kickoff: Option<DateTime<Utc>>,
}

impl KickoffGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether this firing should emit a kickoff alert, recording the
    /// kickoff when it does.
    pub fn check(
        &mut self,
        fixture: &Fixture,
        classification: &TemporalClassification,
    ) -> Option<NotificationDecision> {
        if !classification.is_kickoff_minute {
            return None;
        }
        if self.last_alerted_kickoff == Some(fixture.kickoff) {
            return None;
        }
        self.last_alerted_kickoff = Some(fixture.kickoff);
        Some(NotificationDecision::KickoffAlert)
    }

    pub fn last_alerted_kickoff(&self) -> Option<DateTime<Utc>> {
        self.last_alerted_kickoff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn classification(is_today: bool, is_kickoff_minute: bool) -> TemporalClassification {
        TemporalClassification {
            is_today,
            is_kickoff_minute,
            days_until: if is_today { 0 } else { 3 },
        }
    }

    fn fixture(kickoff: DateTime<Utc>) -> Fixture {
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

    #[test]
    fn test_digest_policy() {
        assert_eq!(digest_decision(None), NotificationDecision::DailyDigestNone);
        assert_eq!(
            digest_decision(Some(&classification(true, false))),
            NotificationDecision::DailyDigestToday
        );
        assert_eq!(
            digest_decision(Some(&classification(false, false))),
            NotificationDecision::DailyDigestUpcoming
        );
    }

    #[test]
    fn test_on_demand_policy() {
        assert_eq!(on_demand_decision(None), NotificationDecision::OnDemandNone);
        assert_eq!(
            on_demand_decision(Some(&classification(true, true))),
            NotificationDecision::OnDemandToday
        );
        assert_eq!(
            on_demand_decision(Some(&classification(false, false))),
            NotificationDecision::OnDemandUpcoming
        );
    }

    #[test]
    fn test_kickoff_alert_fires_once() {
        let kickoff = Utc.with_ymd_and_hms(2026, 10, 19, 21, 0, 0).unwrap();
        let f = fixture(kickoff);
        let mut guard = KickoffGuard::new();

        assert_eq!(
            guard.check(&f, &classification(true, true)),
            Some(NotificationDecision::KickoffAlert)
        );
        assert_eq!(guard.last_alerted_kickoff(), Some(kickoff));
        assert_eq!(guard.check(&f, &classification(true, true)), None);
        assert_eq!(guard.check(&f, &classification(true, false)), None);
    }

    #[test]
    fn test_outside_kickoff_minute_leaves_state() {
        let kickoff = Utc.with_ymd_and_hms(2026, 10, 19, 21, 0, 0).unwrap();
        let mut guard = KickoffGuard::new();
        assert_eq!(guard.check(&fixture(kickoff), &classification(true, false)), None);
        assert_eq!(guard.last_alerted_kickoff(), None);
    }

    #[test]
    fn test_new_fixture_alerts_again() {
        let first = Utc.with_ymd_and_hms(2026, 10, 19, 21, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2026, 10, 26, 21, 0, 0).unwrap();
        let mut guard = KickoffGuard::new();

        assert!(guard.check(&fixture(first), &classification(true, true)).is_some());
        assert!(guard.check(&fixture(second), &classification(true, true)).is_some());
        assert_eq!(guard.last_alerted_kickoff(), Some(second));
    }

    #[test]
    fn test_has_fixture() {
        assert!(NotificationDecision::KickoffAlert.has_fixture());
        assert!(NotificationDecision::OnDemandUpcoming.has_fixture());
        assert!(!NotificationDecision::DailyDigestNone.has_fixture());
        assert!(!NotificationDecision::OnDemandNone.has_fixture());
    }
}
