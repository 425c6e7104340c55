//! Message rendering.
//!
//! Pure functions from a decision plus fixture to the text posted in the
//! channel. No I/O, no clock access: the kickoff time is rendered in the
//! configured timezone carried by [`FormatContext`].

use chrono_tz::Tz;

use crate::config::AppConfig;
use crate::data::Fixture;
use crate::engine::classifier::{local_datetime_label, local_time_label, TemporalClassification};
use crate::engine::decision::NotificationDecision;

/// Team identity and timezone needed to render messages.
#[derive(Debug, Clone)]
pub struct FormatContext {
    pub team_id: u64,
    pub team_name: String,
    pub display_name: String,
    pub timezone: Tz,
}

impl FormatContext {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            team_id: config.team.id,
            team_name: config.team.name.clone(),
            display_name: config.team.display_name.clone(),
            timezone: config.schedule.timezone,
        }
    }
}

pub fn format(
    decision: NotificationDecision,
    fixture: Option<&Fixture>,
    classification: Option<&TemporalClassification>,
    ctx: &FormatContext,
) -> String {
    use NotificationDecision::*;

    let Some(fixture) = fixture.filter(|_| decision.has_fixture()) else {
        return no_fixture(ctx);
    };

    match decision {
        KickoffAlert => kickoff_alert(fixture, ctx),
        DailyDigestToday | OnDemandToday => today(fixture, ctx),
        DailyDigestUpcoming | OnDemandUpcoming => {
            let days = classification.map_or(0, |c| c.days_until);
            upcoming(fixture, days, ctx)
        }
        DailyDigestNone | OnDemandNone => no_fixture(ctx),
    }
}

fn kickoff_alert(fixture: &Fixture, ctx: &FormatContext) -> String {
    format!(
        "🚨 **Kickoff!** The {team} match has just started!\n\
         🏆 **Tournament:** {tournament}\n\
         ⚔️ **Opponent:** {opponent}\n\
         📍 **Venue:** {venue}",
        team = ctx.display_name,
        tournament = fixture.tournament_name,
        opponent = fixture.opponent(ctx.team_id, &ctx.team_name),
        venue = fixture.venue,
    )
}

fn today(fixture: &Fixture, ctx: &FormatContext) -> String {
    format!(
        "🔥 **{team} plays today!**\n\
         🏆 **Tournament:** {tournament}\n\
         ⚔️ **Opponent:** {opponent}\n\
         ⏰ **Kickoff:** {time}\n\
         📍 **Venue:** {venue}",
        team = ctx.display_name,
        tournament = fixture.tournament_name,
        opponent = fixture.opponent(ctx.team_id, &ctx.team_name),
        time = local_time_label(fixture.kickoff, ctx.timezone),
        venue = fixture.venue,
    )
}

fn upcoming(fixture: &Fixture, days_until: i64, ctx: &FormatContext) -> String {
    format!(
        "⚽ **Next {team} match:**\n\
         🏆 **Tournament:** {tournament}\n\
         🏠 **Home:** {home}\n\
         🛫 **Away:** {away}\n\
         📍 **Venue:** {venue}\n\
         ⏰ **Kickoff:** {kickoff}\n\
         📅 **Days remaining:** {days_until} day(s)",
        team = ctx.display_name,
        tournament = fixture.tournament_name,
        home = fixture.home_team,
        away = fixture.away_team,
        venue = fixture.venue,
        kickoff = local_datetime_label(fixture.kickoff, ctx.timezone),
    )
}

fn no_fixture(ctx: &FormatContext) -> String {
    format!("No upcoming fixture found for {}.", ctx.display_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use chrono_tz::America::Sao_Paulo;

    fn ctx() -> FormatContext {
        FormatContext {
            team_id: 1,
            team_name: "Tracked FC".to_string(),
            display_name: "Tracked".to_string(),
            timezone: Sao_Paulo,
        }
    }

    fn fixture() -> Fixture {
        Fixture {
            tournament_name: "League A".to_string(),
            home_team: "Tracked FC".to_string(),
            away_team: "Rival FC".to_string(),
            home_team_id: Some(1),
            away_team_id: Some(2),
            venue: "City Arena".to_string(),
            // 18:00 in São Paulo
            kickoff: Utc.with_ymd_and_hms(2026, 10, 22, 21, 0, 0).unwrap(),
        }
    }

    fn upcoming_classification() -> TemporalClassification {
        TemporalClassification {
            is_today: false,
            is_kickoff_minute: false,
            days_until: 3,
        }
    }

    #[test]
    fn test_kickoff_alert_text() {
        let text = format(NotificationDecision::KickoffAlert, Some(&fixture()), None, &ctx());
        assert!(text.starts_with("🚨 **Kickoff!** The Tracked match has just started!"));
        assert!(text.contains("**Opponent:** Rival FC"));
        assert!(text.contains("**Tournament:** League A"));
        assert!(text.contains("**Venue:** City Arena"));
    }

    #[test]
    fn test_today_text_shows_local_time() {
        let text = format(
            NotificationDecision::DailyDigestToday,
            Some(&fixture()),
            None,
            &ctx(),
        );
        assert!(text.starts_with("🔥 **Tracked plays today!**"));
        assert!(text.contains("**Kickoff:** 18:00"));
        assert!(text.contains("**Opponent:** Rival FC"));
    }

    #[test]
    fn test_today_variants_render_alike() {
        let f = fixture();
        assert_eq!(
            format(NotificationDecision::DailyDigestToday, Some(&f), None, &ctx()),
            format(NotificationDecision::OnDemandToday, Some(&f), None, &ctx())
        );
    }

    #[test]
    fn test_upcoming_text() {
        let c = upcoming_classification();
        let text = format(
            NotificationDecision::OnDemandUpcoming,
            Some(&fixture()),
            Some(&c),
            &ctx(),
        );
        assert_eq!(
            text,
            "⚽ **Next Tracked match:**\n\
             🏆 **Tournament:** League A\n\
             🏠 **Home:** Tracked FC\n\
             🛫 **Away:** Rival FC\n\
             📍 **Venue:** City Arena\n\
             ⏰ **Kickoff:** 22/10/2026 18:00\n\
             📅 **Days remaining:** 3 day(s)"
        );
    }

    #[test]
    fn test_none_text() {
        let expected = "No upcoming fixture found for Tracked.";
        assert_eq!(
            format(NotificationDecision::DailyDigestNone, None, None, &ctx()),
            expected
        );
        assert_eq!(
            format(NotificationDecision::OnDemandNone, Some(&fixture()), None, &ctx()),
            expected
        );
        // A fixture decision without a fixture degrades to the none text.
        assert_eq!(
            format(NotificationDecision::KickoffAlert, None, None, &ctx()),
            expected
        );
    }

    #[test]
    fn test_format_is_deterministic() {
        let f = fixture();
        let c = upcoming_classification();
        let first = format(NotificationDecision::DailyDigestUpcoming, Some(&f), Some(&c), &ctx());
        let second = format(NotificationDecision::DailyDigestUpcoming, Some(&f), Some(&c), &ctx());
        assert_eq!(first, second);
    }
}
