//! Notification scheduler.
//!
//! [`Notifier`] runs one firing of a trigger: fetch, classify, decide,
//! render and deliver. The periodic loops in [`runner`] call it on their
//! cadence; the command server calls [`Notifier::on_demand`].

pub mod runner;
pub mod timing;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::data::{Fixture, FixtureSource};
use crate::delivery::{Channel, DeliveryError};
use crate::engine::decision::{digest_decision, on_demand_decision};
use crate::engine::{classify, format, FormatContext, KickoffGuard, NotificationDecision, Trigger};
use crate::monitoring::health::HealthState;

/// Answer to an on-demand request.
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    pub decision: NotificationDecision,
    pub text: String,
}

pub struct Notifier {
    source: Arc<dyn FixtureSource>,
    channel: Arc<dyn Channel>,
    ctx: FormatContext,
    channel_name: String,
    command_token: String,
    digest_when_absent: bool,
    health: HealthState,
}

impl Notifier {
    pub fn new(
        config: &AppConfig,
        source: Arc<dyn FixtureSource>,
        channel: Arc<dyn Channel>,
        health: HealthState,
    ) -> Self {
        Self {
            source,
            channel,
            ctx: FormatContext::from_config(config),
            channel_name: config.delivery.channel.clone(),
            command_token: config.command.token.to_lowercase(),
            digest_when_absent: config.schedule.digest_when_absent,
            health,
        }
    }

    pub fn health(&self) -> &HealthState {
        &self.health
    }

    /// Case-insensitive match against the configured command token.
    pub fn matches_command(&self, content: &str) -> bool {
        content.trim().to_lowercase() == self.command_token
    }

    /// Daily digest firing. Returns the decision that was delivered, or
    /// `None` when the firing was skipped.
    pub async fn run_daily_digest(&self, now: DateTime<Utc>) -> Option<NotificationDecision> {
        let fixture = self.current_fixture(Trigger::DailyDigest).await;
        let classification = fixture.as_ref().map(|f| classify(f, now, self.ctx.timezone));
        let decision = digest_decision(classification.as_ref());

        let outcome = if decision == NotificationDecision::DailyDigestNone && !self.digest_when_absent
        {
            info!(trigger = %Trigger::DailyDigest, "No fixture — digest skipped");
            None
        } else {
            let text = format(decision, fixture.as_ref(), classification.as_ref(), &self.ctx);
            self.deliver(Trigger::DailyDigest, decision, &text).await;
            Some(decision)
        };

        self.health.record(Trigger::DailyDigest, now, outcome).await;
        outcome
    }

    /// Kickoff-watch firing. `guard` holds the last alerted kickoff and is
    /// owned by the caller's loop.
    pub async fn run_kickoff_watch(
        &self,
        guard: &mut KickoffGuard,
        now: DateTime<Utc>,
    ) -> Option<NotificationDecision> {
        let Some(fixture) = self.current_fixture(Trigger::KickoffWatch).await else {
            self.health.record(Trigger::KickoffWatch, now, None).await;
            return None;
        };

        let classification = classify(&fixture, now, self.ctx.timezone);
        let decision = guard.check(&fixture, &classification);

        if let Some(decision) = decision {
            info!(
                kickoff = %fixture.kickoff,
                home = %fixture.home_team,
                away = %fixture.away_team,
                "Kickoff minute reached"
            );
            let text = format(decision, Some(&fixture), Some(&classification), &self.ctx);
            self.deliver(Trigger::KickoffWatch, decision, &text).await;
            self.health.record_kickoff_alert(fixture.kickoff).await;
        }

        self.health.record(Trigger::KickoffWatch, now, decision).await;
        decision
    }

    /// On-demand firing. The reply goes back to the requester; nothing is
    /// posted to the configured channel.
    pub async fn on_demand(&self, now: DateTime<Utc>) -> Reply {
        let fixture = self.current_fixture(Trigger::OnDemand).await;
        let classification = fixture.as_ref().map(|f| classify(f, now, self.ctx.timezone));
        let decision = on_demand_decision(classification.as_ref());
        let text = format(decision, fixture.as_ref(), classification.as_ref(), &self.ctx);

        info!(trigger = %Trigger::OnDemand, %decision, "On-demand reply");
        self.health.record(Trigger::OnDemand, now, Some(decision)).await;

        Reply { decision, text }
    }

    /// Fetch the next fixture, folding absence and failures into `None`.
    async fn current_fixture(&self, trigger: Trigger) -> Option<Fixture> {
        match self.source.next_fixture(self.ctx.team_id).await {
            Ok(Some(fixture)) => Some(fixture),
            Ok(None) => {
                info!(
                    %trigger,
                    source = self.source.name(),
                    team_id = self.ctx.team_id,
                    "No fixture scheduled"
                );
                None
            }
            Err(e) => {
                warn!(
                    %trigger,
                    source = self.source.name(),
                    error = %e,
                    "Fixture fetch failed"
                );
                None
            }
        }
    }

    async fn deliver(&self, trigger: Trigger, decision: NotificationDecision, text: &str) {
        match self.channel.deliver(&self.channel_name, text).await {
            Ok(()) => info!(%trigger, %decision, channel = %self.channel_name, "Notification sent"),
            Err(DeliveryError::ChannelUnresolved(name)) => {
                warn!(%trigger, %decision, channel = %name, "Channel not found — notification dropped")
            }
            Err(e) => warn!(%trigger, %decision, error = %e, "Failed to send notification"),
        }
    }
}
