//! Health snapshot served on `/health`.
//!
//! Records when each trigger last fired and what it decided, so an external
//! uptime monitor can tell the scheduler loops are still alive.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::engine::{NotificationDecision, Trigger};

/// Shared health state updated by the trigger loops.
#[derive(Clone)]
pub struct HealthState {
    inner: Arc<RwLock<HealthData>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthData {
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub uptime_seconds: i64,
    pub last_alerted_kickoff: Option<DateTime<Utc>>,
    pub triggers: BTreeMap<String, TriggerRun>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TriggerRun {
    pub last_fired_at: DateTime<Utc>,
    /// `None` when the firing produced no notification.
    pub last_decision: Option<NotificationDecision>,
    pub fired_count: u64,
}

impl HealthState {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HealthData {
                status: "ok".to_string(),
                started_at: Utc::now(),
                uptime_seconds: 0,
                last_alerted_kickoff: None,
                triggers: BTreeMap::new(),
            })),
        }
    }

    pub async fn record(
        &self,
        trigger: Trigger,
        fired_at: DateTime<Utc>,
        decision: Option<NotificationDecision>,
    ) {
        let mut data = self.inner.write().await;
        let fired_count = data
            .triggers
            .get(&trigger.to_string())
            .map_or(0, |run| run.fired_count);
        data.triggers.insert(
            trigger.to_string(),
            TriggerRun {
                last_fired_at: fired_at,
                last_decision: decision,
                fired_count: fired_count + 1,
            },
        );
    }

    pub async fn record_kickoff_alert(&self, kickoff: DateTime<Utc>) {
        self.inner.write().await.last_alerted_kickoff = Some(kickoff);
    }

    pub async fn snapshot(&self) -> HealthData {
        let mut data = self.inner.read().await.clone();
        data.uptime_seconds = (Utc::now() - data.started_at).num_seconds();
        data
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}
