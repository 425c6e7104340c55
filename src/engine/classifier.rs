//! Timezone-aware classification of a fixture against "now".

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::data::Fixture;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Where a fixture sits relative to the current instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemporalClassification {
    /// Kickoff and now share a calendar date in the configured timezone.
    pub is_today: bool,
    /// Kickoff and now share date, hour and minute in the configured timezone.
    pub is_kickoff_minute: bool,
    /// Ceiling of the remaining time in whole days. Zero or negative once
    /// the kickoff instant has passed.
    pub days_until: i64,
}

pub fn classify(fixture: &Fixture, now: DateTime<Utc>, tz: Tz) -> TemporalClassification {
    let kickoff_local = tz.from_utc_datetime(&fixture.kickoff.naive_utc());
    let now_local = tz.from_utc_datetime(&now.naive_utc());

    TemporalClassification {
        is_today: kickoff_local.date_naive() == now_local.date_naive(),
        is_kickoff_minute: minute_key(&kickoff_local) == minute_key(&now_local),
        days_until: days_until(fixture.kickoff, now),
    }
}

/// Local date-time truncated to the minute.
fn minute_key(dt: &DateTime<Tz>) -> (NaiveDate, u32, u32) {
    (dt.date_naive(), dt.hour(), dt.minute())
}

/// Ceiling division of the remaining milliseconds by one day.
pub fn days_until(kickoff: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let remaining = (kickoff - now).num_milliseconds();
    let whole = remaining / MILLIS_PER_DAY;
    // Integer division truncates toward zero, which is already the ceiling
    // for negative values.
    if remaining > 0 && remaining % MILLIS_PER_DAY != 0 {
        whole + 1
    } else {
        whole
    }
}

/// Kickoff hour and minute in the configured timezone, e.g. `18:00`.
pub fn local_time_label(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%H:%M").to_string()
}

/// Kickoff date and time in the configured timezone, e.g. `19/10/2026 18:00`.
pub fn local_datetime_label(instant: DateTime<Utc>, tz: Tz) -> String {
    let local = instant.with_timezone(&tz);
    format!(
        "{:02}/{:02}/{} {}",
        local.day(),
        local.month(),
        local.year(),
        local.format("%H:%M")
    )
}
