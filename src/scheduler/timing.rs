//! Wall-clock fire times for the periodic triggers.

use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Next instant strictly after `after` at which the local clock in `tz`
/// reads `at`.
///
/// A local time skipped by a DST jump fires one hour later; a repeated
/// local time fires on its first occurrence.
pub fn next_daily_fire(after: DateTime<Utc>, tz: Tz, at: NaiveTime) -> DateTime<Utc> {
    let mut date = after.with_timezone(&tz).date_naive();

    // Today, tomorrow, and one spare day in case a DST jump swallows the
    // wall-clock time right at the boundary.
    for _ in 0..3 {
        if let Some(fire) = resolve_local(tz, date.and_time(at)) {
            if fire > after {
                return fire;
            }
        }
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }

    after + Duration::days(1)
}

fn resolve_local(tz: Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&local)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(local + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Next instant strictly after `after` that sits `offset_seconds` past a
/// whole minute.
pub fn next_minute_fire(after: DateTime<Utc>, offset_seconds: u64) -> DateTime<Utc> {
    let offset = offset_seconds.min(59) as i64;
    let secs = after.timestamp();
    let minute_start = secs - secs.rem_euclid(60);

    let mut candidate = minute_start + offset;
    if candidate <= secs {
        candidate += 60;
    }

    DateTime::<Utc>::from_timestamp(candidate, 0).unwrap_or(after + Duration::minutes(1))
}

/// Time left until `target`, zero when it has already passed.
pub fn wait_until(target: DateTime<Utc>, now: DateTime<Utc>) -> std::time::Duration {
    (target - now).to_std().unwrap_or(std::time::Duration::ZERO)
}
