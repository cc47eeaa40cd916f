//! Display helpers derived from story fields. Pure, never fail.

use chrono::{DateTime, Utc};
use url::Url;

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;
const MONTH_MS: i64 = 30 * DAY_MS;
const YEAR_MS: i64 = 365 * DAY_MS;

/// Host part of `url` without a leading `www.`, or an empty string when the
/// url is absent, unparsable or has no host.
pub fn hostname_of(url: Option<&str>) -> String {
    let Some(raw) = url else {
        return String::new();
    };
    match Url::parse(raw.trim()) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => host.strip_prefix("www.").unwrap_or(host).to_owned(),
            None => String::new(),
        },
        Err(_) => String::new(),
    }
}

/// "5 minutes ago" style age of a Unix timestamp (seconds), relative to now.
pub fn relative_age(timestamp_secs: i64) -> String {
    relative_age_at(timestamp_secs, Utc::now())
}

pub fn relative_age_at(timestamp_secs: i64, now: DateTime<Utc>) -> String {
    let elapsed = now
        .timestamp_millis()
        .saturating_sub(timestamp_secs.saturating_mul(1000));

    if elapsed < MINUTE_MS {
        return "just now".to_owned();
    }

    let (count, unit) = if elapsed < HOUR_MS {
        (elapsed / MINUTE_MS, "minute")
    } else if elapsed < DAY_MS {
        (elapsed / HOUR_MS, "hour")
    } else if elapsed < MONTH_MS {
        (elapsed / DAY_MS, "day")
    } else if elapsed < YEAR_MS {
        (elapsed / MONTH_MS, "month")
    } else {
        (elapsed / YEAR_MS, "year")
    };

    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}
