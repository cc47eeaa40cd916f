use chrono::{TimeZone, Utc};
use hn_core::{hostname_of, relative_age, relative_age_at};

#[test]
fn hostname_strips_www_prefix() {
    assert_eq!(hostname_of(Some("https://www.example.com/a")), "example.com");
    assert_eq!(hostname_of(Some("http://blog.example.org/post?id=1")), "blog.example.org");
}

#[test]
fn hostname_is_empty_for_missing_or_bad_urls() {
    assert_eq!(hostname_of(None), "");
    assert_eq!(hostname_of(Some("not a url")), "");
    assert_eq!(hostname_of(Some("")), "");
    // Parses, but there is no host to show.
    assert_eq!(hostname_of(Some("mailto:someone@example.com")), "");
}

#[test]
fn relative_age_buckets() {
    let now = Utc.with_ymd_and_hms(2024, 10, 21, 12, 0, 0).unwrap();
    let ts = now.timestamp();

    assert_eq!(relative_age_at(ts - 10, now), "just now");
    assert_eq!(relative_age_at(ts - 60, now), "1 minute ago");
    assert_eq!(relative_age_at(ts - 5 * 60, now), "5 minutes ago");
    assert_eq!(relative_age_at(ts - 3600, now), "1 hour ago");
    assert_eq!(relative_age_at(ts - 23 * 3600, now), "23 hours ago");
    assert_eq!(relative_age_at(ts - 2 * 86_400, now), "2 days ago");
    assert_eq!(relative_age_at(ts - 45 * 86_400, now), "1 month ago");
    assert_eq!(relative_age_at(ts - 800 * 86_400, now), "2 years ago");
}

#[test]
fn relative_age_of_future_timestamp_is_just_now() {
    let now = Utc.with_ymd_and_hms(2024, 10, 21, 12, 0, 0).unwrap();
    assert_eq!(relative_age_at(now.timestamp() + 600, now), "just now");
}

#[test]
fn relative_age_uses_current_clock() {
    let an_hour_ago = Utc::now().timestamp() - 3600 - 30;
    assert_eq!(relative_age(an_hour_ago), "1 hour ago");
}
