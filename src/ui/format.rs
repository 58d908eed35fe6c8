//! Human-readable formatting helpers.

use chrono::{DateTime, Local, Utc};

/// Format a timestamp relative to now ("5 minutes ago", "yesterday").
pub fn format_relative_time(timestamp: DateTime<Utc>) -> String {
    let seconds = Utc::now().signed_duration_since(timestamp).num_seconds();

    if seconds < 60 {
        return "just now".to_string();
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return plural(minutes, "minute");
    }

    let hours = minutes / 60;
    if hours < 24 {
        return plural(hours, "hour");
    }

    let days = hours / 24;
    if days == 1 {
        return "yesterday".to_string();
    }
    if days < 30 {
        return plural(days, "day");
    }

    let months = days / 30;
    if months < 12 {
        return plural(months, "month");
    }

    plural(months / 12, "year")
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

/// Format a timestamp in local time.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Keep the last `max` characters of `text`, prefixed with an ellipsis.
pub fn truncate_left(text: &str, max: usize) -> String {
    let count = text.chars().count();
    if count <= max {
        return text.to_string();
    }
    let tail: String = text.chars().skip(count - max.saturating_sub(1)).collect();
    format!("…{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn relative_time_just_now() {
        assert_eq!(format_relative_time(Utc::now()), "just now");
    }

    #[test]
    fn relative_time_future_is_just_now() {
        assert_eq!(
            format_relative_time(Utc::now() + Duration::hours(1)),
            "just now"
        );
    }

    #[test]
    fn relative_time_minutes_and_hours() {
        assert_eq!(
            format_relative_time(Utc::now() - Duration::minutes(5)),
            "5 minutes ago"
        );
        assert_eq!(
            format_relative_time(Utc::now() - Duration::minutes(61)),
            "1 hour ago"
        );
    }

    #[test]
    fn relative_time_days() {
        assert_eq!(
            format_relative_time(Utc::now() - Duration::hours(25)),
            "yesterday"
        );
        assert_eq!(
            format_relative_time(Utc::now() - Duration::days(3)),
            "3 days ago"
        );
    }

    #[test]
    fn relative_time_months_and_years() {
        assert_eq!(
            format_relative_time(Utc::now() - Duration::days(65)),
            "2 months ago"
        );
        assert_eq!(
            format_relative_time(Utc::now() - Duration::days(400)),
            "1 year ago"
        );
    }

    #[test]
    fn truncate_left_keeps_tail() {
        assert_eq!(truncate_left("short", 10), "short");
        let out = truncate_left("/home/user/projects/api", 10);
        assert_eq!(out.chars().count(), 10);
        assert!(out.ends_with("jects/api"));
        assert!(out.starts_with('…'));
    }
}
