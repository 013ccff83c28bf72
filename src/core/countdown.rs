use chrono::{DateTime, NaiveDateTime, Utc};

pub const COUNTDOWN_TBD: &str = "T- TBD";
pub const DATE_TBD: &str = "TBD";

/// Parses a Launch Library NET timestamp; naive timestamps are taken as UTC.
pub fn parse_net(net: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = net?.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// `T-` while the target is ahead of `now` (or equal), `T+` once it has passed.
pub fn format_countdown(target: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(target) = target else {
        return COUNTDOWN_TBD.to_string();
    };

    let delta = (target - now).num_seconds();
    let sign = if delta >= 0 { '-' } else { '+' };
    let seconds = delta.unsigned_abs();
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    format!("T{}{}h {}m", sign, hours, minutes)
}

pub fn format_launch_date(target: Option<DateTime<Utc>>) -> String {
    target
        .map(|dt| dt.format("%b %d, %Y %H:%M UTC").to_string())
        .unwrap_or_else(|| DATE_TBD.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_zulu_offset_and_naive() {
        let expected = Utc.with_ymd_and_hms(2025, 6, 1, 14, 30, 0).unwrap();
        assert_eq!(parse_net(Some("2025-06-01T14:30:00Z")), Some(expected));
        assert_eq!(parse_net(Some("2025-06-01T10:30:00-04:00")), Some(expected));
        assert_eq!(parse_net(Some("2025-06-01T14:30:00")), Some(expected));
        assert_eq!(parse_net(Some("2025-06-01T14:30:00.000Z")), Some(expected));
    }

    #[test]
    fn test_parse_failures() {
        assert_eq!(parse_net(None), None);
        assert_eq!(parse_net(Some("")), None);
        assert_eq!(parse_net(Some("next tuesday")), None);
        assert_eq!(parse_net(Some("2025-13-45T99:00:00Z")), None);
    }

    #[test]
    fn test_countdown_future() {
        let target = parse_net(Some("2025-06-01T18:42:30Z"));
        assert_eq!(format_countdown(target, now()), "T-18h 42m");
    }

    #[test]
    fn test_countdown_past() {
        let target = parse_net(Some("2025-05-31T22:30:00Z"));
        assert_eq!(format_countdown(target, now()), "T+1h 30m");
    }

    #[test]
    fn test_countdown_now_and_multi_day() {
        assert_eq!(format_countdown(Some(now()), now()), "T-0h 0m");
        let target = parse_net(Some("2025-06-03T01:05:00Z"));
        assert_eq!(format_countdown(target, now()), "T-49h 5m");
    }

    #[test]
    fn test_unparseable_timestamp_is_tbd() {
        assert_eq!(format_countdown(parse_net(Some("garbage")), now()), COUNTDOWN_TBD);
        assert_eq!(format_countdown(None, now()), "T- TBD");
    }

    #[test]
    fn test_launch_date_format() {
        let target = parse_net(Some("2025-06-01T14:30:00Z"));
        assert_eq!(format_launch_date(target), "Jun 01, 2025 14:30 UTC");
        assert_eq!(format_launch_date(None), "TBD");
    }
}
