// src/engine/temporal.rs
//
// Every view used to parse dates on its own, with different fallbacks; this
// is the single resolver they all go through now.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::warn;

use crate::engine::EngineError;

/// Sentinel for records whose date/time could not be parsed. Callers treat
/// it as "unscheduled"; it sorts before every real instant.
pub const ZERO_INSTANT: DateTime<Utc> = DateTime::<Utc>::UNIX_EPOCH;

pub fn is_unscheduled(instant: DateTime<Utc>) -> bool {
    instant == ZERO_INSTANT
}

/// Strict resolver: `date` must be `YYYY-MM-DD`, `time` either `HH:mm` or the
/// legacy `HH:mm:ss`. Used where an unparseable input must be rejected, e.g.
/// the target of a reschedule.
pub fn try_resolve_instant(date: &str, time: &str) -> Result<DateTime<Utc>, EngineError> {
    let date = date.trim();
    let time = time.trim();

    // Upstream has produced both HH:mm and HH:mm:ss; normalize to seconds.
    let stamp = if time.matches(':').count() == 1 {
        format!("{date}T{time}:00")
    } else {
        format!("{date}T{time}")
    };

    NaiveDateTime::parse_from_str(&stamp, "%Y-%m-%dT%H:%M:%S")
        .map(|dt| dt.and_utc())
        .map_err(|_| EngineError::InvalidTime {
            date: date.to_string(),
            time: time.to_string(),
        })
}

/// Total resolver used by list paths: falls back to midnight when only the
/// date parses, and to [`ZERO_INSTANT`] when nothing does. A malformed record
/// stays in the list instead of disappearing.
pub fn resolve_instant(date: &str, time: &str) -> DateTime<Utc> {
    if let Ok(instant) = try_resolve_instant(date, time) {
        return instant;
    }

    if let Ok(day) = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") {
        // Missing or malformed time: pin to midnight. and_hms_opt(0,0,0)
        // cannot fail for a valid date.
        return day.and_hms_opt(0, 0, 0).unwrap().and_utc();
    }

    warn!(date, time, "unparseable appointment date/time, using zero instant");
    ZERO_INSTANT
}

/// Collapse `HH:mm:ss` to the `HH:mm` form the slot grid speaks.
pub fn canonical_time(time: &str) -> &str {
    let time = time.trim();
    if time.len() == 8 && time.as_bytes()[5] == b':' {
        &time[..5]
    } else {
        time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_minutes_and_seconds_forms_identically() {
        let a = resolve_instant("2024-03-10", "09:00");
        let b = resolve_instant("2024-03-10", "09:00:00");
        assert_eq!(a, b);
        assert_eq!(a.to_rfc3339(), "2024-03-10T09:00:00+00:00");
    }

    #[test]
    fn resolve_is_monotonic_within_a_day() {
        let times = ["00:00", "08:15", "09:00", "13:30:15", "23:59"];
        for pair in times.windows(2) {
            assert!(
                resolve_instant("2024-03-10", pair[0]) < resolve_instant("2024-03-10", pair[1]),
                "{} should resolve before {}",
                pair[0],
                pair[1],
            );
        }
    }

    #[test]
    fn malformed_time_falls_back_to_midnight() {
        let resolved = resolve_instant("2024-03-10", "late morning");
        assert_eq!(resolved.to_rfc3339(), "2024-03-10T00:00:00+00:00");

        let missing = resolve_instant("2024-03-10", "");
        assert_eq!(missing, resolved);
    }

    #[test]
    fn fully_malformed_input_degrades_to_zero_instant() {
        let resolved = resolve_instant("someday", "sometime");
        assert_eq!(resolved, ZERO_INSTANT);
        assert!(is_unscheduled(resolved));
        assert!(!is_unscheduled(resolve_instant("2024-03-10", "09:00")));
    }

    #[test]
    fn strict_resolver_rejects_what_the_total_one_papers_over() {
        assert!(try_resolve_instant("2024-03-10", "09:00").is_ok());
        assert!(matches!(
            try_resolve_instant("2024-03-10", "noonish"),
            Err(EngineError::InvalidTime { .. })
        ));
        assert!(try_resolve_instant("tomorrow", "09:00").is_err());
    }

    #[test]
    fn canonical_time_strips_legacy_seconds() {
        assert_eq!(canonical_time("14:00:00"), "14:00");
        assert_eq!(canonical_time("14:00"), "14:00");
        assert_eq!(canonical_time(" 09:30 "), "09:30");
    }
}
