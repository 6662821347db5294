// src/engine/range.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::temporal::is_unscheduled;

/// Dashboard bucket of an appointment relative to "now". Same-day items are
/// `Today` regardless of clock time, so a morning appointment that has not
/// been completed yet does not sink into `Past` on the afternoon dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeBucket {
    Today,
    Upcoming,
    Past,
}

/// Note: the zero instant of a malformed record lands in `Past` here; the
/// annotation layer carries a separate unscheduled flag for those.
pub fn classify(instant: DateTime<Utc>, now: DateTime<Utc>) -> TimeBucket {
    if instant.date_naive() == now.date_naive() {
        TimeBucket::Today
    } else if instant >= now {
        TimeBucket::Upcoming
    } else {
        TimeBucket::Past
    }
}

/// Strict past/future facet for list views that treat `Today` as an
/// overlapping dimension rather than a third bucket. An appointment at the
/// current second counts as upcoming.
pub fn is_upcoming(instant: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    instant >= now
}

/// Range a caller asked for. Applied residually after merging when the
/// backend fetch was coarser than the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RangeFilter {
    Today,
    Upcoming,
    All,
}

impl RangeFilter {
    /// Unscheduled (zero-instant) records always match: malformed data must
    /// surface in the list, never silently drop out of it.
    pub fn matches(self, instant: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        if is_unscheduled(instant) {
            return true;
        }
        match self {
            RangeFilter::Today => instant.date_naive() == now.date_naive(),
            RangeFilter::Upcoming => is_upcoming(instant, now),
            RangeFilter::All => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::temporal::{ZERO_INSTANT, resolve_instant};

    fn at(date: &str, time: &str) -> DateTime<Utc> {
        resolve_instant(date, time)
    }

    #[test]
    fn same_day_beats_past_and_future() {
        let now = at("2024-03-10", "08:00");
        assert_eq!(classify(at("2024-03-10", "09:00"), now), TimeBucket::Today);
        // earlier today, not yet completed: still Today, not Past
        assert_eq!(classify(at("2024-03-10", "07:00"), now), TimeBucket::Today);
        assert_eq!(classify(at("2024-03-11", "09:00"), now), TimeBucket::Upcoming);
        assert_eq!(classify(at("2024-03-09", "09:00"), now), TimeBucket::Past);
    }

    #[test]
    fn current_second_is_upcoming_not_past() {
        let now = at("2024-03-10", "08:00");
        assert!(is_upcoming(now, now));
        assert!(!is_upcoming(at("2024-03-10", "07:59:59"), now));
    }

    #[test]
    fn range_filter_never_drops_unscheduled_records() {
        let now = at("2024-03-10", "08:00");
        for filter in [RangeFilter::Today, RangeFilter::Upcoming, RangeFilter::All] {
            assert!(filter.matches(ZERO_INSTANT, now));
        }
        assert!(!RangeFilter::Today.matches(at("2024-03-11", "09:00"), now));
        assert!(!RangeFilter::Upcoming.matches(at("2024-03-09", "09:00"), now));
    }
}
