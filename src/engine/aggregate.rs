// src/engine/aggregate.rs
//
// Merges appointment batches fetched under different criteria into one
// deduplicated, soonest-first list. Merging is commutative and idempotent so
// concurrent fetches may land in any order and a merge may be re-run safely.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::range::RangeFilter;
use crate::engine::status::AppointmentStatus;
use crate::models::AppointmentView;

/// Logical UI filter over statuses. A single filter value can fan out to
/// several backend statuses, so callers fetch once per underlying status and
/// merge rather than assuming a 1:1 mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusGroup {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl StatusGroup {
    pub fn statuses(&self) -> &'static [AppointmentStatus] {
        match self {
            StatusGroup::Pending => &[AppointmentStatus::Booked, AppointmentStatus::Scheduled],
            StatusGroup::Confirmed => &[AppointmentStatus::Confirmed],
            StatusGroup::InProgress => &[AppointmentStatus::InProgress],
            StatusGroup::Completed => &[AppointmentStatus::Completed],
            StatusGroup::Cancelled => &[
                AppointmentStatus::CancelledByPatient,
                AppointmentStatus::CancelledByDoctor,
                AppointmentStatus::Cancelled,
            ],
        }
    }
}

/// Deduplicate by appointment id (first occurrence wins), reapply the
/// requested range the backend fetch may have been too coarse for, and sort
/// ascending by resolved instant. The sort is stable and zero-instant
/// records order first, so malformed data surfaces at the top of the list
/// instead of sinking silently.
pub fn merge_batches(
    batches: Vec<Vec<AppointmentView>>,
    range: RangeFilter,
    now: DateTime<Utc>,
) -> Vec<AppointmentView> {
    let mut seen = HashSet::new();
    let mut merged: Vec<AppointmentView> = Vec::new();

    for batch in batches {
        for appointment in batch {
            if seen.insert(appointment.appointment_id) {
                merged.push(appointment);
            }
        }
    }

    merged.retain(|a| range.matches(a.starts_at(), now));
    merged.sort_by_key(|a| a.starts_at());
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::status::AppointmentStatus;
    use crate::engine::temporal::resolve_instant;
    use uuid::Uuid;

    fn appt(date: &str, time: &str, status: AppointmentStatus) -> AppointmentView {
        AppointmentView {
            appointment_id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            doctor_id: Uuid::new_v4(),
            patient_name: "Pat Example".to_string(),
            doctor_name: "Dr. Lee".to_string(),
            date: date.to_string(),
            time: time.to_string(),
            reason: "checkup".to_string(),
            status,
            status_changed_at: resolve_instant(date, time),
            status_changed_by: "system".to_string(),
        }
    }

    fn now() -> DateTime<Utc> {
        resolve_instant("2024-03-10", "08:00")
    }

    #[test]
    fn duplicates_collapse_to_first_occurrence_regardless_of_batch_order() {
        let x = appt("2024-03-10", "09:00", AppointmentStatus::Booked);
        let batches = vec![vec![x.clone(), x.clone()], vec![x.clone()]];
        let merged = merge_batches(batches, RangeFilter::All, now());
        assert_eq!(merged.len(), 1);

        let swapped = merge_batches(vec![vec![x.clone()], vec![x.clone(), x.clone()]], RangeFilter::All, now());
        assert_eq!(merged[0].appointment_id, swapped[0].appointment_id);
    }

    #[test]
    fn remerging_a_merged_list_is_a_noop() {
        let a = appt("2024-03-10", "09:00", AppointmentStatus::Booked);
        let b = appt("2024-03-11", "10:30", AppointmentStatus::Scheduled);
        let merged = merge_batches(vec![vec![a], vec![b]], RangeFilter::All, now());
        let remerged = merge_batches(vec![merged.clone()], RangeFilter::All, now());
        let ids: Vec<_> = merged.iter().map(|a| a.appointment_id).collect();
        let re_ids: Vec<_> = remerged.iter().map(|a| a.appointment_id).collect();
        assert_eq!(ids, re_ids);
    }

    #[test]
    fn sorts_soonest_first_with_malformed_records_surfacing_on_top() {
        let late = appt("2024-03-12", "16:00", AppointmentStatus::Scheduled);
        let early = appt("2024-03-10", "09:00", AppointmentStatus::Booked);
        let broken = appt("not-a-date", "whenever", AppointmentStatus::Booked);

        let merged = merge_batches(
            vec![vec![late.clone()], vec![early.clone(), broken.clone()]],
            RangeFilter::All,
            now(),
        );
        let ids: Vec<_> = merged.iter().map(|a| a.appointment_id).collect();
        assert_eq!(
            ids,
            vec![broken.appointment_id, early.appointment_id, late.appointment_id]
        );
    }

    #[test]
    fn residual_range_filter_drops_out_of_range_but_keeps_unscheduled() {
        let today = appt("2024-03-10", "14:00", AppointmentStatus::Confirmed);
        let tomorrow = appt("2024-03-11", "09:00", AppointmentStatus::Booked);
        let broken = appt("??", "??", AppointmentStatus::Booked);

        let merged = merge_batches(
            vec![vec![today.clone(), tomorrow, broken.clone()]],
            RangeFilter::Today,
            now(),
        );
        let ids: Vec<_> = merged.iter().map(|a| a.appointment_id).collect();
        assert_eq!(ids, vec![broken.appointment_id, today.appointment_id]);
    }

    #[test]
    fn pending_group_expands_to_booked_and_scheduled() {
        assert_eq!(
            StatusGroup::Pending.statuses(),
            &[AppointmentStatus::Booked, AppointmentStatus::Scheduled]
        );
        assert_eq!(StatusGroup::Cancelled.statuses().len(), 3);
    }
}
