// src/service.rs
//
// Composes the pure engine with the boundary API. Every entry point is a
// fresh request/response pass: fetch, transform, and hand back read-only
// projections. Permission checks here are an optimistic pre-check only; the
// boundary re-validates and its response is the only state we trust.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::boundary::BoundaryApi;
use crate::engine::EngineError;
use crate::engine::aggregate::{StatusGroup, merge_batches};
use crate::engine::range::{RangeFilter, classify};
use crate::engine::slots::SlotGrid;
use crate::engine::status::{
    AppointmentAction, AppointmentStatus, Permissions, allowed_actions, next_status, status_label,
};
use crate::engine::temporal::{is_unscheduled, try_resolve_instant};
use crate::middleware::actor_context::ActorContext;
use crate::models::{AnnotatedAppointment, AppointmentView};

pub struct AppointmentService {
    boundary: Arc<dyn BoundaryApi>,
    grid: SlotGrid,
}

impl AppointmentService {
    pub fn new(boundary: Arc<dyn BoundaryApi>, grid: SlotGrid) -> Self {
        Self { boundary, grid }
    }

    /// A logical filter can cover several backend statuses, so fetch once
    /// per underlying status and merge. Batch completion order does not
    /// matter; the merge is order-insensitive.
    pub async fn list_by_group(
        &self,
        group: StatusGroup,
        range: RangeFilter,
        viewer: &ActorContext,
    ) -> Result<Vec<AnnotatedAppointment>, EngineError> {
        let mut batches = Vec::with_capacity(group.statuses().len());
        for status in group.statuses() {
            batches.push(self.boundary.fetch_by_status(*status).await?);
        }
        let now = Utc::now();
        let merged = merge_batches(batches, range, now);
        debug!(?group, ?range, count = merged.len(), "merged status batches");
        Ok(merged.into_iter().map(|v| self.annotate(v, viewer, now)).collect())
    }

    pub async fn list_by_range(
        &self,
        range: RangeFilter,
        viewer: &ActorContext,
    ) -> Result<Vec<AnnotatedAppointment>, EngineError> {
        let batch = self.boundary.fetch_by_range(range).await?;
        let now = Utc::now();
        // Residual filter still applies: the backend range may be coarser.
        let merged = merge_batches(vec![batch], range, now);
        Ok(merged.into_iter().map(|v| self.annotate(v, viewer, now)).collect())
    }

    /// The boundary has no fetch-by-id; a record missing from the latest
    /// full fetch is stale client state and reports `NotFound`, after which
    /// the caller must refresh its whole list.
    pub async fn get_appointment(
        &self,
        appointment_id: Uuid,
        viewer: &ActorContext,
    ) -> Result<AnnotatedAppointment, EngineError> {
        let view = self.find(appointment_id).await?;
        Ok(self.annotate(view, viewer, Utc::now()))
    }

    /// Pre-checks the transition locally so an illegal action never reaches
    /// the wire, then submits and returns only what the boundary answered.
    pub async fn apply_transition(
        &self,
        appointment_id: Uuid,
        action: AppointmentAction,
        actor: &ActorContext,
    ) -> Result<AnnotatedAppointment, EngineError> {
        let current = self.find(appointment_id).await?;
        if let Err(err) = next_status(current.status, actor.role, action) {
            warn!(%appointment_id, status = %current.status, %action, "transition rejected before submit");
            return Err(err);
        }

        let updated = self
            .boundary
            .submit_transition(appointment_id, actor.role, &actor.identity, action)
            .await?;
        Ok(self.annotate(updated, actor, Utc::now()))
    }

    /// Validates the target instant, re-checks slot freedom at confirmation
    /// time, then submits. A `SlotConflict` means the caller must re-fetch
    /// availability, not retry blindly.
    pub async fn reschedule(
        &self,
        appointment_id: Uuid,
        new_date: &str,
        new_time: &str,
        actor: &ActorContext,
    ) -> Result<AnnotatedAppointment, EngineError> {
        let current = self.find(appointment_id).await?;
        next_status(current.status, actor.role, AppointmentAction::Reschedule)?;

        // Unlike list paths, the target of a reschedule must parse.
        try_resolve_instant(new_date, new_time)?;

        let free = self
            .boundary
            .fetch_available_slots(current.doctor_id, new_date)
            .await?;
        let occupied: HashSet<String> = self
            .grid
            .times()
            .iter()
            .filter(|t| !free.contains(*t))
            .cloned()
            .collect();
        if !self.grid.is_slot_free(&occupied, new_time) {
            return Err(EngineError::SlotConflict {
                date: new_date.to_string(),
                time: new_time.to_string(),
            });
        }

        let replacement = self
            .boundary
            .submit_reschedule(appointment_id, new_date, new_time, actor.role, &actor.identity)
            .await?;
        Ok(self.annotate(replacement, actor, Utc::now()))
    }

    pub async fn available_slots(
        &self,
        doctor_id: Uuid,
        date: &str,
    ) -> Result<Vec<String>, EngineError> {
        NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| {
            EngineError::InvalidTime {
                date: date.to_string(),
                time: String::new(),
            }
        })?;
        self.boundary.fetch_available_slots(doctor_id, date).await
    }

    async fn find(&self, appointment_id: Uuid) -> Result<AppointmentView, EngineError> {
        let all = self.boundary.fetch_by_range(RangeFilter::All).await?;
        all.into_iter()
            .find(|a| a.appointment_id == appointment_id)
            .ok_or(EngineError::NotFound(appointment_id))
    }

    fn annotate(
        &self,
        view: AppointmentView,
        viewer: &ActorContext,
        now: DateTime<Utc>,
    ) -> AnnotatedAppointment {
        let starts_at = view.starts_at();
        AnnotatedAppointment {
            starts_at,
            bucket: classify(starts_at, now),
            unscheduled: is_unscheduled(starts_at),
            allowed_actions: allowed_actions(view.status, viewer.role)
                .into_iter()
                .map(|a| a.verb().to_string())
                .collect(),
            permissions: Permissions::for_status(view.status),
            status_label: status_label(view.status, &view.status_changed_by, &viewer.identity),
            view,
        }
    }
}

// Keeps the helper close to its only non-test consumer (main).
pub fn seed_view(
    doctor_id: Uuid,
    patient_id: Uuid,
    date: &str,
    time: &str,
    status: AppointmentStatus,
) -> AppointmentView {
    AppointmentView {
        appointment_id: Uuid::new_v4(),
        patient_id,
        doctor_id,
        patient_name: "Pat Doe".to_string(),
        doctor_name: "Dr. Lee".to_string(),
        date: date.to_string(),
        time: time.to_string(),
        reason: "consultation".to_string(),
        status,
        status_changed_at: Utc::now(),
        status_changed_by: "system".to_string(),
    }
}
