// src/boundary.rs
//
// The boundary API is the authoritative backend this gateway consumes: it
// owns persistence, arbitrates competing writers, and re-validates every
// transition independent of the gateway's optimistic pre-checks. Transport
// is an external concern, so the surface is a trait with the five operations
// the engine needs.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::engine::EngineError;
use crate::engine::range::RangeFilter;
use crate::engine::slots::SlotGrid;
use crate::engine::status::{ActorRole, AppointmentAction, AppointmentStatus, next_status};
use crate::engine::temporal::canonical_time;
use crate::models::AppointmentView;

#[async_trait]
pub trait BoundaryApi: Send + Sync {
    async fn fetch_by_status(
        &self,
        status: AppointmentStatus,
    ) -> Result<Vec<AppointmentView>, EngineError>;

    async fn fetch_by_range(&self, range: RangeFilter)
    -> Result<Vec<AppointmentView>, EngineError>;

    async fn fetch_available_slots(
        &self,
        doctor_id: Uuid,
        date: &str,
    ) -> Result<Vec<String>, EngineError>;

    /// Fails with `InvalidTransition` if the action is illegal at the moment
    /// the backend processes it, regardless of any client-side pre-check.
    async fn submit_transition(
        &self,
        appointment_id: Uuid,
        role: ActorRole,
        actor_identity: &str,
        action: AppointmentAction,
    ) -> Result<AppointmentView, EngineError>;

    /// Marks the original `RESCHEDULED` and returns the replacement
    /// instance; fails with `SlotConflict` if the slot is no longer free.
    async fn submit_reschedule(
        &self,
        appointment_id: Uuid,
        new_date: &str,
        new_time: &str,
        role: ActorRole,
        actor_identity: &str,
    ) -> Result<AppointmentView, EngineError>;
}

/// In-memory backend used by the tests and the demo binary. It enforces the
/// same rules a real backend would: transitions re-validated server-side,
/// slot occupancy decided by non-terminal appointments only.
pub struct InMemoryBoundary {
    grid: SlotGrid,
    appointments: Mutex<HashMap<Uuid, AppointmentView>>,
}

impl InMemoryBoundary {
    pub fn new(grid: SlotGrid) -> Self {
        Self {
            grid,
            appointments: Mutex::new(HashMap::new()),
        }
    }

    pub fn insert(&self, view: AppointmentView) {
        self.appointments
            .lock()
            .expect("boundary store poisoned")
            .insert(view.appointment_id, view);
    }

    fn occupied_slots(
        &self,
        store: &HashMap<Uuid, AppointmentView>,
        doctor_id: Uuid,
        date: &str,
        excluding: Option<Uuid>,
    ) -> std::collections::HashSet<String> {
        store
            .values()
            .filter(|a| {
                a.doctor_id == doctor_id
                    && a.date == date
                    && !a.status.is_terminal()
                    && a.status != AppointmentStatus::Rescheduled
                    && Some(a.appointment_id) != excluding
            })
            .map(|a| canonical_time(&a.time).to_string())
            .collect()
    }
}

#[async_trait]
impl BoundaryApi for InMemoryBoundary {
    async fn fetch_by_status(
        &self,
        status: AppointmentStatus,
    ) -> Result<Vec<AppointmentView>, EngineError> {
        let store = self.appointments.lock().expect("boundary store poisoned");
        Ok(store.values().filter(|a| a.status == status).cloned().collect())
    }

    async fn fetch_by_range(
        &self,
        range: RangeFilter,
    ) -> Result<Vec<AppointmentView>, EngineError> {
        let now = Utc::now();
        let store = self.appointments.lock().expect("boundary store poisoned");
        Ok(store
            .values()
            .filter(|a| range.matches(a.starts_at(), now))
            .cloned()
            .collect())
    }

    async fn fetch_available_slots(
        &self,
        doctor_id: Uuid,
        date: &str,
    ) -> Result<Vec<String>, EngineError> {
        let store = self.appointments.lock().expect("boundary store poisoned");
        let occupied = self.occupied_slots(&store, doctor_id, date, None);
        Ok(self.grid.available(&occupied))
    }

    async fn submit_transition(
        &self,
        appointment_id: Uuid,
        role: ActorRole,
        actor_identity: &str,
        action: AppointmentAction,
    ) -> Result<AppointmentView, EngineError> {
        let mut store = self.appointments.lock().expect("boundary store poisoned");
        let appointment = store
            .get_mut(&appointment_id)
            .ok_or(EngineError::NotFound(appointment_id))?;

        let next = next_status(appointment.status, role, action)?;
        appointment.status = next;
        appointment.status_changed_at = Utc::now();
        appointment.status_changed_by = actor_identity.to_string();
        info!(%appointment_id, %next, %role, "transition applied");
        Ok(appointment.clone())
    }

    async fn submit_reschedule(
        &self,
        appointment_id: Uuid,
        new_date: &str,
        new_time: &str,
        role: ActorRole,
        actor_identity: &str,
    ) -> Result<AppointmentView, EngineError> {
        let mut store = self.appointments.lock().expect("boundary store poisoned");
        let original = store
            .get(&appointment_id)
            .ok_or(EngineError::NotFound(appointment_id))?
            .clone();

        // Re-validate both the transition and the slot at confirmation time;
        // the occupied set may have changed since the caller picked the slot.
        next_status(original.status, role, AppointmentAction::Reschedule)?;

        let occupied =
            self.occupied_slots(&store, original.doctor_id, new_date, Some(appointment_id));
        if !self.grid.is_slot_free(&occupied, new_time) {
            return Err(EngineError::SlotConflict {
                date: new_date.to_string(),
                time: new_time.to_string(),
            });
        }

        let now = Utc::now();
        if let Some(stored) = store.get_mut(&appointment_id) {
            stored.status = AppointmentStatus::Rescheduled;
            stored.status_changed_at = now;
            stored.status_changed_by = actor_identity.to_string();
        }

        let replacement = AppointmentView {
            appointment_id: Uuid::new_v4(),
            patient_id: original.patient_id,
            doctor_id: original.doctor_id,
            patient_name: original.patient_name,
            doctor_name: original.doctor_name,
            date: new_date.to_string(),
            time: canonical_time(new_time).to_string(),
            reason: original.reason,
            status: AppointmentStatus::Booked,
            status_changed_at: now,
            status_changed_by: actor_identity.to_string(),
        };
        store.insert(replacement.appointment_id, replacement.clone());
        info!(original = %appointment_id, replacement = %replacement.appointment_id, "reschedule applied");
        Ok(replacement)
    }
}
