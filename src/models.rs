use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::range::TimeBucket;
use crate::engine::status::{AppointmentStatus, Permissions};
use crate::engine::temporal::resolve_instant;
use crate::service::AppointmentService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AppointmentService>,
}

/* -------------------------
   Wire models
--------------------------*/

/// The read-model an actor sees, exactly as the backend ships it: calendar
/// date and wall-clock time are stored separately (`YYYY-MM-DD` / `HH:mm`,
/// legacy `HH:mm:ss` tolerated on input) and only combined on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentView {
    pub appointment_id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub patient_name: String,
    pub doctor_name: String,
    pub date: String,
    pub time: String,
    pub reason: String,
    pub status: AppointmentStatus,
    pub status_changed_at: DateTime<Utc>,
    pub status_changed_by: String,
}

impl AppointmentView {
    /// Resolved start instant; zero instant when the record is malformed.
    pub fn starts_at(&self) -> DateTime<Utc> {
        resolve_instant(&self.date, &self.time)
    }
}

/// An [`AppointmentView`] annotated for one requesting actor: the resolved
/// instant, its time bucket, and the actions this actor may legally take.
/// Derived on every response, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedAppointment {
    #[serde(flatten)]
    pub view: AppointmentView,
    pub starts_at: DateTime<Utc>,
    pub bucket: TimeBucket,
    /// True when the record's date/time failed to resolve. Such records
    /// carry the zero instant (which `classify` puts in `Past`) and sort
    /// first; this flag is how clients tell them apart from genuinely past
    /// appointments.
    pub unscheduled: bool,
    pub allowed_actions: Vec<String>,
    pub permissions: Permissions,
    pub status_label: String,
}

/* -------------------------
   Availability
--------------------------*/

#[derive(Debug, Serialize)]
pub struct AvailabilityData {
    pub doctor_id: Uuid,
    pub date: String,
    pub slots: Vec<String>,
}
