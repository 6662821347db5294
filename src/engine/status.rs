// src/engine/status.rs
//
// The status state machine: which statuses exist, which transitions are
// legal per actor, and the affordance predicates the views hang buttons on.
// The backend re-validates every transition; these checks run first so an
// illegal action never reaches the wire.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Booked,
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    CancelledByPatient,
    CancelledByDoctor,
    /// Cancellation without actor attribution; the display label is resolved
    /// from `status_changed_by` instead.
    Cancelled,
    /// Transient marker: a new instance replaced this one.
    Rescheduled,
}

impl AppointmentStatus {
    pub fn as_wire(&self) -> &'static str {
        match self {
            AppointmentStatus::Booked => "BOOKED",
            AppointmentStatus::Scheduled => "SCHEDULED",
            AppointmentStatus::Confirmed => "CONFIRMED",
            AppointmentStatus::InProgress => "IN_PROGRESS",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::CancelledByPatient => "CANCELLED_BY_PATIENT",
            AppointmentStatus::CancelledByDoctor => "CANCELLED_BY_DOCTOR",
            AppointmentStatus::Cancelled => "CANCELLED",
            AppointmentStatus::Rescheduled => "RESCHEDULED",
        }
    }

    /// Statuses arrive as loosely-typed strings from the backend; unknown
    /// values are rejected explicitly rather than falling through a default.
    pub fn from_wire(s: &str) -> Result<Self, EngineError> {
        match s.trim() {
            "BOOKED" => Ok(AppointmentStatus::Booked),
            "SCHEDULED" => Ok(AppointmentStatus::Scheduled),
            "CONFIRMED" => Ok(AppointmentStatus::Confirmed),
            "IN_PROGRESS" => Ok(AppointmentStatus::InProgress),
            "COMPLETED" => Ok(AppointmentStatus::Completed),
            "CANCELLED_BY_PATIENT" => Ok(AppointmentStatus::CancelledByPatient),
            "CANCELLED_BY_DOCTOR" => Ok(AppointmentStatus::CancelledByDoctor),
            "CANCELLED" => Ok(AppointmentStatus::Cancelled),
            "RESCHEDULED" => Ok(AppointmentStatus::Rescheduled),
            other => Err(EngineError::UnknownStatus(other.to_string())),
        }
    }

    /// Completed and every cancellation variant admit no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed
                | AppointmentStatus::CancelledByPatient
                | AppointmentStatus::CancelledByDoctor
                | AppointmentStatus::Cancelled
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for AppointmentStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppointmentStatus::from_wire(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    Patient,
    Doctor,
}

impl ActorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorRole::Patient => "patient",
            ActorRole::Doctor => "doctor",
        }
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActorRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patient" => Ok(ActorRole::Patient),
            "doctor" => Ok(ActorRole::Doctor),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentAction {
    Accept,
    Decline,
    Confirm,
    Cancel,
    Reschedule,
    Start,
    Complete,
    /// Administrative correction; bypasses the ordinary table but still
    /// refuses to move off a terminal status.
    ForceStatus(AppointmentStatus),
}

impl AppointmentAction {
    pub fn verb(&self) -> &'static str {
        match self {
            AppointmentAction::Accept => "accept",
            AppointmentAction::Decline => "decline",
            AppointmentAction::Confirm => "confirm",
            AppointmentAction::Cancel => "cancel",
            AppointmentAction::Reschedule => "reschedule",
            AppointmentAction::Start => "start",
            AppointmentAction::Complete => "complete",
            AppointmentAction::ForceStatus(_) => "force-status",
        }
    }
}

impl fmt::Display for AppointmentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// The transition table. Returns the successor status, or
/// `InvalidTransition` leaving the current status untouched.
pub fn next_status(
    current: AppointmentStatus,
    role: ActorRole,
    action: AppointmentAction,
) -> Result<AppointmentStatus, EngineError> {
    use AppointmentAction as A;
    use AppointmentStatus as S;

    let reject = || {
        Err(EngineError::InvalidTransition {
            status: current,
            role,
            action,
        })
    };

    if current.is_terminal() {
        return reject();
    }

    let next = match (current, role, action) {
        (S::Booked, ActorRole::Doctor, A::Accept) => S::Scheduled,
        (S::Booked, ActorRole::Doctor, A::Decline) => S::CancelledByDoctor,
        // The original becomes a marker; the replacement instance is booked
        // separately through the reschedule path.
        (S::Booked, ActorRole::Patient, A::Reschedule) => S::Rescheduled,

        (S::Booked | S::Scheduled | S::Confirmed, ActorRole::Patient, A::Cancel) => {
            S::CancelledByPatient
        }
        (S::Booked | S::Scheduled | S::Confirmed, ActorRole::Doctor, A::Cancel) => {
            S::CancelledByDoctor
        }

        (S::Scheduled, ActorRole::Doctor, A::Confirm) => S::Confirmed,
        // Some flows skip the explicit confirm step, so Scheduled is also
        // accepted as ready to start.
        (S::Confirmed | S::Scheduled, ActorRole::Doctor, A::Start) => S::InProgress,
        (S::InProgress | S::Confirmed | S::Scheduled, ActorRole::Doctor, A::Complete) => {
            S::Completed
        }

        (_, ActorRole::Doctor, A::ForceStatus(target)) => target,

        _ => return reject(),
    };

    Ok(next)
}

/* ============================================================
   Affordance predicates
   ============================================================ */

/// Once a doctor has acted (SCHEDULED/CONFIRMED) the patient may no longer
/// unilaterally move the slot.
pub fn can_patient_reschedule(status: AppointmentStatus) -> bool {
    status == AppointmentStatus::Booked
}

pub fn can_patient_cancel(status: AppointmentStatus) -> bool {
    matches!(
        status,
        AppointmentStatus::Booked | AppointmentStatus::Confirmed
    )
}

pub fn can_doctor_start(status: AppointmentStatus) -> bool {
    matches!(
        status,
        AppointmentStatus::Confirmed | AppointmentStatus::Scheduled
    )
}

pub fn can_doctor_complete(status: AppointmentStatus) -> bool {
    matches!(
        status,
        AppointmentStatus::InProgress
            | AppointmentStatus::Confirmed
            | AppointmentStatus::Scheduled
    )
}

pub fn can_join_realtime_session(status: AppointmentStatus) -> bool {
    matches!(
        status,
        AppointmentStatus::Confirmed | AppointmentStatus::InProgress
    )
}

/// Per-status affordances a view hangs its buttons on. Optimistic hints
/// only: the boundary re-validates every action it receives, so these are
/// re-checked server-side and never a correctness guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Permissions {
    pub can_patient_reschedule: bool,
    pub can_patient_cancel: bool,
    pub can_doctor_start: bool,
    pub can_doctor_complete: bool,
    pub can_join_realtime_session: bool,
}

impl Permissions {
    pub fn for_status(status: AppointmentStatus) -> Self {
        Self {
            can_patient_reschedule: can_patient_reschedule(status),
            can_patient_cancel: can_patient_cancel(status),
            can_doctor_start: can_doctor_start(status),
            can_doctor_complete: can_doctor_complete(status),
            can_join_realtime_session: can_join_realtime_session(status),
        }
    }
}

/// Actions a view may offer the given actor, derived from the table so the
/// buttons can never disagree with `next_status`. Force-status is an
/// escalation path and deliberately not advertised.
pub fn allowed_actions(status: AppointmentStatus, role: ActorRole) -> Vec<AppointmentAction> {
    use AppointmentAction as A;

    let candidates: &[AppointmentAction] = match role {
        ActorRole::Patient => &[A::Cancel, A::Reschedule],
        ActorRole::Doctor => &[A::Accept, A::Decline, A::Confirm, A::Start, A::Complete, A::Cancel],
    };

    candidates
        .iter()
        .copied()
        .filter(|action| next_status(status, role, *action).is_ok())
        .collect()
}

/// Human label for a status, resolving unattributed cancellations by
/// comparing the audit identity against the viewer (case-insensitive).
pub fn status_label(
    status: AppointmentStatus,
    status_changed_by: &str,
    viewer_identity: &str,
) -> String {
    // Audit values have arrived with stray whitespace; trim both sides.
    let cancelled_by_me = status_changed_by
        .trim()
        .eq_ignore_ascii_case(viewer_identity.trim());
    match status {
        AppointmentStatus::Cancelled => {
            if cancelled_by_me {
                "cancelled by me".to_string()
            } else {
                "cancelled by the counterpart".to_string()
            }
        }
        AppointmentStatus::CancelledByPatient => {
            if cancelled_by_me {
                "cancelled by me".to_string()
            } else {
                "cancelled by patient".to_string()
            }
        }
        AppointmentStatus::CancelledByDoctor => {
            if cancelled_by_me {
                "cancelled by me".to_string()
            } else {
                "cancelled by doctor".to_string()
            }
        }
        AppointmentStatus::Booked => "booked".to_string(),
        AppointmentStatus::Scheduled => "scheduled".to_string(),
        AppointmentStatus::Confirmed => "confirmed".to_string(),
        AppointmentStatus::InProgress => "in progress".to_string(),
        AppointmentStatus::Completed => "completed".to_string(),
        AppointmentStatus::Rescheduled => "rescheduled".to_string(),
    }
}
