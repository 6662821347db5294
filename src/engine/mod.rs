pub mod aggregate;
pub mod range;
pub mod slots;
pub mod status;
pub mod temporal;

use thiserror::Error;
use uuid::Uuid;

use crate::engine::status::{ActorRole, AppointmentAction, AppointmentStatus};

/// Failure modes of the appointment engine. `InvalidTime` is recovered
/// locally in list paths (the record degrades to the zero instant); the
/// others surface to the initiating caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unparseable date/time: {date:?} {time:?}")]
    InvalidTime { date: String, time: String },

    #[error("{action} is not allowed for {role} while appointment is {status}")]
    InvalidTransition {
        status: AppointmentStatus,
        role: ActorRole,
        action: AppointmentAction,
    },

    #[error("slot {time} on {date} is no longer free")]
    SlotConflict { date: String, time: String },

    #[error("appointment {0} not found")]
    NotFound(Uuid),

    #[error("unknown appointment status {0:?}")]
    UnknownStatus(String),
}
