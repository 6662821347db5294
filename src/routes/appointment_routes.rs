// src/routes/appointment_routes.rs

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    engine::{
        aggregate::StatusGroup,
        range::RangeFilter,
        status::{ActorRole, AppointmentAction, AppointmentStatus},
    },
    error::ApiError,
    middleware::actor_context::ActorContext,
    models::{AnnotatedAppointment, AppState},
};

fn ensure_doctor(actor: &ActorContext) -> Result<(), ApiError> {
    if actor.role == ActorRole::Doctor {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "FORBIDDEN",
            "Only a doctor can perform this action".into(),
        ))
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/appointments", get(list_appointments))
        .route("/appointments/{appointment_id}", get(get_appointment))
        .route("/appointments/{appointment_id}/accept", post(accept_appointment))
        .route("/appointments/{appointment_id}/decline", post(decline_appointment))
        .route("/appointments/{appointment_id}/confirm", post(confirm_appointment))
        .route("/appointments/{appointment_id}/start", post(start_appointment))
        .route("/appointments/{appointment_id}/complete", post(complete_appointment))
        .route("/appointments/{appointment_id}/cancel", post(cancel_appointment))
        .route("/appointments/{appointment_id}/status", post(force_status))
        .route("/appointments/{appointment_id}/reschedule", post(reschedule_appointment))
}

/* ============================================================
   Response DTOs
   ============================================================ */

#[derive(Debug, Serialize)]
pub struct ApiOk<T> {
    pub data: T,
}

/* ============================================================
   GET /appointments
   ============================================================ */

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub group: Option<StatusGroup>,
    pub range: Option<RangeFilter>,
}

pub async fn list_appointments(
    State(state): State<AppState>,
    actor: ActorContext,
    Query(q): Query<ListQuery>,
) -> Result<Json<ApiOk<Vec<AnnotatedAppointment>>>, ApiError> {
    let range = q.range.unwrap_or(RangeFilter::All);
    let data = match q.group {
        Some(group) => state.service.list_by_group(group, range, &actor).await?,
        None => state.service.list_by_range(range, &actor).await?,
    };
    Ok(Json(ApiOk { data }))
}

/* ============================================================
   GET /appointments/{id}
   ============================================================ */

pub async fn get_appointment(
    State(state): State<AppState>,
    actor: ActorContext,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<ApiOk<AnnotatedAppointment>>, ApiError> {
    let data = state.service.get_appointment(appointment_id, &actor).await?;
    Ok(Json(ApiOk { data }))
}

/* ============================================================
   Status transitions — one verb route per action, validated
   against the state machine before anything hits the backend
   ============================================================ */

async fn transition(
    state: AppState,
    actor: ActorContext,
    appointment_id: Uuid,
    action: AppointmentAction,
) -> Result<Json<ApiOk<AnnotatedAppointment>>, ApiError> {
    let data = state.service.apply_transition(appointment_id, action, &actor).await?;
    Ok(Json(ApiOk { data }))
}

pub async fn accept_appointment(
    State(state): State<AppState>,
    actor: ActorContext,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<ApiOk<AnnotatedAppointment>>, ApiError> {
    transition(state, actor, appointment_id, AppointmentAction::Accept).await
}

pub async fn decline_appointment(
    State(state): State<AppState>,
    actor: ActorContext,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<ApiOk<AnnotatedAppointment>>, ApiError> {
    transition(state, actor, appointment_id, AppointmentAction::Decline).await
}

pub async fn confirm_appointment(
    State(state): State<AppState>,
    actor: ActorContext,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<ApiOk<AnnotatedAppointment>>, ApiError> {
    transition(state, actor, appointment_id, AppointmentAction::Confirm).await
}

pub async fn start_appointment(
    State(state): State<AppState>,
    actor: ActorContext,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<ApiOk<AnnotatedAppointment>>, ApiError> {
    transition(state, actor, appointment_id, AppointmentAction::Start).await
}

pub async fn complete_appointment(
    State(state): State<AppState>,
    actor: ActorContext,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<ApiOk<AnnotatedAppointment>>, ApiError> {
    transition(state, actor, appointment_id, AppointmentAction::Complete).await
}

pub async fn cancel_appointment(
    State(state): State<AppState>,
    actor: ActorContext,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<ApiOk<AnnotatedAppointment>>, ApiError> {
    transition(state, actor, appointment_id, AppointmentAction::Cancel).await
}

/* ============================================================
   POST /appointments/{id}/status  (administrative correction)
   ============================================================ */

#[derive(Debug, Deserialize)]
pub struct ForceStatusRequest {
    pub status: String,
}

pub async fn force_status(
    State(state): State<AppState>,
    actor: ActorContext,
    Path(appointment_id): Path<Uuid>,
    Json(req): Json<ForceStatusRequest>,
) -> Result<Json<ApiOk<AnnotatedAppointment>>, ApiError> {
    ensure_doctor(&actor)?;

    // Statuses arrive as loose strings; unknown values are rejected here
    // instead of falling through silently.
    let target = AppointmentStatus::from_wire(&req.status)?;
    transition(state, actor, appointment_id, AppointmentAction::ForceStatus(target)).await
}

/* ============================================================
   POST /appointments/{id}/reschedule
   ============================================================ */

#[derive(Debug, Deserialize)]
pub struct RescheduleRequest {
    // YYYY-MM-DD and HH:mm, same shapes the views display
    pub date: String,
    pub time: String,
}

pub async fn reschedule_appointment(
    State(state): State<AppState>,
    actor: ActorContext,
    Path(appointment_id): Path<Uuid>,
    Json(req): Json<RescheduleRequest>,
) -> Result<Json<ApiOk<AnnotatedAppointment>>, ApiError> {
    let data = state
        .service
        .reschedule(appointment_id, &req.date, &req.time, &actor)
        .await?;
    Ok(Json(ApiOk { data }))
}
