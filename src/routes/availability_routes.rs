// src/routes/availability_routes.rs

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::actor_context::ActorContext,
    models::{AppState, AvailabilityData},
    routes::appointment_routes::ApiOk,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/availability", get(get_availability))
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub doctor_id: Uuid,
    // YYYY-MM-DD
    pub date: String,
}

pub async fn get_availability(
    State(state): State<AppState>,
    _actor: ActorContext,
    Query(q): Query<AvailabilityQuery>,
) -> Result<Json<ApiOk<AvailabilityData>>, ApiError> {
    let slots = state.service.available_slots(q.doctor_id, &q.date).await?;
    Ok(Json(ApiOk {
        data: AvailabilityData {
            doctor_id: q.doctor_id,
            date: q.date,
            slots,
        },
    }))
}
