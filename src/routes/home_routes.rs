use axum::{Json, Router, routing::get};

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub data: HealthData,
}

#[derive(serde::Serialize)]
pub struct HealthData {
    pub ok: bool,
}

pub fn router() -> Router<crate::models::AppState> {
    Router::new().route("/health", get(health))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        data: HealthData { ok: true },
    })
}
