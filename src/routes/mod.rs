use crate::models::AppState;
use axum::Router;

pub mod appointment_routes;
pub mod availability_routes;
pub mod home_routes;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", appointment_routes::router())
        .nest("/api/v1", availability_routes::router())
        .merge(home_routes::router())
        .with_state(state)
}
