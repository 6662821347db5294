use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::engine::EngineError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorObject,
}

#[derive(Debug, Serialize)]
pub struct ErrorObject {
    pub code: String,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    Unauthorized(&'static str, String),
    Forbidden(&'static str, String),
    BadRequest(&'static str, String),
    NotFound(&'static str, String),
    Conflict(&'static str, String),
    #[allow(dead_code)]
    Internal(String),
}

impl ApiError {
    pub fn missing_actor() -> Self {
        ApiError::Unauthorized(
            "MISSING_ACTOR",
            "X-Actor-Role and X-Actor-Id headers are required".into(),
        )
    }

    pub fn invalid_actor_role() -> Self {
        ApiError::Forbidden("INVALID_ACTOR_ROLE", "Actor role must be patient or doctor".into())
    }

    fn to_error_response(code: &str, message: &str) -> Json<ErrorResponse> {
        Json(ErrorResponse {
            error: ErrorObject {
                code: code.to_string(),
                message: message.to_string(),
            },
        })
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match &err {
            EngineError::InvalidTime { .. } => ApiError::BadRequest("INVALID_TIME", format!("{err}")),
            EngineError::InvalidTransition { .. } => {
                ApiError::BadRequest("INVALID_TRANSITION", format!("{err}"))
            }
            EngineError::SlotConflict { .. } => ApiError::Conflict("SLOT_CONFLICT", format!("{err}")),
            EngineError::NotFound(_) => ApiError::NotFound("NOT_FOUND", format!("{err}")),
            EngineError::UnknownStatus(_) => ApiError::BadRequest("UNKNOWN_STATUS", format!("{err}")),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized(code, msg) => {
                (StatusCode::UNAUTHORIZED, ApiError::to_error_response(code, &msg)).into_response()
            }
            ApiError::Forbidden(code, msg) => {
                (StatusCode::FORBIDDEN, ApiError::to_error_response(code, &msg)).into_response()
            }
            ApiError::BadRequest(code, msg) => {
                (StatusCode::BAD_REQUEST, ApiError::to_error_response(code, &msg)).into_response()
            }
            ApiError::NotFound(code, msg) => {
                (StatusCode::NOT_FOUND, ApiError::to_error_response(code, &msg)).into_response()
            }
            ApiError::Conflict(code, msg) => {
                (StatusCode::CONFLICT, ApiError::to_error_response(code, &msg)).into_response()
            }
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::to_error_response("INTERNAL", &msg),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    async fn code_of(err: ApiError) -> (StatusCode, String) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, body["error"]["code"].as_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn slot_conflict_maps_to_409() {
        let err = EngineError::SlotConflict {
            date: "2026-09-01".into(),
            time: "09:30".into(),
        };
        let (status, code) = code_of(err.into()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(code, "SLOT_CONFLICT");
    }

    #[tokio::test]
    async fn not_found_maps_to_404() {
        let err = EngineError::NotFound(Uuid::nil());
        let (status, code) = code_of(err.into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn engine_rejections_map_to_400() {
        use crate::engine::status::{ActorRole, AppointmentAction, AppointmentStatus};

        let cases: Vec<(EngineError, &str)> = vec![
            (
                EngineError::InvalidTime {
                    date: "not-a-date".into(),
                    time: "whenever".into(),
                },
                "INVALID_TIME",
            ),
            (
                EngineError::InvalidTransition {
                    status: AppointmentStatus::Completed,
                    role: ActorRole::Patient,
                    action: AppointmentAction::Cancel,
                },
                "INVALID_TRANSITION",
            ),
            (EngineError::UnknownStatus("PAUSED".into()), "UNKNOWN_STATUS"),
        ];
        for (err, expected) in cases {
            let (status, code) = code_of(err.into()).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(code, expected, "wrong code for {expected}");
        }
    }

    #[tokio::test]
    async fn actor_helpers_carry_stable_codes() {
        let (status, code) = code_of(ApiError::missing_actor()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(code, "MISSING_ACTOR");

        let (status, code) = code_of(ApiError::invalid_actor_role()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(code, "INVALID_ACTOR_ROLE");
    }
}
