use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::engine::status::ActorRole;
use crate::error::ApiError;
use crate::models::AppState;

/// The acting party on a request. Authentication itself happens upstream
/// (reverse proxy / session tier); this gateway only consumes the identity
/// those layers established, delivered as headers:
///
///   X-Actor-Role: patient | doctor
///   X-Actor-Id:   opaque identity string, compared case-insensitively
///                 against appointment audit fields
#[derive(Debug, Clone)]
pub struct ActorContext {
    pub role: ActorRole,
    pub identity: String,
}

impl FromRequestParts<AppState> for ActorContext {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let role = parts
            .headers
            .get("x-actor-role")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let identity = parts
            .headers
            .get("x-actor-id")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_string());

        async move {
            let (Some(role), Some(identity)) = (role, identity) else {
                return Err(ApiError::missing_actor());
            };
            if identity.is_empty() {
                return Err(ApiError::missing_actor());
            }
            let role: ActorRole = role.parse().map_err(|_| ApiError::invalid_actor_role())?;
            Ok(ActorContext { role, identity })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::InMemoryBoundary;
    use crate::engine::slots::SlotGrid;
    use crate::service::AppointmentService;
    use axum::http::Request;
    use std::sync::Arc;

    fn state() -> AppState {
        let grid = SlotGrid::default();
        let boundary = Arc::new(InMemoryBoundary::new(grid.clone()));
        AppState {
            service: Arc::new(AppointmentService::new(boundary, grid)),
        }
    }

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/api/v1/appointments");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn extracts_role_and_identity_from_headers() {
        let mut p = parts(&[("x-actor-role", "doctor"), ("x-actor-id", "dr.lee")]);
        let actor = ActorContext::from_request_parts(&mut p, &state()).await.unwrap();
        assert_eq!(actor.role, ActorRole::Doctor);
        assert_eq!(actor.identity, "dr.lee");

        // role is case-insensitive, identity comes back trimmed
        let mut p = parts(&[("x-actor-role", "Patient"), ("x-actor-id", " patient7 ")]);
        let actor = ActorContext::from_request_parts(&mut p, &state()).await.unwrap();
        assert_eq!(actor.role, ActorRole::Patient);
        assert_eq!(actor.identity, "patient7");
    }

    #[tokio::test]
    async fn missing_headers_are_unauthorized() {
        let mut p = parts(&[]);
        let err = ActorContext::from_request_parts(&mut p, &state()).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized("MISSING_ACTOR", _)));

        // one header alone is not enough
        let mut p = parts(&[("x-actor-role", "patient")]);
        let err = ActorContext::from_request_parts(&mut p, &state()).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized("MISSING_ACTOR", _)));

        let mut p = parts(&[("x-actor-id", "patient7")]);
        let err = ActorContext::from_request_parts(&mut p, &state()).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized("MISSING_ACTOR", _)));
    }

    #[tokio::test]
    async fn blank_identity_is_rejected() {
        let mut p = parts(&[("x-actor-role", "patient"), ("x-actor-id", "   ")]);
        let err = ActorContext::from_request_parts(&mut p, &state()).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized("MISSING_ACTOR", _)));
    }

    #[tokio::test]
    async fn unknown_role_is_forbidden() {
        let mut p = parts(&[("x-actor-role", "receptionist"), ("x-actor-id", "r1")]);
        let err = ActorContext::from_request_parts(&mut p, &state()).await.unwrap_err();
        assert!(matches!(err, ApiError::Forbidden("INVALID_ACTOR_ROLE", _)));
    }
}
