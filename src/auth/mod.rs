//! Onboarding gate.
//!
//! The only access check is local: protected routes require a stored profile.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::errors::AppError;
use crate::AppState;

/// Middleware rejecting requests until onboarding has stored a profile.
pub async fn onboarding_gate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if state.store.profile.has_profile().await {
        return next.run(request).await;
    }

    tracing::debug!("Rejected {} before onboarding", request.uri().path());
    AppError::OnboardingRequired("Complete onboarding to continue".to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{body::Body, http::StatusCode, middleware, routing::get, Router};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::db::MemoryKvStore;
    use crate::models::UserProfile;

    fn test_state() -> AppState {
        let config = Config {
            db_path: "unused.sqlite".into(),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            analysis_delay: Duration::from_millis(1),
            ephemeral: true,
        };
        AppState::new(Arc::new(MemoryKvStore::new()), &config)
    }

    fn gated_router(state: AppState) -> Router {
        Router::new()
            .route("/protected", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(state.clone(), onboarding_gate))
            .with_state(state)
    }

    fn protected_request() -> Request {
        axum::http::Request::builder()
            .uri("/protected")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_gate_blocks_without_profile() {
        let response = gated_router(test_state())
            .oneshot(protected_request())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "ONBOARDING_REQUIRED");
    }

    #[tokio::test]
    async fn test_gate_passes_with_profile() {
        let state = test_state();
        let profile: UserProfile = serde_json::from_value(serde_json::json!({
            "name": "Asha",
            "mobile": "111111",
            "district": "Pune",
            "state": "Maharashtra",
            "mainCrops": ["Onion"]
        }))
        .unwrap();
        state.store.profile.save_profile(&profile).await.unwrap();

        let response = gated_router(state)
            .oneshot(protected_request())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
