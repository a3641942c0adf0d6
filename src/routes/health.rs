use axum::{extract::State, routing::get, Json, Router};

use crate::models::{AppState, HealthResponse};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health_check))
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let response = HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        sessions: state.sessions.len().await,
    };

    Json(response)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};

    use crate::llm::provider::testing::ScriptedClient;
    use crate::routes::create_router;
    use crate::routes::tests::{create_session, send, test_state};

    #[tokio::test]
    async fn test_health_counts_sessions() {
        let app = create_router(test_state(Arc::new(ScriptedClient::default())));
        create_session(&app).await;
        create_session(&app).await;

        let (status, body) = send(
            &app,
            Request::builder().uri("/api/health").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["sessions"], 2);
    }
}
