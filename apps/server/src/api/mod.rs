use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::main_lib::AppState;

mod calendar;
mod currencies;
mod health;
mod market;

pub fn app_router(state: Arc<AppState>) -> Router {
    let v1 = Router::new()
        .merge(market::router())
        .merge(calendar::router())
        .merge(currencies::router());

    Router::new()
        .merge(health::router())
        .nest("/api/v1", v1)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::main_lib::build_state;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    fn test_router() -> (Router, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let data_dir = dir.path().to_string_lossy().to_string();
        let config = Config {
            listen_addr: "127.0.0.1:0".to_string(),
            db_path: format!("{data_dir}/test.db"),
            data_dir,
        };
        let (state, _runner) = build_state(&config).expect("state");
        (app_router(state), dir)
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (router, _dir) = test_router();
        let response = router
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({ "status": "active" }));
    }

    #[tokio::test]
    async fn test_calendar_upload_roundtrip() {
        let (router, _dir) = test_router();
        let body = json!({
            "clear": true,
            "events": [{
                "event_id": "63-20260115140000-TCMB ",
                "date_time": "2026-01-15T14:00:00",
                "country_id": 63,
                "currency": "TRY",
                "title": "TCMB Politika Faizi Kararı",
                "impact": "High"
            }]
        });
        let response = router
            .oneshot(
                Request::post("/api/v1/market/calendar")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let got = json_body(response).await;
        assert_eq!(got["status"], "success");
        assert_eq!(got["count"], 1);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (router, _dir) = test_router();
        let response = router
            .oneshot(Request::get("/api/v1/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
