use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::main_lib::AppState;

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "active" }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(health_check))
}
