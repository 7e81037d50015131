//! Economic-calendar routes. The GET merges the live feed with the
//! store; the POST is the manual weekly upload, the one surface that is
//! allowed to answer 500 (on storage failure).

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::{routing::get, Json, Router};
use investguide_core::CalendarEvent;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::main_lib::AppState;

#[derive(Deserialize)]
struct ListParams {
    #[serde(default = "default_country")]
    country_code: String,
}

fn default_country() -> String {
    "ALL".to_string()
}

async fn list_calendar(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<CalendarEvent>>> {
    let events = state.calendar.list(&params.country_code).await?;
    Ok(Json(events))
}

#[derive(Deserialize)]
struct UploadBody {
    events: Vec<CalendarEvent>,
    #[serde(default)]
    clear: bool,
}

async fn upload_calendar(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UploadBody>,
) -> ApiResult<Json<Value>> {
    let store = state.calendar.store();
    if body.clear {
        store.clear()?;
    }
    let count = store.upsert_all(&body.events)?;
    Ok(Json(json!({ "status": "success", "count": count })))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/market/calendar", get(list_calendar).post(upload_calendar))
}
