use std::sync::Arc;

use axum::extract::State;
use axum::{routing::get, Json, Router};
use investguide_market_data::Quote;

use crate::main_lib::AppState;

/// The fixed FX table the mobile client renders on its currencies tab.
async fn tcmb_rates(State(state): State<Arc<AppState>>) -> Json<Vec<Quote>> {
    Json(state.aggregator.fx_table().await)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/currencies/tcmb", get(tcmb_rates))
}
