//! Market data routes. Every handler here is infallible by contract:
//! the aggregator resolves provider outages to fallback values or empty
//! lists, never to errors.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::{routing::get, Json, Router};
use investguide_market_data::{HistoryPoint, Quote};
use serde::Deserialize;

use crate::main_lib::AppState;

async fn market_summary(State(state): State<Arc<AppState>>) -> Json<HashMap<String, Quote>> {
    Json(state.aggregator.market_summary().await)
}

#[derive(Deserialize)]
struct HistoryParams {
    #[serde(default = "default_period")]
    period: String,
    interval: Option<String>,
}

fn default_period() -> String {
    "1mo".to_string()
}

async fn market_history(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Json<Vec<HistoryPoint>> {
    let points = state
        .aggregator
        .history(&symbol, &params.period, params.interval.as_deref())
        .await;
    Json(points)
}

async fn asset_detail(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Json<Quote> {
    Json(state.aggregator.asset_detail(&symbol).await)
}

async fn stock_markets(State(state): State<Arc<AppState>>) -> Json<Vec<Quote>> {
    Json(state.aggregator.stock_list().await)
}

async fn commodity_markets(State(state): State<Arc<AppState>>) -> Json<Vec<Quote>> {
    Json(state.aggregator.commodity_list().await)
}

async fn etf_markets(State(state): State<Arc<AppState>>) -> Json<Vec<Quote>> {
    Json(state.aggregator.etf_list().await)
}

async fn bond_markets(State(state): State<Arc<AppState>>) -> Json<Vec<Quote>> {
    Json(state.aggregator.bond_list().await)
}

async fn top_funds(State(state): State<Arc<AppState>>) -> Json<Vec<Quote>> {
    Json(state.aggregator.top_funds().await)
}

#[derive(Deserialize)]
struct CryptoParams {
    #[serde(default = "default_crypto_limit")]
    limit: usize,
}

fn default_crypto_limit() -> usize {
    50
}

async fn crypto_markets(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CryptoParams>,
) -> Json<Vec<Quote>> {
    Json(state.aggregator.crypto_list(params.limit).await)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/market/summary", get(market_summary))
        .route("/market/history/{symbol}", get(market_history))
        .route("/market/detail/{symbol}", get(asset_detail))
        .route("/market/stocks", get(stock_markets))
        .route("/market/commodities", get(commodity_markets))
        .route("/market/etfs", get(etf_markets))
        .route("/market/bonds", get(bond_markets))
        .route("/market/crypto", get(crypto_markets))
        .route("/funds/top", get(top_funds))
}
