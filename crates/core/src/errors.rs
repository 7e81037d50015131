//! Error type for the durable-state services.

use investguide_market_data::MarketDataError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("calendar feed error: {0}")]
    Feed(String),

    #[error("market data error: {0}")]
    Market(#[from] MarketDataError),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
