use std::path::Path;
use std::sync::Arc;

use investguide_core::{
    open_database, CalendarStore, CalendarSync, JobRunner, MynetCalendarFeed, Settings,
    SqliteSettings,
};
use investguide_market_data::provider::binance::BinanceProvider;
use investguide_market_data::provider::exchange_rate::ExchangeRateProvider;
use investguide_market_data::provider::fawaz::FawazProvider;
use investguide_market_data::provider::fmp::FmpProvider;
use investguide_market_data::provider::mynet::MynetProvider;
use investguide_market_data::provider::tefas::TefasProvider;
use investguide_market_data::provider::tradingview::TradingViewProvider;
use investguide_market_data::provider::twelve_data::{SymbolMaster, TwelveDataProvider};
use investguide_market_data::provider::yahoo::YahooProvider;
use investguide_market_data::{Aggregator, FundRegistry, Providers};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

pub struct AppState {
    pub aggregator: Arc<Aggregator>,
    pub calendar: Arc<CalendarSync>,
    pub settings: Arc<dyn Settings>,
}

pub fn init_tracing() {
    let log_format = std::env::var("IG_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Credential lookup: the settings table wins, the environment is the
/// fallback so container deployments work without seeding the table.
fn credential(settings: &dyn Settings, key: &str) -> Option<String> {
    settings
        .get_value(key)
        .or_else(|| std::env::var(key).ok().filter(|v| !v.is_empty()))
}

pub fn build_state(config: &Config) -> anyhow::Result<(Arc<AppState>, Arc<JobRunner>)> {
    std::fs::create_dir_all(&config.data_dir)?;
    let conn = open_database(Path::new(&config.db_path))?;
    tracing::info!("Database path in use: {}", config.db_path);

    let settings: Arc<dyn Settings> = Arc::new(SqliteSettings::new(conn.clone())?);

    let fund_registry = Arc::new(FundRegistry::new());
    let symbol_master = Arc::new(SymbolMaster::open(
        Path::new(&config.data_dir).join("symbol_master.json"),
    ));

    let providers = Providers {
        mynet: Arc::new(MynetProvider::new()),
        yahoo: Arc::new(YahooProvider::new()),
        binance: Arc::new(BinanceProvider::new()),
        tradingview: Arc::new(TradingViewProvider::new()),
        fmp: Arc::new(FmpProvider::new(credential(settings.as_ref(), "FMP_API_KEY"))),
        tefas: Arc::new(TefasProvider::new()),
        twelve_data: Arc::new(TwelveDataProvider::new(
            credential(settings.as_ref(), "TWELVEDATA_API_KEY"),
            symbol_master,
        )),
        exchange_rate: Arc::new(ExchangeRateProvider::new(credential(
            settings.as_ref(),
            "EXCHANGERATE_API_KEY",
        ))),
        fawaz: Arc::new(FawazProvider::new()),
    };
    let aggregator = Arc::new(Aggregator::new(providers, fund_registry));

    let store = Arc::new(CalendarStore::new(conn)?);
    let calendar = Arc::new(CalendarSync::new(Arc::new(MynetCalendarFeed::new()), store));

    let runner = Arc::new(JobRunner::new(
        aggregator.clone(),
        calendar.clone(),
        settings.clone(),
    ));

    let state = Arc::new(AppState {
        aggregator,
        calendar,
        settings,
    });
    Ok((state, runner))
}
