//! Background jobs and the daily scheduler.
//!
//! The job registry is a closed enum dispatched to statically known
//! handlers. The scheduler is one long-lived loop that sleeps until the
//! next local midnight, runs every enabled job, and cools down for five
//! minutes after an errored pass instead of terminating.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use investguide_market_data::{Aggregator, MarketDataError};
use log::{error, info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::calendar::CalendarSync;
use crate::errors::{CoreError, Result};
use crate::settings::Settings;

/// Cooldown after a pass where any job failed.
const ERROR_COOLDOWN: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    CalendarSync,
    SymbolMasterSync,
    FundRegistryRefresh,
}

impl JobKind {
    pub const ALL: [JobKind; 3] = [
        JobKind::CalendarSync,
        JobKind::SymbolMasterSync,
        JobKind::FundRegistryRefresh,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            JobKind::CalendarSync => "calendar_sync",
            JobKind::SymbolMasterSync => "symbol_master_sync",
            JobKind::FundRegistryRefresh => "fund_registry_refresh",
        }
    }

    fn enable_key(&self) -> &'static str {
        match self {
            JobKind::CalendarSync => "CALENDAR_SYNC_ENABLED",
            JobKind::SymbolMasterSync => "SYMBOL_MASTER_SYNC_ENABLED",
            JobKind::FundRegistryRefresh => "FUND_REGISTRY_REFRESH_ENABLED",
        }
    }
}

pub struct JobRunner {
    aggregator: Arc<Aggregator>,
    calendar: Arc<CalendarSync>,
    settings: Arc<dyn Settings>,
}

impl JobRunner {
    pub fn new(
        aggregator: Arc<Aggregator>,
        calendar: Arc<CalendarSync>,
        settings: Arc<dyn Settings>,
    ) -> Self {
        JobRunner { aggregator, calendar, settings }
    }

    fn is_enabled(&self, kind: JobKind) -> bool {
        self.settings
            .get_value(kind.enable_key())
            .map(|v| v != "0")
            .unwrap_or(true)
    }

    /// Runs one job, returning the number of rows it touched.
    pub async fn run(&self, kind: JobKind) -> Result<usize> {
        match kind {
            JobKind::CalendarSync => self.calendar.sync().await,
            JobKind::SymbolMasterSync => Ok(self.aggregator.sync_symbol_master().await?),
            JobKind::FundRegistryRefresh => Ok(self.aggregator.refresh_fund_registry().await?),
        }
    }

    /// Runs every enabled job; true when no job failed transiently.
    /// A missing credential is a permanent condition, not an outage,
    /// and counts as a skip rather than a failed pass.
    pub async fn run_all(&self) -> bool {
        let mut all_ok = true;
        for kind in JobKind::ALL {
            if !self.is_enabled(kind) {
                info!("job {} disabled, skipping", kind.name());
                continue;
            }
            match self.run(kind).await {
                Ok(count) => info!("job {} done: {count} rows", kind.name()),
                Err(CoreError::Market(MarketDataError::MissingCredential { key })) => {
                    info!("job {} skipped: credential {key} not configured", kind.name());
                }
                Err(e) => {
                    warn!("job {} failed: {e}", kind.name());
                    all_ok = false;
                }
            }
        }
        all_ok
    }
}

/// Handle on a supervised background task. Dropping it detaches the
/// task; `stop` shuts it down and waits for it.
pub struct TaskHandle {
    shutdown: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl TaskHandle {
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.join.await {
            error!("background task panicked: {e}");
        }
    }
}

/// Seconds from `now` to one second past the next midnight. The extra
/// second keeps a pass started exactly at 00:00:00 from scheduling a
/// zero-length sleep for the same midnight.
pub fn seconds_until_next_midnight(now: NaiveDateTime) -> u64 {
    let next = (now.date() + chrono::Duration::days(1)).and_time(chrono::NaiveTime::MIN)
        + chrono::Duration::seconds(1);
    (next - now).num_seconds().max(1) as u64
}

/// Spawns the daily scheduler: run all jobs, sleep until the next local
/// midnight, repeat. A failed pass retries after [`ERROR_COOLDOWN`]
/// instead of waiting a full day.
pub fn spawn_daily_scheduler(runner: Arc<JobRunner>) -> TaskHandle {
    let (tx, mut rx) = watch::channel(false);
    let join = tokio::spawn(async move {
        info!("daily scheduler started");
        loop {
            let all_ok = runner.run_all().await;
            let sleep_for = if all_ok {
                Duration::from_secs(seconds_until_next_midnight(Local::now().naive_local()))
            } else {
                ERROR_COOLDOWN
            };
            info!("next scheduler pass in {}s", sleep_for.as_secs());
            tokio::select! {
                _ = tokio::time::sleep(sleep_for) => {}
                _ = rx.changed() => {
                    info!("daily scheduler stopping");
                    break;
                }
            }
        }
    });
    TaskHandle { shutdown: tx, join }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{CalendarStore, MynetCalendarFeed};
    use crate::settings::MemorySettings;
    use chrono::NaiveDate;
    use investguide_market_data::provider::binance::BinanceProvider;
    use investguide_market_data::provider::exchange_rate::ExchangeRateProvider;
    use investguide_market_data::provider::fawaz::FawazProvider;
    use investguide_market_data::provider::fmp::FmpProvider;
    use investguide_market_data::provider::mynet::MynetProvider;
    use investguide_market_data::provider::tefas::TefasProvider;
    use investguide_market_data::provider::tradingview::TradingViewProvider;
    use investguide_market_data::provider::twelve_data::{SymbolMaster, TwelveDataProvider};
    use investguide_market_data::provider::yahoo::YahooProvider;
    use investguide_market_data::{FundRegistry, Providers};

    fn keyless_aggregator() -> Arc<Aggregator> {
        let master = Arc::new(SymbolMaster::open(
            std::env::temp_dir().join("jobs-test-symbol-master.json"),
        ));
        let providers = Providers {
            mynet: Arc::new(MynetProvider::new()),
            yahoo: Arc::new(YahooProvider::new()),
            binance: Arc::new(BinanceProvider::new()),
            tradingview: Arc::new(TradingViewProvider::new()),
            fmp: Arc::new(FmpProvider::new(None)),
            tefas: Arc::new(TefasProvider::new()),
            twelve_data: Arc::new(TwelveDataProvider::new(None, master)),
            exchange_rate: Arc::new(ExchangeRateProvider::new(None)),
            fawaz: Arc::new(FawazProvider::new()),
        };
        Arc::new(Aggregator::new(providers, Arc::new(FundRegistry::new())))
    }

    #[tokio::test]
    async fn test_missing_credential_counts_as_skip_not_failure() {
        // Only the symbol-master job is enabled; without a key it must
        // read as a skipped pass, or the scheduler would fall into the
        // five-minute cooldown permanently.
        let store = Arc::new(CalendarStore::open_in_memory().unwrap());
        let calendar = Arc::new(CalendarSync::new(Arc::new(MynetCalendarFeed::new()), store));
        let settings = Arc::new(
            MemorySettings::new()
                .with("CALENDAR_SYNC_ENABLED", "0")
                .with("FUND_REGISTRY_REFRESH_ENABLED", "0"),
        );
        let runner = JobRunner::new(keyless_aggregator(), calendar, settings);

        let err = runner.run(JobKind::SymbolMasterSync).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Market(MarketDataError::MissingCredential { .. })
        ));
        assert!(runner.run_all().await);
    }

    #[test]
    fn test_seconds_until_next_midnight() {
        let now = NaiveDate::from_ymd_opt(2026, 1, 15)
            .and_then(|d| d.and_hms_opt(23, 59, 0))
            .unwrap();
        assert_eq!(seconds_until_next_midnight(now), 61);

        let midnight = NaiveDate::from_ymd_opt(2026, 1, 15)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        // A pass at midnight schedules the following midnight.
        assert_eq!(seconds_until_next_midnight(midnight), 86_401);
    }

    #[test]
    fn test_job_names_are_stable() {
        assert_eq!(JobKind::ALL.len(), 3);
        assert_eq!(JobKind::CalendarSync.name(), "calendar_sync");
        assert_eq!(JobKind::SymbolMasterSync.enable_key(), "SYMBOL_MASTER_SYNC_ENABLED");
    }
}
