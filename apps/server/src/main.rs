mod api;
mod config;
mod error;
mod main_lib;

use api::app_router;
use config::Config;
use investguide_core::spawn_daily_scheduler;
use main_lib::{build_state, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();
    init_tracing();
    let (state, job_runner) = build_state(&config)?;

    // Daily sync: calendar, symbol master, fund registry.
    let _scheduler = spawn_daily_scheduler(job_runner);

    let router = app_router(state);
    tracing::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
