mod db;
mod routes;
mod models;
mod errors;
mod utils;
mod app;
mod auth;
mod services;
mod external;
mod logging;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use crate::external::market_data::MarketDataFetcher;
use crate::external::mock::MockMarketFetcher;
use crate::external::naver::NaverFinanceFetcher;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    logging::init_logging(logging::LoggingConfig::from_env())?;

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let jwt_secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .context("failed to connect to postgres")?;

    sqlx::migrate!().run(&pool).await.context("failed to run migrations")?;

    // Select market data source based on MARKET_PROVIDER env var (defaults to naver)
    let provider_name = std::env::var("MARKET_PROVIDER")
        .unwrap_or_else(|_| "naver".to_string());

    let market: Arc<dyn MarketDataFetcher> = match provider_name.to_lowercase().as_str() {
        "naver" => {
            tracing::info!("📈 Using market data source: Naver Finance");
            Arc::new(NaverFinanceFetcher::new())
        }
        "mock" => {
            tracing::info!("📈 Using market data source: mock quotes");
            Arc::new(MockMarketFetcher::new())
        }
        _ => {
            panic!("Invalid MARKET_PROVIDER: {}. Must be 'naver' or 'mock'", provider_name);
        }
    };

    let state = AppState {
        pool,
        market,
        jwt_secret: Arc::from(jwt_secret),
    };
    let app = app::create_app(state);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000u16);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 stocknote backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
