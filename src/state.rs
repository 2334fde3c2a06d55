use std::sync::Arc;
use sqlx::PgPool;
use crate::external::market_data::MarketDataFetcher;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub market: Arc<dyn MarketDataFetcher>,
    pub jwt_secret: Arc<str>,
}
