use bigdecimal::BigDecimal;
use sqlx::PgPool;
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

use crate::db::{category_queries, interest_queries, snapshot_queries};
use crate::errors::AppError;
use crate::external::market_data::{MarketDataError, MarketDataFetcher, MarketQuote};
use crate::models::{
    price_f64, Category, NewSnapshot, SnapshotResponse, SubmitSnapshotRequest,
    UpdateSnapshotRequest,
};
use crate::utils;

// ==============================================================================
// Derived values
// ==============================================================================

/// Absolute price difference. The gain/loss sign is not preserved; callers
/// that need direction must compare the raw prices themselves.
pub fn diff_price(current_price: f64, previous_close: f64) -> f64 {
    (current_price - previous_close).abs()
}

/// Absolute percent difference against the previous close, rounded to two
/// decimals. Equal prices and a zero previous close both yield 0.0.
pub fn diff_percent(current_price: f64, previous_close: f64) -> f64 {
    if current_price == previous_close || previous_close == 0.0 {
        return 0.0;
    }
    let percent = (previous_close - current_price).abs() / previous_close * 100.0;
    (percent * 100.0).round() / 100.0
}

// ==============================================================================
// Interest reconciliation
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterestChange {
    Create,
    Remove,
}

/// Marker transition for one (user, stock code) pair: {ABSENT, PRESENT} with
/// self-loops, so repeating the same flag is a no-op and replays cannot
/// stack markers or delete twice.
pub fn reconcile_interest(flagged: bool, exists: bool) -> Option<InterestChange> {
    match (flagged, exists) {
        (true, false) => Some(InterestChange::Create),
        (false, true) => Some(InterestChange::Remove),
        _ => None,
    }
}

async fn apply_interest(
    pool: &PgPool,
    user_id: Uuid,
    code: &str,
    flagged: bool,
) -> Result<(), AppError> {
    let exists = interest_queries::find_interest(pool, user_id, code)
        .await?
        .is_some();
    match reconcile_interest(flagged, exists) {
        Some(InterestChange::Create) => {
            interest_queries::create_interest(pool, user_id, code).await?;
            info!("⭐ Marked {} as interesting", code);
        }
        Some(InterestChange::Remove) => {
            interest_queries::delete_interest(pool, user_id, code).await?;
            info!("Removed interest marker for {}", code);
        }
        None => {}
    }
    Ok(())
}

// ==============================================================================
// Price sourcing
// ==============================================================================

#[derive(Debug, Clone, Copy)]
struct ResolvedPrices {
    current: f64,
    previous: f64,
}

/// Today's snapshots price from the live quote; historical dates cannot be
/// scraped from a live-quote page, so the caller must supply both prices.
fn resolve_prices(
    is_today: bool,
    quote: &MarketQuote,
    override_current: Option<f64>,
    override_previous: Option<f64>,
) -> Result<ResolvedPrices, AppError> {
    if is_today {
        let current = quote.current_price.ok_or_else(|| {
            AppError::External("quote did not include a current price".to_string())
        })?;
        let previous = quote.previous_close.ok_or_else(|| {
            AppError::External("quote did not include a previous close".to_string())
        })?;
        return Ok(ResolvedPrices { current, previous });
    }

    let (Some(current), Some(previous)) = (override_current, override_previous) else {
        return Err(AppError::Validation(
            "current_price and previous_close are required for past dates".to_string(),
        ));
    };
    validate_prices(current, previous)?;
    Ok(ResolvedPrices { current, previous })
}

fn validate_prices(current: f64, previous: f64) -> Result<(), AppError> {
    if current <= 0.0 || previous <= 0.0 || !current.is_finite() || !previous.is_finite() {
        return Err(AppError::Validation("prices must be positive".to_string()));
    }
    Ok(())
}

async fn fetch_quote(
    market: &dyn MarketDataFetcher,
    code: &str,
) -> Result<MarketQuote, AppError> {
    match market.fetch_quote(code).await {
        Ok(quote) => Ok(quote),
        Err(MarketDataError::RateLimited) => Err(AppError::RateLimited),
        Err(e) => Err(AppError::External(e.to_string())),
    }
}

async fn resolve_category(
    pool: &PgPool,
    user_id: Uuid,
    category_name: Option<&str>,
) -> Result<Option<Category>, AppError> {
    match category_name.map(str::trim) {
        Some(name) if !name.is_empty() => {
            let category = category_queries::find_or_create(pool, user_id, name).await?;
            Ok(Some(category))
        }
        _ => Ok(None),
    }
}

fn to_decimal(value: f64) -> BigDecimal {
    BigDecimal::from_str(&format!("{value:.2}")).unwrap_or_default()
}

// ==============================================================================
// Submit / update / delete
// ==============================================================================

pub async fn submit(
    pool: &PgPool,
    market: &dyn MarketDataFetcher,
    user_id: Uuid,
    req: SubmitSnapshotRequest,
) -> Result<SnapshotResponse, AppError> {
    let register_date = utils::normalize_date(&req.register_date)?;
    let today = utils::is_today(&register_date);

    // The quote is always fetched: it is the only source of the stock name,
    // and an empty name is how the page reports an unknown code.
    let quote = fetch_quote(market, &req.code).await?;
    if quote.name.is_empty() {
        return Err(AppError::Validation(format!(
            "invalid stock code: {}",
            req.code
        )));
    }

    let prices = resolve_prices(today, &quote, req.current_price, req.previous_close)?;

    let category = resolve_category(pool, user_id, req.category_name.as_deref()).await?;

    if snapshot_queries::find_duplicate(pool, user_id, &quote.name, &register_date)
        .await?
        .is_some()
    {
        return Err(AppError::Duplicate(format!(
            "snapshot of {} for {} already exists",
            quote.name, register_date
        )));
    }

    apply_interest(pool, user_id, &req.code, req.is_interest).await?;

    let new = NewSnapshot {
        user_id,
        category_id: category.as_ref().map(|c| c.id),
        name: quote.name,
        code: req.code,
        current_price: to_decimal(prices.current),
        previous_close: to_decimal(prices.previous),
        diff_price: to_decimal(diff_price(prices.current, prices.previous)),
        diff_percent: to_decimal(diff_percent(prices.current, prices.previous)),
        register_date,
        issue: req.issue,
    };
    let snapshot = snapshot_queries::create_snapshot(pool, &new).await?;
    info!(
        "📌 Recorded snapshot of {} ({}) for {}",
        snapshot.name, snapshot.code, snapshot.register_date
    );

    Ok(SnapshotResponse::from_parts(
        snapshot,
        category.map(|c| c.name),
        req.is_interest,
    ))
}

pub async fn update(
    pool: &PgPool,
    market: &dyn MarketDataFetcher,
    user_id: Uuid,
    snapshot_id: Uuid,
    req: UpdateSnapshotRequest,
) -> Result<SnapshotResponse, AppError> {
    let existing = snapshot_queries::find_by_id(pool, user_id, snapshot_id)
        .await?
        .ok_or(AppError::NotFound)?;

    // Today's prices are always re-scraped; past dates keep their stored
    // prices unless the caller overrides them.
    let prices = if utils::is_today(&existing.register_date) {
        let quote = fetch_quote(market, &existing.code).await?;
        if quote.name.is_empty() {
            return Err(AppError::Validation(format!(
                "invalid stock code: {}",
                existing.code
            )));
        }
        resolve_prices(true, &quote, None, None)?
    } else {
        let current = req
            .current_price
            .unwrap_or_else(|| price_f64(&existing.current_price));
        let previous = req
            .previous_close
            .unwrap_or_else(|| price_f64(&existing.previous_close));
        validate_prices(current, previous)?;
        ResolvedPrices { current, previous }
    };

    let category = resolve_category(pool, user_id, req.category_name.as_deref()).await?;

    apply_interest(pool, user_id, &existing.code, req.is_interest).await?;

    let new = NewSnapshot {
        user_id,
        category_id: category.as_ref().map(|c| c.id),
        name: existing.name,
        code: existing.code,
        current_price: to_decimal(prices.current),
        previous_close: to_decimal(prices.previous),
        diff_price: to_decimal(diff_price(prices.current, prices.previous)),
        diff_percent: to_decimal(diff_percent(prices.current, prices.previous)),
        register_date: existing.register_date,
        issue: req.issue,
    };
    let snapshot = snapshot_queries::update_snapshot(pool, snapshot_id, user_id, &new).await?;

    Ok(SnapshotResponse::from_parts(
        snapshot,
        category.map(|c| c.name),
        req.is_interest,
    ))
}

/// Explicit user delete; the interest marker is shared across snapshots of
/// the same code and stays put.
pub async fn delete(pool: &PgPool, user_id: Uuid, snapshot_id: Uuid) -> Result<(), AppError> {
    let deleted = snapshot_queries::delete_snapshot(pool, user_id, snapshot_id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound);
    }
    info!("🗑️ Deleted snapshot {}", snapshot_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_percent_known_value() {
        // |169000 - 173500| / 169000 * 100 = 2.6627... -> 2.66
        assert_eq!(diff_percent(173500.0, 169000.0), 2.66);
    }

    #[test]
    fn diff_percent_equal_prices_is_zero() {
        assert_eq!(diff_percent(100.0, 100.0), 0.0);
    }

    #[test]
    fn diff_percent_zero_previous_close_is_zero() {
        assert_eq!(diff_percent(100.0, 0.0), 0.0);
    }

    #[test]
    fn diff_percent_is_non_negative_either_direction() {
        let up = diff_percent(120.0, 100.0);
        let down = diff_percent(100.0, 120.0);
        assert!(up > 0.0);
        assert!(down > 0.0);
        assert_eq!(up, 20.0);
        assert_eq!(down, (20.0 / 120.0 * 100.0 * 100.0_f64).round() / 100.0);
    }

    #[test]
    fn diff_price_is_order_independent() {
        assert_eq!(diff_price(100.0, 120.0), 20.0);
        assert_eq!(diff_price(120.0, 100.0), 20.0);
        assert_eq!(diff_price(100.0, 100.0), 0.0);
    }

    #[test]
    fn interest_transitions_cover_the_state_machine() {
        assert_eq!(reconcile_interest(true, false), Some(InterestChange::Create));
        assert_eq!(reconcile_interest(false, true), Some(InterestChange::Remove));
        // self-loops: repeating a flag never mutates
        assert_eq!(reconcile_interest(true, true), None);
        assert_eq!(reconcile_interest(false, false), None);
    }

    fn quote(current: Option<f64>, previous: Option<f64>) -> MarketQuote {
        MarketQuote {
            name: "삼성전자".to_string(),
            current_price: current,
            previous_close: previous,
            diff_price: None,
            days_range: None,
        }
    }

    #[test]
    fn today_prices_come_from_the_quote() {
        let resolved =
            resolve_prices(true, &quote(Some(173500.0), Some(169000.0)), Some(1.0), Some(2.0))
                .unwrap();
        assert_eq!(resolved.current, 173500.0);
        assert_eq!(resolved.previous, 169000.0);
    }

    #[test]
    fn past_dates_require_both_overrides() {
        let err = resolve_prices(false, &quote(Some(1.0), Some(1.0)), Some(100.0), None);
        assert!(matches!(err, Err(AppError::Validation(_))));

        let resolved =
            resolve_prices(false, &quote(None, None), Some(100.0), Some(120.0)).unwrap();
        assert_eq!(resolved.current, 100.0);
        assert_eq!(resolved.previous, 120.0);
    }

    #[test]
    fn override_prices_must_be_positive() {
        assert!(matches!(
            resolve_prices(false, &quote(None, None), Some(-1.0), Some(100.0)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            resolve_prices(false, &quote(None, None), Some(100.0), Some(0.0)),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn missing_quote_prices_surface_as_external_errors() {
        assert!(matches!(
            resolve_prices(true, &quote(None, Some(1.0)), None, None),
            Err(AppError::External(_))
        ));
    }

    #[test]
    fn stored_decimals_keep_two_places() {
        assert_eq!(to_decimal(2.6627).to_string(), "2.66");
        assert_eq!(to_decimal(173500.0).to_string(), "173500.00");
    }
}
