use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Local, Months};
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;

use crate::error::ApiError;
use crate::model::holiday::Holiday;
use crate::store;

/// Month holiday sets keyed by (year, month). Small and hot: the calendar
/// view and every sheet of a batch export read the same month.
static HOLIDAY_CACHE: Lazy<Cache<(i32, u32), Arc<Vec<Holiday>>>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(64)
        .time_to_live(Duration::from_secs(600)) // 10 min TTL
        .build()
});

/// Cached variant of [`store::holidays_for_month`].
pub async fn holidays_for_month(
    pool: &MySqlPool,
    month: u32,
    year: i32,
) -> Result<Arc<Vec<Holiday>>, ApiError> {
    HOLIDAY_CACHE
        .try_get_with((year, month), async {
            store::holidays_for_month(pool, month, year).await.map(Arc::new)
        })
        .await
        .map_err(|e: Arc<ApiError>| (*e).clone())
}

/// Dropped wholesale on any holiday write. Recurrent entries can touch a
/// month in every cached year, so per-key eviction is not worth it.
pub fn invalidate() {
    HOLIDAY_CACHE.invalidate_all();
}

/// Preloads the months exports usually ask for: the current one and the one
/// before it.
pub async fn warmup(pool: &MySqlPool) -> anyhow::Result<()> {
    let current = Local::now().date_naive();
    let previous = current
        .checked_sub_months(Months::new(1))
        .unwrap_or(current);

    let loads = vec![
        holidays_for_month(pool, current.month(), current.year()),
        holidays_for_month(pool, previous.month(), previous.year()),
    ];

    let mut loaded = 0usize;
    for result in futures::future::join_all(loads).await {
        loaded += result?.len();
    }

    log::info!(
        "Holiday cache warmup complete: {} holidays across current and previous month",
        loaded
    );

    Ok(())
}
