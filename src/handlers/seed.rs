use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use tracing::info;

use crate::{
    error::{AppQuery, AppResult},
    seed::{self, SeedCounts},
    AppState,
};

const MAX_SEED_ROWS: usize = 1_000;

#[derive(Debug, Default, Deserialize)]
pub struct SeedParams {
    /// Customers to create (default: 10, max: 1 000)
    pub customers: Option<usize>,
    /// Products to create, each with one inventory row (default: 25, max: 1 000)
    pub products: Option<usize>,
    /// Orders to create (default: 40, max: 1 000)
    pub orders: Option<usize>,
}

impl SeedParams {
    fn counts(&self) -> SeedCounts {
        SeedCounts {
            customers: self.customers.unwrap_or(10).min(MAX_SEED_ROWS),
            products: self.products.unwrap_or(25).min(MAX_SEED_ROWS),
            orders: self.orders.unwrap_or(40).min(MAX_SEED_ROWS),
        }
    }
}

// ── POST /seed ────────────────────────────────────────────────────────────────

pub async fn seed_data(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<SeedParams>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    // StdRng is Send, so it can be held across the store's await points
    let mut rng = StdRng::from_entropy();

    let start = Instant::now();
    let report = seed::seed_pharmacy(state.db.as_ref(), params.counts(), &mut rng).await?;
    let elapsed = start.elapsed();

    info!(seed_ms = elapsed.as_millis(), "Seed request finished");

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "seeded": report,
            "seed_time_ms": elapsed.as_secs_f64() * 1000.0,
        })),
    ))
}
