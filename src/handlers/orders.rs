use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde_json::json;
use tracing::info;

use crate::{
    error::{AppJson, AppPath, AppResult},
    models::{CreateOrder, Order, UpdateOrder},
    AppState,
};

const RECENT_ORDERS_LIMIT: i64 = 10;

// ── CRUD ──────────────────────────────────────────────────────────────────────

pub async fn list_orders(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Vec<Order>>)> {
    let start = Instant::now();
    let orders = state.db.fetch_all_orders().await?;

    info!(
        count = orders.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Listed orders"
    );

    Ok((StatusCode::OK, Json(orders)))
}

pub async fn create_order(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateOrder>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = state.db.insert_order(&payload).await?;

    info!(
        id = order.id,
        customer_id = order.customer_id,
        lines = order.details.len(),
        "Created order"
    );

    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn get_order(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = state.db.fetch_order_by_id(id).await?;
    Ok((StatusCode::OK, Json(order)))
}

pub async fn update_order(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<UpdateOrder>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = state.db.update_order(id, &payload).await?;

    info!(
        id,
        status = %order.order_status,
        lines_replaced = payload.details.is_some(),
        "Updated order"
    );

    Ok((StatusCode::OK, Json(order)))
}

pub async fn delete_order(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    state.db.delete_order(id).await?;

    info!(id, "Deleted order with its lines");

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Order and related details deleted", "ID": id })),
    ))
}

// ── Dashboard queries ─────────────────────────────────────────────────────────

pub async fn recent_orders(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Vec<Order>>)> {
    let orders = state.db.fetch_recent_orders(RECENT_ORDERS_LIMIT).await?;
    Ok((StatusCode::OK, Json(orders)))
}

pub async fn total_sales(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let total = state.db.sum_order_totals().await?;
    Ok((StatusCode::OK, Json(json!({ "total_sales": total }))))
}

/// Orders dated on the current UTC calendar day.
pub async fn today_transactions(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let (from, to) = day_bounds(Utc::now());
    let count = state.db.count_orders_between(from, to).await?;
    Ok((StatusCode::OK, Json(json!({ "today_transactions": count }))))
}

/// `[midnight, next midnight)` of the day containing `now`.
fn day_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}
