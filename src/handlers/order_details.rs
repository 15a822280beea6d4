use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use tracing::info;

use crate::{
    error::{AppJson, AppPath, AppResult},
    models::{CreateOrderDetail, OrderDetail, UpdateOrderDetail},
    AppState,
};

pub async fn list_order_details(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Vec<OrderDetail>>)> {
    let start = Instant::now();
    let details = state.db.fetch_all_order_details().await?;

    info!(
        count = details.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Listed order details"
    );

    Ok((StatusCode::OK, Json(details)))
}

pub async fn create_order_detail(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateOrderDetail>,
) -> AppResult<(StatusCode, Json<OrderDetail>)> {
    let detail = state.db.insert_order_detail(&payload).await?;

    info!(
        id = detail.id,
        order_id = detail.order_id,
        product_id = detail.product_id,
        "Created order detail"
    );

    Ok((StatusCode::CREATED, Json(detail)))
}

pub async fn get_order_detail(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<(StatusCode, Json<OrderDetail>)> {
    let detail = state.db.fetch_order_detail_by_id(id).await?;
    Ok((StatusCode::OK, Json(detail)))
}

pub async fn update_order_detail(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<UpdateOrderDetail>,
) -> AppResult<(StatusCode, Json<OrderDetail>)> {
    let detail = state.db.update_order_detail(id, &payload).await?;

    info!(id, "Updated order detail");

    Ok((StatusCode::OK, Json(detail)))
}

pub async fn delete_order_detail(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    state.db.delete_order_detail(id).await?;

    info!(id, "Deleted order detail");

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Order detail deleted", "ID": id })),
    ))
}

/// Every order line that sold the given product.
pub async fn product_order_details(
    State(state): State<AppState>,
    AppPath(product_id): AppPath<i64>,
) -> AppResult<(StatusCode, Json<Vec<OrderDetail>>)> {
    let details = state.db.fetch_order_details_for_product(product_id).await?;
    Ok((StatusCode::OK, Json(details)))
}
