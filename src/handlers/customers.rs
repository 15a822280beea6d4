use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use tracing::info;

use crate::{
    error::{AppJson, AppPath, AppResult},
    models::{CreateCustomer, Customer, Order, UpdateCustomer},
    AppState,
};

pub async fn list_customers(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Vec<Customer>>)> {
    let start = Instant::now();
    let customers = state.db.fetch_all_customers().await?;

    info!(
        count = customers.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Listed customers"
    );

    Ok((StatusCode::OK, Json(customers)))
}

pub async fn create_customer(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCustomer>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    let customer = state.db.insert_customer(&payload).await?;

    info!(id = customer.id, "Created customer");

    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn get_customer(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    let customer = state.db.fetch_customer_by_id(id).await?;
    Ok((StatusCode::OK, Json(customer)))
}

pub async fn update_customer(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<UpdateCustomer>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    let customer = state.db.update_customer(id, &payload).await?;

    info!(id, "Updated customer");

    Ok((StatusCode::OK, Json(customer)))
}

pub async fn delete_customer(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    state.db.delete_customer(id).await?;

    info!(id, "Deleted customer");

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Customer deleted", "ID": id })),
    ))
}

pub async fn total_customers(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let total = state.db.count_customers().await?;
    Ok((StatusCode::OK, Json(json!({ "total_customers": total }))))
}

/// Orders placed by one customer, each with its lines.
pub async fn customer_orders(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<(StatusCode, Json<Vec<Order>>)> {
    let orders = state.db.fetch_orders_for_customer(id).await?;
    Ok((StatusCode::OK, Json(orders)))
}
