use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use tracing::info;

use crate::{
    error::{AppJson, AppPath, AppResult},
    models::{CreateInventory, Inventory, UpdateInventory},
    AppState,
};

pub async fn list_inventory(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Vec<Inventory>>)> {
    let start = Instant::now();
    let items = state.db.fetch_all_inventory().await?;

    info!(
        count = items.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Listed inventory"
    );

    Ok((StatusCode::OK, Json(items)))
}

pub async fn create_inventory(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateInventory>,
) -> AppResult<(StatusCode, Json<Inventory>)> {
    let item = state.db.insert_inventory(&payload).await?;

    info!(
        id = item.id,
        product_id = item.product_id,
        stock = item.stock,
        "Created inventory item"
    );

    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn get_inventory(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<(StatusCode, Json<Inventory>)> {
    let item = state.db.fetch_inventory_by_id(id).await?;
    Ok((StatusCode::OK, Json(item)))
}

pub async fn update_inventory(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<UpdateInventory>,
) -> AppResult<(StatusCode, Json<Inventory>)> {
    let item = state.db.update_inventory(id, &payload).await?;

    info!(id, stock = item.stock, reorder_level = item.reorder_level, "Updated inventory item");

    Ok((StatusCode::OK, Json(item)))
}

pub async fn delete_inventory(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    state.db.delete_inventory(id).await?;

    info!(id, "Deleted inventory item");

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Inventory item deleted", "ID": id })),
    ))
}

/// Items whose stock has dropped below their reorder level.
pub async fn low_stock_inventory(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Vec<Inventory>>)> {
    let start = Instant::now();
    let items = state.db.fetch_low_stock_inventory().await?;
    debug_assert!(items.iter().all(Inventory::is_low_stock));

    info!(
        count = items.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Listed low-stock inventory"
    );

    Ok((StatusCode::OK, Json(items)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::handlers::test_support::*;

    #[tokio::test]
    async fn crud_round_trip() {
        let app = app();
        let product = create_product(&app, "Insulin pen", 30.0).await;

        // The dashboard posts camelCase keys.
        let (status, created) = send(
            &app,
            "POST",
            "/inventory",
            Some(json!({ "productID": product, "stock": 12, "reorderLevel": 5 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["ID"].as_i64().unwrap();
        assert_eq!(created["ProductID"], product);

        let (status, updated) = send(
            &app,
            "PUT",
            &format!("/inventory/{id}"),
            Some(json!({ "stock": 3 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["Stock"], 3);
        assert_eq!(updated["ReorderLevel"], 5);

        let (status, listed) = get(&app, "/inventory").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let (status, body) = send(&app, "DELETE", &format!("/inventory/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Inventory item deleted");
        assert_eq!(get(&app, &format!("/inventory/{id}")).await.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_for_unknown_product_is_404() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/inventory",
            Some(json!({ "ProductID": 77, "Stock": 1, "ReorderLevel": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Product 77 not found");
    }

    #[tokio::test]
    async fn low_stock_is_empty_when_nothing_is_below_reorder_level() {
        let app = app();
        let product = create_product(&app, "Saline", 1.0).await;
        create_inventory(&app, product, 10, 10).await;

        let (status, body) = get(&app, "/inventory/low-stock").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn low_stock_returns_exactly_rows_below_reorder_level() {
        let app = app();
        let product = create_product(&app, "Gauze", 1.0).await;

        let levels = [(0, 1), (5, 5), (4, 5), (100, 20), (19, 20), (7, 0)];
        let mut expected = Vec::new();
        for (stock, reorder) in levels {
            let id = create_inventory(&app, product, stock, reorder).await;
            if stock < reorder {
                expected.push(id);
            }
        }

        let (status, body) = get(&app, "/inventory/low-stock").await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<i64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["ID"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, expected);
    }
}
