pub mod customers;
pub mod inventory;
pub mod order_details;
pub mod orders;
pub mod products;
pub mod seed;

use axum::{http::StatusCode, Json};
use serde_json::json;

pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok", "service": "pharmacy-service" })))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{build_router, db::memory::MemoryStore, AppState};

    /// Full router over a fresh in-memory store.
    pub fn app() -> Router {
        build_router(AppState {
            db: Arc::new(MemoryStore::new()),
        })
    }

    pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        send_request(app, request).await
    }

    pub async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
        send(app, "GET", uri, None).await
    }

    pub async fn create_product(app: &Router, name: &str, price: f64) -> i64 {
        let (status, body) = send(
            app,
            "POST",
            "/products",
            Some(json!({ "Name": name, "Category": "Analgesics", "Price": price })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["ID"].as_i64().unwrap()
    }

    pub async fn create_inventory(app: &Router, product_id: i64, stock: i32, reorder_level: i32) -> i64 {
        let (status, body) = send(
            app,
            "POST",
            "/inventory",
            Some(json!({ "ProductID": product_id, "Stock": stock, "ReorderLevel": reorder_level })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["ID"].as_i64().unwrap()
    }

    pub async fn create_customer(app: &Router, name: &str) -> i64 {
        let (status, body) = send(
            app,
            "POST",
            "/customers",
            Some(json!({ "Name": name, "Email": "someone@example.com", "Phone": "555" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["ID"].as_i64().unwrap()
    }

    /// Creates an order and returns its full response body.
    pub async fn create_order(app: &Router, payload: Value) -> Value {
        let (status, body) = send(app, "POST", "/orders", Some(payload)).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }
}
