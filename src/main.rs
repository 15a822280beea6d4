use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod seed;

use crate::config::Config;
use crate::db::{PgStore, Store};

/// Shared application state. Cloned per request; the store sits behind an Arc.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Store>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    // Structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,pharmacy_service=debug")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    info!("Pharmacy Service starting (axum + PostgreSQL)");

    let store = PgStore::connect(&config).await?;
    store.migrate().await?;

    let state = AppState {
        db: Arc::new(store),
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("Listening on http://{}", addr);
    info!("Quick-start: POST http://{}/seed  →  then GET http://{}/orders/recent", addr, addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    Router::new()
        // ── Health ──────────────────────────────────────────────────────────
        .route("/health", get(handlers::health))

        // ── Products ────────────────────────────────────────────────────────
        .route(
            "/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route("/products/total", get(handlers::products::total_products))
        .route(
            "/products/:id",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )

        // ── Inventory ───────────────────────────────────────────────────────
        .route(
            "/inventory",
            get(handlers::inventory::list_inventory).post(handlers::inventory::create_inventory),
        )
        .route(
            "/inventory/low-stock",
            get(handlers::inventory::low_stock_inventory),
        )
        .route(
            "/inventory/:id",
            get(handlers::inventory::get_inventory)
                .put(handlers::inventory::update_inventory)
                .delete(handlers::inventory::delete_inventory),
        )

        // ── Customers ───────────────────────────────────────────────────────
        .route(
            "/customers",
            get(handlers::customers::list_customers).post(handlers::customers::create_customer),
        )
        .route("/customers/total", get(handlers::customers::total_customers))
        .route(
            "/customers/:id",
            get(handlers::customers::get_customer)
                .put(handlers::customers::update_customer)
                .delete(handlers::customers::delete_customer),
        )
        .route(
            "/customers/:id/orders",
            get(handlers::customers::customer_orders),
        )

        // ── Orders ──────────────────────────────────────────────────────────
        .route(
            "/orders",
            get(handlers::orders::list_orders).post(handlers::orders::create_order),
        )
        .route("/orders/recent", get(handlers::orders::recent_orders))
        .route("/orders/total-sales", get(handlers::orders::total_sales))
        .route("/orders/today", get(handlers::orders::today_transactions))
        .route(
            "/orders/:id",
            get(handlers::orders::get_order)
                .put(handlers::orders::update_order)
                .delete(handlers::orders::delete_order),
        )

        // ── Order details ───────────────────────────────────────────────────
        .route(
            "/orderdetails",
            get(handlers::order_details::list_order_details)
                .post(handlers::order_details::create_order_detail),
        )
        .route(
            "/orderdetails/:id",
            get(handlers::order_details::get_order_detail)
                .put(handlers::order_details::update_order_detail)
                .delete(handlers::order_details::delete_order_detail),
        )
        .route(
            "/orderdetails/product/:id",
            get(handlers::order_details::product_order_details),
        )

        // ── Seed ────────────────────────────────────────────────────────────
        .route("/seed", post(handlers::seed::seed_data))

        // ── Middleware ──────────────────────────────────────────────────────
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
