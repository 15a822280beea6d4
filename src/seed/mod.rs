use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::db::Store;
use crate::error::AppResult;
use crate::models::*;

static CATEGORIES: &[&str] = &[
    "Analgesics",
    "Antibiotics",
    "Antihistamines",
    "Antacids",
    "Cardiovascular",
    "Dermatology",
    "Diabetes Care",
    "First Aid",
    "Respiratory",
    "Vitamins & Supplements",
];

static DRUGS: &[&str] = &[
    "Paracetamol", "Ibuprofen", "Aspirin", "Amoxicillin", "Azithromycin",
    "Cetirizine", "Loratadine", "Omeprazole", "Ranitidine", "Metformin",
    "Atorvastatin", "Lisinopril", "Amlodipine", "Salbutamol", "Hydrocortisone",
    "Vitamin C", "Vitamin D3", "Zinc", "Clotrimazole", "Diclofenac",
];

static STRENGTHS: &[&str] = &["5mg", "10mg", "50mg", "100mg", "250mg", "500mg", "1g"];

static FIRST_NAMES: &[&str] = &[
    "Amara", "Ben", "Chen", "Dana", "Elif", "Farid", "Grace", "Hugo", "Ines",
    "Jonas", "Kavya", "Luis", "Mei", "Noah", "Olga", "Priya",
];

static LAST_NAMES: &[&str] = &[
    "Adeyemi", "Brown", "Costa", "Dubois", "Eriksen", "Fischer", "Garcia",
    "Haddad", "Ivanova", "Jensen", "Kim", "Lopez", "Moreau", "Nakamura",
];

static STATUSES: &[&str] = &["Pending", "Processing", "Completed", "Cancelled"];

/// Orders are spread over this many past days.
const ORDER_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy)]
pub struct SeedCounts {
    pub customers: usize,
    pub products: usize,
    pub orders: usize,
}

/// Rows actually inserted by one seeding run.
#[derive(Debug, Default, Clone, Serialize, PartialEq)]
pub struct SeedReport {
    pub customers: usize,
    pub products: usize,
    pub inventory: usize,
    pub orders: usize,
    pub order_lines: usize,
}

fn random_product(rng: &mut StdRng, serial: usize) -> CreateProduct {
    let drug = DRUGS.choose(rng).unwrap_or(&"Paracetamol");
    let strength = STRENGTHS.choose(rng).unwrap_or(&"500mg");
    CreateProduct {
        name: format!("{} {} #{:04}", drug, strength, serial),
        category: CATEGORIES.choose(rng).unwrap_or(&"Analgesics").to_string(),
        price: round_cents(rng.gen_range(0.99..150.0)),
        inventory: vec![NewInventoryLine {
            stock: rng.gen_range(0..=500),
            reorder_level: rng.gen_range(10..=100),
        }],
    }
}

fn random_customer(rng: &mut StdRng, serial: usize) -> CreateCustomer {
    let first = FIRST_NAMES.choose(rng).unwrap_or(&"Alex");
    let last = LAST_NAMES.choose(rng).unwrap_or(&"Smith");
    CreateCustomer {
        name: format!("{} {}", first, last),
        email: format!(
            "{}.{}{}@example.com",
            first.to_lowercase(),
            last.to_lowercase(),
            serial
        ),
        phone: format!("555-{:04}", rng.gen_range(0..10_000)),
    }
}

fn random_order(rng: &mut StdRng, customers: &[Customer], products: &[Product]) -> Option<CreateOrder> {
    let customer = customers.choose(rng)?;

    let line_count = rng.gen_range(1..=4);
    let mut details = Vec::with_capacity(line_count);
    for _ in 0..line_count {
        let product = products.choose(rng)?;
        details.push(NewOrderLine {
            product_id: product.id,
            quantity: rng.gen_range(1..=5),
            price_per_unit: product.price,
        });
    }

    let total_amount = details.iter().map(NewOrderLine::line_total).sum();
    let age = Duration::seconds(rng.gen_range(0..ORDER_WINDOW_DAYS * 24 * 3600));

    Some(CreateOrder {
        customer_id: customer.id,
        order_date: Some(Utc::now() - age),
        total_amount,
        order_status: STATUSES.choose(rng).unwrap_or(&"Pending").to_string(),
        details,
    })
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Populate the store with random pharmacy data. Every product gets one
/// inventory row; orders only reference rows created in this run.
pub async fn seed_pharmacy(store: &dyn Store, counts: SeedCounts, rng: &mut StdRng) -> AppResult<SeedReport> {
    info!(
        customers = counts.customers,
        products = counts.products,
        orders = counts.orders,
        "Seeding pharmacy data..."
    );

    let mut report = SeedReport::default();

    let mut products = Vec::with_capacity(counts.products);
    for serial in 0..counts.products {
        let product = store.insert_product(&random_product(rng, serial)).await?;
        report.inventory += product.inventory.len();
        products.push(product);
    }
    report.products = products.len();

    let mut customers = Vec::with_capacity(counts.customers);
    for serial in 0..counts.customers {
        customers.push(store.insert_customer(&random_customer(rng, serial)).await?);
    }
    report.customers = customers.len();

    for _ in 0..counts.orders {
        // No customers or no products means nothing can be ordered.
        let Some(payload) = random_order(rng, &customers, &products) else {
            break;
        };
        let order = store.insert_order(&payload).await?;
        report.orders += 1;
        report.order_lines += order.details.len();
    }

    info!(?report, "Seeding complete");
    Ok(report)
}
