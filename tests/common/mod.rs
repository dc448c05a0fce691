//! Shared fixture builders for the integration tests.
#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use storefront::configuration::AnalyticsSettings;
use storefront::core_types::{CustomerTier, TransactionStatus};
use storefront::{AnalyticsEngine, Customer, Order, Product, Transaction};
use uuid::Uuid;

pub const CATEGORIES: [&str; 4] = ["Electronics", "Books", "Toys", "Health"];

pub fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// An engine with cheap risk scoring and eager partitioning.
pub fn engine() -> AnalyticsEngine {
    let mut settings = AnalyticsSettings::default();
    settings.risk.iterations = 25;
    settings.execution.min_partition_len = 4;
    storefront::engine_from_settings(settings).unwrap()
}

pub fn customer(n: usize) -> Customer {
    let tier = match n % 3 {
        0 => CustomerTier::Standard,
        1 => CustomerTier::Premium,
        _ => CustomerTier::Vip,
    };
    Customer::new(
        format!("CUST-{}", 10_000 + n),
        format!("Customer {n}"),
        Some(format!("customer{n}@example.com")),
        Some(tier),
        Some(vec![Some(format!("secondary{n}@example.com"))]),
    )
}

pub fn product(n: usize) -> Product {
    Product::new(
        format!("PROD-{}", 1000 + n),
        format!("Product {n}"),
        Some(CATEGORIES[n % CATEGORIES.len()].to_string()),
        Some(Decimal::new(999 + (n as i64 * 731) % 50_000, 2)),
        Some((n * 17 % 1000) as u32),
    )
}

pub fn transaction(
    id: impl Into<String>,
    product: Option<Product>,
    quantity: i32,
    timestamp: NaiveDateTime,
    status: TransactionStatus,
) -> Transaction {
    let unit_price = product.as_ref().map(|p| p.price);
    Transaction::new(id, product, Some(quantity), unit_price, timestamp, Some(status))
}

/// A deterministic batch shaped like production traffic: every twentieth
/// order is malformed in one of the ways the engine has to tolerate.
pub fn batch(size: usize, start: NaiveDateTime) -> Vec<Order> {
    let statuses = [
        TransactionStatus::Success,
        TransactionStatus::Failed,
        TransactionStatus::Pending,
        TransactionStatus::Cancelled,
    ];

    (0..size)
        .map(|i| {
            let order_date = start + Duration::hours((i * 7 % (24 * 60)) as i64);
            let customer = (i % 20 != 5).then(|| customer(i % 12));
            let mut transactions: Vec<Option<Transaction>> = (0..i % 6)
                .map(|j| {
                    Some(transaction(
                        format!("TXN-{i}-{j}"),
                        Some(product((i + j) % 30)),
                        1 + ((i + j) % 10) as i32,
                        order_date + Duration::minutes((j * 11) as i64),
                        statuses[(i + j) % statuses.len()],
                    ))
                })
                .collect();
            if i % 20 == 10 {
                transactions.insert(0, None);
            }
            if i % 20 == 15 {
                transactions.clear();
            }
            Order::new(
                Some(Uuid::from_u128(i as u128 + 1)),
                customer,
                order_date,
                Some(transactions),
                "SUCCESS",
            )
        })
        .collect()
}
