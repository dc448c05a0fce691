use crate::enums::{CustomerTier, TransactionStatus};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Treats an explicit `null` the same way as a missing field.
///
/// Combined with `#[serde(default)]` this gives deserialized records the same
/// normalization as the constructors below.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Like [`null_as_default`], but negative values are clamped to zero.
fn non_negative_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(null_as_default::<D, Decimal>(deserializer)?.max(Decimal::ZERO))
}

/// A buyer. Orders may arrive without one (guest checkout or a malformed record).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tier: CustomerTier,
    /// Additional addresses in the order they were registered. Entries may be null.
    #[serde(default, deserialize_with = "null_as_default")]
    pub secondary_emails: Vec<Option<String>>,
}

impl Customer {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: Option<String>,
        tier: Option<CustomerTier>,
        secondary_emails: Option<Vec<Option<String>>>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email,
            tier: tier.unwrap_or_default(),
            secondary_emails: secondary_emails.unwrap_or_default(),
        }
    }
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    /// Never negative; a negative input price is clamped to zero.
    #[serde(default, deserialize_with = "non_negative_decimal")]
    pub price: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stock_quantity: u32,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: Option<String>,
        price: Option<Decimal>,
        stock_quantity: Option<u32>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            price: price.unwrap_or_default().max(Decimal::ZERO),
            stock_quantity: stock_quantity.unwrap_or_default(),
        }
    }
}

/// A single line item of an order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    #[serde(default)]
    pub product: Option<Product>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unit_price: Decimal,
    pub timestamp: NaiveDateTime,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: TransactionStatus,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        product: Option<Product>,
        quantity: Option<i32>,
        unit_price: Option<Decimal>,
        timestamp: NaiveDateTime,
        status: Option<TransactionStatus>,
    ) -> Self {
        Self {
            id: id.into(),
            product,
            quantity: quantity.unwrap_or_default(),
            unit_price: unit_price.unwrap_or_default(),
            timestamp,
            status: status.unwrap_or_default(),
        }
    }

    /// `unit_price * quantity`, computed exactly.
    ///
    /// Saturates at `Decimal::MAX`/`Decimal::MIN` when the product does not fit.
    pub fn total_value(&self) -> Decimal {
        self.unit_price.saturating_mul(Decimal::from(self.quantity))
    }

    pub fn is_failed(&self) -> bool {
        self.status == TransactionStatus::Failed
    }

    /// The category of the owning product, when both are present.
    pub fn category(&self) -> Option<&str> {
        self.product.as_ref()?.category.as_deref()
    }
}

/// An envelope of line items placed by a customer at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub customer: Option<Customer>,
    pub order_date: NaiveDateTime,
    /// Never absent once constructed, but individual entries may be null.
    #[serde(default, deserialize_with = "null_as_default")]
    pub transactions: Vec<Option<Transaction>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
}

impl Order {
    pub fn new(
        id: Option<Uuid>,
        customer: Option<Customer>,
        order_date: NaiveDateTime,
        transactions: Option<Vec<Option<Transaction>>>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            id: id.unwrap_or_else(Uuid::new_v4),
            customer,
            order_date,
            transactions: transactions.unwrap_or_default(),
            status: status.into(),
        }
    }

    /// Iterates the present transactions in their original sequence, skipping null entries.
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().flatten()
    }

    /// Sum of `total_value` over the present transactions, saturating on overflow.
    pub fn total_value(&self) -> Decimal {
        self.transactions()
            .map(Transaction::total_value)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// The calendar date the order was placed on.
    pub fn order_day(&self) -> NaiveDate {
        self.order_date.date()
    }

    /// Number of entries in the transaction list, null entries included.
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn null_transaction_count(&self) -> usize {
        self.transactions.iter().filter(|t| t.is_none()).count()
    }
}
