use crate::breach::BreachWindow;
use core_types::{Customer, Transaction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The boundary transactions of the most valuable order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEdges {
    pub order_id: Uuid,
    pub total_value: Decimal,
    /// First present transaction in the order's own sequence (not by time).
    pub first_transaction: Option<Transaction>,
    /// Last present transaction in the order's own sequence (not by time).
    pub last_transaction: Option<Transaction>,
}

/// Outcome of the highest-value-order report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", content = "payload")]
pub enum HighestValueOrder {
    Found(OrderEdges),
    /// No order had a non-empty transaction list.
    NoValidOrders,
}

impl HighestValueOrder {
    pub fn edges(&self) -> Option<&OrderEdges> {
        match self {
            HighestValueOrder::Found(edges) => Some(edges),
            HighestValueOrder::NoValidOrders => None,
        }
    }
}

impl fmt::Display for HighestValueOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighestValueOrder::Found(edges) => write!(
                f,
                "order {} with total value {}",
                edges.order_id, edges.total_value
            ),
            HighestValueOrder::NoValidOrders => f.write_str("No valid orders found"),
        }
    }
}

/// A customer flagged by the SLA breach detector, with the window that tripped it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlaBreach {
    pub customer: Customer,
    pub failed_transactions: usize,
    pub window: BreachWindow,
}

/// A census of the malformed records in an order batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQualitySummary {
    pub total_orders: usize,
    pub orders_without_customer: usize,
    pub orders_without_transactions: usize,
    pub null_transactions: usize,
    /// Orders whose identifier was already used by an earlier order in the batch.
    pub duplicate_order_ids: usize,
}
