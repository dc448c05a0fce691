pub mod calendar;
pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use calendar::YearMonth;
pub use enums::{CustomerTier, TransactionStatus};
pub use error::CoreError;
pub use structs::{Customer, Order, Product, Transaction};
