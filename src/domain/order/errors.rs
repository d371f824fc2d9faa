use rust_decimal::Decimal;

use super::value_objects::OrderStatus;

// ============================================================================
// Order Invariant Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrderError {
    #[error("Order {0} has no items")]
    EmptyItems(String),

    #[error("Item {item_id} has invalid quantity: {quantity}")]
    InvalidQuantity { item_id: String, quantity: u32 },

    #[error("Item {item_id} has negative price: {price}")]
    NegativePrice { item_id: String, price: Decimal },

    #[error("Order {order_id} total {recorded} does not match item sum {expected}")]
    TotalMismatch {
        order_id: String,
        recorded: Decimal,
        expected: Decimal,
    },

    #[error("Order {order_id} in status {status} has inconsistent {field}")]
    ShipmentFieldMismatch {
        order_id: String,
        status: OrderStatus,
        field: &'static str,
    },
}
