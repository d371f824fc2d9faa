use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::errors::OrderError;
use super::value_objects::{Address, OrderItem, OrderStatus};

// ============================================================================
// Order - one customer purchase
// ============================================================================
//
// Orders are immutable once built. `total_amount` is always derived from the
// items through `Order::new`, so `validate` only fails for orders assembled
// field by field (deserialized or injected from outside).
//
// ============================================================================

/// Round a money amount to cents, halves away from zero
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Shipment details that only exist for some statuses
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shipment {
    pub tracking_number: Option<String>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub actual_delivery: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Order {
    pub id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub items: Vec<OrderItem>,
    pub shipping_address: Address,
    pub tracking_number: Option<String>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub actual_delivery: Option<DateTime<Utc>>,
}

impl Order {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        customer_name: impl Into<String>,
        customer_email: impl Into<String>,
        order_date: DateTime<Utc>,
        status: OrderStatus,
        items: Vec<OrderItem>,
        shipping_address: Address,
        shipment: Shipment,
    ) -> Self {
        let total_amount = Self::items_total(&items);
        Self {
            id: id.into(),
            customer_name: customer_name.into(),
            customer_email: customer_email.into(),
            order_date,
            status,
            total_amount,
            items,
            shipping_address,
            tracking_number: shipment.tracking_number,
            estimated_delivery: shipment.estimated_delivery,
            actual_delivery: shipment.actual_delivery,
        }
    }

    /// Sum of price * quantity over the items, rounded to cents
    pub fn items_total(items: &[OrderItem]) -> Decimal {
        round_cents(items.iter().map(OrderItem::line_total).sum())
    }

    /// Number of units across all line items
    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Check the record invariants
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.items.is_empty() {
            return Err(OrderError::EmptyItems(self.id.clone()));
        }

        for item in &self.items {
            if item.quantity == 0 {
                return Err(OrderError::InvalidQuantity {
                    item_id: item.id.clone(),
                    quantity: item.quantity,
                });
            }
            if item.price < Decimal::ZERO {
                return Err(OrderError::NegativePrice {
                    item_id: item.id.clone(),
                    price: item.price,
                });
            }
        }

        let expected = Self::items_total(&self.items);
        if self.total_amount != expected {
            return Err(OrderError::TotalMismatch {
                order_id: self.id.clone(),
                recorded: self.total_amount,
                expected,
            });
        }

        let shipped = self.status == OrderStatus::Shipped;
        let delivered = self.status == OrderStatus::Delivered;
        let checks = [
            ("tracking_number", self.tracking_number.is_some(), self.status.is_tracked()),
            ("estimated_delivery", self.estimated_delivery.is_some(), shipped),
            ("actual_delivery", self.actual_delivery.is_some(), delivered),
        ];
        for (field, present, required) in checks {
            if present != required {
                return Err(OrderError::ShipmentFieldMismatch {
                    order_id: self.id.clone(),
                    status: self.status,
                    field,
                });
            }
        }

        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
