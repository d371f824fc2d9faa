// ============================================================================
// Order Domain - Order records and their invariants
// ============================================================================
//
// - Value objects (OrderItem, Address, OrderStatus)
// - Entity (Order, with total-amount and shipment invariants)
// - Errors (OrderError enum)
//
// ============================================================================

pub mod value_objects;
pub mod entity;
pub mod errors;

// Re-export for convenience
pub use value_objects::*;
pub use entity::*;
pub use errors::*;
