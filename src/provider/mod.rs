// ============================================================================
// Data Provider
// ============================================================================
//
// - generator/ - synthetic order collection (MockOrderGenerator)
// - store/     - data context owning and publishing the collection (OrderStore)
//
// ============================================================================

pub mod generator;
pub mod store;

pub use generator::{MockOrderGenerator, HISTORY_DAYS};
pub use store::{Clock, OrderStore, StoreOptions};
