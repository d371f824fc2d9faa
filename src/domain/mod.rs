// ============================================================================
// Domain Layer
// ============================================================================
//
// Order records as produced by the data provider. Everything derived from
// them (stats, series, distributions) lives in `analytics`.
//
// ============================================================================

pub mod order;
