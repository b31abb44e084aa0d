//! In-memory authoritative store and its id index.

/// Session-scoped event id index.
pub mod indices;
/// Event store with write-through persistence.
pub mod store;
