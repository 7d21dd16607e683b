//! Persisted host status: record types and the JSON-backed store.

pub mod store;
pub mod types;

pub use store::StatusStore;
pub use types::{ScanMode, StatusRecord, Verdict};
