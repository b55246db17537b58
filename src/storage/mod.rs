//! Storage layer for the persisted search position.
//!
//! - `backend`: storage trait
//! - `json`: JSON file implementation with atomic writes
//! - `models`: storage records, separate from domain types

pub mod backend;
pub mod json;
pub mod models;

pub use backend::Storage;
pub use json::JsonStorage;
pub use models::SnapshotRecord;
