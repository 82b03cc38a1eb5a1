//! Record identifiers and sharded-path utilities.
//!
//! Carebook stores every document (doctors, patients, appointments, prescriptions) under a
//! sharded directory derived from its identifier.
//!
//! Identifiers use a *canonical* representation: **32 lowercase hexadecimal characters**
//! (no hyphens), i.e. `Uuid::new_v4().simple().to_string()`.
//!
//! ## Sharded layout
//! For a canonical id `u`, a record of a collection lives at:
//! `collection_dir/<u[0..2]>/<u[2..4]>/<u>.yaml`
//!
//! Example:
//! `data/prescriptions/55/0e/550e8400e29b41d4a716446655440000.yaml`

mod service;

pub use service::{RecordId, Uuid};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
