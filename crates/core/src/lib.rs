//! # Carebook Core
//!
//! Business logic for the Carebook appointment and prescription service.
//!
//! This crate owns the file-backed document store, the prescription text format, PDF
//! rendering and the services that link prescriptions to appointments:
//! - Doctor and patient records ([`services::DirectoryService`])
//! - Booking, completion, cancellation and payment ([`services::AppointmentService`])
//! - Prescriptions with optional uploads and generated PDFs ([`services::PrescriptionService`])
//!
//! **No API concerns**: identity headers, HTTP envelopes and multipart parsing belong in
//! `carebook-api-rest`.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod pdf;
pub mod prescription_text;
pub mod services;
pub mod store;
pub mod validation;

pub use carebook_types::{EmailAddress, NonEmptyText, TextError};
pub use carebook_uuid::RecordId;
pub use config::{rest_addr_from_env_values, CoreConfig};
pub use error::{CareError, CareResult};
