//! Stored record types.
//!
//! Each type implements [`Document`](crate::store::Document) and is persisted as YAML by the
//! [`DocumentStore`](crate::store::DocumentStore). Prescriptions and appointments embed
//! snapshots of the doctor and patient taken at creation time; later profile edits do not
//! flow into them.

pub mod appointment;
pub mod doctor;
pub mod patient;
pub mod prescription;

pub use appointment::Appointment;
pub use doctor::{Doctor, DoctorSnapshot};
pub use patient::{Patient, PatientSnapshot};
pub use prescription::{Prescription, PrescriptionType};
