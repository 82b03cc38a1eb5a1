//! Constants used throughout the Carebook core crate.
//!
//! Collection names and defaults live here so storage paths stay consistent.

/// Default directory for the document store when none is configured.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default directory for uploaded and generated files.
pub const DEFAULT_UPLOADS_DIR: &str = "uploads";

/// Default REST listen address.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:4000";

/// Collection directory for doctor records.
pub const DOCTORS_COLLECTION: &str = "doctors";

/// Collection directory for patient records.
pub const PATIENTS_COLLECTION: &str = "patients";

/// Collection directory for appointment records.
pub const APPOINTMENTS_COLLECTION: &str = "appointments";

/// Collection directory for prescription records.
pub const PRESCRIPTIONS_COLLECTION: &str = "prescriptions";

/// File extension for stored documents.
pub const DOCUMENT_EXTENSION: &str = "yaml";

/// Prefix for generated prescription PDFs.
pub const PRESCRIPTION_PDF_PREFIX: &str = "prescription_";
