//! Business operations over the document store.
//!
//! Services hold an `Arc<CoreConfig>` and a [`DocumentStore`](crate::store::DocumentStore)
//! handle and are cheap to clone. They carry no API concerns: identity is passed in as a
//! record id already resolved by the caller.

pub mod appointments;
pub mod directory;
pub mod prescriptions;

pub use appointments::{AppointmentService, DoctorDashboard};
pub use directory::{DirectoryService, DoctorProfileUpdate, NewDoctor, NewPatient};
pub use prescriptions::{AddPrescription, PrescriptionService, UploadedFile};
