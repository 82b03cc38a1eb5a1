//! Error type shared by the core services.

#[derive(Debug, thiserror::Error)]
pub enum CareError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("Appointment not found")]
    AppointmentNotFound,
    #[error("Doctor not found")]
    DoctorNotFound,
    #[error("Patient not found")]
    PatientNotFound,
    #[error("Prescription not found")]
    PrescriptionNotFound,
    #[error("Unauthorized action")]
    Unauthorized,
    #[error("Doctor not available")]
    DoctorUnavailable,
    #[error("Slot not available")]
    SlotUnavailable,
    #[error("Appointment is cancelled")]
    AppointmentCancelled,
    #[error("Mark Failed")]
    MarkFailed,
    #[error("Cancellation Failed")]
    CancellationFailed,
    #[error("{0} already registered")]
    AlreadyRegistered(String),

    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to write record file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read record file: {0}")]
    FileRead(std::io::Error),
    #[error("record already exists: {0}")]
    RecordExists(String),
    #[error("failed to serialize YAML: {0}")]
    YamlSerialization(serde_yaml::Error),
    #[error("failed to deserialize YAML: {0}")]
    YamlDeserialization(serde_yaml::Error),

    #[error("failed to render PDF: {0}")]
    PdfRender(String),
    #[error("file storage error: {0}")]
    Files(#[from] carebook_files::FilesError),
    #[error("invalid id: {0}")]
    Id(#[from] carebook_uuid::UuidError),
    #[error("invalid text: {0}")]
    Text(#[from] carebook_types::TextError),
}

pub type CareResult<T> = std::result::Result<T, CareError>;
