use crate::constants::PRESCRIPTIONS_COLLECTION;
use crate::models::{DoctorSnapshot, PatientSnapshot};
use crate::store::Document;
use crate::CareError;
use carebook_uuid::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrescriptionType {
    Text,
    File,
    Both,
}

impl PrescriptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrescriptionType::Text => "text",
            PrescriptionType::File => "file",
            PrescriptionType::Both => "both",
        }
    }
}

impl fmt::Display for PrescriptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrescriptionType {
    type Err = CareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "text" => Ok(PrescriptionType::Text),
            "file" => Ok(PrescriptionType::File),
            "both" => Ok(PrescriptionType::Both),
            other => Err(CareError::InvalidInput(format!(
                "prescriptionType must be text, file or both, got '{}'",
                other
            ))),
        }
    }
}

/// A prescription issued for one appointment.
///
/// `prescription_type` is expected to describe which of text and file are present, but
/// this is not checked on load or save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: RecordId,
    pub appointment_id: RecordId,
    pub doctor_id: RecordId,
    pub patient_id: RecordId,
    #[serde(default)]
    pub prescription_text: String,
    /// Public path of the generated PDF, or of the uploaded file when nothing was generated.
    #[serde(default)]
    pub prescription_file: Option<String>,
    /// Public path of the file the doctor uploaded, if any.
    #[serde(default)]
    pub attachment: Option<String>,
    pub prescription_type: PrescriptionType,
    pub created_at: DateTime<Utc>,
    pub doctor_data: DoctorSnapshot,
    pub patient_data: PatientSnapshot,
}

impl Document for Prescription {
    const COLLECTION: &'static str = PRESCRIPTIONS_COLLECTION;

    fn id(&self) -> RecordId {
        self.id
    }
}
