use crate::constants::DOCTORS_COLLECTION;
use crate::store::Document;
use carebook_types::{EmailAddress, NonEmptyText};
use carebook_uuid::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: RecordId,
    pub name: NonEmptyText,
    pub email: EmailAddress,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    /// Consultation fee in whole currency units; copied into each appointment's amount.
    pub fees: u32,
    pub available: bool,
    /// When the doctor was added.
    pub date: DateTime<Utc>,
}

impl Document for Doctor {
    const COLLECTION: &'static str = DOCTORS_COLLECTION;

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Doctor fields copied into appointments and prescriptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorSnapshot {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub speciality: String,
    pub degree: String,
    pub fees: u32,
}

impl From<&Doctor> for DoctorSnapshot {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id,
            name: doctor.name.to_string(),
            email: doctor.email.to_string(),
            speciality: doctor.speciality.clone(),
            degree: doctor.degree.clone(),
            fees: doctor.fees,
        }
    }
}
